mod game;
mod playoff;
mod standings;
mod team;
mod topology;

pub use game::*;
pub use playoff::*;
pub use standings::*;
pub use team::*;
pub use topology::*;
