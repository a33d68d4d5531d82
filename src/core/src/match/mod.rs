pub mod engine;
mod injury;
mod result;
mod roster;
mod settings;

pub use engine::*;
pub use injury::*;
pub use result::*;
pub use roster::*;
pub use settings::*;
