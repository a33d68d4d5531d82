mod generator;
mod roster;

pub use generator::*;
pub use roster::*;
