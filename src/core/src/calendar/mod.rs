mod calendar;
mod phase;

pub use calendar::*;
pub use phase::*;
