mod awards;
mod engine;
mod narrative;
mod players;
mod power;
mod quarters;
mod score;
mod team_stats;

pub use engine::*;
pub use players::apportion;
pub use power::TeamPower;
pub use score::{ScoreBreakdown, ScoreModel};
