mod bracket;
mod diagnostics;
mod factor;
mod generator;
mod interchange;
mod matchups;
mod seeding;
mod settings;
mod weeks;

pub use bracket::*;
pub use diagnostics::*;
pub use generator::*;
pub use matchups::{Matchup, MatchupBucket};
pub use seeding::*;
pub use settings::*;
pub use weeks::PlanStrategy;
