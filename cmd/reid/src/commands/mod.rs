//! CLI commands module.

mod identify;
mod inspect;
mod score;
mod util;

pub use identify::IdentifyCommand;
pub use inspect::InspectCommand;
pub use score::ScoreCommand;

pub(crate) use util::*;
