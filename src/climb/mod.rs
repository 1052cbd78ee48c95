//! Hill-climbing parameter sweep.
//!
//! Treats a complete search as a black-box function of one integer control
//! parameter (typically the maximum genome length) and looks for the
//! smallest value at which the search still reaches its target, e.g. the
//! fewest gates that realise a truth table.
//!
//! The user implements [`ClimbProblem`]; [`HillClimber`] runs the sweep.

mod config;
mod runner;
mod types;

pub use config::ClimbConfig;
pub use runner::{ClimbResult, HillClimber};
pub use types::ClimbProblem;
