//! Genetic search engine.
//!
//! A domain-agnostic, single-lineage (or small-pool) genetic search. Users
//! define their problem by implementing [`SearchProblem`], which specifies
//! how to create, mutate, optionally recombine, and score genomes.
//!
//! # Components
//!
//! - [`Candidate`]: an immutable genome + fitness, with a mutable age
//! - [`StrategySelector`]: adaptive choice between create, mutate, crossover
//! - [`AcceptancePolicy`]: strict-improvement acceptance; an aged-out parent
//!   yields to a worse child or to the best of the [`HistoricalPool`]
//! - [`SearchRunner`]: the loop, in [`SearchMode::Single`] and
//!   [`SearchMode::Pool`] flavours
//!
//! # Conventions
//!
//! Greater fitness is better. Ties never replace a parent.
//!
//! # Submodules
//!
//! - [`operators`]: generic crossover and mutation helpers for gene sequences

mod acceptance;
mod config;
pub mod operators;
mod pool;
mod runner;
mod strategy;
mod types;

pub use acceptance::{AcceptancePolicy, Decision, Outcome};
pub use config::SearchConfig;
pub(crate) use config::check_min;
pub use pool::HistoricalPool;
pub use runner::{SearchMode, SearchResult, SearchRunner, StopReason};
pub use strategy::{StrategySelector, StrategyStats};
pub use types::{Candidate, Fitness, SearchProblem, Strategy};
