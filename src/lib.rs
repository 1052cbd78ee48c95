//! Domain-agnostic genetic search engine.
//!
//! One family of strategies, one acceptance policy, many problems. The same
//! engine packs resources under several constraints, synthesises minimal
//! logic circuits from truth tables, and evolves game strategies; each of
//! those is only a [`SearchProblem`](search::SearchProblem) implementation.
//!
//! - **Search** ([`search`]): a parent (or a small pool of parents) produces
//!   children by create, mutate or crossover, chosen adaptively from each
//!   strategy's success rate. A child replaces its parent only on strict
//!   improvement; a parent that ages out either yields to a worse child or
//!   resumes from the best champion in the historical pool.
//! - **Hill climbing** ([`climb`]): sweeps an integer control parameter
//!   (e.g. maximum genome length) over repeated searches to find the
//!   smallest value that still reaches the target.
//!
//! # Architecture
//!
//! The crate contains no domain concepts. Fitness formulas, gene factories,
//! data loading and display are supplied by callers through traits.
//!
//! # Features
//!
//! - `parallel` (default): score the children of one generation with rayon.
//! - `serde`: `Serialize`/`Deserialize` for configurations and statistics.

pub mod climb;
pub mod error;
pub mod random;
pub mod search;

pub use error::{ConfigError, Result, SearchError};
