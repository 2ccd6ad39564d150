//! Baseline data for a fresh installation.
//!
//! The generator is deterministic given its [`RandomSource`] and clock, which
//! is what the tests rely on.

pub mod catalogue;
pub mod random_source;
pub mod seed_generator;

pub use random_source::{FixedSequence, RandomSource, StdRandom};
pub use seed_generator::{SeedGenerator, SeedMarker, SeedOptions, SeedReport, SeedStep, SEED_VERSION};
