//! Evolutionary document generation
//!
//! Candidate drafts are encoded as genotypes of content, structure and tone
//! genes. A generational loop scores them against a target profile, breeds
//! the next population and finally renders the best genotype into an
//! [`Artifact`](types::Artifact).

pub mod collaborators;
pub mod config;
pub mod engines;
pub mod error;
pub mod services;
pub mod types;

pub use config::{AppConfig, ConfigManager};
pub use engines::generation::{
    CancellationToken, Collaborators, EvolutionEngine, EvolutionOutcome, TerminationReason,
};
pub use error::{DocGenomeError, Result};
pub use types::{Artifact, SeedExample, TargetProfile};
