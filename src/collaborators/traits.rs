use crate::engines::evaluation::features::GenotypeFeatures;
use crate::engines::expression::phenotype::Phenotype;
use crate::engines::generation::genome::Gene;
use crate::error::DocGenomeError;
use crate::types::{SeedExample, TargetProfile};
use std::collections::HashSet;

/// Source of known high-quality documents for a domain
pub trait SeedCorpusSource: Send + Sync {
    fn fetch_high_fitness_examples(&self, domain_id: &str)
        -> Result<Vec<SeedExample>, DocGenomeError>;
}

/// Domain keywords whose presence raises content coverage
pub trait KeywordOracle: Send + Sync {
    fn important_keywords(&self, domain_id: &str) -> Result<HashSet<String>, DocGenomeError>;
}

/// Optional scorer estimating how likely a document is to succeed
pub trait SuccessPredictor: Send + Sync {
    /// Returns a likelihood in [0, 1]
    fn predict(&self, features: &GenotypeFeatures) -> Result<f64, DocGenomeError>;
}

/// Turns one expressed gene into section text
pub trait SectionRenderer: Send + Sync {
    fn render_section(&self, gene: &Gene, phenotype: &Phenotype, profile: &TargetProfile) -> String;
}
