use crate::collaborators::{default_keywords, KeywordOracle, SuccessPredictor};
use crate::config::FitnessConfig;
use crate::engines::evaluation::features::GenotypeFeatures;
use crate::engines::generation::genome::{Genotype, Role};
use crate::types::TargetProfile;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Contribution of the success predictor when none is configured or it fails
pub const NEUTRAL_SUCCESS: f64 = 0.5;

/// The five sub-scores and their weighted total
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessBreakdown {
    pub structure: f64,
    pub keywords: f64,
    pub relevance: f64,
    pub novelty: f64,
    pub success: f64,
    pub total: f64,
}

/// Fraction of the required roles present among gene identifiers
pub fn structural_completeness(genotype: &Genotype) -> f64 {
    let found: HashSet<Role> = genotype.genes.iter().filter_map(|g| g.role()).collect();
    found.len() as f64 / Role::ALL.len() as f64
}

/// Lowercased keywords, so oracle casing never affects matching
pub fn normalize_keywords(keywords: &HashSet<String>) -> Vec<String> {
    keywords.iter().map(|k| k.to_lowercase()).collect()
}

/// Fraction of domain keywords found among allele tokens
pub fn keyword_coverage(genotype: &Genotype, keywords: &HashSet<String>) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }
    let tokens: Vec<String> = genotype.allele_tokens().map(|t| t.to_lowercase()).collect();
    let keywords = normalize_keywords(keywords);
    let hits = keywords
        .iter()
        .filter(|keyword| tokens.iter().any(|t| t.contains(keyword.as_str())))
        .count();
    hits as f64 / keywords.len() as f64
}

/// Fraction of genes whose alleles mention the profile's industry or needs
pub fn profile_relevance(genotype: &Genotype, profile: &TargetProfile) -> f64 {
    if genotype.genes.is_empty() {
        return 0.0;
    }
    let relevant = genotype
        .genes
        .iter()
        .filter(|g| profile.is_referenced_by(&g.alleles))
        .count();
    relevant as f64 / genotype.genes.len() as f64
}

/// Novelty from beneficial mutations, with diminishing returns in their count
pub fn mutation_novelty(genotype: &Genotype) -> f64 {
    let impacts: Vec<f64> = genotype.beneficial_mutations().map(|m| m.impact).collect();
    if impacts.is_empty() {
        return 0.0;
    }
    let average = impacts.iter().sum::<f64>() / impacts.len() as f64;
    let saturation = 1.0 - (-(impacts.len() as f64) / 3.0).exp();
    (saturation * average).clamp(0.0, 1.0)
}

/// Multi-component fitness scoring
///
/// Evaluation is total: every well-formed genotype, including one with no
/// genes, gets a score in [0, 1]. Collaborator failures fall back to the
/// documented defaults and are logged.
pub struct FitnessEvaluator {
    weights: FitnessConfig,
    keyword_oracle: Arc<dyn KeywordOracle>,
    predictor: Option<Arc<dyn SuccessPredictor>>,
}

impl FitnessEvaluator {
    pub fn new(
        weights: FitnessConfig,
        keyword_oracle: Arc<dyn KeywordOracle>,
        predictor: Option<Arc<dyn SuccessPredictor>>,
    ) -> Self {
        Self {
            weights,
            keyword_oracle,
            predictor,
        }
    }

    /// Domain keywords, or the built-in set when the oracle is unavailable
    pub fn keywords_for(&self, domain_id: &str) -> HashSet<String> {
        match self.keyword_oracle.important_keywords(domain_id) {
            Ok(keywords) => keywords,
            Err(e) => {
                log::warn!(
                    "Keyword oracle unavailable for domain '{}', using defaults: {}",
                    domain_id,
                    e
                );
                default_keywords()
            }
        }
    }

    pub fn evaluate(&self, genotype: &Genotype, profile: &TargetProfile, domain_id: &str) -> f64 {
        let keywords = self.keywords_for(domain_id);
        self.breakdown(genotype, profile, &keywords).total
    }

    /// Score with keywords already fetched, as the controller does once per run
    pub fn evaluate_with_keywords(
        &self,
        genotype: &Genotype,
        profile: &TargetProfile,
        keywords: &HashSet<String>,
    ) -> f64 {
        self.breakdown(genotype, profile, keywords).total
    }

    pub fn breakdown(
        &self,
        genotype: &Genotype,
        profile: &TargetProfile,
        keywords: &HashSet<String>,
    ) -> FitnessBreakdown {
        let structure = structural_completeness(genotype);
        let keyword_score = keyword_coverage(genotype, keywords);
        let relevance = profile_relevance(genotype, profile);
        let novelty = mutation_novelty(genotype);
        let success = self.success_likelihood(genotype, profile, keywords);

        let w = &self.weights;
        let total = structure * w.structure_weight
            + keyword_score * w.keyword_weight
            + relevance * w.relevance_weight
            + novelty * w.novelty_weight
            + success * w.success_weight;

        FitnessBreakdown {
            structure,
            keywords: keyword_score,
            relevance,
            novelty,
            success,
            total: if total.is_nan() { 0.0 } else { total.clamp(0.0, 1.0) },
        }
    }

    fn success_likelihood(
        &self,
        genotype: &Genotype,
        profile: &TargetProfile,
        keywords: &HashSet<String>,
    ) -> f64 {
        let Some(predictor) = &self.predictor else {
            return NEUTRAL_SUCCESS;
        };
        let features = GenotypeFeatures::extract(genotype, keywords, profile);
        match predictor.predict(&features) {
            Ok(p) if p.is_finite() => p.clamp(0.0, 1.0),
            Ok(p) => {
                log::warn!("Success predictor returned {}, using neutral score", p);
                NEUTRAL_SUCCESS
            }
            Err(e) => {
                log::warn!("Success predictor unavailable, using neutral score: {}", e);
                NEUTRAL_SUCCESS
            }
        }
    }
}
