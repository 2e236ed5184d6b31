use super::traits::{KeywordOracle, SeedCorpusSource, SuccessPredictor};
use crate::engines::evaluation::features::{GenotypeFeatures, FEATURE_COUNT};
use crate::error::DocGenomeError;
use crate::types::SeedExample;
use std::collections::{HashMap, HashSet};

/// Keywords used when no oracle answer is available
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "innovation",
    "productivity",
    "efficiency",
    "growth",
    "digitalization",
    "sustainability",
    "employment",
    "competitiveness",
];

pub fn default_keywords() -> HashSet<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

/// In-memory seed corpus keyed by domain
#[derive(Debug, Clone, Default)]
pub struct StaticSeedCorpus {
    examples: HashMap<String, Vec<SeedExample>>,
}

impl StaticSeedCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_examples(mut self, domain_id: &str, examples: Vec<SeedExample>) -> Self {
        self.examples
            .entry(domain_id.to_string())
            .or_default()
            .extend(examples);
        self
    }
}

impl SeedCorpusSource for StaticSeedCorpus {
    fn fetch_high_fitness_examples(
        &self,
        domain_id: &str,
    ) -> Result<Vec<SeedExample>, DocGenomeError> {
        Ok(self.examples.get(domain_id).cloned().unwrap_or_default())
    }
}

/// In-memory keyword table; unknown domains get [`DEFAULT_KEYWORDS`]
#[derive(Debug, Clone, Default)]
pub struct StaticKeywordOracle {
    keywords: HashMap<String, HashSet<String>>,
}

impl StaticKeywordOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords<I, S>(mut self, domain_id: &str, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.insert(
            domain_id.to_string(),
            keywords.into_iter().map(|k| k.into().to_lowercase()).collect(),
        );
        self
    }
}

impl KeywordOracle for StaticKeywordOracle {
    fn important_keywords(&self, domain_id: &str) -> Result<HashSet<String>, DocGenomeError> {
        Ok(self
            .keywords
            .get(domain_id)
            .cloned()
            .unwrap_or_else(default_keywords))
    }
}

/// Logistic model over the genotype feature vector
#[derive(Debug, Clone)]
pub struct LinearSuccessPredictor {
    weights: [f64; FEATURE_COUNT],
    bias: f64,
}

impl LinearSuccessPredictor {
    pub fn new(weights: [f64; FEATURE_COUNT], bias: f64) -> Self {
        Self { weights, bias }
    }
}

impl Default for LinearSuccessPredictor {
    /// Hand-set weights rewarding role coverage, keyword hits and profile relevance
    fn default() -> Self {
        let mut weights = [0.0; FEATURE_COUNT];
        weights[2] = 1.5; // role coverage
        weights[5] = 1.0; // keyword coverage
        weights[6] = 1.0; // profile relevance
        weights[8] = 0.5; // mean dominance
        weights[12] = -0.5; // duplicate ratio
        Self { weights, bias: -1.5 }
    }
}

impl SuccessPredictor for LinearSuccessPredictor {
    fn predict(&self, features: &GenotypeFeatures) -> Result<f64, DocGenomeError> {
        let z = self.bias
            + self
                .weights
                .iter()
                .zip(features.values())
                .map(|(w, x)| w * x)
                .sum::<f64>();
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_corpus_unknown_domain_is_empty() {
        let corpus = StaticSeedCorpus::new()
            .with_examples("it-subsidy", vec![SeedExample::new("Introduction", 0.8)]);

        assert_eq!(corpus.fetch_high_fitness_examples("it-subsidy").unwrap().len(), 1);
        assert!(corpus.fetch_high_fitness_examples("other").unwrap().is_empty());
    }

    #[test]
    fn test_keyword_oracle_falls_back_to_defaults() {
        let oracle = StaticKeywordOracle::new().with_keywords("it-subsidy", ["Cloud", "DX"]);

        let known = oracle.important_keywords("it-subsidy").unwrap();
        assert!(known.contains("cloud") && known.contains("dx"));
        assert_eq!(oracle.important_keywords("unknown").unwrap(), default_keywords());
    }

    #[test]
    fn test_linear_predictor_is_bounded() {
        let predictor = LinearSuccessPredictor::default();
        let low = predictor.predict(&GenotypeFeatures::zeros()).unwrap();
        let high = predictor
            .predict(&GenotypeFeatures::from_values([1.0; FEATURE_COUNT]))
            .unwrap();

        assert!(low > 0.0 && low < 0.5);
        assert!(high > low && high < 1.0);
    }
}
