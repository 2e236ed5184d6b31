use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::DocGenomeError;
use serde::{Deserialize, Serialize};

/// Weights of the five fitness sub-scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    pub structure_weight: f64,
    pub keyword_weight: f64,
    pub relevance_weight: f64,
    pub novelty_weight: f64,
    pub success_weight: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            structure_weight: 0.20,
            keyword_weight: 0.30,
            relevance_weight: 0.25,
            novelty_weight: 0.15,
            success_weight: 0.10,
        }
    }
}

impl FitnessConfig {
    fn weights(&self) -> [(&'static str, f64); 5] {
        [
            ("structure_weight", self.structure_weight),
            ("keyword_weight", self.keyword_weight),
            ("relevance_weight", self.relevance_weight),
            ("novelty_weight", self.novelty_weight),
            ("success_weight", self.success_weight),
        ]
    }
}

impl ConfigSection for FitnessConfig {
    fn section_name() -> &'static str {
        "fitness"
    }

    fn validate(&self) -> Result<(), DocGenomeError> {
        for (name, weight) in self.weights() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(DocGenomeError::Configuration(format!(
                    "{} must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        let defaults = FitnessConfig::default();
        ConfigManifest {
            section: "Fitness".to_string(),
            fields: defaults
                .weights()
                .iter()
                .map(|(name, weight)| {
                    FieldManifest::ratio(name, *weight, "Weight of this sub-score in the total")
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let total: f64 = FitnessConfig::default().weights().iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let config = FitnessConfig {
            novelty_weight: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
