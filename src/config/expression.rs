use super::traits::{check_unit_interval, ConfigManifest, ConfigSection, FieldManifest};
use crate::error::DocGenomeError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionConfig {
    /// Genes strictly above this expression level are expressed
    pub expression_threshold: f64,
    /// Expression level reported as a notable adaptation
    pub high_expression_threshold: f64,
    /// Mutation impact reported as a notable adaptation
    pub high_impact_threshold: f64,
    pub max_lineage: usize,
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            expression_threshold: 0.5,
            high_expression_threshold: 0.8,
            high_impact_threshold: 0.7,
            max_lineage: 10,
        }
    }
}

impl ConfigSection for ExpressionConfig {
    fn section_name() -> &'static str {
        "expression"
    }

    fn validate(&self) -> Result<(), DocGenomeError> {
        check_unit_interval("Expression threshold", self.expression_threshold)?;
        check_unit_interval("High expression threshold", self.high_expression_threshold)?;
        check_unit_interval("High impact threshold", self.high_impact_threshold)?;
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Expression".to_string(),
            fields: vec![
                FieldManifest::ratio(
                    "expression_threshold",
                    0.5,
                    "Minimum expression for a gene to appear in the document",
                ),
                FieldManifest::ratio(
                    "high_expression_threshold",
                    0.8,
                    "Expression reported as a notable adaptation",
                ),
                FieldManifest::ratio(
                    "high_impact_threshold",
                    0.7,
                    "Mutation impact reported as a notable adaptation",
                ),
                FieldManifest::integer(
                    "max_lineage",
                    10,
                    0.0,
                    1000.0,
                    "Ancestors listed in the provenance report",
                ),
            ],
        }
    }
}
