use crate::error::DocGenomeError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), DocGenomeError>;
    fn to_manifest(&self) -> ConfigManifest;
}

/// Configuration manifest describing editable fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigManifest {
    pub section: String,
    pub fields: Vec<FieldManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldManifest {
    pub name: String,
    pub field_type: String,
    pub default: serde_json::Value,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub description: String,
}

impl FieldManifest {
    pub fn ratio(name: &str, default: f64, description: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: "float".to_string(),
            default: serde_json::json!(default),
            min: Some(0.0),
            max: Some(1.0),
            description: description.to_string(),
        }
    }

    pub fn integer(name: &str, default: usize, min: f64, max: f64, description: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: "integer".to_string(),
            default: serde_json::json!(default),
            min: Some(min),
            max: Some(max),
            description: description.to_string(),
        }
    }
}

/// Check that a rate lies in [0, 1]
pub(crate) fn check_unit_interval(name: &str, value: f64) -> Result<(), DocGenomeError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(DocGenomeError::Configuration(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )));
    }
    Ok(())
}
