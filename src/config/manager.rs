use super::{
    evolution::EvolutionConfig, expression::ExpressionConfig, fitness::FitnessConfig,
    traits::{ConfigManifest, ConfigSection},
};
use crate::error::DocGenomeError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Environment prefix for layered overrides, e.g. `DOCGENOME__EVOLUTION__POPULATION_SIZE=80`
pub const ENV_PREFIX: &str = "DOCGENOME";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
    pub fitness: FitnessConfig,
    pub expression: ExpressionConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), DocGenomeError> {
        self.evolution.validate()?;
        self.fitness.validate()?;
        self.expression.validate()?;
        Ok(())
    }

    /// Editable fields of every section, keyed by section name
    pub fn manifests(&self) -> Vec<(&'static str, ConfigManifest)> {
        vec![
            (EvolutionConfig::section_name(), self.evolution.to_manifest()),
            (FitnessConfig::section_name(), self.fitness.to_manifest()),
            (ExpressionConfig::section_name(), self.expression.to_manifest()),
        ]
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, DocGenomeError> {
        let config: AppConfig = toml::from_str(contents)
            .map_err(|e| DocGenomeError::Toml(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Merge an optional TOML file with `DOCGENOME__*` environment overrides
    pub fn load_layered<P: AsRef<Path>>(path: Option<P>) -> Result<Self, DocGenomeError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.as_ref()).required(true));
        }
        let config: AppConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), DocGenomeError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DocGenomeError::Configuration(format!("Failed to read config: {}", e))
        })?;

        let config = AppConfig::from_toml_str(&contents)?;

        *self.config.write().unwrap_or_else(|e| e.into_inner()) = config;
        Ok(())
    }

    pub fn load_layered<P: AsRef<Path>>(&self, path: Option<P>) -> Result<(), DocGenomeError> {
        let config = AppConfig::load_layered(path)?;
        *self.config.write().unwrap_or_else(|e| e.into_inner()) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), DocGenomeError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| DocGenomeError::Toml(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str).map_err(|e| {
            DocGenomeError::Configuration(format!("Failed to write config: {}", e))
        })?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Apply an edit; the previous configuration is kept when the edit is invalid
    pub fn update<F>(&self, f: F) -> Result<(), DocGenomeError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap_or_else(|e| e.into_inner());
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [evolution]
            population_size = 12
            elite_count = 2
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.evolution.population_size, 12);
        assert_eq!(config.evolution.seed, Some(7));
        assert_eq!(config.evolution.tournament_size, 5);
        assert_eq!(config.fitness, FitnessConfig::default());
    }

    #[test]
    fn test_population_only_toml_gets_proportional_elites() {
        let config = AppConfig::from_toml_str("[evolution]\npopulation_size = 8\n").unwrap();

        assert_eq!(config.evolution.elite_count, None);
        assert_eq!(config.evolution.elite_count(), 2);
    }

    #[test]
    fn test_manifests_cover_every_section() {
        let manifests = AppConfig::default().manifests();
        let names: Vec<&str> = manifests.iter().map(|(name, _)| *name).collect();

        assert_eq!(names, vec!["evolution", "fitness", "expression"]);
        assert!(manifests.iter().all(|(_, m)| !m.fields.is_empty()));
        let evolution = &manifests[0].1;
        assert!(evolution.fields.iter().any(|f| f.name == "elite_count"));
    }

    #[test]
    fn test_invalid_toml_config_rejected() {
        let result = AppConfig::from_toml_str(
            r#"
            [evolution]
            population_size = 4
            elite_count = 4
            "#,
        );
        assert!(matches!(result, Err(DocGenomeError::Configuration(_))));
    }

    #[test]
    fn test_update_keeps_previous_on_error() {
        let manager = ConfigManager::new();
        let result = manager.update(|c| c.evolution.mutation_rate = 2.0);

        assert!(result.is_err());
        assert_eq!(manager.get().evolution.mutation_rate, 0.01);
    }

    #[test]
    fn test_save_and_reload() {
        let manager = ConfigManager::new();
        manager
            .update(|c| c.evolution.max_generations = 3)
            .unwrap();

        let path = std::env::temp_dir().join(format!(
            "docgenome-config-{}.toml",
            std::process::id()
        ));
        manager.save_to_file(&path).unwrap();

        let reloaded = ConfigManager::new();
        reloaded.load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(reloaded.get().evolution.max_generations, 3);
    }
}
