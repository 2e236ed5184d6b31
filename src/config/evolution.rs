use super::traits::{check_unit_interval, ConfigManifest, ConfigSection, FieldManifest};
use crate::error::DocGenomeError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub max_generations: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    /// Unset means 20% of the population, see [`EvolutionConfig::elite_count`]
    pub elite_count: Option<usize>,
    pub tournament_size: usize,
    pub target_fitness: f64,
    /// Share of the initial population derived from seed examples
    pub seed_ratio: f64,
    /// Genes per chromosome when chunking a genotype
    pub chromosome_size: usize,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 30,
            mutation_rate: 0.01,
            crossover_rate: 0.8,
            elite_count: None,
            tournament_size: 5,
            target_fitness: 0.95,
            seed_ratio: 0.5,
            chromosome_size: 5,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Elite count at the conventional 20% of the population
    pub fn default_elite_count(population_size: usize) -> usize {
        (population_size as f64 * 0.2).round() as usize
    }

    /// Configured elite count, or the 20% default for this population size
    pub fn elite_count(&self) -> usize {
        self.elite_count
            .unwrap_or_else(|| Self::default_elite_count(self.population_size))
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), DocGenomeError> {
        if self.population_size < 2 {
            return Err(DocGenomeError::Configuration(format!(
                "Population size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.elite_count() >= self.population_size {
            return Err(DocGenomeError::Configuration(format!(
                "Elite count ({}) must be smaller than population size ({})",
                self.elite_count(), self.population_size
            )));
        }
        if self.tournament_size == 0 {
            return Err(DocGenomeError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        if self.chromosome_size == 0 {
            return Err(DocGenomeError::Configuration(
                "Chromosome size must be at least 1".to_string(),
            ));
        }
        check_unit_interval("Mutation rate", self.mutation_rate)?;
        check_unit_interval("Crossover rate", self.crossover_rate)?;
        check_unit_interval("Target fitness", self.target_fitness)?;
        check_unit_interval("Seed ratio", self.seed_ratio)?;
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Evolution".to_string(),
            fields: vec![
                FieldManifest::integer(
                    "population_size",
                    50,
                    2.0,
                    10000.0,
                    "Number of candidate documents in the population",
                ),
                FieldManifest::integer(
                    "max_generations",
                    30,
                    0.0,
                    10000.0,
                    "Generational steps before the run stops",
                ),
                FieldManifest::ratio("mutation_rate", 0.01, "Chance that an offspring mutates"),
                FieldManifest::ratio("crossover_rate", 0.8, "Chance that a parent pair recombines"),
                FieldManifest::integer(
                    "elite_count",
                    10,
                    0.0,
                    9999.0,
                    "Top genotypes carried over unchanged (default 20% of the population)",
                ),
                FieldManifest::integer(
                    "tournament_size",
                    5,
                    1.0,
                    100.0,
                    "Contenders sampled per tournament",
                ),
                FieldManifest::ratio("target_fitness", 0.95, "Fitness that ends the run early"),
                FieldManifest::ratio("seed_ratio", 0.5, "Share of seed-derived initial genotypes"),
                FieldManifest::integer(
                    "chromosome_size",
                    5,
                    1.0,
                    100.0,
                    "Genes per derived chromosome",
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EvolutionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_tiny_population() {
        let config = EvolutionConfig {
            population_size: 1,
            elite_count: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(DocGenomeError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_elite_overflow() {
        let config = EvolutionConfig {
            population_size: 10,
            elite_count: Some(10),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_rates_out_of_range() {
        let bad_mutation = EvolutionConfig {
            mutation_rate: 1.5,
            ..Default::default()
        };
        let bad_crossover = EvolutionConfig {
            crossover_rate: -0.1,
            ..Default::default()
        };
        let bad_target = EvolutionConfig {
            target_fitness: f64::NAN,
            ..Default::default()
        };
        assert!(bad_mutation.validate().is_err());
        assert!(bad_crossover.validate().is_err());
        assert!(bad_target.validate().is_err());
    }

    #[test]
    fn test_default_elite_share() {
        assert_eq!(EvolutionConfig::default_elite_count(50), 10);
        assert_eq!(EvolutionConfig::default_elite_count(10), 2);
    }

    #[test]
    fn test_unset_elite_count_follows_population() {
        let config = EvolutionConfig {
            population_size: 8,
            ..Default::default()
        };
        assert_eq!(config.elite_count(), 2);
        assert!(config.validate().is_ok());

        let explicit = EvolutionConfig {
            elite_count: Some(3),
            ..config
        };
        assert_eq!(explicit.elite_count(), 3);
        assert_eq!(EvolutionConfig::default().elite_count(), 10);
    }
}
