use crate::collaborators::{
    KeywordOracle, SectionRenderer, SeedCorpusSource, StaticKeywordOracle, StaticSeedCorpus,
    SuccessPredictor,
};
use crate::config::AppConfig;
use crate::engines::evaluation::{FitnessBreakdown, FitnessEvaluator};
use crate::engines::expression::{Phenotype, PhenotypeExpresser, TemplateRenderer};
use crate::engines::generation::{
    epigenetics::{modulate, Environment},
    genome::{Chromosome, Genotype, IdSequence},
    mutation::{apply_mutation, choose_kind, maybe_mutate},
    operators::{recombine, select_elites, select_parent_pool, sort_by_fitness},
    progress::{CancellationToken, ProgressCallback},
    provenance::{notable_adaptations, trace_lineage, Adaptation},
    seed_adapter::SeedCorpusAdapter,
    vocabulary::{random_gene, random_genotype},
};
use crate::error::DocGenomeError;
use crate::types::{Artifact, TargetProfile};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Expression boost for genes that mention the target profile
const PROFILE_BOOST: f64 = 0.2;

/// Controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvolutionState {
    Idle,
    Initializing,
    Evaluating,
    Selecting,
    Recombining,
    Mutating,
    Modulating,
    Expressing,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    TargetReached,
    MaxGenerations,
    Cancelled,
}

/// External collaborators consumed by the engine
#[derive(Clone)]
pub struct Collaborators {
    pub seed_corpus: Arc<dyn SeedCorpusSource>,
    pub keyword_oracle: Arc<dyn KeywordOracle>,
    pub predictor: Option<Arc<dyn SuccessPredictor>>,
    pub renderer: Arc<dyn SectionRenderer>,
}

impl Collaborators {
    pub fn new(
        seed_corpus: Arc<dyn SeedCorpusSource>,
        keyword_oracle: Arc<dyn KeywordOracle>,
        renderer: Arc<dyn SectionRenderer>,
    ) -> Self {
        Self {
            seed_corpus,
            keyword_oracle,
            predictor: None,
            renderer,
        }
    }

    pub fn with_predictor(mut self, predictor: Arc<dyn SuccessPredictor>) -> Self {
        self.predictor = Some(predictor);
        self
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::new(
            Arc::new(StaticSeedCorpus::new()),
            Arc::new(StaticKeywordOracle::new()),
            Arc::new(TemplateRenderer::new()),
        )
    }
}

/// Everything a run hands back to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionOutcome {
    pub artifact: Artifact,
    pub phenotype: Phenotype,
    pub best: Genotype,
    /// Chromosome layout of `best`
    pub chromosomes: Vec<Chromosome>,
    pub fitness: f64,
    pub breakdown: FitnessBreakdown,
    /// Index of the last evaluated generation
    pub generations: usize,
    pub termination: TerminationReason,
    pub lineage: Vec<String>,
    pub adaptations: Vec<Adaptation>,
    /// Best fitness per evaluated generation
    pub fitness_history: Vec<f64>,
    pub completed_at: DateTime<Utc>,
}

pub struct EvolutionEngine {
    config: AppConfig,
    collaborators: Collaborators,
    evaluator: FitnessEvaluator,
    adapter: SeedCorpusAdapter,
    ids: IdSequence,
    rng: StdRng,
    state: EvolutionState,
}

impl EvolutionEngine {
    /// Validates the configuration; the RNG is seeded from `evolution.seed` when set
    pub fn new(config: AppConfig, collaborators: Collaborators) -> Result<Self, DocGenomeError> {
        let rng = match config.evolution.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, collaborators, rng)
    }

    pub fn with_rng(
        config: AppConfig,
        collaborators: Collaborators,
        rng: StdRng,
    ) -> Result<Self, DocGenomeError> {
        config.validate()?;

        let evaluator = FitnessEvaluator::new(
            config.fitness.clone(),
            Arc::clone(&collaborators.keyword_oracle),
            collaborators.predictor.clone(),
        );

        Ok(Self {
            config,
            collaborators,
            evaluator,
            adapter: SeedCorpusAdapter::default(),
            ids: IdSequence::new(),
            rng,
            state: EvolutionState::Idle,
        })
    }

    pub fn with_seed_adapter(mut self, adapter: SeedCorpusAdapter) -> Self {
        self.adapter = adapter;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> EvolutionState {
        self.state
    }

    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    fn transition(&mut self, next: EvolutionState) {
        log::debug!("Evolution state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Run the evolution process
    ///
    /// Always returns a best-effort outcome: reaching the target, running out
    /// of generations and cancellation are all normal terminal paths.
    pub fn run<C: ProgressCallback>(
        &mut self,
        profile: &TargetProfile,
        domain_id: &str,
        mut callback: C,
        cancel: &CancellationToken,
    ) -> EvolutionOutcome {
        let evolution = self.config.evolution.clone();
        log::info!(
            "Starting evolution for domain '{}': population {}, max generations {}, target {:.3}",
            domain_id,
            evolution.population_size,
            evolution.max_generations,
            evolution.target_fitness
        );

        let keywords = self.evaluator.keywords_for(domain_id);

        self.transition(EvolutionState::Initializing);
        let mut population = self.initialize_population(profile, domain_id);
        let initial_population = population.clone();

        let mut history = Vec::new();
        let mut generation = 0;

        let termination = loop {
            callback.on_generation_start(generation);
            self.transition(EvolutionState::Evaluating);
            self.evaluate_population(&mut population, profile, &keywords);

            let best_fitness = population[0].fitness_or_zero();
            history.push(best_fitness);
            callback.on_generation_complete(generation, best_fitness);
            log::debug!("Generation {}: best fitness {:.4}", generation, best_fitness);

            if best_fitness >= evolution.target_fitness {
                break TerminationReason::TargetReached;
            }
            if generation >= evolution.max_generations {
                break TerminationReason::MaxGenerations;
            }
            if cancel.is_cancelled() {
                log::info!("Cancellation requested after generation {}", generation);
                break TerminationReason::Cancelled;
            }

            population = self.create_next_generation(&population, generation);
            generation += 1;
        };

        self.transition(EvolutionState::Expressing);
        let best = population[0].clone();
        let expresser = PhenotypeExpresser::new(
            Arc::clone(&self.collaborators.renderer),
            self.config.expression.clone(),
        )
        .with_keywords(keywords.clone());
        let expression = expresser.express(&best, profile);
        let breakdown = self.evaluator.breakdown(&best, profile, &keywords);

        let mut candidates = initial_population;
        candidates.extend(population.iter().skip(1).cloned());
        let lineage = trace_lineage(&best, &candidates, self.config.expression.max_lineage);
        let adaptations = notable_adaptations(&best, &self.config.expression);

        log::info!(
            "Evolution finished ({:?}) after generation {} with fitness {:.4}",
            termination,
            generation,
            best.fitness_or_zero()
        );
        self.transition(EvolutionState::Done);

        EvolutionOutcome {
            artifact: expression.artifact,
            phenotype: expression.phenotype,
            fitness: best.fitness_or_zero(),
            chromosomes: best.chromosomes(self.config.evolution.chromosome_size),
            best,
            breakdown,
            generations: generation,
            termination,
            lineage,
            adaptations,
            fitness_history: history,
            completed_at: Utc::now(),
        }
    }

    /// Seed-derived genotypes (first copies verbatim, later copies lightly mutated)
    /// followed by random ones, all nudged toward the profile
    pub fn initialize_population(&mut self, profile: &TargetProfile, domain_id: &str) -> Vec<Genotype> {
        let evolution = &self.config.evolution;
        let population_size = evolution.population_size;

        let examples = match self.collaborators.seed_corpus.fetch_high_fitness_examples(domain_id) {
            Ok(examples) => examples,
            Err(e) => {
                log::warn!(
                    "Seed corpus unavailable for domain '{}', using random initialization: {}",
                    domain_id,
                    e
                );
                Vec::new()
            }
        };
        let seeds = self.adapter.adapt_all(&examples, &mut self.ids);

        let seed_slots = if seeds.is_empty() {
            0
        } else {
            ((population_size as f64 * evolution.seed_ratio).round() as usize).min(population_size)
        };
        log::debug!(
            "Initializing {} seed-derived and {} random genotypes ({} seed examples)",
            seed_slots,
            population_size - seed_slots,
            seeds.len()
        );

        let mut population = Vec::with_capacity(population_size);
        for i in 0..seed_slots {
            let base = &seeds[i % seeds.len()];
            if i < seeds.len() {
                population.push(base.clone());
            } else {
                let mut copy = base.clone_as(self.ids.derive_id(&base.id, 0));
                let kind = choose_kind(&mut self.rng);
                apply_mutation(&mut copy, kind, &mut self.rng);
                population.push(copy);
            }
        }
        while population.len() < population_size {
            population.push(random_genotype(&mut self.ids, 0, &mut self.rng));
        }

        for genotype in population.iter_mut() {
            adapt_to_profile(genotype, profile);
        }
        population
    }

    /// Score every stale genotype and sort descending
    ///
    /// Genotypes that lost all genes get one random gene first so scoring
    /// never sees an empty sequence.
    pub fn evaluate_population(
        &mut self,
        population: &mut [Genotype],
        profile: &TargetProfile,
        keywords: &HashSet<String>,
    ) {
        for genotype in population.iter_mut().filter(|g| g.is_empty()) {
            log::warn!("Genotype {} has no genes, re-seeding one", genotype.id);
            genotype.genes.push(random_gene(None, &mut self.rng));
            genotype.invalidate_fitness();
        }

        let evaluator = &self.evaluator;
        population
            .par_iter_mut()
            .filter(|g| g.fitness.is_none())
            .for_each(|g| {
                g.fitness = Some(evaluator.evaluate_with_keywords(g, profile, keywords));
            });

        sort_by_fitness(population);
    }

    /// Selecting -> Recombining -> Mutating -> Modulating
    ///
    /// Expects `population` evaluated and sorted. Elites pass through with
    /// their fitness intact; only offspring need re-evaluation.
    pub fn create_next_generation(&mut self, population: &[Genotype], generation: usize) -> Vec<Genotype> {
        let evolution = self.config.evolution.clone();

        self.transition(EvolutionState::Selecting);
        let elites = select_elites(population, evolution.elite_count());
        let pool_size = evolution.population_size.saturating_sub(elites.len());
        let parent_pool =
            select_parent_pool(population, pool_size, evolution.tournament_size, &mut self.rng);

        self.transition(EvolutionState::Recombining);
        let mut offspring = recombine(
            &parent_pool,
            evolution.crossover_rate,
            &mut self.ids,
            &mut self.rng,
        );

        self.transition(EvolutionState::Mutating);
        let seeds: Vec<u64> = offspring.iter().map(|_| self.rng.gen()).collect();
        offspring
            .par_iter_mut()
            .zip(seeds.par_iter())
            .for_each(|(genotype, seed)| {
                let mut rng = StdRng::seed_from_u64(*seed);
                maybe_mutate(genotype, evolution.mutation_rate, &mut rng);
            });

        self.transition(EvolutionState::Modulating);
        let environment = Environment::at_generation(generation + 1);
        let mut next: Vec<Genotype> = elites.into_iter().chain(offspring).collect();
        next.par_iter_mut()
            .for_each(|genotype| modulate(genotype, environment));

        next
    }
}

/// Boost expression of genes mentioning the profile's industry or needs
pub fn adapt_to_profile(genotype: &mut Genotype, profile: &TargetProfile) {
    for gene in genotype.genes.iter_mut() {
        if profile.is_referenced_by(&gene.alleles) {
            gene.set_expression(gene.expression + PROFILE_BOOST);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::genome::Gene;
    use crate::types::SeedExample;

    fn config(population_size: usize, elite_count: usize) -> AppConfig {
        let mut config = AppConfig::default();
        config.evolution.population_size = population_size;
        config.evolution.elite_count = Some(elite_count);
        config.evolution.max_generations = 5;
        config.evolution.seed = Some(17);
        config
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = EvolutionEngine::new(config(4, 4), Collaborators::default());
        assert!(matches!(result, Err(DocGenomeError::Configuration(_))));
    }

    #[test]
    fn test_initial_population_mix() {
        let corpus = StaticSeedCorpus::new().with_examples(
            "grant",
            vec![SeedExample::new("Introduction of our company.\n\nThe plan has a budget.", 0.8)],
        );
        let collaborators = Collaborators::new(
            Arc::new(corpus),
            Arc::new(StaticKeywordOracle::new()),
            Arc::new(TemplateRenderer::new()),
        );
        let mut engine = EvolutionEngine::new(config(10, 2), collaborators).unwrap();

        let population = engine.initialize_population(&TargetProfile::default(), "grant");
        assert_eq!(population.len(), 10);
        assert_eq!(population.iter().filter(|g| g.id.starts_with("seed0")).count(), 5);
        assert_eq!(population.iter().filter(|g| g.id.starts_with("random")).count(), 5);
        assert!(population[0].mutations.is_empty());
        assert!(population[1].mutations.len() <= 1);
    }

    #[test]
    fn test_degenerate_genotype_is_reseeded() {
        let mut engine = EvolutionEngine::new(config(4, 1), Collaborators::default()).unwrap();
        let mut population = vec![
            Genotype::new("a-g0-00000", vec![], 0),
            Genotype::new("b-g0-00001", vec![], 0),
        ];

        engine.evaluate_population(&mut population, &TargetProfile::default(), &HashSet::new());
        assert!(population.iter().all(|g| g.len() == 1));
        assert!(population.iter().all(|g| g.fitness.is_some()));
    }

    #[test]
    fn test_next_generation_size_and_elites() {
        let mut engine = EvolutionEngine::new(config(8, 2), Collaborators::default()).unwrap();
        let profile = TargetProfile::new("retail", vec![]);
        let keywords = engine.evaluator().keywords_for("grant");

        let mut population = engine.initialize_population(&profile, "grant");
        engine.evaluate_population(&mut population, &profile, &keywords);
        let best = population[0].clone();

        let next = engine.create_next_generation(&population, 0);
        assert_eq!(next.len(), 8);
        assert_eq!(next[0].id, best.id);
        assert_eq!(next[0].fitness, best.fitness);
        assert_eq!(next[0].genes.len(), best.genes.len());
        assert!(next[2..].iter().all(|g| g.fitness.is_none()));
        assert_eq!(engine.state(), EvolutionState::Modulating);
    }

    #[test]
    fn test_profile_adaptation_boosts_matching_genes() {
        let mut genotype = Genotype::new(
            "a",
            vec![
                Gene::new("introduction", vec!["retail".to_string()], 0.5, 0.5),
                Gene::new("plan", vec!["timeline".to_string()], 0.5, 0.5),
            ],
            0,
        );
        adapt_to_profile(&mut genotype, &TargetProfile::new("Retail", vec![]));

        assert!((genotype.genes[0].expression - 0.7).abs() < 1e-9);
        assert_eq!(genotype.genes[1].expression, 0.5);
    }

    #[test]
    fn test_run_reports_every_generation() {
        let mut config = config(6, 1);
        config.evolution.target_fitness = 1.0;
        let mut engine = EvolutionEngine::new(config, Collaborators::default()).unwrap();
        let mut reported = Vec::new();

        let outcome = engine.run(
            &TargetProfile::new("retail", vec![]),
            "grant",
            |g: usize, f: f64| reported.push((g, f)),
            &CancellationToken::new(),
        );

        assert_eq!(outcome.termination, TerminationReason::MaxGenerations);
        assert_eq!(outcome.generations, 5);
        assert_eq!(reported.len(), 6);
        assert_eq!(reported.len(), outcome.fitness_history.len());
        assert_eq!(engine.state(), EvolutionState::Done);
    }

    #[test]
    fn test_cancel_from_callback_stops_at_that_generation() {
        let mut config = config(6, 1);
        config.evolution.target_fitness = 1.0;
        config.evolution.max_generations = 20;
        let mut engine = EvolutionEngine::new(config, Collaborators::default()).unwrap();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let outcome = engine.run(
            &TargetProfile::new("retail", vec![]),
            "grant",
            move |g: usize, _f: f64| {
                if g == 2 {
                    trigger.cancel();
                }
            },
            &cancel,
        );

        assert_eq!(outcome.termination, TerminationReason::Cancelled);
        assert_eq!(outcome.generations, 2);
        assert_eq!(outcome.fitness_history.len(), 3);
    }
}
