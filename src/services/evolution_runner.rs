use crate::config::AppConfig;
use crate::engines::generation::evolution_engine::{Collaborators, EvolutionEngine, EvolutionOutcome};
use crate::engines::generation::progress::{
    CancellationToken, ChannelProgressCallback, ProgressMessage,
};
use crate::error::DocGenomeError;
use crate::types::TargetProfile;
use std::sync::mpsc::{channel, Receiver};
use std::thread::{self, JoinHandle};

/// Result from a background evolution run
pub type EvolutionResult = Result<EvolutionOutcome, DocGenomeError>;

/// Runs one evolution on a worker thread
///
/// Progress arrives through [`EvolutionRunner::poll_progress`]; the run is
/// cancelled when the runner is dropped.
pub struct EvolutionRunner {
    handle: Option<JoinHandle<EvolutionOutcome>>,
    progress_rx: Option<Receiver<ProgressMessage>>,
    cancel: CancellationToken,
}

impl EvolutionRunner {
    /// Start evolution in a background thread
    ///
    /// The engine is built before spawning so configuration errors surface here.
    pub fn start(
        config: AppConfig,
        collaborators: Collaborators,
        profile: TargetProfile,
        domain_id: impl Into<String>,
    ) -> Result<Self, DocGenomeError> {
        let mut engine = EvolutionEngine::new(config, collaborators)?;
        let domain_id = domain_id.into();

        let (progress_tx, progress_rx) = channel();
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();

        let handle = thread::Builder::new()
            .name(format!("evolution-{}", domain_id))
            .spawn(move || {
                log::info!("Evolution thread started for domain '{}'", domain_id);
                let callback = ChannelProgressCallback::new(progress_tx);
                engine.run(&profile, &domain_id, callback, &worker_cancel)
            })?;

        Ok(Self {
            handle: Some(handle),
            progress_rx: Some(progress_rx),
            cancel,
        })
    }

    /// Poll for progress updates (non-blocking)
    pub fn poll_progress(&mut self) -> Option<ProgressMessage> {
        self.progress_rx.as_ref().and_then(|rx| rx.try_recv().ok())
    }

    /// Returns the outcome once the worker has finished, `None` while it is running
    pub fn try_get_result(&mut self) -> Option<EvolutionResult> {
        let handle = self.handle.take()?;
        if handle.is_finished() {
            Some(Self::join_handle(handle))
        } else {
            self.handle = Some(handle);
            None
        }
    }

    /// Block until the worker finishes
    pub fn wait(mut self) -> EvolutionResult {
        match self.handle.take() {
            Some(handle) => Self::join_handle(handle),
            None => Err(DocGenomeError::Runner(
                "evolution result already taken".to_string(),
            )),
        }
    }

    /// Cancel the running evolution; the best-so-far outcome is still returned
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn join_handle(handle: JoinHandle<EvolutionOutcome>) -> EvolutionResult {
        handle
            .join()
            .map_err(|_| DocGenomeError::Runner("evolution thread panicked".to_string()))
    }
}

impl Drop for EvolutionRunner {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::evolution_engine::TerminationReason;

    fn small_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.evolution.population_size = 6;
        config.evolution.elite_count = Some(1);
        config.evolution.max_generations = 3;
        config.evolution.seed = Some(3);
        config
    }

    #[test]
    fn test_invalid_config_fails_before_spawn() {
        let mut config = small_config();
        config.evolution.population_size = 1;
        let result = EvolutionRunner::start(
            config,
            Collaborators::default(),
            TargetProfile::default(),
            "grant",
        );
        assert!(matches!(result, Err(DocGenomeError::Configuration(_))));
    }

    #[test]
    fn test_runner_completes_and_reports() {
        let mut runner = EvolutionRunner::start(
            small_config(),
            Collaborators::default(),
            TargetProfile::new("retail", vec!["hiring".to_string()]),
            "grant",
        )
        .unwrap();

        let mut outcome = None;
        while outcome.is_none() {
            outcome = runner.try_get_result();
            thread::yield_now();
        }
        let outcome = outcome.unwrap().unwrap();

        let mut completed = 0;
        while let Some(message) = runner.poll_progress() {
            if matches!(message, ProgressMessage::GenerationComplete { .. }) {
                completed += 1;
            }
        }
        assert_eq!(completed, outcome.fitness_history.len());
        assert_ne!(outcome.termination, TerminationReason::Cancelled);

        assert!(matches!(runner.wait(), Err(DocGenomeError::Runner(_))));
    }

    #[test]
    fn test_cancel_still_yields_outcome() {
        let mut config = small_config();
        config.evolution.max_generations = 10_000;
        config.evolution.target_fitness = 1.0;

        let runner = EvolutionRunner::start(
            config,
            Collaborators::default(),
            TargetProfile::default(),
            "grant",
        )
        .unwrap();
        runner.cancel();
        assert!(runner.is_cancelled());

        let outcome = runner.wait().unwrap();
        assert_eq!(outcome.termination, TerminationReason::Cancelled);
        assert!(!outcome.artifact.header.is_empty());
    }
}
