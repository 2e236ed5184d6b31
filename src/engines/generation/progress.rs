use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Per-generation observer; purely passive
pub trait ProgressCallback: Send {
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64);
}

/// No-op observer
impl ProgressCallback for () {
    fn on_generation_complete(&mut self, _generation: usize, _best_fitness: f64) {}
}

impl<F> ProgressCallback for F
where
    F: FnMut(usize, f64) + Send,
{
    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64) {
        self(generation, best_fitness)
    }
}

pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        log::debug!("Generation {} starting...", generation);
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64) {
        log::info!(
            "Generation {} complete. Best fitness: {:.4}",
            generation, best_fitness
        );
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete { generation: usize, best_fitness: f64 },
}

// For reporting from a worker thread
pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            generation,
            best_fitness,
        });
    }
}

/// Cooperative cancellation, checked between generations
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
