pub mod genome;
pub mod vocabulary;
pub mod seed_adapter;
pub mod operators;
pub mod mutation;
pub mod epigenetics;
pub mod provenance;
pub mod progress;
pub mod evolution_engine;

pub use genome::{
    Chromosome, EpigeneticMarks, Gene, GeneTrait, Genotype, IdSequence, MutationKind,
    MutationRecord, Role,
};
pub use evolution_engine::{
    Collaborators, EvolutionEngine, EvolutionOutcome, EvolutionState, TerminationReason,
};
pub use progress::{
    CancellationToken, ChannelProgressCallback, ConsoleProgressCallback, ProgressCallback,
    ProgressMessage,
};
pub use provenance::Adaptation;
pub use seed_adapter::SeedCorpusAdapter;
