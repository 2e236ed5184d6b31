pub mod features;
pub mod fitness;

pub use features::{GenotypeFeatures, FEATURE_COUNT};
pub use fitness::{FitnessBreakdown, FitnessEvaluator, NEUTRAL_SUCCESS};
