pub mod traits;
pub mod evolution;
pub mod fitness;
pub mod expression;
pub mod manager;

pub use manager::{AppConfig, ConfigManager};
pub use evolution::EvolutionConfig;
pub use fitness::FitnessConfig;
pub use expression::ExpressionConfig;
pub use traits::ConfigSection;
