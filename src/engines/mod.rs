pub mod evaluation;
pub mod expression;
pub mod generation;
