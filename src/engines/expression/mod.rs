pub mod phenotype;
pub mod renderer;
pub mod expresser;

pub use phenotype::{Phenotype, PhenotypeMetrics};
pub use renderer::TemplateRenderer;
pub use expresser::{Expression, PhenotypeExpresser};
