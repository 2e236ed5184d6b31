//! Generation-dependent modulation of gene expression.
//!
//! The modulator never touches gene identity, alleles or count. It only
//! rescales `expression`, which the phenotype expresser reads later, so a
//! genotype's fitness is unaffected by it.

use crate::engines::generation::genome::{EpigeneticMarks, Genotype};

/// External pressure for one generation, both components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub methylation: f64,
    pub histone: f64,
}

impl Environment {
    pub fn at_generation(generation: usize) -> Self {
        let g = generation as f64;
        Self {
            methylation: 0.5 + 0.5 * (g * 0.3).sin(),
            histone: 0.5 + 0.5 * (g * 0.2).cos(),
        }
    }
}

/// Apply one modulation pass and record the mean effects as marks
pub fn modulate(genotype: &mut Genotype, environment: Environment) {
    if genotype.genes.is_empty() {
        genotype.marks = EpigeneticMarks::default();
        return;
    }

    let mut methylation_total = 0.0;
    let mut histone_total = 0.0;

    for gene in genotype.genes.iter_mut() {
        // Dense encodings methylate more; dominant genes attract activating marks
        let methylation_effect =
            environment.methylation * gene.encoding_density() * (1.0 - gene.dominance);
        let histone_effect = environment.histone * gene.dominance;

        let expression =
            gene.expression * (1.0 - methylation_effect * 0.5) * (1.0 + histone_effect * 0.3);
        gene.set_expression(expression);

        methylation_total += methylation_effect;
        histone_total += histone_effect;
    }

    let n = genotype.genes.len() as f64;
    genotype.marks = EpigeneticMarks {
        methylation: methylation_total / n,
        histone: histone_total / n,
    };
}
