use crate::engines::evaluation::fitness::{keyword_coverage, profile_relevance, structural_completeness};
use crate::engines::generation::genome::{GeneTrait, Genotype, Role};
use crate::types::TargetProfile;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const FEATURE_COUNT: usize = 16;

/// Fixed-length numeric summary of a genotype's structure
///
/// Every feature is in [0, 1]. Expression levels are not part of the vector,
/// so the epigenetic pass cannot change a prediction.
///
/// | index | feature |
/// |-------|---------|
/// | 0 | gene count (saturates at 20) |
/// | 1 | share of content genes |
/// | 2 | role coverage |
/// | 3 | distinct allele tokens per gene slot |
/// | 4 | mean alleles per gene (saturates at 4) |
/// | 5 | keyword coverage |
/// | 6 | profile relevance |
/// | 7 | has a structure gene |
/// | 8 | mean dominance |
/// | 9 | dominance spread |
/// | 10 | mutation count (saturates at 10) |
/// | 11 | share of beneficial mutations |
/// | 12 | share of duplicated genes |
/// | 13 | has a tone gene |
/// | 14 | mean encoding density |
/// | 15 | share of role genes in canonical order |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenotypeFeatures([f64; FEATURE_COUNT]);

impl GenotypeFeatures {
    pub fn zeros() -> Self {
        Self([0.0; FEATURE_COUNT])
    }

    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values.map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }))
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn extract(genotype: &Genotype, keywords: &HashSet<String>, profile: &TargetProfile) -> Self {
        let genes = &genotype.genes;
        if genes.is_empty() {
            return Self::zeros();
        }
        let n = genes.len() as f64;

        let content = genes
            .iter()
            .filter(|g| g.trait_axis == GeneTrait::Content)
            .count() as f64;
        let distinct_tokens: HashSet<String> =
            genotype.allele_tokens().map(|t| t.to_lowercase()).collect();
        let allele_total: usize = genes.iter().map(|g| g.alleles.len()).sum();

        let mean_dominance = genes.iter().map(|g| g.dominance).sum::<f64>() / n;
        let variance = genes
            .iter()
            .map(|g| (g.dominance - mean_dominance).powi(2))
            .sum::<f64>()
            / n;

        let mutation_count = genotype.mutations.len();
        let beneficial = genotype.beneficial_mutations().count();
        let duplicates = genes.iter().filter(|g| g.id.contains("_dup")).count() as f64;

        let mut values = [0.0; FEATURE_COUNT];
        values[0] = (n / 20.0).min(1.0);
        values[1] = content / n;
        values[2] = structural_completeness(genotype);
        values[3] = (distinct_tokens.len() as f64 / (n * 4.0)).min(1.0);
        values[4] = (allele_total as f64 / n / 4.0).min(1.0);
        values[5] = keyword_coverage(genotype, keywords);
        values[6] = profile_relevance(genotype, profile);
        values[7] = flag(genes.iter().any(|g| matches!(g.trait_axis, GeneTrait::Structure(_))));
        values[8] = mean_dominance;
        values[9] = (variance.sqrt() * 2.0).min(1.0);
        values[10] = (mutation_count as f64 / 10.0).min(1.0);
        values[11] = if mutation_count == 0 {
            0.0
        } else {
            beneficial as f64 / mutation_count as f64
        };
        values[12] = duplicates / n;
        values[13] = flag(genes.iter().any(|g| matches!(g.trait_axis, GeneTrait::Tone(_))));
        values[14] = genes.iter().map(|g| g.encoding_density()).sum::<f64>() / n;
        values[15] = role_order(genotype);

        Self::from_values(values)
    }
}

fn flag(present: bool) -> f64 {
    if present {
        1.0
    } else {
        0.0
    }
}

/// Share of adjacent role genes that follow canonical document order
pub fn role_order(genotype: &Genotype) -> f64 {
    let roles: Vec<Role> = genotype.genes.iter().filter_map(|g| g.role()).collect();
    ordered_share(&roles)
}

/// Share of adjacent pairs that are non-decreasing; a single role counts as ordered
pub fn ordered_share(roles: &[Role]) -> f64 {
    if roles.len() < 2 {
        return if roles.is_empty() { 0.0 } else { 1.0 };
    }
    let ordered = roles.windows(2).filter(|w| w[0] <= w[1]).count();
    ordered as f64 / (roles.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::genome::Gene;

    fn gene(id: &str, token: &str) -> Gene {
        Gene::new(id, vec![token.to_string()], 0.5, 0.5)
    }

    #[test]
    fn test_empty_genotype_features_are_zero() {
        let g = Genotype::new("x-g0-00000", vec![], 0);
        let features = GenotypeFeatures::extract(&g, &HashSet::new(), &TargetProfile::default());
        assert_eq!(features, GenotypeFeatures::zeros());
    }

    #[test]
    fn test_features_are_bounded() {
        let genes = vec![
            gene("introduction", "growth"),
            gene("plan", "timeline"),
            gene("problem", "manufacturing"),
            gene("plan_dup1", "timeline"),
        ];
        let g = Genotype::new("x-g0-00000", genes, 0);
        let keywords: HashSet<String> = ["growth".to_string()].into_iter().collect();
        let profile = TargetProfile::new("manufacturing", vec![]);

        let features = GenotypeFeatures::extract(&g, &keywords, &profile);
        assert!(features.values().iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(features.values()[5], 1.0);
        assert_eq!(features.values()[6], 0.25);
        assert_eq!(features.values()[12], 0.25);
    }

    #[test]
    fn test_role_order() {
        let ordered = Genotype::new(
            "x",
            vec![gene("introduction", "a"), gene("solution", "b"), gene("plan", "c")],
            0,
        );
        let reversed = Genotype::new(
            "x",
            vec![gene("plan", "a"), gene("solution", "b"), gene("introduction", "c")],
            0,
        );
        assert_eq!(role_order(&ordered), 1.0);
        assert_eq!(role_order(&reversed), 0.0);
    }
}
