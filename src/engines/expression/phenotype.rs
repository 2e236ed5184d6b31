use crate::engines::evaluation::features::ordered_share;
use crate::engines::evaluation::fitness::normalize_keywords;
use crate::engines::generation::genome::{Gene, GeneTrait, Role};
use crate::types::{StructureType, Tone};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Baseline classification when no expressed gene votes on an axis
pub const DEFAULT_STRUCTURE: StructureType = StructureType::Formal;
pub const DEFAULT_TONE: Tone = Tone::Professional;

const EMOTIVE_WORDS: &[&str] = &[
    "passion", "dream", "future", "community", "proud", "hope", "commit", "together", "vision",
    "mission", "trust", "care",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhenotypeMetrics {
    pub complexity: f64,
    pub keyword_density: f64,
    pub emotional_appeal: f64,
    pub logical_flow: f64,
}

/// Decoded classification and metrics of one genotype's expressed genes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phenotype {
    pub structure: StructureType,
    pub tone: Tone,
    pub metrics: PhenotypeMetrics,
}

impl Phenotype {
    pub fn from_expressed(expressed: &[&Gene], keywords: &HashSet<String>) -> Self {
        let structure = strongest(expressed, |t| match t {
            GeneTrait::Structure(s) => Some(s),
            _ => None,
        })
        .unwrap_or(DEFAULT_STRUCTURE);
        let tone = strongest(expressed, |t| match t {
            GeneTrait::Tone(tone) => Some(tone),
            _ => None,
        })
        .unwrap_or(DEFAULT_TONE);

        Self {
            structure,
            tone,
            metrics: compute_metrics(expressed, keywords, tone),
        }
    }
}

/// Axis value of the gene with the highest expression * dominance
fn strongest<T, F>(genes: &[&Gene], axis: F) -> Option<T>
where
    F: Fn(GeneTrait) -> Option<T>,
{
    let mut best: Option<(f64, T)> = None;
    for gene in genes {
        if let Some(value) = axis(gene.trait_axis) {
            let strength = gene.expression * gene.dominance;
            if best.as_ref().map_or(true, |(b, _)| strength > *b) {
                best = Some((strength, value));
            }
        }
    }
    best.map(|(_, value)| value)
}

fn compute_metrics(expressed: &[&Gene], keywords: &HashSet<String>, tone: Tone) -> PhenotypeMetrics {
    if expressed.is_empty() {
        return PhenotypeMetrics::default();
    }

    let tokens: Vec<String> = expressed
        .iter()
        .flat_map(|g| g.alleles.iter())
        .map(|t| t.to_lowercase())
        .collect();
    if tokens.is_empty() {
        return PhenotypeMetrics::default();
    }
    let total = tokens.len() as f64;

    let distinct: HashSet<&String> = tokens.iter().collect();
    let complexity = (distinct.len() as f64 / (expressed.len() as f64 * 4.0)).min(1.0);

    let keywords = normalize_keywords(keywords);
    let keyword_hits = tokens
        .iter()
        .filter(|t| keywords.iter().any(|k| t.contains(k.as_str())))
        .count();
    let keyword_density = keyword_hits as f64 / total;

    let emotive_hits = tokens
        .iter()
        .filter(|t| EMOTIVE_WORDS.iter().any(|w| t.contains(w)))
        .count();
    let tone_bonus = if tone == Tone::Passionate { 0.2 } else { 0.0 };
    let emotional_appeal = (emotive_hits as f64 / total * 4.0 + tone_bonus).min(1.0);

    let roles: Vec<Role> = expressed.iter().filter_map(|g| g.role()).collect();
    let logical_flow = ordered_share(&roles);

    PhenotypeMetrics {
        complexity,
        keyword_density,
        emotional_appeal,
        logical_flow,
    }
}
