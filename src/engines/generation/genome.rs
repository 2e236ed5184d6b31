//! Genotype representation for document evolution
//!
//! A genotype is an ordered sequence of [`Gene`]s. Each gene stands for one
//! unit of document content (an introduction, a problem statement, ...) and
//! carries interchangeable renderings of that content as alleles.
//!
//! Chromosomes are never stored. They are index ranges over the gene
//! sequence and are recomputed on demand by [`Genotype::chromosomes`], so
//! any operator that reorders, inserts or removes genes leaves no stale
//! structural state behind.

use crate::types::{StructureType, Tone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Width of a gene's numeric encoding
pub const ENCODING_WIDTH: usize = 8;
/// Exclusive upper bound of every encoding element
pub const ENCODING_RANGE: u8 = 4;
/// Telomere length of a generation-zero chromosome
pub const TELOMERE_BASE: u32 = 100;
/// Genes with dominance below this mark a recombination hotspot
pub const HOTSPOT_DOMINANCE: f64 = 0.3;

/// Conceptual roles a complete application document covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Introduction,
    Problem,
    Solution,
    Benefit,
    Plan,
}

impl Role {
    /// Canonical document order
    pub const ALL: [Role; 5] = [
        Role::Introduction,
        Role::Problem,
        Role::Solution,
        Role::Benefit,
        Role::Plan,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            Role::Introduction => "introduction",
            Role::Problem => "problem",
            Role::Solution => "solution",
            Role::Benefit => "benefit",
            Role::Plan => "plan",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Role::Introduction => "Introduction",
            Role::Problem => "Problem Statement",
            Role::Solution => "Proposed Solution",
            Role::Benefit => "Expected Benefits",
            Role::Plan => "Implementation Plan",
        }
    }

    /// First role whose keyword appears in a gene identifier
    pub fn from_gene_id(id: &str) -> Option<Role> {
        let id = id.to_lowercase();
        Role::ALL.into_iter().find(|role| id.contains(role.keyword()))
    }

    pub fn canonical_index(&self) -> usize {
        *self as usize
    }
}

/// Which classification axis, if any, a gene votes on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneTrait {
    Content,
    Structure(StructureType),
    Tone(Tone),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub id: String,
    pub alleles: Vec<String>,
    /// Bias toward the leading allele, in [0, 1]
    pub dominance: f64,
    /// Strength with which the gene shows up in the document, in [0, 1]
    pub expression: f64,
    /// Fixed-width encoding, only touched by point mutation
    pub encoding: Vec<u8>,
    pub trait_axis: GeneTrait,
}

impl Gene {
    pub fn new(id: impl Into<String>, alleles: Vec<String>, dominance: f64, expression: f64) -> Self {
        let id = id.into();
        let mut alleles: Vec<String> = alleles
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        if alleles.is_empty() {
            alleles.push(id.clone());
        }
        let encoding = encode_alleles(&alleles);

        Self {
            id,
            alleles,
            dominance: clamp_unit(dominance),
            expression: clamp_unit(expression),
            encoding,
            trait_axis: GeneTrait::Content,
        }
    }

    pub fn with_trait(mut self, trait_axis: GeneTrait) -> Self {
        self.trait_axis = trait_axis;
        self
    }

    pub fn set_expression(&mut self, expression: f64) {
        self.expression = clamp_unit(expression);
    }

    pub fn role(&self) -> Option<Role> {
        Role::from_gene_id(&self.id)
    }

    pub fn is_expressed(&self, threshold: f64) -> bool {
        self.expression > threshold
    }

    /// Allele picked by dominance: strong genes render their leading allele
    pub fn dominant_allele(&self) -> &str {
        let last = self.alleles.len().saturating_sub(1);
        let index = (((1.0 - self.dominance) * self.alleles.len() as f64) as usize).min(last);
        &self.alleles[index]
    }

    /// Share of "high" encoding elements, used as a GC-content analogue
    pub fn encoding_density(&self) -> f64 {
        if self.encoding.is_empty() {
            return 0.0;
        }
        let high = self
            .encoding
            .iter()
            .filter(|&&v| v >= ENCODING_RANGE / 2)
            .count();
        high as f64 / self.encoding.len() as f64
    }

    pub fn encoding_marker(&self) -> String {
        self.encoding.iter().map(|v| char::from(b'0' + v)).collect()
    }
}

/// Deterministic fixed-width encoding of allele text
pub fn encode_alleles(alleles: &[String]) -> Vec<u8> {
    let mut encoding = vec![0u8; ENCODING_WIDTH];
    for (i, byte) in alleles.iter().flat_map(|a| a.bytes()).enumerate() {
        let slot = i % ENCODING_WIDTH;
        encoding[slot] = ((encoding[slot] as u32 + byte as u32) % ENCODING_RANGE as u32) as u8;
    }
    encoding
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Derived grouping of a contiguous gene range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chromosome {
    pub range: Range<usize>,
    pub telomere_length: u32,
    /// Absolute gene indices favoured for recombination
    pub hotspots: Vec<usize>,
}

impl Chromosome {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    Point,
    Insertion,
    Deletion,
    Duplication,
    Inversion,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationKind::Point => "point",
            MutationKind::Insertion => "insertion",
            MutationKind::Deletion => "deletion",
            MutationKind::Duplication => "duplication",
            MutationKind::Inversion => "inversion",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub position: usize,
    pub before: String,
    pub after: String,
    /// Reporting-only impact score in [0, 1]
    pub impact: f64,
    pub generation: usize,
}

impl MutationRecord {
    /// Mutations above this impact count as beneficial for novelty scoring
    pub const BENEFICIAL_IMPACT: f64 = 0.5;

    pub fn is_beneficial(&self) -> bool {
        self.impact >= Self::BENEFICIAL_IMPACT
    }
}

/// Environmental marks recorded by the last epigenetic pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EpigeneticMarks {
    pub methylation: f64,
    pub histone: f64,
}

/// One candidate document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genotype {
    pub id: String,
    pub genes: Vec<Gene>,
    /// `None` until evaluated; cleared whenever the genes change
    pub fitness: Option<f64>,
    pub generation: usize,
    pub mutations: Vec<MutationRecord>,
    pub marks: EpigeneticMarks,
    pub parents: Vec<String>,
}

impl Genotype {
    pub fn new(id: impl Into<String>, genes: Vec<Gene>, generation: usize) -> Self {
        Self {
            id: id.into(),
            genes,
            fitness: None,
            generation,
            mutations: Vec::new(),
            marks: EpigeneticMarks::default(),
            parents: Vec::new(),
        }
    }

    /// Deep copy under a new identifier with stale fitness
    pub fn clone_as(&self, id: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.id = id.into();
        copy.fitness = None;
        copy.parents = vec![self.id.clone()];
        copy
    }

    pub fn fitness_or_zero(&self) -> f64 {
        self.fitness.unwrap_or(0.0)
    }

    pub fn invalidate_fitness(&mut self) {
        self.fitness = None;
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn gene_ids(&self) -> impl Iterator<Item = &str> {
        self.genes.iter().map(|g| g.id.as_str())
    }

    pub fn allele_tokens(&self) -> impl Iterator<Item = &String> {
        self.genes.iter().flat_map(|g| g.alleles.iter())
    }

    /// Pieces of the identifier that survive cloning, e.g. `seed0` in `seed0-g3-00012`
    pub fn id_fragments(&self) -> Vec<&str> {
        self.id
            .split(|c: char| c == '-' || c == '_')
            .filter(|f| !f.is_empty() && !is_counter_fragment(f))
            .collect()
    }

    /// Chunk the gene sequence into chromosomes of `chunk_size` genes
    pub fn chromosomes(&self, chunk_size: usize) -> Vec<Chromosome> {
        let chunk_size = chunk_size.max(1);
        let telomere_length = TELOMERE_BASE.saturating_sub(self.generation as u32);

        (0..self.genes.len())
            .step_by(chunk_size)
            .map(|start| {
                let end = (start + chunk_size).min(self.genes.len());
                let hotspots = (start..end)
                    .filter(|&i| self.genes[i].dominance < HOTSPOT_DOMINANCE)
                    .collect();
                Chromosome {
                    range: start..end,
                    telomere_length,
                    hotspots,
                }
            })
            .collect()
    }

    pub fn beneficial_mutations(&self) -> impl Iterator<Item = &MutationRecord> {
        self.mutations.iter().filter(|m| m.is_beneficial())
    }
}

/// Generation and serial fragments such as `g3` and `00012`
fn is_counter_fragment(fragment: &str) -> bool {
    let digits = fragment.strip_prefix('g').unwrap_or(fragment);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Deterministic genotype identifiers
#[derive(Debug, Clone, Default)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, origin: &str, generation: usize) -> String {
        let serial = self.next;
        self.next += 1;
        format!("{}-g{}-{:05}", origin, generation, serial)
    }

    /// Keep the origin fragment of an existing id and issue a fresh serial
    pub fn derive_id(&mut self, parent_id: &str, generation: usize) -> String {
        let origin = parent_id.split('-').next().unwrap_or("x");
        self.next_id(origin, generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gene(id: &str, dominance: f64) -> Gene {
        Gene::new(id, vec!["growth".to_string()], dominance, 0.6)
    }

    #[test]
    fn test_gene_invariants_are_clamped() {
        let g = Gene::new("introduction", vec![], 1.7, -0.3);

        assert_eq!(g.alleles, vec!["introduction".to_string()]);
        assert_eq!(g.dominance, 1.0);
        assert_eq!(g.expression, 0.0);
        assert_eq!(g.encoding.len(), ENCODING_WIDTH);
        assert!(g.encoding.iter().all(|&v| v < ENCODING_RANGE));
    }

    #[test]
    fn test_role_from_gene_id() {
        assert_eq!(Role::from_gene_id("problem_statement"), Some(Role::Problem));
        assert_eq!(Role::from_gene_id("Plan_dup1"), Some(Role::Plan));
        assert_eq!(Role::from_gene_id("tone_marker"), None);
    }

    #[test]
    fn test_dominant_allele_prefers_leading_allele() {
        let mut g = Gene::new(
            "solution",
            vec!["first".to_string(), "second".to_string()],
            1.0,
            0.5,
        );
        assert_eq!(g.dominant_allele(), "first");
        g.dominance = 0.0;
        assert_eq!(g.dominant_allele(), "second");
    }

    #[test]
    fn test_chromosomes_are_derived_chunks() {
        let genes = (0..7).map(|i| gene(&format!("g{}", i), 0.5)).collect();
        let mut genotype = Genotype::new("seed0-g0-00000", genes, 3);
        genotype.genes[5].dominance = 0.1;

        let chromosomes = genotype.chromosomes(3);
        assert_eq!(chromosomes.len(), 3);
        assert_eq!(chromosomes[0].range, 0..3);
        assert_eq!(chromosomes[2].range, 6..7);
        assert_eq!(chromosomes[1].hotspots, vec![5]);
        assert_eq!(chromosomes[0].telomere_length, TELOMERE_BASE - 3);

        genotype.genes.truncate(2);
        assert_eq!(genotype.chromosomes(3).len(), 1);
    }

    #[test]
    fn test_clone_as_marks_stale_fitness() {
        let mut parent = Genotype::new("seed1-g0-00001", vec![gene("plan", 0.5)], 0);
        parent.fitness = Some(0.7);

        let child = parent.clone_as("seed1-g1-00002");
        assert_eq!(child.fitness, None);
        assert_eq!(child.parents, vec!["seed1-g0-00001".to_string()]);
        assert_eq!(child.genes, parent.genes);
    }

    #[test]
    fn test_id_sequence_and_fragments() {
        let mut ids = IdSequence::new();
        let first = ids.next_id("random", 0);
        let derived = ids.derive_id(&first, 4);

        assert_eq!(first, "random-g0-00000");
        assert_eq!(derived, "random-g4-00001");

        let genotype = Genotype::new(derived, vec![], 4);
        assert_eq!(genotype.id_fragments(), vec!["random"]);
    }
}
