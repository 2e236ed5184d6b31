use crate::engines::generation::genome::{Gene, GeneTrait, Genotype, IdSequence, Role};
use crate::types::{StructureType, Tone};
use rand::seq::SliceRandom;
use rand::Rng;

/// Tokens any synthesized gene may draw from
pub const GENERIC_VOCABULARY: &[&str] = &[
    "innovation",
    "efficiency",
    "growth",
    "productivity",
    "digitalization",
    "sustainability",
    "quality",
    "collaboration",
    "competitiveness",
    "employment",
];

pub fn role_vocabulary(role: Role) -> &'static [&'static str] {
    match role {
        Role::Introduction => &["company", "mission", "background", "vision", "overview"],
        Role::Problem => &["challenge", "bottleneck", "shortage", "cost", "risk"],
        Role::Solution => &["system", "automation", "platform", "process", "equipment"],
        Role::Benefit => &["revenue", "savings", "impact", "market", "jobs"],
        Role::Plan => &["timeline", "milestone", "budget", "schedule", "team"],
    }
}

/// Draw `count` distinct tokens from the role and generic vocabularies
pub fn random_alleles<R: Rng>(role: Option<Role>, count: usize, rng: &mut R) -> Vec<String> {
    let mut pool: Vec<&str> = GENERIC_VOCABULARY.to_vec();
    if let Some(role) = role {
        pool.extend_from_slice(role_vocabulary(role));
    }
    pool.shuffle(rng);
    pool.into_iter()
        .take(count.max(1))
        .map(str::to_string)
        .collect()
}

/// Synthesize a content gene; the id carries the role keyword when one is given
pub fn random_gene<R: Rng>(role: Option<Role>, rng: &mut R) -> Gene {
    let suffix: u16 = rng.gen();
    let id = match role {
        Some(role) => format!("{}_{:04x}", role.keyword(), suffix),
        None => format!("aux_{:04x}", suffix),
    };
    let allele_count = rng.gen_range(1..=4);
    let alleles = random_alleles(role, allele_count, rng);
    Gene::new(id, alleles, rng.gen(), rng.gen_range(0.3..=1.0))
}

pub fn random_structure_gene<R: Rng>(rng: &mut R) -> Gene {
    let structure = *StructureType::ALL.choose(rng).unwrap_or(&StructureType::Formal);
    Gene::new(
        format!("structure_{}", structure),
        vec![structure.to_string()],
        rng.gen(),
        rng.gen_range(0.3..=1.0),
    )
    .with_trait(GeneTrait::Structure(structure))
}

pub fn random_tone_gene<R: Rng>(rng: &mut R) -> Gene {
    let tone = *Tone::ALL.choose(rng).unwrap_or(&Tone::Professional);
    Gene::new(
        format!("tone_{}", tone),
        vec![tone.to_string()],
        rng.gen(),
        rng.gen_range(0.3..=1.0),
    )
    .with_trait(GeneTrait::Tone(tone))
}

/// Fully random genotype: each role with probability 0.7, plus one structure and one tone gene
pub fn random_genotype<R: Rng>(ids: &mut IdSequence, generation: usize, rng: &mut R) -> Genotype {
    let mut genes = Vec::with_capacity(Role::ALL.len() + 2);
    for role in Role::ALL {
        if rng.gen_bool(0.7) {
            genes.push(random_gene(Some(role), rng));
        }
    }
    if genes.is_empty() {
        genes.push(random_gene(None, rng));
    }
    genes.push(random_structure_gene(rng));
    genes.push(random_tone_gene(rng));

    Genotype::new(ids.next_id("random", generation), genes, generation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_gene_carries_role() {
        let mut rng = StdRng::seed_from_u64(1);
        let gene = random_gene(Some(Role::Benefit), &mut rng);

        assert_eq!(gene.role(), Some(Role::Benefit));
        assert!(!gene.alleles.is_empty() && gene.alleles.len() <= 4);
        assert!(gene.expression >= 0.3 && gene.expression <= 1.0);
    }

    #[test]
    fn test_random_genotype_has_classifier_genes() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut ids = IdSequence::new();

        for _ in 0..20 {
            let genotype = random_genotype(&mut ids, 0, &mut rng);
            assert!(genotype.len() >= 3);
            assert!(genotype
                .genes
                .iter()
                .any(|g| matches!(g.trait_axis, GeneTrait::Structure(_))));
            assert!(genotype
                .genes
                .iter()
                .any(|g| matches!(g.trait_axis, GeneTrait::Tone(_))));
        }
    }
}
