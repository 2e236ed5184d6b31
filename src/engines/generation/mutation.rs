use crate::engines::generation::genome::{
    Genotype, MutationKind, MutationRecord, Role, ENCODING_RANGE,
};
use crate::engines::generation::vocabulary::random_gene;
use rand::Rng;

/// Cumulative probability bands for picking a mutation kind
const KIND_BANDS: [(f64, MutationKind); 5] = [
    (0.40, MutationKind::Point),
    (0.60, MutationKind::Insertion),
    (0.75, MutationKind::Deletion),
    (0.90, MutationKind::Duplication),
    (1.00, MutationKind::Inversion),
];

pub fn choose_kind<R: Rng>(rng: &mut R) -> MutationKind {
    let roll: f64 = rng.gen();
    KIND_BANDS
        .iter()
        .find(|(upper, _)| roll < *upper)
        .map(|(_, kind)| *kind)
        .unwrap_or(MutationKind::Inversion)
}

/// Mutate with probability `mutation_rate`; returns whether a record was appended
pub fn maybe_mutate<R: Rng>(genotype: &mut Genotype, mutation_rate: f64, rng: &mut R) -> bool {
    if rng.gen::<f64>() >= mutation_rate {
        return false;
    }
    let kind = choose_kind(rng);
    apply_mutation(genotype, kind, rng)
}

/// Apply one mutation of `kind`. Never fails; returns false for a no-op
pub fn apply_mutation<R: Rng>(genotype: &mut Genotype, kind: MutationKind, rng: &mut R) -> bool {
    let change = match kind {
        MutationKind::Point => point(genotype, rng),
        MutationKind::Insertion => insertion(genotype, rng),
        MutationKind::Deletion => deletion(genotype, rng),
        MutationKind::Duplication => duplication(genotype, rng),
        MutationKind::Inversion => inversion(genotype, rng),
    };

    match change {
        Some((position, before, after)) => {
            genotype.mutations.push(MutationRecord {
                kind,
                position,
                before,
                after,
                impact: rng.gen(),
                generation: genotype.generation,
            });
            genotype.invalidate_fitness();
            true
        }
        None => false,
    }
}

type Change = Option<(usize, String, String)>;

fn point<R: Rng>(genotype: &mut Genotype, rng: &mut R) -> Change {
    if genotype.genes.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..genotype.genes.len());
    let gene = &mut genotype.genes[index];
    if gene.encoding.is_empty() {
        return None;
    }
    let before = gene.encoding_marker();
    let slot = rng.gen_range(0..gene.encoding.len());
    gene.encoding[slot] = rng.gen_range(0..ENCODING_RANGE);
    Some((index, before, gene.encoding_marker()))
}

fn insertion<R: Rng>(genotype: &mut Genotype, rng: &mut R) -> Change {
    let role = if rng.gen_bool(0.8) {
        Some(Role::ALL[rng.gen_range(0..Role::ALL.len())])
    } else {
        None
    };
    let gene = random_gene(role, rng);
    let position = rng.gen_range(0..=genotype.genes.len());
    let after = gene.id.clone();
    genotype.genes.insert(position, gene);
    Some((position, String::new(), after))
}

fn deletion<R: Rng>(genotype: &mut Genotype, rng: &mut R) -> Change {
    if genotype.genes.len() < 2 {
        return None;
    }
    let position = rng.gen_range(0..genotype.genes.len());
    let removed = genotype.genes.remove(position);
    Some((position, removed.id, String::new()))
}

fn duplication<R: Rng>(genotype: &mut Genotype, rng: &mut R) -> Change {
    if genotype.genes.is_empty() {
        return None;
    }
    let position = rng.gen_range(0..genotype.genes.len());
    let mut copy = genotype.genes[position].clone();
    let before = copy.id.clone();

    let mut n = 1;
    while genotype.genes.iter().any(|g| g.id == format!("{}_dup{}", before, n)) {
        n += 1;
    }
    copy.id = format!("{}_dup{}", before, n);
    let after = copy.id.clone();
    genotype.genes.insert(position + 1, copy);
    Some((position, before, after))
}

fn inversion<R: Rng>(genotype: &mut Genotype, rng: &mut R) -> Change {
    let len = genotype.genes.len();
    if len < 2 {
        return None;
    }
    let start = rng.gen_range(0..len - 1);
    let end = rng.gen_range(start + 2..=len);
    let before = format!("{}..{}", genotype.genes[start].id, genotype.genes[end - 1].id);
    genotype.genes[start..end].reverse();
    let after = format!("{}..{}", genotype.genes[start].id, genotype.genes[end - 1].id);
    Some((start, before, after))
}
