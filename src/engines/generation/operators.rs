use crate::engines::generation::genome::{Genotype, IdSequence};
use rand::Rng;
use std::cmp::Ordering;

/// Sort descending by fitness; equal fitness keeps insertion order
pub fn sort_by_fitness(population: &mut [Genotype]) {
    population.sort_by(|a, b| {
        b.fitness_or_zero()
            .partial_cmp(&a.fitness_or_zero())
            .unwrap_or(Ordering::Equal)
    });
}

/// Elitism: top `elite_count` genotypes, copied unchanged
pub fn select_elites(population: &[Genotype], elite_count: usize) -> Vec<Genotype> {
    let mut ranked: Vec<&Genotype> = population.iter().collect();
    ranked.sort_by(|a, b| {
        b.fitness_or_zero()
            .partial_cmp(&a.fitness_or_zero())
            .unwrap_or(Ordering::Equal)
    });
    ranked.into_iter().take(elite_count).cloned().collect()
}

/// Tournament selection: pick best of K random candidates, sampled with replacement
pub fn tournament_selection<'a, R: Rng>(
    population: &'a [Genotype],
    tournament_size: usize,
    rng: &mut R,
) -> &'a Genotype {
    let mut best_idx = rng.gen_range(0..population.len());
    let mut best_fitness = population[best_idx].fitness_or_zero();

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..population.len());
        if population[idx].fitness_or_zero() > best_fitness {
            best_idx = idx;
            best_fitness = population[idx].fitness_or_zero();
        }
    }

    &population[best_idx]
}

/// Fill a parent pool of `pool_size` tournament winners
pub fn select_parent_pool<R: Rng>(
    population: &[Genotype],
    pool_size: usize,
    tournament_size: usize,
    rng: &mut R,
) -> Vec<Genotype> {
    if population.is_empty() {
        return Vec::new();
    }
    (0..pool_size)
        .map(|_| tournament_selection(population, tournament_size, rng).clone())
        .collect()
}

/// Uniform gene-level crossover
///
/// At every index up to the longer parent a fair coin decides whether the
/// children inherit straight or swapped. A parent that is too short at an
/// index contributes nothing there, so neither child can outgrow the longer
/// parent.
pub fn crossover<R: Rng>(
    parent_a: &Genotype,
    parent_b: &Genotype,
    ids: &mut IdSequence,
    rng: &mut R,
) -> (Genotype, Genotype) {
    let generation = parent_a.generation.max(parent_b.generation) + 1;
    let len = parent_a.genes.len().max(parent_b.genes.len());

    let mut genes_a = Vec::with_capacity(len);
    let mut genes_b = Vec::with_capacity(len);

    for i in 0..len {
        let (from_a, from_b) = if rng.gen_bool(0.5) {
            (parent_a.genes.get(i), parent_b.genes.get(i))
        } else {
            (parent_b.genes.get(i), parent_a.genes.get(i))
        };
        if let Some(gene) = from_a {
            genes_a.push(gene.clone());
        }
        if let Some(gene) = from_b {
            genes_b.push(gene.clone());
        }
    }

    let parents = vec![parent_a.id.clone(), parent_b.id.clone()];
    let mut child_a = Genotype::new(ids.derive_id(&parent_a.id, generation), genes_a, generation);
    let mut child_b = Genotype::new(ids.derive_id(&parent_b.id, generation), genes_b, generation);
    child_a.parents = parents.clone();
    child_b.parents = parents;

    (child_a, child_b)
}

/// Verbatim copy with a new identifier, for pairs that skip crossover
pub fn reproduce(parent: &Genotype, ids: &mut IdSequence) -> Genotype {
    let generation = parent.generation + 1;
    let mut child = parent.clone_as(ids.derive_id(&parent.id, generation));
    child.generation = generation;
    child
}

/// Pair up the parent pool; pairs cross with `crossover_rate`, an odd last entry is cloned alone
pub fn recombine<R: Rng>(
    parent_pool: &[Genotype],
    crossover_rate: f64,
    ids: &mut IdSequence,
    rng: &mut R,
) -> Vec<Genotype> {
    let mut offspring = Vec::with_capacity(parent_pool.len());

    for pair in parent_pool.chunks(2) {
        match pair {
            [a, b] => {
                if rng.gen::<f64>() < crossover_rate {
                    let (child_a, child_b) = crossover(a, b, ids, rng);
                    offspring.push(child_a);
                    offspring.push(child_b);
                } else {
                    offspring.push(reproduce(a, ids));
                    offspring.push(reproduce(b, ids));
                }
            }
            [single] => offspring.push(reproduce(single, ids)),
            _ => {}
        }
    }

    offspring
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::genome::Gene;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn genotype(id: &str, gene_count: usize, fitness: f64) -> Genotype {
        let genes = (0..gene_count)
            .map(|i| Gene::new(format!("{}_{}", id, i), vec!["growth".to_string()], 0.5, 0.5))
            .collect();
        let mut g = Genotype::new(id, genes, 0);
        g.fitness = Some(fitness);
        g
    }

    #[test]
    fn test_elites_are_top_by_fitness_stable() {
        let population = vec![
            genotype("a", 2, 0.3),
            genotype("b", 2, 0.9),
            genotype("c", 2, 0.9),
            genotype("d", 2, 0.1),
        ];

        let elites = select_elites(&population, 2);
        let ids: Vec<_> = elites.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert_eq!(elites[0].fitness, Some(0.9));
    }

    #[test]
    fn test_tournament_prefers_fitter() {
        let population = vec![genotype("weak", 1, 0.1), genotype("strong", 1, 0.9)];
        let mut rng = StdRng::seed_from_u64(5);

        let wins = (0..200)
            .filter(|_| tournament_selection(&population, 5, &mut rng).id == "strong")
            .count();
        assert!(wins > 180);
    }

    #[test]
    fn test_parent_pool_size() {
        let population: Vec<_> = (0..6).map(|i| genotype(&format!("p{}", i), 2, 0.1 * i as f64)).collect();
        let mut rng = StdRng::seed_from_u64(9);

        assert_eq!(select_parent_pool(&population, 7, 3, &mut rng).len(), 7);
    }

    #[test]
    fn test_crossover_gene_count_bound() {
        let mut ids = IdSequence::new();
        let a = genotype("seed0", 5, 0.5);
        let mut b = genotype("random", 2, 0.5);
        b.generation = 3;

        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (child_a, child_b) = crossover(&a, &b, &mut ids, &mut rng);

            assert!(child_a.len() <= 5 && child_b.len() <= 5);
            assert_eq!(child_a.len() + child_b.len(), 7);
            assert_eq!(child_a.generation, 4);
            assert_eq!(child_a.fitness, None);
            assert_eq!(child_b.parents, vec!["seed0".to_string(), "random".to_string()]);
        }
    }

    #[test]
    fn test_recombine_odd_pool_keeps_size() {
        let pool: Vec<_> = (0..5).map(|i| genotype(&format!("p{}", i), 3, 0.5)).collect();
        let mut ids = IdSequence::new();
        let mut rng = StdRng::seed_from_u64(3);

        let offspring = recombine(&pool, 1.0, &mut ids, &mut rng);
        assert_eq!(offspring.len(), 5);
        assert_eq!(offspring[4].genes, pool[4].genes);
        assert_ne!(offspring[4].id, pool[4].id);
    }

    #[test]
    fn test_recombine_without_crossover_clones() {
        let pool: Vec<_> = (0..4).map(|i| genotype(&format!("p{}", i), 3, 0.5)).collect();
        let mut ids = IdSequence::new();
        let mut rng = StdRng::seed_from_u64(3);

        let offspring = recombine(&pool, 0.0, &mut ids, &mut rng);
        for (child, parent) in offspring.iter().zip(&pool) {
            assert_eq!(child.genes, parent.genes);
            assert_eq!(child.generation, parent.generation + 1);
        }
    }
}
