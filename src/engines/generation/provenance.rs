use crate::config::ExpressionConfig;
use crate::engines::generation::genome::{Genotype, MutationKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Notable trait of the winning genotype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Adaptation {
    HighExpression {
        gene_id: String,
        expression: f64,
    },
    HighImpactMutation {
        kind: MutationKind,
        position: usize,
        impact: f64,
        generation: usize,
    },
}

impl Adaptation {
    pub fn describe(&self) -> String {
        match self {
            Adaptation::HighExpression { gene_id, expression } => {
                format!("gene '{}' strongly expressed ({:.2})", gene_id, expression)
            }
            Adaptation::HighImpactMutation {
                kind,
                position,
                impact,
                generation,
            } => format!(
                "{} mutation at position {} in generation {} (impact {:.2})",
                kind, position, generation, impact
            ),
        }
    }
}

/// High-expression genes first, then high-impact mutations in log order
pub fn notable_adaptations(best: &Genotype, config: &ExpressionConfig) -> Vec<Adaptation> {
    let genes = best
        .genes
        .iter()
        .filter(|g| g.expression >= config.high_expression_threshold)
        .map(|g| Adaptation::HighExpression {
            gene_id: g.id.clone(),
            expression: g.expression,
        });
    let mutations = best
        .mutations
        .iter()
        .filter(|m| m.impact >= config.high_impact_threshold)
        .map(|m| Adaptation::HighImpactMutation {
            kind: m.kind,
            position: m.position,
            impact: m.impact,
            generation: m.generation,
        });
    genes.chain(mutations).collect()
}

/// Ancestors of `best`: its direct parents, then any candidate sharing a gene id or id fragment
pub fn trace_lineage(best: &Genotype, candidates: &[Genotype], max_entries: usize) -> Vec<String> {
    let gene_ids: HashSet<&str> = best.gene_ids().collect();
    let fragments: HashSet<&str> = best.id_fragments().into_iter().collect();

    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(best.id.as_str());
    let mut lineage = Vec::new();

    for parent in &best.parents {
        if seen.insert(parent.as_str()) {
            lineage.push(parent.clone());
        }
    }

    for candidate in candidates {
        if lineage.len() >= max_entries {
            break;
        }
        if seen.contains(candidate.id.as_str()) {
            continue;
        }
        let shares_gene = candidate.gene_ids().any(|id| gene_ids.contains(id));
        let shares_fragment = candidate
            .id_fragments()
            .iter()
            .any(|f| fragments.contains(f));
        if shares_gene || shares_fragment {
            seen.insert(candidate.id.as_str());
            lineage.push(candidate.id.clone());
        }
    }

    lineage.truncate(max_entries);
    lineage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::genome::{Gene, MutationRecord};

    fn genotype(id: &str, gene_ids: &[&str]) -> Genotype {
        let genes = gene_ids
            .iter()
            .map(|g| Gene::new(*g, vec!["growth".to_string()], 0.5, 0.6))
            .collect();
        Genotype::new(id, genes, 0)
    }

    #[test]
    fn test_lineage_by_gene_and_fragment() {
        let mut best = genotype("seed0-g4-00040", &["introduction", "plan_ab12"]);
        best.parents = vec!["seed0-g3-00031".to_string(), "random-g3-00032".to_string()];

        let candidates = vec![
            genotype("seed0-g0-00000", &["problem"]),
            genotype("random-g0-00003", &["plan_ab12"]),
            genotype("random-g0-00004", &["benefit"]),
            genotype("seed0-g3-00031", &["introduction"]),
        ];

        let lineage = trace_lineage(&best, &candidates, 10);
        assert_eq!(
            lineage,
            vec![
                "seed0-g3-00031".to_string(),
                "random-g3-00032".to_string(),
                "seed0-g0-00000".to_string(),
                "random-g0-00003".to_string(),
            ]
        );
        assert_eq!(trace_lineage(&best, &candidates, 1).len(), 1);
    }

    #[test]
    fn test_adaptations() {
        let mut best = genotype("x-g1-00001", &["introduction", "plan"]);
        best.genes[0].expression = 0.9;
        best.mutations.push(MutationRecord {
            kind: MutationKind::Duplication,
            position: 1,
            before: "plan".to_string(),
            after: "plan_dup1".to_string(),
            impact: 0.75,
            generation: 1,
        });
        best.mutations.push(MutationRecord {
            kind: MutationKind::Point,
            position: 0,
            before: String::new(),
            after: String::new(),
            impact: 0.1,
            generation: 1,
        });

        let adaptations = notable_adaptations(&best, &ExpressionConfig::default());
        assert_eq!(adaptations.len(), 2);
        assert!(adaptations[0].describe().contains("introduction"));
        assert!(matches!(
            adaptations[1],
            Adaptation::HighImpactMutation {
                kind: MutationKind::Duplication,
                ..
            }
        ));
    }
}
