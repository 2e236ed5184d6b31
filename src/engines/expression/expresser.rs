use crate::collaborators::SectionRenderer;
use crate::config::ExpressionConfig;
use crate::engines::expression::phenotype::Phenotype;
use crate::engines::generation::genome::{Gene, GeneTrait, Genotype, Role};
use crate::types::{Artifact, Section, StructureType, TargetProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Decoded document together with its phenotype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub artifact: Artifact,
    pub phenotype: Phenotype,
}

/// Decodes a genotype's expressed genes into a sectioned document
pub struct PhenotypeExpresser {
    renderer: Arc<dyn SectionRenderer>,
    config: ExpressionConfig,
    keywords: HashSet<String>,
}

impl PhenotypeExpresser {
    pub fn new(renderer: Arc<dyn SectionRenderer>, config: ExpressionConfig) -> Self {
        Self {
            renderer,
            config,
            keywords: HashSet::new(),
        }
    }

    /// Domain keywords used for the keyword-density metric
    pub fn with_keywords(mut self, keywords: HashSet<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn expressed_genes<'a>(&self, genotype: &'a Genotype) -> Vec<&'a Gene> {
        genotype
            .genes
            .iter()
            .filter(|g| g.is_expressed(self.config.expression_threshold))
            .collect()
    }

    pub fn express(&self, genotype: &Genotype, profile: &TargetProfile) -> Expression {
        let expressed = self.expressed_genes(genotype);
        let phenotype = Phenotype::from_expressed(&expressed, &self.keywords);

        let mut sections: Vec<(Option<Role>, Section)> = expressed
            .iter()
            .filter(|g| g.trait_axis == GeneTrait::Content)
            .filter_map(|gene| {
                let body = self.renderer.render_section(gene, &phenotype, profile);
                if body.trim().is_empty() {
                    log::debug!("Renderer produced no text for gene '{}', skipping", gene.id);
                    return None;
                }
                Some((
                    gene.role(),
                    Section {
                        gene_id: gene.id.clone(),
                        title: section_title(gene),
                        body: body.trim().to_string(),
                    },
                ))
            })
            .collect();

        if phenotype.structure == StructureType::Formal {
            // Stable: unroled genes keep their relative order after the canonical roles
            sections.sort_by_key(|(role, _)| role.map_or(Role::ALL.len(), |r| r.canonical_index()));
        }

        let artifact = Artifact {
            header: header(profile, &phenotype),
            sections: sections.into_iter().map(|(_, s)| s).collect(),
            footer: footer(genotype),
        };

        Expression {
            artifact,
            phenotype,
        }
    }
}

fn section_title(gene: &Gene) -> String {
    match gene.role() {
        Some(role) => role.title().to_string(),
        None => {
            let base = gene.id.split('_').next().unwrap_or(&gene.id);
            let mut chars = base.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => gene.id.clone(),
            }
        }
    }
}

fn header(profile: &TargetProfile, phenotype: &Phenotype) -> String {
    let applicant = profile.name.as_deref().unwrap_or("Applicant");
    let industry = if profile.industry.is_empty() {
        "general"
    } else {
        profile.industry.as_str()
    };
    format!(
        "# Subsidy Application Draft: {} ({})\nStructure: {} | Tone: {}",
        applicant, industry, phenotype.structure, phenotype.tone
    )
}

fn footer(genotype: &Genotype) -> String {
    match genotype.fitness {
        Some(fitness) => format!(
            "-- Generated from candidate {} (generation {}, fitness {:.3})",
            genotype.id, genotype.generation, fitness
        ),
        None => format!(
            "-- Generated from candidate {} (generation {})",
            genotype.id, genotype.generation
        ),
    }
}
