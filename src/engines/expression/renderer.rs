use crate::collaborators::SectionRenderer;
use crate::engines::expression::phenotype::Phenotype;
use crate::engines::generation::genome::{Gene, Role};
use crate::types::{TargetProfile, Tone};

/// Deterministic template-based section writer
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn join_tokens(tokens: &[&str]) -> String {
    match tokens {
        [] => "related initiatives".to_string(),
        [one] => one.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

impl SectionRenderer for TemplateRenderer {
    fn render_section(&self, gene: &Gene, phenotype: &Phenotype, profile: &TargetProfile) -> String {
        let lead = gene.dominant_allele();
        let others: Vec<&str> = gene
            .alleles
            .iter()
            .map(String::as_str)
            .filter(|a| *a != lead)
            .take(3)
            .collect();
        let others = join_tokens(&others);
        let subject = profile.name.as_deref().unwrap_or("Our company");
        let industry = if profile.industry.is_empty() {
            "target"
        } else {
            profile.industry.as_str()
        };

        let mut body = match gene.role() {
            Some(Role::Introduction) => format!(
                "{} operates in the {} sector with a focus on {}, building on {}.",
                subject, industry, lead, others
            ),
            Some(Role::Problem) => format!(
                "The central challenge we face is {}, which currently limits {}.",
                lead, others
            ),
            Some(Role::Solution) => format!(
                "To address this, we will introduce {}, supported by {}.",
                lead, others
            ),
            Some(Role::Benefit) => format!(
                "The project is expected to deliver {} and to strengthen {}.",
                lead, others
            ),
            Some(Role::Plan) => format!(
                "Implementation proceeds through {}, with {} tracked at each milestone.",
                lead, others
            ),
            None => format!("In addition, {} contributes to {}.", lead, others),
        };

        if matches!(gene.role(), Some(Role::Solution) | Some(Role::Benefit)) && !profile.needs.is_empty() {
            let needs: Vec<&str> = profile.needs.iter().map(String::as_str).collect();
            body.push_str(&format!(" This responds directly to our need for {}.", join_tokens(&needs)));
        }

        let closing = match phenotype.tone {
            Tone::Professional => "",
            Tone::Passionate => " We are deeply committed to making this happen.",
            Tone::Analytical => " Progress will be measured against quantitative indicators.",
            Tone::Confident => " We are confident this will succeed.",
        };
        body.push_str(closing);
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::expression::phenotype::PhenotypeMetrics;
    use crate::types::StructureType;

    fn phenotype(tone: Tone) -> Phenotype {
        Phenotype {
            structure: StructureType::Formal,
            tone,
            metrics: PhenotypeMetrics::default(),
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let gene = Gene::new(
            "solution",
            vec!["automation".to_string(), "robotics".to_string(), "training".to_string()],
            1.0,
            0.9,
        );
        let profile = TargetProfile::new("manufacturing", vec!["labor shortage".to_string()])
            .with_name("Acme Works");
        let renderer = TemplateRenderer::new();

        let first = renderer.render_section(&gene, &phenotype(Tone::Confident), &profile);
        let second = renderer.render_section(&gene, &phenotype(Tone::Confident), &profile);

        assert_eq!(first, second);
        assert!(first.contains("introduce automation, supported by robotics and training"));
        assert!(first.contains("need for labor shortage"));
        assert!(first.ends_with("We are confident this will succeed."));
    }

    #[test]
    fn test_introduction_uses_profile() {
        let gene = Gene::new("introduction", vec!["precision".to_string()], 0.5, 0.9);
        let profile = TargetProfile::new("logistics", vec![]).with_name("Blue Freight");

        let text = TemplateRenderer.render_section(&gene, &phenotype(Tone::Professional), &profile);
        assert_eq!(
            text,
            "Blue Freight operates in the logistics sector with a focus on precision, building on related initiatives."
        );
    }
}
