use crate::engines::generation::genome::{Gene, GeneTrait, Genotype, IdSequence, Role};
use crate::types::{SeedExample, StructureType, Tone};
use std::collections::HashSet;

const STOPWORDS: &[&str] = &[
    "this", "that", "with", "from", "have", "will", "which", "their", "there", "these", "those",
    "into", "also", "been", "were", "when", "than", "then", "they", "them", "such", "each",
    "about", "over", "more", "most", "only", "other", "some", "very", "what", "your", "ours",
];

fn role_cues(role: Role) -> &'static [&'static str] {
    match role {
        Role::Introduction => &["introduction", "overview", "about", "company", "background", "founded"],
        Role::Problem => &["problem", "challenge", "issue", "difficult", "bottleneck", "shortage"],
        Role::Solution => &["solution", "approach", "introduce", "implement", "system", "adopt"],
        Role::Benefit => &["benefit", "effect", "impact", "improve", "increase", "reduce"],
        Role::Plan => &["plan", "schedule", "timeline", "milestone", "budget", "phase"],
    }
}

/// Reverse-engineers known documents into initial genotypes
#[derive(Debug, Clone)]
pub struct SeedCorpusAdapter {
    /// Upper bound on alleles extracted per paragraph
    pub max_alleles: usize,
    /// Append structure and tone genes inferred from the text
    pub infer_traits: bool,
}

impl Default for SeedCorpusAdapter {
    fn default() -> Self {
        Self {
            max_alleles: 8,
            infer_traits: true,
        }
    }
}

impl SeedCorpusAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_traits(mut self) -> Self {
        self.infer_traits = false;
        self
    }

    pub fn adapt_all(&self, examples: &[SeedExample], ids: &mut IdSequence) -> Vec<Genotype> {
        examples
            .iter()
            .enumerate()
            .map(|(i, example)| self.reverse_engineer(example, &format!("seed{}", i), ids))
            .filter(|g| !g.is_empty())
            .collect()
    }

    /// One gene per paragraph; stronger prior scores give more dominant, better expressed genes
    pub fn reverse_engineer(&self, example: &SeedExample, origin: &str, ids: &mut IdSequence) -> Genotype {
        let prior = example.prior_score.clamp(0.0, 1.0);
        let expression = 0.5 + 0.5 * prior;
        let mut used_ids: HashSet<String> = HashSet::new();
        let mut genes = Vec::new();

        for (i, paragraph) in split_paragraphs(&example.content).iter().enumerate() {
            let alleles = extract_tokens(paragraph, self.max_alleles);
            if alleles.is_empty() {
                continue;
            }
            let base = match classify_role(paragraph) {
                Some(role) => role.keyword().to_string(),
                None => "content".to_string(),
            };
            let id = if used_ids.contains(&base) {
                format!("{}_{}", base, i)
            } else {
                base
            };
            used_ids.insert(id.clone());
            genes.push(Gene::new(id, alleles, prior, expression));
        }

        if self.infer_traits && !genes.is_empty() {
            let structure = infer_structure(&example.content);
            let tone = infer_tone(&example.content);
            genes.push(
                Gene::new(format!("structure_{}", structure), vec![structure.to_string()], prior, expression)
                    .with_trait(GeneTrait::Structure(structure)),
            );
            genes.push(
                Gene::new(format!("tone_{}", tone), vec![tone.to_string()], prior, expression)
                    .with_trait(GeneTrait::Tone(tone)),
            );
        }

        Genotype::new(ids.next_id(origin, 0), genes, 0)
    }
}

/// Blank-line separated blocks, or lines when the text has no blank lines
pub fn split_paragraphs(content: &str) -> Vec<String> {
    let blocks: Vec<String> = content
        .split("\n\n")
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    if blocks.len() > 1 {
        return blocks;
    }
    content
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Distinct lowercase words of four or more letters, stopwords removed
pub fn extract_tokens(text: &str, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split(|c: char| !c.is_alphanumeric())
        .map(|w| w.to_lowercase())
        .filter(|w| w.chars().count() >= 4 && !STOPWORDS.contains(&w.as_str()))
        .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
        .filter(|w| seen.insert(w.clone()))
        .take(limit)
        .collect()
}

/// Role with the most cue-word hits; headings win outright
pub fn classify_role(paragraph: &str) -> Option<Role> {
    let lower = paragraph.to_lowercase();
    let first_line = lower.lines().next().unwrap_or("");
    if let Some(role) = Role::ALL
        .into_iter()
        .find(|role| first_line.len() < 60 && first_line.contains(role.keyword()))
    {
        return Some(role);
    }

    let mut best: Option<(Role, usize)> = None;
    for role in Role::ALL {
        let hits = role_cues(role).iter().filter(|cue| lower.contains(*cue)).count();
        if hits > 0 && best.map_or(true, |(_, b)| hits > b) {
            best = Some((role, hits));
        }
    }
    best.map(|(role, _)| role)
}

fn is_heading(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with('#')
        || line
            .split_once('.')
            .map_or(false, |(n, _)| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

pub fn infer_structure(content: &str) -> StructureType {
    let headings = content.lines().filter(|l| is_heading(l)).count();
    let non_space = content.chars().filter(|c| !c.is_whitespace()).count().max(1);
    let digits = content.chars().filter(|c| c.is_ascii_digit()).count();

    if digits as f64 / non_space as f64 > 0.05 {
        StructureType::Technical
    } else if headings >= 2 {
        StructureType::Formal
    } else if headings == 0 && split_paragraphs(content).len() <= 3 {
        StructureType::Narrative
    } else {
        StructureType::Hybrid
    }
}

pub fn infer_tone(content: &str) -> Tone {
    let lower = content.to_lowercase();
    let non_space = content.chars().filter(|c| !c.is_whitespace()).count().max(1);
    let digits = content.chars().filter(|c| c.is_ascii_digit()).count();

    if content.contains('!') || lower.contains("passion") || lower.contains("dream") {
        Tone::Passionate
    } else if digits as f64 / non_space as f64 > 0.05 || lower.contains('%') {
        Tone::Analytical
    } else if lower.contains("certainly") || lower.contains("will achieve") || lower.contains("proven") {
        Tone::Confident
    } else {
        Tone::Professional
    }
}
