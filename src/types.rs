use serde::{Deserialize, Serialize};
use std::fmt;

/// The applicant a document is being drafted for
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetProfile {
    pub name: Option<String>,
    pub industry: String,
    pub needs: Vec<String>,
}

impl TargetProfile {
    pub fn new(industry: impl Into<String>, needs: Vec<String>) -> Self {
        Self {
            name: None,
            industry: industry.into(),
            needs,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Lowercased industry and needs, empty entries dropped
    pub fn search_terms(&self) -> Vec<String> {
        std::iter::once(&self.industry)
            .chain(self.needs.iter())
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// True when any token mentions the industry or one of the needs
    pub fn is_referenced_by<'a, I>(&self, tokens: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        let terms = self.search_terms();
        if terms.is_empty() {
            return false;
        }
        tokens.into_iter().any(|token| {
            let token = token.to_lowercase();
            terms.iter().any(|term| token.contains(term.as_str()))
        })
    }
}

/// A known high-quality document used to seed the population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedExample {
    pub content: String,
    pub prior_score: f64,
}

impl SeedExample {
    pub fn new(content: impl Into<String>, prior_score: f64) -> Self {
        Self {
            content: content.into(),
            prior_score: prior_score.clamp(0.0, 1.0),
        }
    }
}

/// Overall layout of a decoded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureType {
    Formal,
    Narrative,
    Technical,
    Hybrid,
}

impl StructureType {
    pub const ALL: [StructureType; 4] = [
        StructureType::Formal,
        StructureType::Narrative,
        StructureType::Technical,
        StructureType::Hybrid,
    ];
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StructureType::Formal => "formal",
            StructureType::Narrative => "narrative",
            StructureType::Technical => "technical",
            StructureType::Hybrid => "hybrid",
        };
        f.write_str(name)
    }
}

/// Voice of a decoded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Professional,
    Passionate,
    Analytical,
    Confident,
}

impl Tone {
    pub const ALL: [Tone; 4] = [
        Tone::Professional,
        Tone::Passionate,
        Tone::Analytical,
        Tone::Confident,
    ];
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tone::Professional => "professional",
            Tone::Passionate => "passionate",
            Tone::Analytical => "analytical",
            Tone::Confident => "confident",
        };
        f.write_str(name)
    }
}

/// One named block of generated text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub gene_id: String,
    pub title: String,
    pub body: String,
}

/// Decoded document: header, ordered sections, footer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub header: String,
    pub sections: Vec<Section>,
    pub footer: String,
}

impl Artifact {
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.header);
        out.push_str("\n\n");
        for section in &self.sections {
            out.push_str(&format!("## {}\n{}\n\n", section.title, section.body));
        }
        out.push_str(&self.footer);
        out
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
