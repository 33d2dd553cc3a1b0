// Topic definition and compilation.
//
// A topic is either a ready-made regex (used verbatim for exact matching) or a
// list of literal surface forms. Surface forms are joined into one
// case-insensitive alternation anchored at word boundaries. Both the case
// folding and the boundaries are Unicode-aware.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{TaggerError, TaggerResult};

/// What to search for, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// A full regex, used as-is by the exact matcher. The fuzzy matcher
    /// treats the pattern text itself as the only surface form.
    Pattern(String),
    /// Literal surface forms (aliases) of the same concept.
    SurfaceForms(Vec<String>),
}

impl Topic {
    /// The strings the fuzzy matcher compares against.
    pub fn surface_forms(&self) -> Vec<String> {
        match self {
            Topic::Pattern(p) => vec![p.clone()],
            Topic::SurfaceForms(forms) => forms.clone(),
        }
    }

    /// Validate the topic and build the exact-match regex.
    pub fn compile(&self) -> TaggerResult<CompiledTopic> {
        let pattern = match self {
            Topic::Pattern(p) => {
                if p.trim().is_empty() {
                    return Err(TaggerError::EmptyTopic("pattern is blank".to_string()));
                }
                p.clone()
            }
            Topic::SurfaceForms(forms) => {
                if forms.is_empty() {
                    return Err(TaggerError::EmptyTopic("no aliases given".to_string()));
                }
                if let Some(i) = forms.iter().position(|f| f.trim().is_empty()) {
                    return Err(TaggerError::EmptyTopic(format!("alias #{} is blank", i + 1)));
                }
                alternation_pattern(forms)
            }
        };

        let regex = Regex::new(&pattern).map_err(|source| TaggerError::MalformedTopicPattern {
            pattern: pattern.clone(),
            source,
        })?;

        let surface_forms = self.surface_forms();
        let surface_forms_lower = surface_forms.iter().map(|s| s.to_lowercase()).collect();

        Ok(CompiledTopic {
            regex,
            surface_forms,
            surface_forms_lower,
        })
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Topic::Pattern(p) => write!(f, "/{p}/"),
            Topic::SurfaceForms(forms) => write!(f, "{}", forms.join(" | ")),
        }
    }
}

/// `(?i)\b(?:a|b|c)\b` with every alias escaped as a literal.
fn alternation_pattern(forms: &[String]) -> String {
    let alternatives: Vec<String> = forms.iter().map(|f| regex::escape(f)).collect();
    format!(r"(?i)\b(?:{})\b", alternatives.join("|"))
}

/// A validated topic, ready for matching. Cheap to share across documents.
#[derive(Debug, Clone)]
pub struct CompiledTopic {
    pub regex: Regex,
    /// Original-case surface forms; these become fuzzy tags
    pub surface_forms: Vec<String>,
    /// Lower-cased surface forms, aligned with `surface_forms`
    pub surface_forms_lower: Vec<String>,
}
