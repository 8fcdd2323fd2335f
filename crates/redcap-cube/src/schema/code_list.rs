//! Code lists generated from REDCap choice strings.

use oxigraph::model::NamedNode;

use crate::error::{CubeError, Result};

/// One `code,label` pair from a choice string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub code: String,
    pub label: String,
}

/// Split `"1, Baseline | 2, Followup"` into choices.
///
/// Every entry must contain exactly one comma.
pub fn parse_choices(field: &str, choices: &str) -> Result<Vec<Choice>> {
    choices
        .split('|')
        .map(|entry| {
            let mut parts = entry.split(',');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(code), Some(label), None) => Ok(Choice {
                    code: code.trim().to_string(),
                    label: label.trim().to_string(),
                }),
                _ => Err(CubeError::MalformedChoice {
                    field: field.to_string(),
                    entry: entry.trim().to_string(),
                }),
            }
        })
        .collect()
}

/// A generated concept: one code of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concept {
    pub iri: NamedNode,
    pub notation: String,
    pub label: String,
}

/// Class, concept scheme and concepts generated for a categorical field.
#[derive(Debug, Clone)]
pub struct CodeList {
    pub class: NamedNode,
    pub scheme: NamedNode,
    pub concepts: Vec<Concept>,
}

impl CodeList {
    pub fn concept(&self, notation: &str) -> Option<&Concept> {
        self.concepts.iter().find(|c| c.notation == notation)
    }
}
