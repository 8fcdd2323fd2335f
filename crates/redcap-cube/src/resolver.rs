//! Coded-value resolution: raw codes to concept identifiers.

use std::collections::HashMap;

use oxigraph::model::NamedNode;

use crate::schema::{CodeList, CompiledSchema};

/// `(class, notation) → concept` lookup, built once after schema
/// compilation.
///
/// When two concepts of a class share a notation, the first declared wins.
#[derive(Debug, Clone)]
pub struct CodeIndex {
    index: HashMap<NamedNode, HashMap<String, NamedNode>>,
    absent: NamedNode,
}

impl CodeIndex {
    /// Empty index; every lookup resolves to `absent`.
    pub fn new(absent: NamedNode) -> Self {
        Self {
            index: HashMap::new(),
            absent,
        }
    }

    pub fn from_schema(schema: &CompiledSchema, absent: NamedNode) -> Self {
        let mut index = Self::new(absent);
        for code_list in schema.code_lists() {
            index.insert_code_list(code_list);
        }
        index
    }

    pub fn insert_code_list(&mut self, code_list: &CodeList) {
        let codes = self.index.entry(code_list.class.clone()).or_default();
        for concept in &code_list.concepts {
            codes
                .entry(concept.notation.clone())
                .or_insert_with(|| concept.iri.clone());
        }
    }

    /// The concept of `class` whose notation equals `code`.
    pub fn lookup(&self, class: &NamedNode, code: &str) -> Option<&NamedNode> {
        self.index.get(class).and_then(|codes| codes.get(code))
    }

    /// Like [`lookup`](Self::lookup), but a miss yields the absent sentinel.
    pub fn resolve(&self, class: &NamedNode, code: &str) -> NamedNode {
        self.lookup(class, code)
            .unwrap_or(&self.absent)
            .clone()
    }

    pub fn absent(&self) -> &NamedNode {
        &self.absent
    }

    pub fn is_absent(&self, node: &NamedNode) -> bool {
        node == &self.absent
    }
}
