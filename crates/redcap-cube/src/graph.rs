//! In-memory triple set backed by an oxigraph store.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use oxigraph::io::{RdfFormat, RdfSerializer};
use oxigraph::model::{
    BlankNode, GraphName, GraphNameRef, NamedNode, NamedNodeRef, Quad, Subject, SubjectRef, Term,
    TermRef,
};
pub use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use crate::error::{CubeError, Result};

/// A set of triples in the default graph.
///
/// Adding a triple that is already present is a no-op. Blank nodes are
/// minted from a counter so that two identical compilation runs produce
/// identical triple sets.
pub struct Graph {
    store: Store,
    namespaces: IndexMap<String, String>,
    next_blank: u64,
}

impl Graph {
    pub fn new() -> Result<Self> {
        Ok(Self {
            store: Store::new()?,
            namespaces: IndexMap::new(),
            next_blank: 0,
        })
    }

    /// Record a prefix for Turtle output. Has no effect on the triples.
    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.namespaces.insert(prefix.into(), namespace.into());
    }

    /// Add a triple. Returns `true` if it was not already present.
    pub fn add(
        &mut self,
        subject: impl Into<Subject>,
        predicate: impl Into<NamedNode>,
        object: impl Into<Term>,
    ) -> Result<bool> {
        let quad = Quad::new(subject, predicate, object, GraphName::DefaultGraph);
        Ok(self.store.insert(&quad)?)
    }

    pub fn contains(
        &self,
        subject: impl Into<Subject>,
        predicate: impl Into<NamedNode>,
        object: impl Into<Term>,
    ) -> Result<bool> {
        let quad = Quad::new(subject, predicate, object, GraphName::DefaultGraph);
        Ok(self.store.contains(&quad)?)
    }

    /// A blank node not used before in this graph.
    pub fn fresh_blank_node(&mut self) -> BlankNode {
        self.next_blank += 1;
        BlankNode::new_unchecked(format!("c{}", self.next_blank))
    }

    /// Objects of all triples matching `(subject, predicate, ?)`.
    pub fn objects(
        &self,
        subject: SubjectRef<'_>,
        predicate: NamedNodeRef<'_>,
    ) -> Result<Vec<Term>> {
        self.store
            .quads_for_pattern(
                Some(subject),
                Some(predicate),
                None,
                Some(GraphNameRef::DefaultGraph),
            )
            .map(|quad| Ok(quad?.object))
            .collect()
    }

    /// Subjects of all triples matching `(?, predicate, object)`.
    pub fn subjects(
        &self,
        predicate: NamedNodeRef<'_>,
        object: TermRef<'_>,
    ) -> Result<Vec<Subject>> {
        self.store
            .quads_for_pattern(
                None,
                Some(predicate),
                Some(object),
                Some(GraphNameRef::DefaultGraph),
            )
            .map(|quad| Ok(quad?.subject))
            .collect()
    }

    /// Named subjects typed as `class`.
    pub fn instances_of(
        &self,
        rdf_type: NamedNodeRef<'_>,
        class: NamedNodeRef<'_>,
    ) -> Result<Vec<NamedNode>> {
        Ok(self
            .subjects(rdf_type, class.into())?
            .into_iter()
            .filter_map(|subject| match subject {
                Subject::NamedNode(node) => Some(node),
                _ => None,
            })
            .collect())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.store.len()?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.store.is_empty()?)
    }

    /// Evaluate a SPARQL query against the graph.
    pub fn query(&self, sparql: &str) -> Result<QueryResults> {
        Ok(self.store.query(sparql)?)
    }

    /// Evaluate a SPARQL ASK query.
    pub fn ask(&self, sparql: &str) -> Result<bool> {
        match self.query(sparql)? {
            QueryResults::Boolean(answer) => Ok(answer),
            _ => Err(CubeError::NotAskQuery),
        }
    }

    /// Every triple as a sorted set of N-Triples lines.
    pub fn canonical_triples(&self) -> Result<BTreeSet<String>> {
        self.store
            .iter()
            .map(|quad| {
                let quad = quad?;
                Ok(format!("{} {} {} .", quad.subject, quad.predicate, quad.object))
            })
            .collect()
    }

    /// Render the graph as Turtle using the bound prefixes.
    pub fn to_turtle(&self) -> Result<String> {
        let mut serializer = RdfSerializer::from_format(RdfFormat::Turtle);
        for (prefix, namespace) in &self.namespaces {
            serializer = serializer
                .with_prefix(prefix.as_str(), namespace.as_str())
                .map_err(|e| CubeError::Serialize(e.to_string()))?;
        }
        let bytes = self
            .store
            .dump_graph_to_writer(GraphNameRef::DefaultGraph, serializer, Vec::new())
            .map_err(|e| CubeError::Serialize(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| CubeError::Serialize(e.to_string()))
    }
}
