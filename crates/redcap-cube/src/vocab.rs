//! Namespace bindings and the vocabulary terms used by the compiler.

use indexmap::IndexMap;
use oxigraph::model::NamedNode;

use crate::cube::CubeConfig;
use crate::error::{CubeError, Result};

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const DCT: &str = "http://purl.org/dc/terms/";
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
pub const VOID: &str = "http://rdfs.org/ns/void#";
pub const QB: &str = "http://purl.org/linked-data/cube#";

/// Prefix to namespace lookup table.
#[derive(Debug, Clone, Default)]
pub struct TermRegistry {
    namespaces: IndexMap<String, String>,
}

impl TermRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `namespace`, replacing any earlier binding.
    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.namespaces.insert(prefix.into(), namespace.into());
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix).map(String::as_str)
    }

    /// Bindings in registration order.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.namespaces.iter().map(|(p, n)| (p.as_str(), n.as_str()))
    }

    /// Concatenate the namespace bound to `prefix` with `local`.
    ///
    /// Returns `None` for an unknown prefix or when the result is not a
    /// valid IRI.
    pub fn resolve(&self, prefix: &str, local: &str) -> Option<NamedNode> {
        self.iri(prefix, local).ok()
    }

    /// Like [`resolve`](Self::resolve) but reports why resolution failed.
    pub fn iri(&self, prefix: &str, local: &str) -> Result<NamedNode> {
        let namespace = self
            .namespace(prefix)
            .ok_or_else(|| CubeError::UnknownPrefix(prefix.to_string()))?;
        parse_iri(format!("{namespace}{local}"))
    }

    /// Expand a `prefix:local` name with a bound prefix, or parse `value`
    /// as an absolute IRI.
    pub fn expand(&self, value: &str) -> Result<NamedNode> {
        if let Some((prefix, local)) = value.split_once(':') {
            if !local.starts_with("//") && self.namespaces.contains_key(prefix) {
                return self.iri(prefix, local);
            }
        }
        parse_iri(value.to_string())
    }
}

fn parse_iri(iri: String) -> Result<NamedNode> {
    NamedNode::new(iri.clone()).map_err(|source| CubeError::InvalidIri { iri, source })
}

/// Well-known terms, resolved once from the registry.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    registry: TermRegistry,
    project: String,
    instance: String,

    // RDF / RDFS / OWL
    pub rdf_type: NamedNode,
    pub rdf_property: NamedNode,
    pub rdfs_label: NamedNode,
    pub rdfs_comment: NamedNode,
    pub rdfs_range: NamedNode,
    pub rdfs_subclass_of: NamedNode,
    pub rdfs_see_also: NamedNode,
    pub owl_class: NamedNode,

    // XSD
    pub xsd_string: NamedNode,
    pub xsd_float: NamedNode,
    pub xsd_integer: NamedNode,
    pub xsd_date: NamedNode,

    // Data Cube classes
    pub qb_observation: NamedNode,
    pub qb_slice: NamedNode,
    pub qb_dataset: NamedNode,
    pub qb_dsd: NamedNode,
    pub qb_slice_key: NamedNode,
    pub qb_dimension_property: NamedNode,
    pub qb_measure_property: NamedNode,
    pub qb_coded_property: NamedNode,

    // Data Cube properties
    pub qb_slice_structure: NamedNode,
    pub qb_observation_link: NamedNode,
    pub qb_dataset_link: NamedNode,
    pub qb_attribute: NamedNode,
    pub qb_component_required: NamedNode,
    pub qb_structure: NamedNode,
    pub qb_component: NamedNode,
    pub qb_component_attachment: NamedNode,
    pub qb_dimension: NamedNode,
    pub qb_order: NamedNode,
    pub qb_measure: NamedNode,
    pub qb_slice_key_link: NamedNode,
    pub qb_slice_link: NamedNode,
    pub qb_component_property: NamedNode,
    pub qb_concept: NamedNode,
    pub qb_code_list: NamedNode,

    // Dublin Core
    pub dct_title: NamedNode,
    pub dct_description: NamedNode,
    pub dct_publisher: NamedNode,
    pub dct_issued: NamedNode,
    pub dct_subject: NamedNode,

    // SKOS
    pub skos_concept_scheme: NamedNode,
    pub skos_concept: NamedNode,
    pub skos_has_top_concept: NamedNode,
    pub skos_top_concept_of: NamedNode,
    pub skos_in_scheme: NamedNode,
    pub skos_pref_label: NamedNode,
    pub skos_notation: NamedNode,

    // Project terms
    pub unit_measure: NamedNode,
    pub statistic: NamedNode,
    /// Returned by the code resolver when a code is not in its list.
    pub unresolved_code: NamedNode,
}

impl Vocabulary {
    pub fn new(config: &CubeConfig) -> Result<Self> {
        let mut registry = TermRegistry::new();
        registry.bind(&config.project_prefix, &config.project_namespace);
        registry.bind(&config.terms_prefix, &config.terms_namespace);
        registry.bind(&config.instance_prefix, &config.instance_namespace);
        for (prefix, namespace) in &config.extra_namespaces {
            registry.bind(prefix, namespace);
        }
        for (prefix, namespace) in [
            ("qb", QB),
            ("owl", OWL),
            ("void", VOID),
            ("skos", SKOS),
            ("rdf", RDF),
            ("rdfs", RDFS),
            ("xsd", XSD),
            ("dct", DCT),
            ("foaf", FOAF),
        ] {
            registry.bind(prefix, namespace);
        }

        let term = |prefix: &str, local: &str| registry.iri(prefix, local);
        let terms = config.terms_prefix.as_str();

        Ok(Self {
            rdf_type: term("rdf", "type")?,
            rdf_property: term("rdf", "Property")?,
            rdfs_label: term("rdfs", "label")?,
            rdfs_comment: term("rdfs", "comment")?,
            rdfs_range: term("rdfs", "range")?,
            rdfs_subclass_of: term("rdfs", "subClassOf")?,
            rdfs_see_also: term("rdfs", "seeAlso")?,
            owl_class: term("owl", "Class")?,

            xsd_string: term("xsd", "string")?,
            xsd_float: term("xsd", "float")?,
            xsd_integer: term("xsd", "integer")?,
            xsd_date: term("xsd", "date")?,

            qb_observation: term("qb", "Observation")?,
            qb_slice: term("qb", "Slice")?,
            qb_dataset: term("qb", "DataSet")?,
            qb_dsd: term("qb", "DataStructureDefinition")?,
            qb_slice_key: term("qb", "SliceKey")?,
            qb_dimension_property: term("qb", "DimensionProperty")?,
            qb_measure_property: term("qb", "MeasureProperty")?,
            qb_coded_property: term("qb", "CodedProperty")?,

            qb_slice_structure: term("qb", "sliceStructure")?,
            qb_observation_link: term("qb", "observation")?,
            qb_dataset_link: term("qb", "dataSet")?,
            qb_attribute: term("qb", "attribute")?,
            qb_component_required: term("qb", "componentRequired")?,
            qb_structure: term("qb", "structure")?,
            qb_component: term("qb", "component")?,
            qb_component_attachment: term("qb", "componentAttachment")?,
            qb_dimension: term("qb", "dimension")?,
            qb_order: term("qb", "order")?,
            qb_measure: term("qb", "measure")?,
            qb_slice_key_link: term("qb", "sliceKey")?,
            qb_slice_link: term("qb", "slice")?,
            qb_component_property: term("qb", "componentProperty")?,
            qb_concept: term("qb", "concept")?,
            qb_code_list: term("qb", "codeList")?,

            dct_title: term("dct", "title")?,
            dct_description: term("dct", "description")?,
            dct_publisher: term("dct", "publisher")?,
            dct_issued: term("dct", "issued")?,
            dct_subject: term("dct", "subject")?,

            skos_concept_scheme: term("skos", "ConceptScheme")?,
            skos_concept: term("skos", "Concept")?,
            skos_has_top_concept: term("skos", "hasTopConcept")?,
            skos_top_concept_of: term("skos", "topConceptOf")?,
            skos_in_scheme: term("skos", "inScheme")?,
            skos_pref_label: term("skos", "prefLabel")?,
            skos_notation: term("skos", "notation")?,

            unit_measure: term(terms, "unitMeasure")?,
            statistic: term(terms, "statistic")?,
            unresolved_code: term(terms, "unresolvedCode")?,

            project: config.project_prefix.clone(),
            instance: config.instance_prefix.clone(),
            registry,
        })
    }

    pub fn registry(&self) -> &TermRegistry {
        &self.registry
    }

    /// A term in the project namespace (fields, classes, slice keys).
    pub fn project(&self, local: &str) -> Result<NamedNode> {
        self.registry.iri(&self.project, local)
    }

    /// A term in the instance namespace (observations, slices, datasets).
    pub fn instance(&self, local: &str) -> Result<NamedNode> {
        self.registry.iri(&self.instance, local)
    }

    pub fn expand(&self, value: &str) -> Result<NamedNode> {
        self.registry.expand(value)
    }

    /// Whether `range` is an XSD datatype rather than a code list class.
    pub fn is_datatype(&self, range: &NamedNode) -> bool {
        range.as_str().starts_with(XSD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_prefix() {
        let mut registry = TermRegistry::new();
        registry.bind("qb", QB);

        let term = registry.resolve("qb", "Slice").unwrap();
        assert_eq!(term.as_str(), "http://purl.org/linked-data/cube#Slice");
    }

    #[test]
    fn test_resolve_unknown_prefix() {
        let registry = TermRegistry::new();
        assert!(registry.resolve("qb", "Slice").is_none());
        assert!(matches!(
            registry.iri("qb", "Slice"),
            Err(CubeError::UnknownPrefix(p)) if p == "qb"
        ));
    }

    #[test]
    fn test_expand_curie_and_absolute() {
        let mut registry = TermRegistry::new();
        registry.bind("fma", "http://purl.org/sig/fma#");

        let curie = registry.expand("fma:Brain").unwrap();
        assert_eq!(curie.as_str(), "http://purl.org/sig/fma#Brain");

        let absolute = registry.expand("http://example.org/unit/kg").unwrap();
        assert_eq!(absolute.as_str(), "http://example.org/unit/kg");

        assert!(registry.expand("not an iri").is_err());
    }

    #[test]
    fn test_vocabulary_datatype_check() {
        let vocab = Vocabulary::new(&CubeConfig::default()).unwrap();
        assert!(vocab.is_datatype(&vocab.xsd_float));
        assert!(!vocab.is_datatype(&vocab.project("Visit").unwrap()));
        assert_eq!(
            vocab.project("visit").unwrap().as_str(),
            "http://ncanda.sri.com/terms.ttl#visit"
        );
    }
}
