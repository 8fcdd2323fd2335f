//! Data dictionary → property and code list triples.

use indexmap::IndexMap;
use oxigraph::model::{Literal, NamedNode};

use crate::error::Result;
use crate::graph::Graph;
use crate::input::{Field, FieldType, Mapping, MappingEntry};
use crate::vocab::Vocabulary;

use super::code_list::{CodeList, Concept, parse_choices};
use super::naming::{class_name, label_from_name};

/// What the compiler recorded about one field.
#[derive(Debug, Clone)]
pub struct CompiledField {
    pub name: String,
    pub iri: NamedNode,
    /// Declared `rdfs:range`: an XSD datatype or a code list class.
    pub range: NamedNode,
    pub is_dimension: bool,
    pub code_list: Option<CodeList>,
}

/// Fields compiled from a data dictionary, in dictionary order.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    /// Name used for the structure definition, from the dictionary file.
    pub name: String,
    pub fields: IndexMap<String, CompiledField>,
}

impl CompiledSchema {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&CompiledField> {
        self.fields.get(name)
    }

    pub fn range(&self, name: &str) -> Option<&NamedNode> {
        self.fields.get(name).map(|f| &f.range)
    }

    pub fn code_lists(&self) -> impl Iterator<Item = &CodeList> {
        self.fields.values().filter_map(|f| f.code_list.as_ref())
    }
}

/// Emits property-level triples for each field of a data dictionary.
pub struct SchemaCompiler<'a> {
    vocab: &'a Vocabulary,
}

impl<'a> SchemaCompiler<'a> {
    pub fn new(vocab: &'a Vocabulary) -> Self {
        Self { vocab }
    }

    pub fn compile(
        &self,
        graph: &mut Graph,
        name: &str,
        fields: &[Field],
        mapping: &Mapping,
    ) -> Result<CompiledSchema> {
        let mut schema = CompiledSchema::empty(name);
        for field in fields {
            let compiled = self.compile_field(graph, field, mapping.get(&field.name))?;
            schema.fields.insert(compiled.name.clone(), compiled);
        }
        log::info!("Compiled {} fields from {}", schema.fields.len(), name);
        Ok(schema)
    }

    fn compile_field(
        &self,
        graph: &mut Graph,
        field: &Field,
        mapping: Option<&MappingEntry>,
    ) -> Result<CompiledField> {
        let v = self.vocab;
        let node = v.project(&field.name)?;

        let label = match field.label.as_deref() {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => label_from_name(&field.name),
        };
        graph.add(node.clone(), v.rdfs_label.clone(), Literal::new_simple_literal(&label))?;

        let is_dimension = mapping.is_some_and(MappingEntry::is_dimension);
        if is_dimension {
            graph.add(node.clone(), v.rdf_type.clone(), v.qb_dimension_property.clone())?;
            graph.add(node.clone(), v.rdf_type.clone(), v.qb_coded_property.clone())?;
        } else {
            graph.add(node.clone(), v.rdf_type.clone(), v.qb_measure_property.clone())?;
        }
        graph.add(node.clone(), v.rdf_type.clone(), v.rdf_property.clone())?;

        if let Some(concept) = mapping.and_then(|m| m.concept.as_deref()) {
            graph.add(node.clone(), v.qb_concept.clone(), v.expand(concept)?)?;
        }

        let range = match mapping.and_then(|m| m.range.as_deref()) {
            Some(range) => v.expand(range)?,
            None => self.infer_range(field)?,
        };
        graph.add(node.clone(), v.rdfs_range.clone(), range.clone())?;

        if let Some(units) = mapping.and_then(|m| m.units.as_deref()) {
            graph.add(node.clone(), v.unit_measure.clone(), v.expand(units)?)?;
        }
        if let Some(statistic) = mapping.and_then(|m| m.statistic.as_deref()) {
            graph.add(node.clone(), v.statistic.clone(), v.expand(statistic)?)?;
        }

        let choices = field
            .choices
            .as_deref()
            .filter(|c| !c.is_empty())
            .or_else(|| field.field_type.implicit_choices());
        let code_list = match choices {
            Some(choices) if field.field_type != FieldType::Calc => {
                Some(self.compile_code_list(graph, field, &node, &label, choices)?)
            }
            _ => None,
        };

        Ok(CompiledField {
            name: field.name.clone(),
            iri: node,
            range,
            is_dimension,
            code_list,
        })
    }

    /// Range implied by the REDCap field type and validation.
    fn infer_range(&self, field: &Field) -> Result<NamedNode> {
        let v = self.vocab;
        let range = match (&field.field_type, field.text_validation.as_deref()) {
            (FieldType::Text, Some("number")) => v.xsd_float.clone(),
            (FieldType::Text, Some("integer")) => v.xsd_integer.clone(),
            (FieldType::Calc, _) => v.xsd_float.clone(),
            (field_type, _) if field_type.is_coded() => v.project(&class_name(&field.name))?,
            _ => v.xsd_string.clone(),
        };
        Ok(range)
    }

    fn compile_code_list(
        &self,
        graph: &mut Graph,
        field: &Field,
        node: &NamedNode,
        label: &str,
        choices: &str,
    ) -> Result<CodeList> {
        let v = self.vocab;
        let choices = parse_choices(&field.name, choices)?;

        let class = v.project(&class_name(&field.name))?;
        graph.add(class.clone(), v.rdf_type.clone(), v.owl_class.clone())?;
        graph.add(class.clone(), v.rdfs_subclass_of.clone(), v.skos_concept.clone())?;
        graph.add(
            class.clone(),
            v.rdfs_label.clone(),
            Literal::new_simple_literal(format!("Code List Class for '{label}' term.")),
        )?;

        let scheme = v.project(&format!("{}-concept-scheme", field.name))?;
        graph.add(scheme.clone(), v.rdf_type.clone(), v.skos_concept_scheme.clone())?;
        graph.add(
            scheme.clone(),
            v.skos_notation.clone(),
            Literal::new_simple_literal(&field.name),
        )?;
        graph.add(
            scheme.clone(),
            v.rdfs_label.clone(),
            Literal::new_simple_literal(format!("Code List for '{label}' term.")),
        )?;
        graph.add(class.clone(), v.rdfs_see_also.clone(), scheme.clone())?;
        graph.add(node.clone(), v.qb_code_list.clone(), scheme.clone())?;

        let mut concepts = Vec::with_capacity(choices.len());
        for choice in choices {
            let concept = v.project(&format!("{}-{}", field.name, choice.code))?;
            graph.add(concept.clone(), v.rdf_type.clone(), v.skos_concept.clone())?;
            graph.add(concept.clone(), v.rdf_type.clone(), class.clone())?;
            graph.add(
                concept.clone(),
                v.skos_notation.clone(),
                Literal::new_simple_literal(&choice.code),
            )?;
            graph.add(concept.clone(), v.skos_top_concept_of.clone(), scheme.clone())?;
            graph.add(concept.clone(), v.skos_in_scheme.clone(), scheme.clone())?;
            graph.add(
                concept.clone(),
                v.skos_pref_label.clone(),
                Literal::new_simple_literal(&choice.label),
            )?;
            graph.add(scheme.clone(), v.skos_has_top_concept.clone(), concept.clone())?;

            concepts.push(Concept {
                iri: concept,
                notation: choice.code,
                label: choice.label,
            });
        }

        log::debug!("Code list for {}: {} concepts", field.name, concepts.len());
        Ok(CodeList {
            class,
            scheme,
            concepts,
        })
    }
}
