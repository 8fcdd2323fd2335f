//! Data structure definition: components and slice keys.

use oxigraph::model::{Literal, NamedNode};

use crate::error::{CubeError, Result};
use crate::graph::Graph;
use crate::input::{SliceDefinition, SliceDefinitions};
use crate::schema::CompiledSchema;
use crate::schema::naming::slice_key_name;
use crate::vocab::Vocabulary;

/// Split `"subject, arm,visit"` into ordered dimension names.
pub fn parse_dimensions(dimensions: &str) -> Vec<String> {
    dimensions
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

/// The structure definition that was written to the graph.
#[derive(Debug, Clone)]
pub struct Structure {
    pub iri: NamedNode,
    /// Dimension names; the first is attached to observations.
    pub dimensions: Vec<String>,
    /// Slice keys in dimension order; the last covers every slice dimension.
    pub slice_keys: Vec<NamedNode>,
    pub measures: Vec<String>,
}

impl Structure {
    pub fn observation_dimension(&self) -> Option<&str> {
        self.dimensions.first().map(String::as_str)
    }

    pub fn slice_dimensions(&self) -> &[String] {
        self.dimensions.get(1..).unwrap_or(&[])
    }

    pub fn is_slice_dimension(&self, field: &str) -> bool {
        self.slice_dimensions().iter().any(|d| d == field)
    }

    /// Key shared by every slice of observations.
    pub fn slice_structure(&self) -> Option<&NamedNode> {
        self.slice_keys.last()
    }
}

pub struct StructureBuilder<'a> {
    vocab: &'a Vocabulary,
}

impl<'a> StructureBuilder<'a> {
    pub fn new(vocab: &'a Vocabulary) -> Self {
        Self { vocab }
    }

    pub fn build(
        &self,
        graph: &mut Graph,
        schema: &CompiledSchema,
        dimensions: &[String],
        slices: &SliceDefinitions,
    ) -> Result<Structure> {
        let v = self.vocab;
        let dsd = v.project(&format!("{}-dsd", schema.name))?;
        graph.add(dsd.clone(), v.rdf_type.clone(), v.qb_dsd.clone())?;

        for dataset in graph.instances_of(v.rdf_type.as_ref(), v.qb_dataset.as_ref())? {
            graph.add(dataset, v.qb_structure.clone(), dsd.clone())?;
        }

        let mut slice_keys = Vec::new();
        for (position, dimension) in dimensions.iter().enumerate() {
            let order = position + 1;
            let component = graph.fresh_blank_node();
            graph.add(dsd.clone(), v.qb_component.clone(), component.clone())?;
            graph.add(component.clone(), v.qb_dimension.clone(), v.project(dimension)?)?;
            graph.add(
                component.clone(),
                v.qb_order.clone(),
                Literal::new_typed_literal(order.to_string(), v.xsd_integer.clone()),
            )?;

            if order == 1 {
                graph.add(
                    component,
                    v.qb_component_attachment.clone(),
                    v.qb_observation.clone(),
                )?;
                continue;
            }

            graph.add(component, v.qb_component_attachment.clone(), v.qb_slice.clone())?;
            let key_dimensions = &dimensions[1..order];
            let name = slice_key_name(key_dimensions);
            let key = v.project(&format!("sliceBy{name}"))?;
            graph.add(dsd.clone(), v.qb_slice_key_link.clone(), key.clone())?;
            graph.add(key.clone(), v.rdf_type.clone(), v.qb_slice_key.clone())?;

            match slices.get(&name) {
                Some(definition) => self.describe_slice_key(graph, &key, definition)?,
                None => log::debug!("No slice definition for {name}"),
            }
            for key_dimension in key_dimensions {
                graph.add(key.clone(), v.qb_component_property.clone(), v.project(key_dimension)?)?;
            }
            slice_keys.push(key);
        }

        let mut measures = Vec::new();
        for field in schema.fields.values() {
            if dimensions.contains(&field.name) {
                continue;
            }
            let component = graph.fresh_blank_node();
            graph.add(dsd.clone(), v.qb_component.clone(), component.clone())?;
            graph.add(component, v.qb_measure.clone(), field.iri.clone())?;
            measures.push(field.name.clone());
        }

        let attribute = graph.fresh_blank_node();
        graph.add(dsd.clone(), v.qb_component.clone(), attribute.clone())?;
        graph.add(attribute.clone(), v.qb_attribute.clone(), v.unit_measure.clone())?;
        graph.add(attribute.clone(), v.qb_component_required.clone(), Literal::from(true))?;
        graph.add(
            attribute,
            v.qb_component_attachment.clone(),
            v.qb_measure_property.clone(),
        )?;

        log::info!(
            "Structure {}: {} dimensions, {} measures, {} slice keys",
            dsd.as_str(),
            dimensions.len(),
            measures.len(),
            slice_keys.len()
        );
        Ok(Structure {
            iri: dsd,
            dimensions: dimensions.to_vec(),
            slice_keys,
            measures,
        })
    }

    fn describe_slice_key(
        &self,
        graph: &mut Graph,
        key: &NamedNode,
        definition: &SliceDefinition,
    ) -> Result<()> {
        let v = self.vocab;
        if let Some(label) = definition.label.as_deref().filter(|l| !l.is_empty()) {
            let literal = tagged(label, definition.label_lang.as_deref())?;
            graph.add(key.clone(), v.rdfs_label.clone(), literal)?;
        }
        if let Some(comment) = definition.comment.as_deref().filter(|c| !c.is_empty()) {
            let literal = tagged(comment, definition.comment_lang.as_deref())?;
            graph.add(key.clone(), v.rdfs_comment.clone(), literal)?;
        }
        Ok(())
    }
}

fn tagged(value: &str, language: Option<&str>) -> Result<Literal> {
    match language.filter(|l| !l.is_empty()) {
        Some(tag) => Literal::new_language_tagged_literal(value, tag).map_err(|source| {
            CubeError::InvalidLanguageTag {
                tag: tag.to_string(),
                source,
            }
        }),
        None => Ok(Literal::new_simple_literal(value)),
    }
}
