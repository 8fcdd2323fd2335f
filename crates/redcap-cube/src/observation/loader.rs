//! Observation rows → observations, slices and their values.

use std::collections::HashSet;

use oxigraph::model::{Literal, NamedNode, Term};
use serde::{Deserialize, Serialize};

use crate::error::{CubeError, Result};
use crate::graph::Graph;
use crate::input::ObservationRow;
use crate::resolver::CodeIndex;
use crate::schema::CompiledSchema;
use crate::structure::Structure;
use crate::vocab::Vocabulary;

use super::identity::{observation_iri, slice_iri};

/// Counts from one load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub rows: usize,
    pub observations: usize,
    pub slices: usize,
    /// Coded values that matched no concept of their code list.
    pub unresolved_codes: usize,
}

pub struct ObservationLoader<'a> {
    vocab: &'a Vocabulary,
    schema: &'a CompiledSchema,
    structure: &'a Structure,
    codes: &'a CodeIndex,
    label_suffix: &'a str,
}

impl<'a> ObservationLoader<'a> {
    pub fn new(
        vocab: &'a Vocabulary,
        schema: &'a CompiledSchema,
        structure: &'a Structure,
        codes: &'a CodeIndex,
    ) -> Self {
        Self {
            vocab,
            schema,
            structure,
            codes,
            label_suffix: "_label",
        }
    }

    /// Columns ending in this suffix are display-only and skipped.
    pub fn with_label_suffix(mut self, suffix: &'a str) -> Self {
        self.label_suffix = suffix;
        self
    }

    pub fn load(&self, graph: &mut Graph, rows: &[ObservationRow]) -> Result<LoadSummary> {
        let v = self.vocab;
        let dataset = self.dataset(graph)?;

        let mut observations = HashSet::new();
        let mut slices = HashSet::new();
        let mut summary = LoadSummary {
            rows: rows.len(),
            ..LoadSummary::default()
        };

        for row in rows {
            let observation = observation_iri(v, row)?;
            let slice = slice_iri(v, row, self.structure.slice_dimensions())?;

            graph.add(observation.clone(), v.rdf_type.clone(), v.qb_observation.clone())?;
            graph.add(observation.clone(), v.qb_dataset_link.clone(), dataset.clone())?;
            graph.add(slice.clone(), v.rdf_type.clone(), v.qb_slice.clone())?;
            graph.add(dataset.clone(), v.qb_slice_link.clone(), slice.clone())?;
            graph.add(slice.clone(), v.qb_observation_link.clone(), observation.clone())?;
            if let Some(key) = self.structure.slice_structure() {
                graph.add(slice.clone(), v.qb_slice_structure.clone(), key.clone())?;
            }

            for (column, value) in row.iter() {
                if column.ends_with(self.label_suffix) {
                    continue;
                }
                let field = self
                    .schema
                    .field(column)
                    .ok_or_else(|| CubeError::MissingRange {
                        field: column.to_string(),
                    })?;

                let object = self.value_term(&field.range, value, &mut summary);
                if self.structure.is_slice_dimension(column) {
                    graph.add(slice.clone(), field.iri.clone(), object)?;
                } else {
                    graph.add(observation.clone(), field.iri.clone(), object)?;
                }
            }

            log::debug!("Observation {} in slice {}", observation.as_str(), slice.as_str());
            observations.insert(observation);
            slices.insert(slice);
        }

        summary.observations = observations.len();
        summary.slices = slices.len();
        log::info!(
            "Loaded {} rows: {} observations in {} slices",
            summary.rows,
            summary.observations,
            summary.slices
        );
        Ok(summary)
    }

    /// Typed literal for datatype ranges, concept for code list ranges.
    fn value_term(&self, range: &NamedNode, value: &str, summary: &mut LoadSummary) -> Term {
        if self.vocab.is_datatype(range) {
            return Literal::new_typed_literal(value, range.clone()).into();
        }
        let concept = self.codes.resolve(range, value);
        if self.codes.is_absent(&concept) {
            log::warn!("Code '{}' not found in code list {}", value, range.as_str());
            summary.unresolved_codes += 1;
        }
        concept.into()
    }

    /// The dataset observations belong to, minting a fallback when no
    /// metadata was loaded.
    fn dataset(&self, graph: &mut Graph) -> Result<NamedNode> {
        let v = self.vocab;
        if let Some(dataset) = graph
            .instances_of(v.rdf_type.as_ref(), v.qb_dataset.as_ref())?
            .into_iter()
            .next()
        {
            return Ok(dataset);
        }

        let dataset = v.instance("dataset")?;
        log::warn!("No dataset metadata loaded; using {}", dataset.as_str());
        graph.add(dataset.clone(), v.rdf_type.clone(), v.qb_dataset.clone())?;
        graph.add(dataset.clone(), v.qb_structure.clone(), self.structure.iri.clone())?;
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::CubeConfig;
    use crate::input::{Field, FieldType, Mapping, SliceDefinitions};
    use crate::schema::SchemaCompiler;
    use crate::structure::{StructureBuilder, parse_dimensions};

    struct Fixture {
        vocab: Vocabulary,
        graph: Graph,
        schema: CompiledSchema,
        structure: Structure,
        codes: CodeIndex,
    }

    fn fixture() -> Fixture {
        let vocab = Vocabulary::new(&CubeConfig::default()).unwrap();
        let mut graph = Graph::new().unwrap();
        let fields = vec![
            Field::new("subject", FieldType::Text),
            Field::new("arm", FieldType::Text),
            Field::new("visit", FieldType::Dropdown).with_choices("1,Baseline|2,Followup"),
            Field::new("score", FieldType::Text).with_validation("number"),
        ];
        let schema = SchemaCompiler::new(&vocab)
            .compile(&mut graph, "datadict", &fields, &Mapping::new())
            .unwrap();
        let structure = StructureBuilder::new(&vocab)
            .build(
                &mut graph,
                &schema,
                &parse_dimensions("subject,arm,visit"),
                &SliceDefinitions::new(),
            )
            .unwrap();
        let codes = CodeIndex::from_schema(&schema, vocab.unresolved_code.clone());
        Fixture { vocab, graph, schema, structure, codes }
    }

    fn row(subject: &str, visit: &str) -> ObservationRow {
        ObservationRow::new()
            .with("subject", subject)
            .with("arm", "A1")
            .with("visit", visit)
            .with("visit_label", "ignored")
            .with("score", "3.5")
    }

    #[test]
    fn test_values_split_between_observation_and_slice() {
        let mut f = fixture();
        let loader = ObservationLoader::new(&f.vocab, &f.schema, &f.structure, &f.codes);
        let rows = vec![row("S1", "1")];
        loader.load(&mut f.graph, &rows).unwrap();

        let v = &f.vocab;
        let observation = observation_iri(v, &rows[0]).unwrap();
        let slice = slice_iri(v, &rows[0], f.structure.slice_dimensions()).unwrap();

        assert!(f.graph
            .contains(
                observation.clone(),
                v.project("subject").unwrap(),
                Literal::new_typed_literal("S1", v.xsd_string.clone()),
            )
            .unwrap());
        assert!(f.graph
            .contains(slice.clone(), v.project("visit").unwrap(), v.project("visit-1").unwrap())
            .unwrap());
        assert!(f.graph
            .objects(observation.as_ref().into(), v.project("visit").unwrap().as_ref())
            .unwrap()
            .is_empty());
        assert!(f.graph
            .contains(slice, v.qb_observation_link.clone(), observation)
            .unwrap());
    }

    #[test]
    fn test_slice_only_row_is_linked_to_its_slice() {
        let mut f = fixture();
        let loader = ObservationLoader::new(&f.vocab, &f.schema, &f.structure, &f.codes);
        let rows = vec![
            ObservationRow::new()
                .with("arm", "A1")
                .with("visit", "1")
                .with("arm_label", "Arm one"),
        ];
        loader.load(&mut f.graph, &rows).unwrap();

        let observation = observation_iri(&f.vocab, &rows[0]).unwrap();
        let slice = slice_iri(&f.vocab, &rows[0], f.structure.slice_dimensions()).unwrap();
        assert!(f
            .graph
            .contains(slice, f.vocab.qb_observation_link.clone(), observation)
            .unwrap());
    }

    #[test]
    fn test_rows_share_slices() {
        let mut f = fixture();
        let loader = ObservationLoader::new(&f.vocab, &f.schema, &f.structure, &f.codes);
        let summary = loader
            .load(&mut f.graph, &[row("S1", "1"), row("S2", "1"), row("S1", "2"), row("S1", "2")])
            .unwrap();

        assert_eq!(summary.rows, 4);
        assert_eq!(summary.observations, 3);
        assert_eq!(summary.slices, 2);
        assert_eq!(summary.unresolved_codes, 0);
    }

    #[test]
    fn test_unknown_code_resolves_to_sentinel() {
        let mut f = fixture();
        let loader = ObservationLoader::new(&f.vocab, &f.schema, &f.structure, &f.codes);
        let rows = vec![row("S1", "9")];
        let summary = loader.load(&mut f.graph, &rows).unwrap();

        assert_eq!(summary.unresolved_codes, 1);
        let slice = slice_iri(&f.vocab, &rows[0], f.structure.slice_dimensions()).unwrap();
        assert!(f.graph
            .contains(slice, f.vocab.project("visit").unwrap(), f.vocab.unresolved_code.clone())
            .unwrap());
    }

    #[test]
    fn test_column_without_range_is_fatal() {
        let mut f = fixture();
        let loader = ObservationLoader::new(&f.vocab, &f.schema, &f.structure, &f.codes);
        let result = loader.load(&mut f.graph, &[row("S1", "1").with("weight", "70")]);

        assert!(matches!(
            result,
            Err(CubeError::MissingRange { ref field }) if field == "weight"
        ));
    }

    #[test]
    fn test_fallback_dataset_is_linked_to_structure() {
        let mut f = fixture();
        let loader = ObservationLoader::new(&f.vocab, &f.schema, &f.structure, &f.codes);
        loader.load(&mut f.graph, &[row("S1", "1")]).unwrap();

        let dataset = f.vocab.instance("dataset").unwrap();
        assert!(f.graph
            .contains(dataset, f.vocab.qb_structure.clone(), f.structure.iri.clone())
            .unwrap());
    }
}
