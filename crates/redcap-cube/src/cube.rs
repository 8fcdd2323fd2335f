//! Staged cube builder and the compiled cube.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use oxigraph::sparql::QueryResults;

use crate::error::Result;
use crate::graph::Graph;
use crate::input::{
    self, DatasetMetadata, Field, Mapping, MappingEntry, ObservationRow, SliceDefinition,
    SliceDefinitions, mapping_from_entries, slices_from_definitions,
};
use crate::integrity::{self, IntegrityReport};
use crate::metadata;
use crate::observation::{LoadSummary, ObservationLoader};
use crate::resolver::CodeIndex;
use crate::schema::{CompiledSchema, SchemaCompiler};
use crate::structure::{Structure, StructureBuilder, parse_dimensions};
use crate::vocab::Vocabulary;

/// Namespaces and conventions for a compilation run.
#[derive(Debug, Clone)]
pub struct CubeConfig {
    /// Prefix for fields, code lists and slice keys.
    pub project_prefix: String,
    pub project_namespace: String,
    /// Prefix for project properties (`unitMeasure`, `statistic`).
    pub terms_prefix: String,
    pub terms_namespace: String,
    /// Prefix for content-addressed observations, slices and datasets.
    pub instance_prefix: String,
    pub instance_namespace: String,
    /// Further bindings, used for prefixed names in the mapping file and
    /// for Turtle output.
    pub extra_namespaces: Vec<(String, String)>,
    /// Observation columns with this suffix are display-only.
    pub label_suffix: String,
}

impl Default for CubeConfig {
    fn default() -> Self {
        let extra = [
            ("fma", "http://purl.org/sig/fma#"),
            ("prov", "http://w3c.org/ns/prov#"),
            ("nidm", "http://purl.org/nidash/nidm#"),
            ("fs", "http://www.incf.org/ns/nidash/fs#"),
            ("obo", "http://purl.obolibrary.org/obo/"),
        ];
        Self {
            project_prefix: "ncanda".to_string(),
            project_namespace: "http://ncanda.sri.com/terms.ttl#".to_string(),
            terms_prefix: "sibis".to_string(),
            terms_namespace: "http://sibis.sri.com/terms#".to_string(),
            instance_prefix: "iri".to_string(),
            instance_namespace: "http://sibis.sri.com/iri/".to_string(),
            extra_namespaces: extra
                .iter()
                .map(|(p, n)| (p.to_string(), n.to_string()))
                .collect(),
            label_suffix: "_label".to_string(),
        }
    }
}

impl CubeConfig {
    pub fn with_project(
        mut self,
        prefix: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        self.project_prefix = prefix.into();
        self.project_namespace = namespace.into();
        self
    }

    pub fn with_instance(
        mut self,
        prefix: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        self.instance_prefix = prefix.into();
        self.instance_namespace = namespace.into();
        self
    }

    pub fn with_namespace(
        mut self,
        prefix: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        self.extra_namespaces.push((prefix.into(), namespace.into()));
        self
    }
}

/// Nothing compiled yet.
pub struct Start;

/// Fields compiled; the code index is ready.
pub struct SchemaCompiled {
    schema: CompiledSchema,
    codes: CodeIndex,
}

/// Structure definition built; observations may be loaded.
pub struct Structured {
    schema: CompiledSchema,
    codes: CodeIndex,
    structure: Structure,
}

/// Builds a cube in the order schema → structure → observations.
///
/// Each phase is a distinct type, so loading observations before the
/// structure exists does not compile. Metadata may be added in any phase.
pub struct CubeBuilder<P> {
    config: CubeConfig,
    vocab: Vocabulary,
    graph: Graph,
    phase: P,
}

impl CubeBuilder<Start> {
    pub fn new() -> Result<Self> {
        Self::with_config(CubeConfig::default())
    }

    pub fn with_config(config: CubeConfig) -> Result<Self> {
        let vocab = Vocabulary::new(&config)?;
        let mut graph = Graph::new()?;
        for (prefix, namespace) in vocab.registry().bindings() {
            graph.bind(prefix, namespace);
        }
        Ok(Self {
            config,
            vocab,
            graph,
            phase: Start,
        })
    }

    /// Compile the data dictionary at `datadict`, with optional mapping.
    ///
    /// A missing dictionary compiles to an empty schema.
    pub fn compile_schema_files(
        self,
        datadict: Option<&Path>,
        mapping: Option<&Path>,
    ) -> Result<CubeBuilder<SchemaCompiled>> {
        let entries: Vec<MappingEntry> = match input::available(mapping, "Mapping") {
            Some(path) => input::read_records(path)?,
            None => Vec::new(),
        };
        let mapping = mapping_from_entries(entries);

        match input::available(datadict, "Data dictionary") {
            Some(path) => {
                log::info!("Processing: {}", path.display());
                let fields: Vec<Field> = input::read_records(path)?;
                self.compile_schema(&dictionary_name(path), &fields, &mapping)
            }
            None => self.compile_schema("datadict", &[], &mapping),
        }
    }

    pub fn compile_schema(
        mut self,
        name: &str,
        fields: &[Field],
        mapping: &Mapping,
    ) -> Result<CubeBuilder<SchemaCompiled>> {
        let schema =
            SchemaCompiler::new(&self.vocab).compile(&mut self.graph, name, fields, mapping)?;
        let codes = CodeIndex::from_schema(&schema, self.vocab.unresolved_code.clone());
        Ok(CubeBuilder {
            config: self.config,
            vocab: self.vocab,
            graph: self.graph,
            phase: SchemaCompiled { schema, codes },
        })
    }
}

impl CubeBuilder<SchemaCompiled> {
    pub fn schema(&self) -> &CompiledSchema {
        &self.phase.schema
    }

    /// Build the structure from a comma-separated dimension list and an
    /// optional slice definitions file.
    pub fn add_structure_files(
        self,
        dimensions: &str,
        slices: Option<&Path>,
    ) -> Result<CubeBuilder<Structured>> {
        let definitions: Vec<SliceDefinition> = match input::available(slices, "Slices") {
            Some(path) => input::read_records(path)?,
            None => Vec::new(),
        };
        self.add_structure(&parse_dimensions(dimensions), &slices_from_definitions(definitions))
    }

    pub fn add_structure(
        mut self,
        dimensions: &[String],
        slices: &SliceDefinitions,
    ) -> Result<CubeBuilder<Structured>> {
        let SchemaCompiled { schema, codes } = self.phase;
        let structure =
            StructureBuilder::new(&self.vocab).build(&mut self.graph, &schema, dimensions, slices)?;
        if let Some(dimension) = structure.observation_dimension() {
            log::debug!(
                "Observation dimension '{}', {} slice dimension(s)",
                dimension,
                structure.slice_dimensions().len()
            );
        }
        Ok(CubeBuilder {
            config: self.config,
            vocab: self.vocab,
            graph: self.graph,
            phase: Structured {
                schema,
                codes,
                structure,
            },
        })
    }
}

impl CubeBuilder<Structured> {
    pub fn schema(&self) -> &CompiledSchema {
        &self.phase.schema
    }

    pub fn structure(&self) -> &Structure {
        &self.phase.structure
    }

    pub fn load_observation_file(&mut self, path: Option<&Path>) -> Result<LoadSummary> {
        match input::available(path, "Observations") {
            Some(path) => {
                log::info!("Processing: {}", path.display());
                let rows = input::read_observations(path)?;
                self.load_observations(&rows)
            }
            None => Ok(LoadSummary::default()),
        }
    }

    pub fn load_observations(&mut self, rows: &[ObservationRow]) -> Result<LoadSummary> {
        let Structured {
            schema,
            codes,
            structure,
        } = &self.phase;
        ObservationLoader::new(&self.vocab, schema, structure, codes)
            .with_label_suffix(&self.config.label_suffix)
            .load(&mut self.graph, rows)
    }
}

impl<P> CubeBuilder<P> {
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn add_metadata_file(&mut self, path: Option<&Path>) -> Result<()> {
        if let Some(path) = input::available(path, "Metadata") {
            log::info!("Metadata processing: {}", path.display());
            let records: Vec<DatasetMetadata> = input::read_records(path)?;
            self.add_metadata(&records)?;
        }
        Ok(())
    }

    pub fn add_metadata(&mut self, records: &[DatasetMetadata]) -> Result<()> {
        metadata::add_metadata(&mut self.graph, &self.vocab, records)?;
        Ok(())
    }

    /// Stop building; the graph is handed to the cube as is.
    pub fn finish(self) -> DataCube {
        DataCube {
            vocab: self.vocab,
            graph: self.graph,
        }
    }
}

/// Structure name from the dictionary file stem.
fn dictionary_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "datadict".to_string())
}

/// File locations for a full compilation run. Unset paths are skipped.
#[derive(Debug, Clone, Default)]
pub struct CubeInputs {
    pub datadict: Option<PathBuf>,
    pub mapping: Option<PathBuf>,
    pub metadata: Option<PathBuf>,
    /// Comma-separated dimension names; the first is observation-level.
    pub dimensions: String,
    pub slices: Option<PathBuf>,
    pub observations: Option<PathBuf>,
}

/// A compiled cube: the finished graph and its vocabulary.
pub struct DataCube {
    vocab: Vocabulary,
    graph: Graph,
}

impl DataCube {
    /// Run every pass over the given files.
    pub fn compile(inputs: &CubeInputs, config: CubeConfig) -> Result<Self> {
        let mut builder = CubeBuilder::with_config(config)?
            .compile_schema_files(inputs.datadict.as_deref(), inputs.mapping.as_deref())?;
        builder.add_metadata_file(inputs.metadata.as_deref())?;
        let mut builder =
            builder.add_structure_files(&inputs.dimensions, inputs.slices.as_deref())?;
        builder.load_observation_file(inputs.observations.as_deref())?;
        Ok(builder.finish())
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    pub fn query(&self, sparql: &str) -> Result<QueryResults> {
        self.graph.query(sparql)
    }

    pub fn ask(&self, sparql: &str) -> Result<bool> {
        self.graph.ask(sparql)
    }

    pub fn check_integrity(&self) -> Result<IntegrityReport> {
        integrity::check(&self.graph)
    }

    pub fn to_turtle(&self) -> Result<String> {
        self.graph.to_turtle()
    }

    /// Sorted N-Triples lines, for comparing two runs.
    pub fn canonical_triples(&self) -> Result<BTreeSet<String>> {
        self.graph.canonical_triples()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FieldType;
    use oxigraph::model::NamedNode;

    #[test]
    fn test_dictionary_name() {
        assert_eq!(dictionary_name(Path::new("/data/ncanda_datadict.csv")), "ncanda_datadict");
    }

    #[test]
    fn test_builder_phases() {
        let fields = vec![
            Field::new("subject", FieldType::Text),
            Field::new("score", FieldType::Text).with_validation("number"),
        ];
        let mut builder = CubeBuilder::new()
            .unwrap()
            .compile_schema("datadict", &fields, &Mapping::new())
            .unwrap()
            .add_structure(&parse_dimensions("subject"), &SliceDefinitions::new())
            .unwrap();

        assert_eq!(builder.structure().measures, vec!["score"]);
        let rows = vec![ObservationRow::new().with("subject", "S1").with("score", "1.5")];
        let summary = builder.load_observations(&rows).unwrap();
        assert_eq!(summary.observations, 1);

        let cube = builder.finish();
        assert!(cube.graph().len().unwrap() > 0);
    }

    #[test]
    fn test_custom_namespaces() {
        let config = CubeConfig::default()
            .with_project("study", "http://example.org/study#")
            .with_instance("data", "http://example.org/data/")
            .with_namespace("uo", "http://purl.obolibrary.org/obo/UO_");
        let fields = vec![
            Field::new("subject", FieldType::Text),
            Field::new("visit", FieldType::Radio).with_choices("1,Baseline|2,Followup"),
            Field::new("score", FieldType::Text).with_validation("number"),
        ];
        let mut subject = MappingEntry::new("subject");
        subject.dimension = Some("y".into());
        let mut visit = MappingEntry::new("visit");
        visit.dimension = Some("y".into());
        let mut score = MappingEntry::new("score");
        score.units = Some("uo:0000189".into());
        let mapping = mapping_from_entries([subject, visit, score]);

        let mut builder = CubeBuilder::with_config(config)
            .unwrap()
            .compile_schema("datadict", &fields, &mapping)
            .unwrap()
            .add_structure(&parse_dimensions("subject,visit"), &SliceDefinitions::new())
            .unwrap();
        assert_eq!(builder.structure().observation_dimension(), Some("subject"));
        assert_eq!(builder.structure().slice_dimensions(), ["visit".to_string()]);

        let row = ObservationRow::new()
            .with("subject", "S1")
            .with("visit", "1")
            .with("score", "2.5");
        builder.load_observations(&[row]).unwrap();
        let cube = builder.finish();
        let v = cube.vocabulary();

        assert_eq!(
            v.project("visit").unwrap().as_str(),
            "http://example.org/study#visit"
        );
        let units = NamedNode::new_unchecked("http://purl.obolibrary.org/obo/UO_0000189");
        assert!(cube
            .graph()
            .contains(v.project("score").unwrap(), v.unit_measure.clone(), units)
            .unwrap());
        assert!(cube
            .ask("ASK { ?obs a <http://purl.org/linked-data/cube#Observation> . \
                  FILTER STRSTARTS(STR(?obs), \"http://example.org/data/\") }")
            .unwrap());
    }

    #[test]
    fn test_compile_without_inputs_builds_empty_structure() {
        let inputs = CubeInputs::default();
        let cube = DataCube::compile(&inputs, CubeConfig::default()).unwrap();

        assert!(cube
            .ask("ASK { ?dsd a <http://purl.org/linked-data/cube#DataStructureDefinition> }")
            .unwrap());
    }
}
