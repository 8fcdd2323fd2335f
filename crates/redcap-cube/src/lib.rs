//! redcap-cube: compile REDCap data dictionaries into RDF Data Cubes.
//!
//! A REDCap project is described by a data dictionary (one row per field),
//! optionally annotated by a mapping file that marks dimensions and attaches
//! concepts, units and ranges. This crate turns those descriptions into a
//! W3C RDF Data Cube: a data structure definition, SKOS code lists for coded
//! fields, and content-addressed observations grouped into slices.
//!
//! # Core Principles
//!
//! - **Deterministic**: Identical inputs produce identical triple sets
//! - **Content-addressed**: Observation and slice IRIs are hashes of their values
//! - **Checkable**: Every cube can be validated against the Data Cube
//!   well-formedness constraints
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use redcap_cube::{CubeConfig, CubeInputs, DataCube};
//!
//! let inputs = CubeInputs {
//!     datadict: Some(PathBuf::from("datadict.csv")),
//!     mapping: Some(PathBuf::from("mapping.csv")),
//!     metadata: Some(PathBuf::from("metadata.csv")),
//!     dimensions: "subject,arm,visit".to_string(),
//!     slices: None,
//!     observations: Some(PathBuf::from("observations.csv")),
//! };
//! let cube = DataCube::compile(&inputs, CubeConfig::default()).unwrap();
//!
//! println!("Triples: {}", cube.graph().len().unwrap());
//! println!("Valid: {}", cube.check_integrity().unwrap().is_valid());
//! ```

pub mod error;
pub mod graph;
pub mod input;
pub mod integrity;
pub mod metadata;
pub mod observation;
pub mod resolver;
pub mod schema;
pub mod structure;
pub mod vocab;

mod cube;

pub use crate::cube::{
    CubeBuilder, CubeConfig, CubeInputs, DataCube, SchemaCompiled, Start, Structured,
};
pub use error::{CubeError, Result};
pub use graph::Graph;
pub use input::{DatasetMetadata, Field, FieldType, MappingEntry, ObservationRow, SliceDefinition};
pub use integrity::{Constraint, IntegrityReport};
pub use observation::LoadSummary;
pub use resolver::CodeIndex;
pub use schema::{CodeList, CompiledSchema};
pub use structure::Structure;
pub use vocab::{TermRegistry, Vocabulary};
