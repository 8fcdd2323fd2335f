//! Input records and CSV readers.

mod reader;
mod records;

pub use reader::{
    available, parse_observations, parse_records, read_observations, read_records,
};
pub use records::{
    DatasetMetadata, Field, FieldType, Mapping, MappingEntry, ObservationRow, SliceDefinition,
    SliceDefinitions, mapping_from_entries, slices_from_definitions,
};
