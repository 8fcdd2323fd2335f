//! Schema compilation: fields, ranges and code lists.

mod code_list;
mod compiler;
pub mod naming;

pub use code_list::{Choice, CodeList, Concept, parse_choices};
pub use compiler::{CompiledField, CompiledSchema, SchemaCompiler};
