//! CLI command implementations.

pub mod check;
pub mod create;
pub mod query;
