//! Observation loading and content-addressed identity.

pub mod identity;
mod loader;

pub use identity::{content_digest, observation_iri, slice_iri};
pub use loader::{LoadSummary, ObservationLoader};
