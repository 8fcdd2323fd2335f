//! Content-addressed identifiers for observations and slices.

use std::collections::BTreeMap;

use oxigraph::model::NamedNode;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::input::ObservationRow;
use crate::vocab::Vocabulary;

/// SHA-256 hex digest of the canonical JSON encoding of `content`.
pub fn content_digest<T: Serialize + ?Sized>(content: &T) -> Result<String> {
    let canonical = serde_json::to_string(content)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Identifier of an observation: digest of the whole row, column order
/// ignored.
pub fn observation_iri(vocab: &Vocabulary, row: &ObservationRow) -> Result<NamedNode> {
    let canonical: BTreeMap<&str, &str> = row.iter().collect();
    vocab.instance(&content_digest(&canonical)?)
}

/// Identifier of a slice: digest of the slice-level dimension values, in
/// dimension order.
pub fn slice_iri(
    vocab: &Vocabulary,
    row: &ObservationRow,
    slice_dimensions: &[String],
) -> Result<NamedNode> {
    let coordinates: Vec<Option<&str>> = slice_dimensions.iter().map(|d| row.get(d)).collect();
    vocab.instance(&content_digest(&coordinates)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::CubeConfig;

    fn vocab() -> Vocabulary {
        Vocabulary::new(&CubeConfig::default()).unwrap()
    }

    fn row(visit: &str) -> ObservationRow {
        ObservationRow::new()
            .with("subject", "S1")
            .with("arm", "A1")
            .with("visit", visit)
    }

    #[test]
    fn test_identical_rows_collide() {
        let vocab = vocab();
        assert_eq!(
            observation_iri(&vocab, &row("1")).unwrap(),
            observation_iri(&vocab, &row("1")).unwrap()
        );
    }

    #[test]
    fn test_column_order_is_irrelevant() {
        let vocab = vocab();
        let reordered = ObservationRow::new()
            .with("visit", "1")
            .with("arm", "A1")
            .with("subject", "S1");
        assert_eq!(
            observation_iri(&vocab, &row("1")).unwrap(),
            observation_iri(&vocab, &reordered).unwrap()
        );
    }

    #[test]
    fn test_any_difference_changes_identity() {
        let vocab = vocab();
        assert_ne!(
            observation_iri(&vocab, &row("1")).unwrap(),
            observation_iri(&vocab, &row("2")).unwrap()
        );
    }

    #[test]
    fn test_slice_uses_only_slice_dimensions() {
        let vocab = vocab();
        let dims = vec!["arm".to_string(), "visit".to_string()];
        let other_subject = row("1").with("subject", "S2");

        assert_eq!(
            slice_iri(&vocab, &row("1"), &dims).unwrap(),
            slice_iri(&vocab, &other_subject, &dims).unwrap()
        );
        assert_ne!(
            slice_iri(&vocab, &row("1"), &dims).unwrap(),
            slice_iri(&vocab, &row("2"), &dims).unwrap()
        );
    }

    #[test]
    fn test_digest_is_hex_sha256() {
        let digest = content_digest(&["a", "b"]).unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
