//! Dataset metadata → the `qb:DataSet` node.

use chrono::NaiveDate;
use oxigraph::model::{Literal, NamedNode};

use crate::error::Result;
use crate::graph::Graph;
use crate::input::DatasetMetadata;
use crate::vocab::Vocabulary;

/// Dataset IRI for a metadata id: names containing `:` are expanded as
/// IRIs or prefixed names, bare ids are minted in the instance namespace.
pub fn dataset_iri(vocab: &Vocabulary, dataset_id: &str) -> Result<NamedNode> {
    if dataset_id.contains(':') {
        vocab.expand(dataset_id)
    } else {
        vocab.instance(dataset_id)
    }
}

/// Add one `qb:DataSet` per metadata row and return their IRIs.
///
/// Datasets are linked to any structure definition already in the graph.
pub fn add_metadata(
    graph: &mut Graph,
    vocab: &Vocabulary,
    records: &[DatasetMetadata],
) -> Result<Vec<NamedNode>> {
    let structures = graph.instances_of(vocab.rdf_type.as_ref(), vocab.qb_dsd.as_ref())?;
    let mut datasets = Vec::with_capacity(records.len());

    for record in records {
        let dataset = dataset_iri(vocab, &record.dataset_id)?;
        graph.add(dataset.clone(), vocab.rdf_type.clone(), vocab.qb_dataset.clone())?;

        let literals = [
            (&vocab.dct_title, &record.title),
            (&vocab.dct_description, &record.description),
            (&vocab.dct_publisher, &record.publisher),
        ];
        for (predicate, value) in literals {
            if let Some(value) = value {
                graph.add(dataset.clone(), predicate.clone(), Literal::new_simple_literal(value))?;
            }
        }

        if let Some(issued) = &record.issued {
            graph.add(dataset.clone(), vocab.dct_issued.clone(), issued_literal(vocab, issued))?;
        }
        if let Some(subject) = &record.subject {
            graph.add(dataset.clone(), vocab.dct_subject.clone(), vocab.expand(subject)?)?;
        }
        for structure in &structures {
            graph.add(dataset.clone(), vocab.qb_structure.clone(), structure.clone())?;
        }

        log::info!("Dataset {}", dataset.as_str());
        datasets.push(dataset);
    }
    Ok(datasets)
}

fn issued_literal(vocab: &Vocabulary, issued: &str) -> Literal {
    let value = match NaiveDate::parse_from_str(issued, "%Y-%m-%d") {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(e) => {
            log::warn!("Issued date '{issued}' is not an ISO date: {e}");
            issued.to_string()
        }
    };
    Literal::new_typed_literal(value, vocab.xsd_date.clone())
}
