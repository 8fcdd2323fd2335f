//! Integrity-constraint harness for compiled cubes.
//!
//! Every [`Constraint`] is a SPARQL ASK query that answers `true` when the
//! graph violates it. A well-formed cube answers `false` to all of them.
//! The harness only reads the graph.

mod constraints;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::Graph;

pub use constraints::Constraint;

/// Outcome of running the constraint battery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub checked: usize,
    pub violations: Vec<Constraint>,
}

impl IntegrityReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violates(&self, constraint: Constraint) -> bool {
        self.violations.contains(&constraint)
    }
}

/// Whether `graph` violates `constraint`.
pub fn violates(graph: &Graph, constraint: Constraint) -> Result<bool> {
    graph.ask(&constraint.query())
}

/// Run every constraint against `graph`.
pub fn check(graph: &Graph) -> Result<IntegrityReport> {
    let mut report = IntegrityReport::default();
    for constraint in Constraint::ALL {
        report.checked += 1;
        if violates(graph, constraint)? {
            log::warn!("Integrity violation: {} ({})", constraint, constraint.description());
            report.violations.push(constraint);
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_graph_is_valid() {
        let graph = Graph::new().unwrap();
        let report = check(&graph).unwrap();

        assert_eq!(report.checked, Constraint::ALL.len());
        assert!(report.is_valid(), "violations: {:?}", report.violations);
    }

    #[test]
    fn test_every_query_parses() {
        let graph = Graph::new().unwrap();
        for constraint in Constraint::ALL {
            assert!(
                graph.query(&constraint.query()).is_ok(),
                "query for {constraint} failed to evaluate"
            );
        }
    }

    #[test]
    fn test_constraint_names() {
        assert_eq!(Constraint::SingleDataSet.to_string(), "single-data-set");
        assert_eq!(Constraint::CodesFromCodeList.to_string(), "codes-from-code-list");
    }
}
