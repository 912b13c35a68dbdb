//! Region adjacency with one compiled predicate per exit.

use std::collections::BTreeMap;

use waygraph_data::Graph;

use crate::rule::{Predicate, StateQuery};
use crate::{CompileError, RuleOwner};

/// Directed, guarded transition to `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub target: String,
    pub predicate: Predicate,
}

/// Region name -> outgoing edges sorted by target.
///
/// Every region of the source graph has an entry, even without exits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacency {
    regions: BTreeMap<String, Vec<Edge>>,
}

impl Adjacency {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Edge])> {
        self.regions.iter().map(|(name, edges)| (name.as_str(), edges.as_slice()))
    }

    pub fn edges(&self, region: &str) -> Option<&[Edge]> {
        self.regions.get(region).map(Vec::as_slice)
    }

    pub fn edge(&self, from: &str, to: &str) -> Option<&Edge> {
        self.edges(from)?.iter().find(|e| e.target == to)
    }

    /// Whether the exit `from -> to` exists and its predicate holds for `state`.
    pub fn can_traverse(&self, from: &str, to: &str, state: &dyn StateQuery) -> bool {
        self.edge(from, to).is_some_and(|e| e.predicate.evaluate(state))
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Host-facing name of the exit `from -> to`.
pub fn entrance_name(from: &str, to: &str) -> String {
    format!("{from} -> {to}")
}

/// Compile every exit of `graph` into an [`Adjacency`].
pub fn build_adjacency(graph: &Graph) -> Result<Adjacency, CompileError> {
    let mut regions = BTreeMap::new();
    for region in &graph.regions {
        let mut edges = region
            .exits
            .iter()
            .map(|exit| -> Result<Edge, CompileError> {
                let predicate = Predicate::compile(exit.rule.as_deref()).map_err(|reason| {
                    CompileError::MalformedExpression {
                        owner: RuleOwner::Exit {
                            region: region.name.clone(),
                            target: exit.target.clone(),
                        },
                        rule: exit.rule.clone().unwrap_or_default(),
                        reason,
                    }
                })?;
                Ok(Edge {
                    target: exit.target.clone(),
                    predicate,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        edges.sort_by(|a, b| a.target.cmp(&b.target));
        regions.insert(region.name.clone(), edges);
    }
    Ok(Adjacency { regions })
}
