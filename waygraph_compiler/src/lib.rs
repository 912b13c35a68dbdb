//! waygraph_compiler: traversal graph to host-module compiler
//!
//! Takes a region/location/exit document (see `waygraph_data`) and produces
//! three Python modules for the host randomizer:
//! - `locations.py`: location ids and group tables
//! - `regions.py`: region adjacency (topology only)
//! - `rules.py`: access predicates for exits and locations
//!
//! The pipeline is a single batch pass: validate the graph, compile every
//! rule, assign ids over the full name set, classify locations, build the
//! adjacency, then render. Any error aborts before rendering, and rendering
//! iterates sorted collections only, so identical input gives identical bytes.

pub mod classify;
pub mod config;
pub mod emit;
pub mod graph;
pub mod ids;
pub mod rule;

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, info};
use thiserror::Error;
use waygraph_data::{Graph, RawDocument, ValidationError, build_graph};

pub use classify::{Classification, classify};
pub use config::{CompilerConfig, ConfigError, GateBehavior, IdConfig, Settings, WorldConfig};
pub use emit::{Artifacts, emit};
pub use graph::{Adjacency, Edge, build_adjacency, entrance_name};
pub use ids::{IdMap, assign_ids, event_policy};
pub use rule::{Atom, Expr, Predicate, RuleError, StateQuery};

/// What a rule is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOwner {
    Location { region: String, location: String },
    Exit { region: String, target: String },
}

impl fmt::Display for RuleOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleOwner::Location { region, location } => write!(f, "location '{location}' (region '{region}')"),
            RuleOwner::Exit { region, target } => write!(f, "exit '{}'", entrance_name(region, target)),
        }
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("invalid graph: {0}")]
    Validation(#[from] ValidationError),
    #[error("malformed rule on {owner}: {reason} (rule: {rule:?})")]
    MalformedExpression {
        owner: RuleOwner,
        rule: String,
        reason: RuleError,
    },
    #[error("regions '{first}' and '{second}' both map to the table name '{identifier}'")]
    RegionIdentifierCollision {
        first: String,
        second: String,
        identifier: String,
    },
}

/// Locations of one region as they appear in the locations module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTable {
    pub region: String,
    /// Module-level variable name, e.g. `abandoned_mine_locations`.
    pub identifier: String,
    /// Included locations, sorted.
    pub locations: Vec<String>,
}

/// Everything the emitter needs, fully compiled and validated.
#[derive(Debug, Clone)]
pub struct CompiledWorld {
    pub ids: IdMap,
    pub classification: Classification,
    pub adjacency: Adjacency,
    /// Rules of included locations, keyed by location name.
    pub location_rules: BTreeMap<String, Expr>,
    /// Region tables in region-name order; regions without included locations are skipped.
    pub region_tables: Vec<RegionTable>,
    /// Naming and id offset the world was compiled with; `ids` are absolute
    /// against `naming.base_id`.
    pub naming: WorldConfig,
}

impl CompiledWorld {
    pub fn new(graph: &Graph, config: &CompilerConfig) -> Result<Self, CompileError> {
        let classification = classify(graph, &config.settings);

        let mut location_rules = BTreeMap::new();
        for (region, location) in graph.locations() {
            let Some(text) = location.rule.as_deref() else {
                continue;
            };
            let expr = Expr::parse(text).map_err(|reason| CompileError::MalformedExpression {
                owner: RuleOwner::Location {
                    region: region.name.clone(),
                    location: location.name.clone(),
                },
                rule: text.to_string(),
                reason,
            })?;
            if classification.is_included(&location.name) {
                location_rules.insert(location.name.clone(), expr);
            }
        }

        let adjacency = build_adjacency(graph)?;
        let region_tables = region_tables(graph, &classification)?;

        // Every name is known at this point; ids are assigned in one go.
        let ids = assign_ids(
            graph.locations().map(|(_, l)| l),
            config.world.base_id,
            event_policy(&config.ids),
        );

        debug!(
            "compiled {} regions, {} locations, {} location rules",
            adjacency.len(),
            ids.len(),
            location_rules.len()
        );

        Ok(CompiledWorld {
            ids,
            classification,
            adjacency,
            location_rules,
            region_tables,
            naming: config.world.clone(),
        })
    }
}

fn region_tables(graph: &Graph, classification: &Classification) -> Result<Vec<RegionTable>, CompileError> {
    let mut regions: Vec<_> = graph.regions.iter().filter(|r| !r.locations.is_empty()).collect();
    regions.sort_by(|a, b| a.name.cmp(&b.name));

    let mut seen: BTreeMap<String, &str> = BTreeMap::new();
    let mut tables = Vec::new();
    for region in regions {
        let identifier = format!("{}_locations", emit::python::identifier(&region.name));
        if let Some(first) = seen.get(&identifier) {
            return Err(CompileError::RegionIdentifierCollision {
                first: (*first).to_string(),
                second: region.name.clone(),
                identifier,
            });
        }
        seen.insert(identifier.clone(), &region.name);

        let mut locations: Vec<String> = region
            .locations
            .iter()
            .filter(|l| classification.is_included(&l.name))
            .map(|l| l.name.clone())
            .collect();
        if locations.is_empty() {
            continue;
        }
        locations.sort();
        tables.push(RegionTable {
            region: region.name.clone(),
            identifier,
            locations,
        });
    }
    Ok(tables)
}

/// Compile a raw document into the three host modules.
///
/// ```
/// use waygraph_compiler::{CompilerConfig, compile};
/// use waygraph_data::RawDocument;
///
/// let doc: RawDocument = serde_json::from_str(
///     r#"{ "regions": [ { "name": "Start", "locations": [ { "name": "Coin" } ] } ] }"#,
/// )
/// .unwrap();
/// let out = compile(&doc, &CompilerConfig::default()).unwrap();
/// assert!(out.locations.contains("\"Coin\": base_id + 0,"));
/// ```
pub fn compile(doc: &RawDocument, config: &CompilerConfig) -> Result<Artifacts, CompileError> {
    let graph = build_graph(doc)?;
    info!("graph validated: {} regions", graph.regions.len());
    let world = CompiledWorld::new(&graph, config)?;
    Ok(emit(&world))
}
