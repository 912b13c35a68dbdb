use std::collections::{HashMap, HashSet};
use std::fmt;

use log::warn;
use serde_json::Value;

use crate::*;

/// Structural problem found in a [`RawDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateRegionName { region: Name },
    DuplicateLocationName { location: Name, first_region: Name, region: Name },
    UnknownGroup { region: Name, location: Name, group: String },
    UnknownExitTarget { region: Name, target: Name },
    DuplicateExit { region: Name, target: Name },
    NonStringLocationRule { region: Name, location: Name, value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateRegionName { region } => {
                write!(f, "duplicate region name '{region}'")
            },
            ValidationError::DuplicateLocationName {
                location,
                first_region,
                region,
            } => {
                write!(
                    f,
                    "duplicate location name '{location}' (in region '{region}', first declared in '{first_region}')"
                )
            },
            ValidationError::UnknownGroup { region, location, group } => {
                write!(f, "unknown group '{group}' on location '{location}' (region '{region}')")
            },
            ValidationError::UnknownExitTarget { region, target } => {
                write!(f, "region '{region}' has an exit to undeclared region '{target}'")
            },
            ValidationError::DuplicateExit { region, target } => {
                write!(f, "region '{region}' declares more than one exit to '{target}'")
            },
            ValidationError::NonStringLocationRule { region, location, value } => {
                write!(
                    f,
                    "location '{location}' (region '{region}') has rule {value}; location rules must be strings"
                )
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a raw document and report every structural problem found.
///
/// ```
/// use waygraph_data::{RawDocument, RawRegion, validate_document};
///
/// let doc = RawDocument {
///     regions: vec![
///         RawRegion { name: "Start".into(), locations: Vec::new(), exits: Vec::new() },
///         RawRegion { name: "Start".into(), locations: Vec::new(), exits: Vec::new() },
///     ],
/// };
/// assert_eq!(validate_document(&doc).len(), 1);
/// ```
pub fn validate_document(doc: &RawDocument) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut regions = HashSet::new();
    for region in &doc.regions {
        if !regions.insert(region.name.as_str()) {
            errors.push(ValidationError::DuplicateRegionName {
                region: region.name.clone(),
            });
        }
    }

    // location name -> first owning region
    let mut locations: HashMap<&str, &str> = HashMap::new();
    for region in &doc.regions {
        for location in &region.locations {
            if let Some(first) = locations.get(location.name.as_str()) {
                errors.push(ValidationError::DuplicateLocationName {
                    location: location.name.clone(),
                    first_region: (*first).to_string(),
                    region: region.name.clone(),
                });
            } else {
                locations.insert(&location.name, &region.name);
            }
            if let Some(group) = &location.group
                && Group::from_name(group).is_none()
            {
                errors.push(ValidationError::UnknownGroup {
                    region: region.name.clone(),
                    location: location.name.clone(),
                    group: group.clone(),
                });
            }
            if let Some(value) = &location.rule
                && !matches!(value, Value::Null | Value::String(_))
            {
                errors.push(ValidationError::NonStringLocationRule {
                    region: region.name.clone(),
                    location: location.name.clone(),
                    value: value.to_string(),
                });
            }
        }

        let mut targets = HashSet::new();
        for exit in &region.exits {
            if !regions.contains(exit.name.as_str()) {
                errors.push(ValidationError::UnknownExitTarget {
                    region: region.name.clone(),
                    target: exit.name.clone(),
                });
            }
            if !targets.insert(exit.name.as_str()) {
                errors.push(ValidationError::DuplicateExit {
                    region: region.name.clone(),
                    target: exit.name.clone(),
                });
            }
        }
    }

    errors
}

/// Validate and normalize a raw document into a [`Graph`].
///
/// Fails on the first problem [`validate_document`] would report. Missing
/// groups become [`Group::Item`]. Missing location rules and missing or
/// non-string exit rules become `None`; a location rule that is present but not
/// a string is rejected.
pub fn build_graph(doc: &RawDocument) -> Result<Graph, ValidationError> {
    if let Some(first) = validate_document(doc).into_iter().next() {
        return Err(first);
    }

    let regions = doc
        .regions
        .iter()
        .map(|raw| Region {
            name: raw.name.clone(),
            locations: raw
                .locations
                .iter()
                .map(|loc| Location {
                    name: loc.name.clone(),
                    group: loc.group.as_deref().and_then(Group::from_name).unwrap_or_default(),
                    rule: loc.rule.as_ref().and_then(Value::as_str).map(str::to_string),
                })
                .collect(),
            exits: raw
                .exits
                .iter()
                .map(|exit| Exit {
                    target: exit.name.clone(),
                    rule: exit_rule(exit.rule.as_ref(), &raw.name, &exit.name),
                })
                .collect(),
        })
        .collect();

    Ok(Graph { regions })
}

fn exit_rule(value: Option<&Value>, region: &str, target: &str) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            warn!("exit '{region} -> {target}': non-string rule {other} treated as always true");
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn region(name: &str) -> RawRegion {
        RawRegion {
            name: name.to_string(),
            locations: Vec::new(),
            exits: Vec::new(),
        }
    }

    fn location(name: &str, group: Option<&str>) -> RawLocation {
        RawLocation {
            name: name.to_string(),
            group: group.map(str::to_string),
            rule: None,
        }
    }

    fn exit(to: &str, rule: Option<Value>) -> RawExit {
        RawExit {
            name: to.to_string(),
            rule,
        }
    }

    #[test]
    fn empty_document_builds_empty_graph() {
        let graph = build_graph(&RawDocument::default()).expect("empty graph ok");
        assert!(graph.regions.is_empty());
    }

    #[test]
    fn duplicate_region_is_rejected() {
        let doc = RawDocument {
            regions: vec![region("Lobby"), region("Lobby")],
        };
        assert_eq!(
            build_graph(&doc),
            Err(ValidationError::DuplicateRegionName { region: "Lobby".into() })
        );
    }

    #[test]
    fn duplicate_location_across_regions_is_rejected() {
        let mut a = region("A");
        a.locations.push(location("Chest", None));
        let mut b = region("B");
        b.locations.push(location("Chest", None));
        let doc = RawDocument { regions: vec![a, b] };
        let errors = validate_document(&doc);
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateLocationName {
                location: "Chest".into(),
                first_region: "A".into(),
                region: "B".into(),
            }]
        );
    }

    #[test]
    fn unknown_group_names_the_location() {
        let mut a = region("A");
        a.locations.push(location("Odd", Some("Treasure")));
        let doc = RawDocument { regions: vec![a] };
        let err = build_graph(&doc).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownGroup { ref location, .. } if location == "Odd"));
        assert!(err.to_string().contains("'Treasure'"));
    }

    #[test]
    fn group_names_are_case_sensitive() {
        let mut a = region("A");
        a.locations.push(location("Gate", Some("metal gate")));
        let doc = RawDocument { regions: vec![a] };
        assert!(matches!(build_graph(&doc), Err(ValidationError::UnknownGroup { .. })));
    }

    #[test]
    fn dangling_and_duplicate_exits_are_reported() {
        let mut a = region("A");
        a.exits.push(exit("B", None));
        a.exits.push(exit("B", None));
        a.exits.push(exit("Nowhere", None));
        let doc = RawDocument {
            regions: vec![a, region("B")],
        };
        let errors = validate_document(&doc);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ValidationError::DuplicateExit {
            region: "A".into(),
            target: "B".into()
        }));
        assert!(errors.contains(&ValidationError::UnknownExitTarget {
            region: "A".into(),
            target: "Nowhere".into()
        }));
    }

    #[test]
    fn defaults_are_normalized() {
        let mut a = region("A");
        a.locations.push(location("Coin", None));
        a.locations.push(RawLocation {
            name: "Boss".into(),
            group: Some("Bosses".into()),
            rule: Some(json!("Sword or Wand")),
        });
        a.exits.push(exit("A", Some(json!(false))));
        let graph = build_graph(&RawDocument { regions: vec![a] }).expect("valid");
        let r = graph.region("A").expect("region A");
        assert_eq!(r.locations[0].group, Group::Item);
        assert_eq!(r.locations[0].rule, None);
        assert_eq!(r.locations[1].group, Group::Bosses);
        assert_eq!(r.locations[1].rule.as_deref(), Some("Sword or Wand"));
        assert_eq!(r.exits[0].rule, None);
    }

    #[test]
    fn non_string_location_rule_is_rejected() {
        let doc: RawDocument = serde_json::from_value(json!({
            "regions": [
                { "name": "Vault", "locations": [
                    { "name": "Sealed", "rule": false },
                    { "name": "Open", "rule": null }
                ] }
            ]
        }))
        .expect("document parses");
        let errors = validate_document(&doc);
        assert_eq!(
            errors,
            vec![ValidationError::NonStringLocationRule {
                region: "Vault".into(),
                location: "Sealed".into(),
                value: "false".into(),
            }]
        );
        let err = build_graph(&doc).unwrap_err();
        assert!(err.to_string().contains("location 'Sealed'"), "{err}");
    }

    #[test]
    fn historical_rules_key_is_accepted() {
        let doc: RawDocument = serde_json::from_value(json!({
            "regions": [
                { "name": "A", "exits": [ { "name": "B", "rules": "Key" } ] },
                { "name": "B", "locations": [ { "name": "Boss", "group": "Bosses", "rules": "Sword" } ] }
            ]
        }))
        .expect("document parses");
        let graph = build_graph(&doc).expect("valid");
        assert_eq!(graph.regions[0].exits[0].rule.as_deref(), Some("Key"));
        assert_eq!(graph.regions[1].locations[0].rule.as_deref(), Some("Sword"));
    }
}
