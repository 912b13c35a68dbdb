//! Location groups and settings-driven inclusion.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use waygraph_data::{Graph, Group, Location};

use crate::config::{GateBehavior, Settings};

impl Settings {
    /// Whether `location` is a check under these settings.
    ///
    /// Decided per location; groups not governed by a toggle are always in.
    pub fn includes(&self, location: &Location) -> bool {
        match location.group {
            Group::MetalGate => self.shortcut_gates == GateBehavior::Randomized,
            Group::Barrier => self.barriers == GateBehavior::Randomized,
            Group::Lore => self.lore_checks,
            Group::Bosses | Group::Item | Group::Chest | Group::Teleport | Group::Event => true,
        }
    }
}

/// Result of one classification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Included locations by group, names sorted. Empty groups are absent.
    pub groups: BTreeMap<Group, BTreeSet<String>>,
    /// Locations withheld by the settings.
    pub excluded: BTreeSet<String>,
}

impl Classification {
    pub fn is_included(&self, name: &str) -> bool {
        !self.excluded.contains(name)
    }

    pub fn group_of(&self, name: &str) -> Option<Group> {
        self.groups
            .iter()
            .find_map(|(group, names)| names.contains(name).then_some(*group))
    }
}

/// Place every location into its group, dropping those the settings exclude.
pub fn classify(graph: &Graph, settings: &Settings) -> Classification {
    let mut out = Classification::default();
    for (region, location) in graph.locations() {
        if settings.includes(location) {
            out.groups
                .entry(location.group)
                .or_default()
                .insert(location.name.clone());
        } else {
            debug!(
                "withholding {} location '{}' in '{}'",
                location.group, location.name, region.name
            );
            out.excluded.insert(location.name.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use waygraph_data::Region;

    use super::*;

    fn loc(name: &str, group: Group) -> Location {
        Location {
            name: name.to_string(),
            group,
            rule: None,
        }
    }

    fn graph() -> Graph {
        Graph {
            regions: vec![Region {
                name: "Shrine".into(),
                locations: vec![
                    loc("Gate B", Group::MetalGate),
                    loc("Gate A", Group::MetalGate),
                    loc("Ward", Group::Barrier),
                    loc("Tablet", Group::Lore),
                    loc("Coin", Group::Item),
                ],
                exits: Vec::new(),
            }],
        }
    }

    #[test]
    fn randomized_settings_include_everything() {
        let c = classify(&graph(), &Settings::default());
        assert!(c.excluded.is_empty());
        let gates: Vec<&str> = c.groups[&Group::MetalGate].iter().map(String::as_str).collect();
        assert_eq!(gates, vec!["Gate A", "Gate B"]);
        assert_eq!(c.group_of("Coin"), Some(Group::Item));
    }

    #[test]
    fn vanilla_gates_are_withheld() {
        let settings = Settings {
            shortcut_gates: GateBehavior::Vanilla,
            ..Settings::default()
        };
        let c = classify(&graph(), &settings);
        assert!(!c.groups.contains_key(&Group::MetalGate));
        assert!(!c.is_included("Gate A"));
        assert!(!c.is_included("Gate B"));
        assert!(c.is_included("Ward"));
    }

    #[test]
    fn each_toggle_is_independent() {
        let settings = Settings {
            shortcut_gates: GateBehavior::Randomized,
            barriers: GateBehavior::Open,
            lore_checks: false,
        };
        let c = classify(&graph(), &settings);
        let excluded: Vec<&str> = c.excluded.iter().map(String::as_str).collect();
        assert_eq!(excluded, vec!["Tablet", "Ward"]);
        assert!(c.groups.contains_key(&Group::MetalGate));
    }
}
