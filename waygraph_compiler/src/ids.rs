//! Stable numeric location identifiers.
//!
//! Ids depend only on the set of location names: the names that need an id
//! are sorted and numbered from `base_id`. Document order, gating settings and
//! earlier runs have no influence.

use std::collections::{BTreeMap, BTreeSet};

use waygraph_data::{Group, Location};

use crate::config::IdConfig;

/// Location name -> numeric id, `None` for event placements.
pub type IdMap = BTreeMap<String, Option<u64>>;

/// Assign ids to every location.
///
/// All names are collected before any id is handed out. Locations for which
/// `is_event` holds map to `None` and do not consume a slot.
pub fn assign_ids<'a, I, F>(locations: I, base_id: u64, is_event: F) -> IdMap
where
    I: IntoIterator<Item = &'a Location>,
    F: Fn(&Location) -> bool,
{
    let mut ids = IdMap::new();
    let mut numbered = BTreeSet::new();
    for location in locations {
        if is_event(location) {
            ids.insert(location.name.clone(), None);
        } else {
            numbered.insert(location.name.as_str());
        }
    }
    for (index, name) in (0u64..).zip(numbered) {
        ids.insert(name.to_string(), Some(base_id + index));
    }
    ids
}

/// Default event test: the `Event` group plus any name listed in the config.
pub fn event_policy(config: &IdConfig) -> impl Fn(&Location) -> bool + '_ {
    move |location: &Location| location.group == Group::Event || config.null_id_locations.contains(&location.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(name: &str, group: Group) -> Location {
        Location {
            name: name.to_string(),
            group,
            rule: None,
        }
    }

    #[test]
    fn ids_follow_sorted_names() {
        let locations = [loc("Chest 1", Group::Chest), loc("Boss", Group::Bosses), loc("Altar", Group::Item)];
        let ids = assign_ids(&locations, 100, |_| false);
        assert_eq!(ids["Altar"], Some(100));
        assert_eq!(ids["Boss"], Some(101));
        assert_eq!(ids["Chest 1"], Some(102));
    }

    #[test]
    fn events_do_not_consume_slots() {
        let config = IdConfig {
            null_id_locations: vec!["Credits".to_string()],
        };
        let locations = [
            loc("B", Group::Item),
            loc("A", Group::Event),
            loc("Credits", Group::Bosses),
            loc("C", Group::Item),
        ];
        let ids = assign_ids(&locations, 0, event_policy(&config));
        assert_eq!(ids["A"], None);
        assert_eq!(ids["Credits"], None);
        assert_eq!(ids["B"], Some(0));
        assert_eq!(ids["C"], Some(1));
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn order_of_input_does_not_matter() {
        let forward = [loc("x", Group::Item), loc("y", Group::Item), loc("z", Group::Item)];
        let backward = [loc("z", Group::Item), loc("y", Group::Item), loc("x", Group::Item)];
        assert_eq!(assign_ids(&forward, 7, |_| false), assign_ids(&backward, 7, |_| false));
    }
}
