use serde::Deserialize;
use std::fmt;

/// Region and location names double as primary keys.
pub type Name = String;

/// Top-level input document describing the traversal graph.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawDocument {
    #[serde(default)]
    pub regions: Vec<RawRegion>,
}

/// Region entry as written in the input document.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRegion {
    pub name: Name,
    #[serde(default)]
    pub locations: Vec<RawLocation>,
    #[serde(default)]
    pub exits: Vec<RawExit>,
}

/// Location entry as written in the input document.
///
/// `group` stays a free string here; it is checked against the closed
/// [`Group`] set when the graph is built.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLocation {
    pub name: Name,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default, alias = "rules")]
    pub rule: Option<serde_json::Value>,
}

/// Exit entry; `name` is the target region.
#[derive(Debug, Clone, Deserialize)]
pub struct RawExit {
    pub name: Name,
    #[serde(default, alias = "rules")]
    pub rule: Option<serde_json::Value>,
}

/// Closed set of semantic location groups.
///
/// Declaration order is the emission order of group tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Group {
    Bosses,
    Lore,
    #[default]
    Item,
    Chest,
    MetalGate,
    Barrier,
    Teleport,
    Event,
}

impl Group {
    pub const ALL: [Group; 8] = [
        Group::Bosses,
        Group::Lore,
        Group::Item,
        Group::Chest,
        Group::MetalGate,
        Group::Barrier,
        Group::Teleport,
        Group::Event,
    ];

    /// Name as written in input documents and generated artifacts.
    pub fn as_str(self) -> &'static str {
        match self {
            Group::Bosses => "Bosses",
            Group::Lore => "Lore",
            Group::Item => "Item",
            Group::Chest => "Chest",
            Group::MetalGate => "Metal Gate",
            Group::Barrier => "Barrier",
            Group::Teleport => "Teleport",
            Group::Event => "Event",
        }
    }

    /// Look up a group by its document name (exact match).
    pub fn from_name(name: &str) -> Option<Group> {
        Group::ALL.into_iter().find(|g| g.as_str() == name)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated traversal graph. Regions keep their document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    pub regions: Vec<Region>,
}

impl Graph {
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Iterate every location together with the region that owns it.
    pub fn locations(&self) -> impl Iterator<Item = (&Region, &Location)> {
        self.regions
            .iter()
            .flat_map(|r| r.locations.iter().map(move |l| (r, l)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: Name,
    pub locations: Vec<Location>,
    pub exits: Vec<Exit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub name: Name,
    pub group: Group,
    /// Raw rule text; `None` means always accessible.
    pub rule: Option<String>,
}

/// Directed edge to `target`; no reverse edge is implied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    pub target: Name,
    /// Raw rule text; `None` means always traversable.
    pub rule: Option<String>,
}
