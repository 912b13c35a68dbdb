//! Rendering of the three host modules.
//!
//! Each module is self-contained: it carries its own imports and constants and
//! refers to other modules only through shared location and region names.

pub mod python;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::graph::entrance_name;
use crate::CompiledWorld;
use python::string_literal;

const EXIT_RULE_PREFIX: &str = "        lambda state: ";
const LOCATION_RULE_PREFIX: &str = "             lambda state: ";

/// Generated module sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub locations: String,
    pub regions: String,
    pub rules: String,
}

impl Artifacts {
    /// File name and contents of every module.
    pub fn files(&self) -> [(&'static str, &str); 3] {
        [
            ("locations.py", self.locations.as_str()),
            ("regions.py", self.regions.as_str()),
            ("rules.py", self.rules.as_str()),
        ]
    }

    /// Write every module into `dir` and return the written paths.
    ///
    /// All modules are staged as `<name>.tmp` first and renamed into place only
    /// once every one of them was written, so a failed write leaves no module
    /// behind.
    pub fn write_to(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut staged = Vec::new();
        for (name, text) in self.files() {
            let target = dir.join(name);
            let temp = dir.join(format!("{name}.tmp"));
            if let Err(e) = fs::write(&temp, text) {
                for (temp, _) in &staged {
                    let _ = fs::remove_file(temp);
                }
                return Err(e);
            }
            staged.push((temp, target));
        }
        let mut written = Vec::new();
        for (temp, target) in staged {
            fs::rename(&temp, &target)?;
            written.push(target);
        }
        Ok(written)
    }
}

/// Render `world` with the naming and `base_id` it was compiled with.
pub fn emit(world: &CompiledWorld) -> Artifacts {
    Artifacts {
        locations: emit_locations(world),
        regions: emit_regions(world),
        rules: emit_rules(world),
    }
}

fn emit_locations(world: &CompiledWorld) -> String {
    let config = &world.naming;
    let id_type = "Dict[str, Optional[int]]";
    let mut blocks = vec![
        "from typing import Dict, Optional, Set".to_string(),
        format!("base_id = {}", config.base_id),
    ];

    for table in &world.region_tables {
        let mut block = format!("{}: {id_type} = {{\n", table.identifier);
        for name in &table.locations {
            let value = match world.ids.get(name).copied().flatten() {
                Some(id) => format!("base_id + {}", id - config.base_id),
                None => "None".to_string(),
            };
            block.push_str(&format!("    {}: {value},\n", string_literal(name)));
        }
        block.push('}');
        blocks.push(block);
    }

    let mut merged = format!("{}_locations: {id_type} = {{\n", config.prefix);
    for table in &world.region_tables {
        merged.push_str(&format!("    **{},\n", table.identifier));
    }
    merged.push('}');
    blocks.push(merged);

    let mut groups = format!("{}_location_groups: Dict[str, Set[str]] = {{\n", config.prefix);
    for (group, names) in &world.classification.groups {
        groups.push_str(&format!("    {}: {{\n", string_literal(group.as_str())));
        for name in names {
            groups.push_str(&format!("        {},\n", string_literal(name)));
        }
        groups.push_str("    },\n");
    }
    groups.push('}');
    blocks.push(groups);

    blocks.join("\n\n") + "\n"
}

fn emit_regions(world: &CompiledWorld) -> String {
    let config = &world.naming;
    let mut out = String::new();
    out.push_str("from typing import Dict, Set\n\n");
    out.push_str("from BaseClasses import Region\n\n\n");
    out.push_str(&format!("class {}Region(Region):\n", config.class_prefix));
    out.push_str(&format!("    game: str = {}\n\n\n", string_literal(&config.game)));
    out.push_str(&format!("{}_regions: Dict[str, Set[str]] = {{\n", config.prefix));
    for (region, edges) in world.adjacency.iter() {
        let targets = if edges.is_empty() {
            "set()".to_string()
        } else {
            let names: Vec<String> = edges.iter().map(|e| string_literal(&e.target)).collect();
            format!("{{{}}}", names.join(", "))
        };
        out.push_str(&format!("    {}: {targets},\n", string_literal(region)));
    }
    out.push_str("}\n");
    out
}

fn emit_rules(world: &CompiledWorld) -> String {
    let config = &world.naming;
    let world_class = format!("{}World", config.class_prefix);
    let mut out = String::new();
    out.push_str("from typing import TYPE_CHECKING\n\n");
    out.push_str("from worlds.generic.Rules import set_rule\n\n");
    out.push_str("if TYPE_CHECKING:\n");
    out.push_str(&format!("    from . import {world_class}\n\n\n"));

    out.push_str(&function_header("set_region_rules", &world_class));
    for (region, edges) in world.adjacency.iter() {
        for edge in edges {
            let Some(expr) = edge.predicate.expr() else {
                continue;
            };
            out.push_str(&format!(
                "    multiworld.get_entrance({}, player).access_rule = \\\n",
                string_literal(&entrance_name(region, &edge.target))
            ));
            out.push_str(EXIT_RULE_PREFIX);
            out.push_str(&expr.render(EXIT_RULE_PREFIX.len()));
            out.push('\n');
        }
    }

    out.push_str("\n\n");
    out.push_str(&function_header("set_location_rules", &world_class));
    for (name, expr) in &world.location_rules {
        out.push_str(&format!(
            "    set_rule(multiworld.get_location({}, player),\n",
            string_literal(name)
        ));
        out.push_str(LOCATION_RULE_PREFIX);
        out.push_str(&expr.render(LOCATION_RULE_PREFIX.len()));
        out.push_str(")\n");
    }
    out
}

fn function_header(name: &str, world_class: &str) -> String {
    format!(
        "def {name}(world: \"{world_class}\") -> None:\n    multiworld = world.multiworld\n    player = world.player\n\n"
    )
}
