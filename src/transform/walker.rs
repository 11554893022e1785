//! Depth-first traversal of the `universe/` export tree

use anyhow::{bail, Context, Result};
use serde_yaml::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::model::{Constellation, Planet, Position, Region, Stargate, System};
use super::names::NameTable;
use super::region_name::format_region_name;
use crate::parser::{
    as_id, collection_len, get_id, get_text, read_document, Document, NodeError,
};
use crate::ui::{SilentUi, Ui};

pub const UNIVERSE_DIR: &str = "universe";
pub const REGION_MARKER: &str = "region.yaml";
pub const CONSTELLATION_MARKER: &str = "constellation.yaml";
pub const SYSTEM_MARKER: &str = "solarsystem.yaml";

const UNKNOWN_PLANET_TYPE: &str = "Unknown";

/// Raw rows collected from one traversal, in discovery order
#[derive(Debug, Default)]
pub struct WalkOutput {
    pub regions: Vec<Region>,
    pub constellations: Vec<Constellation>,
    pub systems: Vec<System>,
    pub planets: Vec<Planet>,
    /// Destinations are still raw stargate ids here
    pub stargates: Vec<Stargate>,
    /// Nodes dropped because of a data fault
    pub rejected: Vec<NodeError>,
}

impl WalkOutput {
    pub fn system_ids(&self) -> HashSet<i64> {
        self.systems.iter().map(|s| s.system_id).collect()
    }
}

/// Walks `<root>/universe/<category>/<region>/<constellation>/<system>`.
///
/// A directory is an entity node only if it holds its marker document; other
/// directories are ignored. Parents are always pushed before their children,
/// so every emitted row's parent id is present in the output.
pub struct HierarchyWalker<'a> {
    names: &'a NameTable,
}

impl<'a> HierarchyWalker<'a> {
    pub fn new(names: &'a NameTable) -> Self {
        Self { names }
    }

    pub fn walk(&self, root: &Path) -> Result<WalkOutput> {
        self.walk_with_progress(root, &mut SilentUi::new())
    }

    /// Same as [`walk`](Self::walk), reporting one progress step per region
    pub fn walk_with_progress(&self, root: &Path, ui: &mut impl Ui) -> Result<WalkOutput> {
        let universe = root.join(UNIVERSE_DIR);
        if !universe.is_dir() {
            bail!("No universe directory found at {:?}", universe);
        }

        let mut region_dirs = Vec::new();
        for (category_path, category) in sorted_subdirs(&universe)? {
            if category.starts_with('.') {
                continue;
            }
            region_dirs.extend(sorted_subdirs(&category_path)?);
        }

        let mut out = WalkOutput::default();
        let total = region_dirs.len() as u64;

        for (i, (region_path, folder)) in region_dirs.iter().enumerate() {
            ui.set_progress(i as u64, total, format!("Region {}", folder));
            self.walk_region(region_path, folder, &mut out)?;
        }
        ui.set_progress(total, total, "Regions");

        Ok(out)
    }

    fn walk_region(&self, path: &Path, folder: &str, out: &mut WalkOutput) -> Result<()> {
        let Some(region_id) = marker(&path.join(REGION_MARKER), "regionID", out) else {
            return Ok(());
        };

        out.regions.push(Region {
            region_id,
            region_name: format_region_name(folder),
        });

        for (constellation_path, name) in sorted_subdirs(path)? {
            self.walk_constellation(&constellation_path, &name, region_id, out)?;
        }

        Ok(())
    }

    fn walk_constellation(
        &self,
        path: &Path,
        folder: &str,
        region_id: i64,
        out: &mut WalkOutput,
    ) -> Result<()> {
        let marker_path = path.join(CONSTELLATION_MARKER);
        let Some(constellation_id) = marker(&marker_path, "constellationID", out) else {
            return Ok(());
        };

        out.constellations.push(Constellation {
            constellation_id,
            constellation_name: self.names.display_name(constellation_id, Some(folder), || {
                format!("Constellation {}", constellation_id)
            }),
            region_id,
        });

        for (system_path, name) in sorted_subdirs(path)? {
            self.walk_system(&system_path, &name, constellation_id, out);
        }

        Ok(())
    }

    fn walk_system(&self, path: &Path, folder: &str, constellation_id: i64, out: &mut WalkOutput) {
        let marker_path = path.join(SYSTEM_MARKER);
        let doc = match read_document(&marker_path) {
            Ok(Document::Parsed(doc)) => doc,
            Ok(Document::Missing | Document::Empty) => return,
            Err(e) => {
                out.rejected.push(e);
                return;
            }
        };

        match self.parse_system(&doc, &marker_path, folder, constellation_id) {
            Ok(parsed) => {
                out.systems.push(parsed.system);
                out.planets.extend(parsed.planets);
                out.stargates.extend(parsed.stargates);
                out.rejected.extend(parsed.rejected);
            }
            Err(e) => out.rejected.push(e),
        }
    }

    /// Build a system row and its children from a `solarsystem.yaml` document.
    /// Faulty child records are returned in `rejected` without failing the
    /// system; a missing id or security status fails the whole system.
    pub fn parse_system(
        &self,
        doc: &Value,
        path: &Path,
        folder: &str,
        constellation_id: i64,
    ) -> Result<ParsedSystem, NodeError> {
        let system_id = get_id(doc, "solarSystemID").ok_or_else(|| NodeError::MissingField {
            path: path.to_path_buf(),
            field: "solarSystemID",
        })?;

        let security_status = match doc.get("security") {
            None | Some(Value::Null) => {
                return Err(NodeError::MissingField {
                    path: path.to_path_buf(),
                    field: "security",
                })
            }
            Some(v) => match v.as_f64() {
                Some(security) if security.is_finite() => security,
                Some(_) => {
                    return Err(NodeError::InvalidField {
                        path: path.to_path_buf(),
                        field: "security".to_string(),
                        detail: "not a finite number".to_string(),
                    })
                }
                None => {
                    return Err(NodeError::InvalidField {
                        path: path.to_path_buf(),
                        field: "security".to_string(),
                        detail: "not a number".to_string(),
                    })
                }
            },
        };

        let spectral_class = doc
            .get("star")
            .and_then(|star| star.get("statistics"))
            .and_then(|stats| get_text(stats, "spectralClass"));

        let system = System {
            system_id,
            system_name: self
                .names
                .display_name(system_id, Some(folder), || format!("System {}", system_id)),
            security_status,
            security_class: get_text(doc, "securityClass"),
            position: parse_position(doc.get("center")),
            constellation_id,
            spectral_class,
        };

        let mut rejected = Vec::new();
        let planets = self.parse_planets(doc, path, system_id, &mut rejected);
        let stargates = self.parse_stargates(doc, path, system_id, &mut rejected);

        Ok(ParsedSystem {
            system,
            planets,
            stargates,
            rejected,
        })
    }

    fn parse_planets(
        &self,
        doc: &Value,
        path: &Path,
        system_id: i64,
        rejected: &mut Vec<NodeError>,
    ) -> Vec<Planet> {
        child_records(doc, "planets", path, rejected)
            .into_iter()
            .map(|(planet_id, record)| {
                let planet_type = get_id(record, "typeID")
                    .and_then(|type_id| self.names.get(type_id))
                    .unwrap_or(UNKNOWN_PLANET_TYPE)
                    .to_string();

                Planet {
                    planet_id,
                    planet_name: self
                        .names
                        .display_name(planet_id, None, || format!("Planet {}", planet_id)),
                    system_id,
                    planet_type,
                    moon_count: count(collection_len(record, "moons")),
                    asteroid_belt_count: count(collection_len(record, "asteroidBelts")),
                }
            })
            .collect()
    }

    fn parse_stargates(
        &self,
        doc: &Value,
        path: &Path,
        system_id: i64,
        rejected: &mut Vec<NodeError>,
    ) -> Vec<Stargate> {
        let mut stargates = Vec::new();

        for (stargate_id, record) in child_records(doc, "stargates", path, rejected) {
            let Some(destination) = get_id(record, "destination") else {
                rejected.push(NodeError::InvalidField {
                    path: path.to_path_buf(),
                    field: format!("stargates.{}.destination", stargate_id),
                    detail: "missing or not an id".to_string(),
                });
                continue;
            };

            stargates.push(Stargate {
                stargate_id,
                stargate_name: self
                    .names
                    .resolve(stargate_id, &format!("Stargate to {}", destination)),
                system_id,
                destination_stargate_id: destination,
                destination_system_id: None,
            });
        }

        stargates
    }
}

/// A system row with the planets and stargates found in its document
#[derive(Debug)]
pub struct ParsedSystem {
    pub system: System,
    pub planets: Vec<Planet>,
    pub stargates: Vec<Stargate>,
    pub rejected: Vec<NodeError>,
}

/// Read the id from a marker document. `None` means the node is skipped;
/// faults are recorded in `out.rejected`.
fn marker(path: &Path, id_field: &'static str, out: &mut WalkOutput) -> Option<i64> {
    let doc = match read_document(path) {
        Ok(Document::Missing) => return None,
        Ok(Document::Empty) => Value::Null,
        Ok(Document::Parsed(doc)) => doc,
        Err(e) => {
            out.rejected.push(e);
            return None;
        }
    };

    match get_id(&doc, id_field) {
        Some(id) => Some(id),
        None => {
            out.rejected.push(NodeError::MissingField {
                path: path.to_path_buf(),
                field: id_field,
            });
            None
        }
    }
}

/// Entries of an id-keyed child collection, in document order
fn child_records<'v>(
    doc: &'v Value,
    key: &str,
    path: &Path,
    rejected: &mut Vec<NodeError>,
) -> Vec<(i64, &'v Value)> {
    let mapping = match doc.get(key) {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Mapping(m)) => m,
        Some(_) => {
            rejected.push(NodeError::InvalidField {
                path: path.to_path_buf(),
                field: key.to_string(),
                detail: "expected a mapping keyed by id".to_string(),
            });
            return Vec::new();
        }
    };

    let mut records = Vec::with_capacity(mapping.len());
    for (k, v) in mapping {
        match as_id(k) {
            Some(id) => records.push((id, v)),
            None => rejected.push(NodeError::InvalidField {
                path: path.to_path_buf(),
                field: key.to_string(),
                detail: format!("non-numeric key {:?}", k),
            }),
        }
    }
    records
}

fn parse_position(center: Option<&Value>) -> Position {
    let coords: Option<Vec<f64>> = center
        .and_then(Value::as_sequence)
        .and_then(|seq| seq.iter().map(Value::as_f64).collect());

    match coords.as_deref() {
        Some([x, y, z]) => Position {
            x: *x,
            y: *y,
            z: *z,
        },
        _ => Position::default(),
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Subdirectories of `path` with their names, sorted by name
fn sorted_subdirs(path: &Path) -> Result<Vec<(PathBuf, String)>> {
    let mut dirs = Vec::new();

    for entry in fs::read_dir(path).with_context(|| format!("Failed to list {:?}", path))? {
        let entry = entry.with_context(|| format!("Failed to list {:?}", path))?;
        let entry_path = entry.path();
        if !entry_path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        dirs.push((entry_path, name));
    }

    dirs.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(dirs)
}
