//! The transform stage: export tree in, referentially valid row batches out

pub mod model;
pub mod names;
pub mod region_name;
pub mod stargates;
pub mod stations;
pub mod walker;

pub use model::*;
pub use names::*;
pub use region_name::*;
pub use stargates::*;
pub use stations::*;
pub use walker::*;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::parser::NodeError;
use crate::ui::{Phase, Ui};

const BSD_DIR: &str = "bsd";
const NAMES_FILE: &str = "invNames.yaml";
const STATIONS_FILE: &str = "staStations.yaml";

/// Fixed file layout of an extracted YAML export
#[derive(Debug, Clone)]
pub struct SdeLayout {
    root: PathBuf,
}

impl SdeLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn universe_dir(&self) -> PathBuf {
        self.root.join(UNIVERSE_DIR)
    }

    pub fn names_file(&self) -> PathBuf {
        self.root.join(BSD_DIR).join(NAMES_FILE)
    }

    pub fn stations_file(&self) -> PathBuf {
        self.root.join(BSD_DIR).join(STATIONS_FILE)
    }
}

/// Everything one run hands to the load stage
#[derive(Debug, Default)]
pub struct UniverseBatch {
    pub regions: Vec<Region>,
    pub constellations: Vec<Constellation>,
    pub systems: Vec<System>,
    pub planets: Vec<Planet>,
    /// Only stargates with a resolved destination system
    pub stargates: Vec<Stargate>,
    /// Only stations in a system of this batch
    pub stations: Vec<Station>,
    pub rejected: Vec<NodeError>,
    pub unresolved_stargates: usize,
    pub orphan_stations: usize,
}

impl UniverseBatch {
    pub fn row_count(&self) -> usize {
        self.regions.len()
            + self.constellations.len()
            + self.systems.len()
            + self.planets.len()
            + self.stargates.len()
            + self.stations.len()
    }
}

/// Run the whole transform stage against an extracted export
pub fn build_universe(layout: &SdeLayout, ui: &mut impl Ui) -> Result<UniverseBatch> {
    ui.set_phase(Phase::LoadingNames);
    let names = NameTable::load_or_empty(&layout.names_file(), ui);

    ui.set_phase(Phase::Walking);
    let walked = HierarchyWalker::new(&names).walk_with_progress(layout.root(), ui)?;
    ui.clear_progress();
    ui.log(format!(
        "Walked {} regions, {} constellations, {} systems",
        walked.regions.len(),
        walked.constellations.len(),
        walked.systems.len()
    ));
    for fault in &walked.rejected {
        ui.log(format!("Rejected: {}", fault));
    }

    ui.set_phase(Phase::Resolving);
    let stargates = resolve_stargates(&walked.stargates);
    let unresolved_stargates = walked.stargates.len() - stargates.len();
    if unresolved_stargates > 0 {
        ui.log(format!(
            "{} stargates lead outside this export and were dropped",
            unresolved_stargates
        ));
    }

    let raw_stations = load_stations_or_empty(&layout.stations_file(), ui);
    let raw_station_count = raw_stations.len();
    let stations = link_stations(raw_stations, &walked.system_ids());
    let orphan_stations = raw_station_count - stations.len();
    if orphan_stations > 0 {
        ui.log(format!(
            "{} stations reference systems outside this export and were dropped",
            orphan_stations
        ));
    }

    Ok(UniverseBatch {
        regions: walked.regions,
        constellations: walked.constellations,
        systems: walked.systems,
        planets: walked.planets,
        stargates,
        stations,
        rejected: walked.rejected,
        unresolved_stargates,
        orphan_stations,
    })
}
