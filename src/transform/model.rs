//! Rows of the relational universe schema, as produced by the transform stage

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub region_id: i64,
    pub region_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constellation {
    pub constellation_id: i64,
    pub constellation_name: String,
    pub region_id: i64,
}

/// Galactic coordinates of a system's center
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct System {
    pub system_id: i64,
    pub system_name: String,
    pub security_status: f64,
    pub security_class: Option<String>,
    pub position: Position,
    pub constellation_id: i64,
    pub spectral_class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Planet {
    pub planet_id: i64,
    pub planet_name: String,
    pub system_id: i64,
    pub planet_type: String,
    pub moon_count: u32,
    pub asteroid_belt_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stargate {
    pub stargate_id: i64,
    pub stargate_name: String,
    pub system_id: i64,
    /// Raw id of the stargate at the other end of the link
    pub destination_stargate_id: i64,
    /// Filled in by [`crate::transform::resolve_stargates`]
    pub destination_system_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub station_id: i64,
    pub station_name: String,
    pub system_id: i64,
}
