//! Table schema definitions for the universe tables

use super::types::*;

pub static REGIONS: TableSchema = TableSchema {
    name: "regions",
    columns: &[
        Column::required("region_id", ColumnType::Integer),
        Column::required("region_name", ColumnType::Text),
    ],
    primary_key: "region_id",
    foreign_keys: &[],
    on_conflict: ConflictPolicy::Ignore,
};

pub static CONSTELLATIONS: TableSchema = TableSchema {
    name: "constellations",
    columns: &[
        Column::required("constellation_id", ColumnType::Integer),
        Column::required("constellation_name", ColumnType::Text),
        Column::required("region_id", ColumnType::Integer),
    ],
    primary_key: "constellation_id",
    foreign_keys: &[ForeignKey::new("region_id", "regions", "region_id")],
    on_conflict: ConflictPolicy::Ignore,
};

// System attributes can change between export versions, so systems are the
// one table that overwrites on conflict.
pub static SYSTEMS: TableSchema = TableSchema {
    name: "systems",
    columns: &[
        Column::required("system_id", ColumnType::Integer),
        Column::required("system_name", ColumnType::Text),
        Column::required("security_status", ColumnType::Real),
        Column::new("security_class", ColumnType::Text),
        Column::required("x_pos", ColumnType::Real),
        Column::required("y_pos", ColumnType::Real),
        Column::required("z_pos", ColumnType::Real),
        Column::required("constellation_id", ColumnType::Integer),
        Column::new("spectral_class", ColumnType::Text),
    ],
    primary_key: "system_id",
    foreign_keys: &[ForeignKey::new(
        "constellation_id",
        "constellations",
        "constellation_id",
    )],
    on_conflict: ConflictPolicy::UpdateAll,
};

pub static PLANETS: TableSchema = TableSchema {
    name: "planets",
    columns: &[
        Column::required("planet_id", ColumnType::Integer),
        Column::required("planet_name", ColumnType::Text),
        Column::required("system_id", ColumnType::Integer),
        Column::required("planet_type", ColumnType::Text),
        Column::required("moon_count", ColumnType::Integer),
        Column::required("asteroid_belt_count", ColumnType::Integer),
    ],
    primary_key: "planet_id",
    foreign_keys: &[ForeignKey::new("system_id", "systems", "system_id")],
    on_conflict: ConflictPolicy::Ignore,
};

pub static STARGATES: TableSchema = TableSchema {
    name: "stargates",
    columns: &[
        Column::required("stargate_id", ColumnType::Integer),
        Column::required("stargate_name", ColumnType::Text),
        Column::required("system_id", ColumnType::Integer),
        Column::required("destination_stargate_id", ColumnType::Integer),
        Column::required("destination_system_id", ColumnType::Integer),
    ],
    primary_key: "stargate_id",
    foreign_keys: &[
        ForeignKey::new("system_id", "systems", "system_id"),
        ForeignKey::new("destination_system_id", "systems", "system_id"),
    ],
    on_conflict: ConflictPolicy::Ignore,
};

pub static STATIONS: TableSchema = TableSchema {
    name: "stations",
    columns: &[
        Column::required("station_id", ColumnType::Integer),
        Column::required("station_name", ColumnType::Text),
        Column::required("system_id", ColumnType::Integer),
    ],
    primary_key: "station_id",
    foreign_keys: &[ForeignKey::new("system_id", "systems", "system_id")],
    on_conflict: ConflictPolicy::Ignore,
};

/// All tables, parents before children
pub static ALL_TABLES: &[&TableSchema] = &[
    &REGIONS,
    &CONSTELLATIONS,
    &SYSTEMS,
    &PLANETS,
    &STARGATES,
    &STATIONS,
];

pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}
