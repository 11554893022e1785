use crate::schema::{TableSchema, CONSTELLATIONS, PLANETS, REGIONS, STARGATES, STATIONS, SYSTEMS};
use crate::transform::{Constellation, Planet, Region, Stargate, Station, System};

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null)?,
            SqlValue::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            SqlValue::Real(f) => stmt.raw_bind_parameter(idx, f)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<u32> for SqlValue {
    fn from(v: u32) -> Self {
        SqlValue::Integer(i64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Real(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// A transform row that maps onto one table.
///
/// `values` must line up with `schema().columns`.
pub trait TableRow {
    fn schema() -> &'static TableSchema;
    fn values(&self) -> Vec<SqlValue>;
}

impl TableRow for Region {
    fn schema() -> &'static TableSchema {
        &REGIONS
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![self.region_id.into(), self.region_name.as_str().into()]
    }
}

impl TableRow for Constellation {
    fn schema() -> &'static TableSchema {
        &CONSTELLATIONS
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.constellation_id.into(),
            self.constellation_name.as_str().into(),
            self.region_id.into(),
        ]
    }
}

impl TableRow for System {
    fn schema() -> &'static TableSchema {
        &SYSTEMS
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.system_id.into(),
            self.system_name.as_str().into(),
            self.security_status.into(),
            self.security_class.as_deref().into(),
            self.position.x.into(),
            self.position.y.into(),
            self.position.z.into(),
            self.constellation_id.into(),
            self.spectral_class.as_deref().into(),
        ]
    }
}

impl TableRow for Planet {
    fn schema() -> &'static TableSchema {
        &PLANETS
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.planet_id.into(),
            self.planet_name.as_str().into(),
            self.system_id.into(),
            self.planet_type.as_str().into(),
            self.moon_count.into(),
            self.asteroid_belt_count.into(),
        ]
    }
}

impl TableRow for Stargate {
    fn schema() -> &'static TableSchema {
        &STARGATES
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.stargate_id.into(),
            self.stargate_name.as_str().into(),
            self.system_id.into(),
            self.destination_stargate_id.into(),
            self.destination_system_id.into(),
        ]
    }
}

impl TableRow for Station {
    fn schema() -> &'static TableSchema {
        &STATIONS
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.station_id.into(),
            self.station_name.as_str().into(),
            self.system_id.into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Position;

    #[test]
    fn test_values_match_column_count() {
        let system = System {
            system_id: 30000142,
            system_name: "Jita".into(),
            security_status: 0.9459,
            security_class: None,
            position: Position::default(),
            constellation_id: 20000020,
            spectral_class: Some("K7 V".into()),
        };
        let values = system.values();
        assert_eq!(values.len(), System::schema().columns.len());
        assert_eq!(values[3], SqlValue::Null);
        assert_eq!(values[8], SqlValue::Text("K7 V".into()));

        let gate = Stargate {
            stargate_id: 1,
            stargate_name: "Stargate to 2".into(),
            system_id: 3,
            destination_stargate_id: 2,
            destination_system_id: Some(4),
        };
        assert_eq!(gate.values().len(), Stargate::schema().columns.len());
        assert_eq!(gate.values()[4], SqlValue::Integer(4));

        let planet = Planet {
            planet_id: 1,
            planet_name: "Planet 1".into(),
            system_id: 3,
            planet_type: "Unknown".into(),
            moon_count: 2,
            asteroid_belt_count: 0,
        };
        assert_eq!(planet.values().len(), Planet::schema().columns.len());
    }
}
