use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;

use super::model::Station;
use crate::parser::{get_id, get_text, read_table};
use crate::ui::Ui;

/// Load `staStations.yaml`. Records missing `stationID`, `stationName` or
/// `solarSystemID` are skipped; names are taken as-is.
pub fn load_stations(path: &Path) -> Result<Vec<Station>> {
    let records = read_table(path)?;

    Ok(records
        .iter()
        .filter_map(|record| {
            Some(Station {
                station_id: get_id(record, "stationID")?,
                station_name: get_text(record, "stationName")?,
                system_id: get_id(record, "solarSystemID")?,
            })
        })
        .collect())
}

/// Load stations, degrading to none if the table is unusable
pub fn load_stations_or_empty(path: &Path, ui: &mut impl Ui) -> Vec<Station> {
    match load_stations(path) {
        Ok(stations) => {
            ui.log(format!("Loaded {} stations", stations.len()));
            stations
        }
        Err(e) => {
            ui.log(format!("Station table unavailable, no stations will be loaded: {:#}", e));
            Vec::new()
        }
    }
}

/// Keep only stations whose system was produced by this run
pub fn link_stations(raw: Vec<Station>, valid_system_ids: &HashSet<i64>) -> Vec<Station> {
    raw.into_iter()
        .filter(|station| valid_system_ids.contains(&station.system_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::SilentUi;
    use std::fs;
    use tempfile::TempDir;

    fn station(station_id: i64, system_id: i64) -> Station {
        Station {
            station_id,
            station_name: format!("Station {}", station_id),
            system_id,
        }
    }

    #[test]
    fn test_link_drops_orphans() {
        let raw = vec![station(1, 30000142), station(2, 30000999), station(3, 30000142)];
        let valid: HashSet<i64> = [30000142].into_iter().collect();

        let linked = link_stations(raw, &valid);
        let ids: Vec<_> = linked.iter().map(|s| s.station_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_link_with_no_systems() {
        let linked = link_stations(vec![station(1, 30000142)], &HashSet::new());
        assert!(linked.is_empty());
    }

    #[test]
    fn test_load_stations() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("staStations.yaml");
        fs::write(
            &path,
            "- stationID: 60003760\n  stationName: Jita IV - Moon 4 - Caldari Navy Assembly Plant\n  solarSystemID: 30000142\n  security: 0.9459\n\
             - stationID: 60000001\n  solarSystemID: 30000142\n",
        )
        .unwrap();

        let stations = load_stations(&path).unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].station_id, 60003760);
        assert_eq!(stations[0].system_id, 30000142);
        assert_eq!(
            stations[0].station_name,
            "Jita IV - Moon 4 - Caldari Navy Assembly Plant"
        );
    }

    #[test]
    fn test_missing_table_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let mut ui = SilentUi::new();
        let stations = load_stations_or_empty(&dir.path().join("staStations.yaml"), &mut ui);
        assert!(stations.is_empty());
    }
}
