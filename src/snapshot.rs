//! Fleet snapshot input: one tabular row per satellite per snapshot
//! instant, as exported by the tracker.

use std::path::Path;

use nalgebra::Vector3;
use serde::Deserialize;

use crate::error::Error;
use crate::geometry::GeoPosition;

/// One fleet member at the snapshot instant. The loader keeps file order;
/// nothing downstream may assume any sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteState {
    pub entity_id: u64,
    /// Earth-centered inertial position, km.
    pub position: Vector3<f64>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_km: f64,
}

impl SatelliteState {
    /// Surface point directly below the satellite.
    pub fn sub_point(&self) -> GeoPosition {
        GeoPosition {
            longitude: self.longitude,
            latitude: self.latitude,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SnapshotRow {
    #[serde(rename = "EntityID")]
    entity_id: u64,
    #[serde(rename = "TemeCoord1")]
    x: f64,
    #[serde(rename = "TemeCoord2")]
    y: f64,
    #[serde(rename = "TemeCoord3")]
    z: f64,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    #[serde(rename = "Altitude")]
    altitude_km: f64,
}

impl From<SnapshotRow> for SatelliteState {
    fn from(row: SnapshotRow) -> Self {
        Self {
            entity_id: row.entity_id,
            position: Vector3::new(row.x, row.y, row.z),
            latitude: row.latitude,
            longitude: row.longitude,
            altitude_km: row.altitude_km,
        }
    }
}

/// Load a fleet snapshot from CSV.
pub fn load_fleet(path: &Path) -> Result<Vec<SatelliteState>, Error> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut fleet = Vec::new();
    for row in rdr.deserialize::<SnapshotRow>() {
        fleet.push(row?.into());
    }
    Ok(fleet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_rows_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            "EntityID,TemeCoord1,TemeCoord2,TemeCoord3,Latitude,Longitude,Altitude"
        )
        .unwrap();
        writeln!(f, "44713,1234.5,-2345.6,6000.0,50.1,-110.3,550.2").unwrap();
        writeln!(f, "44714,-100.0,200.0,6900.0,43.0,-79.9,560.0").unwrap();
        drop(f);

        let fleet = load_fleet(&path).unwrap();
        assert_eq!(fleet.len(), 2);
        assert_eq!(fleet[0].entity_id, 44713);
        assert_eq!(fleet[0].position, Vector3::new(1234.5, -2345.6, 6000.0));
        assert_eq!(fleet[1].sub_point().longitude, -79.9);
        assert_eq!(fleet[1].altitude_km, 560.0);
    }

    #[test]
    fn rejects_a_malformed_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            "EntityID,TemeCoord1,TemeCoord2,TemeCoord3,Latitude,Longitude,Altitude"
        )
        .unwrap();
        writeln!(f, "not-an-id,0,0,0,0,0,0").unwrap();
        drop(f);

        assert!(matches!(load_fleet(&path), Err(Error::Csv(_))));
    }
}
