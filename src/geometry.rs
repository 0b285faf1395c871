//! Ground-link geometry: great-circle and slant-range math over a static
//! fleet snapshot. Everything here is pure. An error means the inputs
//! describe an impossible geometry, never that internal state went bad.

use nalgebra::Vector3;

use crate::error::Error;
use crate::snapshot::SatelliteState;
use crate::EARTH_RADIUS_KM;

/// A point on the surface, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    pub longitude: f64,
    pub latitude: f64,
}

/// Ground-side elevation offset of the slant-range model, radians. Held at
/// zero; a future refinement may feed a true elevation angle through
/// [`ground_to_satellite_km`] instead.
pub const SIGMA_RAD: f64 = 0.0;

/// The haversine term: sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2).
fn haversine_term(p1: GeoPosition, p2: GeoPosition) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = p2.longitude.to_radians() - p1.longitude.to_radians();
    (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2)
}

/// Great-circle distance between two surface points, km, rounded to three
/// decimal places.
pub fn great_circle_km(radius_km: f64, p1: GeoPosition, p2: GeoPosition) -> f64 {
    let d = 2.0 * radius_km * haversine_term(p1, p2).sqrt().asin();
    (d * 1000.0).round() / 1000.0
}

/// Angle subtended at Earth's center between two surface points, radians.
/// For a satellite, pass its sub-point; altitude plays no part here.
pub fn central_angle(p1: GeoPosition, p2: GeoPosition) -> f64 {
    2.0 * haversine_term(p1, p2).sqrt().asin()
}

/// Third side of a triangle given two sides and the angle between them.
pub fn slant_range(side_a: f64, side_b: f64, theta: f64) -> f64 {
    (side_a.powi(2) + side_b.powi(2) - 2.0 * side_a * side_b * theta.cos()).sqrt()
}

/// Straight-line range, km, from a ground point to a satellite flying at
/// `altitude_km` above `sub_point`. `sigma_rad` is the ground-side
/// elevation offset; with it at zero the triangle sides reduce to
/// `R + altitude` and `R`.
pub fn ground_to_satellite_km(
    ground: GeoPosition,
    sub_point: GeoPosition,
    altitude_km: f64,
    radius_km: f64,
    sigma_rad: f64,
) -> Result<f64, Error> {
    let theta = central_angle(ground, sub_point);
    let f = ((altitude_km + radius_km) / radius_km).powi(2) - sigma_rad.cos().powi(2);
    if f < 0.0 {
        return Err(Error::SlantDomain(f));
    }
    let d = radius_km * (f.sqrt() - sigma_rad.sin());
    let h_gs = d * sigma_rad.sin();
    Ok(slant_range(radius_km + altitude_km, radius_km + h_gs, theta))
}

/// Index and range, km, of the fleet member closest to `ground`, scanning
/// in snapshot order with [`SIGMA_RAD`]. Ties keep the earliest row.
pub fn nearest_satellite(
    ground: GeoPosition,
    fleet: &[SatelliteState],
) -> Result<(usize, f64), Error> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, sat) in fleet.iter().enumerate() {
        let range = ground_to_satellite_km(
            ground,
            sat.sub_point(),
            sat.altitude_km,
            EARTH_RADIUS_KM,
            SIGMA_RAD,
        )?;
        match best {
            Some((_, min_km)) if range >= min_km => {}
            _ => best = Some((idx, range)),
        }
    }
    best.ok_or(Error::EmptyFleet)
}

/// Elevation angle at the ground station implied by a nearest-satellite
/// range, radians. The arcsine argument is checked, not clamped: leaving
/// [-1, 1] means the altitude and range cannot both be right.
pub fn elevation_angle(
    altitude_km: f64,
    radius_km: f64,
    min_distance_km: f64,
) -> Result<f64, Error> {
    let arg = (altitude_km * (altitude_km + 2.0 * radius_km) - min_distance_km.powi(2))
        / (2.0 * min_distance_km * radius_km);
    if !(-1.0..=1.0).contains(&arg) {
        return Err(Error::ElevationDomain(arg));
    }
    Ok(arg.asin())
}

/// Straight-line distance between two ECI positions, km.
pub fn eci_distance_km(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.metric_distance(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const CALGARY: GeoPosition = GeoPosition {
        longitude: -114.029,
        latitude: 50.826,
    };

    fn sat(id: u64, longitude: f64, latitude: f64, altitude_km: f64) -> SatelliteState {
        SatelliteState {
            entity_id: id,
            position: Vector3::zeros(),
            latitude,
            longitude,
            altitude_km,
        }
    }

    #[test]
    fn zero_distance_to_self() {
        assert_eq!(great_circle_km(EARTH_RADIUS_KM, CALGARY, CALGARY), 0.0);
        assert_eq!(central_angle(CALGARY, CALGARY), 0.0);
    }

    #[test]
    fn haversine_is_symmetric() {
        let toronto = GeoPosition {
            longitude: -79.25,
            latitude: 43.40,
        };
        assert_eq!(
            great_circle_km(EARTH_RADIUS_KM, CALGARY, toronto),
            great_circle_km(EARTH_RADIUS_KM, toronto, CALGARY)
        );
    }

    #[test]
    fn quarter_circumference_on_the_equator() {
        let p1 = GeoPosition {
            longitude: 0.0,
            latitude: 0.0,
        };
        let p2 = GeoPosition {
            longitude: 90.0,
            latitude: 0.0,
        };
        let expected = (FRAC_PI_2 * EARTH_RADIUS_KM * 1000.0).round() / 1000.0;
        assert_eq!(great_circle_km(EARTH_RADIUS_KM, p1, p2), expected);
    }

    #[test]
    fn slant_range_right_angle() {
        let c = slant_range(3.0, 4.0, FRAC_PI_2);
        assert!((c - 5.0).abs() < 1e-12);
    }

    #[test]
    fn overhead_range_is_the_altitude() {
        let d = ground_to_satellite_km(CALGARY, CALGARY, 550.0, EARTH_RADIUS_KM, SIGMA_RAD)
            .unwrap();
        assert!((d - 550.0).abs() < 1e-9);
    }

    #[test]
    fn sigma_zero_reduces_to_simplified_sides() {
        let sub = GeoPosition {
            longitude: -100.0,
            latitude: 45.0,
        };
        let theta = central_angle(CALGARY, sub);
        let expected = slant_range(EARTH_RADIUS_KM + 550.0, EARTH_RADIUS_KM, theta);
        let got =
            ground_to_satellite_km(CALGARY, sub, 550.0, EARTH_RADIUS_KM, SIGMA_RAD).unwrap();
        assert_eq!(got, expected);
    }

    #[test]
    fn nearest_matches_recomputed_minimum() {
        let fleet = vec![
            sat(10, -100.0, 45.0, 550.0),
            sat(11, CALGARY.longitude, CALGARY.latitude, 550.0),
            sat(12, -50.0, 10.0, 550.0),
        ];
        let (idx, min_km) = nearest_satellite(CALGARY, &fleet).unwrap();
        assert_eq!(idx, 1);
        let again = ground_to_satellite_km(
            CALGARY,
            fleet[idx].sub_point(),
            fleet[idx].altitude_km,
            EARTH_RADIUS_KM,
            SIGMA_RAD,
        )
        .unwrap();
        assert_eq!(min_km, again);
    }

    #[test]
    fn nearest_single_tied_and_empty_fleets() {
        let lone = vec![sat(1, 0.0, 0.0, 550.0)];
        assert_eq!(nearest_satellite(CALGARY, &lone).unwrap().0, 0);

        let tied = vec![sat(1, 0.0, 0.0, 550.0), sat(2, 0.0, 0.0, 550.0)];
        assert_eq!(nearest_satellite(CALGARY, &tied).unwrap().0, 0);

        assert!(matches!(
            nearest_satellite(CALGARY, &[]),
            Err(Error::EmptyFleet)
        ));
    }

    #[test]
    fn elevation_overhead_is_a_quarter_turn() {
        // d == altitude makes the arcsine argument exactly 1.
        let e = elevation_angle(550.0, EARTH_RADIUS_KM, 550.0).unwrap();
        assert_eq!(e, FRAC_PI_2);
    }

    #[test]
    fn elevation_rejects_impossible_range() {
        // A 1 km range to a 550 km altitude satellite cannot happen.
        let err = elevation_angle(550.0, EARTH_RADIUS_KM, 1.0).unwrap_err();
        assert!(matches!(err, Error::ElevationDomain(arg) if arg > 1.0));
    }

    #[test]
    fn eci_distance_straight_line() {
        let a = Vector3::new(0.0, 0.0, 7000.0);
        let b = Vector3::new(0.0, 0.0, -7000.0);
        assert_eq!(eci_distance_km(&a, &b), 14000.0);
    }
}
