pub mod analysis;
pub mod args;
pub mod error;
pub mod geometry;
pub mod session;
pub mod snapshot;
pub mod subscribe;

pub use error::Error;

use geometry::GeoPosition;

/// Mean Earth radius, km.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Width of one capture session in telemetry time, seconds. The window is
/// anchored at the first record ever received and does not slide.
pub const WINDOW_SECONDS: f64 = 300.0;

/// Upper bound on how long a single receive waits before the loop rechecks
/// for an operator interrupt.
pub const POLL_INTERVAL_MS: i64 = 100;

/// Fixed local endpoint. The subscriber binds here; the publisher connects.
pub const ENDPOINT: &str = "tcp://127.0.0.1:5551";

/// Legs of the measured path, in wire order.
pub const HOPS: usize = 3;
pub const HOP_LABELS: [&str; HOPS] = ["G1-S1", "S1-S2", "S2-G2"];

/// Near-side ground station (Calgary).
pub const START_STATION: GeoPosition = GeoPosition {
    longitude: -114.029,
    latitude: 50.826,
};

/// Far-side ground station (Toronto).
pub const END_STATION: GeoPosition = GeoPosition {
    longitude: -79.25,
    latitude: 43.40,
};

/// Speed of light, km/s.
pub const LIGHT_SPEED_KM_S: f64 = 299_792.458;
