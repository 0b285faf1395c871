//! One-shot geometry report from a fleet snapshot: the nearest satellite
//! to each ground station, the three-hop relay path they form, and the
//! straight-line light time of that path.

use clap::Parser;
use std::path::PathBuf;

use hoptrace::args::convert_filter;
use hoptrace::geometry::{self, GeoPosition};
use hoptrace::snapshot::{self, SatelliteState};
use hoptrace::{Error, EARTH_RADIUS_KM, END_STATION, HOP_LABELS, LIGHT_SPEED_KM_S, START_STATION};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Fleet snapshot CSV, one row per satellite
    snapshot: PathBuf,
    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(convert_filter(args.verbose.log_level_filter()))
        .init();

    let fleet = snapshot::load_fleet(&args.snapshot)?;
    println!("fleet snapshot: {} satellite(s)", fleet.len());

    let (start_idx, start_km) = report_station("start", START_STATION, &fleet)?;
    let (end_idx, end_km) = report_station("end", END_STATION, &fleet)?;

    let relay_km =
        geometry::eci_distance_km(&fleet[start_idx].position, &fleet[end_idx].position);
    let total_km = start_km + relay_km + end_km;

    println!("inter-satellite leg: {:.3} km", relay_km);
    println!(
        "path {} + {} + {}: {:.3} km, light time {:.3} ms",
        HOP_LABELS[0],
        HOP_LABELS[1],
        HOP_LABELS[2],
        total_km,
        total_km / LIGHT_SPEED_KM_S * 1e3
    );
    Ok(())
}

fn report_station(
    name: &str,
    station: GeoPosition,
    fleet: &[SatelliteState],
) -> Result<(usize, f64), Error> {
    let (idx, range_km) = geometry::nearest_satellite(station, fleet)?;
    let sat = &fleet[idx];
    let elevation = geometry::elevation_angle(sat.altitude_km, EARTH_RADIUS_KM, range_km)?;
    println!(
        "{} station (lon {:.3}, lat {:.3}): entity {} at row {}, slant {:.3} km, elevation {:.2} deg",
        name,
        station.longitude,
        station.latitude,
        sat.entity_id,
        idx,
        range_km,
        elevation.to_degrees()
    );
    Ok((idx, range_km))
}
