//! Offline analysis of captured sessions: per-topic time series in the
//! units reporting wants, re-based so each series starts at zero.

use crate::session::{HopRecord, Session};
use crate::HOPS;

/// Wire distances arrive in metres; analysis works in kilometres.
pub const M_TO_KM: f64 = 1e-3;

/// One analyzed instant on a path: seconds since the series start, per-hop
/// figures, and the sums across the three hops.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSample {
    pub t: f64,
    pub distance_km: [f64; HOPS],
    pub latency_s: [f64; HOPS],
    pub total_distance_km: f64,
    pub total_latency_s: f64,
}

/// All samples for one topic, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicSeries {
    pub topic: String,
    pub samples: Vec<PathSample>,
}

/// Turn a session into one series per topic, sorted by topic name. Each
/// series is re-based to its own first sample, so topics that joined the
/// capture late still start at t = 0.
pub fn series(session: &Session) -> Vec<TopicSeries> {
    let mut out: Vec<TopicSeries> = session
        .topics()
        .iter()
        .map(|(topic, records)| TopicSeries {
            topic: topic.clone(),
            samples: samples(records),
        })
        .collect();
    out.sort_by(|a, b| a.topic.cmp(&b.topic));
    out
}

fn samples(records: &[HopRecord]) -> Vec<PathSample> {
    let origin = records.first().map_or(0.0, |r| r.ts);
    records
        .iter()
        .map(|r| {
            let distance_km = r.distance.map(|m| f64::from(m) * M_TO_KM);
            let latency_s = r.latencies.map(f64::from);
            PathSample {
                t: r.ts - origin,
                total_distance_km: distance_km.iter().sum(),
                total_latency_s: latency_s.iter().sum(),
                distance_km,
                latency_s,
            }
        })
        .collect()
}
