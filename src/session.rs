//! Session storage: the in-memory capture buffer and its sealed on-disk
//! form. A session grows only through [`Session::append`] and leaves the
//! process as exactly one artifact, written by [`Session::seal`].

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Error;
use crate::HOPS;

/// One telemetry sample for the full path: per-hop one-way latency in
/// seconds and per-hop distance in metres, stamped with the publisher's
/// unix time. Decoded once off the wire and never mutated after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HopRecord {
    pub latencies: [f32; HOPS],
    pub distance: [f32; HOPS],
    pub ts: f64,
}

/// One bounded capture, keyed by topic, records in arrival order.
#[derive(Debug, Default)]
pub struct Session {
    topics: HashMap<String, Vec<HopRecord>>,
    first_ts: Option<f64>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to its topic. This is the only mutator: nothing is
    /// overwritten or reordered, and the first append fixes the session's
    /// time origin across all topics.
    pub fn append(&mut self, topic: String, record: HopRecord) {
        if self.first_ts.is_none() {
            self.first_ts = Some(record.ts);
        }
        self.topics.entry(topic).or_default().push(record);
    }

    /// Timestamp of the first record ever appended, if any.
    pub fn first_ts(&self) -> Option<f64> {
        self.first_ts
    }

    pub fn topics(&self) -> &HashMap<String, Vec<HopRecord>> {
        &self.topics
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// Total records across all topics.
    pub fn record_count(&self) -> usize {
        self.topics.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Serialize, compress and write the session to `path`, consuming it.
    ///
    /// The artifact is a zlib stream over a self-describing msgpack map
    /// `{topic: [{latencies, distance, ts}, ..]}`. Bytes land in a `.tmp`
    /// sibling first and are renamed over `path`, so a crash leaves either
    /// the previous artifact or the complete new one, never a torn write.
    pub fn seal(self, path: &Path) -> Result<(), Error> {
        let records = self.record_count();
        let topics = self.topic_count();
        let packed = rmp_serde::to_vec_named(&self.topics)?;

        let tmp = path.with_extension("tmp");
        let mut encoder = ZlibEncoder::new(File::create(&tmp)?, Compression::default());
        encoder.write_all(&packed)?;
        encoder.finish()?;
        fs::rename(&tmp, path)?;

        info!(
            "sealed {} record(s) on {} topic(s) to {} ({} bytes before compression)",
            records,
            topics,
            path.display(),
            packed.len()
        );
        Ok(())
    }

    /// Read a sealed artifact back. Inverse of [`Session::seal`].
    pub fn load(path: &Path) -> Result<Self, Error> {
        let mut decoder = ZlibDecoder::new(File::open(path)?);
        let mut packed = Vec::new();
        decoder.read_to_end(&mut packed)?;
        let topics: HashMap<String, Vec<HopRecord>> = rmp_serde::from_slice(&packed)?;
        let first_ts = topics
            .values()
            .filter_map(|records| records.first())
            .map(|r| r.ts)
            .fold(None, |min: Option<f64>, ts| match min {
                Some(m) if m <= ts => Some(m),
                _ => Some(ts),
            });
        Ok(Self { topics, first_ts })
    }
}
