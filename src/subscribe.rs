//! Capture side of the telemetry link: a SUB socket that owns the wire
//! protocol and feeds a [`Session`] until the capture window elapses or
//! the operator interrupts.
//!
//! The subscriber side binds and the publisher connects, so a capture can
//! be waiting before the source comes up. Frames are two parts: a UTF-8
//! topic and a msgpack payload packed as a fixed-order array.

use crossbeam_channel::Receiver;
use tracing::{debug, info};

use crate::error::Error;
use crate::session::{HopRecord, Session};
use crate::{POLL_INTERVAL_MS, WINDOW_SECONDS};

/// Why a capture loop returned without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A record's timestamp ran past the session window.
    WindowElapsed,
    /// The operator asked the process to stop.
    Interrupted,
}

pub struct Subscriber {
    socket: zmq::Socket,
    endpoint: String,
    poll_interval_ms: i64,
    window_secs: f64,
}

// Manual impl because `zmq::Socket` is not `Debug`.
impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("endpoint", &self.endpoint)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("window_secs", &self.window_secs)
            .finish_non_exhaustive()
    }
}

impl Subscriber {
    /// Open a SUB socket with an empty topic filter and bind `endpoint`.
    /// Fails fast on any socket error; there is no retry.
    pub fn bind(endpoint: &str) -> Result<Self, Error> {
        let ctx = zmq::Context::new();
        let socket = ctx.socket(zmq::SUB)?;
        socket.set_subscribe(b"")?;
        socket.bind(endpoint)?;
        let endpoint = match socket.get_last_endpoint()? {
            Ok(resolved) => resolved,
            Err(raw) => String::from_utf8_lossy(&raw).into_owned(),
        };
        info!("subscriber bound on {}", endpoint);
        Ok(Self {
            socket,
            endpoint,
            poll_interval_ms: POLL_INTERVAL_MS,
            window_secs: WINDOW_SECONDS,
        })
    }

    /// The bound endpoint with any wildcard port resolved.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Wait up to `timeout_ms` for one frame. `Ok(None)` on timeout so the
    /// caller can re-check for cancellation. A failed receive or decode
    /// consumes the frame but never touches the session.
    pub fn receive_one(&self, timeout_ms: i64) -> Result<Option<(String, HopRecord)>, Error> {
        if self.socket.poll(zmq::POLLIN, timeout_ms)? == 0 {
            return Ok(None);
        }
        let parts = self.socket.recv_multipart(0)?;
        decode_frame(parts).map(Some)
    }

    /// Capture records into `session` until the window elapses or the
    /// interrupt channel fires. The window test runs per record, but a
    /// burst already queued on the socket is drained before a close is
    /// honored, so frames that arrived together land together.
    pub fn run(&self, session: &mut Session, interrupt: &Receiver<()>) -> Result<StopReason, Error> {
        loop {
            if interrupt.try_recv().is_ok() {
                info!("interrupt received, ending capture");
                return Ok(StopReason::Interrupted);
            }
            let (topic, record) = match self.receive_one(self.poll_interval_ms)? {
                Some(frame) => frame,
                None => continue,
            };
            let mut closed = self.ingest(session, topic, record);
            while let Some((topic, record)) = self.receive_one(0)? {
                closed |= self.ingest(session, topic, record);
            }
            if closed {
                info!("capture window closed after {} record(s)", session.record_count());
                return Ok(StopReason::WindowElapsed);
            }
        }
    }

    fn ingest(&self, session: &mut Session, topic: String, record: HopRecord) -> bool {
        debug!("{} record at ts {:.3}", topic, record.ts);
        let closed = match session.first_ts() {
            Some(first) => record.ts - first > self.window_secs,
            // the first record opens the window
            None => false,
        };
        session.append(topic, record);
        closed
    }
}

fn decode_frame(parts: Vec<Vec<u8>>) -> Result<(String, HopRecord), Error> {
    let [topic, payload] = <[Vec<u8>; 2]>::try_from(parts).map_err(|p| Error::Frame(p.len()))?;
    let topic = String::from_utf8(topic)?;
    let record = rmp_serde::from_slice(&payload)?;
    Ok((topic, record))
}
