use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The subscribe channel could not be set up. Nothing has been captured
    /// yet when this fires, and there is no retry: a dead channel is terminal.
    #[error("subscribe channel failed: {0}")]
    Connection(#[from] zmq::Error),

    /// A message arrived with the wrong number of frame parts. The wire
    /// format is exactly [topic, payload].
    #[error("malformed frame: expected [topic, payload], got {0} part(s)")]
    Frame(usize),

    /// The topic part of a frame was not valid UTF-8.
    #[error("topic frame is not utf-8: {0}")]
    Topic(#[from] std::string::FromUtf8Error),

    /// The payload could not be decoded as a hop record. Fatal to the
    /// receive call that hit it; records already stored are untouched.
    #[error("payload decode failed: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// Serialization failure while sealing a session.
    #[error("session encode failed: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),

    /// CSV failure on either side: a malformed fleet snapshot row, or a
    /// series export that could not be written.
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    /// Nearest-satellite selection over an empty fleet.
    #[error("fleet snapshot holds no satellites")]
    EmptyFleet,

    /// The square-root term of the slant-range model went negative, which
    /// means the inputs place the satellite inside the reference sphere.
    #[error("slant-range term {0} is negative: inconsistent geometry")]
    SlantDomain(f64),

    /// The arcsine argument of the elevation-angle formula left [-1, 1].
    /// Deliberately not clamped: out-of-range inputs signal bad geometry
    /// (satellite below the horizon, or distances that cannot coexist).
    #[error("elevation arcsine argument {0} outside [-1, 1]")]
    ElevationDomain(f64),

    /// Installing the SIGINT hook failed. The capture never starts without
    /// one, since the seal-on-interrupt contract could not be honored.
    #[error("interrupt handler: {0}")]
    SignalHandler(#[from] ctrlc::Error),
}
