use chrono::Utc;
use clap::Parser;
use crossbeam_channel::bounded;
use std::path::PathBuf;
use tracing::{error, info, warn};

use hoptrace::args::{convert_filter, Args};
use hoptrace::session::Session;
use hoptrace::subscribe::{StopReason, Subscriber};
use hoptrace::{Error, ENDPOINT};

fn main() -> Result<(), Error> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(convert_filter(args.verbose.log_level_filter()))
        .init();

    // SIGINT becomes a message on a bounded channel the capture loop polls
    let (stop_tx, stop_rx) = bounded(1);
    ctrlc::set_handler(move || {
        let _ = stop_tx.try_send(());
    })?;

    let subscriber = Subscriber::bind(ENDPOINT)?;
    info!("capturing on {}", subscriber.endpoint());

    let mut session = Session::new();
    let outcome = subscriber.run(&mut session, &stop_rx);
    match &outcome {
        Ok(StopReason::WindowElapsed) => info!("capture complete"),
        Ok(StopReason::Interrupted) => warn!("capture interrupted, sealing what we have"),
        Err(e) => error!("capture aborted: {}", e),
    }

    // Seal no matter how the loop ended; a loop error surfaces only after
    // the artifact is on disk.
    let path = args.output.unwrap_or_else(|| {
        PathBuf::from(format!("session-{}.mpz", Utc::now().format("%Y%m%dT%H%M%SZ")))
    });
    session.seal(&path)?;

    outcome.map(|_| ())
}
