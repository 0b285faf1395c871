//! Export a sealed session artifact as one flat CSV, one row per sample,
//! and log a per-topic summary.

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

use hoptrace::analysis::{self, TopicSeries};
use hoptrace::args::convert_filter;
use hoptrace::session::Session;
use hoptrace::{Error, HOP_LABELS};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Sealed session artifact to analyze
    artifact: PathBuf,
    /// CSV file to write (default: artifact path with a .csv extension)
    #[clap(short, long)]
    output: Option<PathBuf>,
    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(convert_filter(args.verbose.log_level_filter()))
        .init();

    let session = Session::load(&args.artifact)?;
    info!(
        "loaded {} record(s) on {} topic(s) from {}",
        session.record_count(),
        session.topic_count(),
        args.artifact.display()
    );

    let series = analysis::series(&session);
    let out = args
        .output
        .unwrap_or_else(|| args.artifact.with_extension("csv"));
    write_series(&series, &out)?;
    info!("wrote {}", out.display());

    for s in &series {
        summarize(s);
    }
    Ok(())
}

fn write_series(series: &[TopicSeries], path: &Path) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["topic".to_owned(), "t".to_owned()];
    for label in HOP_LABELS {
        header.push(format!("distance_km_{}", column(label)));
    }
    for label in HOP_LABELS {
        header.push(format!("latency_s_{}", column(label)));
    }
    header.push("total_distance_km".to_owned());
    header.push("total_latency_s".to_owned());
    wtr.write_record(&header)?;

    for s in series {
        for sample in &s.samples {
            let mut row = vec![s.topic.clone(), sample.t.to_string()];
            row.extend(sample.distance_km.iter().map(f64::to_string));
            row.extend(sample.latency_s.iter().map(f64::to_string));
            row.push(sample.total_distance_km.to_string());
            row.push(sample.total_latency_s.to_string());
            wtr.write_record(&row)?;
        }
    }
    wtr.flush()?;
    Ok(())
}

fn column(label: &str) -> String {
    label.to_lowercase().replace('-', "_")
}

fn summarize(series: &TopicSeries) {
    let n = series.samples.len();
    if n == 0 {
        return;
    }
    let span = series.samples.last().map_or(0.0, |s| s.t);
    let mean_latency =
        series.samples.iter().map(|s| s.total_latency_s).sum::<f64>() / n as f64;
    info!(
        "{}: {} sample(s) over {:.1} s, mean path latency {:.3} ms",
        series.topic,
        n,
        span,
        mean_latency * 1e3
    );
}
