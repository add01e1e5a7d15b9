//! GEX Report CLI
//!
//! Usage: `gex-report <batch.json> [--config config.json]`
//!
//! Processes one batch and prints session metadata, the latest snapshot and
//! its gamma flip zones. Set `RUST_LOG` to control log output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use gex_flow::prelude::*;
use tracing_subscriber::EnvFilter;

/// Gamma/delta exposure report for one intraday option-chain batch
#[derive(Parser)]
#[command(name = "gex-report", version, about)]
struct Cli {
    /// Path to the batch JSON file
    batch: PathBuf,

    /// Pipeline config JSON (default: presets for the batch symbol)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(&cli.batch, cli.config.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(batch_path: &Path, config_path: Option<&Path>) -> GexResult<()> {
    let batch = RawBatch::from_json(&fs::read_to_string(batch_path)?)?;

    let config = match config_path {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::for_symbol(&batch.symbol),
    };
    let warn_pct = config.session.spot_variation_warn_pct;
    let boundary = config.session.afternoon_start_hour;
    let pipeline = GexPipeline::with_config(config);

    let session = match pipeline.process(&batch) {
        ProcessOutcome::Data(session) => session,
        ProcessOutcome::NoData { reason } => {
            println!("No data: {}", reason);
            return Ok(());
        }
    };

    print_metadata(&session.metadata, warn_pct);

    let averages = session.session_averages(boundary);
    println!("\nSession Averages (net GEX):");
    println!("  Morning:   {}", fmt_opt(averages.morning));
    println!("  Afternoon: {}", fmt_opt(averages.afternoon));

    let Some(snapshot) = pipeline.latest_snapshot(&session) else {
        return Ok(());
    };
    print_snapshot(&snapshot);

    Ok(())
}

fn print_metadata(meta: &SessionMetadata, warn_pct: f64) {
    println!("{} {}", meta.symbol, meta.date);
    println!("==========================");
    println!("  Spot: {:.2} (range {:.2} - {:.2})", meta.spot, meta.spot_min, meta.spot_max);
    println!("  Records: {} ({} dropped)", meta.total_records, meta.dropped_records);
    println!("  Strikes: {}", meta.strikes_count);
    println!("  Snapshots: {} ({})", meta.timestamps_count, meta.time_range());
    if let Some(interval) = meta.interval_minutes {
        println!("  Interval: {} minutes", interval);
    }
    if let Some(code) = meta.expiry_code {
        println!("  Expiry code: {}", code);
    }
    if meta.has_wide_spot_range(warn_pct) {
        println!(
            "  WARNING: spot varied {:.2}% over the session, levels may shift",
            meta.spot_variation_pct
        );
    }
}

fn print_snapshot(snapshot: &Snapshot) {
    let s = &snapshot.summary;
    println!("\nSnapshot {}", s.timestamp.format("%H:%M:%S"));
    println!("  Spot: {:.2}", s.spot);

    for (name, totals) in [("All strikes", &s.all_strikes), ("Near spot", &s.near_spot)] {
        println!("\n{} ({}):", name, totals.strike_count);
        println!("  Net GEX: {:+.4}B", totals.net_gex);
        println!("  Net DEX: {:+.4}B", totals.net_dex);
        println!("  GEX + DEX: {:+.4}B", totals.combined);
        println!("  PCR: {:.2}", totals.put_call_ratio);
    }

    println!("\nSignals:");
    println!("  GEX: {:?}", s.signals.gex_regime);
    println!("  DEX: {:?}", s.signals.dex_bias);
    println!("  PCR: {:?}", s.signals.pcr_sentiment);

    let f = &s.flows;
    println!("\nFlows:");
    println!("  GEX in/out: {:+.4}B / {:+.4}B (net {:+.4}B)", f.gex_inflow, f.gex_outflow, f.gex_net);
    println!("  DEX in/out: {:+.4}B / {:+.4}B (net {:+.4}B)", f.dex_inflow, f.dex_outflow, f.dex_net);
    println!("  Regime: {}", f.regime.label());

    if let Some(strike) = s.max_pressure_strike {
        println!("  Max hedging pressure at {:.0}", strike);
    }

    println!("\nGamma Flip Zones:");
    if snapshot.flip_zones.is_empty() {
        println!("  none");
    }
    for zone in &snapshot.flip_zones.zones {
        let marker = if zone.near_spot { "*" } else { " " };
        println!(" {} {} [{}]", marker, zone.tooltip(), zone.direction.tone());
    }
    let near = snapshot.flip_zones.near_spot();
    if !near.is_empty() {
        println!("  * {} within the proximity band", near.len());
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:+.4}B", v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args() {
        let cli = Cli::try_parse_from(["gex-report", "nifty.json", "--config", "cfg.json"]).unwrap();
        assert_eq!(cli.batch, PathBuf::from("nifty.json"));
        assert_eq!(cli.config, Some(PathBuf::from("cfg.json")));

        let cli = Cli::try_parse_from(["gex-report", "nifty.json"]).unwrap();
        assert!(cli.config.is_none());

        assert!(Cli::try_parse_from(["gex-report"]).is_err());
    }
}
