use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use garaged::config::ServiceConfig;
use garaged::maintenance::{catalog, upcoming_maintenance, MaintenanceSummary, ServiceRecord};
use garaged::{rest, AppContext};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "garaged",
    about = "Garage API host — maintenance planning and vehicle data endpoints",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// REST API port
    #[arg(long, env = "GARAGED_PORT")]
    port: Option<u16>,

    /// Data directory for config.toml
    #[arg(long, env = "GARAGED_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "GARAGED_LOG")]
    log: Option<String>,

    /// Bind address for the REST API (default: 127.0.0.1; use 0.0.0.0 to expose)
    #[arg(long, env = "GARAGED_BIND")]
    bind_address: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "GARAGED_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the API server (default when no subcommand given).
    ///
    /// Examples:
    ///   garaged serve
    ///   garaged
    Serve,
    /// Print the static maintenance schedule.
    ///
    /// Examples:
    ///   garaged schedule
    ///   garaged schedule --json
    Schedule {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Compute upcoming maintenance for a vehicle.
    ///
    /// Service history is passed as repeated --service TYPE=MILEAGE flags.
    ///
    /// Examples:
    ///   garaged plan --mileage 47000 --service oil_change=45000 --service tire_rotation=42000
    ///   garaged plan --mileage 5000 --json
    Plan {
        /// Current odometer reading in miles
        #[arg(long)]
        mileage: i64,
        /// Last service mileage, as TYPE=MILEAGE (repeatable)
        #[arg(long = "service", value_name = "TYPE=MILEAGE")]
        services: Vec<String>,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ── Logging setup ────────────────────────────────────────────────────────
    // Init once — must happen before any tracing calls.
    let log_level = args.log.as_deref().unwrap_or("info").to_owned();
    let log_format = std::env::var("GARAGED_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    let _file_guard = setup_logging(&log_level, args.log_file.as_deref(), &log_format);

    match args.command {
        Some(Command::Schedule { json }) => run_schedule(json)?,
        Some(Command::Plan {
            mileage,
            services,
            json,
        }) => run_plan(mileage, &services, json)?,
        None | Some(Command::Serve) => {
            run_server(args.port, args.data_dir, args.log, args.bind_address).await?;
        }
    }

    Ok(())
}

async fn run_server(
    port: Option<u16>,
    data_dir: Option<std::path::PathBuf>,
    log: Option<String>,
    bind_address: Option<String>,
) -> Result<()> {
    let config = ServiceConfig::new(port, data_dir, log, bind_address);
    info!(
        port = config.port,
        bind = %config.bind_address,
        vpic = %config.vehicle_data.base_url,
        "starting garaged v{}",
        env!("CARGO_PKG_VERSION")
    );
    let ctx = AppContext::new(config).context("failed to build application context")?;
    rest::serve(Arc::new(ctx)).await
}

fn run_schedule(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(catalog())?);
        return Ok(());
    }
    println!(
        "{:<22} {:>9} {:>7}  {:>13}  {}",
        "SERVICE", "MILES", "MONTHS", "EST. COST", "PRIORITY"
    );
    for item in catalog() {
        println!(
            "{:<22} {:>9} {:>7}  ${:>5.0}–${:<5.0}  {:?}",
            item.service_type,
            item.interval_miles,
            item.interval_months,
            item.estimated_cost_low,
            item.estimated_cost_high,
            item.priority
        );
    }
    Ok(())
}

fn run_plan(mileage: i64, services: &[String], json: bool) -> Result<()> {
    if mileage < 0 {
        bail!("--mileage must be a non-negative integer");
    }
    let history = parse_service_flags(services)?;
    let upcoming = upcoming_maintenance(mileage, &history);
    let summary = MaintenanceSummary::of(&upcoming);

    if json {
        let out = serde_json::json!({ "upcoming": upcoming, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if upcoming.is_empty() {
        println!("Nothing due within the next 5000 miles.");
        return Ok(());
    }
    println!(
        "{:<22} {:>9} {:>11}  {}",
        "SERVICE", "DUE AT", "MILES LEFT", "STATUS"
    );
    for entry in &upcoming {
        println!(
            "{:<22} {:>9} {:>11}  {:?}",
            entry.service_type, entry.due_mileage, entry.miles_until_due, entry.priority
        );
    }
    println!(
        "\n{} item(s), {} overdue — estimated ${:.0}–${:.0}",
        summary.total_items,
        summary.overdue_count,
        summary.estimated_cost_low,
        summary.estimated_cost_high
    );
    Ok(())
}

/// Parse repeated `--service TYPE=MILEAGE` flags into history records.
fn parse_service_flags(services: &[String]) -> Result<Vec<ServiceRecord>> {
    services
        .iter()
        .map(|flag| {
            let (service_type, mileage) = flag
                .split_once('=')
                .with_context(|| format!("--service '{flag}' is not TYPE=MILEAGE"))?;
            let mileage: i64 = mileage
                .trim()
                .parse()
                .with_context(|| format!("--service '{flag}' has a non-numeric mileage"))?;
            Ok(ServiceRecord {
                service_type: service_type.trim().to_string(),
                mileage,
            })
        })
        .collect()
}

/// Initialize the tracing subscriber.
/// If `log_file` is set, logs go to both stdout and a daily-rolling file.
/// Returns a `WorkerGuard` that must stay alive for the process lifetime.
///
/// `log_format` may be `"pretty"` (default, human-readable compact format) or
/// `"json"` (structured JSON for log aggregators).
///
/// If the log directory cannot be created, falls back to stdout-only logging
/// with a warning — never panics.
fn setup_logging(
    log_level: &str,
    log_file: Option<&std::path::Path>,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let use_json = log_format == "json";

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let filename = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("garaged.log"));

        // Ensure the directory exists before tracing-appender tries to open it.
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!(
                "warn: could not create log directory '{}': {e} — falling back to stdout",
                dir.display()
            );
            if use_json {
                tracing_subscriber::fmt().json().with_env_filter(log_level).init();
            } else {
                tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
            }
            return None;
        }

        let appender = tracing_appender::rolling::daily(dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        if use_json {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().json())
                .with(fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            tracing_subscriber::registry()
                .with(EnvFilter::new(log_level))
                .with(fmt::layer().compact())
                .with(fmt::layer().with_writer(non_blocking))
                .init();
        }

        Some(guard)
    } else if use_json {
        tracing_subscriber::fmt().json().with_env_filter(log_level).init();
        None
    } else {
        tracing_subscriber::fmt().with_env_filter(log_level).compact().init();
        None
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_service_flags() {
        let records =
            parse_service_flags(&["oil_change=45000".to_string(), "tire_rotation=42000".to_string()])
                .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].service_type, "oil_change");
        assert_eq!(records[0].mileage, 45_000);
    }

    #[test]
    fn rejects_malformed_service_flags() {
        assert!(parse_service_flags(&["oil_change".to_string()]).is_err());
        assert!(parse_service_flags(&["oil_change=lots".to_string()]).is_err());
    }
}
