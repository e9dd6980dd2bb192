// ABOUTME: Main entry point for the toast-box demo CLI
// Posts toasts from the command line and re-renders them on every changed/tick signal

//! `toast-box` command line demo.

use anyhow::{anyhow, Context, Result};
use chrono::{TimeDelta, Utc};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Notify;
use toast_box::{ManagerConfig, Severity, Toast, ToastManager};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "toast-box", version, about = "Show transient toast notifications until they expire")]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sweep interval in milliseconds, overriding the config
    #[arg(long)]
    interval: Option<u64>,

    /// Render the toast list as JSON
    #[arg(long)]
    json: bool,

    /// Toast to post, as severity:title:message[:ttl_secs]
    #[arg(long = "toast", required = true)]
    toasts: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let manager = ToastManager::from_config(&config);

    let specs = cli
        .toasts
        .iter()
        .map(|spec| parse_toast_spec(spec, config.default_ttl()))
        .collect::<Result<Vec<_>>>()?;

    run(manager, specs, cli.json).await
}

async fn run(manager: ToastManager, specs: Vec<ToastSpec>, json: bool) -> Result<()> {
    let wake = Arc::new(Notify::new());

    let on_changed = {
        let wake = wake.clone();
        manager.subscribe_changed(move || wake.notify_one())
    };
    let on_tick = {
        let wake = wake.clone();
        manager.subscribe_tick(move || wake.notify_one())
    };

    manager.start()?;
    for spec in specs {
        manager.add(manager.new_toast(spec.title, spec.message, spec.severity, spec.ttl));
    }
    info!("Posted {} toasts", manager.len());

    loop {
        render(&manager.get_toasts(), json)?;
        if !manager.has_toasts() {
            break;
        }

        tokio::select! {
            _ = wake.notified() => {}
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted with {} toasts still visible", manager.len());
                break;
            }
        }
    }

    manager.unsubscribe(on_changed);
    manager.unsubscribe(on_tick);
    manager.stop();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<ManagerConfig> {
    let mut config = match cli.config.clone().or_else(ManagerConfig::default_path) {
        Some(path) => ManagerConfig::load_or_default(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ManagerConfig::default(),
    };

    if let Some(interval) = cli.interval {
        config.sweep_interval_ms = interval;
    }
    config.validate()?;
    Ok(config)
}

#[derive(Debug, PartialEq)]
struct ToastSpec {
    severity: Severity,
    title: String,
    message: String,
    ttl: TimeDelta,
}

fn parse_toast_spec(spec: &str, default_ttl: TimeDelta) -> Result<ToastSpec> {
    let mut parts = spec.splitn(4, ':');
    let severity = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow!("Toast spec '{}' is missing a severity", spec))?
        .parse::<Severity>()?;
    let title = parts.next().unwrap_or_default().to_string();
    let message = parts.next().unwrap_or_default().to_string();

    let ttl = match parts.next() {
        Some(raw) => {
            let secs: f64 = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid ttl '{}' in toast spec '{}'", raw, spec))?;
            ttl_from_secs(secs)
                .ok_or_else(|| anyhow!("Ttl '{}' in toast spec '{}' is out of range", raw, spec))?
        }
        None => default_ttl,
    };

    Ok(ToastSpec {
        severity,
        title,
        message,
        ttl,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn ttl_from_secs(secs: f64) -> Option<TimeDelta> {
    let millis = (secs * 1000.0).round();
    // i64::MAX as f64 rounds up to 2^63, so compare with a strict bound
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    TimeDelta::try_milliseconds(millis as i64)
}

fn render(toasts: &[Toast], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(toasts)?);
        return Ok(());
    }

    let now = Utc::now();
    println!("--- {} toast(s) ---", toasts.len());
    for toast in toasts {
        println!(
            "[{}] {}: {} ({})",
            toast.severity(),
            toast.title(),
            toast.message(),
            toast.elapsed_display_text(now)
        );
    }
    Ok(())
}

fn setup_logging() {
    use tracing_subscriber::prelude::*;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "toast_box=info".into()),
        )
        .init();
}
