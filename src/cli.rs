use crate::client::DashboardClient;
use crate::model::{ClientConfig, RestartOutcome, StatusReport};
use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::time::Duration;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "nginx-ui-cli",
    version,
    about = "Terminal status monitor and restart control for the nginx-ui dashboard"
)]
pub struct Cli {
    /// Base URL of the nginx-ui dashboard server
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    pub base_url: String,

    /// Print the current container status as JSON and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print the current container status as text and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Trigger a container restart before reporting status (with --json/--text)
    #[arg(long)]
    pub restart: bool,

    /// Run silently: suppress all output except errors (for cron usage)
    #[arg(long)]
    pub silent: bool,

    /// HTTP request timeout
    #[arg(long, default_value = "10s")]
    pub request_timeout: humantime::Duration,

    /// HTTP connect timeout
    #[arg(long, default_value = "5s")]
    pub connect_timeout: humantime::Duration,

    /// Blink interval for the pending-restart indicator in milliseconds
    #[arg(long, default_value_t = 100)]
    pub blink_interval_ms: u64,
}

/// Build a `ClientConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> ClientConfig {
    ClientConfig {
        base_url: args.base_url.clone(),
        request_timeout: Duration::from(args.request_timeout),
        connect_timeout: Duration::from(args.connect_timeout),
        blink_interval_ms: args.blink_interval_ms,
        user_agent: format!("nginx-ui-cli/{}", env!("CARGO_PKG_VERSION")),
    }
}

pub async fn run(args: Cli) -> Result<()> {
    // Validate that --silent can only be used with --json
    if args.silent && !args.json {
        return Err(anyhow::anyhow!(
            "--silent can only be used with --json. Use --silent --json together."
        ));
    }

    // Silent mode takes precedence over other output modes
    if args.silent {
        return run_once(args, true).await;
    }

    if !args.json && !args.text {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_once(args, false).await;
        }
    }

    run_once(args, false).await
}

/// One-shot mode: optional restart, then a status fetch, then a report.
/// `silent` suppresses all output; failures are reported via the exit code.
async fn run_once(args: Cli, silent: bool) -> Result<()> {
    let cfg = build_config(&args);
    let client = DashboardClient::new(&cfg)?;
    let (out_tx, out_handle) = if silent {
        (None, None)
    } else {
        let (tx, handle) = spawn_output_writer();
        (Some(tx), Some(handle))
    };

    let restart = if args.restart {
        Some(match client.restart().await {
            Ok(resp) => RestartOutcome::Completed {
                message: resp.message,
            },
            Err(e) => RestartOutcome::Failed {
                error: format!("{e:#}"),
            },
        })
    } else {
        None
    };

    // The status fetch always runs, restart or not: a failed restart still
    // reports whatever the container looks like afterwards.
    let (status, status_error) = match client.fetch_status().await {
        Ok(s) => (Some(s), None),
        Err(e) => (None, Some(format!("{e:#}"))),
    };

    if let Some(tx) = out_tx.as_ref() {
        if args.json {
            let report = StatusReport {
                timestamp_utc: time::OffsetDateTime::now_utc()
                    .format(&time::format_description::well_known::Rfc3339)
                    .unwrap_or_else(|_| "now".into()),
                base_url: cfg.base_url.clone(),
                status: status.clone(),
                status_error: status_error.clone(),
                restart: restart.clone(),
            };
            let _ = tx.send(OutputLine::Stdout(serde_json::to_string_pretty(&report)?));
        } else {
            let summary =
                crate::text_summary::build_summary(status.as_ref(), status_error.as_deref(), restart.as_ref());
            for line in summary.lines {
                let _ = tx.send(OutputLine::Stdout(line));
            }
        }
    }

    if let Some(tx) = out_tx {
        drop(tx);
    }
    if let Some(handle) = out_handle {
        let _ = handle.await;
    }

    if let Some(RestartOutcome::Failed { error }) = restart {
        anyhow::bail!("restart failed: {error}");
    }
    if let Some(error) = status_error {
        anyhow::bail!("status check failed: {error}");
    }
    Ok(())
}
