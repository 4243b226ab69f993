use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

mod cli;
mod clock;
mod config;
mod gate;
mod logging;
mod ui;

use cli::{Args, Commands};
use clock::{Clock, FixedClock, SystemClock};
use gate::{AccessWindow, Evaluation, SessionContext};
use ui::{Action, Controller, EmbeddedFrame, TerminalShell};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let config = config::load_config_or_default(&args.config)?;
    logging::init_logging(args.verbose, &config.logging.level, &config.logging.suppress);

    match args.command {
        Some(Commands::Status {
            override_enabled,
            at,
            json,
        }) => show_status(override_enabled, at.as_deref(), json),
        Some(Commands::RefreshUrl { url }) => show_refresh_url(url, &config),
        Some(Commands::Run { override_enabled }) => run_dashboard(&config, override_enabled),
        // No subcommand: interactive page
        None => run_dashboard(&config, false),
    }
}

/// Evaluate the gate once and print the result
fn show_status(override_enabled: bool, at: Option<&str>, json: bool) -> Result<()> {
    let clock: Box<dyn Clock> = match at {
        Some(at) => {
            let instant = chrono::DateTime::parse_from_rfc3339(at)
                .with_context(|| format!("Invalid --at time '{}', expected RFC 3339", at))?;
            Box::new(FixedClock::new(instant))
        }
        None => Box::new(SystemClock),
    };

    let now = clock.now();
    let session = SessionContext::with_override(override_enabled);
    let evaluation = gate::evaluate(&now, &session);

    if json {
        let report = serde_json::json!({
            "now": now.to_rfc3339(),
            "window": AccessWindow::STANDARD,
            "override_enabled": session.override_enabled,
            "evaluation": evaluation,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Time:   {} {}", ui::format::status_time(&now), ui::format::long_date(&now));
    println!("Window: {}", AccessWindow::STANDARD);
    if session.override_enabled {
        println!("Developer mode: on");
    }
    match evaluation {
        Evaluation::Open => println!("Status: open"),
        Evaluation::Waiting(countdown) => {
            println!("Status: waiting");
            println!("Opens in {}", countdown);
        }
    }

    Ok(())
}

/// Print the URL a refresh would load right now
fn show_refresh_url(url: Option<String>, config: &config::Config) -> Result<()> {
    let url = url.unwrap_or_else(|| config.dashboard.url.clone());
    config::validate_dashboard_url(&url)?;

    let timestamp = SystemClock.now_utc().timestamp_millis();
    println!("{}", ui::frame::refresh_url(&url, timestamp));
    Ok(())
}

/// Run the interactive page until quit or end of input
fn run_dashboard(config: &config::Config, override_enabled: bool) -> Result<()> {
    println!("Dashboard Access Gate");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("Commands: enter, back, refresh, ctrl+shift+d (developer mode), quit");
    println!();

    let controller = Controller::new(
        TerminalShell::stdout(),
        Arc::new(SystemClock),
        EmbeddedFrame::new(config.dashboard.url.clone()),
        SessionContext::with_override(override_enabled),
        config.controller_settings(),
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(async {
        let (actions_tx, actions_rx) = mpsc::channel(16);
        tokio::spawn(read_actions(actions_tx));
        controller.run(actions_rx).await
    })
}

/// Forward terminal input to the controller; end of input means quit
async fn read_actions(actions: mpsc::Sender<Action>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let action = match lines.next_line().await {
            Ok(Some(line)) => match ui::parse_input(&line) {
                Some(action) => action,
                None => {
                    if !line.trim().is_empty() {
                        tracing::warn!("Unrecognized input: {}", line.trim());
                    }
                    continue;
                }
            },
            Ok(None) => Action::Quit,
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                Action::Quit
            }
        };

        let quit = action == Action::Quit;
        if actions.send(action).await.is_err() || quit {
            break;
        }
    }
}
