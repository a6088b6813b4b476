//! Tickmux Demo Daemon
//!
//! Runs a single timer through the engine and multiplexer, logging its
//! events. Countdown and pomodoro timers run to completion; a stopwatch runs
//! until Ctrl-C.

use std::str::FromStr;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;

use tickmux_core::{TimerCommand, TimerConfig, TimerEventType, TimerKind};
use tickmux_worker::TimerMux;

#[derive(Parser, Debug)]
#[command(name = "tickmuxd")]
#[command(about = "Tickmux demo - background timer engine driver", long_about = None)]
struct Args {
    /// Timer kind: stopwatch, countdown or pomodoro
    #[arg(short, long, default_value = "countdown")]
    kind: String,

    /// Initial value in milliseconds
    #[arg(short, long, default_value_t = 5000)]
    initial_value: u64,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_new(&args.log_level)?)
        .init();

    let kind = TimerKind::from_str(&args.kind)?;

    let mux = TimerMux::new();
    mux.register_component().await;

    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    mux.subscribe(
        "demo",
        Box::new(move |event| match event.event_type {
            TimerEventType::Tick { value, .. } => tracing::info!(value, "tick"),
            TimerEventType::Complete { .. } => {
                tracing::info!("timer complete");
                let _ = done_tx.send(());
            }
            other => tracing::info!(event = ?other, "timer event"),
        }),
    )
    .await;

    mux.send(TimerCommand::Start {
        id: "demo".to_string(),
        kind,
        config: TimerConfig::with_initial_value(args.initial_value),
    })
    .await;

    if kind.counts_down() {
        let _ = done_rx.recv().await;
    } else {
        tokio::signal::ctrl_c().await?;
        mux.send(TimerCommand::Stop {
            id: "demo".to_string(),
        })
        .await;
    }

    mux.unregister_component().await;
    Ok(())
}
