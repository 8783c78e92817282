//! Headless driver for RPS Arena: plays rounds on a timer and reads commands from stdin.

mod controller;
mod telemetry;

use anyhow::{Context, Result};
use controller::{Command, Controller, Outcome};
use rps_core::RunnerConfig;
use std::io::Write;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::mpsc;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

const CONFIG_ENV: &str = "RPS_ARENA_CONFIG";
const SEED_ENV: &str = "RPS_ARENA_SEED";

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = load_config()?;

    // Initialize telemetry
    telemetry::init_telemetry(config.json_logs)?;

    info!(
        max_x = config.arena.max_x,
        max_y = config.arena.max_y,
        population = config.arena.population,
        seed = config.arena.seed,
        speed = %config.speed,
        "Starting RPS Arena"
    );

    let mut controller = Controller::new(&config)?;
    let mut render = config.render_frames;
    if render {
        show_frame(&mut controller, &mut render);
    }

    let (tx, mut rx) = mpsc::channel(16);
    tokio::spawn(read_commands(tx));
    let mut commands_open = true;

    let mut ticker = round_timer(controller.speed().interval());

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    // One task owns the game, so a round always finishes before the next event is handled.
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match controller.on_tick() {
                    Ok(Some(_)) if render => show_frame(&mut controller, &mut render),
                    Ok(_) => {}
                    Err(e) => debug!("Round skipped: {}", e),
                }
            }
            command = rx.recv(), if commands_open => {
                let Some(command) = command else {
                    info!("Input closed; running until interrupted");
                    commands_open = false;
                    continue;
                };

                match controller.apply(command) {
                    Ok(Outcome::Quit) => break,
                    Ok(Outcome::SpeedChanged(speed)) => ticker = round_timer(speed.interval()),
                    Ok(Outcome::Redraw) => {}
                    Err(e) => warn!("Command {:?} failed: {}", command, e),
                }

                if render {
                    show_frame(&mut controller, &mut render);
                }
            }
            _ = &mut shutdown => break,
        }
    }

    info!(
        rounds = controller.game().round(),
        winner = ?controller.game().board().winner(),
        "Shutting down"
    );

    Ok(())
}

fn load_config() -> Result<RunnerConfig> {
    let mut config = match std::env::var(CONFIG_ENV) {
        Ok(path) => RunnerConfig::from_json_file(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        Err(_) => RunnerConfig::default(),
    };

    if let Ok(seed) = std::env::var(SEED_ENV) {
        config.arena.seed = seed
            .parse()
            .with_context(|| format!("{SEED_ENV} must be an unsigned integer, got {seed:?}"))?;
    } else if config.arena.seed == 0 {
        config.arena.seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
    }

    config.arena.validate()?;
    Ok(config)
}

fn round_timer(period: Duration) -> Interval {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Write the current frame; on an output error, log it and stop rendering instead of exiting.
fn show_frame(controller: &mut Controller, render: &mut bool) {
    if let Err(e) = write_frame(&controller.frame()) {
        error!("Failed to write frame, rendering disabled: {}", e);
        *render = false;
    }
}

fn write_frame(frame: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(frame.as_bytes())?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}

async fn read_commands(tx: mpsc::Sender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match line.parse::<Command>() {
                Ok(command) => {
                    if tx.send(command).await.is_err() {
                        break;
                    }
                }
                Err(e) if !line.is_empty() => warn!("Ignoring input: {}", e),
                Err(_) => {}
            },
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
