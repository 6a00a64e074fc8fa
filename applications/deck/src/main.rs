/// Soul Deck - headless terminal music player
use clap::Parser;
use soul_deck::{Deck, DeckConfig};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "soul-deck")]
#[command(about = "Soul Deck terminal player", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./deck.toml when present)
    #[arg(short, long, env = "DECK_CONFIG")]
    config: Option<PathBuf>,

    /// Files to queue at startup
    tracks: Vec<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = DeckConfig::load(cli.config.as_deref())?;
    config.validate()?;

    // Initialize tracing (stderr, so it stays out of command output)
    let default_filter = config.logging.filter.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Soul Deck");

    let tick = Duration::from_millis(config.simulator.tick_ms);
    let (event_tx, mut device_events) = mpsc::unbounded_channel();
    let mut deck = Deck::new(config, &cli.tracks, event_tx);

    run(&mut deck, &mut device_events, tick).await?;

    tracing::info!("Soul Deck stopped");
    Ok(())
}

/// Host loop: every controller mutation happens on this one task
async fn run(
    deck: &mut Deck,
    device_events: &mut mpsc::UnboundedReceiver<soul_transport::DeviceEvent>,
    tick: Duration,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    println!("Type 'help' for commands.");
    print_lines(&deck.notifications());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!("stdin closed");
                    break;
                };
                match deck.execute(&line) {
                    Ok(reply) => {
                        print_lines(&reply.lines);
                        if reply.quit {
                            break;
                        }
                    }
                    Err(e) => println!("error: {}", e),
                }
            }
            Some(event) = device_events.recv() => {
                if let Err(e) = deck.handle_device_event(event) {
                    tracing::warn!("{}", e);
                }
            }
            _ = ticker.tick() => {
                deck.tick(tick);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }

        print_lines(&deck.notifications());
    }

    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
