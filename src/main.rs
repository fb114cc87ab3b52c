use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use tiffin::config::Config;
use tiffin::notify::{Dispatcher, DryRunDispatcher, FcmDispatcher, NotificationMessage};
use tiffin::pipeline::{self, decide};
use tiffin::store::ChangeEvent;

/// Tiffin: push notifications for a shared mess ledger.
///
/// Watches document change events on meal and expense records and
/// broadcasts a notification to every subscriber when a meal flag rises
/// or an expense turns into a payment.
#[derive(Parser)]
#[command(name = "tiffin", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read NDJSON change events from stdin and dispatch notifications
    Listen {
        /// Log would-be notifications instead of sending them
        #[arg(long)]
        dry_run: bool,

        /// Max events handled in flight at once (default: 10)
        #[arg(long, default_value = "10")]
        concurrency: usize,
    },

    /// Serve the HTTP event receiver (POST /events)
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: 8787)
        #[arg(long, default_value = "8787")]
        port: u16,

        /// Address to bind (default: 127.0.0.1)
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,

        /// Log would-be notifications instead of sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Evaluate a single event and print the decision without sending
    Check {
        /// File containing one change event as JSON (stdin if omitted)
        file: Option<PathBuf>,
    },

    /// Send a hand-built notification to verify FCM credentials
    SendTest {
        /// Notification title
        #[arg(long, default_value = "Test")]
        title: String,

        /// Notification body
        #[arg(long, default_value = "tiffin test notification")]
        body: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tiffin=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Listen {
            dry_run,
            concurrency,
        } => {
            let config = Config::load()?;
            let dispatcher = make_dispatcher(&config, dry_run)?;
            info!(
                topic = %config.topic,
                dry_run = dry_run,
                "Listening for change events on stdin"
            );

            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let stats =
                pipeline::run_stream(stdin, &config.topic, dispatcher.as_ref(), concurrency)
                    .await?;

            println!(
                "Processed {} events: {} sent, {} skipped, {} dropped, {} malformed",
                stats.processed, stats.sent, stats.skipped, stats.failed, stats.malformed
            );
        }

        #[cfg(feature = "web")]
        Commands::Serve {
            port,
            bind,
            dry_run,
        } => {
            let config = Config::load()?;
            let dispatcher = make_dispatcher(&config, dry_run)?;
            tiffin::web::run_server(dispatcher, config.topic, port, &bind).await?;
        }

        Commands::Check { file } => {
            let config = Config::load()?;
            let raw = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    use std::io::Read;
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read event from stdin")?;
                    buf
                }
            };
            let event: ChangeEvent =
                serde_json::from_str(raw.trim()).context("Event is not valid JSON")?;

            match decide(&event, &config.topic) {
                Some(message) => {
                    println!("{}", "Would notify:".green().bold());
                    println!("  {} {}", "title:".bold(), message.title);
                    println!("  {} {}", "body: ".bold(), message.body);
                    for (key, value) in &message.data {
                        println!("  data.{key} = {value}");
                    }
                }
                None => {
                    println!("{}", "No notification for this event.".yellow());
                }
            }
        }

        Commands::SendTest { title, body } => {
            let config = Config::load()?;
            config.require_fcm()?;
            let dispatcher = FcmDispatcher::new(&config);

            let mut data = BTreeMap::new();
            data.insert("type".to_string(), "test".to_string());
            let message = NotificationMessage {
                topic: config.topic.clone(),
                title,
                body,
                data,
            };

            let receipt = dispatcher.send(&message).await?;
            println!(
                "{} {} at {}",
                "Delivered".green().bold(),
                receipt.message_id,
                receipt.sent_at
            );
        }
    }

    Ok(())
}

/// Pick the real or dry-run dispatcher. The real one needs credentials;
/// dry-run works anywhere.
fn make_dispatcher(config: &Config, dry_run: bool) -> Result<Arc<dyn Dispatcher>> {
    if dry_run {
        Ok(Arc::new(DryRunDispatcher))
    } else {
        config.require_fcm()?;
        Ok(Arc::new(FcmDispatcher::new(config)))
    }
}
