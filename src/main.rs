//! CLI for brokerline
//!
//! Subcommands:
//! - `publish`: send one payload to a topic
//! - `consume`: subscribe to a topic and poll it for messages

use std::time::Duration;

use brokerline::BrokerClient;
use brokerline::config::load_config;
use clap::Parser;
use serde_json::Value;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "brokerline")]
enum Command {
    /// Publish a payload. It is sent as JSON if it parses, otherwise as a string.
    Publish { topic: String, payload: String },
    /// Subscribe to a topic, then poll it
    Consume {
        topic: String,
        /// Number of polls before exiting
        #[arg(long, default_value_t = 1)]
        count: usize,
        /// Delay between polls in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() {
    let cmd = Command::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    brokerline::utils::logging::init(&config.logging.level);

    let client = BrokerClient::from_settings(&config.broker);
    if let Err(e) = run(&client, cmd).await {
        error!("Client {} failed: {}", client.client_id(), e);
        std::process::exit(1);
    }
}

async fn run(client: &BrokerClient, cmd: Command) -> brokerline::Result<()> {
    client.connect().await?;

    match cmd {
        Command::Publish { topic, payload } => {
            let payload = serde_json::from_str(&payload).unwrap_or(Value::String(payload));
            client.publish(&topic, payload).await?;
            info!("Published to {topic}");
        }
        Command::Consume {
            topic,
            count,
            interval_ms,
        } => {
            client.subscribe(&topic).await?;
            for i in 0..count {
                match client.consume(&topic).await? {
                    Some(message) => println!("{message}"),
                    None => info!("No message available on {topic}"),
                }
                if i + 1 < count {
                    tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                }
            }
        }
    }

    client.disconnect().await;
    Ok(())
}
