use anyhow::{Context, Result};
use clap::Parser;
use lapin::options::{BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Connection, ConnectionProperties};
use std::time::Duration;

pub const DEFAULT_QUEUE: &str = "hello";
pub const DEFAULT_MESSAGE: &str = "Hello world";
pub const DEFAULT_AMQP_URL: &str = "amqp://localhost";

// Publishing is not confirmed, so give the frames time to leave before closing
const CLOSE_DELAY: Duration = Duration::from_millis(500);

/// Publish a single message to a broker queue and exit.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "routechat-publish")]
#[command(author, version, about, long_about = None)]
pub struct PublishRequest {
    /// Queue to declare and publish to
    #[arg(default_value = DEFAULT_QUEUE)]
    pub queue_name: String,

    /// Message payload, sent as raw bytes
    #[arg(default_value = DEFAULT_MESSAGE)]
    pub message: String,

    #[arg(long, env = "AMQP_URL", default_value = DEFAULT_AMQP_URL)]
    pub amqp_url: String,
}

impl PublishRequest {
    pub fn confirmation(&self) -> String {
        format!(
            " [x] Sent \"{}\" to queue \"{}\"",
            self.message, self.queue_name
        )
    }
}

/// Declares a non-durable queue and publishes the message to it, fire-and-forget.
pub async fn publish(request: &PublishRequest) -> Result<()> {
    let connection = Connection::connect(&request.amqp_url, ConnectionProperties::default())
        .await
        .context(format!("Failed to connect to broker at {}", request.amqp_url))?;
    let channel = connection
        .create_channel()
        .await
        .context("Failed to open a channel")?;

    channel
        .queue_declare(
            &request.queue_name,
            QueueDeclareOptions {
                durable: false,
                ..QueueDeclareOptions::default()
            },
            FieldTable::default(),
        )
        .await
        .context(format!("Failed to declare queue '{}'", request.queue_name))?;

    // Default exchange, routed by queue name. The returned confirm is deliberately not awaited.
    channel
        .basic_publish(
            "",
            &request.queue_name,
            BasicPublishOptions::default(),
            request.message.as_bytes(),
            BasicProperties::default(),
        )
        .await
        .context(format!("Failed to publish to queue '{}'", request.queue_name))?;
    println!("{}", request.confirmation());

    tokio::time::sleep(CLOSE_DELAY).await;
    connection
        .close(200, "OK")
        .await
        .context("Failed to close broker connection")?;
    log::debug!("Broker connection closed");
    Ok(())
}
