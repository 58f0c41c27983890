// Declare the modules
pub mod api;
pub mod commands;
pub mod config;
pub mod gateway;
pub mod models;
pub mod publisher;
pub mod session;
pub mod state;

use anyhow::Result;
use api::{HttpTransport, Transport};
use commands::{Command, HELP_TEXT};
use config::ChatConfig;
use models::{Message, Sender};
use session::ChatSession;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

pub use gateway::{BotReply, Gateway, GatewayError};
pub use session::FAILURE_REPLY;
pub use state::{Phase, SessionState};

/// Builds a session from the given configuration.
///
/// A transport that cannot be constructed is logged and left out; the session then
/// answers every exchange with the failure reply instead of refusing to start.
pub fn build_session(config: &ChatConfig) -> ChatSession {
    let transport: Option<Arc<dyn Transport>> = match HttpTransport::new(&config.base_url) {
        Ok(transport) => {
            log::info!("Routing questions through {}", transport.base_url());
            Some(Arc::new(transport))
        }
        Err(e) => {
            log::error!("Failed to create HTTP transport for {}: {}", config.base_url, e);
            None
        }
    };

    let session = ChatSession::with_transport(transport);
    match config.request_timeout {
        Some(timeout) => session.with_timeout(timeout),
        None => session,
    }
}

/// Entry point of the terminal front-end: one session on stdin/stdout.
pub async fn run() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = ChatConfig::from_env()?;
    let session = build_session(&config);
    let stdin = BufReader::new(tokio::io::stdin());
    drive(&session, stdin, std::io::stdout()).await
}

/// Feeds input lines to the session and prints whatever they add to the log.
pub async fn drive<R, W>(session: &ChatSession, input: R, mut out: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut printed = print_new(session, 0, &mut out)?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Say(text) => {
                session.set_draft(text);
                session.send_message().await;
                printed = print_new(session, printed, &mut out)?;
            }
            Command::Models => {
                session.refresh_models().await;
                let models = session.available_models();
                if models.is_empty() {
                    writeln!(out, "(no models available)")?;
                } else {
                    for model in models {
                        writeln!(out, "  - {}", model)?;
                    }
                }
            }
            Command::Reset => {
                session.reset();
                printed = print_new(session, 0, &mut out)?;
            }
            Command::Help => writeln!(out, "{}", HELP_TEXT)?,
            Command::Quit => break,
            Command::Unknown(cmd) => writeln!(out, "Unknown command {}, try /help", cmd)?,
        }
    }
    out.flush()?;
    Ok(())
}

// Bot messages are printed as they arrive; the user already saw what they typed
fn print_new(session: &ChatSession, printed: usize, out: &mut impl Write) -> Result<usize> {
    let log = session.messages();
    for message in log.iter().skip(printed).filter(|m| m.is_bot()) {
        writeln!(out, "{}", render(message))?;
    }
    Ok(log.len())
}

fn render(message: &Message) -> String {
    let who = match message.sender {
        Sender::User => "you",
        Sender::Bot => "bot",
    };
    format!(
        "[{}] {}> {}",
        message.timestamp.format("%H:%M:%S"),
        who,
        message.display_text()
    )
}
