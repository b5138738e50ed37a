//! Delivery of the summary message.
//!
//! Sending mail is left to whatever picks messages up from the outbox. `OutboxNotifier` only
//! queues each message as a JSON envelope in the outbox directory.

use crate::{utils, Result};
use anyhow::Context;
use async_trait::async_trait;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Prefix for queued message files.
pub const MESSAGE: &str = "message";

/// An outgoing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    /// Plain text.
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<PathBuf>,
}

impl Message {
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        attachment: Option<PathBuf>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
            attachment,
        }
    }
}

/// Delivers a `Message`. Returns a description of where it went.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &Message) -> Result<String>;
}

/// What gets written to the outbox for each message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Envelope {
    message_id: String,
    date: String,
    #[serde(flatten)]
    message: Message,
}

/// Queues messages as `message.YYYY-MM-DD-NNN.json` files in a directory, where NNN is a sequence
/// number that restarts every day.
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    outbox_dir: PathBuf,
}

impl OutboxNotifier {
    pub fn new(outbox_dir: impl Into<PathBuf>) -> Self {
        Self {
            outbox_dir: outbox_dir.into(),
        }
    }

    pub fn outbox_dir(&self) -> &Path {
        &self.outbox_dir
    }

    /// Writes `message` to the outbox and returns the path of the new file.
    pub async fn queue(&self, message: &Message) -> Result<PathBuf> {
        if let Some(attachment) = &message.attachment {
            if !utils::is_file(attachment).await {
                anyhow::bail!("The attachment '{}' does not exist", attachment.display());
            }
        }

        let date = today();
        let seq = self.next_sequence_number(&date).await?;
        let path = self.outbox_dir.join(format!("{MESSAGE}.{date}-{seq:03}.json"));

        let envelope = Envelope {
            message_id: format!("<{}@cars>", Uuid::new_v4()),
            date: Local::now().to_rfc2822(),
            message: message.clone(),
        };
        let json =
            serde_json::to_string_pretty(&envelope).context("Failed to serialize the message")?;
        utils::write(&path, json).await?;
        debug!("Queued message {} at {}", envelope.message_id, path.display());
        Ok(path)
    }

    /// Scans the outbox for files from `date` and returns the next sequence number.
    async fn next_sequence_number(&self, date: &str) -> Result<u32> {
        let mut max_seq: u32 = 0;

        let mut dir = utils::read_dir(&self.outbox_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if let Some(seq) = parse_sequence_number(&name, date) {
                max_seq = max_seq.max(seq);
            }
        }

        Ok(max_seq + 1)
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    async fn send(&self, message: &Message) -> Result<String> {
        let path = self.queue(message).await?;
        Ok(format!(
            "Queued '{}' for {} at {}",
            message.subject,
            message.recipient,
            path.display()
        ))
    }
}

/// Returns today's date in YYYY-MM-DD format.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Parses the sequence number from a queued message filename.
/// Returns None if the filename doesn't match `message.{date}-NNN.json`.
fn parse_sequence_number(filename: &str, date: &str) -> Option<u32> {
    let expected_start = format!("{MESSAGE}.{date}-");
    filename
        .strip_prefix(&expected_start)?
        .strip_suffix(".json")?
        .parse()
        .ok()
}
