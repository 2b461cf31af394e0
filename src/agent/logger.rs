//! Fire-and-forget JSONL interaction log.
//!
//! Every chat exchange is appended as one JSON line. Logging failures
//! are reported through tracing and never surface to the caller; a full
//! disk must not break the conversation.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Serialize)]
struct InteractionRecord<'a> {
    timestamp: DateTime<Utc>,
    session_id: &'a str,
    channel: &'a str,
    cliente: &'a str,
    agente: &'a str,
    escalado: bool,
}

/// Append-only interaction log shared across request handlers.
#[derive(Debug, Clone)]
pub struct InteractionLogger {
    path: Arc<PathBuf>,
}

impl InteractionLogger {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    /// Record one exchange without blocking the request. The write runs
    /// on the blocking pool and any failure is logged and dropped.
    pub fn record(
        &self,
        session_id: impl Into<String>,
        channel: impl Into<String>,
        user_message: impl Into<String>,
        agent_reply: impl Into<String>,
        escalated: bool,
    ) {
        let path = Arc::clone(&self.path);
        let session_id = session_id.into();
        let channel = channel.into();
        let user_message = user_message.into();
        let agent_reply = agent_reply.into();

        tokio::task::spawn_blocking(move || {
            let record = InteractionRecord {
                timestamp: Utc::now(),
                session_id: &session_id,
                channel: &channel,
                cliente: &user_message,
                agente: &agent_reply,
                escalado: escalated,
            };
            if let Err(error) = append_line(&path, &record) {
                warn!(path = %path.display(), %error, "failed to append interaction log");
            }
        });
    }
}

fn append_line(path: &Path, record: &InteractionRecord<'_>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let line = serde_json::to_string(record)?;
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{line}")
}
