//! Append-only conversation memory log.
//!
//! One process-wide, newline-delimited UTF-8 file. Reads degrade to
//! sentinel strings instead of failing; the tail is a diagnostic hook,
//! not load-bearing state. Writes are currently not issued by the
//! orchestrator (persistence is disabled upstream), but append stays
//! implemented so re-enabling is trivial.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use triage_protocol::ToolContext;

/// Injected log-access capability: append one line, read the last n.
#[async_trait]
pub trait MemoryLog: Send + Sync {
    /// Append a single line. The OS append guarantee is relied on for
    /// concurrent writers; no extra locking.
    async fn append(&self, line: &str) -> anyhow::Result<()>;

    /// Last `n` lines joined with newlines, or a sentinel when nothing is
    /// available. Never fails.
    async fn tail(&self, n: usize) -> String;
}

/// Render one memory log line for a request context.
pub fn format_entry(ctx: &ToolContext, content: &str) -> String {
    let ts = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S");
    format!(
        "[{ts}] conversation={} | request={} | user={} | {content}",
        ctx.conversation_id, ctx.request_id, ctx.user_id
    )
}

/// File-backed memory log.
pub struct FileMemoryLog {
    path: PathBuf,
}

impl FileMemoryLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl MemoryLog for FileMemoryLog {
    async fn append(&self, line: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{line}\n").as_bytes()).await?;
        Ok(())
    }

    async fn tail(&self, n: usize) -> String {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return "(memory log absent)".to_string();
            }
            Err(e) => return format!("(failed to read memory log: {e})"),
        };
        let lines: Vec<&str> = content.lines().collect();
        if lines.is_empty() {
            return "(memory log empty)".to_string();
        }
        let start = lines.len().saturating_sub(n);
        lines[start..].join("\n")
    }
}

/// In-memory memory log for tests.
#[derive(Default)]
pub struct MockMemoryLog {
    lines: std::sync::Mutex<Vec<String>>,
}

impl MockMemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lines(lines: Vec<String>) -> Self {
        Self {
            lines: std::sync::Mutex::new(lines),
        }
    }
}

#[async_trait]
impl MemoryLog for MockMemoryLog {
    async fn append(&self, line: &str) -> anyhow::Result<()> {
        self.lines
            .lock()
            .expect("mock memory log lock poisoned")
            .push(line.to_string());
        Ok(())
    }

    async fn tail(&self, n: usize) -> String {
        let lines = self.lines.lock().expect("mock memory log lock poisoned");
        if lines.is_empty() {
            return "(memory log empty)".to_string();
        }
        let start = lines.len().saturating_sub(n);
        lines[start..].join("\n")
    }
}
