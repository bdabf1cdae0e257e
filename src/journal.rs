//! Journal persistence: a pretty-printed JSON array of entries in the data dir.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Format of [`JournalEntry::timestamp`], e.g. `"05 Mar 2025, 09:41 PM"`.
pub const TIMESTAMP_FORMAT: &str = "%d %b %Y, %I:%M %p";

/// Polarity above this is positive, below its negation negative.
const POLARITY_THRESHOLD: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn from_polarity(polarity: f32) -> Self {
        if polarity > POLARITY_THRESHOLD {
            Sentiment::Positive
        } else if polarity < -POLARITY_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        };
        f.write_str(label)
    }
}

/// External polarity model. Returns a score in `-1.0..=1.0`.
pub trait SentimentScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f32;

    fn classify(&self, text: &str) -> Sentiment {
        Sentiment::from_polarity(self.polarity(text))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub ai_reflection: String,
    pub timestamp: String,
}

impl JournalEntry {
    /// New entry stamped with the current local time.
    pub fn new(text: impl Into<String>, ai_reflection: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sentiment: None,
            ai_reflection: ai_reflection.into(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn with_sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = Some(sentiment);
        self
    }
}

/// File-backed list of journal entries, oldest first.
#[derive(Debug, Clone)]
pub struct JournalStore {
    path: PathBuf,
}

impl JournalStore {
    pub fn new(data_dir: impl AsRef<Path>, file_name: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(file_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries. A missing or unreadable file yields an empty list.
    pub fn load(&self) -> Vec<JournalEntry> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Could not read journal {}: {}", self.path.display(), err);
                }
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    "Journal {} is not valid JSON, starting empty: {}",
                    self.path.display(),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Overwrite the file with `entries`, creating the data dir if needed.
    pub fn save(&self, entries: &[JournalEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        debug!("Saved {} journal entries to {}", entries.len(), self.path.display());
        Ok(())
    }

    pub fn append(&self, entry: JournalEntry) -> Result<()> {
        let mut entries = self.load();
        entries.push(entry);
        self.save(&entries)
    }

    /// Up to `limit` most recent entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<JournalEntry> {
        let mut entries = self.load();
        let skip = entries.len().saturating_sub(limit);
        let mut recent = entries.split_off(skip);
        recent.reverse();
        recent
    }
}
