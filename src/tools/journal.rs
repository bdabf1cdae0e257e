//! Safe-space journal: reflect on an entry with the model, then persist it.

use tracing::info;

use crate::clients::CompletionClient;
use crate::error::{MindMeshError, Result};
use crate::journal::{JournalEntry, JournalStore, SentimentScorer};
use crate::prompts::journal_reflection_prompt;

/// Reflect on `text`, score it when a scorer is given, and append it to `store`.
///
/// A failed reflection is stored as its failure text, same as in a session.
pub async fn write_entry(
    client: &dyn CompletionClient,
    store: &JournalStore,
    scorer: Option<&dyn SentimentScorer>,
    text: &str,
) -> Result<JournalEntry> {
    if text.trim().is_empty() {
        return Err(MindMeshError::Validation {
            message: "journal entry cannot be empty".into(),
        });
    }

    let reflection = client
        .complete_text(&journal_reflection_prompt(text))
        .await;

    let mut entry = JournalEntry::new(text, reflection);
    if let Some(scorer) = scorer {
        entry = entry.with_sentiment(scorer.classify(text));
    }

    store.append(entry.clone())?;
    info!("Journal entry saved to {}", store.path().display());
    Ok(entry)
}
