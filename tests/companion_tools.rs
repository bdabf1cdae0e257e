//! Relaxation, recommendation and safety companions with a recording client.

use std::sync::Mutex;

use async_trait::async_trait;
use mindmesh::clients::{CompletionClient, CompletionError};
use mindmesh::tools::relaxation::{SUGGESTABLE_TECHNIQUES, suggest_technique};
use mindmesh::tools::{recommendations, safety};

#[derive(Default)]
struct Recording {
    prompts: Mutex<Vec<String>>,
}

impl Recording {
    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for Recording {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok("reply".into())
    }
}

#[tokio::test]
async fn technique_suggestion_lists_every_technique() {
    let client = Recording::default();
    let reply = suggest_technique(&client, "restless and tense").await;

    assert_eq!(reply.as_deref(), Some("reply"));
    let prompts = client.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("User emotional state: restless and tense"));
    for technique in SUGGESTABLE_TECHNIQUES {
        assert!(prompts[0].contains(&format!("- {}\n", technique)));
    }
}

#[tokio::test]
async fn blank_input_never_calls_the_model() {
    let client = Recording::default();

    assert!(suggest_technique(&client, "  ").await.is_none());
    assert!(safety::supportive_message(&client, "\n").await.is_none());
    assert!(client.prompts().is_empty());
}

#[tokio::test]
async fn supportive_message_embeds_user_text() {
    let client = Recording::default();
    let reply = safety::supportive_message(&client, "I can't switch off at night").await;

    assert_eq!(reply.as_deref(), Some("reply"));
    assert!(client.prompts()[0].contains("User message: I can't switch off at night"));
}

#[tokio::test]
async fn daily_suggestion_passes_reply_through() {
    let client = Recording::default();
    assert_eq!(recommendations::daily_suggestion(&client).await, "reply");
    assert!(client.prompts()[0].contains("wellbeing suggestion"));
}
