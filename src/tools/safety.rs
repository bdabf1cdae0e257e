//! Safety and support panel content, plus an optional supportive reply.

use crate::clients::CompletionClient;
use crate::prompts::supportive_message_prompt;

pub const DISCLAIMER: &str = "MindMesh supports grounding and reflection, but does not replace \
professional mental-health care.";

pub const ENCOURAGEMENT: &str =
    "You deserve support. Speaking with a professional can make a difference.";

#[derive(Debug, Clone, Copy)]
pub struct CrisisContact {
    pub label: &'static str,
    pub detail: &'static str,
    pub caption: &'static str,
}

pub static CRISIS_CONTACTS: [CrisisContact; 3] = [
    CrisisContact {
        label: "Emergency Services (Local)",
        detail: "Call your local emergency number: 112 (India) / 911 (US)",
        caption: "For immediate danger.",
    },
    CrisisContact {
        label: "Suicide & Crisis Helpline",
        detail: "India: 9152987821 (AASRA) | US: 988 (Suicide & Crisis Lifeline)",
        caption: "24/7 crisis professionals.",
    },
    CrisisContact {
        label: "Trusted Contact",
        detail: "Reach out to a trusted friend, family member, or counselor.",
        caption: "Talk to someone supportive.",
    },
];

pub static WARNING_SIGNS: [&str; 4] = [
    "Persistent sadness or anxiety",
    "Trouble sleeping or functioning",
    "Panic or intrusive thoughts",
    "Thoughts of harming yourself",
];

pub static GROUNDING_RESOURCES: [&str; 4] = [
    "5-4-3-2-1 grounding",
    "Slow breathing",
    "Progressive muscle relaxation",
    "Safe-place visualization",
];

/// Empathetic reply to `text`. Blank text asks nothing.
pub async fn supportive_message(client: &dyn CompletionClient, text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    Some(client.complete_text(&supportive_message_prompt(text)).await)
}
