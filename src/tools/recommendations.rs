//! Static wellbeing recommendations plus one personalised model suggestion.

use crate::clients::CompletionClient;
use crate::prompts::daily_suggestion_prompt;

#[derive(Debug, Clone, Copy)]
pub struct RecommendationSection {
    pub title: &'static str,
    pub items: &'static [&'static str],
}

pub const SNAPSHOT: &str = "Small habits compound over time. Choose what resonates today.";

pub static SECTIONS: [RecommendationSection; 7] = [
    RecommendationSection {
        title: "Guided Mindfulness & Meditation Options",
        items: &[
            "Box Breathing",
            "Body Scan Meditation",
            "4-7-8 Breathing",
            "Mindfulness apps: Headspace, Calm, Insight Timer",
        ],
    },
    RecommendationSection {
        title: "Reflective Journaling Prompts",
        items: &[
            "Three things you're grateful for",
            "What brought you peace today?",
            "What challenged you?",
            "One thing you can offer yourself compassion for",
        ],
    },
    RecommendationSection {
        title: "Lifestyle Foundations",
        items: &[
            "20-30 minutes sunlight",
            "Consistent sleep schedule",
            "Hydrate regularly",
            "2-5 minute movement breaks",
        ],
    },
    RecommendationSection {
        title: "Focus & Productivity",
        items: &[
            "Pomodoro (25/5)",
            "Top 3 priorities",
            "Time-blocking",
            "Monotasking over multitasking",
        ],
    },
    RecommendationSection {
        title: "Nutrition & Mood Support",
        items: &[
            "Omega-3 rich foods",
            "Leafy greens & berries",
            "Regular meal timing",
            "Reduce afternoon caffeine",
        ],
    },
    RecommendationSection {
        title: "Sensory Relaxation",
        items: &[
            "Calm playlists",
            "Nature ambience",
            "Light stretching",
            "Warm drink ritual",
        ],
    },
    RecommendationSection {
        title: "Mental Health Resources",
        items: &[
            "Crisis helplines",
            "Therapy directories",
            "Grounding & breathing tools",
        ],
    },
];

pub async fn daily_suggestion(client: &dyn CompletionClient) -> String {
    client.complete_text(&daily_suggestion_prompt()).await
}
