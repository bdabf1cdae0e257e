//! Relaxation hub: paced breathing patterns, mind-relaxation exercises and an
//! AI technique suggestion.

use std::fmt;
use std::time::Duration;

use crate::clients::CompletionClient;
use crate::prompts::relaxation_suggestion_prompt;

pub const DEFAULT_CYCLES: usize = 3;

/// Techniques the model may pick from.
pub const SUGGESTABLE_TECHNIQUES: [&str; 6] = [
    "Box Breathing",
    "4-7-8 Breathing",
    "Progressive Muscle Relaxation",
    "Safe Place Visualization",
    "Thought Labeling",
    "Cognitive Defusion",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreathingPattern {
    pub slug: &'static str,
    pub name: &'static str,
    pub inhale_secs: f32,
    pub hold_secs: f32,
    pub exhale_secs: f32,
    pub hold_after_secs: f32,
}

pub static BREATHING_PATTERNS: [BreathingPattern; 5] = [
    BreathingPattern {
        slug: "box",
        name: "Box Breathing (4-in / 4-hold / 4-out / 4-hold)",
        inhale_secs: 4.0,
        hold_secs: 4.0,
        exhale_secs: 4.0,
        hold_after_secs: 4.0,
    },
    BreathingPattern {
        slug: "4-7-8",
        name: "4-7-8 Relaxation Breath",
        inhale_secs: 4.0,
        hold_secs: 7.0,
        exhale_secs: 8.0,
        hold_after_secs: 0.0,
    },
    BreathingPattern {
        slug: "pursed-lip",
        name: "Pursed-Lip Breathing (4-in / 6-out)",
        inhale_secs: 4.0,
        hold_secs: 0.0,
        exhale_secs: 6.0,
        hold_after_secs: 0.0,
    },
    BreathingPattern {
        slug: "coherence",
        name: "Coherence Breathing (5.5-in / 5.5-out)",
        inhale_secs: 5.5,
        hold_secs: 0.0,
        exhale_secs: 5.5,
        hold_after_secs: 0.0,
    },
    BreathingPattern {
        slug: "triangle",
        name: "Triangle Breathing (4-in / 4-hold / 6-out)",
        inhale_secs: 4.0,
        hold_secs: 4.0,
        exhale_secs: 6.0,
        hold_after_secs: 0.0,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreathAction {
    Inhale,
    Hold,
    Exhale,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreathPhase {
    pub action: BreathAction,
    pub seconds: f32,
}

impl BreathPhase {
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f32(self.seconds)
    }
}

impl fmt::Display for BreathPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cue = match self.action {
            BreathAction::Inhale => "Breathe in...",
            BreathAction::Hold => "Hold...",
            BreathAction::Exhale => "Breathe out...",
        };
        write!(f, "{} ({}s)", cue, self.seconds)
    }
}

impl BreathingPattern {
    /// Look up by slug, or by a case-insensitive prefix of the display name.
    pub fn find(query: &str) -> Option<&'static BreathingPattern> {
        let query = query.trim().to_lowercase();
        BREATHING_PATTERNS
            .iter()
            .find(|p| p.slug == query)
            .or_else(|| {
                BREATHING_PATTERNS
                    .iter()
                    .find(|p| p.name.to_lowercase().starts_with(&query))
            })
    }

    /// One cycle; zero-length holds are skipped.
    pub fn cycle(&self) -> Vec<BreathPhase> {
        [
            (BreathAction::Inhale, self.inhale_secs),
            (BreathAction::Hold, self.hold_secs),
            (BreathAction::Exhale, self.exhale_secs),
            (BreathAction::Hold, self.hold_after_secs),
        ]
        .into_iter()
        .filter(|(_, seconds)| *seconds > 0.0)
        .map(|(action, seconds)| BreathPhase { action, seconds })
        .collect()
    }

    pub fn phases(&self, cycles: usize) -> Vec<BreathPhase> {
        let cycle = self.cycle();
        std::iter::repeat_n(cycle, cycles).flatten().collect()
    }

    pub fn total_duration(&self, cycles: usize) -> Duration {
        self.phases(cycles).iter().map(BreathPhase::duration).sum()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RelaxationExercise {
    pub slug: &'static str,
    pub title: &'static str,
    pub intro: &'static str,
    pub steps: &'static [&'static str],
    pub closing: &'static str,
}

pub static RELAXATION_EXERCISES: [RelaxationExercise; 6] = [
    RelaxationExercise {
        slug: "pmr",
        title: "Progressive Muscle Relaxation",
        intro: "Slowly tense each muscle group for 4 seconds, then release:",
        steps: &[
            "Hands: clench and let go",
            "Shoulders: raise, then drop",
            "Face: tighten, then soften",
            "Stomach: tighten, then relax",
            "Legs: press down, then release",
        ],
        closing: "Notice the warmth and heaviness.",
    },
    RelaxationExercise {
        slug: "safe-place",
        title: "Safe Place Visualization",
        intro: "Imagine a peaceful space:",
        steps: &["Quiet forest", "Warm beach", "Soft room"],
        closing: "Add sensory details and stay there for 20-30 seconds.",
    },
    RelaxationExercise {
        slug: "defusion",
        title: "Cognitive Defusion (Unhooking)",
        intro: "When a difficult thought appears, say:",
        steps: &["\"I am noticing the thought that...\""],
        closing: "Let it drift by gently.",
    },
    RelaxationExercise {
        slug: "labeling",
        title: "Thought Labeling",
        intro: "Label thoughts as they appear:",
        steps: &[
            "\"This is worry.\"",
            "\"This is planning.\"",
            "\"This is imagining.\"",
            "\"This is fear.\"",
        ],
        closing: "Label, observe, release.",
    },
    RelaxationExercise {
        slug: "five-breath",
        title: "5-Breath Reset",
        intro: "With each breath release tension:",
        steps: &["Shoulders", "Jaw", "Hands", "Stomach", "Ground feet"],
        closing: "",
    },
    RelaxationExercise {
        slug: "color-tracing",
        title: "Color Tracing Exercise",
        intro: "Pick a color around you.",
        steps: &[],
        closing: "Notice 5 objects in that color and observe their textures and shapes.",
    },
];

impl RelaxationExercise {
    pub fn find(query: &str) -> Option<&'static RelaxationExercise> {
        let query = query.trim().to_lowercase();
        RELAXATION_EXERCISES
            .iter()
            .find(|e| e.slug == query || e.title.to_lowercase().starts_with(&query))
    }
}

impl fmt::Display for RelaxationExercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.intro)?;
        for (i, step) in self.steps.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, step)?;
        }
        if !self.closing.is_empty() {
            writeln!(f, "{}", self.closing)?;
        }
        Ok(())
    }
}

/// Ask the model which technique fits `state`. Blank state asks nothing.
pub async fn suggest_technique(client: &dyn CompletionClient, state: &str) -> Option<String> {
    if state.trim().is_empty() {
        return None;
    }
    Some(
        client
            .complete_text(&relaxation_suggestion_prompt(state, &SUGGESTABLE_TECHNIQUES))
            .await,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_holds_are_skipped() {
        let pursed = BreathingPattern::find("pursed-lip").unwrap();
        let actions: Vec<_> = pursed.cycle().iter().map(|p| p.action).collect();
        assert_eq!(actions, [BreathAction::Inhale, BreathAction::Exhale]);

        let boxed = BreathingPattern::find("box").unwrap();
        assert_eq!(boxed.cycle().len(), 4);
    }

    #[test]
    fn phases_repeat_per_cycle() {
        let triangle = BreathingPattern::find("triangle").unwrap();
        let phases = triangle.phases(DEFAULT_CYCLES);
        assert_eq!(phases.len(), 9);
        assert_eq!(phases[3], phases[0]);
        assert_eq!(triangle.total_duration(DEFAULT_CYCLES), Duration::from_secs(42));
    }

    #[test]
    fn find_by_name_prefix() {
        let coherence = BreathingPattern::find("Coherence").unwrap();
        assert_eq!(coherence.inhale_secs, 5.5);
        assert!(BreathingPattern::find("nonexistent").is_none());
    }

    #[test]
    fn phase_cue_text() {
        let phase = BreathPhase {
            action: BreathAction::Inhale,
            seconds: 5.5,
        };
        assert_eq!(phase.to_string(), "Breathe in... (5.5s)");
    }

    #[test]
    fn exercise_lookup_and_render() {
        let pmr = RelaxationExercise::find("progressive").unwrap();
        let text = pmr.to_string();
        assert!(text.starts_with("Progressive Muscle Relaxation\n"));
        assert!(text.contains("  5. Legs: press down, then release\n"));
        assert!(RelaxationExercise::find("color-tracing").is_some());
    }
}
