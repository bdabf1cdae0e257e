//! Structured user input collected by the presentation layer.
//!
//! A [`UserProfile`] lives for exactly one session request. Nothing in the
//! core persists it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {field} value '{value}' (expected one of: {expected})")]
pub struct ParseChoiceError {
    pub field: &'static str,
    pub value: String,
    pub expected: String,
}

/// Lowercase and collapse `-`/`_`/space so "Somewhat strong", "somewhat-strong"
/// and "SOMEWHAT_STRONG" compare equal.
fn normalize_choice(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Label exactly as shown to the user and embedded in prompts.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = ParseChoiceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize_choice(s);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| normalize_choice(v.label()) == wanted)
                    .ok_or_else(|| ParseChoiceError {
                        field: $field,
                        value: s.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|v| v.label())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

choice_enum! {
    /// Self-reported sleep quality
    SleepQuality, "sleep quality" {
        Good => "Good",
        Average => "Average",
        Poor => "Poor",
    }
}

choice_enum! {
    /// How often the user is physically active
    PhysicalActivity, "physical activity" {
        Daily => "Daily",
        Weekly => "Weekly",
        Rarely => "Rarely",
        Never => "Never",
    }
}

choice_enum! {
    /// Perceived strength of the user's social support network
    SocialSupport, "social support" {
        Strong => "Strong",
        SomewhatStrong => "Somewhat strong",
        Weak => "Weak",
        NoSupport => "No support",
    }
}

/// Everything the assessment role needs to know about the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub background: String,
    pub concerns: String,
    pub goals: String,
    #[serde(default)]
    pub coping_mechanisms: String,
    pub sleep_quality: SleepQuality,
    pub physical_activity: PhysicalActivity,
    pub social_support: SocialSupport,
}

impl UserProfile {
    /// Names of the free-text fields the form requires but left blank.
    ///
    /// Coping mechanisms are optional. The prompt composer never calls this;
    /// the presentation layer decides whether to run a session at all.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        [
            ("background", &self.background),
            ("concerns", &self.concerns),
            ("goals", &self.goals),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            background: "Grad student".into(),
            concerns: "Deadlines".into(),
            goals: "Sleep more".into(),
            coping_mechanisms: String::new(),
            sleep_quality: SleepQuality::Poor,
            physical_activity: PhysicalActivity::Rarely,
            social_support: SocialSupport::SomewhatStrong,
        }
    }

    #[test]
    fn labels_match_form_choices() {
        assert_eq!(SocialSupport::SomewhatStrong.to_string(), "Somewhat strong");
        assert_eq!(SocialSupport::NoSupport.to_string(), "No support");
        assert_eq!(PhysicalActivity::ALL.len(), 4);
    }

    #[test]
    fn parses_loose_spellings() {
        assert_eq!(
            "somewhat-strong".parse::<SocialSupport>().unwrap(),
            SocialSupport::SomewhatStrong
        );
        assert_eq!(
            "NO_SUPPORT".parse::<SocialSupport>().unwrap(),
            SocialSupport::NoSupport
        );
        assert_eq!(" poor ".parse::<SleepQuality>().unwrap(), SleepQuality::Poor);
    }

    #[test]
    fn rejects_unknown_choice() {
        let err = "sometimes".parse::<PhysicalActivity>().unwrap_err();
        assert_eq!(err.field, "physical activity");
        assert!(err.to_string().contains("Daily, Weekly, Rarely, Never"));
    }

    #[test]
    fn serde_uses_display_labels() {
        let json = serde_json::to_value(profile()).unwrap();
        assert_eq!(json["social_support"], "Somewhat strong");
        let back: UserProfile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile());
    }

    #[test]
    fn reports_blank_required_fields() {
        let mut p = profile();
        assert!(p.missing_required_fields().is_empty());
        p.concerns = "   ".into();
        p.goals.clear();
        assert_eq!(p.missing_required_fields(), vec!["concerns", "goals"]);
    }
}
