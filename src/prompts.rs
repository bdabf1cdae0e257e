//! Prompt templates for the three session roles and the companion tools.
//!
//! Every function here is pure string interpolation: no I/O, no validation.
//! Blank or odd input is passed through verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::profile::{PhysicalActivity, SleepQuality, SocialSupport, UserProfile};

/// The fixed set of generation tasks in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Assessment,
    ActionPlan,
    FollowUp,
}

impl AgentRole {
    /// Execution order.
    pub const ALL: [AgentRole; 3] = [
        AgentRole::Assessment,
        AgentRole::ActionPlan,
        AgentRole::FollowUp,
    ];

    /// Short key used in the flat text map handed to the presentation layer.
    pub fn key(self) -> &'static str {
        match self {
            AgentRole::Assessment => "assessment",
            AgentRole::ActionPlan => "action",
            AgentRole::FollowUp => "follow",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AgentRole::Assessment => "Assessment",
            AgentRole::ActionPlan => "Action Plan",
            AgentRole::FollowUp => "Follow-Up",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Inputs available to [`compose`].
///
/// `assessment` must be set before composing the downstream roles; when it is
/// missing an empty string is interpolated.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub profile: &'a UserProfile,
    pub assessment: Option<&'a str>,
    pub action_plan: Option<&'a str>,
}

impl<'a> PromptContext<'a> {
    pub fn new(profile: &'a UserProfile) -> Self {
        Self {
            profile,
            assessment: None,
            action_plan: None,
        }
    }

    pub fn with_assessment(mut self, assessment: &'a str) -> Self {
        self.assessment = Some(assessment);
        self
    }

    pub fn with_action_plan(mut self, action_plan: &'a str) -> Self {
        self.action_plan = Some(action_plan);
        self
    }
}

/// Build the prompt for `role` from whatever the context carries.
pub fn compose(role: AgentRole, ctx: &PromptContext<'_>) -> String {
    let assessment = ctx.assessment.unwrap_or_default();
    match role {
        AgentRole::Assessment => assessment_prompt(ctx.profile),
        AgentRole::ActionPlan => action_plan_prompt(
            assessment,
            ctx.profile.sleep_quality,
            ctx.profile.physical_activity,
            ctx.profile.social_support,
        ),
        AgentRole::FollowUp => follow_up_prompt(assessment, ctx.action_plan),
    }
}

pub fn assessment_prompt(profile: &UserProfile) -> String {
    format!(
        r#"You are MindMesh, the Assessment Agent.

Create:
- SUMMARY (2-3 sentences)
- AREAS TO EXPLORE (3-6 bullet points)
- RISK CHECK (supportive tone)

BACKGROUND: {}
CONCERNS: {}
GOALS: {}
COPING: {}
SLEEP: {}
ACTIVITY: {}
SUPPORT: {}
"#,
        profile.background,
        profile.concerns,
        profile.goals,
        profile.coping_mechanisms,
        profile.sleep_quality,
        profile.physical_activity,
        profile.social_support,
    )
}

pub fn action_plan_prompt(
    assessment: &str,
    sleep_quality: SleepQuality,
    physical_activity: PhysicalActivity,
    social_support: SocialSupport,
) -> String {
    format!(
        r#"You are MindMesh, the Action Agent.
Create a simple 4-week plan.

Include:
1) Weekly focus
2) Daily micro-actions
3) Self-checkpoints

SLEEP: {}
ACTIVITY: {}
SUPPORT: {}

ASSESSMENT: {}
"#,
        sleep_quality, physical_activity, social_support, assessment
    )
}

/// Without an action plan the ACTION PLAN section is left out entirely rather
/// than sent blank.
pub fn follow_up_prompt(assessment: &str, action_plan: Option<&str>) -> String {
    let plan_section = action_plan
        .map(|plan| format!("ACTION PLAN: {}\n", plan))
        .unwrap_or_default();

    format!(
        r#"You are MindMesh, the Follow-Up Agent.

Create a warm 7-day check-in message with:
- Short check-in
- Encouragement
- Reflective question

ASSESSMENT: {}
{}"#,
        assessment, plan_section
    )
}

pub fn journal_reflection_prompt(entry: &str) -> String {
    format!(
        r#"Provide a gentle reflection for this journal entry:
- 2 sentences supportive tone
- 1 compassionate suggestion
ENTRY: {}
"#,
        entry
    )
}

pub fn relaxation_suggestion_prompt(state: &str, techniques: &[&str]) -> String {
    let listed: String = techniques
        .iter()
        .map(|name| format!("- {}\n", name))
        .collect();

    format!(
        r#"User emotional state: {}
Suggest the most suitable relaxation technique from:
{}Return:
1) Name of technique
2) 1-2 sentence explanation
"#,
        state, listed
    )
}

pub fn daily_suggestion_prompt() -> String {
    "Give one personalized wellbeing suggestion.\nKeep it calm, friendly, 1-2 sentences.\n"
        .to_string()
}

pub fn supportive_message_prompt(text: &str) -> String {
    format!(
        r#"User message: {}
Respond with:
- Empathy (2-3 sentences)
- Validation
- Gentle encouragement for seeking support if needed
Avoid medical language.
"#,
        text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            background: "Nurse on night shifts".into(),
            concerns: "Feeling flat".into(),
            goals: "Reconnect with friends".into(),
            coping_mechanisms: "Long walks".into(),
            sleep_quality: SleepQuality::Average,
            physical_activity: PhysicalActivity::Weekly,
            social_support: SocialSupport::Weak,
        }
    }

    #[test]
    fn assessment_lists_every_field() {
        let prompt = assessment_prompt(&profile());
        for needle in [
            "Assessment Agent",
            "BACKGROUND: Nurse on night shifts",
            "CONCERNS: Feeling flat",
            "GOALS: Reconnect with friends",
            "COPING: Long walks",
            "SLEEP: Average",
            "ACTIVITY: Weekly",
            "SUPPORT: Weak",
            "AREAS TO EXPLORE (3-6 bullet points)",
        ] {
            assert!(prompt.contains(needle), "missing {needle:?} in {prompt}");
        }
    }

    #[test]
    fn downstream_prompts_embed_assessment_verbatim() {
        let assessment = "Summary:\n  mixed   spacing & symbols <ok>";
        let p = profile();
        let ctx = PromptContext::new(&p).with_assessment(assessment);
        assert!(compose(AgentRole::ActionPlan, &ctx).contains(assessment));
        assert!(compose(AgentRole::FollowUp, &ctx).contains(assessment));
    }

    #[test]
    fn only_assessment_prompt_names_the_assessment_agent() {
        let p = profile();
        let ctx = PromptContext::new(&p).with_assessment("x");
        assert!(compose(AgentRole::Assessment, &ctx).contains("Assessment Agent"));
        assert!(!compose(AgentRole::ActionPlan, &ctx).contains("Assessment Agent"));
        assert!(!compose(AgentRole::FollowUp, &ctx).contains("Assessment Agent"));
    }

    #[test]
    fn follow_up_plan_section_is_optional() {
        let without = follow_up_prompt("A", None);
        assert!(!without.contains("ACTION PLAN"));

        let with = follow_up_prompt("A", Some("Week 1: rest"));
        assert!(with.contains("ACTION PLAN: Week 1: rest"));
    }

    #[test]
    fn blank_fields_pass_through() {
        let mut p = profile();
        p.background.clear();
        assert!(assessment_prompt(&p).contains("BACKGROUND: \n"));
    }

    #[test]
    fn composition_is_deterministic() {
        let p = profile();
        let ctx = PromptContext::new(&p).with_assessment("same");
        for role in AgentRole::ALL {
            assert_eq!(compose(role, &ctx), compose(role, &ctx));
        }
    }

    #[test]
    fn relaxation_prompt_lists_techniques() {
        let prompt = relaxation_suggestion_prompt("tense", &["Box Breathing", "Thought Labeling"]);
        assert!(prompt.contains("User emotional state: tense"));
        assert!(prompt.contains("- Box Breathing\n- Thought Labeling\n"));
    }

    #[test]
    fn role_keys_match_text_map() {
        let keys: Vec<_> = AgentRole::ALL.iter().map(|r| r.key()).collect();
        assert_eq!(keys, ["assessment", "action", "follow"]);
    }
}
