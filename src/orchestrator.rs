//! Three-role session pipeline.
//!
//! ```text
//! UserProfile
//!     ↓
//! [Assessment]                 (awaited on its own)
//!     ↓ outcome text
//! [Action Plan] ∥ [Follow-Up]  (joined; each fills its own slot)
//!     ↓
//! SessionResults
//! ```
//!
//! Failures never abort a session: a failed call is stored as failure text and
//! fed to the downstream prompts like any other assessment.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clients::{CompletionClient, CompletionError, CompletionOutcome};
use crate::config::{FollowUpMode, SessionConfig};
use crate::error::{MindMeshError, Result};
use crate::profile::UserProfile;
use crate::prompts::{AgentRole, PromptContext, compose};

/// Outcome of one role's completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResult {
    pub role: AgentRole,
    pub outcome: CompletionOutcome,
    pub elapsed_ms: u64,
}

/// Where a session is in its lifecycle. There is no error phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    AssessmentPending,
    AssessmentDone,
    FanOutPending,
    AllDone,
}

/// One slot per role, reserved up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResults {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    assessment: Option<CompletionResult>,
    action_plan: Option<CompletionResult>,
    follow_up: Option<CompletionResult>,
}

impl Default for SessionResults {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionResults {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            assessment: None,
            action_plan: None,
            follow_up: None,
        }
    }

    fn slot_mut(&mut self, role: AgentRole) -> &mut Option<CompletionResult> {
        match role {
            AgentRole::Assessment => &mut self.assessment,
            AgentRole::ActionPlan => &mut self.action_plan,
            AgentRole::FollowUp => &mut self.follow_up,
        }
    }

    /// Store `result` under its own role; a second write for the same role replaces the first.
    pub fn record(&mut self, result: CompletionResult) {
        let role = result.role;
        *self.slot_mut(role) = Some(result);
    }

    pub fn get(&self, role: AgentRole) -> Option<&CompletionResult> {
        match role {
            AgentRole::Assessment => self.assessment.as_ref(),
            AgentRole::ActionPlan => self.action_plan.as_ref(),
            AgentRole::FollowUp => self.follow_up.as_ref(),
        }
    }

    pub fn text(&self, role: AgentRole) -> Option<&str> {
        self.get(role).map(|r| r.outcome.text())
    }

    pub fn is_complete(&self) -> bool {
        AgentRole::ALL.iter().all(|role| self.get(*role).is_some())
    }

    /// Phase derived from which slots are filled.
    ///
    /// Only `Idle`, `AssessmentDone` and `AllDone` are derivable from a
    /// record; the two pending phases exist while a call is in flight inside
    /// [`SessionOrchestrator::run_session`] and appear in its debug log only.
    pub fn phase(&self) -> SessionPhase {
        match (
            self.assessment.is_some(),
            self.action_plan.is_some() && self.follow_up.is_some(),
        ) {
            (false, _) => SessionPhase::Idle,
            (true, false) => SessionPhase::AssessmentDone,
            (true, true) => SessionPhase::AllDone,
        }
    }

    /// Filled slots in role order.
    pub fn iter(&self) -> impl Iterator<Item = &CompletionResult> {
        AgentRole::ALL.into_iter().filter_map(move |role| self.get(role))
    }

    /// Flat `{assessment, action, follow}` text map for callers that only render text.
    pub fn to_text_map(&self) -> BTreeMap<&'static str, String> {
        AgentRole::ALL
            .into_iter()
            .map(|role| (role.key(), self.text(role).unwrap_or_default().to_string()))
            .collect()
    }
}

/// Runs the assessment, action-plan and follow-up roles against one client.
pub struct SessionOrchestrator {
    client: Arc<dyn CompletionClient>,
    config: SessionConfig,
}

impl SessionOrchestrator {
    pub fn new(client: Arc<dyn CompletionClient>, config: SessionConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    async fn call(&self, role: AgentRole, prompt: String) -> CompletionResult {
        let started = Instant::now();
        debug!("Submitting {} prompt ({} chars)", role, prompt.len());

        let result = match self.config.call_timeout_ms {
            Some(timeout_ms) => tokio::time::timeout(
                Duration::from_millis(timeout_ms),
                self.client.complete(&prompt),
            )
            .await
            .unwrap_or(Err(CompletionError::Timeout { timeout_ms })),
            None => self.client.complete(&prompt).await,
        };

        if let Err(err) = &result {
            warn!("{} completion failed: {}", role, err);
        }

        CompletionResult {
            role,
            outcome: CompletionOutcome::from(result),
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// Run all three roles and return once every slot is filled.
    pub async fn run_session(&self, profile: &UserProfile) -> SessionResults {
        let mut results = SessionResults::new();
        let session_id = results.session_id;
        info!(
            "Starting session {} (follow-up mode: {})",
            session_id, self.config.follow_up_mode
        );

        debug!("Session {}: {:?}", session_id, SessionPhase::AssessmentPending);
        let ctx = PromptContext::new(profile);
        let assessment = self
            .call(AgentRole::Assessment, compose(AgentRole::Assessment, &ctx))
            .await;
        let assessment_text = assessment.outcome.text().to_string();
        results.record(assessment);
        debug!("Session {}: {:?}", session_id, results.phase());

        // Assessment outcome is recorded before either downstream prompt exists.
        let ctx = ctx.with_assessment(&assessment_text);
        debug!("Session {}: {:?}", session_id, SessionPhase::FanOutPending);
        let (action_plan, follow_up) = match self.config.follow_up_mode {
            FollowUpMode::Concurrent => {
                tokio::join!(
                    self.call(AgentRole::ActionPlan, compose(AgentRole::ActionPlan, &ctx)),
                    self.call(AgentRole::FollowUp, compose(AgentRole::FollowUp, &ctx)),
                )
            }
            FollowUpMode::Chained => {
                let action_plan = self
                    .call(AgentRole::ActionPlan, compose(AgentRole::ActionPlan, &ctx))
                    .await;
                let follow_ctx = ctx.with_action_plan(action_plan.outcome.text());
                let follow_up = self
                    .call(AgentRole::FollowUp, compose(AgentRole::FollowUp, &follow_ctx))
                    .await;
                (action_plan, follow_up)
            }
        };
        results.record(action_plan);
        results.record(follow_up);
        results.finished_at = Some(Utc::now());

        info!(
            "Session {} finished: {:?} ({} of 3 succeeded)",
            session_id,
            results.phase(),
            results.iter().filter(|r| r.outcome.is_success()).count()
        );
        results
    }

    /// Blocking entry point for callers without an async runtime.
    ///
    /// Spins up a dedicated multi-thread runtime sized by
    /// `SessionConfig::worker_threads`. Must not be called from inside a tokio
    /// runtime.
    pub fn run_session_blocking(&self, profile: &UserProfile) -> Result<SessionResults> {
        if self.config.worker_threads < 2 {
            return Err(MindMeshError::Config {
                message: format!(
                    "session.worker_threads must be at least 2 (got {})",
                    self.config.worker_threads
                ),
            });
        }
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .thread_name("mindmesh-worker")
            .enable_all()
            .build()
            .map_err(|e| MindMeshError::Internal {
                message: format!("Failed to start session runtime: {}", e),
            })?;
        Ok(runtime.block_on(self.run_session(profile)))
    }
}
