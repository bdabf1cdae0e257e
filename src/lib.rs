//! # MindMesh
//!
//! Mental-wellbeing assistant core: three model roles (assessment, action
//! plan, follow-up) orchestrated over one injected completion client, plus the
//! journal, relaxation, recommendation and safety companions.

pub mod clients;
pub mod config;
pub mod error;
pub mod journal;
pub mod orchestrator;
pub mod profile;
pub mod prompts;
pub mod tools;

pub use clients::{CompletionClient, CompletionError, CompletionOutcome, OpenAiClient};
pub use config::{Config, FollowUpMode, SessionConfig};
pub use error::{MindMeshError, Result};
pub use orchestrator::{CompletionResult, SessionOrchestrator, SessionPhase, SessionResults};
pub use profile::{PhysicalActivity, SleepQuality, SocialSupport, UserProfile};
pub use prompts::AgentRole;
