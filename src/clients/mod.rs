pub mod openai;
pub mod traits;

pub use openai::OpenAiClient;
pub use traits::{
    CompletionClient, CompletionError, CompletionOutcome, FAILURE_MARKER, is_failure_text,
};
