//! LLM module - model-completion integrations
//!
//! Provides the provider abstraction the agent loop calls into, plus an
//! OpenAI-compatible HTTP implementation.

pub mod chat_completions;
pub mod traits;

pub use chat_completions::ChatCompletionsClient;
pub use traits::{
    Choice, CompletionProvider, CompletionRequest, CompletionResponse, ResponseMessage,
    TokenUsage,
};
