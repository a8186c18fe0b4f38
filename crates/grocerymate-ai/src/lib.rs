//! GroceryMate AI - LLM integration for recipe suggestions
//!
//! This crate provides:
//! - Prompt building from a user's inventory
//! - LLM API client (Gemini with model fallback, OpenAI, Anthropic)
//! - Bounded retry with doubling delay around every upstream call
//! - Parsing and validation of generated recipes

pub mod assistant;
pub mod client;
pub mod error;
pub mod prompt;
pub mod retry;

pub use assistant::RecipeAssistant;
pub use client::{LlmClient, LlmProvider, ResponseFormat};
pub use error::AiError;
pub use retry::RetryPolicy;
