//! Concrete model capabilities

mod gemini;

pub use gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiConfig, GeminiModel};
