//! Invention generation
//!
//! The model boundary trait, prompt construction, the Gemini client, and
//! the two-phase orchestrator.

pub mod gemini;
pub mod model;
pub mod orchestrator;
pub mod prompt;

pub use gemini::GeminiClient;
pub use model::InventionModel;
pub use orchestrator::{GenerationOrchestrator, Phase, RunHandle, RunProgress};
