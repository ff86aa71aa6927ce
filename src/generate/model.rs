//! Generation backend boundary
//!
//! The orchestrator treats the model as a black box behind this trait: one
//! call producing a structured text concept, one producing an image. Both
//! may fail; only the concept failure is fatal to a run.

use crate::error::Result;
use crate::invention::{Concept, InventionRequest, ResourceMode, VisualPayload};
use async_trait::async_trait;

/// The two-operation generation backend
#[async_trait]
pub trait InventionModel: Send + Sync {
    /// Generate the text concept for a request
    async fn generate_concept(&self, request: &InventionRequest) -> Result<Concept>;

    /// Generate a concept image from the concept's visual prompt
    async fn generate_visual(&self, prompt: &str, mode: ResourceMode) -> Result<VisualPayload>;
}
