//! Invention data model
//!
//! Record types shared by the generation pipeline and the gallery store,
//! plus the monotonic id generator.

pub mod id;
pub mod types;

pub use id::IdGenerator;
pub use types::{
    Concept, Invention, InventionRequest, ResourceMode, VisualPayload, WeatherSnapshot,
};
