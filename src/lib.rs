//! Tacklesmith - AI-assisted carp fishing invention lab
//!
//! Tacklesmith turns a free-text fishing problem into an AI-generated
//! "invention": a structured text concept plus an illustrative image, kept
//! in a durable personal gallery on the user's machine.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                         CLI (main)                        │
//! └───────────────┬──────────────────────────┬────────────────┘
//!                 │                          │
//! ┌───────────────▼──────────────┐  ┌────────▼────────────────┐
//! │   GenerationOrchestrator     │  │      GalleryStore       │
//! │  Brainstorming → Visualizing │  │  load / commit / remove │
//! │  → Complete (or Error)       │  │  degradation cascade    │
//! │  token-guarded supersede     │  │  snapshot import/export │
//! └───────────────┬──────────────┘  └────────┬────────────────┘
//!                 │                          │
//! ┌───────────────▼──────────────┐  ┌────────▼────────────────┐
//! │  InventionModel (boundary)   │  │  StorageBackend (seam)  │
//! │  GeminiClient over reqwest   │  │  file / in-memory       │
//! └──────────────────────────────┘  └─────────────────────────┘
//! ```
//!
//! Generation is two-phase: the concept call is fatal on failure, the image
//! call is not (the invention simply stays text-only). An invention becomes
//! durable only when explicitly committed to the gallery, which strips image
//! payloads in staged fashion if storage capacity runs out.
//!
//! ## Modules
//!
//! - [`invention`]: record types and the monotonic id generator
//! - [`generate`]: model boundary, prompts, and the run orchestrator
//! - [`gallery`]: durable store, degradation cascade, snapshot import/export
//! - [`config`]: configuration management

pub mod config;
pub mod error;
pub mod gallery;
pub mod generate;
pub mod invention;

pub use config::TacklesmithConfig;
pub use error::{Error, Result};
