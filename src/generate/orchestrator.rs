//! Two-phase generation orchestration
//!
//! A run moves through `Brainstorming` (concept call) into `Visualizing`
//! (image call) and ends at `Complete` or, only for concept failures, at
//! `Error`. The invention is published to observers as soon as the concept
//! arrives, before the image resolves; a failed image call still ends the
//! run at `Complete` with the visual absent.
//!
//! Starting a new run supersedes any run still waiting on its image. The
//! in-flight call is not cancelled (the backend has no cancellation
//! primitive); instead each run carries a generation token and the image
//! result is applied only if its token still matches the orchestrator's
//! current one. A superseded run's handle simply stays at `Visualizing`.

use super::model::InventionModel;
use crate::error::{Error, Result};
use crate::invention::{IdGenerator, Invention, InventionRequest};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

/// Observable phase of one generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No work started yet
    Idle,
    /// Waiting for the text concept
    Brainstorming,
    /// Concept available, waiting for the image
    Visualizing,
    /// Run finished; the invention may or may not carry a visual
    Complete,
    /// Concept generation failed; terminal, no invention exists
    Error,
}

/// Shared progress of one run
#[derive(Debug, Clone)]
pub struct RunProgress {
    /// Current phase
    pub phase: Phase,
    /// The invention, present from the moment the concept arrives
    pub invention: Option<Invention>,
    /// Failure reason, present only in the `Error` phase
    pub error: Option<String>,
}

/// Handle observing one generation run
#[derive(Debug)]
pub struct RunHandle {
    token: u64,
    progress: Arc<RwLock<RunProgress>>,
    phases: watch::Receiver<Phase>,
}

impl RunHandle {
    /// Generation token identifying this run
    pub fn token(&self) -> u64 {
        self.token
    }

    /// Current phase
    pub async fn phase(&self) -> Phase {
        self.progress.read().await.phase
    }

    /// Snapshot of the run's progress
    pub async fn progress(&self) -> RunProgress {
        self.progress.read().await.clone()
    }

    /// The invention, once the concept has arrived
    pub async fn invention(&self) -> Option<Invention> {
        self.progress.read().await.invention.clone()
    }

    /// Failure reason, if the run ended in `Error`
    pub async fn error(&self) -> Option<String> {
        self.progress.read().await.error.clone()
    }

    /// Wait for the next phase change. Returns `None` once no further
    /// changes can arrive (the run's tasks have finished or the run was
    /// superseded and dropped its sender).
    pub async fn changed(&mut self) -> Option<Phase> {
        match self.phases.changed().await {
            Ok(()) => Some(*self.phases.borrow()),
            Err(_) => None,
        }
    }

    /// Wait until the run reaches a resting phase (`Complete` or `Error`).
    ///
    /// A superseded run never reaches one; this returns `None` in that case.
    pub async fn settled(&mut self) -> Option<Phase> {
        loop {
            let current = *self.phases.borrow();
            if matches!(current, Phase::Complete | Phase::Error) {
                return Some(current);
            }
            self.changed().await?;
        }
    }
}

/// Drives two-phase invention generation against a backend model
pub struct GenerationOrchestrator {
    model: Arc<dyn InventionModel>,
    ids: Arc<IdGenerator>,
    current_token: Arc<AtomicU64>,
    next_token: AtomicU64,
}

impl GenerationOrchestrator {
    /// Create an orchestrator over a backend model
    pub fn new(model: Arc<dyn InventionModel>) -> Self {
        Self {
            model,
            ids: Arc::new(IdGenerator::new()),
            current_token: Arc::new(AtomicU64::new(0)),
            next_token: AtomicU64::new(0),
        }
    }

    /// Start a generation run.
    ///
    /// Returns immediately with an observing handle; the concept and visual
    /// calls run on spawned tasks. Any earlier run still waiting on its
    /// image is superseded: its pending result will be discarded when it
    /// eventually resolves.
    pub fn start(&self, request: InventionRequest) -> Result<RunHandle> {
        if request.challenge.trim().is_empty() {
            return Err(Error::Generation(
                "challenge description must not be empty".to_string(),
            ));
        }

        let token = self.next_token.fetch_add(1, Ordering::Relaxed) + 1;
        self.current_token.store(token, Ordering::SeqCst);

        let progress = Arc::new(RwLock::new(RunProgress {
            phase: Phase::Brainstorming,
            invention: None,
            error: None,
        }));
        let (phase_tx, phase_rx) = watch::channel(Phase::Brainstorming);

        let model = self.model.clone();
        let ids = self.ids.clone();
        let current_token = self.current_token.clone();
        let shared = progress.clone();

        tokio::spawn(async move {
            tracing::debug!(token, "Brainstorming invention concept");
            let concept = match model.generate_concept(&request).await {
                Ok(concept) => concept,
                Err(e) => {
                    tracing::warn!(token, "Concept generation failed: {}", e);
                    let mut p = shared.write().await;
                    p.phase = Phase::Error;
                    p.error = Some(e.to_string());
                    let _ = phase_tx.send(Phase::Error);
                    return;
                }
            };

            let (id, created_at) = ids.next();
            let visual_prompt = concept.visual_prompt.clone();
            let mode = request.resource_mode;
            let invention = Invention::new(id.clone(), created_at, concept, request);

            // Publish the text result before the image exists so observers
            // can show it immediately.
            {
                let mut p = shared.write().await;
                p.invention = Some(invention);
                p.phase = Phase::Visualizing;
            }
            let _ = phase_tx.send(Phase::Visualizing);
            tracing::debug!(token, id = %id, "Concept ready, visualizing");

            // The visual call is detached: it keeps running even if the
            // caller moves on, and its result is discarded rather than the
            // call cancelled when a newer run has taken over.
            tokio::spawn(async move {
                let result = model.generate_visual(&visual_prompt, mode).await;

                if current_token.load(Ordering::SeqCst) != token {
                    tracing::debug!(token, "Discarding superseded visual result");
                    return;
                }

                {
                    let mut p = shared.write().await;
                    match result {
                        Ok(visual) => {
                            if let Some(inv) = p.invention.as_mut() {
                                inv.visual = Some(visual);
                            }
                        }
                        Err(e) => {
                            // Non-fatal: the invention stays text-only.
                            tracing::warn!(token, "Visual generation failed: {}", e);
                        }
                    }
                    p.phase = Phase::Complete;
                }
                let _ = phase_tx.send(Phase::Complete);
            });
        });

        Ok(RunHandle {
            token,
            progress,
            phases: phase_rx,
        })
    }
}
