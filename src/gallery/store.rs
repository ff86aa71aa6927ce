//! Durable gallery store with staged degradation on capacity exhaustion
//!
//! The whole collection persists as one JSON document, newest invention
//! first. When a write runs out of space the store recovers by stripping
//! image payloads in strictly increasing order of aggressiveness, stopping
//! at the first stage that fits:
//!
//! 1. strip the visual from the newest record only,
//! 2. strip the visual from every record,
//! 3. give up: durable bytes stay untouched and `StorageFull` is returned.
//!
//! Textual concept data is never discarded by this mechanism; full record
//! deletion happens only through [`GalleryStore::remove`].

use super::backend::{StorageBackend, WriteError};
use crate::error::{Error, Result};
use crate::invention::Invention;
use std::sync::Arc;
use tokio::sync::RwLock;

/// What the degradation cascade had to do to make a commit fit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradationNotice {
    /// Only the newly committed invention lost its image
    NewestVisualStripped,
    /// Every invention in the collection lost its image
    AllVisualsStripped,
}

/// Outcome of a successful commit or import
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    /// The collection state that was actually persisted; may differ from
    /// what was requested if degradation occurred
    pub collection: Vec<Invention>,
    /// Set when a degradation stage had to run
    pub notice: Option<DegradationNotice>,
}

/// Durable store for the invention gallery
pub struct GalleryStore {
    backend: Arc<dyn StorageBackend>,
    collection: RwLock<Vec<Invention>>,
}

impl GalleryStore {
    /// Open a store over the given backend, loading whatever is already
    /// persisted. Corrupt or missing durable data yields an empty
    /// collection; opening never fails on bad contents.
    pub fn open(backend: Arc<dyn StorageBackend>) -> Self {
        let collection = match backend.read() {
            Ok(Some(data)) => match serde_json::from_str::<Vec<Invention>>(&data) {
                Ok(list) => list,
                Err(e) => {
                    tracing::warn!("Stored gallery is corrupt, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read stored gallery, starting empty: {}", e);
                Vec::new()
            }
        };

        Self {
            backend,
            collection: RwLock::new(collection),
        }
    }

    /// Snapshot of the current collection, newest first
    pub async fn load(&self) -> Vec<Invention> {
        self.collection.read().await.clone()
    }

    /// Number of saved inventions
    pub async fn len(&self) -> usize {
        self.collection.read().await.len()
    }

    /// Whether the gallery is empty
    pub async fn is_empty(&self) -> bool {
        self.collection.read().await.is_empty()
    }

    /// Durably save an invention at the front of the collection.
    ///
    /// Inserting an id that already exists is a no-op (the existing record
    /// wins; no duplicate, no reorder). On capacity exhaustion the
    /// degradation cascade runs; the returned outcome carries the collection
    /// that was actually persisted plus a notice describing any data loss.
    pub async fn commit(&self, invention: Invention) -> Result<CommitOutcome> {
        let mut collection = self.collection.write().await;

        if collection.iter().any(|inv| inv.id == invention.id) {
            return Ok(CommitOutcome {
                collection: collection.clone(),
                notice: None,
            });
        }

        let mut candidate = Vec::with_capacity(collection.len() + 1);
        candidate.push(invention);
        candidate.extend(collection.iter().cloned());

        match self.persist_with_degradation(candidate) {
            Ok(outcome) => {
                *collection = outcome.collection.clone();
                Ok(outcome)
            }
            Err((best_effort, e)) => {
                // Durable storage is unchanged, but keep the commit in the
                // in-memory view so the caller does not silently lose the
                // invention it just asked to save.
                *collection = best_effort;
                Err(e)
            }
        }
    }

    /// Delete an invention by id and persist the shrunken collection.
    /// Never triggers degradation. Returns the new collection state.
    pub async fn remove(&self, id: &str) -> Result<Vec<Invention>> {
        let mut collection = self.collection.write().await;
        let before = collection.len();
        let remaining: Vec<Invention> = collection
            .iter()
            .filter(|inv| inv.id != id)
            .cloned()
            .collect();

        if remaining.len() == before {
            return Ok(collection.clone());
        }

        self.persist(&remaining).map_err(|e| match e {
            WriteError::CapacityExceeded => {
                Error::StorageFull("removal write exceeded capacity".to_string())
            }
            WriteError::Io(io) => Error::Io(io),
        })?;
        *collection = remaining.clone();
        tracing::info!(id = %id, "Removed invention from gallery");
        Ok(remaining)
    }

    /// Replace the whole collection through the degradation-aware persistence
    /// path. Used by snapshot import, where a large backup can overflow
    /// capacity just like a single commit.
    pub async fn replace(&self, merged: Vec<Invention>) -> Result<CommitOutcome> {
        let mut collection = self.collection.write().await;
        match self.persist_with_degradation(merged) {
            Ok(outcome) => {
                *collection = outcome.collection.clone();
                Ok(outcome)
            }
            Err((best_effort, e)) => {
                *collection = best_effort;
                Err(e)
            }
        }
    }

    /// Try persisting `candidate`; on capacity failure walk the cascade.
    /// On total failure returns the unpersisted candidate alongside the
    /// error so callers can keep a best-effort in-memory view.
    fn persist_with_degradation(
        &self,
        candidate: Vec<Invention>,
    ) -> std::result::Result<CommitOutcome, (Vec<Invention>, Error)> {
        match self.persist(&candidate) {
            Ok(()) => {
                return Ok(CommitOutcome {
                    collection: candidate,
                    notice: None,
                })
            }
            Err(WriteError::Io(e)) => return Err((candidate, Error::Io(e))),
            Err(WriteError::CapacityExceeded) => {}
        }

        // Stage 1: strip the newest record's visual only
        if candidate.first().map(Invention::has_visual).unwrap_or(false) {
            let mut stage = candidate.clone();
            stage[0].strip_visual();
            match self.persist(&stage) {
                Ok(()) => {
                    tracing::warn!(
                        "Gallery capacity reached; newest invention saved without its image"
                    );
                    return Ok(CommitOutcome {
                        collection: stage,
                        notice: Some(DegradationNotice::NewestVisualStripped),
                    });
                }
                Err(WriteError::Io(e)) => return Err((candidate, Error::Io(e))),
                Err(WriteError::CapacityExceeded) => {}
            }
        }

        // Stage 2: strip every visual in the collection
        let mut stage = candidate.clone();
        let stripped = stage
            .iter_mut()
            .filter(|inv| inv.has_visual())
            .map(Invention::strip_visual)
            .count();
        if stripped > 0 {
            match self.persist(&stage) {
                Ok(()) => {
                    tracing::warn!(
                        count = stripped,
                        "Gallery capacity critical; all images removed to preserve text data"
                    );
                    return Ok(CommitOutcome {
                        collection: stage,
                        notice: Some(DegradationNotice::AllVisualsStripped),
                    });
                }
                Err(WriteError::Io(e)) => return Err((candidate, Error::Io(e))),
                Err(WriteError::CapacityExceeded) => {}
            }
        }

        // Stage 3: nothing left to shed
        tracing::error!("Gallery storage is full even with all images stripped");
        Err((
            candidate,
            Error::StorageFull(
                "cannot save invention; delete older items or export a backup".to_string(),
            ),
        ))
    }

    fn persist(&self, collection: &[Invention]) -> std::result::Result<(), WriteError> {
        let payload = serde_json::to_string(collection)
            .map_err(|e| WriteError::Io(std::io::Error::other(e)))?;
        self.backend.write(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::backend::MemoryBackend;
    use crate::invention::{Concept, InventionRequest, VisualPayload};

    fn invention(id: &str, visual_bytes: usize) -> Invention {
        let mut inv = Invention::new(
            id.to_string(),
            id.parse().unwrap_or(0),
            Concept {
                name: format!("Gadget {}", id),
                visual_prompt: "a gadget".to_string(),
                feasibility_score: 50,
                ..Default::default()
            },
            InventionRequest {
                challenge: "test".to_string(),
                ..Default::default()
            },
        );
        if visual_bytes > 0 {
            inv.visual = Some(VisualPayload {
                mime_type: "image/png".to_string(),
                data: "A".repeat(visual_bytes),
            });
        }
        inv
    }

    fn serialized_len(collection: &[Invention]) -> usize {
        serde_json::to_string(collection).unwrap().len()
    }

    fn open_unbounded() -> (GalleryStore, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        let store = GalleryStore::open(backend.clone());
        (store, backend)
    }

    #[tokio::test]
    async fn test_commit_prepends_newest_first() {
        let (store, _) = open_unbounded();

        store.commit(invention("1", 0)).await.unwrap();
        let outcome = store.commit(invention("2", 0)).await.unwrap();

        let ids: Vec<&str> = outcome.collection.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert!(outcome.notice.is_none());
    }

    #[tokio::test]
    async fn test_commit_is_idempotent_by_id() {
        let (store, _) = open_unbounded();

        store.commit(invention("1", 0)).await.unwrap();
        store.commit(invention("2", 0)).await.unwrap();

        // Same id again: no duplicate, no reorder
        let outcome = store.commit(invention("1", 16)).await.unwrap();
        let ids: Vec<&str> = outcome.collection.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        // The original record wins, including its (absent) visual
        assert!(!outcome.collection[1].has_visual());
    }

    #[tokio::test]
    async fn test_load_reflects_persisted_state() {
        let backend = Arc::new(MemoryBackend::new());
        {
            let store = GalleryStore::open(backend.clone());
            store.commit(invention("1", 8)).await.unwrap();
        }

        // Re-open over the same backend
        let store = GalleryStore::open(backend);
        let loaded = store.load().await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "1");
        assert!(loaded[0].has_visual());
    }

    #[tokio::test]
    async fn test_open_on_corrupt_data_returns_empty() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed("{not json at all");

        let store = GalleryStore::open(backend);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_open_on_wrong_shape_returns_empty() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(r#"{"id":"not-a-list"}"#);

        let store = GalleryStore::open(backend);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_degradation_stage_one_strips_newest_only() {
        let existing = vec![invention("2", 64), invention("1", 64)];
        let full: Vec<Invention> = {
            let mut v = vec![invention("3", 64)];
            v.extend(existing.iter().cloned());
            v
        };
        let mut stage1 = full.clone();
        stage1[0].strip_visual();

        // Capacity admits the stage-1 shape but not the full candidate
        assert!(serialized_len(&stage1) < serialized_len(&full));
        let backend = Arc::new(MemoryBackend::with_capacity(serialized_len(&stage1)));
        backend.seed(serde_json::to_string(&existing).unwrap());

        let store = GalleryStore::open(backend.clone());
        let outcome = store.commit(invention("3", 64)).await.unwrap();

        assert_eq!(outcome.notice, Some(DegradationNotice::NewestVisualStripped));
        let ids: Vec<&str> = outcome.collection.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
        assert!(!outcome.collection[0].has_visual());
        assert!(outcome.collection[1].has_visual());
        assert!(outcome.collection[2].has_visual());

        // Durable bytes match the degraded collection exactly
        let persisted: Vec<Invention> =
            serde_json::from_str(&backend.read().unwrap().unwrap()).unwrap();
        assert_eq!(persisted, outcome.collection);
    }

    #[tokio::test]
    async fn test_degradation_stage_two_strips_everything() {
        let existing = vec![invention("2", 256), invention("1", 256)];
        let stage2: Vec<Invention> = {
            let mut v = vec![invention("3", 256)];
            v.extend(existing.iter().cloned());
            v.iter_mut().for_each(Invention::strip_visual);
            v
        };

        let backend = Arc::new(MemoryBackend::with_capacity(serialized_len(&stage2)));
        backend.seed(serde_json::to_string(&existing).unwrap());

        let store = GalleryStore::open(backend.clone());
        let outcome = store.commit(invention("3", 256)).await.unwrap();

        assert_eq!(outcome.notice, Some(DegradationNotice::AllVisualsStripped));
        assert!(outcome.collection.iter().all(|inv| !inv.has_visual()));
        // Text survives
        assert_eq!(outcome.collection[2].concept.name, "Gadget 1");

        let persisted: Vec<Invention> =
            serde_json::from_str(&backend.read().unwrap().unwrap()).unwrap();
        assert_eq!(persisted, outcome.collection);
    }

    #[tokio::test]
    async fn test_degradation_stage_three_reports_full_and_leaves_storage_untouched() {
        let existing = vec![invention("1", 0)];
        let seeded = serde_json::to_string(&existing).unwrap();

        // Too small for anything bigger than what is already there
        let backend = Arc::new(MemoryBackend::with_capacity(seeded.len()));
        backend.seed(seeded.clone());

        let store = GalleryStore::open(backend.clone());
        let err = store.commit(invention("2", 0)).await.unwrap_err();
        assert!(matches!(err, Error::StorageFull(_)));

        // Durable bytes are byte-for-byte unchanged
        assert_eq!(backend.read().unwrap().unwrap(), seeded);

        // The in-memory view still reflects the attempted commit
        let ids: Vec<String> = store.load().await.iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_remove_persists_and_never_degrades() {
        let (store, backend) = open_unbounded();
        store.commit(invention("1", 32)).await.unwrap();
        store.commit(invention("2", 32)).await.unwrap();

        let remaining = store.remove("1").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "2");
        // Surviving records keep their visuals
        assert!(remaining[0].has_visual());

        let persisted: Vec<Invention> =
            serde_json::from_str(&backend.read().unwrap().unwrap()).unwrap();
        assert_eq!(persisted, remaining);
    }

    #[tokio::test]
    async fn test_remove_unknown_id_is_noop() {
        let (store, _) = open_unbounded();
        store.commit(invention("1", 0)).await.unwrap();

        let remaining = store.remove("missing").await.unwrap();
        assert_eq!(remaining.len(), 1);
    }
}
