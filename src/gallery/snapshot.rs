//! Gallery snapshot export and import
//!
//! A snapshot is the full collection serialized as a JSON array, suitable
//! for download/backup and for re-import on another install. Import is
//! merge-safe: records already present keep priority, new records are
//! prepended in their snapshot order, and the merged result goes through the
//! same degradation-aware persistence path as a normal commit.

use super::store::{CommitOutcome, GalleryStore};
use crate::error::{Error, Result};
use crate::invention::Invention;
use chrono::Utc;
use std::collections::HashSet;

/// Result of importing a snapshot
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// The persisted merge result (possibly degraded)
    pub outcome: CommitOutcome,
    /// How many snapshot records were actually added
    pub added: usize,
}

/// Serialize the collection to a snapshot document
pub fn export(collection: &[Invention]) -> Result<String> {
    Ok(serde_json::to_string_pretty(collection)?)
}

/// Default snapshot filename, dated for easy sorting
pub fn default_snapshot_name() -> String {
    format!("tacklesmith_backup_{}.json", Utc::now().format("%Y-%m-%d"))
}

/// Parse a snapshot document into candidate records.
///
/// The document must be a JSON array of objects; anything else is an
/// `ImportFormat` error and nothing is imported. Individual objects that do
/// not decode to a record with a non-empty id are dropped silently, so a
/// snapshot written by an older version still imports what it can.
pub fn parse_snapshot(data: &str) -> Result<Vec<Invention>> {
    let value: serde_json::Value = serde_json::from_str(data)
        .map_err(|e| Error::ImportFormat(format!("snapshot is not valid JSON: {}", e)))?;

    let entries = match value {
        serde_json::Value::Array(entries) => entries,
        other => {
            return Err(Error::ImportFormat(format!(
                "snapshot must be a list of inventions, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut candidates = Vec::with_capacity(entries.len());
    for entry in entries {
        if !entry.is_object() {
            return Err(Error::ImportFormat(format!(
                "snapshot entries must be invention records, got {}",
                json_kind(&entry)
            )));
        }
        match serde_json::from_value::<Invention>(entry) {
            Ok(inv) if !inv.id.is_empty() => candidates.push(inv),
            Ok(_) => tracing::warn!("Skipping snapshot record without an id"),
            Err(e) => tracing::warn!("Skipping undecodable snapshot record: {}", e),
        }
    }

    Ok(candidates)
}

/// Merge snapshot candidates into an existing collection.
///
/// Existing records are authoritative: a candidate whose id is already
/// present is dropped. Accepted candidates go in front of the existing
/// collection, keeping their relative snapshot order. Returns the merged
/// collection and the number of records added.
pub fn merge(candidates: Vec<Invention>, existing: &[Invention]) -> (Vec<Invention>, usize) {
    let known: HashSet<&str> = existing.iter().map(|inv| inv.id.as_str()).collect();

    let mut fresh: Vec<Invention> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for candidate in candidates {
        if known.contains(candidate.id.as_str()) || !seen.insert(candidate.id.clone()) {
            continue;
        }
        fresh.push(candidate);
    }

    let added = fresh.len();
    fresh.extend(existing.iter().cloned());
    (fresh, added)
}

/// Parse, merge and persist a snapshot into the store.
///
/// A format error leaves the store untouched. Degradation can trigger on a
/// large backup exactly as it does for a single oversized commit.
pub async fn import(store: &GalleryStore, data: &str) -> Result<ImportOutcome> {
    let candidates = parse_snapshot(data)?;
    let existing = store.load().await;
    let (merged, added) = merge(candidates, &existing);

    if added == 0 {
        return Ok(ImportOutcome {
            outcome: CommitOutcome {
                collection: existing,
                notice: None,
            },
            added: 0,
        });
    }

    let outcome = store.replace(merged).await?;
    tracing::info!(added, "Imported gallery snapshot");
    Ok(ImportOutcome { outcome, added })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::backend::MemoryBackend;
    use crate::invention::{Concept, InventionRequest};
    use std::sync::Arc;

    fn invention(id: &str) -> Invention {
        Invention::new(
            id.to_string(),
            id.parse().unwrap_or(0),
            Concept {
                name: format!("Gadget {}", id),
                ..Default::default()
            },
            InventionRequest {
                challenge: "test".to_string(),
                ..Default::default()
            },
        )
    }

    fn open_store() -> GalleryStore {
        GalleryStore::open(Arc::new(MemoryBackend::new()))
    }

    #[test]
    fn test_merge_dedups_and_prepends() {
        let existing = vec![invention("1"), invention("2")];
        let candidates = vec![invention("2"), invention("3")];

        let (merged, added) = merge(candidates, &existing);

        let ids: Vec<&str> = merged.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
        assert_eq!(added, 1);
    }

    #[test]
    fn test_merge_existing_record_is_authoritative() {
        let mut theirs = invention("1");
        theirs.concept.name = "Imposter".to_string();
        let existing = vec![invention("1")];

        let (merged, added) = merge(vec![theirs], &existing);
        assert_eq!(added, 0);
        assert_eq!(merged[0].concept.name, "Gadget 1");
    }

    #[test]
    fn test_merge_preserves_candidate_order() {
        let (merged, added) = merge(
            vec![invention("9"), invention("7"), invention("8")],
            &[invention("1")],
        );
        let ids: Vec<&str> = merged.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["9", "7", "8", "1"]);
        assert_eq!(added, 3);
    }

    #[test]
    fn test_merge_drops_duplicates_within_snapshot() {
        let (merged, added) = merge(vec![invention("5"), invention("5")], &[]);
        assert_eq!(merged.len(), 1);
        assert_eq!(added, 1);
    }

    #[test]
    fn test_parse_rejects_non_list() {
        for bad in [r#"{"id":"1"}"#, "42", "\"hello\"", "null"] {
            let err = parse_snapshot(bad).unwrap_err();
            assert!(matches!(err, Error::ImportFormat(_)), "input: {}", bad);
        }
    }

    #[test]
    fn test_parse_rejects_list_of_non_records() {
        let err = parse_snapshot(r#"[{"id":"1"}, 42]"#).unwrap_err();
        assert!(matches!(err, Error::ImportFormat(_)));
    }

    #[test]
    fn test_parse_drops_records_without_id() {
        let candidates = parse_snapshot(r#"[{"id":"1"}, {"name":"no id"}, {"id":""}]"#).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "1");
    }

    #[tokio::test]
    async fn test_import_merges_into_store() {
        let store = open_store();
        store.commit(invention("1")).await.unwrap();
        store.commit(invention("2")).await.unwrap();

        // Store is now [2, 1]; snapshot carries one known and one new record
        let snapshot = export(&[invention("2"), invention("3")]).unwrap();
        let result = import(&store, &snapshot).await.unwrap();

        assert_eq!(result.added, 1);
        let ids: Vec<&str> = result
            .outcome
            .collection
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[tokio::test]
    async fn test_import_format_error_leaves_store_untouched() {
        let store = open_store();
        store.commit(invention("1")).await.unwrap();

        let err = import(&store, r#"{"oops": true}"#).await.unwrap_err();
        assert!(matches!(err, Error::ImportFormat(_)));

        let ids: Vec<String> = store.load().await.iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[tokio::test]
    async fn test_export_import_round_trip() {
        let source = open_store();
        source.commit(invention("1")).await.unwrap();
        source.commit(invention("2")).await.unwrap();
        let original = source.load().await;

        let snapshot = export(&original).unwrap();

        let target = open_store();
        let result = import(&target, &snapshot).await.unwrap();

        assert_eq!(result.added, original.len());
        assert_eq!(result.outcome.collection, original);
        assert_eq!(target.load().await, original);
    }

    #[test]
    fn test_default_snapshot_name_is_dated() {
        let name = default_snapshot_name();
        assert!(name.starts_with("tacklesmith_backup_"));
        assert!(name.ends_with(".json"));
    }
}
