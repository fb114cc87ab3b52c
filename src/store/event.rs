// Change events — the unit of work delivered by the event source.
//
// One event per document write: the path that changed plus before/after
// snapshots. An absent `after` is a deletion; an absent `before` is a
// first-time creation. The core never looks past the first path segment —
// it only needs to know which collection fired.

use serde::{Deserialize, Serialize};

use super::snapshot::DocumentSnapshot;

/// The two collections the event source watches. Paths look like
/// `meals_daily/{docId}` and `expenses/{expenseId}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    MealsDaily,
    Expenses,
}

impl Collection {
    /// Route a document path to its collection by the first segment.
    /// Unknown collections return None and are skipped upstream.
    pub fn from_path(path: &str) -> Option<Self> {
        match path.split('/').next() {
            Some("meals_daily") => Some(Collection::MealsDaily),
            Some("expenses") => Some(Collection::Expenses),
            _ => None,
        }
    }
}

/// A single create/update/delete delivered by the event source.
///
/// Each handler invocation's decision depends only on this pair — no other
/// document's state — which is what makes concurrent invocations safe
/// without any locking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Document path, e.g. "meals_daily/2024-05-01_alice".
    pub path: String,
    /// Snapshot before the write; None if the document didn't exist.
    #[serde(default)]
    pub before: Option<DocumentSnapshot>,
    /// Snapshot after the write; None if the document was deleted.
    #[serde(default)]
    pub after: Option<DocumentSnapshot>,
}

impl ChangeEvent {
    pub fn collection(&self) -> Option<Collection> {
        Collection::from_path(&self.path)
    }

    /// The document id — everything after the collection segment.
    pub fn doc_id(&self) -> &str {
        self.path.split_once('/').map_or("", |(_, id)| id)
    }
}
