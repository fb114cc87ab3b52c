// Document store types — snapshots, change events, field extraction.
//
// The store itself is external (a transactional document store with
// change-event delivery). This module only models what the event source
// hands us: before/after snapshots and the coercion rules for reading
// loosely-typed fields out of them.

pub mod event;
pub mod snapshot;

pub use event::{ChangeEvent, Collection};
pub use snapshot::{as_num, as_str, DocumentSnapshot};
