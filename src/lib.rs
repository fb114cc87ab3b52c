// tiffin: push notification dispatch for a shared mess ledger
//
// This is the library root. Each module corresponds to a stage of the
// change-to-notification flow: store (events in), detect (decisions),
// notify (messages out), pipeline (glue and the error boundary).

pub mod config;
pub mod detect;
pub mod notify;
pub mod pipeline;
pub mod store;

#[cfg(feature = "web")]
pub mod web;
