// Per-event handling — decide, dispatch, never propagate.
//
// The event source delivers at-least-once and retries whole events on
// failure. Detection and dispatch aren't transactional, so letting a
// delivery error escape would invite retry storms that double-send the
// parts that already succeeded. The handler therefore reports success to
// the source no matter what; failures exist only in the logs.

use tracing::{debug, info, warn};

use crate::detect::{meal, payment};
use crate::notify::{DeliveryReceipt, Dispatcher, NotificationMessage};
use crate::store::{ChangeEvent, Collection};

/// What happened to one event. Operational visibility only — callers never
/// branch on Failed to retry.
#[derive(Debug)]
pub enum Outcome {
    /// A qualifying transition was detected and the notification delivered.
    Sent(DeliveryReceipt),
    /// No qualifying transition (or an unroutable event); nothing to send.
    Skipped,
    /// A notification was due but delivery failed; dropped after logging.
    Failed,
}

/// Pure decision step: route the event by collection and run the matching
/// detector. Returns the message to send, if any. Free of I/O so every
/// scenario is testable without a dispatcher.
pub fn decide(event: &ChangeEvent, topic: &str) -> Option<NotificationMessage> {
    match event.collection() {
        Some(Collection::MealsDaily) => meal::detect(event, topic),
        Some(Collection::Expenses) => payment::detect(event, topic),
        None => {
            debug!(path = %event.path, "Event for unwatched collection, skipping");
            None
        }
    }
}

/// Handle one delivered event end to end. Infallible by design: every
/// failure is caught here, logged, and swallowed.
pub async fn handle_event(
    event: &ChangeEvent,
    topic: &str,
    dispatcher: &dyn Dispatcher,
) -> Outcome {
    let Some(message) = decide(event, topic) else {
        return Outcome::Skipped;
    };

    match dispatcher.send(&message).await {
        Ok(receipt) => {
            info!(
                path = %event.path,
                title = %message.title,
                message_id = %receipt.message_id,
                "Notification sent"
            );
            Outcome::Sent(receipt)
        }
        Err(e) => {
            warn!(
                path = %event.path,
                title = %message.title,
                error = %e,
                "Delivery failed, notification dropped"
            );
            Outcome::Failed
        }
    }
}
