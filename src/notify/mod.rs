// Notification delivery — message envelope and dispatch abstraction.
//
// The Dispatcher trait is the seam between detection and transport: the
// detectors build a NotificationMessage, and an implementation forwards it
// to FCM (or just logs it in dry-run mode). No retry logic lives here —
// a delivery failure surfaces to the pipeline, which logs and swallows it.

pub mod dispatcher;
pub mod message;

pub use dispatcher::{DeliveryReceipt, Dispatcher, DryRunDispatcher, FcmDispatcher};
pub use message::{NotificationMessage, ANDROID_CHANNEL_ID, TOPIC_ALL};
