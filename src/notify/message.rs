// Notification message and its FCM v1 wire envelope.
//
// NotificationMessage is what the detectors produce; the Fcm* types below
// are the exact JSON shape the delivery service accepts. The data payload
// keys (`type`, `memberName`, `added`, ...) are a stable contract the mobile
// client uses to customize display on receipt — don't rename them.

use std::collections::BTreeMap;

use serde::Serialize;

/// The single broadcast topic — every subscriber of the mess gets every
/// notification. No per-user or per-room targeting exists in this core.
pub const TOPIC_ALL: &str = "mess_all";

/// Android notification channel. Must match the CHANNEL_ID the mobile
/// client registers locally, or notifications silently fail to display
/// on Android 8+.
pub const ANDROID_CHANNEL_ID: &str = "mess_notifications_channel";

/// A fully-built push notification, immutable once constructed.
/// Built fresh per dispatch and owned by the call that produced it until
/// handed to the delivery service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub topic: String,
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
}

impl NotificationMessage {
    /// Wrap the message in the FCM v1 send envelope.
    pub fn to_fcm(&self, channel_id: &str) -> FcmEnvelope<'_> {
        FcmEnvelope {
            message: FcmMessage {
                topic: &self.topic,
                notification: FcmNotification {
                    title: &self.title,
                    body: &self.body,
                },
                data: &self.data,
                android: AndroidConfig {
                    priority: "high",
                    notification: AndroidNotification {
                        channel_id: channel_id.to_string(),
                    },
                },
            },
        }
    }
}

// --- FCM v1 request types ---

#[derive(Debug, Serialize)]
pub struct FcmEnvelope<'a> {
    message: FcmMessage<'a>,
}

#[derive(Debug, Serialize)]
struct FcmMessage<'a> {
    topic: &'a str,
    notification: FcmNotification<'a>,
    data: &'a BTreeMap<String, String>,
    android: AndroidConfig,
}

#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
struct AndroidConfig {
    priority: &'static str,
    notification: AndroidNotification,
}

#[derive(Debug, Serialize)]
struct AndroidNotification {
    #[serde(rename = "channelId")]
    channel_id: String,
}
