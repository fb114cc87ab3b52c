// Dispatcher implementations — FCM HTTP v1 and dry-run.
//
// FcmDispatcher is a thin adapter: envelope the message, POST it, report
// the outcome. Token minting is a deployment concern (a sidecar or the
// ambient service account refreshes FCM_ACCESS_TOKEN); an expired token
// fails like any other delivery error and is logged upstream.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::message::NotificationMessage;
use crate::config::Config;

/// Proof of a successful hand-off to the delivery service.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    /// The service-assigned message name, e.g. "projects/x/messages/123".
    pub message_id: String,
    pub sent_at: String,
}

/// Trait for handing a built notification to the push-delivery service.
/// Implementations must be async because delivery is an HTTP call.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Send one message. No retries — the caller decides what a failure
    /// means (in this core: log it and move on).
    async fn send(&self, message: &NotificationMessage) -> Result<DeliveryReceipt>;
}

/// FCM HTTP v1 dispatcher.
pub struct FcmDispatcher {
    client: Client,
    endpoint: String,
    access_token: String,
    channel_id: String,
}

impl FcmDispatcher {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.fcm_endpoint.clone(),
            access_token: config.fcm_access_token.clone(),
            channel_id: config.android_channel_id.clone(),
        }
    }
}

#[async_trait]
impl Dispatcher for FcmDispatcher {
    async fn send(&self, message: &NotificationMessage) -> Result<DeliveryReceipt> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&message.to_fcm(&self.channel_id))
            .send()
            .await
            .context("Failed to call FCM send endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("FCM returned {}: {}", status, body);
        }

        let result: FcmSendResponse = response
            .json()
            .await
            .context("Failed to parse FCM send response")?;

        debug!(
            message_id = %result.name,
            topic = %message.topic,
            "Notification delivered"
        );

        Ok(DeliveryReceipt {
            message_id: result.name,
            sent_at: Utc::now().to_rfc3339(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct FcmSendResponse {
    /// FCM's identifier for the accepted message.
    name: String,
}

/// Dry-run dispatcher — logs the would-be notification instead of sending.
/// Used by `listen --dry-run` and `check`, and handy in tests.
pub struct DryRunDispatcher;

#[async_trait]
impl Dispatcher for DryRunDispatcher {
    async fn send(&self, message: &NotificationMessage) -> Result<DeliveryReceipt> {
        info!(
            topic = %message.topic,
            title = %message.title,
            body = %message.body,
            data = ?message.data,
            "Dry run — notification not sent"
        );
        Ok(DeliveryReceipt {
            message_id: "dry-run".to_string(),
            sent_at: Utc::now().to_rfc3339(),
        })
    }
}
