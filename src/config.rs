use std::env;

use anyhow::Result;

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Firebase project id — used to derive the default FCM endpoint.
    pub fcm_project_id: String,
    /// OAuth2 access token for the FCM v1 API. Refreshed by the
    /// deployment (sidecar or ambient service account), not by tiffin.
    pub fcm_access_token: String,
    /// Full FCM send URL. Derived from the project id unless FCM_ENDPOINT
    /// overrides it (tests and emulators point this at a local server).
    pub fcm_endpoint: String,
    /// Broadcast topic all subscribers listen on.
    pub topic: String,
    /// Android notification channel id. Must match what the mobile client
    /// registers, or Android drops the notification on the floor.
    pub android_channel_id: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Topic and channel id have defaults — only `listen` without
    /// `--dry-run`, `serve`, and `send-test` need the FCM credentials.
    pub fn load() -> Result<Self> {
        let fcm_project_id = env::var("FCM_PROJECT_ID").unwrap_or_default();
        let fcm_endpoint = env::var("FCM_ENDPOINT").unwrap_or_else(|_| {
            if fcm_project_id.is_empty() {
                String::new()
            } else {
                format!("https://fcm.googleapis.com/v1/projects/{fcm_project_id}/messages:send")
            }
        });

        Ok(Self {
            fcm_project_id,
            fcm_access_token: env::var("FCM_ACCESS_TOKEN").unwrap_or_default(),
            fcm_endpoint,
            topic: env::var("TIFFIN_TOPIC")
                .unwrap_or_else(|_| crate::notify::TOPIC_ALL.to_string()),
            android_channel_id: env::var("TIFFIN_ANDROID_CHANNEL")
                .unwrap_or_else(|_| crate::notify::ANDROID_CHANNEL_ID.to_string()),
        })
    }

    /// Check that FCM delivery is configured.
    /// Call this before any operation that actually sends.
    pub fn require_fcm(&self) -> Result<()> {
        if self.fcm_endpoint.is_empty() {
            anyhow::bail!(
                "FCM_PROJECT_ID not set (and no FCM_ENDPOINT override). Add it to your .env file."
            );
        }
        if self.fcm_access_token.is_empty() {
            anyhow::bail!(
                "FCM_ACCESS_TOKEN not set. Mint a token for the service account\n\
                 and add it to your .env file, or use --dry-run."
            );
        }
        Ok(())
    }
}
