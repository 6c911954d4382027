//! FCM HTTP v1 push provider.
//!
//! Builds and posts one request per device token against the Firebase Cloud
//! Messaging v1 endpoint, collecting per-token outcomes into a
//! [`MulticastSummary`].

use std::collections::HashMap;
use std::path::Path;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{MulticastSummary, NotifyError, PushProvider};

/// FCM HTTP v1 endpoint template; `{project_id}` is substituted at
/// construction time.
const FCM_API_URL_TEMPLATE: &str =
    "https://fcm.googleapis.com/v1/projects/{project_id}/messages:send";

/// Environment variable carrying the OAuth bearer token for the FCM API.
const FCM_ACCESS_TOKEN_ENV: &str = "MATCHDAY_FCM_ACCESS_TOKEN";

/// Service account credentials loaded from a Google Cloud JSON key file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountCredentials {
    /// The Google Cloud project id.
    pub project_id: String,
    /// Service account email; informational here.
    #[serde(default)]
    pub client_email: String,
    /// PEM private key, used as the auth fallback when no access token is
    /// provided via the environment.
    #[serde(default)]
    pub private_key: String,
}

/// Request wrapper required by the FCM v1 API.
#[derive(Debug, Serialize)]
pub struct FcmMessage {
    /// The message object itself.
    pub message: FcmMessageBody,
}

/// Inner message addressed to one device token.
#[derive(Debug, Serialize)]
pub struct FcmMessageBody {
    /// Destination device registration token.
    pub token: String,
    /// Display payload.
    pub notification: FcmNotification,
    /// Application data payload (deep-link identifiers and the like).
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, String>,
}

/// Title and body shown on the device.
#[derive(Debug, Serialize)]
pub struct FcmNotification {
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
}

/// Client for the FCM HTTP v1 API.
pub struct FcmClient {
    http: reqwest::Client,
    credentials: ServiceAccountCredentials,
    api_url: String,
    access_token: Option<String>,
}

fn read_access_token_from_env() -> Option<String> {
    let token = std::env::var(FCM_ACCESS_TOKEN_ENV).ok();
    if token.is_none() {
        warn!(
            "{FCM_ACCESS_TOKEN_ENV} is not set; falling back to \
             credentials.private_key for FCM auth"
        );
    }
    token
}

impl FcmClient {
    /// Load service account credentials from a JSON key file and build a
    /// client for that project.
    pub fn from_credentials_file(path: &Path) -> Result<Self, NotifyError> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            NotifyError::Credentials(format!(
                "failed to read credentials file {}: {err}",
                path.display()
            ))
        })?;

        let credentials: ServiceAccountCredentials = serde_json::from_str(&content)
            .map_err(|err| NotifyError::Credentials(format!("invalid credentials JSON: {err}")))?;

        Ok(Self::from_credentials(credentials, reqwest::Client::new()))
    }

    /// Build a client from pre-parsed credentials and an existing HTTP
    /// client.
    pub fn from_credentials(credentials: ServiceAccountCredentials, http: reqwest::Client) -> Self {
        let api_url = FCM_API_URL_TEMPLATE.replace("{project_id}", &credentials.project_id);
        let access_token = read_access_token_from_env();

        debug!(
            project_id = %credentials.project_id,
            has_env_token = access_token.is_some(),
            "FCM client initialized"
        );

        Self {
            http,
            credentials,
            api_url,
            access_token,
        }
    }

    /// Build the request payload for one device token.
    pub fn build_message(
        device_token: &str,
        title: &str,
        body: &str,
        data: &HashMap<String, String>,
    ) -> FcmMessage {
        FcmMessage {
            message: FcmMessageBody {
                token: device_token.to_string(),
                notification: FcmNotification {
                    title: title.to_string(),
                    body: body.to_string(),
                },
                data: data.clone(),
            },
        }
    }

    /// Project id from the loaded credentials.
    pub fn project_id(&self) -> &str {
        &self.credentials.project_id
    }

    /// Fully-resolved API endpoint for this project.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn auth_header(&self) -> String {
        let token = self
            .access_token
            .as_deref()
            .unwrap_or(&self.credentials.private_key);
        format!("Bearer {token}")
    }

    async fn send_one(
        http: &reqwest::Client,
        api_url: &str,
        auth: &str,
        message: &FcmMessage,
    ) -> Result<(), NotifyError> {
        let response = http
            .post(api_url)
            .header("Authorization", auth)
            .json(message)
            .send()
            .await
            .map_err(|err| NotifyError::Request(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            Err(NotifyError::Request(format!(
                "FCM returned status {status}: {body}"
            )))
        }
    }
}

impl PushProvider for FcmClient {
    fn send_multicast(
        &self,
        tokens: Vec<String>,
        title: String,
        body: String,
        data: HashMap<String, String>,
    ) -> BoxFuture<'static, Result<MulticastSummary, NotifyError>> {
        let http = self.http.clone();
        let api_url = self.api_url.clone();
        let auth = self.auth_header();

        Box::pin(async move {
            let mut summary = MulticastSummary::empty();

            // The v1 API takes one token per request; a rejected token is
            // recorded and the batch moves on.
            for token in tokens {
                let message = Self::build_message(&token, &title, &body, &data);
                match Self::send_one(&http, &api_url, &auth, &message).await {
                    Ok(()) => summary.success_count += 1,
                    Err(err) => {
                        warn!(error = %err, "FCM send failed for one token");
                        summary.failure_count += 1;
                        summary.failed_tokens.push(token);
                    }
                }
            }

            Ok(summary)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credentials() -> ServiceAccountCredentials {
        ServiceAccountCredentials {
            project_id: "matchday-test".to_string(),
            client_email: "push@matchday-test.iam.gserviceaccount.com".to_string(),
            private_key: "test-private-key".to_string(),
        }
    }

    #[test]
    fn build_message_carries_notification_and_data() {
        let mut data = HashMap::new();
        data.insert("matchId".to_string(), "42".to_string());

        let msg = FcmClient::build_message("device-abc", "New match", "Tap to view", &data);

        assert_eq!(msg.message.token, "device-abc");
        assert_eq!(msg.message.notification.title, "New match");
        assert_eq!(msg.message.notification.body, "Tap to view");
        assert_eq!(msg.message.data.get("matchId").unwrap(), "42");
    }

    #[test]
    fn message_serializes_to_v1_shape() {
        let msg = FcmClient::build_message("tok", "T", "B", &HashMap::new());
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["message"]["token"], "tok");
        assert_eq!(json["message"]["notification"]["title"], "T");
        assert_eq!(json["message"]["notification"]["body"], "B");
        // Empty data payloads stay off the wire.
        assert!(json["message"].get("data").is_none());
    }

    #[test]
    fn from_credentials_resolves_project_url() {
        let client = FcmClient::from_credentials(test_credentials(), reqwest::Client::new());
        assert_eq!(client.project_id(), "matchday-test");
        assert_eq!(
            client.api_url(),
            "https://fcm.googleapis.com/v1/projects/matchday-test/messages:send"
        );
    }

    #[test]
    fn from_credentials_file_missing_reports_credentials_error() {
        let result = FcmClient::from_credentials_file(Path::new("/nonexistent/key.json"));
        assert!(matches!(result, Err(NotifyError::Credentials(_))));
    }
}
