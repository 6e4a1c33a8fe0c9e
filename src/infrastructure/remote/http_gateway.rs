use crate::application::ports::{PushError, RemoteGateway};
use crate::domain::entities::{SyncPayload, SyncableRecord};
use crate::shared::config::RemoteConfig;
use crate::shared::error::SyncError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

/// Create-or-update push body. `updated_at` lets the server apply
/// last-write-wins; `local_id` lets it deduplicate retried records.
#[derive(Debug, Serialize)]
struct PushBody<'a, P> {
    local_id: &'a str,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(flatten)]
    payload: &'a P,
}

pub struct HttpRemoteGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemoteGateway {
    pub fn new(config: &RemoteConfig) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// 2xx is an acknowledgment; 4xx means the payload itself is refused and a
/// retry cannot succeed, except 408/429 which are load signals; everything
/// else is worth retrying.
fn classify_status(status: StatusCode) -> Result<(), PushError> {
    if status.is_success() {
        return Ok(());
    }
    if status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::TOO_MANY_REQUESTS {
        return Err(PushError::Transient(format!("remote returned {status}")));
    }
    if status.is_client_error() {
        return Err(PushError::Permanent(format!("remote returned {status}")));
    }
    Err(PushError::Transient(format!("remote returned {status}")))
}

#[async_trait]
impl<P: SyncPayload> RemoteGateway<P> for HttpRemoteGateway {
    async fn push(&self, record: &SyncableRecord<P>) -> Result<(), PushError> {
        let url = format!("{}{}", self.base_url, P::KIND.endpoint());
        let body = PushBody {
            local_id: record.local_id.as_str(),
            created_at: record.created_at,
            updated_at: record.updated_at,
            payload: &record.payload,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PushError::Transient(format!("request failed: {e}")))?;

        classify_status(response.status())
    }
}
