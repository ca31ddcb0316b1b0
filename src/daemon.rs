use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use uuid::Uuid;

use crate::settings::DaemonSettings;

///
/// Possible errors when talking to the daemon.
///
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    /// The daemon could not be reached at all (connect error, timeout, ...).
    #[error("Failed to reach the daemon")]
    RequestError(#[from] reqwest::Error),
    /// The daemon answered, but refused or failed to process the request.
    #[error("Daemon responded with status code {0}")]
    UnexpectedStatusError(StatusCode),
}

///
/// Build payload sent to the daemon when a new server instance is requested.
///
#[derive(Debug, serde::Serialize)]
pub struct BuildLimits {
    pub memory: i64,
    pub disk: i64,
    pub cpu: i64,
}

#[derive(Debug, serde::Serialize)]
pub struct CreateServerRequest<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub build: BuildLimits,
}

///
/// HTTP client for the remote daemon managing the game-server processes.
///
/// All requests are authenticated with the daemon access token and bounded
/// by the configured timeout.
///
#[derive(Debug, Clone)]
pub struct DaemonClient {
    http: Client,
    base_url: String,
    token: String,
}

impl DaemonClient {
    pub fn new(settings: &DaemonSettings) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .expect("Failed to build the daemon http client.");

        Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            token: settings.token.to_owned(),
        }
    }

    #[tracing::instrument(name = "Request server creation on the daemon", skip(self, request), fields(server_id = %request.id))]
    pub async fn create_server(&self, request: &CreateServerRequest<'_>) -> Result<(), DaemonError> {
        let response = self
            .http
            .post(format!("{}/servers", self.base_url))
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        Self::ensure_success(response)
    }

    #[tracing::instrument(name = "Request server suspension on the daemon", skip(self))]
    pub async fn suspend_server(&self, server_id: Uuid) -> Result<(), DaemonError> {
        let response = self
            .http
            .post(format!("{}/servers/{}/suspend", self.base_url, server_id))
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::ensure_success(response)
    }

    #[tracing::instrument(name = "Request server unsuspension on the daemon", skip(self))]
    pub async fn unsuspend_server(&self, server_id: Uuid) -> Result<(), DaemonError> {
        let response = self
            .http
            .post(format!("{}/servers/{}/unsuspend", self.base_url, server_id))
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::ensure_success(response)
    }

    #[tracing::instrument(name = "Request server removal on the daemon", skip(self))]
    pub async fn delete_server(&self, server_id: Uuid) -> Result<(), DaemonError> {
        let response = self
            .http
            .delete(format!("{}/servers/{}", self.base_url, server_id))
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::ensure_success(response)
    }

    fn ensure_success(response: Response) -> Result<(), DaemonError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(DaemonError::UnexpectedStatusError(response.status()))
        }
    }
}
