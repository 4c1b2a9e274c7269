//! HTTP access to the remote doctor directory.
//!
//! Every call goes through [`DirectoryClient::fetch_with_retry`]: a flat
//! number of attempts with a fixed pause in between. Non-2xx responses,
//! network errors and empty bodies all count as a failed attempt.
//!
//! The directory and slot fetches leave the error-level report of an
//! exhausted fetch to the caller, so giving up is only logged as a warning
//! there.

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use doctor_sync_core::errors::TransportError;
use eyre::Result;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::SyncConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

pub struct DirectoryClient {
    http: reqwest::Client,
    endpoint: String,
    authorization: HeaderValue,
    retry: RetryPolicy,
}

impl DirectoryClient {
    pub fn new(config: &SyncConfig) -> Result<Self> {
        Self::with_credentials(
            &config.endpoint,
            &config.username,
            &config.password,
            config.retry_policy(),
            config.request_timeout,
        )
    }

    pub fn with_credentials(
        endpoint: &str,
        username: &str,
        password: &str,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            authorization: basic_auth_header(username, password)?,
            retry,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn slots_url(&self, doctor_id: i64) -> String {
        format!("{}/{}/slots", self.endpoint, doctor_id)
    }

    /// `GET {endpoint}`
    pub async fn fetch_directory(&self) -> Result<Vec<u8>, TransportError> {
        self.fetch_with_retry(&self.endpoint, false).await
    }

    /// `GET {endpoint}/{doctor_id}/slots`
    pub async fn fetch_slots(&self, doctor_id: i64) -> Result<Vec<u8>, TransportError> {
        self.fetch_with_retry(&self.slots_url(doctor_id), false).await
    }

    /// Fetches `url`, retrying per the configured [`RetryPolicy`].
    ///
    /// Every failed attempt is a warning. Running out of attempts is logged
    /// at error level only when `report_errors` is set, and as one more
    /// warning otherwise.
    pub async fn fetch_with_retry(
        &self,
        url: &str,
        report_errors: bool,
    ) -> Result<Vec<u8>, TransportError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.fetch_once(url).await {
                Ok(body) => {
                    info!(url = %url, "Data OK");
                    return Ok(body);
                }
                Err(err) => {
                    warn!(
                        attempt,
                        max_attempts,
                        url = %url,
                        error = %err,
                        "Request failed, retrying"
                    );

                    if attempt >= max_attempts {
                        if report_errors {
                            error!(
                                url = %url,
                                attempts = attempt,
                                error = %err,
                                "Max number of attempts reached, giving up"
                            );
                        } else {
                            warn!(
                                url = %url,
                                attempts = attempt,
                                error = %err,
                                "Max number of attempts reached, giving up"
                            );
                        }
                        return Err(err);
                    }

                    sleep(self.retry.delay).await;
                }
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let request_error = |e: reqwest::Error| TransportError::Request {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.authorization.clone())
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(request_error)?;
        if body.is_empty() {
            return Err(TransportError::EmptyBody {
                url: url.to_string(),
            });
        }

        Ok(body.to_vec())
    }
}

/// `Basic base64(username:password)`, flagged sensitive so it stays out of
/// debug output.
pub fn basic_auth_header(username: &str, password: &str) -> Result<HeaderValue> {
    let encoded = BASE64.encode(format!("{}:{}", username, password));
    let mut value = HeaderValue::from_str(&format!("Basic {}", encoded))?;
    value.set_sensitive(true);
    Ok(value)
}
