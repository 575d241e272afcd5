//! CRM HTTP client with bounded retry
//!
//! Maps the CRM's failure modes onto the store error taxonomy: 401/403 is
//! fatal and immediate, 429 and network failures are retried sequentially
//! with a server hint or exponential backoff up to the configured budget,
//! and everything else surfaces with its status and body for diagnostics.

use crate::config::{RetryConfig, StoreConfig};
use reqwest::{Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use stepnote_core::StoreError;

const USER_AGENT: &str = "Stepnote/0.2 (+https://github.com/stepnote/stepnote)";

/// HTTP client for the CRM notes API.
pub struct CrmClient {
    client: Client,
    base_url: String,
    access_token: String,
    retry: RetryConfig,
}

impl CrmClient {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            access_token: config.access_token.clone(),
            retry: config.retry.clone(),
        }
    }

    /// GET a JSON payload.
    pub async fn get_json<Res: DeserializeOwned>(&self, path: &str) -> Result<Res, StoreError> {
        let response = self.execute(Method::GET, path, None).await?;
        Self::read_json(response).await
    }

    /// POST a JSON body, parse the JSON response.
    pub async fn post_json<Req: Serialize, Res: DeserializeOwned>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Res, StoreError> {
        let body = encode_body(body)?;
        let response = self.execute(Method::POST, path, Some(body)).await?;
        Self::read_json(response).await
    }

    /// PUT a JSON body, parse the JSON response.
    pub async fn put_json<Req: Serialize, Res: DeserializeOwned>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Res, StoreError> {
        let body = encode_body(body)?;
        let response = self.execute(Method::PUT, path, Some(body)).await?;
        Self::read_json(response).await
    }

    /// DELETE, returning the response status. Callers decide whether a 404
    /// matters; at this layer it is just a status.
    pub async fn delete(&self, path: &str) -> Result<StatusCode, StoreError> {
        let response = self.execute(Method::DELETE, path, None).await?;
        Ok(response.status())
    }

    /// Issue one logical request, retrying transient failures.
    ///
    /// Retries run sequentially, never in parallel, so a rate-limit event is
    /// not amplified by the client's own traffic.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response, StoreError> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt: u32 = 1;
        loop {
            let mut request = self
                .client
                .request(method.clone(), &url)
                .bearer_auth(&self.access_token)
                .header(reqwest::header::ACCEPT, "application/json")
                .header(reqwest::header::USER_AGENT, USER_AGENT);
            if let Some(json) = &body {
                request = request.json(json);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                        return Err(StoreError::Unauthorized);
                    }
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        if attempt >= self.retry.max_attempts {
                            return Err(StoreError::RateLimited { attempts: attempt });
                        }
                        let delay = retry_after_hint(&response)
                            .unwrap_or_else(|| self.retry.backoff_delay(attempt));
                        tracing::warn!(
                            path,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "rate limited by store, backing off"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Ok(response);
                }
                Err(err) => {
                    if attempt >= self.retry.max_attempts {
                        return Err(StoreError::Unreachable {
                            reason: err.to_string(),
                        });
                    }
                    let delay = self.retry.backoff_delay(attempt);
                    tracing::warn!(
                        path,
                        attempt,
                        error = %err,
                        "store request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn read_json<Res: DeserializeOwned>(response: Response) -> Result<Res, StoreError> {
        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|err| StoreError::RequestFailed {
                    status: status.as_u16(),
                    body: format!("unparseable response: {err}"),
                })
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(StoreError::RequestFailed {
                status: status.as_u16(),
                body,
            })
        }
    }
}

fn encode_body<Req: Serialize>(body: &Req) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(body).map_err(|err| StoreError::RequestFailed {
        status: 0,
        body: format!("unserializable request body: {err}"),
    })
}

fn retry_after_hint(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

impl std::fmt::Debug for CrmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrmClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}
