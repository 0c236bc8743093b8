use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::session::Session;
use crate::error::{PlannerError, Result};

const MAX_RETRIES: usize = 3;

/// Low-level JSON-over-HTTP layer. Owns the bearer header, the
/// retry-on-429/5xx policy and error-body extraction; endpoint
/// wrappers live in [`super::plans`].
#[derive(Clone, Debug)]
pub struct ApiClient {
    session: Session,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(session: Session, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| PlannerError::Config(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self { session, client })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        self.request_json(Method::GET, path, query, None).await
    }

    pub async fn post_json(&self, path: &str, body: Option<&Value>) -> Result<Value> {
        self.request_json(Method::POST, path, &[], body).await
    }

    pub async fn put_json(&self, path: &str, body: Option<&Value>) -> Result<Value> {
        self.request_json(Method::PUT, path, &[], body).await
    }

    pub async fn get_bytes(&self, path: &str, query: &[(String, String)]) -> Result<Vec<u8>> {
        let response = self.send(Method::GET, path, query, None, 0).await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(api_error(status, &text));
        }
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|err| PlannerError::Network(format!("Failed to read response body: {err}")))
    }

    async fn request_json(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let mut attempt = 0;
        let mut backoff = Duration::from_millis(250);

        loop {
            let response = self.send(method.clone(), path, query, body, attempt).await?;
            let status = response.status();
            let headers = response.headers().clone();
            let text = response.text().await.map_err(|err| {
                PlannerError::Network(format!("Failed to read response: {err}"))
            })?;

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = headers
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(backoff);

                if attempt < MAX_RETRIES {
                    tokio::time::sleep(retry_after).await;
                    attempt += 1;
                    backoff *= 2;
                    continue;
                }
                return Err(PlannerError::RateLimit {
                    retry_after: retry_after.as_secs().max(1),
                });
            }

            if status.is_server_error() && attempt < MAX_RETRIES {
                debug!(target: "tripcraft::http", %status, path, "server error, retrying");
                tokio::time::sleep(backoff).await;
                attempt += 1;
                backoff *= 2;
                continue;
            }

            if !status.is_success() {
                return Err(api_error(status, &text));
            }

            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text)
                .map_err(|err| PlannerError::Unknown(format!("Failed to parse JSON: {err}")));
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
        attempt: usize,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.session.base_url(), path);
        debug!(target: "tripcraft::http", %method, %url, attempt, "request");

        let mut request = self.client.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = self.session.token() {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        request
            .send()
            .await
            .map_err(|err| PlannerError::Network(format!("HTTP request failed: {err}")))
    }
}

/// Pull a human-readable message out of an error body; the backend
/// uses `detail`, older versions used `message`.
fn api_error(status: StatusCode, text: &str) -> PlannerError {
    let message = serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .or_else(|| value.get("message"))
                .and_then(|m| m.as_str().map(str::to_string).or_else(|| Some(m.to_string())))
        })
        .unwrap_or_else(|| text.to_string());

    PlannerError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_extracts_detail() {
        let err = api_error(StatusCode::UNPROCESSABLE_ENTITY, r#"{"detail":"bad dates"}"#);
        match err {
            PlannerError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "bad dates");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        let err = api_error(StatusCode::BAD_GATEWAY, "upstream down");
        assert!(err.to_string().contains("upstream down"));
        assert!(err.is_retryable());
    }
}
