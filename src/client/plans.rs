use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::info;

use super::guard::RequestGuard;
use super::http::ApiClient;
use super::session::Session;
use crate::error::{PlannerError, Result};
use crate::types::plan::{
    deserialize_lenient, ExportFormat, Plan, PlanDetail, PlanPage, RatingSummary, StatusResponse,
    UserRating,
};
use crate::types::request::{GenerationOptions, PlanQuery, TravelRequest};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Endpoint wrappers for the travel-plan backend.
#[derive(Clone, Debug)]
pub struct PlanClient {
    api: ApiClient,
}

impl PlanClient {
    pub fn new(session: Session) -> Result<Self> {
        Self::with_timeout(session, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(session: Session, timeout: Duration) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(session, timeout)?,
        })
    }

    pub fn session(&self) -> &Session {
        self.api.session()
    }

    /// `POST /auth/register`. Returns the bearer token when the
    /// backend issues one on signup.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<String>> {
        let body = json!({ "username": username, "email": email, "password": password });
        let response = self.api.post_json("/auth/register", Some(&body)).await?;
        Ok(response
            .get("access_token")
            .or_else(|| response.get("token"))
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    /// `POST /travel-plans/`: validates locally, then creates the plan
    /// record. Any rejection is a creation error.
    pub async fn create_plan(&self, request: &TravelRequest) -> Result<i64> {
        request.validate()?;
        let response = self
            .api
            .post_json("/travel-plans/", Some(&request.to_create_body()))
            .await
            .map_err(|err| PlannerError::Creation(err.to_string()))?;

        extract_plan_id(&response).ok_or_else(|| {
            PlannerError::Creation(format!("create response carried no plan id: {response}"))
        })
    }

    /// `POST /travel-plans/{id}/generate`: fire-and-continue. The
    /// caller observes completion via status polling.
    pub async fn start_generation(
        &self,
        plan_id: i64,
        request: &TravelRequest,
        options: &GenerationOptions,
    ) -> Result<()> {
        self.api
            .post_json(
                &format!("/travel-plans/{plan_id}/generate"),
                Some(&options.to_body(request)),
            )
            .await
            .map_err(|err| PlannerError::GenerationStart(err.to_string()))?;
        info!(target: "tripcraft::poll", plan_id, "generation started");
        Ok(())
    }

    /// `GET /travel-plans/{id}/status`: one status check.
    pub async fn poll_status(&self, plan_id: i64) -> Result<StatusResponse> {
        let response = self
            .api
            .get_json(&format!("/travel-plans/{plan_id}/status"), &[])
            .await?;
        deserialize_lenient(response)
    }

    /// Full plan detail. A 403/404 from the private endpoint is the
    /// expected "not owner / not logged in" condition, not a fault: it
    /// transparently falls back to the public endpoint.
    pub async fn plan_detail(&self, plan_id: i64) -> Result<PlanDetail> {
        match self
            .api
            .get_json(&format!("/travel-plans/{plan_id}"), &[])
            .await
        {
            Ok(value) => Ok(PlanDetail {
                plan: deserialize_lenient::<Plan>(value)?,
                is_public_view: false,
            }),
            Err(PlannerError::Api { status, .. }) if status == 403 || status == 404 => {
                info!(target: "tripcraft::http", plan_id, status, "falling back to public detail");
                let value = self
                    .api
                    .get_json(&format!("/travel-plans/{plan_id}/public"), &[])
                    .await?;
                Ok(PlanDetail {
                    plan: deserialize_lenient::<Plan>(value)?,
                    is_public_view: true,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// `POST /travel-plans/{id}/select-plan`.
    pub async fn select_plan(&self, plan_id: i64, plan_index: u32) -> Result<()> {
        self.api
            .post_json(
                &format!("/travel-plans/{plan_id}/select-plan"),
                Some(&json!({ "plan_index": plan_index })),
            )
            .await?;
        Ok(())
    }

    pub async fn publish(&self, plan_id: i64) -> Result<()> {
        self.api
            .put_json(&format!("/travel-plans/{plan_id}/publish"), None)
            .await?;
        Ok(())
    }

    pub async fn unpublish(&self, plan_id: i64) -> Result<()> {
        self.api
            .put_json(&format!("/travel-plans/{plan_id}/unpublish"), None)
            .await?;
        Ok(())
    }

    /// `GET /travel-plans/{id}/ratings`.
    pub async fn ratings(&self, plan_id: i64) -> Result<Vec<UserRating>> {
        let response = self
            .api
            .get_json(&format!("/travel-plans/{plan_id}/ratings"), &[])
            .await?;
        deserialize_lenient(response)
    }

    /// `GET /travel-plans/{id}/ratings/summary`.
    pub async fn rating_summary(&self, plan_id: i64) -> Result<RatingSummary> {
        let response = self
            .api
            .get_json(&format!("/travel-plans/{plan_id}/ratings/summary"), &[])
            .await?;
        deserialize_lenient(response)
    }

    /// `GET /travel-plans/{id}/ratings/me`: the viewer's own rating.
    pub async fn my_rating(&self, plan_id: i64) -> Result<UserRating> {
        let response = self
            .api
            .get_json(&format!("/travel-plans/{plan_id}/ratings/me"), &[])
            .await?;
        deserialize_lenient(response)
    }

    /// `POST /travel-plans/{id}/ratings`. One rating per (user, plan)
    /// pair is enforced server-side; the client only reflects the last
    /// server-returned state.
    pub async fn submit_rating(&self, plan_id: i64, score: u8, comment: &str) -> Result<()> {
        if !(1..=5).contains(&score) {
            return Err(PlannerError::Validation(format!(
                "rating score must be 1-5, got {score}"
            )));
        }
        self.api
            .post_json(
                &format!("/travel-plans/{plan_id}/ratings"),
                Some(&json!({ "score": score, "comment": comment })),
            )
            .await?;
        Ok(())
    }

    /// `GET /travel-plans/{id}/text-plan?max_chars=N`: plain-language
    /// summary. Response has been both a bare string and an object
    /// with a text field over backend versions.
    pub async fn text_plan(&self, plan_id: i64, max_chars: u32) -> Result<String> {
        let response = self
            .api
            .get_json(
                &format!("/travel-plans/{plan_id}/text-plan"),
                &[("max_chars".to_string(), max_chars.to_string())],
            )
            .await?;
        Ok(extract_text(&response))
    }

    /// Authenticated listing, `GET /travel-plans/`.
    pub async fn plans(&self, query: &PlanQuery) -> Result<PlanPage> {
        let response = self
            .api
            .get_json("/travel-plans/", &query.to_query_pairs())
            .await?;
        PlanPage::from_value(response)
    }

    /// Public listing, `GET /travel-plans/public`.
    pub async fn public_plans(&self, query: &PlanQuery) -> Result<PlanPage> {
        let response = self
            .api
            .get_json("/travel-plans/public", &query.to_query_pairs())
            .await?;
        PlanPage::from_value(response)
    }

    /// `GET /travel-plans/{id}/export?format=...`: raw document bytes.
    pub async fn export(&self, plan_id: i64, format: ExportFormat) -> Result<Vec<u8>> {
        self.api
            .get_bytes(
                &format!("/travel-plans/{plan_id}/export"),
                &[("format".to_string(), format.as_str().to_string())],
            )
            .await
    }
}

fn extract_plan_id(response: &Value) -> Option<i64> {
    match response {
        Value::Number(n) => n.as_i64(),
        _ => response
            .get("id")
            .or_else(|| response.get("plan_id"))
            .and_then(Value::as_i64),
    }
}

fn extract_text(response: &Value) -> String {
    match response {
        Value::String(s) => s.clone(),
        Value::Object(map) => ["text", "text_plan", "content"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Serializes text-summary fetches for a detail view. When a fetch for
/// a different plan id supersedes an in-flight one, the stale result
/// is discarded on arrival; dropping the in-flight future (view
/// teardown) cancels the underlying request.
#[derive(Clone, Debug)]
pub struct TextPlanFetcher {
    client: PlanClient,
    guard: Arc<RequestGuard>,
}

impl TextPlanFetcher {
    pub fn new(client: PlanClient) -> Self {
        Self {
            client,
            guard: Arc::new(RequestGuard::new()),
        }
    }

    /// Fetch the text summary; `Ok(None)` means the response arrived
    /// after a newer request superseded it and was discarded.
    pub async fn fetch(&self, plan_id: i64, max_chars: u32) -> Result<Option<String>> {
        let ticket = self.guard.issue();
        let text = self.client.text_plan(plan_id, max_chars).await?;
        if !self.guard.is_current(ticket) {
            info!(target: "tripcraft::http", plan_id, "discarding superseded text-plan response");
            return Ok(None);
        }
        Ok(Some(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plan_id_shapes() {
        assert_eq!(extract_plan_id(&json!(12)), Some(12));
        assert_eq!(extract_plan_id(&json!({ "id": 3 })), Some(3));
        assert_eq!(extract_plan_id(&json!({ "plan_id": 9 })), Some(9));
        assert_eq!(extract_plan_id(&json!({ "status": "ok" })), None);
    }

    #[test]
    fn test_extract_text_shapes() {
        assert_eq!(extract_text(&json!("三日游概览")), "三日游概览");
        assert_eq!(extract_text(&json!({ "text": "概览" })), "概览");
        assert_eq!(extract_text(&json!({ "text_plan": "概览" })), "概览");
        assert_eq!(extract_text(&json!(null)), "");
    }
}
