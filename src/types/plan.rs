use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PlannerError, Result};

/// Server-owned plan lifecycle status. The client never computes
/// transitions locally, it only observes them via polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Draft,
    Generating,
    Completed,
    Failed,
    Archived,
    /// Statuses this client version does not know about. Treated as
    /// non-terminal so the polling loop keeps watching.
    #[serde(other)]
    Unknown,
}

impl PlanStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlanStatus::Completed | PlanStatus::Failed)
    }
}

impl Default for PlanStatus {
    fn default() -> Self {
        PlanStatus::Draft
    }
}

/// Response of `GET /travel-plans/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: PlanStatus,
    #[serde(default, deserialize_with = "lenient_list")]
    pub generated_plans: Vec<Value>,
}

/// Full plan record as returned by the detail endpoints. Variant
/// itineraries stay as raw JSON and are normalized on demand, since
/// their shape has drifted across backend schema versions.
#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub duration_days: u32,
    #[serde(default)]
    pub status: PlanStatus,
    #[serde(default, deserialize_with = "lenient_list")]
    pub generated_plans: Vec<Value>,
    #[serde(default)]
    pub selected_plan_index: Option<u32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score: f64,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// A fetched plan plus how it was reached. `is_public_view` is set when
/// the private endpoint refused access and the public fallback served
/// the record instead.
#[derive(Debug, Clone)]
pub struct PlanDetail {
    pub plan: Plan,
    pub is_public_view: bool,
}

/// Listing row; tolerates partially-filled records.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanSummary {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub duration_days: u32,
    #[serde(default)]
    pub status: PlanStatus,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub score: f64,
}

/// One page of the plan listing. The backend has returned both a bare
/// array and `{items/plans/data, total}` envelopes over time.
#[derive(Debug, Clone, Default)]
pub struct PlanPage {
    pub items: Vec<PlanSummary>,
    pub total: u64,
}

impl PlanPage {
    pub fn from_value(value: Value) -> Result<Self> {
        if value.is_array() {
            let items: Vec<PlanSummary> = deserialize_lenient(value)?;
            let total = items.len() as u64;
            return Ok(Self { items, total });
        }
        let total = value.get("total").and_then(Value::as_u64);
        for key in ["items", "plans", "data"] {
            if let Some(list) = value.get(key) {
                let items: Vec<PlanSummary> = deserialize_lenient(list.clone())?;
                let total = total.unwrap_or(items.len() as u64);
                return Ok(Self { items, total });
            }
        }
        Ok(Self::default())
    }
}

/// Per-variant cost breakdown, normalized to non-negative amounts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    #[serde(default)]
    pub flight: f64,
    #[serde(default)]
    pub hotel: f64,
    #[serde(default)]
    pub attractions: f64,
    #[serde(default)]
    pub meals: f64,
    #[serde(default)]
    pub transportation: f64,
    #[serde(default)]
    pub total: f64,
}

/// Aggregate rating of a plan.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatingSummary {
    #[serde(default)]
    pub average: f64,
    #[serde(default)]
    pub count: u64,
}

/// The current viewer's rating of a plan.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UserRating {
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub comment: String,
}

/// Supported export targets of `GET /travel-plans/{id}/export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Json,
    Html,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
        }
    }
}

/// `null` or a bare scalar where a list is expected is an observed
/// legacy shape, not an error.
fn lenient_list<'de, D>(deserializer: D) -> std::result::Result<Vec<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(crate::normalize::value::as_list(Some(&value)))
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(crate::normalize::value::number_or(Some(&value), 0.0))
}

/// Deserialize a backend payload, reporting the JSON path of the first
/// offending field on failure.
pub fn deserialize_lenient<T>(value: Value) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let raw = value.to_string();
    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() {
            "<root>".to_string()
        } else {
            path
        };
        PlannerError::Validation(format!("failed to deserialize response at {location}: {err}"))
    })
}
