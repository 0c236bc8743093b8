//! Fixed-delay polling loop that drives a server-side generation job
//! to a terminal state while surfacing progress and preview data.

use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::client::PlanClient;
use crate::error::Result;
use crate::normalize::value::as_list;
use crate::types::plan::{PlanStatus, StatusResponse};

/// Fixed delay between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(6);
/// Hard ceiling on poll attempts (15 minutes wall-clock at the default
/// interval). A safety valve against orphaned loops, not a cancellation
/// of the server job — the job may still finish after the client stops
/// watching.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 150;

/// Partial generation output surfaced while the plan is still
/// `generating`.
#[derive(Debug, Clone, Default)]
pub struct PreviewPayload {
    pub weather: Option<Value>,
    pub hotels: Vec<Value>,
    pub attractions: Vec<Value>,
    pub restaurants: Vec<Value>,
    pub flights: Vec<Value>,
    pub social_notes: Vec<Value>,
}

impl PreviewPayload {
    fn from_value(raw: &Value) -> Self {
        Self {
            weather: raw.get("weather").filter(|v| !v.is_null()).cloned(),
            hotels: as_list(raw.get("hotels")),
            attractions: as_list(raw.get("attractions")),
            restaurants: as_list(raw.get("restaurants")),
            flights: as_list(raw.get("flights")),
            social_notes: as_list(raw.get("social_notes").or_else(|| raw.get("xhs_notes"))),
        }
    }
}

/// State pushed to the caller on every tick.
#[derive(Debug, Clone)]
pub struct PollUpdate {
    pub attempt: u32,
    /// Synthetic, cosmetic progress: monotone, capped below 100 until
    /// a terminal state is observed.
    pub progress: f64,
    pub status: Option<PlanStatus>,
    pub preview: Option<PreviewPayload>,
}

/// Why the watch loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Completed,
    Failed,
    /// Attempt ceiling reached with no terminal status. The user should
    /// check the history view later; the server job was not cancelled.
    TimedOut,
}

/// Drives repeated status checks against one plan until a terminal
/// state or the attempt ceiling. Cancellation is dropping the `watch`
/// future: a torn-down caller leaks no timer.
#[derive(Clone, Debug)]
pub struct GenerationPoller {
    client: PlanClient,
    interval: Duration,
    max_attempts: u32,
}

impl GenerationPoller {
    pub fn new(client: PlanClient) -> Self {
        Self {
            client,
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Poll until terminal, invoking `on_update` once per tick with the
    /// current progress and preview (or its clearing). A network error
    /// on an individual tick is logged and swallowed — one transient
    /// failure must not abandon a multi-minute job.
    pub async fn watch<F>(&self, plan_id: i64, mut on_update: F) -> Result<PollOutcome>
    where
        F: FnMut(PollUpdate),
    {
        let mut attempts = 0u32;

        loop {
            tokio::time::sleep(self.interval).await;
            attempts += 1;
            let progress = synthetic_progress(attempts);

            match self.client.poll_status(plan_id).await {
                Ok(response) => match response.status {
                    PlanStatus::Completed => {
                        info!(target: "tripcraft::poll", plan_id, attempts, "generation completed");
                        on_update(PollUpdate {
                            attempt: attempts,
                            progress: 100.0,
                            status: Some(PlanStatus::Completed),
                            preview: None,
                        });
                        return Ok(PollOutcome::Completed);
                    }
                    PlanStatus::Failed => {
                        warn!(target: "tripcraft::poll", plan_id, attempts, "generation failed");
                        on_update(PollUpdate {
                            attempt: attempts,
                            progress,
                            status: Some(PlanStatus::Failed),
                            preview: None,
                        });
                        return Ok(PollOutcome::Failed);
                    }
                    status => {
                        let preview = if status == PlanStatus::Generating {
                            extract_preview(&response)
                        } else {
                            // Non-terminal, non-generating: keep polling,
                            // preview cleared.
                            None
                        };
                        on_update(PollUpdate {
                            attempt: attempts,
                            progress,
                            status: Some(status),
                            preview,
                        });
                    }
                },
                Err(err) => {
                    warn!(
                        target: "tripcraft::poll",
                        plan_id, attempts, error = %err,
                        "status check failed, continuing"
                    );
                }
            }

            if attempts >= self.max_attempts {
                warn!(target: "tripcraft::poll", plan_id, attempts, "poll ceiling reached");
                return Ok(PollOutcome::TimedOut);
            }
        }
    }
}

/// `min(10 + attempts * 0.6, 90)` — cosmetic only, not tied to actual
/// server progress.
pub fn synthetic_progress(attempts: u32) -> f64 {
    (10.0 + f64::from(attempts) * 0.6).min(90.0)
}

/// Preview entry: still generating, and the entry is flagged as a raw
/// data preview.
fn extract_preview(response: &StatusResponse) -> Option<PreviewPayload> {
    response
        .generated_plans
        .iter()
        .find(|entry| {
            entry.get("is_preview").and_then(Value::as_bool) == Some(true)
                && entry.get("preview_type").and_then(Value::as_str) == Some("raw_data_preview")
        })
        .map(PreviewPayload::from_value)
}
