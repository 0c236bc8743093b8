//! tripcraft-rs: a lightweight, type-safe Rust client for a
//! travel-itinerary planning backend.
//!
//! The backend generates candidate itineraries asynchronously; this
//! crate submits travel requests, drives the generation job to
//! completion with a bounded fixed-delay polling loop, and normalizes
//! the heterogeneously-shaped itinerary JSON the backend has produced
//! across its schema versions into one canonical in-memory shape.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use tripcraft_rs::{GenerationOptions, GenerationPoller, PlanClient, Session, TravelRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PlanClient::new(Session::from_env()?)?;
//!     let request = TravelRequest::new(
//!         "上海",
//!         NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2025, 4, 3).unwrap(),
//!     );
//!
//!     let plan_id = client.create_plan(&request).await?;
//!     client
//!         .start_generation(plan_id, &request, &GenerationOptions::default())
//!         .await?;
//!
//!     let outcome = GenerationPoller::new(client.clone())
//!         .watch(plan_id, |update| {
//!             println!("progress: {:.0}%", update.progress);
//!         })
//!         .await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod normalize;
pub mod poller;
pub mod types;

pub use client::{ApiClient, PlanClient, RequestGuard, Session, TextPlanFetcher};
pub use error::{PlannerError, Result};
pub use normalize::{
    format_distance, format_price, merge_timeline, normalize_day, normalize_variant,
    NormalizedDay, NormalizedVariant, TimelineItem, Transportation,
};
pub use poller::{
    synthetic_progress, GenerationPoller, PollOutcome, PollUpdate, PreviewPayload,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL,
};
pub use types::{
    BudgetTier, ExportFormat, GenerationOptions, Plan, PlanDetail, PlanPage, PlanQuery,
    PlanStatus, PlanSummary, RatingSummary, StatusResponse, TravelRequest, UserRating,
};

#[cfg(feature = "cli")]
pub mod cli;
