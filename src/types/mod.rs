pub mod plan;
pub mod request;

pub use plan::{
    CostBreakdown, ExportFormat, Plan, PlanDetail, PlanPage, PlanStatus, PlanSummary,
    RatingSummary, StatusResponse, UserRating,
};
pub use request::{BudgetTier, GenerationOptions, PlanQuery, TravelRequest};
