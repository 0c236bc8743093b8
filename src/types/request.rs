use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::error::{PlannerError, Result};

/// Longest supported trip, inclusive of both endpoint dates.
pub const MAX_TRIP_DAYS: i64 = 10;

/// Integer-coded budget bucket understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetTier {
    Economy,
    Comfort,
    Premium,
    Luxury,
}

impl BudgetTier {
    pub fn code(&self) -> u8 {
        match self {
            BudgetTier::Economy => 1,
            BudgetTier::Comfort => 2,
            BudgetTier::Premium => 3,
            BudgetTier::Luxury => 4,
        }
    }
}

impl std::str::FromStr for BudgetTier {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "economy" | "1" => Ok(BudgetTier::Economy),
            "comfort" | "2" => Ok(BudgetTier::Comfort),
            "premium" | "3" => Ok(BudgetTier::Premium),
            "luxury" | "4" => Ok(BudgetTier::Luxury),
            other => Err(PlannerError::Validation(format!(
                "unknown budget tier: {other}"
            ))),
        }
    }
}

/// User input for one plan submission. Created once, never mutated,
/// sent as the body of the create-plan call.
#[derive(Debug, Clone)]
pub struct TravelRequest {
    pub title: Option<String>,
    pub departure: Option<String>,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: BudgetTier,
    pub travelers: u32,
    pub transportation: Option<String>,
    pub interests: Vec<String>,
    pub food_preferences: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub age_groups: Vec<String>,
    pub special_requirements: Option<String>,
}

impl TravelRequest {
    pub fn new(destination: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            title: None,
            departure: None,
            destination: destination.into(),
            start_date,
            end_date,
            budget: BudgetTier::Comfort,
            travelers: 1,
            transportation: None,
            interests: Vec::new(),
            food_preferences: Vec::new(),
            dietary_restrictions: Vec::new(),
            age_groups: Vec::new(),
            special_requirements: None,
        }
    }

    /// Inclusive trip length in days.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Inline validation, run before any network call.
    pub fn validate(&self) -> Result<()> {
        if self.destination.trim().is_empty() {
            return Err(PlannerError::Validation(
                "destination must not be empty".to_string(),
            ));
        }
        if self.end_date < self.start_date {
            return Err(PlannerError::Validation(
                "end date must not precede start date".to_string(),
            ));
        }
        if self.duration_days() > MAX_TRIP_DAYS {
            return Err(PlannerError::Validation(format!(
                "trip length {} exceeds the {MAX_TRIP_DAYS}-day limit",
                self.duration_days()
            )));
        }
        if self.travelers < 1 {
            return Err(PlannerError::Validation(
                "traveler count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Body for `POST /travel-plans/`. Dates are serialized as
    /// `YYYY-MM-DD HH:mm:ss` to match the backend's expectation.
    pub fn to_create_body(&self) -> Value {
        let title = self
            .title
            .clone()
            .unwrap_or_else(|| format!("{} {}日游", self.destination, self.duration_days()));

        let mut body = json!({
            "title": title,
            "destination": self.destination,
            "start_date": format_date(self.start_date),
            "end_date": format_date(self.end_date),
            "duration_days": self.duration_days(),
            "budget": self.budget.code(),
            "preferences": {
                "interests": self.interests,
                "travelers": self.travelers,
                "foodPreferences": self.food_preferences,
                "dietaryRestrictions": self.dietary_restrictions,
                "ageGroups": self.age_groups,
            },
        });

        if let Some(departure) = &self.departure {
            body["departure"] = json!(departure);
        }
        if let Some(transportation) = &self.transportation {
            body["transportation"] = json!(transportation);
        }
        if let Some(requirements) = &self.special_requirements {
            body["requirements"] = json!({ "special_requirements": requirements });
        }

        body
    }
}

fn format_date(date: NaiveDate) -> String {
    format!("{} 00:00:00", date.format("%Y-%m-%d"))
}

/// Knobs for `POST /travel-plans/{id}/generate`.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub budget_priority: String,
    pub activity_preference: String,
    pub num_plans: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            budget_priority: "balanced".to_string(),
            activity_preference: "balanced".to_string(),
            num_plans: 3,
        }
    }
}

impl GenerationOptions {
    /// Body for the generate call, echoing the request's preference sets.
    pub fn to_body(&self, request: &TravelRequest) -> Value {
        json!({
            "preferences": {
                "budget_priority": self.budget_priority,
                "activity_preference": self.activity_preference,
                "travelers": request.travelers,
                "foodPreferences": request.food_preferences,
                "dietaryRestrictions": request.dietary_restrictions,
                "ageGroups": request.age_groups,
            },
            "requirements": request.special_requirements.clone().unwrap_or_default(),
            "num_plans": self.num_plans,
        })
    }
}

/// Filters for the paginated plan listing.
#[derive(Debug, Clone, Default)]
pub struct PlanQuery {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub keyword: Option<String>,
    pub min_score: Option<f64>,
    pub travel_from: Option<NaiveDate>,
    pub travel_to: Option<NaiveDate>,
}

impl PlanQuery {
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(skip) = self.skip {
            pairs.push(("skip".to_string(), skip.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(keyword) = &self.keyword {
            pairs.push(("keyword".to_string(), keyword.clone()));
        }
        if let Some(min_score) = self.min_score {
            pairs.push(("min_score".to_string(), min_score.to_string()));
        }
        if let Some(from) = self.travel_from {
            pairs.push(("travel_from".to_string(), from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.travel_to {
            pairs.push(("travel_to".to_string(), to.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_duration_is_inclusive() {
        let request = TravelRequest::new("Kyoto", date(2025, 4, 1), date(2025, 4, 3));
        assert_eq!(request.duration_days(), 3);
    }

    #[test]
    fn test_validate_rejects_long_trips() {
        let request = TravelRequest::new("Kyoto", date(2025, 4, 1), date(2025, 4, 11));
        assert_eq!(request.duration_days(), 11);
        assert!(request.validate().is_err());

        let request = TravelRequest::new("Kyoto", date(2025, 4, 1), date(2025, 4, 10));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_destination() {
        let request = TravelRequest::new("  ", date(2025, 4, 1), date(2025, 4, 2));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let request = TravelRequest::new("Kyoto", date(2025, 4, 5), date(2025, 4, 1));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_body_date_format() {
        let request = TravelRequest::new("Kyoto", date(2025, 4, 1), date(2025, 4, 3));
        let body = request.to_create_body();
        assert_eq!(body["start_date"], "2025-04-01 00:00:00");
        assert_eq!(body["end_date"], "2025-04-03 00:00:00");
        assert_eq!(body["duration_days"], 3);
        assert_eq!(body["preferences"]["travelers"], 1);
    }

    #[test]
    fn test_query_pairs_skip_unset_fields() {
        let query = PlanQuery {
            keyword: Some("beach".to_string()),
            limit: Some(20),
            ..Default::default()
        };
        let pairs = query.to_query_pairs();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&("keyword".to_string(), "beach".to_string())));
    }
}
