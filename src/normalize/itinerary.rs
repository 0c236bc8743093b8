use serde_json::Value;

use super::dishes::{normalize_dishes, Dish};
use super::transport::Transportation;
use super::value::{as_list, first_present, number_or, string_list, string_or};
use crate::types::plan::CostBreakdown;

/// One scheduled activity with every display field defaulted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleEntry {
    pub time: String,
    pub activity: String,
    pub location: String,
    pub description: String,
    pub cost: f64,
    pub tips: String,
}

impl ScheduleEntry {
    /// A bare string becomes the description; a null entry becomes the
    /// 行程 N placeholder so the timeline keeps its slot.
    fn from_value(entry: &Value, position: usize) -> Self {
        match entry {
            Value::String(s) => Self {
                description: s.clone(),
                ..Default::default()
            },
            Value::Object(map) => Self {
                time: string_or(map.get("time").or_else(|| map.get("start_time")), ""),
                activity: string_or(map.get("activity").or_else(|| map.get("title")), ""),
                location: string_or(map.get("location"), ""),
                description: string_or(map.get("description"), ""),
                cost: number_or(map.get("cost"), 0.0),
                tips: string_or(map.get("tips"), ""),
            },
            _ => Self {
                activity: format!("行程 {}", position + 1),
                ..Default::default()
            },
        }
    }
}

/// Attraction record; a bare string is promoted to `{name}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attraction {
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: f64,
    pub rating: f64,
    pub opening_hours: String,
    pub highlights: Vec<String>,
    pub tips: String,
}

impl Attraction {
    fn from_value(entry: &Value) -> Self {
        match entry {
            Value::String(s) => Self {
                name: s.clone(),
                ..Default::default()
            },
            Value::Object(map) => Self {
                name: string_or(map.get("name"), ""),
                category: string_or(map.get("category"), ""),
                description: string_or(map.get("description"), ""),
                price: number_or(map.get("price").or_else(|| map.get("ticket_price")), 0.0),
                rating: number_or(map.get("rating"), 0.0),
                opening_hours: string_or(map.get("opening_hours"), ""),
                highlights: string_list(map.get("highlights")),
                tips: string_or(map.get("tips"), ""),
            },
            _ => Self::default(),
        }
    }
}

/// Meal record; a bare string is kept as the description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Meal {
    pub meal_type: String,
    pub name: String,
    pub time: String,
    pub address: String,
    pub description: String,
    pub cost: f64,
    pub cuisine: String,
    pub recommended_dishes: Vec<Dish>,
}

impl Meal {
    fn from_value(entry: &Value) -> Self {
        match entry {
            Value::String(s) => Self {
                description: s.clone(),
                ..Default::default()
            },
            Value::Object(map) => Self {
                meal_type: string_or(map.get("type").or_else(|| map.get("meal_type")), ""),
                name: string_or(map.get("name").or_else(|| map.get("restaurant")), ""),
                time: string_or(map.get("time"), ""),
                address: string_or(map.get("address"), ""),
                description: string_or(map.get("description"), ""),
                cost: number_or(map.get("cost").or_else(|| map.get("price")), 0.0),
                cuisine: string_or(map.get("cuisine"), ""),
                recommended_dishes: normalize_dishes(entry),
            },
            _ => Self::default(),
        }
    }
}

/// One day of a plan variant, canonicalized: every field has a fixed
/// shape and a defined default regardless of how the backend sent it.
#[derive(Debug, Clone, Default)]
pub struct NormalizedDay {
    pub day: u32,
    pub date: String,
    pub schedule: Vec<ScheduleEntry>,
    pub attractions: Vec<Attraction>,
    pub meals: Vec<Meal>,
    pub transportation: Transportation,
    pub estimated_cost: f64,
    pub tips: Vec<String>,
}

/// Normalize one day's raw JSON. Total: any input shape, including
/// null, yields a well-formed day.
pub fn normalize_day(raw: &Value, position: usize) -> NormalizedDay {
    let day = number_or(raw.get("day"), (position + 1) as f64) as u32;
    NormalizedDay {
        day,
        date: string_or(raw.get("date"), ""),
        schedule: as_list(raw.get("schedule"))
            .iter()
            .enumerate()
            .map(|(i, entry)| ScheduleEntry::from_value(entry, i))
            .collect(),
        attractions: as_list(raw.get("attractions"))
            .iter()
            .map(Attraction::from_value)
            .collect(),
        meals: as_list(raw.get("meals"))
            .iter()
            .map(Meal::from_value)
            .collect(),
        transportation: Transportation::from_value(raw.get("transportation")),
        estimated_cost: number_or(first_present(raw, &["estimated_cost", "daily_cost"]), 0.0),
        tips: string_list(first_present(raw, &["tips", "daily_tips"])),
    }
}

/// One generated plan variant with its days normalized and the cost
/// breakdown coerced to plain numbers.
#[derive(Debug, Clone, Default)]
pub struct NormalizedVariant {
    pub plan_type: String,
    pub title: String,
    pub score: f64,
    pub costs: CostBreakdown,
    pub days: Vec<NormalizedDay>,
    pub hotel: Option<Value>,
    pub flight: Option<Value>,
    pub restaurants: Vec<Value>,
    pub weather: String,
    pub social_notes: Vec<String>,
}

pub fn normalize_variant(raw: &Value) -> NormalizedVariant {
    let costs = raw.get("total_cost").or_else(|| raw.get("costs"));
    let cost_field = |key: &str| number_or(costs.and_then(|c| c.get(key)), 0.0);
    NormalizedVariant {
        plan_type: string_or(first_present(raw, &["type", "plan_type"]), ""),
        title: string_or(raw.get("title"), ""),
        score: number_or(raw.get("score"), 0.0),
        costs: CostBreakdown {
            flight: cost_field("flight"),
            hotel: cost_field("hotel"),
            attractions: cost_field("attractions"),
            meals: cost_field("meals"),
            transportation: cost_field("transportation"),
            total: cost_field("total"),
        },
        days: as_list(first_present(raw, &["daily_itinerary", "days"]))
            .iter()
            .enumerate()
            .map(|(i, day)| normalize_day(day, i))
            .collect(),
        hotel: raw.get("hotel").filter(|v| !v.is_null()).cloned(),
        flight: raw.get("flight").filter(|v| !v.is_null()).cloned(),
        restaurants: as_list(raw.get("restaurants")),
        weather: string_or(first_present(raw, &["weather", "weather_summary"]), ""),
        social_notes: string_list(first_present(raw, &["social_notes", "xhs_notes"])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_day_from_null_is_well_formed() {
        let day = normalize_day(&json!(null), 2);
        assert_eq!(day.day, 3);
        assert!(day.schedule.is_empty());
        assert_eq!(day.transportation, Transportation::None);
        assert_eq!(day.estimated_cost, 0.0);
    }

    #[test]
    fn test_bare_string_attraction() {
        let day = normalize_day(&json!({ "attractions": ["外滩", { "name": "豫园", "price": "40" }] }), 0);
        assert_eq!(day.attractions.len(), 2);
        assert_eq!(day.attractions[0].name, "外滩");
        assert_eq!(day.attractions[0].price, 0.0);
        assert_eq!(day.attractions[1].price, 40.0);
    }

    #[test]
    fn test_scalar_schedule_is_wrapped() {
        let day = normalize_day(&json!({ "schedule": "自由活动" }), 0);
        assert_eq!(day.schedule.len(), 1);
        assert_eq!(day.schedule[0].description, "自由活动");
    }

    #[test]
    fn test_null_schedule_entry_gets_placeholder() {
        let day = normalize_day(&json!({ "schedule": [null, { "activity": "看展" }] }), 0);
        assert_eq!(day.schedule[0].activity, "行程 1");
        assert_eq!(day.schedule[1].activity, "看展");
    }

    #[test]
    fn test_meal_string_and_object() {
        let day = normalize_day(
            &json!({ "meals": ["路边摊", { "type": "dinner", "name": "老字号", "cost": "88" }] }),
            0,
        );
        assert_eq!(day.meals[0].description, "路边摊");
        assert_eq!(day.meals[1].meal_type, "dinner");
        assert_eq!(day.meals[1].cost, 88.0);
    }

    #[test]
    fn test_variant_costs_default_to_zero() {
        let variant = normalize_variant(&json!({
            "type": "budget",
            "total_cost": { "hotel": "1200", "total": 3000 }
        }));
        assert_eq!(variant.costs.hotel, 1200.0);
        assert_eq!(variant.costs.total, 3000.0);
        assert_eq!(variant.costs.flight, 0.0);
        assert!(variant.days.is_empty());
    }
}
