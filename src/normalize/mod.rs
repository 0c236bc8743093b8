//! Canonicalization of heterogeneously-shaped itinerary JSON.
//!
//! The backend's plan payloads have drifted across several schema
//! versions: the same concept may arrive as a string, an object, an
//! array, or be absent. Every function in this module is total — it
//! never fails on `null` or wrong-typed input, it only substitutes
//! defined defaults — so rendering code downstream never needs
//! defensive type-checking.

pub mod dishes;
pub mod format;
pub mod itinerary;
pub mod timeline;
pub mod transport;
pub mod value;

pub use dishes::{normalize_dishes, Dish};
pub use format::{format_distance, format_distance_value, format_price};
pub use itinerary::{
    normalize_day, normalize_variant, Attraction, Meal, NormalizedDay, NormalizedVariant,
    ScheduleEntry,
};
pub use timeline::{merge_timeline, time_sort_key, TimelineItem};
pub use transport::{transport_label, Transportation};
pub use value::{as_list, number_or, string_or};
