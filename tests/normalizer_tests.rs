use serde_json::json;
use tripcraft_rs::normalize::{
    format_distance_value, merge_timeline, normalize_day, normalize_dishes, normalize_variant,
    transport_label, TimelineItem, Transportation,
};

/// Every historical shape observed in plan payloads, thrown at the
/// normalizer at once. The contract: a fixed-shape result, no panic.
#[test]
fn test_malformed_variant_normalizes_without_panic() {
    let raw = json!({
        "type": "budget",
        "title": "经济型",
        "score": "4.2",
        "total_cost": { "hotel": "900", "total": null },
        "daily_itinerary": [
            {
                "day": 1,
                "date": "2025-05-01",
                "schedule": "全天自由活动",
                "attractions": ["沙面岛", { "name": "陈家祠", "price": "10", "rating": null }],
                "meals": null,
                "transportation": { "primary_routes": { "type": "subway" }, "backup_routes": null },
                "estimated_cost": "200"
            },
            null,
            {
                "schedule": [null, { "time": "09:30", "activity": "早茶" }],
                "transportation": "打车往返",
                "tips": "带伞"
            }
        ]
    });

    let variant = normalize_variant(&raw);
    assert_eq!(variant.score, 4.2);
    assert_eq!(variant.costs.hotel, 900.0);
    assert_eq!(variant.costs.total, 0.0);
    assert_eq!(variant.days.len(), 3);

    let day1 = &variant.days[0];
    assert_eq!(day1.schedule.len(), 1);
    assert_eq!(day1.attractions[1].price, 10.0);
    assert_eq!(day1.attractions[1].rating, 0.0);
    assert!(day1.meals.is_empty());
    assert!(matches!(day1.transportation, Transportation::Routed { .. }));
    assert_eq!(day1.estimated_cost, 200.0);

    // Null day still yields a well-formed record with its position.
    let day2 = &variant.days[1];
    assert_eq!(day2.day, 2);
    assert_eq!(day2.transportation.display_lines(), vec!["暂无"]);

    let day3 = &variant.days[2];
    assert_eq!(day3.schedule[0].activity, "行程 1");
    assert_eq!(day3.transportation, Transportation::Note("打车往返".to_string()));
    assert_eq!(day3.tips, vec!["带伞".to_string()]);
}

#[test]
fn test_distance_formatting_buckets() {
    assert_eq!(format_distance_value(&json!(999)), Some("999m".to_string()));
    assert_eq!(
        format_distance_value(&json!(1000)),
        Some("1.0km".to_string())
    );
    assert_eq!(
        format_distance_value(&json!("1200")),
        Some("1.2km".to_string())
    );
}

#[test]
fn test_dish_source_priority_end_to_end() {
    let restaurant = json!({
        "name": "老字号",
        "signature_dishes": ["A"],
        "specialties": ["B"]
    });
    let dishes = normalize_dishes(&restaurant);
    assert_eq!(dishes.len(), 1);
    assert_eq!(dishes[0].name, "A");
}

#[test]
fn test_transport_codes() {
    assert_eq!(transport_label(Some("subway")), "地铁");
    assert_eq!(transport_label(Some("hyperloop")), "hyperloop");
}

#[test]
fn test_timeline_merges_meals_and_schedule_chronologically() {
    let day = normalize_day(
        &json!({
            "schedule": [
                { "time": "14:00-16:00", "activity": "博物馆" },
                { "time": "下午5点", "activity": "江边散步" }
            ],
            "meals": [
                { "time": "08:00", "type": "breakfast", "name": "早茶" },
                { "time": "18:30", "type": "dinner", "name": "晚饭" }
            ]
        }),
        0,
    );
    let order: Vec<String> = merge_timeline(&day)
        .iter()
        .map(|item| match item {
            TimelineItem::Activity(e) => e.activity.clone(),
            TimelineItem::Meal(m) => m.name.clone(),
        })
        .collect();
    assert_eq!(order, vec!["早茶", "博物馆", "江边散步", "晚饭"]);
}
