use serde_json::Value;

use super::value::{number_or, string_or};

/// One recommended dish with defaulted display fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dish {
    pub name: String,
    pub price: Option<f64>,
    pub taste: String,
    pub description: String,
}

/// Legacy field names for a restaurant's dish list, in priority order.
/// The first non-empty source wins; later ones are ignored even when
/// also present.
const DISH_SOURCES: [&str; 4] = [
    "signature_dishes",
    "menu_highlights",
    "specialties",
    "recommended_dishes",
];

/// Extract the recommended-dish list from a restaurant record. Each
/// source may be an array or a keyed object; entries may be bare
/// strings or structured records. Empty result means the section is
/// simply omitted from display.
pub fn normalize_dishes(restaurant: &Value) -> Vec<Dish> {
    for key in DISH_SOURCES {
        let Some(source) = restaurant.get(key) else {
            continue;
        };
        let dishes = collect_dishes(source);
        if !dishes.is_empty() {
            return dishes;
        }
    }
    Vec::new()
}

fn collect_dishes(source: &Value) -> Vec<Dish> {
    match source {
        Value::Array(items) => items.iter().filter_map(dish_entry).collect(),
        // Keyed-object variant: { "白切鸡": { "price": 48 }, ... } or
        // { "招牌": "白切鸡" }.
        Value::Object(map) => map
            .iter()
            .filter_map(|(name, detail)| keyed_dish_entry(name, detail))
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![Dish {
            name: s.clone(),
            ..Default::default()
        }],
        _ => Vec::new(),
    }
}

fn dish_entry(entry: &Value) -> Option<Dish> {
    match entry {
        Value::String(s) if !s.trim().is_empty() => Some(Dish {
            name: s.clone(),
            ..Default::default()
        }),
        Value::Object(map) => {
            let name = string_or(map.get("name"), "");
            if name.is_empty() {
                return None;
            }
            Some(Dish {
                name,
                price: map.get("price").map(|p| number_or(Some(p), 0.0)),
                taste: string_or(map.get("taste"), ""),
                description: string_or(map.get("description"), ""),
            })
        }
        _ => None,
    }
}

fn keyed_dish_entry(name: &str, detail: &Value) -> Option<Dish> {
    if name.trim().is_empty() {
        return None;
    }
    let mut dish = Dish {
        name: name.to_string(),
        ..Default::default()
    };
    match detail {
        Value::Object(map) => {
            dish.price = map.get("price").map(|p| number_or(Some(p), 0.0));
            dish.taste = string_or(map.get("taste"), "");
            dish.description = string_or(map.get("description"), "");
        }
        Value::String(s) => dish.description = s.clone(),
        Value::Number(n) => dish.price = n.as_f64(),
        _ => {}
    }
    Some(dish)
}
