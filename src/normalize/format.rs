use serde_json::Value;

/// Render a price with the fixed `¥` prefix. Zero is a valid,
/// displayable amount (a free attraction), not a missing one.
pub fn format_price(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("¥{}", amount as i64)
    } else {
        format!("¥{amount}")
    }
}

/// Format a distance in meters: under 1000 as integer meters, at or
/// above 1000 as kilometers with one decimal.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{}m", meters.round() as i64)
    } else {
        format!("{:.1}km", meters / 1000.0)
    }
}

/// Distance coming out of the backend may be a number (meters) or a
/// string with or without an explicit unit. An explicit `km`/`m`
/// suffix in the source wins over the numeric threshold.
pub fn format_distance_value(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n.as_f64().map(format_distance),
        Value::String(s) => format_distance_text(s),
        _ => None,
    }
}

fn format_distance_text(text: &str) -> Option<String> {
    let number = extract_number(text)?;
    let lower = text.to_ascii_lowercase();
    if lower.contains("km") || lower.contains("公里") || lower.contains("千米") {
        return Some(format_distance(number * 1000.0));
    }
    // Bare "m" (or 米) means the value is already meters, same as no unit.
    Some(format_distance(number))
}

/// First numeric run in a string, e.g. "约1200米" -> 1200.0.
fn extract_number(text: &str) -> Option<f64> {
    let mut out = String::new();
    let mut seen_digit = false;
    for ch in text.chars() {
        if ch.is_ascii_digit() {
            seen_digit = true;
            out.push(ch);
        } else if ch == '.' && seen_digit && !out.contains('.') {
            out.push(ch);
        } else if seen_digit {
            break;
        }
    }
    out.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_formatting() {
        assert_eq!(format_price(120.0), "¥120");
        assert_eq!(format_price(58.5), "¥58.5");
        assert_eq!(format_price(0.0), "¥0");
    }

    #[test]
    fn test_distance_buckets() {
        assert_eq!(format_distance(999.0), "999m");
        assert_eq!(format_distance(1000.0), "1.0km");
        assert_eq!(format_distance(1250.0), "1.3km");
    }

    #[test]
    fn test_distance_from_value() {
        assert_eq!(format_distance_value(&json!(999)), Some("999m".to_string()));
        assert_eq!(
            format_distance_value(&json!("1200")),
            Some("1.2km".to_string())
        );
        assert_eq!(
            format_distance_value(&json!("2km")),
            Some("2.0km".to_string())
        );
        assert_eq!(
            format_distance_value(&json!("500m")),
            Some("500m".to_string())
        );
        assert_eq!(
            format_distance_value(&json!("约1.5公里")),
            Some("1.5km".to_string())
        );
        assert_eq!(format_distance_value(&json!(null)), None);
        assert_eq!(format_distance_value(&json!("no digits")), None);
    }
}
