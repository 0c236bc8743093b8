use serde_json::Value;

/// Coerce a numeric-like value (number, numeric string, null) to `f64`.
/// Anything unparseable yields the caller-supplied fallback.
pub fn number_or(value: Option<&Value>, fallback: f64) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(fallback),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(fallback),
        _ => fallback,
    }
}

/// Coerce a value to an owned string, with a fallback for null/missing.
/// Numbers are stringified; other shapes fall back.
pub fn string_or(value: Option<&Value>, fallback: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => fallback.to_string(),
    }
}

/// Normalize a list-like value: an array stays as-is, null/missing
/// becomes empty, and a bare scalar is wrapped in a singleton list.
pub fn as_list(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items.clone(),
        None | Some(Value::Null) => Vec::new(),
        Some(other) => vec![other.clone()],
    }
}

/// First present, non-null field among several legacy names.
pub fn first_present<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find(|candidate| !candidate.is_null())
}

/// Collect a list of display strings, coercing scalar entries and
/// dropping anything with no usable text.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    as_list(value)
        .iter()
        .filter_map(|entry| match entry {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}
