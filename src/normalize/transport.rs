use serde_json::Value;

use super::value::{as_list, string_or};

/// Fixed code→label table for transport modes. Unknown codes pass
/// through unchanged; a missing type renders as the generic "交通".
pub fn transport_label(code: Option<&str>) -> String {
    let Some(code) = code else {
        return "交通".to_string();
    };
    match code {
        "flight" | "plane" => "飞机",
        "train" => "火车",
        "high_speed_rail" => "高铁",
        "subway" | "metro" => "地铁",
        "bus" => "公交",
        "taxi" => "出租车",
        "car" | "driving" => "自驾",
        "walk" | "walking" => "步行",
        "bike" | "cycling" => "骑行",
        "ferry" => "轮渡",
        other => return other.to_string(),
    }
    .to_string()
}

/// One concrete transport step with defaulted display fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportLeg {
    pub label: String,
    pub from: String,
    pub to: String,
    pub duration: String,
    pub cost: f64,
    pub description: String,
}

impl TransportLeg {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self {
                label: "交通".to_string(),
                description: s.clone(),
                ..Default::default()
            },
            Value::Object(map) => {
                let code = map
                    .get("type")
                    .or_else(|| map.get("mode"))
                    .and_then(Value::as_str);
                Self {
                    label: transport_label(code),
                    from: string_or(map.get("from"), ""),
                    to: string_or(map.get("to"), ""),
                    duration: string_or(map.get("duration"), ""),
                    cost: super::value::number_or(map.get("cost"), 0.0),
                    description: string_or(map.get("description"), ""),
                }
            }
            _ => Self::default(),
        }
    }

    pub fn display_line(&self) -> String {
        let mut line = self.label.clone();
        if !self.from.is_empty() || !self.to.is_empty() {
            line.push_str(&format!(" {} → {}", self.from, self.to));
        }
        if !self.duration.is_empty() {
            line.push_str(&format!(" ({})", self.duration));
        }
        if !self.description.is_empty() {
            if line.is_empty() {
                line = self.description.clone();
            } else {
                line.push_str(&format!(" {}", self.description));
            }
        }
        line
    }
}

/// A day's transportation, canonicalized from the shapes observed
/// across backend versions: absent, free text, a single record, an
/// array of records, or `{primary_routes, backup_routes}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Transportation {
    None,
    Note(String),
    Single(TransportLeg),
    Multi(Vec<TransportLeg>),
    Routed {
        primary: Vec<TransportLeg>,
        backup: Vec<TransportLeg>,
    },
}

impl Default for Transportation {
    fn default() -> Self {
        Transportation::None
    }
}

impl Transportation {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Transportation::None,
            Some(Value::String(s)) if s.trim().is_empty() => Transportation::None,
            Some(Value::String(s)) => Transportation::Note(s.clone()),
            Some(Value::Array(items)) => {
                Transportation::Multi(items.iter().map(TransportLeg::from_value).collect())
            }
            Some(value @ Value::Object(map)) => {
                if map.contains_key("primary_routes") || map.contains_key("backup_routes") {
                    Transportation::Routed {
                        primary: as_list(map.get("primary_routes"))
                            .iter()
                            .map(TransportLeg::from_value)
                            .collect(),
                        backup: as_list(map.get("backup_routes"))
                            .iter()
                            .map(TransportLeg::from_value)
                            .collect(),
                    }
                } else {
                    Transportation::Single(TransportLeg::from_value(value))
                }
            }
            Some(_) => Transportation::None,
        }
    }

    /// Flatten to display lines; the absent case keeps the literal 暂无.
    pub fn display_lines(&self) -> Vec<String> {
        match self {
            Transportation::None => vec!["暂无".to_string()],
            Transportation::Note(text) => vec![text.clone()],
            Transportation::Single(leg) => vec![leg.display_line()],
            Transportation::Multi(legs) => legs.iter().map(TransportLeg::display_line).collect(),
            Transportation::Routed { primary, backup } => {
                let mut lines = Vec::new();
                for leg in primary {
                    lines.push(format!("主路线: {}", leg.display_line()));
                }
                for leg in backup {
                    lines.push(format!("备选: {}", leg.display_line()));
                }
                if lines.is_empty() {
                    lines.push("暂无".to_string());
                }
                lines
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transport_label_table() {
        assert_eq!(transport_label(Some("subway")), "地铁");
        assert_eq!(transport_label(Some("flight")), "飞机");
        assert_eq!(transport_label(Some("hyperloop")), "hyperloop");
        assert_eq!(transport_label(None), "交通");
    }

    #[test]
    fn test_null_becomes_none() {
        assert_eq!(Transportation::from_value(None), Transportation::None);
        assert_eq!(
            Transportation::from_value(Some(&json!(null))),
            Transportation::None
        );
        assert_eq!(
            Transportation::None.display_lines(),
            vec!["暂无".to_string()]
        );
    }

    #[test]
    fn test_single_object_shape() {
        let value = json!({ "type": "metro", "from": "酒店", "to": "外滩", "duration": "25分钟" });
        let normalized = Transportation::from_value(Some(&value));
        match normalized {
            Transportation::Single(leg) => {
                assert_eq!(leg.label, "地铁");
                assert_eq!(leg.display_line(), "地铁 酒店 → 外滩 (25分钟)");
            }
            other => panic!("expected Single, got {other:?}"),
        }
    }

    #[test]
    fn test_array_shape() {
        let value = json!([{ "type": "bus" }, "打车前往"]);
        match Transportation::from_value(Some(&value)) {
            Transportation::Multi(legs) => {
                assert_eq!(legs.len(), 2);
                assert_eq!(legs[0].label, "公交");
                assert_eq!(legs[1].description, "打车前往");
            }
            other => panic!("expected Multi, got {other:?}"),
        }
    }

    #[test]
    fn test_routed_shape() {
        let value = json!({
            "primary_routes": [{ "type": "subway" }],
            "backup_routes": { "type": "taxi" }
        });
        match Transportation::from_value(Some(&value)) {
            Transportation::Routed { primary, backup } => {
                assert_eq!(primary.len(), 1);
                // Scalar backup_routes is wrapped into a singleton list.
                assert_eq!(backup.len(), 1);
                assert_eq!(backup[0].label, "出租车");
            }
            other => panic!("expected Routed, got {other:?}"),
        }
    }
}
