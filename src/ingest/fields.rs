use serde_json::{Map, Value};

/// First present, non-null value among `keys`.
pub(crate) fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// Read a numeric cell. Accepts JSON numbers and strings such as `"1,234.5"`
/// (thousands separators are stripped). `Ok(None)` means absent or null.
pub(crate) fn number(value: Option<&Value>) -> Result<Option<f64>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("{} is out of range", n)),
        Some(Value::String(s)) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            if cleaned.is_empty() {
                return Ok(None);
            }
            match cleaned.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Some(v)),
                _ => Err(format!("'{}' is not a number", s)),
            }
        }
        Some(other) => Err(format!("expected a number, got {}", other)),
    }
}

/// Read a text cell. Numbers are accepted and rendered as text, so a numeric
/// id such as `1042` keys the same as `"1042"`.
pub(crate) fn text(value: Option<&Value>) -> Result<Option<String>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(format!("expected text, got {}", other)),
    }
}
