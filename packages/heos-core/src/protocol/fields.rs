//! Tolerant field extraction from loosely-typed JSON messages.
//!
//! Every helper returns `None` for a missing path or an unexpected shape.
//! Nothing here fails: absence is an ordinary outcome for protocol fields.

use serde_json::Value;

/// Follows `path` through nested objects.
///
/// Missing intermediate keys and non-object intermediates both yield `None`.
#[must_use]
pub fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, key| node.as_object()?.get(*key))
}

/// Returns a non-empty string, accepting numbers and booleans in text form.
#[must_use]
pub fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Returns a non-negative integer from a JSON number or a numeric string.
///
/// Fractional values are truncated; negative and non-finite values are rejected.
#[must_use]
pub fn unsigned(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            })
        }
        _ => None,
    }
}

/// Returns a volume level clamped to 0-100.
#[must_use]
pub fn level(value: Option<&Value>) -> Option<u8> {
    unsigned(value).map(|v| v.min(100) as u8)
}

/// Returns a HEOS on/off flag.
#[must_use]
pub fn on_off(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "on" | "true" | "1" => Some(true),
            "off" | "false" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_u64().map(|n| n != 0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_follows_nested_objects() {
        let v = json!({"heos": {"command": {"command": "get_players"}}});
        assert_eq!(
            lookup(&v, &["heos", "command", "command"]),
            Some(&json!("get_players"))
        );
    }

    #[test]
    fn lookup_missing_or_non_object_yields_none() {
        let v = json!({"heos": {"command": "flat"}, "payload": [1, 2]});
        assert_eq!(lookup(&v, &["heos", "message", "parsed"]), None);
        assert_eq!(lookup(&v, &["heos", "command", "command"]), None);
        assert_eq!(lookup(&v, &["payload", "0"]), None);
        assert_eq!(lookup(&json!(null), &["heos"]), None);
    }

    #[test]
    fn unsigned_accepts_numbers_and_numeric_strings() {
        assert_eq!(unsigned(Some(&json!(12_000))), Some(12_000));
        assert_eq!(unsigned(Some(&json!("12000"))), Some(12_000));
        assert_eq!(unsigned(Some(&json!(125.4))), Some(125));
        assert_eq!(unsigned(Some(&json!(-3))), None);
        assert_eq!(unsigned(Some(&json!("abc"))), None);
        assert_eq!(unsigned(None), None);
    }

    #[test]
    fn level_is_clamped() {
        assert_eq!(level(Some(&json!("35"))), Some(35));
        assert_eq!(level(Some(&json!(250))), Some(100));
    }

    #[test]
    fn on_off_parses_heos_flags() {
        assert_eq!(on_off(Some(&json!("on"))), Some(true));
        assert_eq!(on_off(Some(&json!("off"))), Some(false));
        assert_eq!(on_off(Some(&json!("maybe"))), None);
    }
}
