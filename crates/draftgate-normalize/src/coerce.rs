//! Field-level coercion primitives.
//!
//! Every helper here is total: it returns `None` (or an empty `Vec`) for
//! anything it cannot accept, and never panics or errors. The record
//! normalizers are built entirely from these.

use serde_json::{Map, Value};

/// Look up the first present, non-null key among `keys`.
///
/// Drafts arrive with both snake_case and camelCase spellings; callers list
/// the canonical key first and aliases after it.
pub fn field<'v>(obj: &'v Map<String, Value>, keys: &[&str]) -> Option<&'v Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// The first key among `keys` whose value survives `coerce`.
///
/// A blank or malformed canonical key falls through to its aliases.
pub fn first_at<T>(
    obj: &Map<String, Value>,
    keys: &[&str],
    coerce: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    keys.iter().find_map(|k| obj.get(*k).and_then(&coerce))
}

/// A trimmed, non-empty string.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        _ => None,
    }
}

/// A trimmed string, or the display form of a finite number.
///
/// Used for identifiers, which planners emit as either `"S1"` or `1042`.
pub fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(_) => text(value),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64().filter(|f| f.is_finite()).map(|f| f.to_string())
            }
        }
        _ => None,
    }
}

/// A finite number, or a string holding one.
///
/// String input must parse completely after trimming; partial matches like
/// `"12 USD"` are rejected, as are `"NaN"` and `"inf"`.
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

/// A non-negative integral number that fits in `u32`.
pub fn whole(value: &Value) -> Option<u32> {
    let n = number(value)?;
    if n < 0.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
        return None;
    }
    Some(n as u32)
}

/// A JSON boolean, or the strings "true"/"false" in any case.
pub fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Normalize each element of an array independently, keeping the survivors.
///
/// A non-array value yields an empty list.
pub fn list_of<T>(value: Option<&Value>, mut each: impl FnMut(&Value) -> Option<T>) -> Vec<T> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(|item| each(item)).collect(),
        _ => Vec::new(),
    }
}

/// A list of trimmed, non-empty strings.
///
/// A bare string is treated as a one-element list.
pub fn text_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(_)) => value.and_then(text).into_iter().collect(),
        _ => list_of(value, text),
    }
}

/// Normalize a nested object, pruning it when nothing survives.
pub fn nested<T>(
    value: Option<&Value>,
    build: impl FnOnce(&Map<String, Value>) -> T,
    is_empty: impl FnOnce(&T) -> bool,
) -> Option<T> {
    let obj = value?.as_object()?;
    let record = build(obj);
    if is_empty(&record) {
        None
    } else {
        Some(record)
    }
}

/// Shorthand: a text field under any of `keys`.
pub fn text_at(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first_at(obj, keys, text)
}

/// Shorthand: a numeric field under any of `keys`.
pub fn number_at(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    first_at(obj, keys, number)
}

/// Shorthand: an identifier field under any of `keys`.
pub fn identifier_at(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first_at(obj, keys, identifier)
}

/// Shorthand: a non-negative integer field under any of `keys`.
pub fn whole_at(obj: &Map<String, Value>, keys: &[&str]) -> Option<u32> {
    first_at(obj, keys, whole)
}

/// Shorthand: a boolean field under any of `keys`.
pub fn flag_at(obj: &Map<String, Value>, keys: &[&str]) -> Option<bool> {
    first_at(obj, keys, flag)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_text_trims_and_drops_empty() {
        assert_eq!(text(&json!("  Bearings  ")), Some("Bearings".to_string()));
        assert_eq!(text(&json!("   ")), None);
        assert_eq!(text(&json!(42)), None);
        assert_eq!(text(&Value::Null), None);
    }

    #[test]
    fn test_number_accepts_finite_and_strict_strings() {
        assert_eq!(number(&json!(88.1)), Some(88.1));
        assert_eq!(number(&json!(" 12.5 ")), Some(12.5));
        assert_eq!(number(&json!("1e3")), Some(1000.0));
        assert_eq!(number(&json!("12 USD")), None);
        assert_eq!(number(&json!("NaN")), None);
        assert_eq!(number(&json!("inf")), None);
        assert_eq!(number(&json!("")), None);
        assert_eq!(number(&json!(true)), None);
    }

    #[test]
    fn test_whole_requires_non_negative_integers() {
        assert_eq!(whole(&json!(3)), Some(3));
        assert_eq!(whole(&json!("7")), Some(7));
        assert_eq!(whole(&json!(2.5)), None);
        assert_eq!(whole(&json!(-1)), None);
    }

    #[test]
    fn test_identifier_accepts_strings_and_numbers() {
        assert_eq!(identifier(&json!("S1")), Some("S1".to_string()));
        assert_eq!(identifier(&json!(1042)), Some("1042".to_string()));
        assert_eq!(identifier(&json!("")), None);
        assert_eq!(identifier(&Value::Null), None);
        assert_eq!(identifier(&json!({ "id": "S1" })), None);
    }

    #[test]
    fn test_flag_accepts_bools_and_words() {
        assert_eq!(flag(&json!(true)), Some(true));
        assert_eq!(flag(&json!(" FALSE ")), Some(false));
        assert_eq!(flag(&json!("yes")), None);
    }

    #[test]
    fn test_field_skips_nulls_and_prefers_canonical_key() {
        let obj = json!({ "supplier_id": null, "supplierId": "S9", "id": "X" });
        let obj = obj.as_object().unwrap();
        assert_eq!(
            field(obj, &["supplier_id", "supplierId", "id"]),
            Some(&json!("S9"))
        );
    }

    #[test]
    fn test_aliases_back_up_unusable_canonical_keys() {
        let obj = json!({ "po_number": "   ", "poNumber": "PO-7", "unit_price": "n/a", "unitPrice": 4.5 });
        let obj = obj.as_object().unwrap();
        assert_eq!(text_at(obj, &["po_number", "poNumber"]), Some("PO-7".to_string()));
        assert_eq!(number_at(obj, &["unit_price", "unitPrice"]), Some(4.5));
        assert_eq!(whole_at(obj, &["line_number", "lineNumber"]), None);
    }

    #[test]
    fn test_text_list_drops_bad_elements_and_wraps_bare_strings() {
        let v = json!(["net 30", "", 5, "  FOB origin "]);
        assert_eq!(text_list(Some(&v)), vec!["net 30", "FOB origin"]);
        assert_eq!(text_list(Some(&json!("single"))), vec!["single"]);
        assert!(text_list(Some(&json!({ "a": 1 }))).is_empty());
        assert!(text_list(None).is_empty());
    }

    #[test]
    fn test_nested_prunes_empty_records() {
        let build = |obj: &Map<String, Value>| text_at(obj, &["name"]);
        let empty = json!({ "name": "  " });
        let full = json!({ "name": "Acme" });
        assert_eq!(nested(Some(&empty), build, |r| r.is_none()), None);
        assert_eq!(
            nested(Some(&full), build, |r| r.is_none()),
            Some(Some("Acme".to_string()))
        );
        assert_eq!(nested(Some(&json!([1, 2])), build, |r| r.is_none()), None);
    }
}
