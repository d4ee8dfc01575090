// src/common/coerce.rs

// ---
// Coerções permissivas usadas pelos mappers.
// ---
// Nenhuma destas funções falha: entrada inválida vira `None`, `[]` ou `{}`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Interpreta qualquer valor "parecido com data".
///
/// Aceita RFC 3339, timestamps do Postgres (`2024-01-01 10:00:00+00`),
/// datas simples `YYYY-MM-DD` (meia-noite UTC) e epoch em milissegundos.
pub fn coerce_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => parse_datetime_str(raw),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

pub fn parse_datetime_str(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Colunas JSON chegam já como array, como string JSON, ou como lixo.
pub fn parse_json_array(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

pub fn parse_json_object(value: &Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map.clone(),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}

/// Escalares viram texto; null, arrays e objetos não.
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "t"),
        _ => false,
    }
}

pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

pub fn coerce_u64(value: &Value) -> Option<u64> {
    coerce_f64(value).filter(|f| *f >= 0.0).map(|f| f.round() as u64)
}

/// Lista de strings a partir de um array (ou string JSON); itens não escalares são ignorados.
pub fn coerce_string_list(value: &Value) -> Vec<String> {
    parse_json_array(value)
        .iter()
        .filter_map(coerce_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn parses_common_date_shapes() {
        let rfc = coerce_datetime(&json!("2024-03-05T10:15:00Z")).unwrap();
        assert_eq!((rfc.year(), rfc.month(), rfc.day(), rfc.hour()), (2024, 3, 5, 10));

        let pg = coerce_datetime(&json!("2024-03-05 10:15:00.123+00")).unwrap();
        assert_eq!(pg.minute(), 15);

        let plain = coerce_datetime(&json!("2024-03-05")).unwrap();
        assert_eq!(plain.hour(), 0);

        let millis = coerce_datetime(&json!(0)).unwrap();
        assert_eq!(millis.year(), 1970);
    }

    #[test]
    fn invalid_dates_become_none() {
        assert!(coerce_datetime(&json!("not a date")).is_none());
        assert!(coerce_datetime(&json!("2024-13-45")).is_none());
        assert!(coerce_datetime(&json!("")).is_none());
        assert!(coerce_datetime(&Value::Null).is_none());
        assert!(coerce_datetime(&json!({"a": 1})).is_none());
    }

    #[test]
    fn json_columns_tolerate_strings_and_garbage() {
        assert_eq!(parse_json_array(&json!([1, 2])).len(), 2);
        assert_eq!(parse_json_array(&json!("[\"a\"]")).len(), 1);
        assert!(parse_json_array(&json!("{oops")).is_empty());
        assert!(parse_json_array(&json!({"a": 1})).is_empty());

        assert_eq!(parse_json_object(&json!("{\"a\": 1}")).len(), 1);
        assert!(parse_json_object(&json!("[1]")).is_empty());
        assert!(parse_json_object(&Value::Null).is_empty());
    }

    #[test]
    fn scalar_coercions() {
        assert_eq!(coerce_string(&json!(42)).as_deref(), Some("42"));
        assert_eq!(coerce_string(&Value::Null), None);
        assert!(coerce_bool(&json!("true")));
        assert!(coerce_bool(&json!(1)));
        assert!(!coerce_bool(&json!("nope")));
        assert_eq!(coerce_u64(&json!("2048")), Some(2048));
        assert_eq!(coerce_u64(&json!(-3)), None);
        assert_eq!(coerce_string_list(&json!("[\"SMF1\", 3, null]")), vec!["SMF1", "3"]);
    }
}
