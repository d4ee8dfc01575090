// src/api/raw.rs

// ---
// RawRow: a fronteira entre o formato de fio e o modelo em memória
// ---
// Uma linha crua da API (chaves snake_case, tipos soltos). Todos os acessores
// são totais: nunca falham, só devolvem o default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::coerce;

static NULL: Value = Value::Null;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(Map<String, Value>);

impl RawRow {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Só objetos JSON viram linhas.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Procura a chave snake_case e, em seguida, a variante camelCase.
    /// Valores `null` contam como ausentes.
    pub fn get(&self, key: &str) -> &Value {
        if let Some(value) = self.0.get(key).filter(|v| !v.is_null()) {
            return value;
        }
        let camel = to_camel_case(key);
        if camel != key {
            if let Some(value) = self.0.get(&camel).filter(|v| !v.is_null()) {
                return value;
            }
        }
        &NULL
    }

    pub fn has(&self, key: &str) -> bool {
        !self.get(key).is_null()
    }

    /// Texto opcional; string vazia conta como ausente.
    pub fn opt_string(&self, key: &str) -> Option<String> {
        coerce::coerce_string(self.get(key)).filter(|s| !s.trim().is_empty())
    }

    pub fn string_or(&self, key: &str, default: &str) -> String {
        self.opt_string(key).unwrap_or_else(|| default.to_string())
    }

    pub fn string(&self, key: &str) -> String {
        coerce::coerce_string(self.get(key)).unwrap_or_default()
    }

    pub fn bool(&self, key: &str) -> bool {
        coerce::coerce_bool(self.get(key))
    }

    pub fn datetime(&self, key: &str) -> Option<DateTime<Utc>> {
        coerce::coerce_datetime(self.get(key))
    }

    pub fn f64(&self, key: &str) -> Option<f64> {
        coerce::coerce_f64(self.get(key))
    }

    pub fn u64(&self, key: &str) -> Option<u64> {
        coerce::coerce_u64(self.get(key))
    }

    pub fn json_array(&self, key: &str) -> Vec<Value> {
        coerce::parse_json_array(self.get(key))
    }

    pub fn json_object(&self, key: &str) -> Map<String, Value> {
        coerce::parse_json_object(self.get(key))
    }

    pub fn string_list(&self, key: &str) -> Vec<String> {
        coerce::coerce_string_list(self.get(key))
    }

    pub fn id(&self) -> String {
        self.string("id")
    }
}

impl From<Map<String, Value>> for RawRow {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for ch in key.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Respostas de listagem: array puro ou envelope `{ "data": [...] }`.
pub fn rows_from_value(value: Value) -> Vec<RawRow> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    items.into_iter().filter_map(RawRow::from_value).collect()
}

/// Resposta de item único: objeto puro ou `{ "data": {...} }`.
pub fn row_from_value(value: Value) -> RawRow {
    match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Object(inner)) => RawRow(inner),
            Some(other) => {
                map.insert("data".to_string(), other);
                RawRow(map)
            }
            None => RawRow(map),
        },
        _ => RawRow::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> RawRow {
        RawRow::from_value(value).unwrap()
    }

    #[test]
    fn falls_back_to_camel_case_keys() {
        let r = row(json!({"firmId": "f1", "created_at": null, "createdAt": "2024-01-01"}));
        assert_eq!(r.string("firm_id"), "f1");
        assert!(r.datetime("created_at").is_some());
        assert!(r.opt_string("missing").is_none());
    }

    #[test]
    fn empty_strings_are_absent_for_optionals() {
        let r = row(json!({"title": "  ", "name": "Jo"}));
        assert!(r.opt_string("title").is_none());
        assert_eq!(r.string_or("name", "Unnamed"), "Jo");
        assert_eq!(r.string_or("title", "Unnamed"), "Unnamed");
    }

    #[test]
    fn unwraps_data_envelopes() {
        assert_eq!(rows_from_value(json!({"data": [{"id": 1}, 2]})).len(), 1);
        assert_eq!(rows_from_value(json!([{"id": 1}, {"id": 2}])).len(), 2);
        assert!(rows_from_value(json!("nope")).is_empty());
        assert_eq!(row_from_value(json!({"data": {"id": "x"}})).id(), "x");
        assert_eq!(row_from_value(json!({"id": "y"})).id(), "y");
        assert_eq!(row_from_value(json!(null)), RawRow::default());
    }
}
