// tests/support/mod.rs
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use smcr_backoffice::{
    api::memory::{InMemorySmcrApi, FIRMS, PEOPLE},
    models::roles::{ApprovalStatus, FunctionType, NewRole},
    SmcrStore,
};

pub fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

/// Duas firmas; três pessoas com IRN na primeira, uma na segunda.
pub fn seeded_api() -> Arc<InMemorySmcrApi> {
    let api = Arc::new(InMemorySmcrApi::new());
    api.seed(
        FIRMS,
        [
            json!({ "id": "firm-1", "name": "Acme Capital", "created_at": "2024-01-01T00:00:00Z" }),
            json!({ "id": "firm-2", "name": "Beta Payments", "created_at": "2024-02-01T00:00:00Z" }),
        ],
    );
    api.seed(
        PEOPLE,
        [
            json!({ "id": "p1", "firm_id": "firm-1", "employee_id": "E1", "name": "Alice Smith",
                    "email": "alice@acme.test", "irn": "AXS001" }),
            json!({ "id": "p2", "firm_id": "firm-1", "employee_id": "E2", "name": "Bob Jones",
                    "email": "bob@acme.test", "irn": "BXJ002" }),
            json!({ "id": "p3", "firm_id": "firm-1", "employee_id": "E3", "name": "Carol White",
                    "email": "carol@acme.test", "irn": "CXW003" }),
            json!({ "id": "p9", "firm_id": "firm-2", "employee_id": "B1", "name": "Dan Brown",
                    "email": "dan@beta.test" }),
        ],
    );
    api
}

pub async fn loaded_store(api: &Arc<InMemorySmcrApi>) -> SmcrStore {
    let store = SmcrStore::new(api.clone());
    store.load_firms().await;
    store
}

pub fn new_role(person_id: &str, function_id: &str, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> NewRole {
    NewRole {
        person_id: person_id.to_string(),
        function_type: if function_id.starts_with("CF") { FunctionType::Cf } else { FunctionType::Smf },
        function_id: function_id.to_string(),
        function_label: String::new(),
        start_date: start,
        end_date: end,
        assessment_date: None,
        approval_status: ApprovalStatus::Draft,
        notes: String::new(),
    }
}
