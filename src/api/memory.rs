// src/api/memory.rs

// ---
// Implementação em memória da API
// ---
// Usada nos testes e em execuções offline. Regista cada chamada e permite
// injetar falhas por operação.

use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::{
    api::{RawRow, SmcrApi},
    common::{coerce::coerce_string, error::AppError},
    models::{
        assessments::{AssessmentPatch, NewAssessment},
        breaches::{BreachPatch, NewBreach, NewTimelineEntry},
        documents::DocumentUpload,
        firm::{FirmPatch, NewFirm},
        group::{GroupEntityPatch, NewGroupEntity},
        people::{NewPerson, NewTrainingItem, PersonPatch, TrainingItemPatch},
        roles::{NewRole, RolePatch},
        workflows::{NewWorkflow, WorkflowPatch},
    },
};

pub const FIRMS: &str = "firms";
pub const PEOPLE: &str = "people";
pub const PERSON_DOCUMENTS: &str = "person_documents";
pub const TRAINING_ITEMS: &str = "training_items";
pub const ROLES: &str = "roles";
pub const WORKFLOWS: &str = "workflows";
pub const WORKFLOW_DOCUMENTS: &str = "workflow_documents";
pub const ASSESSMENTS: &str = "assessments";
pub const BREACHES: &str = "breaches";
pub const GROUP_ENTITIES: &str = "group_entities";

#[derive(Default)]
struct Tables {
    rows: HashMap<&'static str, Vec<Map<String, Value>>>,
    calls: Vec<String>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    next_id: u64,
}

impl Tables {
    fn next_id(&mut self, table: &str) -> String {
        self.next_id += 1;
        format!("{table}-{}", self.next_id)
    }

    fn list(&self, table: &str, key: &str, value: &str) -> Vec<RawRow> {
        self.rows
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| row.get(key).and_then(coerce_string).as_deref() == Some(value))
                    .cloned()
                    .map(RawRow::new)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn all(&self, table: &str) -> Vec<RawRow> {
        self.rows
            .get(table)
            .map(|rows| rows.iter().cloned().map(RawRow::new).collect())
            .unwrap_or_default()
    }

    fn insert(&mut self, table: &'static str, mut row: Map<String, Value>) -> RawRow {
        if !row.contains_key("id") {
            let id = self.next_id(table);
            row.insert("id".into(), Value::String(id));
        }
        row.entry("created_at")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
        self.rows.entry(table).or_default().push(row.clone());
        RawRow::new(row)
    }

    fn find_mut(&mut self, table: &str, id: &str) -> Option<&mut Map<String, Value>> {
        self.rows
            .get_mut(table)?
            .iter_mut()
            .find(|row| row.get("id").and_then(coerce_string).as_deref() == Some(id))
    }

    fn update(&mut self, table: &str, id: &str, patch: Map<String, Value>) -> Result<(), AppError> {
        let row = self.find_mut(table, id).ok_or_else(|| not_found(table, id))?;
        row.extend(patch);
        Ok(())
    }

    fn delete(&mut self, table: &str, id: &str) -> Result<(), AppError> {
        let rows = self.rows.get_mut(table).ok_or_else(|| not_found(table, id))?;
        let before = rows.len();
        rows.retain(|row| row.get("id").and_then(coerce_string).as_deref() != Some(id));
        if rows.len() == before {
            return Err(not_found(table, id));
        }
        Ok(())
    }

    fn delete_where(&mut self, table: &str, key: &str, value: &str) {
        if let Some(rows) = self.rows.get_mut(table) {
            rows.retain(|row| row.get(key).and_then(coerce_string).as_deref() != Some(value));
        }
    }
}

fn not_found(table: &str, id: &str) -> AppError {
    AppError::Api {
        status: Some(404),
        message: format!("{table} row {id} not found"),
    }
}

fn to_map<T: Serialize + ?Sized>(value: &T) -> Result<Map<String, Value>, AppError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::api(format!("expected an object body, got {other}"))),
    }
}

#[derive(Default)]
pub struct InMemorySmcrApi {
    tables: Mutex<Tables>,
}

impl InMemorySmcrApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Regista a chamada e devolve erro se a operação estiver marcada para falhar.
    fn call(&self, op: &str) -> Result<MutexGuard<'_, Tables>, AppError> {
        let mut tables = self.tables();
        tables.calls.push(op.to_string());
        if tables.failing.contains(op) {
            return Err(AppError::Api {
                status: Some(500),
                message: format!("{op} failed"),
            });
        }
        Ok(tables)
    }

    /// Insere linhas cruas diretamente (como se já existissem no servidor).
    pub fn seed(&self, table: &'static str, rows: impl IntoIterator<Item = Value>) {
        let mut tables = self.tables();
        for row in rows {
            if let Value::Object(map) = row {
                tables.insert(table, map);
            }
        }
    }

    pub fn fail_on(&self, op: &str) {
        self.tables().failing.insert(op.to_string());
    }

    /// Atrasa a operação, simulando latência de rede.
    pub fn delay_on(&self, op: &str, delay: Duration) {
        self.tables().delays.insert(op.to_string(), delay);
    }

    async fn pause(&self, op: &str) {
        let delay = self.tables().delays.get(op).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    pub fn clear_failures(&self) {
        self.tables().failing.clear();
    }

    /// Todas as chamadas feitas, pela ordem.
    pub fn calls(&self) -> Vec<String> {
        self.tables().calls.clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.tables().calls.iter().filter(|c| c.as_str() == op).count()
    }

    pub fn reset_calls(&self) {
        self.tables().calls.clear();
    }

    pub fn rows(&self, table: &str) -> Vec<RawRow> {
        self.tables().all(table)
    }

    fn create_scoped<T: Serialize>(
        &self,
        op: &str,
        table: &'static str,
        firm_id: &str,
        input: &T,
    ) -> Result<RawRow, AppError> {
        let mut row = to_map(input)?;
        let mut tables = self.call(op)?;
        row.insert("firm_id".into(), Value::String(firm_id.to_string()));
        Ok(tables.insert(table, row))
    }

    fn upload_row(
        &self,
        op: &str,
        table: &'static str,
        owner_key: &str,
        owner_id: &str,
        upload: &DocumentUpload,
    ) -> Result<RawRow, AppError> {
        let mut tables = self.call(op)?;
        let row = json!({
            owner_key: owner_id,
            "name": upload.file_name,
            "category": upload.category,
            "type": upload.category,
            "size": upload.bytes.len(),
            "mime_type": upload.content_type,
            "step_id": upload.step_id,
            "notes": upload.notes,
            "uploaded_at": Utc::now().to_rfc3339(),
        });
        match row {
            Value::Object(map) => Ok(tables.insert(table, map)),
            _ => Err(AppError::api("invalid document row")),
        }
    }
}

#[async_trait]
impl SmcrApi for InMemorySmcrApi {
    async fn get_firms(&self) -> Result<Vec<RawRow>, AppError> {
        self.pause("get_firms").await;
        Ok(self.call("get_firms")?.all(FIRMS))
    }

    async fn create_firm(&self, input: &NewFirm) -> Result<RawRow, AppError> {
        self.pause("create_firm").await;
        let row = to_map(input)?;
        Ok(self.call("create_firm")?.insert(FIRMS, row))
    }

    async fn update_firm(&self, firm_id: &str, patch: &FirmPatch) -> Result<(), AppError> {
        self.pause("update_firm").await;
        let patch = to_map(patch)?;
        self.call("update_firm")?.update(FIRMS, firm_id, patch)
    }

    async fn get_people(&self, firm_id: &str) -> Result<Vec<RawRow>, AppError> {
        self.pause("get_people").await;
        Ok(self.call("get_people")?.list(PEOPLE, "firm_id", firm_id))
    }

    async fn create_person(&self, firm_id: &str, input: &NewPerson) -> Result<RawRow, AppError> {
        self.pause("create_person").await;
        self.create_scoped("create_person", PEOPLE, firm_id, input)
    }

    async fn update_person(&self, person_id: &str, patch: &PersonPatch) -> Result<(), AppError> {
        self.pause("update_person").await;
        let patch = to_map(patch)?;
        self.call("update_person")?.update(PEOPLE, person_id, patch)
    }

    async fn delete_person(&self, person_id: &str) -> Result<(), AppError> {
        self.pause("delete_person").await;
        let mut tables = self.call("delete_person")?;
        tables.delete(PEOPLE, person_id)?;
        for table in [PERSON_DOCUMENTS, TRAINING_ITEMS, ROLES, BREACHES] {
            tables.delete_where(table, "person_id", person_id);
        }
        Ok(())
    }

    async fn get_person_documents(&self, person_id: &str) -> Result<Vec<RawRow>, AppError> {
        self.pause("get_person_documents").await;
        Ok(self.call("get_person_documents")?.list(PERSON_DOCUMENTS, "person_id", person_id))
    }

    async fn upload_person_document(&self, person_id: &str, upload: &DocumentUpload) -> Result<RawRow, AppError> {
        self.pause("upload_person_document").await;
        self.upload_row("upload_person_document", PERSON_DOCUMENTS, "person_id", person_id, upload)
    }

    async fn delete_document(&self, document_id: &str) -> Result<(), AppError> {
        self.pause("delete_document").await;
        let mut tables = self.call("delete_document")?;
        tables
            .delete(PERSON_DOCUMENTS, document_id)
            .or_else(|_| tables.delete(WORKFLOW_DOCUMENTS, document_id))
    }

    async fn get_training_items(&self, person_id: &str) -> Result<Vec<RawRow>, AppError> {
        self.pause("get_training_items").await;
        Ok(self.call("get_training_items")?.list(TRAINING_ITEMS, "person_id", person_id))
    }

    async fn create_training_items(&self, person_id: &str, items: &[NewTrainingItem]) -> Result<Vec<RawRow>, AppError> {
        self.pause("create_training_items").await;
        let rows = items.iter().map(to_map).collect::<Result<Vec<_>, _>>()?;
        let mut tables = self.call("create_training_items")?;
        Ok(rows
            .into_iter()
            .map(|mut row| {
                row.insert("person_id".into(), Value::String(person_id.to_string()));
                tables.insert(TRAINING_ITEMS, row)
            })
            .collect())
    }

    async fn update_training_item(&self, item_id: &str, patch: &TrainingItemPatch) -> Result<(), AppError> {
        self.pause("update_training_item").await;
        let patch = to_map(patch)?;
        self.call("update_training_item")?.update(TRAINING_ITEMS, item_id, patch)
    }

    async fn get_roles(&self, firm_id: &str) -> Result<Vec<RawRow>, AppError> {
        self.pause("get_roles").await;
        Ok(self.call("get_roles")?.list(ROLES, "firm_id", firm_id))
    }

    async fn create_role(&self, firm_id: &str, input: &NewRole) -> Result<RawRow, AppError> {
        self.pause("create_role").await;
        self.create_scoped("create_role", ROLES, firm_id, input)
    }

    async fn update_role(&self, role_id: &str, patch: &RolePatch) -> Result<(), AppError> {
        self.pause("update_role").await;
        let patch = to_map(patch)?;
        self.call("update_role")?.update(ROLES, role_id, patch)
    }

    async fn delete_role(&self, role_id: &str) -> Result<(), AppError> {
        self.pause("delete_role").await;
        self.call("delete_role")?.delete(ROLES, role_id)
    }

    async fn get_workflows(&self, firm_id: &str) -> Result<Vec<RawRow>, AppError> {
        self.pause("get_workflows").await;
        Ok(self.call("get_workflows")?.list(WORKFLOWS, "firm_id", firm_id))
    }

    async fn create_workflow(&self, firm_id: &str, input: &NewWorkflow) -> Result<RawRow, AppError> {
        self.pause("create_workflow").await;
        self.create_scoped("create_workflow", WORKFLOWS, firm_id, input)
    }

    async fn update_workflow(&self, workflow_id: &str, patch: &WorkflowPatch) -> Result<(), AppError> {
        self.pause("update_workflow").await;
        let patch = to_map(patch)?;
        self.call("update_workflow")?.update(WORKFLOWS, workflow_id, patch)
    }

    async fn delete_workflow(&self, workflow_id: &str) -> Result<(), AppError> {
        self.pause("delete_workflow").await;
        let mut tables = self.call("delete_workflow")?;
        tables.delete(WORKFLOWS, workflow_id)?;
        tables.delete_where(WORKFLOW_DOCUMENTS, "workflow_id", workflow_id);
        Ok(())
    }

    async fn get_workflow_documents(&self, workflow_id: &str) -> Result<Vec<RawRow>, AppError> {
        self.pause("get_workflow_documents").await;
        Ok(self.call("get_workflow_documents")?.list(WORKFLOW_DOCUMENTS, "workflow_id", workflow_id))
    }

    async fn upload_workflow_document(&self, workflow_id: &str, upload: &DocumentUpload) -> Result<RawRow, AppError> {
        self.pause("upload_workflow_document").await;
        self.upload_row("upload_workflow_document", WORKFLOW_DOCUMENTS, "workflow_id", workflow_id, upload)
    }

    async fn get_assessments(&self, firm_id: &str) -> Result<Vec<RawRow>, AppError> {
        self.pause("get_assessments").await;
        Ok(self.call("get_assessments")?.list(ASSESSMENTS, "firm_id", firm_id))
    }

    async fn create_assessment(&self, firm_id: &str, input: &NewAssessment) -> Result<RawRow, AppError> {
        self.pause("create_assessment").await;
        self.create_scoped("create_assessment", ASSESSMENTS, firm_id, input)
    }

    async fn update_assessment(&self, assessment_id: &str, patch: &AssessmentPatch) -> Result<(), AppError> {
        self.pause("update_assessment").await;
        let patch = to_map(patch)?;
        self.call("update_assessment")?.update(ASSESSMENTS, assessment_id, patch)
    }

    async fn delete_assessment(&self, assessment_id: &str) -> Result<(), AppError> {
        self.pause("delete_assessment").await;
        self.call("delete_assessment")?.delete(ASSESSMENTS, assessment_id)
    }

    async fn get_breaches(&self, firm_id: &str) -> Result<Vec<RawRow>, AppError> {
        self.pause("get_breaches").await;
        Ok(self.call("get_breaches")?.list(BREACHES, "firm_id", firm_id))
    }

    async fn create_breach(&self, firm_id: &str, input: &NewBreach) -> Result<RawRow, AppError> {
        self.pause("create_breach").await;
        self.create_scoped("create_breach", BREACHES, firm_id, input)
    }

    async fn update_breach(&self, breach_id: &str, patch: &BreachPatch) -> Result<(), AppError> {
        self.pause("update_breach").await;
        let patch = to_map(patch)?;
        self.call("update_breach")?.update(BREACHES, breach_id, patch)
    }

    async fn add_breach_timeline_entry(&self, breach_id: &str, entry: &NewTimelineEntry) -> Result<RawRow, AppError> {
        self.pause("add_breach_timeline_entry").await;
        let mut entry = to_map(entry)?;
        let mut tables = self.call("add_breach_timeline_entry")?;
        let entry_id = tables.next_id("timeline");
        entry.insert("id".into(), Value::String(entry_id));
        entry.insert("timestamp".into(), Value::String(Utc::now().to_rfc3339()));

        let breach = tables
            .find_mut(BREACHES, breach_id)
            .ok_or_else(|| not_found(BREACHES, breach_id))?;
        let timeline = breach
            .entry("timeline")
            .or_insert_with(|| Value::Array(Vec::new()));
        if !timeline.is_array() {
            *timeline = Value::Array(Vec::new());
        }
        if let Value::Array(items) = timeline {
            items.push(Value::Object(entry.clone()));
        }
        Ok(RawRow::new(entry))
    }

    async fn delete_breach(&self, breach_id: &str) -> Result<(), AppError> {
        self.pause("delete_breach").await;
        self.call("delete_breach")?.delete(BREACHES, breach_id)
    }

    async fn get_group_entities(&self) -> Result<Vec<RawRow>, AppError> {
        self.pause("get_group_entities").await;
        Ok(self.call("get_group_entities")?.all(GROUP_ENTITIES))
    }

    async fn create_group_entity(&self, input: &NewGroupEntity) -> Result<RawRow, AppError> {
        self.pause("create_group_entity").await;
        let row = to_map(input)?;
        Ok(self.call("create_group_entity")?.insert(GROUP_ENTITIES, row))
    }

    async fn update_group_entity(&self, entity_id: &str, patch: &GroupEntityPatch) -> Result<(), AppError> {
        self.pause("update_group_entity").await;
        let patch = to_map(patch)?;
        self.call("update_group_entity")?.update(GROUP_ENTITIES, entity_id, patch)
    }

    async fn delete_group_entity(&self, entity_id: &str) -> Result<(), AppError> {
        self.pause("delete_group_entity").await;
        self.call("delete_group_entity")?.delete(GROUP_ENTITIES, entity_id)
    }
}
