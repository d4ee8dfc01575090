// src/services/store.rs

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use chrono::{DateTime, Duration, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::{
    api::{RawRow, SmcrApi},
    common::error::AppError,
    mappers::{
        map_assessment, map_breach, map_document, map_firm, map_group_entity, map_person,
        map_role, map_training_item, map_workflow, map_workflow_document,
    },
    models::{
        assessments::FitnessAssessmentRecord,
        breaches::ConductBreach,
        documents::{DocumentMetadata, WorkflowDocument},
        firm::Firm,
        group::GroupEntity,
        people::{PersonRecord, TrainingPlanItem},
        roles::RoleAssignment,
        workflows::WorkflowInstance,
    },
    services::verification_service::VerificationEntry,
    training::{merge_training_plan, recompute_completion},
};

// ---
// Árvore de estado da firma ativa
// ---
// Nunca é mutada no lugar: cada alteração publica um novo `Arc<SmcrState>`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmcrState {
    pub firms: Vec<Firm>,
    pub active_firm_id: Option<String>,
    pub people: Vec<PersonRecord>,
    pub documents: Vec<DocumentMetadata>,
    pub roles: Vec<RoleAssignment>,
    pub workflows: Vec<WorkflowInstance>,
    pub workflow_documents: Vec<WorkflowDocument>,
    pub assessments: Vec<FitnessAssessmentRecord>,
    pub breaches: Vec<ConductBreach>,
    pub group_entities: Vec<GroupEntity>,
    pub is_ready: bool,
    pub load_error: Option<String>,
}

impl SmcrState {
    pub fn active_firm(&self) -> Option<&Firm> {
        let id = self.active_firm_id.as_deref()?;
        self.firms.iter().find(|f| f.id == id)
    }

    pub fn person(&self, person_id: &str) -> Option<&PersonRecord> {
        self.people.iter().find(|p| p.id == person_id)
    }

    pub fn workflow(&self, workflow_id: &str) -> Option<&WorkflowInstance> {
        self.workflows.iter().find(|w| w.id == workflow_id)
    }

    pub fn roles_for_person(&self, person_id: &str) -> Vec<&RoleAssignment> {
        self.roles.iter().filter(|r| r.person_id == person_id).collect()
    }

    pub fn training_for_person(&self, person_id: &str) -> &[TrainingPlanItem] {
        self.person(person_id)
            .map(|p| p.training_plan.as_slice())
            .unwrap_or_default()
    }

    pub fn documents_for_person(&self, person_id: &str) -> Vec<&DocumentMetadata> {
        self.documents.iter().filter(|d| d.person_id == person_id).collect()
    }

    pub fn documents_for_workflow(&self, workflow_id: &str) -> Vec<&WorkflowDocument> {
        self.workflow_documents
            .iter()
            .filter(|d| d.workflow_id == workflow_id)
            .collect()
    }

    pub fn breaches_for_person(&self, person_id: &str) -> Vec<&ConductBreach> {
        self.breaches.iter().filter(|b| b.person_id == person_id).collect()
    }

    /// Filhos diretos de `parent_id`; `None` devolve as raízes.
    pub fn group_tree_children(&self, parent_id: Option<&str>) -> Vec<&GroupEntity> {
        self.group_entities
            .iter()
            .filter(|e| e.parent_id.as_deref() == parent_id)
            .collect()
    }

    /// Pessoas com IRN cuja verificação externa falta ou é mais velha que `max_age`.
    pub fn stale_verifications(&self, now: DateTime<Utc>, max_age: Duration) -> Vec<VerificationEntry> {
        self.people
            .iter()
            .filter_map(|person| {
                let irn = person.irn.as_deref().filter(|irn| !irn.trim().is_empty())?;
                let fresh = person
                    .fca_verification
                    .as_ref()
                    .is_some_and(|v| now - v.last_checked <= max_age);
                (!fresh).then(|| VerificationEntry {
                    person_id: person.id.clone(),
                    irn: irn.trim().to_string(),
                })
            })
            .collect()
    }

    // Troca a firma ativa: descarta a árvore inteira.
    fn reset_for_firm(&mut self, firm_id: &str) {
        *self = SmcrState {
            firms: std::mem::take(&mut self.firms),
            active_firm_id: Some(firm_id.to_string()),
            ..SmcrState::default()
        };
    }
}

struct Workspace {
    people: Vec<PersonRecord>,
    documents: Vec<DocumentMetadata>,
    roles: Vec<RoleAssignment>,
    workflows: Vec<WorkflowInstance>,
    workflow_documents: Vec<WorkflowDocument>,
    assessments: Vec<FitnessAssessmentRecord>,
    breaches: Vec<ConductBreach>,
    group_entities: Vec<GroupEntity>,
}

/// Busca por item que falha vira coleção vazia.
fn rows_or_empty(result: Result<Vec<RawRow>, AppError>, what: &str, owner_id: &str) -> Vec<RawRow> {
    result.unwrap_or_else(|e| {
        warn!(owner_id, error = %e, "Falha ao buscar {what}; seguindo com lista vazia");
        Vec::new()
    })
}

/// Funde o payload enviado com a linha devolvida pela API (a API ganha).
/// Respostas parciais continuam a produzir um registo completo.
pub(crate) fn echo_row<T: Serialize + ?Sized>(sent: &T, returned: RawRow) -> RawRow {
    let mut merged = match serde_json::to_value(sent) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    for (key, value) in returned.into_value().as_object().into_iter().flatten() {
        if !value.is_null() {
            merged.insert(key.clone(), value.clone());
        }
    }
    RawRow::new(merged)
}

// ---
// SmcrStore: agregador de dados da firma ativa
// ---
pub struct SmcrStore {
    pub(crate) api: Arc<dyn SmcrApi>,
    state: RwLock<Arc<SmcrState>>,
    load_generation: AtomicU64,
    // Serializa leitura -> envio -> aplicação das listas de etapas
    pub(crate) step_writes: Mutex<()>,
}

impl SmcrStore {
    pub fn new(api: Arc<dyn SmcrApi>) -> Self {
        Self {
            api,
            state: RwLock::new(Arc::new(SmcrState::default())),
            load_generation: AtomicU64::new(0),
            step_writes: Mutex::new(()),
        }
    }

    pub async fn snapshot(&self) -> Arc<SmcrState> {
        self.state.read().await.clone()
    }

    /// Aplica uma transformação pura e publica a nova árvore.
    pub(crate) async fn update_state<R>(&self, change: impl FnOnce(&mut SmcrState) -> R) -> R {
        let mut guard = self.state.write().await;
        let mut next = SmcrState::clone(&guard);
        let result = change(&mut next);
        *guard = Arc::new(next);
        result
    }

    /// Como `update_state`, mas só aplica se a firma ativa ainda for `scope`.
    /// Uma troca de firma durante a chamada remota descarta a alteração local.
    pub(crate) async fn update_state_in<R>(
        &self,
        scope: Option<&str>,
        change: impl FnOnce(&mut SmcrState) -> R,
    ) -> Option<R> {
        let mut guard = self.state.write().await;
        if guard.active_firm_id.as_deref() != scope {
            debug!(
                expected = scope.unwrap_or_default(),
                active = guard.active_firm_id.as_deref().unwrap_or_default(),
                "Firma ativa mudou; alteração local descartada"
            );
            return None;
        }
        let mut next = SmcrState::clone(&guard);
        let result = change(&mut next);
        *guard = Arc::new(next);
        Some(result)
    }

    /// Firma ativa no início de uma mutação.
    pub(crate) async fn active_scope(&self) -> Option<String> {
        self.snapshot().await.active_firm_id.clone()
    }

    pub(crate) async fn require_active_firm(&self) -> Result<String, AppError> {
        self.snapshot()
            .await
            .active_firm_id
            .clone()
            .ok_or(AppError::NoActiveFirm)
    }

    pub(crate) async fn require_person(&self, person_id: &str) -> Result<PersonRecord, AppError> {
        self.snapshot()
            .await
            .person(person_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("person {person_id}")))
    }

    // =========================================================================
    //  CARREGAMENTO
    // =========================================================================

    /// Busca as firmas; sem firma ativa, seleciona a primeira e carrega o workspace.
    /// Erros ficam em `load_error`.
    pub async fn load_firms(&self) {
        debug!("get_firms");
        let rows = match self.api.get_firms().await {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "Falha ao carregar firmas");
                self.update_state(|state| {
                    state.load_error = Some(e.to_string());
                    state.is_ready = true;
                })
                .await;
                return;
            }
        };
        let firms: Vec<Firm> = rows.iter().map(map_firm).collect();
        info!(count = firms.len(), "Firmas carregadas");

        let first_id = firms.first().map(|f| f.id.clone());
        let needs_selection = self
            .update_state(|state| {
                state.firms = firms;
                let active_known = state
                    .active_firm_id
                    .as_deref()
                    .is_some_and(|id| state.firms.iter().any(|f| f.id == id));
                if !active_known {
                    state.active_firm_id = None;
                }
                if active_known || first_id.is_none() {
                    state.is_ready = true;
                }
                !active_known
            })
            .await;

        if let (true, Some(firm_id)) = (needs_selection, first_id) {
            self.load_firm(&firm_id).await;
        }
    }

    /// Troca a firma ativa e recarrega tudo.
    pub async fn set_active_firm(&self, firm_id: &str) -> Result<(), AppError> {
        let known = self.snapshot().await.firms.iter().any(|f| f.id == firm_id);
        if !known {
            return Err(AppError::NotFound(format!("firm {firm_id}")));
        }
        self.load_firm(firm_id).await;
        Ok(())
    }

    pub async fn reload(&self) -> Result<(), AppError> {
        let firm_id = self.require_active_firm().await?;
        self.load_firm(&firm_id).await;
        Ok(())
    }

    pub(crate) async fn load_firm(&self, firm_id: &str) {
        let generation = self.load_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.update_state(|state| state.reset_for_firm(firm_id)).await;
        info!(firm_id, "Carregando workspace da firma");

        let loaded = self.fetch_workspace(firm_id).await;

        // Uma troca de firma mais recente invalida este resultado
        if self.load_generation.load(Ordering::SeqCst) != generation {
            debug!(firm_id, generation, "Carregamento substituído; resultado descartado");
            return;
        }

        self.update_state(|state| {
            match loaded {
                Ok(ws) => {
                    info!(
                        firm_id,
                        people = ws.people.len(),
                        roles = ws.roles.len(),
                        workflows = ws.workflows.len(),
                        "Workspace carregado"
                    );
                    state.people = ws.people;
                    state.documents = ws.documents;
                    state.roles = ws.roles;
                    state.workflows = ws.workflows;
                    state.workflow_documents = ws.workflow_documents;
                    state.assessments = ws.assessments;
                    state.breaches = ws.breaches;
                    state.group_entities = ws.group_entities;
                    state.load_error = None;
                }
                Err(e) => {
                    error!(firm_id, error = %e, "Falha ao carregar workspace");
                    state.load_error = Some(e.to_string());
                }
            }
            state.is_ready = true;
        })
        .await;
    }

    async fn fetch_workspace(&self, firm_id: &str) -> Result<Workspace, AppError> {
        let api = &self.api;
        let (people_rows, role_rows, workflow_rows, assessment_rows, breach_rows, group_rows) = tokio::try_join!(
            api.get_people(firm_id),
            api.get_roles(firm_id),
            api.get_workflows(firm_id),
            api.get_assessments(firm_id),
            api.get_breaches(firm_id),
            api.get_group_entities(),
        )?;

        let people: Vec<PersonRecord> = people_rows.iter().map(map_person).collect();
        let workflows: Vec<WorkflowInstance> = workflow_rows.iter().map(map_workflow).collect();

        let person_fetches = people.iter().map(|person| async move {
            let (documents, training) = tokio::join!(
                api.get_person_documents(&person.id),
                api.get_training_items(&person.id),
            );
            (
                rows_or_empty(documents, "documentos", &person.id),
                rows_or_empty(training, "itens de formação", &person.id),
            )
        });
        let workflow_fetches = workflows.iter().map(|workflow| async move {
            rows_or_empty(
                api.get_workflow_documents(&workflow.id).await,
                "documentos do workflow",
                &workflow.id,
            )
        });
        let (person_extras, workflow_docs) =
            tokio::join!(join_all(person_fetches), join_all(workflow_fetches));

        let mut documents = Vec::new();
        let people = people
            .into_iter()
            .zip(person_extras)
            .map(|(mut person, (doc_rows, training_rows))| {
                documents.extend(doc_rows.iter().map(|row| {
                    let mut doc = map_document(row);
                    if doc.person_id.is_empty() {
                        doc.person_id = person.id.clone();
                    }
                    doc
                }));
                let fetched = training_rows.iter().map(map_training_item);
                person.training_plan = merge_training_plan(&person.training_plan, fetched);
                recompute_completion(&mut person);
                person
            })
            .collect();

        let workflow_documents = workflows
            .iter()
            .zip(workflow_docs)
            .flat_map(|(workflow, rows)| {
                rows.iter()
                    .map(|row| {
                        let mut doc = map_workflow_document(row);
                        if doc.workflow_id.is_empty() {
                            doc.workflow_id = workflow.id.clone();
                        }
                        doc
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        Ok(Workspace {
            people,
            documents,
            roles: role_rows.iter().map(map_role).collect(),
            workflows,
            workflow_documents,
            assessments: assessment_rows.iter().map(map_assessment).collect(),
            breaches: breach_rows.iter().map(map_breach).collect(),
            group_entities: group_rows.iter().map(map_group_entity).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::people::{FcaVerification, PersonAssessment};
    use serde_json::json;

    fn person(id: &str, irn: Option<&str>, checked_days_ago: Option<i64>) -> PersonRecord {
        let now = Utc::now();
        PersonRecord {
            id: id.into(),
            firm_id: "f1".into(),
            employee_id: format!("E-{id}"),
            name: id.into(),
            email: format!("{id}@example.com"),
            department: "Compliance".into(),
            title: None,
            phone: None,
            address: None,
            line_manager: None,
            start_date: None,
            hire_date: None,
            end_date: None,
            irn: irn.map(str::to_string),
            fca_verification: checked_days_ago.map(|days| FcaVerification {
                status: "Active".into(),
                last_checked: now - Duration::days(days),
                control_functions: Vec::new(),
                has_enforcement_history: false,
            }),
            is_psd: false,
            psd_status: None,
            assessment: PersonAssessment::default(),
            training_plan: Vec::new(),
            created_at: now,
        }
    }

    #[test]
    fn stale_verifications_skip_fresh_and_missing_irn() {
        let state = SmcrState {
            people: vec![
                person("never-checked", Some("ABC123"), None),
                person("old", Some("DEF456"), Some(45)),
                person("fresh", Some("GHI789"), Some(2)),
                person("no-irn", None, None),
            ],
            ..SmcrState::default()
        };
        let stale = state.stale_verifications(Utc::now(), Duration::days(30));
        let ids: Vec<&str> = stale.iter().map(|e| e.person_id.as_str()).collect();
        assert_eq!(ids, vec!["never-checked", "old"]);
        assert_eq!(stale[1].irn, "DEF456");
    }

    #[test]
    fn echo_row_prefers_returned_values() {
        let sent = json!({ "name": "Acme", "department": "Ops" });
        let returned = RawRow::from_value(json!({ "id": "p1", "name": "Acme Ltd", "department": null })).unwrap();
        let row = echo_row(&sent, returned);
        assert_eq!(row.string("id"), "p1");
        assert_eq!(row.string("name"), "Acme Ltd");
        assert_eq!(row.string("department"), "Ops");
    }
}
