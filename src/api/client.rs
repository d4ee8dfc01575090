// src/api/client.rs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    api::RawRow,
    common::error::AppError,
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

// ---
// Contrato da API REST remota
// ---
// Leituras e criações devolvem linhas cruas (normalizadas pelos mappers);
// atualizações e remoções só confirmam. O store aplica a mudança local
// depois que a chamada resolve.
#[async_trait]
pub trait SmcrApi: Send + Sync {
    // --- Firmas ---
    async fn get_firms(&self) -> Result<Vec<RawRow>, AppError>;
    async fn create_firm(&self, input: &NewFirm) -> Result<RawRow, AppError>;
    async fn update_firm(&self, firm_id: &str, patch: &FirmPatch) -> Result<(), AppError>;

    // --- Pessoas ---
    async fn get_people(&self, firm_id: &str) -> Result<Vec<RawRow>, AppError>;
    async fn create_person(&self, firm_id: &str, input: &NewPerson) -> Result<RawRow, AppError>;
    async fn update_person(&self, person_id: &str, patch: &PersonPatch) -> Result<(), AppError>;
    async fn delete_person(&self, person_id: &str) -> Result<(), AppError>;

    // --- Documentos da pessoa ---
    async fn get_person_documents(&self, person_id: &str) -> Result<Vec<RawRow>, AppError>;
    async fn upload_person_document(&self, person_id: &str, upload: &DocumentUpload) -> Result<RawRow, AppError>;
    async fn delete_document(&self, document_id: &str) -> Result<(), AppError>;

    // --- Formação ---
    async fn get_training_items(&self, person_id: &str) -> Result<Vec<RawRow>, AppError>;
    async fn create_training_items(&self, person_id: &str, items: &[NewTrainingItem]) -> Result<Vec<RawRow>, AppError>;
    async fn update_training_item(&self, item_id: &str, patch: &TrainingItemPatch) -> Result<(), AppError>;

    // --- Funções ---
    async fn get_roles(&self, firm_id: &str) -> Result<Vec<RawRow>, AppError>;
    async fn create_role(&self, firm_id: &str, input: &NewRole) -> Result<RawRow, AppError>;
    async fn update_role(&self, role_id: &str, patch: &RolePatch) -> Result<(), AppError>;
    async fn delete_role(&self, role_id: &str) -> Result<(), AppError>;

    // --- Workflows ---
    async fn get_workflows(&self, firm_id: &str) -> Result<Vec<RawRow>, AppError>;
    async fn create_workflow(&self, firm_id: &str, input: &NewWorkflow) -> Result<RawRow, AppError>;
    async fn update_workflow(&self, workflow_id: &str, patch: &WorkflowPatch) -> Result<(), AppError>;
    async fn delete_workflow(&self, workflow_id: &str) -> Result<(), AppError>;
    async fn get_workflow_documents(&self, workflow_id: &str) -> Result<Vec<RawRow>, AppError>;
    async fn upload_workflow_document(&self, workflow_id: &str, upload: &DocumentUpload) -> Result<RawRow, AppError>;

    // --- Avaliações F&P ---
    async fn get_assessments(&self, firm_id: &str) -> Result<Vec<RawRow>, AppError>;
    async fn create_assessment(&self, firm_id: &str, input: &NewAssessment) -> Result<RawRow, AppError>;
    async fn update_assessment(&self, assessment_id: &str, patch: &AssessmentPatch) -> Result<(), AppError>;
    async fn delete_assessment(&self, assessment_id: &str) -> Result<(), AppError>;

    // --- Violações de conduta ---
    async fn get_breaches(&self, firm_id: &str) -> Result<Vec<RawRow>, AppError>;
    async fn create_breach(&self, firm_id: &str, input: &NewBreach) -> Result<RawRow, AppError>;
    async fn update_breach(&self, breach_id: &str, patch: &BreachPatch) -> Result<(), AppError>;
    async fn add_breach_timeline_entry(&self, breach_id: &str, entry: &NewTimelineEntry) -> Result<RawRow, AppError>;
    async fn delete_breach(&self, breach_id: &str) -> Result<(), AppError>;

    // --- Estrutura do grupo (global) ---
    async fn get_group_entities(&self) -> Result<Vec<RawRow>, AppError>;
    async fn create_group_entity(&self, input: &NewGroupEntity) -> Result<RawRow, AppError>;
    async fn update_group_entity(&self, entity_id: &str, patch: &GroupEntityPatch) -> Result<(), AppError>;
    async fn delete_group_entity(&self, entity_id: &str) -> Result<(), AppError>;
}

/// Resultado de uma consulta ao registo externo de pessoas (FCA).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSnapshot {
    pub status: String,
    pub control_functions: Vec<String>,
    pub has_enforcement_history: bool,
}

#[async_trait]
pub trait RegisterLookup: Send + Sync {
    async fn lookup(&self, irn: &str) -> Result<RegisterSnapshot, AppError>;
}
