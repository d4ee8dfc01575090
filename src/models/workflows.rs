// src/models/workflows.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::drafts::StepDraft;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl WorkflowStatus {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            _ => Self::NotStarted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Pending,
    Completed,
}

impl StepStatus {
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("completed") {
            Self::Completed
        } else {
            Self::Pending
        }
    }
}

/// Valor de um campo de formulário: checkbox ou texto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Text(String),
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

// ---
// Etapa de um workflow em execução
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStepInstance {
    pub id: String,
    // Id da etapa no template (é ele que identifica os rascunhos especiais)
    pub template_step_id: String,
    pub title: String,
    pub description: String,
    pub status: StepStatus,
    pub notes: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<BTreeMap<String, FieldValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist: Option<Vec<ChecklistItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<StepDraft>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInstance {
    pub id: String,
    pub firm_id: String,
    pub template_id: String,
    pub name: String,
    pub summary: String,
    pub owner_person_id: Option<String>,
    pub owner_name: Option<String>,
    pub launched_at: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    // Derivado do status das etapas
    pub status: WorkflowStatus,
    pub steps: Vec<WorkflowStepInstance>,
    pub success_criteria: Vec<String>,
    pub trigger: Option<String>,
}

impl WorkflowInstance {
    pub fn step(&self, step_id: &str) -> Option<&WorkflowStepInstance> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn completed_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Completed)
            .count()
    }
}

// --- Payloads ---

/// Parâmetros de lançamento vindos da UI.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LaunchWorkflow {
    #[validate(length(min = 1, message = "Template is required."))]
    pub template_id: String,
    pub owner_person_id: Option<String>,
    pub owner_name: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    // Nome customizado; vazio usa o nome do template
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWorkflow {
    pub template_id: String,
    pub name: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_person_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    pub launched_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub status: WorkflowStatus,
    pub steps: Vec<WorkflowStepInstance>,
    pub success_criteria: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkflowPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkflowStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<WorkflowStepInstance>>,
}
