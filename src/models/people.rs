// src/models/people.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Current,
    Due,
    Overdue,
    #[default]
    NotRequired,
}

impl AssessmentStatus {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "current" => Self::Current,
            "due" => Self::Due,
            "overdue" => Self::Overdue,
            _ => Self::NotRequired,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl TrainingStatus {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "in_progress" => Self::InProgress,
            "completed" | "complete" => Self::Completed,
            _ => Self::NotStarted,
        }
    }
}

// ---
// Snapshot do registo da FCA (cache de verificação externa)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FcaVerification {
    pub status: String,
    pub last_checked: DateTime<Utc>,
    pub control_functions: Vec<String>,
    pub has_enforcement_history: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonAssessment {
    pub status: AssessmentStatus,
    pub last_assessment: Option<DateTime<Utc>>,
    pub next_assessment: Option<DateTime<Utc>>,
    // Derivado do plano de formação sempre que o plano não está vazio
    pub training_completion: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlanItem {
    pub id: String,
    pub module_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TrainingStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    // Id da RoleAssignment que originou este item
    pub role_context: Option<String>,
    pub required: bool,
}

// ---
// PersonRecord (indivíduo acompanhado pelo regime)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub id: String,
    pub firm_id: String,
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub title: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub line_manager: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub hire_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    // Individual Reference Number no registo da FCA
    pub irn: Option<String>,
    pub fca_verification: Option<FcaVerification>,
    pub is_psd: bool,
    pub psd_status: Option<String>,
    pub assessment: PersonAssessment,
    pub training_plan: Vec<TrainingPlanItem>,
    pub created_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewPerson {
    #[validate(length(min = 1, message = "Employee ID is required."))]
    pub employee_id: String,
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_manager: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irn: Option<String>,
    #[serde(default)]
    pub is_psd: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psd_status: Option<String>,
    #[serde(default)]
    pub assessment_status: AssessmentStatus,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct PersonPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[validate(length(min = 1, message = "Name cannot be empty."))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(email(message = "A valid email address is required."))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_manager: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_psd: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psd_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_status: Option<AssessmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_assessment: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_assessment: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fca_verification: Option<FcaVerification>,
}

impl PersonPatch {
    /// Aplica o patch numa cópia do registo (a árvore de estado é substituída, nunca mutada).
    pub fn apply_to(&self, person: &mut PersonRecord) {
        if let Some(v) = &self.employee_id {
            person.employee_id = v.clone();
        }
        if let Some(v) = &self.name {
            person.name = v.clone();
        }
        if let Some(v) = &self.email {
            person.email = v.clone();
        }
        if let Some(v) = &self.department {
            person.department = v.clone();
        }
        if let Some(v) = &self.title {
            person.title = Some(v.clone());
        }
        if let Some(v) = &self.phone {
            person.phone = Some(v.clone());
        }
        if let Some(v) = &self.address {
            person.address = Some(v.clone());
        }
        if let Some(v) = &self.line_manager {
            person.line_manager = Some(v.clone());
        }
        if self.start_date.is_some() {
            person.start_date = self.start_date;
        }
        if self.hire_date.is_some() {
            person.hire_date = self.hire_date;
        }
        if self.end_date.is_some() {
            person.end_date = self.end_date;
        }
        if let Some(v) = &self.irn {
            person.irn = Some(v.clone());
        }
        if let Some(v) = self.is_psd {
            person.is_psd = v;
        }
        if let Some(v) = &self.psd_status {
            person.psd_status = Some(v.clone());
        }
        if let Some(v) = self.assessment_status {
            person.assessment.status = v;
        }
        if self.last_assessment.is_some() {
            person.assessment.last_assessment = self.last_assessment;
        }
        if self.next_assessment.is_some() {
            person.assessment.next_assessment = self.next_assessment;
        }
        if let Some(v) = &self.fca_verification {
            person.fca_verification = Some(v.clone());
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTrainingItem {
    #[validate(length(min = 1, message = "Training module is required."))]
    pub module_id: String,
    #[validate(length(min = 1, message = "Training title is required."))]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TrainingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_context: Option<String>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TrainingItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TrainingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl TrainingItemPatch {
    /// Mudança de status com a data de conclusão carimbada quando aplicável.
    pub fn status(status: TrainingStatus) -> Self {
        Self {
            status: Some(status),
            completed_date: (status == TrainingStatus::Completed).then(Utc::now),
            due_date: None,
        }
    }

    pub fn apply_to(&self, item: &mut TrainingPlanItem) {
        if let Some(status) = self.status {
            item.status = status;
            if status != TrainingStatus::Completed {
                item.completed_date = None;
            }
        }
        if self.completed_date.is_some() {
            item.completed_date = self.completed_date;
        }
        if self.due_date.is_some() {
            item.due_date = self.due_date;
        }
    }
}
