// src/models/drafts.rs

// ---
// Rascunhos especializados de etapas de workflow
// ---
// Cada etapa carrega no máximo UM rascunho; o enum `StepDraft` garante isso.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::assessments::Determination;

// --- Fit & Proper ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FpAnswer {
    Yes,
    No,
    NotApplicable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FpCheck {
    pub question_id: String,
    pub question: String,
    pub answer: Option<FpAnswer>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FpChecklistDraft {
    pub candidate_name: String,
    pub role: String,
    pub checks: Vec<FpCheck>,
    pub determination: Option<Determination>,
    pub conditions: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

// --- Referências regulatórias ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceStatus {
    #[default]
    NotSent,
    Sent,
    Chased,
    Received,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceRequest {
    pub id: String,
    pub previous_employer: String,
    pub contact_name: String,
    pub contact_email: String,
    pub period_from: Option<DateTime<Utc>>,
    pub period_to: Option<DateTime<Utc>>,
    pub status: ReferenceStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub received_at: Option<DateTime<Utc>>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceRequestDraft {
    pub requests: Vec<ReferenceRequest>,
    pub last_updated: DateTime<Utc>,
}

// --- Certidão criminal ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckLevel {
    Basic,
    #[default]
    Standard,
    Enhanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    #[default]
    Pending,
    Clear,
    Disclosed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriminalCheckDraft {
    pub provider: String,
    pub check_level: CheckLevel,
    pub reference_number: String,
    pub requested_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub outcome: CheckOutcome,
    pub notes: String,
    pub last_updated: DateTime<Utc>,
}

// --- Plano de formação ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlanDraftItem {
    pub module_id: String,
    pub title: String,
    pub due_date: Option<DateTime<Utc>>,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlanDraft {
    pub modules: Vec<TrainingPlanDraftItem>,
    pub notes: String,
    pub last_updated: DateTime<Utc>,
}

// --- Statement of Responsibilities ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SorFunctionEntry {
    pub function_id: String,
    pub title: String,
    pub assigned_person_id: Option<String>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SorResponsibilityEntry {
    pub responsibility_id: String,
    pub title: String,
    pub assigned_person_id: Option<String>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementOfResponsibilitiesDraft {
    pub functions: Vec<SorFunctionEntry>,
    pub responsibilities: Vec<SorResponsibilityEntry>,
    pub overall_responsibilities: String,
    pub last_updated: DateTime<Utc>,
}

// ---
// O "slot" polimórfico da etapa
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum StepDraft {
    FpChecklist(FpChecklistDraft),
    ReferenceRequest(ReferenceRequestDraft),
    CriminalCheck(CriminalCheckDraft),
    TrainingPlan(TrainingPlanDraft),
    StatementOfResponsibilities(StatementOfResponsibilitiesDraft),
}

/// Liga cada tipo de rascunho à sua variante de `StepDraft`.
pub trait DraftKind: Clone + Sized {
    fn from_step_draft(draft: &StepDraft) -> Option<&Self>;
    fn into_step_draft(self) -> StepDraft;
    fn touch(&mut self, at: DateTime<Utc>);
}

impl DraftKind for FpChecklistDraft {
    fn from_step_draft(draft: &StepDraft) -> Option<&Self> {
        match draft {
            StepDraft::FpChecklist(d) => Some(d),
            _ => None,
        }
    }

    fn into_step_draft(self) -> StepDraft {
        StepDraft::FpChecklist(self)
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.last_updated = at;
    }
}

impl DraftKind for ReferenceRequestDraft {
    fn from_step_draft(draft: &StepDraft) -> Option<&Self> {
        match draft {
            StepDraft::ReferenceRequest(d) => Some(d),
            _ => None,
        }
    }

    fn into_step_draft(self) -> StepDraft {
        StepDraft::ReferenceRequest(self)
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.last_updated = at;
    }
}

impl DraftKind for CriminalCheckDraft {
    fn from_step_draft(draft: &StepDraft) -> Option<&Self> {
        match draft {
            StepDraft::CriminalCheck(d) => Some(d),
            _ => None,
        }
    }

    fn into_step_draft(self) -> StepDraft {
        StepDraft::CriminalCheck(self)
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.last_updated = at;
    }
}

impl DraftKind for TrainingPlanDraft {
    fn from_step_draft(draft: &StepDraft) -> Option<&Self> {
        match draft {
            StepDraft::TrainingPlan(d) => Some(d),
            _ => None,
        }
    }

    fn into_step_draft(self) -> StepDraft {
        StepDraft::TrainingPlan(self)
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.last_updated = at;
    }
}

impl DraftKind for StatementOfResponsibilitiesDraft {
    fn from_step_draft(draft: &StepDraft) -> Option<&Self> {
        match draft {
            StepDraft::StatementOfResponsibilities(d) => Some(d),
            _ => None,
        }
    }

    fn into_step_draft(self) -> StepDraft {
        StepDraft::StatementOfResponsibilities(self)
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.last_updated = at;
    }
}
