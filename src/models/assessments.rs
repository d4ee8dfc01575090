// src/models/assessments.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::people::AssessmentStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessStatus {
    #[default]
    Draft,
    InReview,
    Completed,
}

impl FitnessStatus {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "in_review" => Self::InReview,
            "completed" => Self::Completed,
            _ => Self::Draft,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Determination {
    #[serde(rename = "Fit and Proper")]
    FitAndProper,
    #[serde(rename = "Conditional")]
    Conditional,
    #[serde(rename = "Not Fit and Proper")]
    NotFitAndProper,
}

impl Determination {
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fit and proper" | "fit_and_proper" => Some(Self::FitAndProper),
            "conditional" => Some(Self::Conditional),
            "not fit and proper" | "not_fit_and_proper" => Some(Self::NotFitAndProper),
            _ => None,
        }
    }

    /// Status de avaliação que a determinação projeta na pessoa.
    pub fn person_status(self) -> AssessmentStatus {
        match self {
            Determination::FitAndProper => AssessmentStatus::Current,
            Determination::Conditional => AssessmentStatus::Due,
            Determination::NotFitAndProper => AssessmentStatus::Overdue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessResponse {
    pub question_id: String,
    pub value: String,
    pub notes: Option<String>,
}

// ---
// Avaliação de Fitness & Propriety (pontual, por pessoa)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessAssessmentRecord {
    pub id: String,
    pub firm_id: String,
    pub person_id: String,
    pub person_name: Option<String>,
    pub role: Option<String>,
    pub assessment_date: DateTime<Utc>,
    pub next_due_date: Option<DateTime<Utc>>,
    pub status: FitnessStatus,
    pub overall_determination: Option<Determination>,
    pub conditions: Vec<String>,
    pub responses: Vec<FitnessResponse>,
    pub reviewer: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewAssessment {
    #[validate(length(min = 1, message = "Person is required."))]
    pub person_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub assessment_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: FitnessStatus,
    // Vazio: o store semeia uma resposta por pergunta canônica
    #[serde(default)]
    pub responses: Vec<FitnessResponse>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AssessmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FitnessStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_determination: Option<Determination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<Vec<FitnessResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<DateTime<Utc>>,
}

impl AssessmentPatch {
    pub fn apply_to(&self, record: &mut FitnessAssessmentRecord) {
        if let Some(status) = self.status {
            record.status = status;
        }
        if self.overall_determination.is_some() {
            record.overall_determination = self.overall_determination;
        }
        if let Some(conditions) = &self.conditions {
            record.conditions = conditions.clone();
        }
        if let Some(responses) = &self.responses {
            record.responses = responses.clone();
        }
        if let Some(reviewer) = &self.reviewer {
            record.reviewer = Some(reviewer.clone());
        }
        if let Some(date) = self.assessment_date {
            record.assessment_date = date;
        }
        if self.next_due_date.is_some() {
            record.next_due_date = self.next_due_date;
        }
    }
}
