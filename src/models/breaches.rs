// src/models/breaches.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreachSeverity {
    #[default]
    Minor,
    Serious,
    Severe,
}

impl BreachSeverity {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "serious" => Self::Serious,
            "severe" => Self::Severe,
            _ => Self::Minor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreachStatus {
    #[default]
    Open,
    Investigating,
    Resolved,
    Escalated,
}

impl BreachStatus {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "investigating" => Self::Investigating,
            "resolved" => Self::Resolved,
            "escalated" => Self::Escalated,
            _ => Self::Open,
        }
    }
}

// Entradas da linha do tempo são imutáveis: só se acrescenta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreachTimelineEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub author: Option<String>,
    pub action: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConductBreach {
    pub id: String,
    pub firm_id: String,
    pub person_id: String,
    pub rule_id: String,
    pub title: String,
    pub description: String,
    pub date_identified: DateTime<Utc>,
    pub severity: BreachSeverity,
    pub status: BreachStatus,
    pub investigator: Option<String>,
    pub findings: Option<String>,
    pub remediation: Option<String>,
    pub reported_to_fca: bool,
    pub timeline: Vec<BreachTimelineEntry>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewBreach {
    #[validate(length(min = 1, message = "Person is required."))]
    pub person_id: String,
    #[validate(length(min = 1, message = "Conduct rule is required."))]
    pub rule_id: String,
    #[validate(length(min = 1, message = "Title is required."))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date_identified: DateTime<Utc>,
    #[serde(default)]
    pub severity: BreachSeverity,
    #[serde(default)]
    pub status: BreachStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investigator: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BreachPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<BreachSeverity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BreachStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investigator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub findings: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_to_fca: Option<bool>,
}

impl BreachPatch {
    pub fn apply_to(&self, breach: &mut ConductBreach) {
        if let Some(v) = &self.title {
            breach.title = v.clone();
        }
        if let Some(v) = &self.description {
            breach.description = v.clone();
        }
        if let Some(v) = self.severity {
            breach.severity = v;
        }
        if let Some(v) = self.status {
            breach.status = v;
        }
        if let Some(v) = &self.investigator {
            breach.investigator = Some(v.clone());
        }
        if let Some(v) = &self.findings {
            breach.findings = Some(v.clone());
        }
        if let Some(v) = &self.remediation {
            breach.remediation = Some(v.clone());
        }
        if let Some(v) = self.reported_to_fca {
            breach.reported_to_fca = v;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTimelineEntry {
    #[validate(length(min = 1, message = "Timeline action is required."))]
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
