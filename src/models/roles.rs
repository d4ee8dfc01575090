// src/models/roles.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionType {
    #[serde(rename = "SMF")]
    Smf,
    #[serde(rename = "CF")]
    Cf,
}

impl FunctionType {
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("cf") {
            Self::Cf
        } else {
            Self::Smf
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            _ => Self::Draft,
        }
    }
}

// ---
// RoleAssignment (pessoa -> função regulada, com intervalo de datas)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    pub id: String,
    pub firm_id: String,
    pub person_id: String,
    pub function_type: FunctionType,
    pub function_id: String,
    pub function_label: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub assessment_date: Option<DateTime<Utc>>,
    pub approval_status: ApprovalStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl RoleAssignment {
    /// Intervalos semiabertos `[start, end)`; sem data de fim vai até o infinito.
    /// Começar exatamente no fim de outra atribuição não é sobreposição.
    pub fn overlaps(&self, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> bool {
        let starts_before_other_ends = end.is_none_or(|end| self.start_date < end);
        let other_starts_before_end = self.end_date.is_none_or(|own_end| start < own_end);
        starts_before_other_ends && other_starts_before_end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_role_dates"))]
pub struct NewRole {
    #[validate(length(min = 1, message = "Person is required."))]
    pub person_id: String,
    pub function_type: FunctionType,
    #[validate(length(min = 1, message = "Function is required."))]
    pub function_id: String,
    // Vazio: o store preenche a partir do catálogo
    #[serde(default)]
    pub function_label: String,
    pub start_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub notes: String,
}

fn validate_role_dates(role: &NewRole) -> Result<(), ValidationError> {
    match role.end_date {
        Some(end) if end < role.start_date => {
            let mut err = ValidationError::new("end_before_start");
            err.message = Some("End date must be on or after the start date.".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RolePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<ApprovalStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RolePatch {
    pub fn apply_to(&self, role: &mut RoleAssignment) {
        if self.end_date.is_some() {
            role.end_date = self.end_date;
        }
        if self.assessment_date.is_some() {
            role.assessment_date = self.assessment_date;
        }
        if let Some(status) = self.approval_status {
            role.approval_status = status;
        }
        if let Some(notes) = &self.notes {
            role.notes = notes.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn role(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> RoleAssignment {
        RoleAssignment {
            id: "r1".into(),
            firm_id: "f1".into(),
            person_id: "p1".into(),
            function_type: FunctionType::Smf,
            function_id: "SMF16".into(),
            function_label: "Compliance Oversight".into(),
            start_date: start,
            end_date: end,
            assessment_date: None,
            approval_status: ApprovalStatus::Approved,
            notes: String::new(),
            created_at: start,
        }
    }

    #[test]
    fn open_ended_role_overlaps_anything_after_start() {
        let existing = role(date(2024, 1, 1), None);
        assert!(existing.overlaps(date(2024, 6, 1), None));
        assert!(existing.overlaps(date(2023, 1, 1), Some(date(2024, 1, 2))));
        assert!(!existing.overlaps(date(2023, 1, 1), Some(date(2024, 1, 1))));
        assert!(!existing.overlaps(date(2023, 1, 1), Some(date(2023, 12, 31))));
    }

    #[test]
    fn bounded_role_only_overlaps_inside_its_period() {
        let existing = role(date(2024, 1, 1), Some(date(2024, 6, 30)));
        assert!(existing.overlaps(date(2024, 5, 1), None));
        assert!(existing.overlaps(date(2024, 6, 29), None));
        // O dia do fim já está livre
        assert!(!existing.overlaps(date(2024, 6, 30), None));
        assert!(!existing.overlaps(date(2024, 7, 1), None));
    }

    #[test]
    fn end_before_start_fails_validation() {
        let input = NewRole {
            person_id: "p1".into(),
            function_type: FunctionType::Smf,
            function_id: "SMF1".into(),
            function_label: String::new(),
            start_date: date(2024, 2, 1),
            end_date: Some(date(2024, 1, 1)),
            assessment_date: None,
            approval_status: ApprovalStatus::Draft,
            notes: String::new(),
        };
        assert!(input.validate().is_err());
    }
}
