// src/models/firm.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ---
// Firm (a entidade raiz do escopo)
// ---
// Exatamente uma firma fica "ativa" de cada vez.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Firm {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    // Referência solta a um projeto de autorização externo (sem integridade referencial)
    pub authorization_project_id: Option<String>,
    pub authorization_project_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewFirm {
    #[validate(length(min = 1, message = "Firm name is required."))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_project_name: Option<String>,
}

// `Some(None)` é enviado como `null` para desligar o projeto.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct FirmPatch {
    #[validate(length(min = 1, message = "Firm name cannot be empty."))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_project_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_project_name: Option<Option<String>>,
}

impl FirmPatch {
    pub fn apply_to(&self, firm: &mut Firm) {
        if let Some(name) = &self.name {
            firm.name = name.clone();
        }
        if let Some(project_id) = &self.authorization_project_id {
            firm.authorization_project_id = project_id.clone();
        }
        if let Some(project_name) = &self.authorization_project_name {
            firm.authorization_project_name = project_name.clone();
        }
    }
}
