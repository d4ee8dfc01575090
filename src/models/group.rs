// src/models/group.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupEntityType {
    Holding,
    Subsidiary,
    Parent,
    Associate,
    Branch,
}

impl GroupEntityType {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "holding" => Self::Holding,
            "parent" => Self::Parent,
            "associate" => Self::Associate,
            "branch" => Self::Branch,
            _ => Self::Subsidiary,
        }
    }
}

// ---
// GroupEntity (nó da estrutura societária)
// ---
// Não pertence a uma firma: é buscado globalmente. `parent_id` forma a árvore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupEntity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: GroupEntityType,
    pub parent_id: Option<String>,
    pub linked_firm_id: Option<String>,
    pub linked_project_id: Option<String>,
    pub linked_project_name: Option<String>,
    pub ownership_percent: Option<f64>,
    pub country: Option<String>,
    pub regulatory_status: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewGroupEntity {
    #[validate(length(min = 1, message = "Entity name is required."))]
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: GroupEntityType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_firm_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_project_name: Option<String>,
    #[validate(range(min = 0.0, max = 100.0, message = "Ownership must be between 0 and 100."))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regulatory_status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct GroupEntityPatch {
    #[validate(length(min = 1, message = "Entity name cannot be empty."))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<GroupEntityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_firm_id: Option<Option<String>>,
    #[validate(range(min = 0.0, max = 100.0, message = "Ownership must be between 0 and 100."))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regulatory_status: Option<String>,
}

impl GroupEntityPatch {
    pub fn apply_to(&self, entity: &mut GroupEntity) {
        if let Some(name) = &self.name {
            entity.name = name.clone();
        }
        if let Some(entity_type) = self.entity_type {
            entity.entity_type = entity_type;
        }
        if let Some(parent_id) = &self.parent_id {
            entity.parent_id = parent_id.clone();
        }
        if let Some(linked_firm_id) = &self.linked_firm_id {
            entity.linked_firm_id = linked_firm_id.clone();
        }
        if let Some(ownership) = self.ownership_percent {
            entity.ownership_percent = Some(ownership);
        }
        if let Some(country) = &self.country {
            entity.country = Some(country.clone());
        }
        if let Some(status) = &self.regulatory_status {
            entity.regulatory_status = Some(status.clone());
        }
    }
}
