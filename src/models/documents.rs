// src/models/documents.rs

// Só metadados: o binário fica no endpoint de blobs externo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub id: String,
    pub person_id: String,
    pub name: String,
    pub category: String,
    pub size: u64,
    pub mime_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDocument {
    pub id: String,
    pub workflow_id: String,
    pub step_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Validate)]
pub struct DocumentUpload {
    #[validate(length(min = 1, message = "File name is required."))]
    pub file_name: String,
    pub category: String,
    pub content_type: Option<String>,
    pub step_id: Option<String>,
    pub notes: Option<String>,
    pub bytes: Vec<u8>,
}
