// src/api/http_client.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;

use crate::{
    api::{
        raw::{row_from_value, rows_from_value},
        RawRow, SmcrApi,
    },
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

// Corpo das criações com escopo de firma: `{ "firm_id": ..., ...campos }`
#[derive(Serialize)]
struct FirmScoped<'a, T: Serialize> {
    firm_id: &'a str,
    #[serde(flatten)]
    body: &'a T,
}

#[derive(Serialize)]
struct TrainingBatch<'a> {
    items: &'a [NewTrainingItem],
}

/// Cliente HTTP da API REST do back-office.
#[derive(Clone)]
pub struct HttpSmcrApi {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpSmcrApi {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    // --------------------------------------------------------------------
    // Helpers HTTP privados
    // --------------------------------------------------------------------

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Envia, confere o status e devolve o corpo JSON (corpo vazio vira `null`).
    async fn send(&self, req: RequestBuilder) -> Result<Value, AppError> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| format!("{} {}", status.as_u16(), body.trim()));
            tracing::debug!(status = status.as_u16(), %message, "API request failed");
            return Err(AppError::Api {
                status: Some(status.as_u16()),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_rows(&self, path: &str) -> Result<Vec<RawRow>, AppError> {
        let value = self.send(self.request(Method::GET, path)).await?;
        Ok(rows_from_value(value))
    }

    async fn post_row<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<RawRow, AppError> {
        let value = self.send(self.request(Method::POST, path).json(body)).await?;
        Ok(row_from_value(value))
    }

    async fn patch<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<(), AppError> {
        self.send(self.request(Method::PATCH, path).json(body)).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), AppError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    async fn upload(&self, path: &str, upload: &DocumentUpload) -> Result<RawRow, AppError> {
        let mut file = multipart::Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
        if let Some(content_type) = &upload.content_type {
            file = file.mime_str(content_type)?;
        }
        let mut form = multipart::Form::new()
            .text("category", upload.category.clone())
            .part("file", file);
        if let Some(step_id) = &upload.step_id {
            form = form.text("step_id", step_id.clone());
        }
        if let Some(notes) = &upload.notes {
            form = form.text("notes", notes.clone());
        }
        let value = self.send(self.request(Method::POST, path).multipart(form)).await?;
        Ok(row_from_value(value))
    }
}

#[async_trait]
impl SmcrApi for HttpSmcrApi {
    async fn get_firms(&self) -> Result<Vec<RawRow>, AppError> {
        self.get_rows("/firms").await
    }

    async fn create_firm(&self, input: &NewFirm) -> Result<RawRow, AppError> {
        self.post_row("/firms", input).await
    }

    async fn update_firm(&self, firm_id: &str, patch: &FirmPatch) -> Result<(), AppError> {
        self.patch(&format!("/firms/{firm_id}"), patch).await
    }

    async fn get_people(&self, firm_id: &str) -> Result<Vec<RawRow>, AppError> {
        self.get_rows(&format!("/firms/{firm_id}/people")).await
    }

    async fn create_person(&self, firm_id: &str, input: &NewPerson) -> Result<RawRow, AppError> {
        self.post_row("/people", &FirmScoped { firm_id, body: input }).await
    }

    async fn update_person(&self, person_id: &str, patch: &PersonPatch) -> Result<(), AppError> {
        self.patch(&format!("/people/{person_id}"), patch).await
    }

    async fn delete_person(&self, person_id: &str) -> Result<(), AppError> {
        self.delete(&format!("/people/{person_id}")).await
    }

    async fn get_person_documents(&self, person_id: &str) -> Result<Vec<RawRow>, AppError> {
        self.get_rows(&format!("/people/{person_id}/documents")).await
    }

    async fn upload_person_document(&self, person_id: &str, upload: &DocumentUpload) -> Result<RawRow, AppError> {
        self.upload(&format!("/people/{person_id}/documents"), upload).await
    }

    async fn delete_document(&self, document_id: &str) -> Result<(), AppError> {
        self.delete(&format!("/documents/{document_id}")).await
    }

    async fn get_training_items(&self, person_id: &str) -> Result<Vec<RawRow>, AppError> {
        self.get_rows(&format!("/people/{person_id}/training-items")).await
    }

    async fn create_training_items(&self, person_id: &str, items: &[NewTrainingItem]) -> Result<Vec<RawRow>, AppError> {
        let req = self
            .request(Method::POST, &format!("/people/{person_id}/training-items"))
            .json(&TrainingBatch { items });
        Ok(rows_from_value(self.send(req).await?))
    }

    async fn update_training_item(&self, item_id: &str, patch: &TrainingItemPatch) -> Result<(), AppError> {
        self.patch(&format!("/training-items/{item_id}"), patch).await
    }

    async fn get_roles(&self, firm_id: &str) -> Result<Vec<RawRow>, AppError> {
        self.get_rows(&format!("/firms/{firm_id}/roles")).await
    }

    async fn create_role(&self, firm_id: &str, input: &NewRole) -> Result<RawRow, AppError> {
        self.post_row("/roles", &FirmScoped { firm_id, body: input }).await
    }

    async fn update_role(&self, role_id: &str, patch: &RolePatch) -> Result<(), AppError> {
        self.patch(&format!("/roles/{role_id}"), patch).await
    }

    async fn delete_role(&self, role_id: &str) -> Result<(), AppError> {
        self.delete(&format!("/roles/{role_id}")).await
    }

    async fn get_workflows(&self, firm_id: &str) -> Result<Vec<RawRow>, AppError> {
        self.get_rows(&format!("/firms/{firm_id}/workflows")).await
    }

    async fn create_workflow(&self, firm_id: &str, input: &NewWorkflow) -> Result<RawRow, AppError> {
        self.post_row("/workflows", &FirmScoped { firm_id, body: input }).await
    }

    async fn update_workflow(&self, workflow_id: &str, patch: &WorkflowPatch) -> Result<(), AppError> {
        self.patch(&format!("/workflows/{workflow_id}"), patch).await
    }

    async fn delete_workflow(&self, workflow_id: &str) -> Result<(), AppError> {
        self.delete(&format!("/workflows/{workflow_id}")).await
    }

    async fn get_workflow_documents(&self, workflow_id: &str) -> Result<Vec<RawRow>, AppError> {
        self.get_rows(&format!("/workflows/{workflow_id}/documents")).await
    }

    async fn upload_workflow_document(&self, workflow_id: &str, upload: &DocumentUpload) -> Result<RawRow, AppError> {
        self.upload(&format!("/workflows/{workflow_id}/documents"), upload).await
    }

    async fn get_assessments(&self, firm_id: &str) -> Result<Vec<RawRow>, AppError> {
        self.get_rows(&format!("/firms/{firm_id}/assessments")).await
    }

    async fn create_assessment(&self, firm_id: &str, input: &NewAssessment) -> Result<RawRow, AppError> {
        self.post_row("/assessments", &FirmScoped { firm_id, body: input }).await
    }

    async fn update_assessment(&self, assessment_id: &str, patch: &AssessmentPatch) -> Result<(), AppError> {
        self.patch(&format!("/assessments/{assessment_id}"), patch).await
    }

    async fn delete_assessment(&self, assessment_id: &str) -> Result<(), AppError> {
        self.delete(&format!("/assessments/{assessment_id}")).await
    }

    async fn get_breaches(&self, firm_id: &str) -> Result<Vec<RawRow>, AppError> {
        self.get_rows(&format!("/firms/{firm_id}/breaches")).await
    }

    async fn create_breach(&self, firm_id: &str, input: &NewBreach) -> Result<RawRow, AppError> {
        self.post_row("/breaches", &FirmScoped { firm_id, body: input }).await
    }

    async fn update_breach(&self, breach_id: &str, patch: &BreachPatch) -> Result<(), AppError> {
        self.patch(&format!("/breaches/{breach_id}"), patch).await
    }

    async fn add_breach_timeline_entry(&self, breach_id: &str, entry: &NewTimelineEntry) -> Result<RawRow, AppError> {
        self.post_row(&format!("/breaches/{breach_id}/timeline"), entry).await
    }

    async fn delete_breach(&self, breach_id: &str) -> Result<(), AppError> {
        self.delete(&format!("/breaches/{breach_id}")).await
    }

    async fn get_group_entities(&self) -> Result<Vec<RawRow>, AppError> {
        self.get_rows("/group-entities").await
    }

    async fn create_group_entity(&self, input: &NewGroupEntity) -> Result<RawRow, AppError> {
        self.post_row("/group-entities", input).await
    }

    async fn update_group_entity(&self, entity_id: &str, patch: &GroupEntityPatch) -> Result<(), AppError> {
        self.patch(&format!("/group-entities/{entity_id}"), patch).await
    }

    async fn delete_group_entity(&self, entity_id: &str) -> Result<(), AppError> {
        self.delete(&format!("/group-entities/{entity_id}")).await
    }
}
