// src/services/people_service.rs

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::{
    api::{RawRow, RegisterSnapshot},
    common::error::AppError,
    mappers::{map_document, map_person, map_training_item, map_workflow_document},
    models::{
        documents::{DocumentMetadata, DocumentUpload, WorkflowDocument},
        people::{
            FcaVerification, NewPerson, NewTrainingItem, PersonPatch, PersonRecord,
            TrainingItemPatch, TrainingPlanItem, TrainingStatus,
        },
    },
    services::store::{echo_row, SmcrStore},
    training::{merge_training_plan, recompute_completion},
};

impl SmcrStore {
    // =========================================================================
    //  1. PESSOAS
    // =========================================================================

    pub async fn add_person(&self, input: NewPerson) -> Result<PersonRecord, AppError> {
        input.validate()?;
        let firm_id = self.require_active_firm().await?;

        debug!(firm_id = %firm_id, employee_id = %input.employee_id, "create_person");
        let row = self.api.create_person(&firm_id, &input).await?;
        let mut person = map_person(&echo_row(&input, row));
        if person.firm_id.is_empty() {
            person.firm_id = firm_id.clone();
        }

        self.update_state_in(Some(firm_id.as_str()), |state| state.people.push(person.clone()))
            .await;
        info!(person_id = %person.id, "✅ Pessoa adicionada");
        Ok(person)
    }

    pub async fn update_person(&self, person_id: &str, patch: PersonPatch) -> Result<PersonRecord, AppError> {
        patch.validate()?;
        let scope = self.active_scope().await;
        let mut person = self.require_person(person_id).await?;

        debug!(person_id, "update_person");
        self.api.update_person(person_id, &patch).await?;

        // O patch é aplicado ao registo atual, não à cópia lida antes do envio
        let current = self
            .update_state_in(scope.as_deref(), |state| {
                let existing = state.people.iter_mut().find(|p| p.id == person_id)?;
                patch.apply_to(existing);
                Some(existing.clone())
            })
            .await
            .flatten();
        info!(person_id, "Pessoa atualizada");
        Ok(current.unwrap_or_else(|| {
            patch.apply_to(&mut person);
            person
        }))
    }

    /// Remove a pessoa e, localmente, os seus documentos, funções e violações.
    pub async fn delete_person(&self, person_id: &str) -> Result<(), AppError> {
        let scope = self.active_scope().await;
        self.require_person(person_id).await?;

        debug!(person_id, "delete_person");
        self.api.delete_person(person_id).await?;

        self.update_state_in(scope.as_deref(), |state| {
            state.people.retain(|p| p.id != person_id);
            state.documents.retain(|d| d.person_id != person_id);
            state.roles.retain(|r| r.person_id != person_id);
            state.breaches.retain(|b| b.person_id != person_id);
        })
        .await;
        info!(person_id, "Pessoa removida");
        Ok(())
    }

    /// Grava o snapshot do registo externo na pessoa, carimbado com agora.
    pub async fn apply_register_snapshot(
        &self,
        person_id: &str,
        snapshot: RegisterSnapshot,
    ) -> Result<PersonRecord, AppError> {
        let patch = PersonPatch {
            fca_verification: Some(FcaVerification {
                status: snapshot.status,
                last_checked: Utc::now(),
                control_functions: snapshot.control_functions,
                has_enforcement_history: snapshot.has_enforcement_history,
            }),
            ..PersonPatch::default()
        };
        self.update_person(person_id, patch).await
    }

    // =========================================================================
    //  2. DOCUMENTOS
    // =========================================================================

    pub async fn upload_person_document(
        &self,
        person_id: &str,
        upload: DocumentUpload,
    ) -> Result<DocumentMetadata, AppError> {
        upload.validate()?;
        let scope = self.active_scope().await;
        self.require_person(person_id).await?;

        debug!(person_id, file = %upload.file_name, size = upload.bytes.len(), "upload_person_document");
        let row = self.api.upload_person_document(person_id, &upload).await?;
        let sent = json!({
            "person_id": person_id,
            "name": upload.file_name,
            "category": upload.category,
            "size": upload.bytes.len(),
            "mime_type": upload.content_type,
            "notes": upload.notes,
        });
        let document = map_document(&echo_row(&sent, row));

        self.update_state_in(scope.as_deref(), |state| state.documents.push(document.clone()))
            .await;
        info!(person_id, document_id = %document.id, "Documento enviado");
        Ok(document)
    }

    pub async fn delete_person_document(&self, document_id: &str) -> Result<(), AppError> {
        let snapshot = self.snapshot().await;
        let known = snapshot.documents.iter().any(|d| d.id == document_id);
        if !known {
            return Err(AppError::NotFound(format!("document {document_id}")));
        }

        debug!(document_id, "delete_document");
        self.api.delete_document(document_id).await?;
        self.update_state_in(snapshot.active_firm_id.as_deref(), |state| {
            state.documents.retain(|d| d.id != document_id)
        })
        .await;
        Ok(())
    }

    pub async fn upload_workflow_document(
        &self,
        workflow_id: &str,
        upload: DocumentUpload,
    ) -> Result<WorkflowDocument, AppError> {
        upload.validate()?;
        let snapshot = self.snapshot().await;
        if snapshot.workflow(workflow_id).is_none() {
            return Err(AppError::NotFound(format!("workflow {workflow_id}")));
        }

        debug!(workflow_id, file = %upload.file_name, "upload_workflow_document");
        let row = self.api.upload_workflow_document(workflow_id, &upload).await?;
        let sent = json!({
            "workflow_id": workflow_id,
            "step_id": upload.step_id,
            "name": upload.file_name,
            "type": upload.category,
            "size": upload.bytes.len(),
        });
        let document = map_workflow_document(&echo_row(&sent, row));

        self.update_state_in(snapshot.active_firm_id.as_deref(), |state| {
            state.workflow_documents.push(document.clone())
        })
        .await;
        info!(workflow_id, document_id = %document.id, "Documento do workflow enviado");
        Ok(document)
    }

    pub async fn delete_workflow_document(&self, document_id: &str) -> Result<(), AppError> {
        let snapshot = self.snapshot().await;
        let known = snapshot.workflow_documents.iter().any(|d| d.id == document_id);
        if !known {
            return Err(AppError::NotFound(format!("document {document_id}")));
        }

        debug!(document_id, "delete_document");
        self.api.delete_document(document_id).await?;
        self.update_state_in(snapshot.active_firm_id.as_deref(), |state| {
            state.workflow_documents.retain(|d| d.id != document_id)
        })
        .await;
        Ok(())
    }

    // =========================================================================
    //  3. FORMAÇÃO
    // =========================================================================

    pub async fn update_training_item_status(
        &self,
        person_id: &str,
        item_id: &str,
        status: TrainingStatus,
    ) -> Result<PersonRecord, AppError> {
        let scope = self.active_scope().await;
        let mut person = self.require_person(person_id).await?;
        if !person.training_plan.iter().any(|item| item.id == item_id) {
            return Err(AppError::NotFound(format!("training item {item_id}")));
        }

        let patch = TrainingItemPatch::status(status);
        debug!(person_id, item_id, ?status, "update_training_item");
        self.api.update_training_item(item_id, &patch).await?;

        let apply = |person: &mut PersonRecord| {
            if let Some(item) = person.training_plan.iter_mut().find(|item| item.id == item_id) {
                patch.apply_to(item);
            }
            recompute_completion(person);
        };
        let current = self
            .update_state_in(scope.as_deref(), |state| {
                let existing = state.people.iter_mut().find(|p| p.id == person_id)?;
                apply(existing);
                Some(existing.clone())
            })
            .await
            .flatten();
        let person = current.unwrap_or_else(|| {
            apply(&mut person);
            person
        });
        info!(
            person_id,
            completion = person.assessment.training_completion,
            "Item de formação atualizado"
        );
        Ok(person)
    }

    pub async fn add_training_items(
        &self,
        person_id: &str,
        items: Vec<NewTrainingItem>,
    ) -> Result<Vec<TrainingPlanItem>, AppError> {
        for item in &items {
            item.validate()?;
        }
        let scope = self.active_scope().await;
        self.require_person(person_id).await?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        debug!(person_id, count = items.len(), "create_training_items");
        let rows = self.api.create_training_items(person_id, &items).await?;
        let created = created_training_items(&items, rows);
        self.merge_training(scope.as_deref(), person_id, &created).await;
        Ok(created)
    }

    /// Funde itens novos no plano da pessoa e recalcula a conclusão.
    pub(crate) async fn merge_training(&self, scope: Option<&str>, person_id: &str, items: &[TrainingPlanItem]) {
        self.update_state_in(scope, |state| {
            if let Some(person) = state.people.iter_mut().find(|p| p.id == person_id) {
                person.training_plan = merge_training_plan(&person.training_plan, items.iter().cloned());
                recompute_completion(person);
            }
        })
        .await;
    }
}

/// Linhas devolvidas são emparelhadas com os itens enviados pela ordem.
/// Itens sem linha correspondente ficam de fora (não têm id remoto).
pub(crate) fn created_training_items(sent: &[NewTrainingItem], rows: Vec<RawRow>) -> Vec<TrainingPlanItem> {
    if rows.len() != sent.len() {
        warn!(
            sent = sent.len(),
            returned = rows.len(),
            "Número de itens de formação devolvidos difere do enviado"
        );
    }
    sent.iter()
        .zip(rows)
        .map(|(item, row)| map_training_item(&echo_row(item, row)))
        .collect()
}
