// src/services/workflow_service.rs

use chrono::Utc;
use tracing::{debug, info};
use validator::Validate;

use crate::{
    catalog::templates::find_template,
    common::error::AppError,
    mappers::map_workflow,
    models::{
        drafts::{
            CriminalCheckDraft, DraftKind, FpChecklistDraft, ReferenceRequestDraft,
            StatementOfResponsibilitiesDraft, TrainingPlanDraft,
        },
        workflows::{FieldValue, LaunchWorkflow, WorkflowInstance, WorkflowPatch, WorkflowStepInstance},
    },
    services::store::{echo_row, SmcrStore},
    workflow::{
        derive_workflow_status, instantiate_workflow,
        steps::{with_checklist_item, with_field_value, with_step_draft, with_step_status},
    },
};

pub use crate::workflow::steps::StepUpdate;

impl SmcrStore {
    // =========================================================================
    //  1. CICLO DE VIDA
    // =========================================================================

    pub async fn launch_workflow(&self, params: LaunchWorkflow) -> Result<WorkflowInstance, AppError> {
        params.validate()?;
        let firm_id = self.require_active_firm().await?;
        let template = find_template(&params.template_id)
            .ok_or_else(|| AppError::TemplateNotFound(params.template_id.clone()))?;

        let payload = instantiate_workflow(template, &params);
        debug!(firm_id = %firm_id, template_id = template.id, steps = payload.steps.len(), "create_workflow");
        let row = self.api.create_workflow(&firm_id, &payload).await?;

        let mut workflow = map_workflow(&echo_row(&payload, row));
        if workflow.firm_id.is_empty() {
            workflow.firm_id = firm_id.clone();
        }
        // A lista de etapas enviada é a fonte de verdade
        if workflow.steps.len() != payload.steps.len() {
            workflow.steps = payload.steps;
        }

        self.update_state_in(Some(firm_id.as_str()), |state| state.workflows.push(workflow.clone()))
            .await;
        info!(workflow_id = %workflow.id, template_id = template.id, "🚀 Workflow lançado");
        Ok(workflow)
    }

    pub async fn delete_workflow(&self, workflow_id: &str) -> Result<(), AppError> {
        let snapshot = self.snapshot().await;
        if snapshot.workflow(workflow_id).is_none() {
            return Err(AppError::NotFound(format!("workflow {workflow_id}")));
        }

        debug!(workflow_id, "delete_workflow");
        self.api.delete_workflow(workflow_id).await?;

        self.update_state_in(snapshot.active_firm_id.as_deref(), |state| {
            state.workflows.retain(|w| w.id != workflow_id);
            state.workflow_documents.retain(|d| d.workflow_id != workflow_id);
        })
        .await;
        info!(workflow_id, "Workflow removido");
        Ok(())
    }

    // =========================================================================
    //  2. ETAPAS
    // =========================================================================
    // `Ok(None)` quando a etapa (ou o dado esperado nela) não existe: nada é
    // enviado e o estado fica como está.
    // Escritas de etapas são serializadas: cada uma lê a lista já com as
    // anteriores aplicadas, e a API nunca recebe uma lista desatualizada.

    /// Calcula a nova lista de etapas, persiste e só depois aplica ao estado
    /// atual as etapas que mudaram.
    async fn persist_steps<F>(
        &self,
        workflow_id: &str,
        recompute_status: bool,
        change: F,
    ) -> Result<Option<WorkflowInstance>, AppError>
    where
        F: FnOnce(&[WorkflowStepInstance]) -> Option<Vec<WorkflowStepInstance>> + Send,
    {
        let _writing = self.step_writes.lock().await;
        let snapshot = self.snapshot().await;
        let workflow = snapshot
            .workflow(workflow_id)
            .ok_or_else(|| AppError::NotFound(format!("workflow {workflow_id}")))?;

        let Some(steps) = change(&workflow.steps) else {
            debug!(workflow_id, "Etapa ou rascunho inexistente; nada a fazer");
            return Ok(None);
        };
        let changed: Vec<WorkflowStepInstance> = steps
            .iter()
            .zip(&workflow.steps)
            .filter(|(next, previous)| next != previous)
            .map(|(next, _)| next.clone())
            .collect();

        let status = recompute_status.then(|| derive_workflow_status(&steps));
        let patch = WorkflowPatch {
            status,
            steps: Some(steps.clone()),
        };
        debug!(workflow_id, ?status, "update_workflow");
        self.api.update_workflow(workflow_id, &patch).await?;

        let current = self
            .update_state_in(snapshot.active_firm_id.as_deref(), |state| {
                let existing = state.workflows.iter_mut().find(|w| w.id == workflow_id)?;
                for step in &changed {
                    if let Some(slot) = existing.steps.iter_mut().find(|s| s.id == step.id) {
                        *slot = step.clone();
                    }
                }
                if recompute_status {
                    existing.status = derive_workflow_status(&existing.steps);
                }
                Some(existing.clone())
            })
            .await
            .flatten();

        Ok(Some(current.unwrap_or_else(|| {
            let mut updated = workflow.clone();
            updated.steps = steps;
            if let Some(status) = status {
                updated.status = status;
            }
            updated
        })))
    }

    pub async fn update_workflow_step(
        &self,
        workflow_id: &str,
        step_id: &str,
        update: StepUpdate,
    ) -> Result<Option<WorkflowInstance>, AppError> {
        let recompute = update.status.is_some();
        let now = Utc::now();
        let result = self
            .persist_steps(workflow_id, recompute, |steps| {
                with_step_status(steps, step_id, &update, now)
            })
            .await?;
        if let Some(workflow) = &result {
            info!(
                workflow_id,
                step_id,
                status = ?workflow.status,
                completed = workflow.completed_steps(),
                "Etapa atualizada"
            );
        }
        Ok(result)
    }

    pub async fn update_workflow_field(
        &self,
        workflow_id: &str,
        step_id: &str,
        field_id: &str,
        value: FieldValue,
    ) -> Result<Option<WorkflowInstance>, AppError> {
        self.persist_steps(workflow_id, false, |steps| {
            with_field_value(steps, step_id, field_id, value)
        })
        .await
    }

    pub async fn toggle_checklist_item(
        &self,
        workflow_id: &str,
        step_id: &str,
        item_id: &str,
        completed: bool,
    ) -> Result<Option<WorkflowInstance>, AppError> {
        self.persist_steps(workflow_id, false, |steps| {
            with_checklist_item(steps, step_id, item_id, completed)
        })
        .await
    }

    // =========================================================================
    //  3. RASCUNHOS
    // =========================================================================

    /// Aplica `transform` ao rascunho do tipo `D` da etapa.
    pub async fn update_step_draft<D, F>(
        &self,
        workflow_id: &str,
        step_id: &str,
        transform: F,
    ) -> Result<Option<WorkflowInstance>, AppError>
    where
        D: DraftKind + Send,
        F: FnOnce(D) -> D + Send,
    {
        let now = Utc::now();
        self.persist_steps(workflow_id, false, |steps| {
            with_step_draft(steps, step_id, transform, now)
        })
        .await
    }

    pub async fn update_fp_checklist_draft(
        &self,
        workflow_id: &str,
        step_id: &str,
        transform: impl FnOnce(FpChecklistDraft) -> FpChecklistDraft + Send,
    ) -> Result<Option<WorkflowInstance>, AppError> {
        self.update_step_draft(workflow_id, step_id, transform).await
    }

    pub async fn update_reference_request_draft(
        &self,
        workflow_id: &str,
        step_id: &str,
        transform: impl FnOnce(ReferenceRequestDraft) -> ReferenceRequestDraft + Send,
    ) -> Result<Option<WorkflowInstance>, AppError> {
        self.update_step_draft(workflow_id, step_id, transform).await
    }

    pub async fn update_criminal_check_draft(
        &self,
        workflow_id: &str,
        step_id: &str,
        transform: impl FnOnce(CriminalCheckDraft) -> CriminalCheckDraft + Send,
    ) -> Result<Option<WorkflowInstance>, AppError> {
        self.update_step_draft(workflow_id, step_id, transform).await
    }

    pub async fn update_training_plan_draft(
        &self,
        workflow_id: &str,
        step_id: &str,
        transform: impl FnOnce(TrainingPlanDraft) -> TrainingPlanDraft + Send,
    ) -> Result<Option<WorkflowInstance>, AppError> {
        self.update_step_draft(workflow_id, step_id, transform).await
    }

    pub async fn update_statement_of_responsibilities_draft(
        &self,
        workflow_id: &str,
        step_id: &str,
        transform: impl FnOnce(StatementOfResponsibilitiesDraft) -> StatementOfResponsibilitiesDraft + Send,
    ) -> Result<Option<WorkflowInstance>, AppError> {
        self.update_step_draft(workflow_id, step_id, transform).await
    }
}
