// src/workflow/instantiate.rs

use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    catalog::templates::{FieldDefinition, FieldType, WorkflowTemplate, WorkflowTemplateStep},
    models::workflows::{
        ChecklistItem, FieldValue, LaunchWorkflow, NewWorkflow, StepStatus, WorkflowStatus,
        WorkflowStepInstance,
    },
    workflow::drafts::default_draft_for_step,
};

/// Valor inicial de um campo de formulário.
///
/// Booleanos começam em `false`. Selects usam o default explícito; sem ele,
/// um select obrigatório começa vazio e um opcional usa a primeira opção.
pub fn seed_field_value(field: &FieldDefinition) -> FieldValue {
    match field.field_type {
        FieldType::Boolean => FieldValue::Bool(false),
        FieldType::Select => match field.default {
            Some(default) => FieldValue::from(default),
            None if field.required => FieldValue::from(""),
            None => FieldValue::from(field.options.first().copied().unwrap_or("")),
        },
        _ => FieldValue::from(field.default.unwrap_or("")),
    }
}

pub fn instantiate_step(step: &WorkflowTemplateStep) -> WorkflowStepInstance {
    let id = Uuid::new_v4().to_string();

    let form = (!step.fields.is_empty()).then(|| {
        step.fields
            .iter()
            .map(|field| (field.id.to_string(), seed_field_value(field)))
            .collect::<BTreeMap<_, _>>()
    });

    let checklist = (!step.checklist.is_empty()).then(|| {
        step.checklist
            .iter()
            .enumerate()
            .map(|(index, text)| ChecklistItem {
                id: format!("{id}-check-{index}"),
                text: text.to_string(),
                completed: false,
            })
            .collect()
    });

    WorkflowStepInstance {
        template_step_id: step.id.to_string(),
        title: step.title.to_string(),
        description: step.description.to_string(),
        status: StepStatus::Pending,
        notes: None,
        completed_at: None,
        form,
        checklist,
        draft: default_draft_for_step(step.id),
        id,
    }
}

/// Expande o template numa instância nova (ainda não persistida).
pub fn instantiate_workflow(template: &WorkflowTemplate, params: &LaunchWorkflow) -> NewWorkflow {
    let name = params
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(template.name)
        .to_string();

    NewWorkflow {
        template_id: template.id.to_string(),
        name,
        summary: template.summary.to_string(),
        owner_person_id: params.owner_person_id.clone(),
        owner_name: params.owner_name.clone(),
        launched_at: Utc::now(),
        due_date: params.due_date,
        status: WorkflowStatus::NotStarted,
        steps: template.steps.iter().map(instantiate_step).collect(),
        success_criteria: template.success_criteria.iter().map(|c| c.to_string()).collect(),
        trigger: template.trigger.map(str::to_string),
    }
}
