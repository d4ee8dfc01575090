// src/workflow/steps.rs

// ---
// Mutações imutáveis sobre a lista de etapas
// ---
// Cada função devolve uma lista NOVA, ou `None` quando a etapa (ou o dado
// esperado nela) não existe: nesse caso a operação é um no-op.

use chrono::{DateTime, Utc};

use crate::models::{
    drafts::DraftKind,
    workflows::{FieldValue, StepStatus, WorkflowStatus, WorkflowStepInstance},
};

/// `completed` se todas concluídas (e há pelo menos uma), `in_progress` se
/// algumas, senão `not_started`.
pub fn derive_workflow_status(steps: &[WorkflowStepInstance]) -> WorkflowStatus {
    let completed = steps
        .iter()
        .filter(|s| s.status == StepStatus::Completed)
        .count();
    match completed {
        0 => WorkflowStatus::NotStarted,
        n if n == steps.len() => WorkflowStatus::Completed,
        _ => WorkflowStatus::InProgress,
    }
}

#[derive(Debug, Clone, Default)]
pub struct StepUpdate {
    pub status: Option<StepStatus>,
    pub notes: Option<String>,
}

fn map_step(
    steps: &[WorkflowStepInstance],
    step_id: &str,
    change: impl FnOnce(&WorkflowStepInstance) -> Option<WorkflowStepInstance>,
) -> Option<Vec<WorkflowStepInstance>> {
    let index = steps.iter().position(|s| s.id == step_id)?;
    let updated = change(&steps[index])?;
    let mut next = steps.to_vec();
    next[index] = updated;
    Some(next)
}

pub fn with_step_status(
    steps: &[WorkflowStepInstance],
    step_id: &str,
    update: &StepUpdate,
    now: DateTime<Utc>,
) -> Option<Vec<WorkflowStepInstance>> {
    map_step(steps, step_id, |step| {
        let mut step = step.clone();
        if let Some(status) = update.status {
            if status != step.status {
                step.completed_at = (status == StepStatus::Completed).then_some(now);
            }
            step.status = status;
        }
        if let Some(notes) = &update.notes {
            step.notes = Some(notes.clone());
        }
        Some(step)
    })
}

/// Só altera etapas que têm formulário.
pub fn with_field_value(
    steps: &[WorkflowStepInstance],
    step_id: &str,
    field_id: &str,
    value: FieldValue,
) -> Option<Vec<WorkflowStepInstance>> {
    map_step(steps, step_id, |step| {
        let mut form = step.form.clone()?;
        form.insert(field_id.to_string(), value);
        Some(WorkflowStepInstance {
            form: Some(form),
            ..step.clone()
        })
    })
}

pub fn with_checklist_item(
    steps: &[WorkflowStepInstance],
    step_id: &str,
    item_id: &str,
    completed: bool,
) -> Option<Vec<WorkflowStepInstance>> {
    map_step(steps, step_id, |step| {
        let mut checklist = step.checklist.clone()?;
        let item = checklist.iter_mut().find(|item| item.id == item_id)?;
        item.completed = completed;
        Some(WorkflowStepInstance {
            checklist: Some(checklist),
            ..step.clone()
        })
    })
}

/// Aplica a transformação ao rascunho do tipo `D`, se a etapa tiver um.
pub fn with_step_draft<D, F>(
    steps: &[WorkflowStepInstance],
    step_id: &str,
    transform: F,
    now: DateTime<Utc>,
) -> Option<Vec<WorkflowStepInstance>>
where
    D: DraftKind,
    F: FnOnce(D) -> D,
{
    map_step(steps, step_id, |step| {
        let current = step.draft.as_ref().and_then(D::from_step_draft)?.clone();
        let mut next = transform(current);
        next.touch(now);
        Some(WorkflowStepInstance {
            draft: Some(next.into_step_draft()),
            ..step.clone()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::templates::find_template,
        models::{
            drafts::{CheckOutcome, CriminalCheckDraft, TrainingPlanDraft},
            workflows::LaunchWorkflow,
        },
        workflow::instantiate_workflow,
    };

    fn onboarding_steps() -> Vec<WorkflowStepInstance> {
        let template = find_template("smf-onboarding").unwrap();
        let params = LaunchWorkflow {
            template_id: template.id.to_string(),
            ..Default::default()
        };
        instantiate_workflow(template, &params).steps
    }

    fn with_statuses(statuses: &[StepStatus]) -> Vec<WorkflowStepInstance> {
        let base = onboarding_steps();
        statuses
            .iter()
            .zip(base.iter().cycle())
            .map(|(status, step)| WorkflowStepInstance {
                status: *status,
                ..step.clone()
            })
            .collect()
    }

    #[test]
    fn status_derivation_rule() {
        use StepStatus::*;
        assert_eq!(derive_workflow_status(&[]), WorkflowStatus::NotStarted);
        assert_eq!(derive_workflow_status(&with_statuses(&[Pending, Pending])), WorkflowStatus::NotStarted);
        assert_eq!(derive_workflow_status(&with_statuses(&[Completed, Pending])), WorkflowStatus::InProgress);
        assert_eq!(derive_workflow_status(&with_statuses(&[Completed, Completed])), WorkflowStatus::Completed);
        assert_eq!(derive_workflow_status(&with_statuses(&[Completed])), WorkflowStatus::Completed);
    }

    #[test]
    fn status_regression_goes_back_to_not_started() {
        let steps = onboarding_steps();
        let now = Utc::now();
        let first = steps[0].id.clone();
        let done = StepUpdate { status: Some(StepStatus::Completed), notes: None };
        let undone = StepUpdate { status: Some(StepStatus::Pending), notes: None };

        let steps = with_step_status(&steps, &first, &done, now).unwrap();
        assert_eq!(derive_workflow_status(&steps), WorkflowStatus::InProgress);
        assert_eq!(steps[0].completed_at, Some(now));

        let steps = with_step_status(&steps, &first, &undone, now).unwrap();
        assert_eq!(derive_workflow_status(&steps), WorkflowStatus::NotStarted);
        assert!(steps[0].completed_at.is_none());
    }

    #[test]
    fn unknown_step_is_a_no_op() {
        let steps = onboarding_steps();
        let update = StepUpdate { status: Some(StepStatus::Completed), notes: None };
        assert!(with_step_status(&steps, "missing", &update, Utc::now()).is_none());
        assert!(with_field_value(&steps, "missing", "x", FieldValue::Bool(true)).is_none());
    }

    #[test]
    fn field_and_checklist_edits_leave_original_untouched() {
        let steps = onboarding_steps();
        let scoping = steps[0].id.clone();
        let next = with_field_value(&steps, &scoping, "candidateName", "Jane Doe".into()).unwrap();
        assert_eq!(next[0].form.as_ref().unwrap()["candidateName"], FieldValue::from("Jane Doe"));
        assert_eq!(steps[0].form.as_ref().unwrap()["candidateName"], FieldValue::from(""));

        let application = steps.last().unwrap();
        let item = application.checklist.as_ref().unwrap()[1].id.clone();
        let next = with_checklist_item(&steps, &application.id, &item, true).unwrap();
        assert!(next.last().unwrap().checklist.as_ref().unwrap()[1].completed);
        assert!(with_checklist_item(&steps, &application.id, "nope", true).is_none());
        // etapa sem checklist
        assert!(with_checklist_item(&steps, &scoping, &item, true).is_none());
    }

    #[test]
    fn draft_update_requires_matching_kind() {
        let steps = onboarding_steps();
        let criminal = steps
            .iter()
            .find(|s| s.template_step_id == "criminal-record-check")
            .unwrap()
            .id
            .clone();
        let now = Utc::now();

        let next = with_step_draft(&steps, &criminal, |mut d: CriminalCheckDraft| {
            d.outcome = CheckOutcome::Clear;
            d
        }, now)
        .unwrap();
        let step = next.iter().find(|s| s.id == criminal).unwrap();
        match step.draft.as_ref().unwrap() {
            crate::models::drafts::StepDraft::CriminalCheck(d) => {
                assert_eq!(d.outcome, CheckOutcome::Clear);
                assert_eq!(d.last_updated, now);
            }
            other => panic!("unexpected draft {other:?}"),
        }

        // mesmo passo, tipo de rascunho errado
        assert!(with_step_draft(&steps, &criminal, |d: TrainingPlanDraft| d, now).is_none());
    }
}
