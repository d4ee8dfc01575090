// tests/workflows.rs

mod support;

use smcr_backoffice::{
    api::memory::WORKFLOWS,
    catalog::templates::{CRIMINAL_CHECK_STEP, FP_CHECKLIST_STEP},
    models::{
        drafts::{CheckOutcome, CriminalCheckDraft, FpChecklistDraft, StepDraft},
        workflows::{FieldValue, LaunchWorkflow, StepStatus, WorkflowInstance, WorkflowStatus},
    },
    services::StepUpdate,
    AppError, SmcrStore,
};
use support::{loaded_store, seeded_api};

fn launch(template_id: &str) -> LaunchWorkflow {
    LaunchWorkflow {
        template_id: template_id.into(),
        owner_person_id: Some("p1".into()),
        owner_name: Some("Alice Smith".into()),
        due_date: None,
        name: Some("  Onboard new CFO  ".into()),
    }
}

fn step_id(workflow: &WorkflowInstance, template_step_id: &str) -> String {
    workflow
        .steps
        .iter()
        .find(|s| s.template_step_id == template_step_id)
        .map(|s| s.id.clone())
        .unwrap()
}

fn complete() -> StepUpdate {
    StepUpdate {
        status: Some(StepStatus::Completed),
        notes: None,
    }
}

async fn launched(store: &SmcrStore) -> WorkflowInstance {
    store.launch_workflow(launch("smf-onboarding")).await.unwrap()
}

#[tokio::test]
async fn unknown_template_fails_before_any_remote_call() {
    let api = seeded_api();
    let store = loaded_store(&api).await;

    let err = store.launch_workflow(launch("no-such-template")).await.unwrap_err();
    assert!(matches!(err, AppError::TemplateNotFound(ref id) if id == "no-such-template"));
    assert_eq!(api.call_count("create_workflow"), 0);
    assert!(store.snapshot().await.workflows.is_empty());
}

#[tokio::test]
async fn launch_persists_and_appends_instance() {
    let api = seeded_api();
    let store = loaded_store(&api).await;

    let workflow = launched(&store).await;
    assert_eq!(workflow.name, "Onboard new CFO");
    assert_eq!(workflow.firm_id, "firm-1");
    assert_eq!(workflow.status, WorkflowStatus::NotStarted);
    assert_eq!(workflow.steps.len(), 7);
    assert_eq!(api.rows(WORKFLOWS).len(), 1);
    assert_eq!(store.snapshot().await.workflows.len(), 1);

    let fp_step = workflow
        .steps
        .iter()
        .find(|s| s.template_step_id == FP_CHECKLIST_STEP)
        .unwrap();
    assert!(matches!(fp_step.draft, Some(StepDraft::FpChecklist(_))));
}

#[tokio::test]
async fn step_status_drives_workflow_status() {
    let api = seeded_api();
    let store = loaded_store(&api).await;
    let workflow = launched(&store).await;
    let first = workflow.steps[0].id.clone();

    let updated = store
        .update_workflow_step(&workflow.id, &first, complete())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, WorkflowStatus::InProgress);
    assert!(updated.steps[0].completed_at.is_some());

    for step in &workflow.steps[1..] {
        store
            .update_workflow_step(&workflow.id, &step.id, complete())
            .await
            .unwrap();
    }
    let state = store.snapshot().await;
    assert_eq!(state.workflow(&workflow.id).unwrap().status, WorkflowStatus::Completed);

    // Reabrir todas as etapas volta a not_started
    for step in &workflow.steps {
        let reopen = StepUpdate {
            status: Some(StepStatus::Pending),
            notes: Some("Reopened".into()),
        };
        store
            .update_workflow_step(&workflow.id, &step.id, reopen)
            .await
            .unwrap();
    }
    let reopened = store.snapshot().await.workflow(&workflow.id).cloned().unwrap();
    assert_eq!(reopened.status, WorkflowStatus::NotStarted);
    assert!(reopened.steps.iter().all(|s| s.completed_at.is_none()));
}

#[tokio::test]
async fn missing_step_is_a_noop_and_unknown_workflow_is_not_found() {
    let api = seeded_api();
    let store = loaded_store(&api).await;
    let workflow = launched(&store).await;
    api.reset_calls();

    let result = store
        .update_workflow_step(&workflow.id, "no-such-step", complete())
        .await
        .unwrap();
    assert!(result.is_none());
    assert_eq!(api.call_count("update_workflow"), 0);

    let err = store
        .update_workflow_step("no-such-workflow", "x", complete())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn field_updates_only_touch_steps_with_forms() {
    let api = seeded_api();
    let store = loaded_store(&api).await;
    let workflow = launched(&store).await;
    let scoping = step_id(&workflow, "role-scoping");
    let fp = step_id(&workflow, FP_CHECKLIST_STEP);

    let updated = store
        .update_workflow_field(&workflow.id, &scoping, "candidateName", "Grace Hopper".into())
        .await
        .unwrap()
        .unwrap();
    let form = updated.steps[0].form.as_ref().unwrap();
    assert_eq!(form["candidateName"], FieldValue::Text("Grace Hopper".into()));
    assert_eq!(form["internalCandidate"], FieldValue::Bool(false));
    // Campo não muda o status
    assert_eq!(updated.status, WorkflowStatus::NotStarted);

    let noop = store
        .update_workflow_field(&workflow.id, &fp, "candidateName", true.into())
        .await
        .unwrap();
    assert!(noop.is_none());
}

#[tokio::test]
async fn checklist_items_toggle_by_id() {
    let api = seeded_api();
    let store = loaded_store(&api).await;
    let workflow = launched(&store).await;
    let application = step_id(&workflow, "fca-application");
    let item_id = format!("{application}-check-0");

    let updated = store
        .toggle_checklist_item(&workflow.id, &application, &item_id, true)
        .await
        .unwrap()
        .unwrap();
    let step = updated.step(&application).unwrap();
    let checklist = step.checklist.as_ref().unwrap();
    assert!(checklist[0].completed);
    assert!(checklist[1..].iter().all(|item| !item.completed));

    let missing = store
        .toggle_checklist_item(&workflow.id, &application, "nope", true)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn draft_updates_persist_and_survive_reload() {
    let api = seeded_api();
    let store = loaded_store(&api).await;
    let workflow = launched(&store).await;
    let criminal = step_id(&workflow, CRIMINAL_CHECK_STEP);

    let updated = store
        .update_criminal_check_draft(&workflow.id, &criminal, |draft| CriminalCheckDraft {
            outcome: CheckOutcome::Clear,
            reference_number: "DBS-123".into(),
            ..draft
        })
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(
        &updated.step(&criminal).unwrap().draft,
        Some(StepDraft::CriminalCheck(d)) if d.outcome == CheckOutcome::Clear
    ));

    // Tipo de rascunho errado: nada acontece
    api.reset_calls();
    let wrong_kind = store
        .update_fp_checklist_draft(&workflow.id, &criminal, |draft: FpChecklistDraft| draft)
        .await
        .unwrap();
    assert!(wrong_kind.is_none());
    assert!(api.calls().is_empty());

    store.reload().await.unwrap();
    let reloaded = store.snapshot().await.workflow(&workflow.id).cloned().unwrap();
    match &reloaded.step(&criminal).unwrap().draft {
        Some(StepDraft::CriminalCheck(draft)) => {
            assert_eq!(draft.outcome, CheckOutcome::Clear);
            assert_eq!(draft.reference_number, "DBS-123");
        }
        other => panic!("unexpected draft: {other:?}"),
    }
}

#[tokio::test]
async fn deleting_a_workflow_drops_its_documents() {
    let api = seeded_api();
    let store = loaded_store(&api).await;
    let workflow = launched(&store).await;

    let upload = smcr_backoffice::models::documents::DocumentUpload {
        file_name: "application.pdf".into(),
        category: "fca_form".into(),
        content_type: Some("application/pdf".into()),
        step_id: Some(step_id(&workflow, "fca-application")),
        notes: None,
        bytes: vec![0u8; 2048],
    };
    let document = store.upload_workflow_document(&workflow.id, upload).await.unwrap();
    assert_eq!(document.size, 2048);
    assert_eq!(document.doc_type, "fca_form");
    assert_eq!(store.snapshot().await.documents_for_workflow(&workflow.id).len(), 1);

    store.delete_workflow(&workflow.id).await.unwrap();
    let state = store.snapshot().await;
    assert!(state.workflows.is_empty());
    assert!(state.workflow_documents.is_empty());
}
