// tests/workspace.rs

mod support;

use std::sync::Arc;

use serde_json::json;

use smcr_backoffice::{
    api::{
        memory::{BREACHES, GROUP_ENTITIES, PERSON_DOCUMENTS, ROLES, TRAINING_ITEMS},
        InMemorySmcrApi,
    },
    models::{
        firm::NewFirm,
        group::{GroupEntityType, NewGroupEntity},
        people::{NewPerson, PersonPatch, TrainingStatus},
    },
    AppError, SmcrStore,
};
use support::{loaded_store, seeded_api};

fn new_person(name: &str) -> NewPerson {
    NewPerson {
        employee_id: "E42".into(),
        name: name.into(),
        email: "new.person@acme.test".into(),
        department: "Risk".into(),
        title: Some("Head of Risk".into()),
        phone: None,
        address: None,
        line_manager: None,
        start_date: None,
        hire_date: None,
        irn: None,
        is_psd: false,
        psd_status: None,
        assessment_status: Default::default(),
    }
}

#[tokio::test]
async fn load_selects_first_firm_and_scopes_people() {
    let api = seeded_api();
    let store = loaded_store(&api).await;
    let state = store.snapshot().await;

    assert!(state.is_ready);
    assert!(state.load_error.is_none());
    assert_eq!(state.firms.len(), 2);
    assert_eq!(state.active_firm().unwrap().name, "Acme Capital");
    assert_eq!(state.people.len(), 3);
    assert!(state.people.iter().all(|p| p.firm_id == "firm-1"));
}

#[tokio::test]
async fn switching_firm_discards_the_previous_tree() {
    let api = seeded_api();
    let store = loaded_store(&api).await;

    store.set_active_firm("firm-2").await.unwrap();
    let state = store.snapshot().await;
    assert_eq!(state.active_firm_id.as_deref(), Some("firm-2"));
    let names: Vec<&str> = state.people.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Dan Brown"]);

    let err = store.set_active_firm("firm-404").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn failed_sub_fetches_degrade_to_empty() {
    let api = seeded_api();
    api.seed(
        PERSON_DOCUMENTS,
        [json!({ "id": "d1", "person_id": "p1", "name": "passport.pdf", "size": 1024 })],
    );
    api.seed(
        TRAINING_ITEMS,
        [json!({ "id": "t1", "person_id": "p1", "module_id": "m1", "title": "Conduct rules", "status": "completed" })],
    );
    api.fail_on("get_person_documents");

    let store = loaded_store(&api).await;
    let state = store.snapshot().await;

    assert!(state.load_error.is_none());
    assert!(state.documents.is_empty());
    assert_eq!(state.people.len(), 3);
    // A formação continua a chegar mesmo sem documentos
    assert_eq!(state.training_for_person("p1").len(), 1);
    assert_eq!(state.person("p1").unwrap().assessment.training_completion, 100);
}

#[tokio::test]
async fn top_level_failure_is_recorded_not_returned() {
    let api = seeded_api();
    api.fail_on("get_roles");

    let store = loaded_store(&api).await;
    let state = store.snapshot().await;

    assert!(state.is_ready);
    assert!(state.load_error.as_deref().unwrap().contains("get_roles failed"));
    assert!(state.people.is_empty());
}

#[tokio::test]
async fn mutations_require_an_active_firm() {
    let api = Arc::new(InMemorySmcrApi::new());
    let store = SmcrStore::new(api.clone());
    store.load_firms().await;

    let state = store.snapshot().await;
    assert!(state.is_ready);
    assert!(state.active_firm_id.is_none());

    let err = store.add_person(new_person("Eve Adams")).await.unwrap_err();
    assert!(matches!(err, AppError::NoActiveFirm));
    assert_eq!(api.call_count("create_person"), 0);

    // A primeira firma criada passa a ser a ativa
    let firm = store
        .create_firm(NewFirm {
            name: "Gamma Bank".into(),
            authorization_project_id: None,
            authorization_project_name: None,
        })
        .await
        .unwrap();
    assert_eq!(store.snapshot().await.active_firm_id.as_deref(), Some(firm.id.as_str()));

    let person = store.add_person(new_person("Eve Adams")).await.unwrap();
    assert_eq!(person.firm_id, firm.id);
    assert_eq!(person.department, "Risk");
}

#[tokio::test]
async fn person_validation_runs_before_remote_call() {
    let api = seeded_api();
    let store = loaded_store(&api).await;
    api.reset_calls();

    let mut input = new_person("Frank");
    input.email = "not-an-email".into();
    let err = store.add_person(input).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn remote_failure_leaves_people_unchanged() {
    let api = seeded_api();
    let store = loaded_store(&api).await;
    api.fail_on("update_person");

    let patch = PersonPatch {
        department: Some("Legal".into()),
        ..PersonPatch::default()
    };
    assert!(store.update_person("p1", patch.clone()).await.is_err());
    assert_eq!(store.snapshot().await.person("p1").unwrap().department, "");

    api.clear_failures();
    let updated = store.update_person("p1", patch).await.unwrap();
    assert_eq!(updated.department, "Legal");
    assert_eq!(store.snapshot().await.person("p1").unwrap().department, "Legal");
}

#[tokio::test]
async fn deleting_a_person_cascades_locally() {
    let api = seeded_api();
    api.seed(
        PERSON_DOCUMENTS,
        [
            json!({ "id": "d1", "person_id": "p1", "name": "cv.pdf" }),
            json!({ "id": "d2", "person_id": "p2", "name": "cv.pdf" }),
        ],
    );
    api.seed(
        ROLES,
        [
            json!({ "id": "r1", "firm_id": "firm-1", "person_id": "p1", "function_id": "SMF1", "start_date": "2024-01-01" }),
            json!({ "id": "r2", "firm_id": "firm-1", "person_id": "p2", "function_id": "SMF3", "start_date": "2024-01-01" }),
        ],
    );
    api.seed(
        BREACHES,
        [json!({ "id": "b1", "firm_id": "firm-1", "person_id": "p1", "rule_id": "ICR1", "title": "Late filing" })],
    );
    let store = loaded_store(&api).await;
    assert_eq!(store.snapshot().await.documents.len(), 2);

    store.delete_person("p1").await.unwrap();

    let state = store.snapshot().await;
    assert!(state.person("p1").is_none());
    assert!(state.documents_for_person("p1").is_empty());
    assert!(state.roles_for_person("p1").is_empty());
    assert!(state.breaches_for_person("p1").is_empty());
    assert_eq!(state.documents_for_person("p2").len(), 1);
    assert_eq!(state.roles_for_person("p2").len(), 1);
}

#[tokio::test]
async fn training_status_change_recomputes_completion() {
    let api = seeded_api();
    api.seed(
        TRAINING_ITEMS,
        [
            json!({ "id": "t1", "person_id": "p2", "module_id": "m1", "title": "A", "status": "completed" }),
            json!({ "id": "t2", "person_id": "p2", "module_id": "m2", "title": "B", "status": "in_progress" }),
            json!({ "id": "t3", "person_id": "p2", "module_id": "m3", "title": "C", "status": "not_started" }),
        ],
    );
    let store = loaded_store(&api).await;
    assert_eq!(store.snapshot().await.person("p2").unwrap().assessment.training_completion, 33);

    let person = store
        .update_training_item_status("p2", "t2", TrainingStatus::Completed)
        .await
        .unwrap();
    assert_eq!(person.assessment.training_completion, 67);
    let item = person.training_plan.iter().find(|i| i.id == "t2").unwrap();
    assert!(item.completed_date.is_some());

    let err = store
        .update_training_item_status("p2", "missing", TrainingStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn deleting_a_group_entity_orphans_its_children() {
    let api = seeded_api();
    api.seed(
        GROUP_ENTITIES,
        [
            json!({ "id": "g1", "name": "Acme Holdings", "type": "holding" }),
            json!({ "id": "g2", "name": "Acme UK", "type": "subsidiary", "parent_id": "g1", "ownership_percent": 100 }),
        ],
    );
    let store = loaded_store(&api).await;
    let state = store.snapshot().await;
    assert_eq!(state.group_tree_children(None).len(), 1);
    assert_eq!(state.group_tree_children(Some("g1")).len(), 1);

    let branch = store
        .create_group_entity(NewGroupEntity {
            name: "Acme Dublin".into(),
            entity_type: GroupEntityType::Branch,
            parent_id: Some("g1".into()),
            linked_firm_id: None,
            linked_project_id: None,
            linked_project_name: None,
            ownership_percent: None,
            country: Some("IE".into()),
            regulatory_status: None,
        })
        .await
        .unwrap();
    assert_eq!(branch.entity_type, GroupEntityType::Branch);

    store.delete_group_entity("g1").await.unwrap();
    let state = store.snapshot().await;
    assert_eq!(state.group_entities.len(), 2);
    assert!(state.group_entities.iter().all(|e| e.parent_id.is_none()));
}
