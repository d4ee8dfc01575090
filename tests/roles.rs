// tests/roles.rs

mod support;

use serde_json::json;

use smcr_backoffice::{
    api::memory::{ROLES, TRAINING_ITEMS},
    catalog::training::training_modules_for,
    AppError,
};
use support::{date, loaded_store, new_role, seeded_api};

#[tokio::test]
async fn open_ended_assignment_blocks_same_function_without_remote_calls() {
    let api = seeded_api();
    api.seed(
        ROLES,
        [json!({ "id": "r1", "firm_id": "firm-1", "person_id": "p1", "function_type": "SMF",
                 "function_id": "SMF16", "start_date": "2024-01-01" })],
    );
    let store = loaded_store(&api).await;
    api.reset_calls();

    let err = store
        .assign_role(new_role("p1", "SMF16", date(2024, 6, 1), None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::RoleAlreadyAssigned { .. }));
    assert_eq!(
        err.to_string(),
        "Alice Smith is already assigned to SMF16 Compliance Oversight with no end date."
    );
    assert!(api.calls().is_empty());
    assert_eq!(store.snapshot().await.roles.len(), 1);

    // Outra função na mesma janela é permitida
    let role = store
        .assign_role(new_role("p1", "SMF17", date(2024, 6, 1), None))
        .await
        .unwrap();
    assert_eq!(role.function_label, "SMF17 Money Laundering Reporting");
    assert_eq!(api.call_count("create_role"), 1);
}

#[tokio::test]
async fn bounded_assignment_rejects_overlap_and_accepts_later_start() {
    let api = seeded_api();
    api.seed(
        ROLES,
        [json!({ "id": "r1", "firm_id": "firm-1", "person_id": "p2", "function_type": "SMF",
                 "function_id": "SMF16", "start_date": "2024-01-01", "end_date": "2024-06-30" })],
    );
    let store = loaded_store(&api).await;
    api.reset_calls();

    let err = store
        .assign_role(new_role("p2", "SMF16", date(2024, 5, 1), None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::RoleOverlap { .. }));
    let message = err.to_string();
    assert!(message.contains("overlaps with an existing assignment period"));
    assert!(message.contains("(2024-01-01 to 2024-06-30)"));
    assert_eq!(api.call_count("create_role"), 0);

    store
        .assign_role(new_role("p2", "SMF16", date(2024, 7, 1), None))
        .await
        .unwrap();
    assert_eq!(store.snapshot().await.roles_for_person("p2").len(), 2);
}

#[tokio::test]
async fn assignment_may_start_on_the_day_the_previous_one_ends() {
    let api = seeded_api();
    api.seed(
        ROLES,
        [json!({ "id": "r1", "firm_id": "firm-1", "person_id": "p1", "function_type": "SMF",
                 "function_id": "SMF16", "start_date": "2024-01-01", "end_date": "2024-06-30" })],
    );
    let store = loaded_store(&api).await;

    let role = store
        .assign_role(new_role("p1", "SMF16", date(2024, 6, 30), None))
        .await
        .unwrap();
    assert_eq!(role.start_date, date(2024, 6, 30));
    assert_eq!(api.call_count("create_role"), 1);

    // Um dia antes do fim ainda se sobrepõe
    let err = store
        .assign_role(new_role("p1", "SMF16", date(2023, 6, 1), Some(date(2024, 6, 29))))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::RoleOverlap { .. }));
}

#[tokio::test]
async fn assignment_seeds_training_for_the_function() {
    let api = seeded_api();
    let store = loaded_store(&api).await;

    let role = store
        .assign_role(new_role("p3", "SMF16", date(2024, 3, 1), None))
        .await
        .unwrap();

    let expected = training_modules_for("SMF16").len();
    assert!(expected > 0);
    let state = store.snapshot().await;
    let plan = state.training_for_person("p3");
    assert_eq!(plan.len(), expected);
    assert!(plan.iter().all(|item| item.role_context.as_deref() == Some(role.id.as_str())));
    assert_eq!(state.person("p3").unwrap().assessment.training_completion, 0);
    assert_eq!(api.rows(TRAINING_ITEMS).len(), expected);
}

#[tokio::test]
async fn end_before_start_is_a_validation_error() {
    let api = seeded_api();
    let store = loaded_store(&api).await;
    api.reset_calls();

    let err = store
        .assign_role(new_role("p1", "SMF1", date(2024, 3, 1), Some(date(2024, 2, 1))))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn removing_a_role_strips_its_training_and_recomputes() {
    let api = seeded_api();
    api.seed(
        ROLES,
        [
            json!({ "id": "r1", "firm_id": "firm-1", "person_id": "p1", "function_id": "SMF16", "start_date": "2024-01-01" }),
            json!({ "id": "r2", "firm_id": "firm-1", "person_id": "p1", "function_id": "SMF17", "start_date": "2024-01-01" }),
        ],
    );
    api.seed(
        TRAINING_ITEMS,
        [
            json!({ "id": "t1", "person_id": "p1", "module_id": "m1", "title": "A", "status": "completed", "role_context": "r1" }),
            json!({ "id": "t2", "person_id": "p1", "module_id": "m2", "title": "B", "status": "not_started", "role_context": "r1" }),
            json!({ "id": "t3", "person_id": "p1", "module_id": "m3", "title": "C", "status": "completed" }),
            json!({ "id": "t4", "person_id": "p1", "module_id": "m4", "title": "D", "status": "completed", "role_context": "r2" }),
        ],
    );
    let store = loaded_store(&api).await;
    let before = store.snapshot().await;
    assert_eq!(before.person("p1").unwrap().assessment.training_completion, 75);

    store.remove_role("r1").await.unwrap();

    let after = store.snapshot().await;
    let ids: Vec<&str> = after.training_for_person("p1").iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["t3", "t4"]);
    assert_eq!(after.person("p1").unwrap().assessment.training_completion, 100);
    assert_eq!(after.roles_for_person("p1").len(), 1);
    assert_eq!(api.call_count("delete_role"), 1);
}

#[tokio::test]
async fn failed_remote_create_leaves_state_untouched() {
    let api = seeded_api();
    let store = loaded_store(&api).await;
    api.fail_on("create_role");

    let err = store
        .assign_role(new_role("p1", "SMF3", date(2024, 3, 1), None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Api { status: Some(500), .. }));
    assert!(store.snapshot().await.roles.is_empty());
    assert!(store.snapshot().await.training_for_person("p1").is_empty());
}
