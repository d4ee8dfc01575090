// tests/breaches.rs

mod support;

use smcr_backoffice::{
    models::breaches::{BreachPatch, BreachSeverity, BreachStatus, NewBreach, NewTimelineEntry},
    AppError,
};
use support::{date, loaded_store, seeded_api};

fn new_breach(rule_id: &str) -> NewBreach {
    NewBreach {
        person_id: "p1".into(),
        rule_id: rule_id.into(),
        title: "Client money reconciliation missed".into(),
        description: "Daily reconciliation skipped for a week.".into(),
        date_identified: date(2024, 4, 2),
        severity: BreachSeverity::Serious,
        status: BreachStatus::Open,
        investigator: None,
    }
}

#[tokio::test]
async fn unknown_conduct_rule_is_rejected_locally() {
    let api = seeded_api();
    let store = loaded_store(&api).await;
    api.reset_calls();

    let err = store.add_breach(new_breach("ICR99")).await.unwrap_err();
    assert!(matches!(err, AppError::UnknownConductRule(ref id) if id == "ICR99"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn breach_lifecycle_with_append_only_timeline() {
    let api = seeded_api();
    let store = loaded_store(&api).await;

    let breach = store.add_breach(new_breach("icr2")).await.unwrap();
    assert_eq!(breach.rule_id, "ICR2");
    assert_eq!(breach.severity, BreachSeverity::Serious);

    store
        .update_breach(
            &breach.id,
            BreachPatch {
                status: Some(BreachStatus::Investigating),
                investigator: Some("Head of Compliance".into()),
                ..BreachPatch::default()
            },
        )
        .await
        .unwrap();

    for action in ["Investigation opened", "Interview held"] {
        store
            .add_breach_timeline_entry(
                &breach.id,
                NewTimelineEntry {
                    action: action.into(),
                    author: Some("Alice Smith".into()),
                    notes: None,
                },
            )
            .await
            .unwrap();
    }

    let state = store.snapshot().await;
    let local = state.breaches_for_person("p1")[0];
    assert_eq!(local.status, BreachStatus::Investigating);
    let actions: Vec<&str> = local.timeline.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["Investigation opened", "Interview held"]);

    // O servidor guardou a mesma linha do tempo
    store.reload().await.unwrap();
    let reloaded = store.snapshot().await;
    assert_eq!(reloaded.breaches[0].timeline.len(), 2);
    assert_eq!(reloaded.breaches[0].status, BreachStatus::Investigating);

    store.delete_breach(&breach.id).await.unwrap();
    assert!(store.snapshot().await.breaches.is_empty());
}
