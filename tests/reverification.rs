// tests/reverification.rs

mod support;

use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use tokio_util::sync::CancellationToken;

use smcr_backoffice::{
    api::{RegisterLookup, RegisterSnapshot},
    services::{reverify_people, VerificationEntry},
    AppError,
};
use support::{loaded_store, seeded_api};

/// Registo falso: conta chamadas e, opcionalmente, cancela após a primeira.
struct FakeRegister {
    calls: AtomicUsize,
    cancel_after_first: Option<CancellationToken>,
    failing_irn: Option<&'static str>,
}

impl FakeRegister {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            cancel_after_first: None,
            failing_irn: None,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RegisterLookup for FakeRegister {
    async fn lookup(&self, irn: &str) -> Result<RegisterSnapshot, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(token) = &self.cancel_after_first {
            token.cancel();
        }
        if self.failing_irn == Some(irn) {
            return Err(AppError::Api {
                status: Some(404),
                message: format!("{irn} not found"),
            });
        }
        Ok(RegisterSnapshot {
            status: "Active".into(),
            control_functions: vec!["SMF16".into()],
            has_enforcement_history: false,
        })
    }
}

fn entries() -> Vec<VerificationEntry> {
    [("p1", "AXS001"), ("p2", "BXJ002"), ("p3", "CXW003")]
        .into_iter()
        .map(|(person_id, irn)| VerificationEntry {
            person_id: person_id.into(),
            irn: irn.into(),
        })
        .collect()
}

#[tokio::test]
async fn cancellation_after_first_lookup_stops_the_run() {
    let api = seeded_api();
    let store = loaded_store(&api).await;
    let cancel = CancellationToken::new();
    let register = FakeRegister {
        cancel_after_first: Some(cancel.clone()),
        ..FakeRegister::new()
    };

    let report = reverify_people(&store, &register, &entries(), &cancel, Duration::from_millis(500)).await;

    assert_eq!(register.calls(), 1);
    assert_eq!(report.checked, 1);
    assert_eq!(report.updated, 1);
    assert!(report.cancelled);
    assert!(report.message.contains("cancelled"));

    let state = store.snapshot().await;
    assert!(state.person("p1").unwrap().fca_verification.is_some());
    assert!(state.person("p2").unwrap().fca_verification.is_none());
}

#[tokio::test]
async fn cancellation_cuts_the_delay_short() {
    let api = seeded_api();
    let store = loaded_store(&api).await;
    let cancel = CancellationToken::new();
    let register = FakeRegister::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let report = tokio::time::timeout(
        Duration::from_secs(5),
        reverify_people(&store, &register, &entries(), &cancel, Duration::from_secs(60)),
    )
    .await
    .expect("cancelled run should not wait for the full delay");

    assert_eq!(register.calls(), 1);
    assert!(report.cancelled);
}

#[tokio::test]
async fn full_run_updates_people_and_counts_failures() {
    let api = seeded_api();
    let store = loaded_store(&api).await;
    let register = FakeRegister {
        failing_irn: Some("BXJ002"),
        ..FakeRegister::new()
    };

    let stale = store.snapshot().await.stale_verifications(Utc::now(), chrono::Duration::days(30));
    assert_eq!(stale, entries());

    let report = reverify_people(
        &store,
        &register,
        &stale,
        &CancellationToken::new(),
        Duration::from_millis(1),
    )
    .await;

    assert_eq!(register.calls(), 3);
    assert_eq!((report.checked, report.updated, report.failed), (3, 2, 1));
    assert!(!report.cancelled);
    assert_eq!(report.message, "Re-verified 3 people: 2 updated, 1 failed.");
    assert_eq!(api.call_count("update_person"), 2);

    let state = store.snapshot().await;
    let verification = state.person("p3").unwrap().fca_verification.clone().unwrap();
    assert_eq!(verification.status, "Active");
    assert_eq!(verification.control_functions, vec!["SMF16".to_string()]);
    // Depois da corrida só resta o que falhou
    let remaining = state.stale_verifications(Utc::now(), chrono::Duration::days(30));
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].person_id, "p2");
}
