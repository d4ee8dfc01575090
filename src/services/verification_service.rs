// src/services/verification_service.rs

// ---
// Re-verificação em massa contra o registo externo
// ---
// Estritamente sequencial, com pausa fixa entre chamadas. O cancelamento é
// cooperativo: nunca interrompe um pedido em curso, só impede o próximo.

use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{api::RegisterLookup, services::store::SmcrStore};

pub const DEFAULT_REVERIFY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationEntry {
    pub person_id: String,
    pub irn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReverificationReport {
    pub checked: usize,
    pub updated: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub message: String,
}

pub async fn reverify_people(
    store: &SmcrStore,
    lookup: &dyn RegisterLookup,
    entries: &[VerificationEntry],
    cancel: &CancellationToken,
    delay: Duration,
) -> ReverificationReport {
    let mut report = ReverificationReport::default();
    info!(total = entries.len(), "Iniciando re-verificação");

    for (index, entry) in entries.iter().enumerate() {
        if cancel.is_cancelled() {
            report.cancelled = true;
            break;
        }
        if index > 0 {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    report.cancelled = true;
                    break;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
        // Verificação de novo antes de disparar o pedido
        if cancel.is_cancelled() {
            report.cancelled = true;
            break;
        }

        report.checked += 1;
        match lookup.lookup(&entry.irn).await {
            Ok(snapshot) => match store.apply_register_snapshot(&entry.person_id, snapshot).await {
                Ok(_) => report.updated += 1,
                Err(e) => {
                    warn!(person_id = %entry.person_id, error = %e, "Falha ao gravar verificação");
                    report.failed += 1;
                }
            },
            Err(e) => {
                warn!(person_id = %entry.person_id, irn = %entry.irn, error = %e, "Falha na consulta ao registo");
                report.failed += 1;
            }
        }
    }

    report.message = if report.cancelled {
        format!(
            "Re-verification cancelled after {} of {} people ({} updated, {} failed).",
            report.checked,
            entries.len(),
            report.updated,
            report.failed
        )
    } else {
        format!(
            "Re-verified {} people: {} updated, {} failed.",
            report.checked, report.updated, report.failed
        )
    };
    info!(
        checked = report.checked,
        updated = report.updated,
        failed = report.failed,
        cancelled = report.cancelled,
        "Re-verificação terminada"
    );
    report
}
