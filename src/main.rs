// src/main.rs

use anyhow::Context;
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use smcr_backoffice::{config::AppState, services::reverify_people};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Inicializa o logger (RUST_LOG, padrão "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let app_state = AppState::new().context("Falha ao inicializar o estado da aplicação.")?;
    let store = app_state.store.clone();

    store.load_firms().await;
    let state = store.snapshot().await;
    if let Some(error) = &state.load_error {
        anyhow::bail!("Falha ao carregar dados: {error}");
    }

    match state.active_firm() {
        Some(firm) => tracing::info!(
            firm = %firm.name,
            people = state.people.len(),
            roles = state.roles.len(),
            workflows = state.workflows.len(),
            assessments = state.assessments.len(),
            breaches = state.breaches.len(),
            group_entities = state.group_entities.len(),
            "✅ Workspace pronto"
        ),
        None => tracing::info!("Nenhuma firma cadastrada"),
    }

    if !std::env::args().any(|arg| arg == "--reverify") {
        return Ok(());
    }

    let lookup = app_state
        .register
        .clone()
        .context("FCA_REGISTER_URL deve ser definida para --reverify")?;
    let entries = state.stale_verifications(Utc::now(), app_state.config.verification_max_age);

    // Ctrl-C cancela a re-verificação (o pedido em curso termina)
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Cancelamento pedido");
            on_signal.cancel();
        }
    });

    let report = reverify_people(
        &store,
        lookup.as_ref(),
        &entries,
        &cancel,
        app_state.config.reverify_delay,
    )
    .await;
    println!("{}", report.message);
    Ok(())
}
