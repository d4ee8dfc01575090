// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use crate::{
    api::{HttpRegisterLookup, HttpSmcrApi, RegisterLookup, SmcrApi},
    common::error::AppError,
    services::SmcrStore,
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub register_url: Option<String>,
    pub http_timeout: Duration,
    pub reverify_delay: Duration,
    pub verification_max_age: chrono::Duration,
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match optional_var(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{key} inválido: {raw}"))),
    }
}

impl AppConfig {
    /// Lê o `.env` (se existir) e as variáveis de ambiente.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_url = optional_var("SMCR_API_URL")
            .ok_or_else(|| AppError::Config("SMCR_API_URL deve ser definida".into()))?;

        Ok(Self {
            api_url,
            api_token: optional_var("SMCR_API_TOKEN"),
            register_url: optional_var("FCA_REGISTER_URL"),
            http_timeout: Duration::from_secs(parsed_var("HTTP_TIMEOUT_SECS", 30)?),
            reverify_delay: Duration::from_millis(parsed_var("REVERIFY_DELAY_MS", 500)?),
            verification_max_age: chrono::Duration::days(parsed_var("VERIFICATION_MAX_AGE_DAYS", 30)?),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<SmcrStore>,
    // Sem FCA_REGISTER_URL não há re-verificação
    pub register: Option<Arc<dyn RegisterLookup>>,
}

impl AppState {
    pub fn new() -> Result<Self, AppError> {
        Self::from_config(AppConfig::from_env()?)
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_config(config: AppConfig) -> Result<Self, AppError> {
        let api: Arc<dyn SmcrApi> = Arc::new(HttpSmcrApi::new(
            &config.api_url,
            config.api_token.clone(),
            config.http_timeout,
        )?);
        let register = match &config.register_url {
            Some(url) => {
                let lookup: Arc<dyn RegisterLookup> = Arc::new(HttpRegisterLookup::new(url, config.http_timeout)?);
                Some(lookup)
            }
            None => None,
        };
        tracing::info!(api_url = %config.api_url, register = register.is_some(), "✅ Clientes HTTP configurados");

        Ok(Self {
            store: Arc::new(SmcrStore::new(api)),
            register,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_var_uses_default_when_unset() {
        let value: u64 = parsed_var("SMCR_TEST_SURELY_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn builds_state_from_explicit_config() {
        let config = AppConfig {
            api_url: "http://127.0.0.1:9".into(),
            api_token: None,
            register_url: Some("http://127.0.0.1:9/register".into()),
            http_timeout: Duration::from_secs(1),
            reverify_delay: Duration::from_millis(10),
            verification_max_age: chrono::Duration::days(30),
        };
        let state = AppState::from_config(config).unwrap();
        assert!(state.register.is_some());
    }
}
