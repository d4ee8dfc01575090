// src/common/error.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Toda operação do store devolve `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("No active firm selected")]
    NoActiveFirm,

    #[error("{person_name} is already assigned to {function_label} with no end date.")]
    RoleAlreadyAssigned {
        person_name: String,
        function_label: String,
    },

    #[error(
        "This assignment overlaps with an existing assignment period for {function_label} ({start} to {end})."
    )]
    RoleOverlap {
        function_label: String,
        start: String,
        end: String,
    },

    #[error("Workflow template not found: {0}")]
    TemplateNotFound(String),

    #[error("Unknown conduct rule: {0}")]
    UnknownConductRule(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // Falha devolvida pela API remota (status HTTP quando existir)
    #[error("API error: {message}")]
    Api {
        status: Option<u16>,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn api(message: impl Into<String>) -> Self {
        AppError::Api {
            status: None,
            message: message.into(),
        }
    }

    pub(crate) fn role_overlap(
        function_label: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        AppError::RoleOverlap {
            function_label: function_label.to_string(),
            start: start.format("%Y-%m-%d").to_string(),
            end: end.format("%Y-%m-%d").to_string(),
        }
    }

    /// Código curto usado pela UI para escolher onde mostrar a mensagem.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::NoActiveFirm => "no_active_firm",
            AppError::RoleAlreadyAssigned { .. } => "role_already_assigned",
            AppError::RoleOverlap { .. } => "role_overlap",
            AppError::TemplateNotFound(_) => "template_not_found",
            AppError::UnknownConductRule(_) => "unknown_conduct_rule",
            AppError::NotFound(_) => "not_found",
            AppError::Api { .. } => "api",
            AppError::Http(_) => "http",
            AppError::Json(_) => "json",
            AppError::Config(_) => "config",
            AppError::Internal(_) => "internal",
        }
    }

    /// Erros de validação local: nenhuma chamada remota foi feita.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::NoActiveFirm
                | AppError::RoleAlreadyAssigned { .. }
                | AppError::RoleOverlap { .. }
                | AppError::TemplateNotFound(_)
                | AppError::UnknownConductRule(_)
        )
    }
}

// A UI recebe `{ "error": "...", "kind": "..." }`.
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("AppError", 2)?;
        s.serialize_field("error", &self.to_string())?;
        s.serialize_field("kind", self.kind())?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn overlap_message_names_the_period() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
        let err = AppError::role_overlap("SMF16 Compliance Oversight", start, end);
        let msg = err.to_string();
        assert!(msg.contains("overlaps with an existing assignment period"));
        assert!(msg.contains("2024-01-01 to 2024-06-30"));
        assert!(err.is_validation());
    }

    #[test]
    fn serializes_kind_and_message() {
        let value = serde_json::to_value(AppError::NoActiveFirm).unwrap();
        assert_eq!(value["kind"], "no_active_firm");
        assert_eq!(value["error"], "No active firm selected");
    }
}
