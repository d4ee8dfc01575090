// src/services/firm_service.rs

use tracing::{debug, info};
use validator::Validate;

use crate::{
    common::error::AppError,
    mappers::map_firm,
    models::firm::{Firm, FirmPatch, NewFirm},
    services::store::{echo_row, SmcrStore},
};

impl SmcrStore {
    /// Cria a firma; se nenhuma estiver ativa, ela passa a ser a ativa.
    pub async fn create_firm(&self, input: NewFirm) -> Result<Firm, AppError> {
        input.validate()?;
        debug!(name = %input.name, "create_firm");
        let row = self.api.create_firm(&input).await?;
        let firm = map_firm(&echo_row(&input, row));

        let activate = self
            .update_state(|state| {
                state.firms.push(firm.clone());
                state.active_firm_id.is_none()
            })
            .await;
        info!(firm_id = %firm.id, "✅ Firma criada");

        if activate {
            self.load_firm(&firm.id).await;
        }
        Ok(firm)
    }

    pub async fn update_firm(&self, firm_id: &str, patch: FirmPatch) -> Result<Firm, AppError> {
        patch.validate()?;
        let mut firm = self
            .snapshot()
            .await
            .firms
            .iter()
            .find(|f| f.id == firm_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("firm {firm_id}")))?;

        debug!(firm_id, "update_firm");
        self.api.update_firm(firm_id, &patch).await?;

        let current = self
            .update_state(|state| {
                let existing = state.firms.iter_mut().find(|f| f.id == firm_id)?;
                patch.apply_to(existing);
                Some(existing.clone())
            })
            .await;
        info!(firm_id, "Firma atualizada");
        Ok(current.unwrap_or_else(|| {
            patch.apply_to(&mut firm);
            firm
        }))
    }

    /// Liga (ou desliga, com `None`) o projeto de autorização da firma.
    pub async fn link_authorization_project(
        &self,
        firm_id: &str,
        project: Option<(String, String)>,
    ) -> Result<Firm, AppError> {
        let (project_id, project_name) = project.unzip();
        let patch = FirmPatch {
            name: None,
            authorization_project_id: Some(project_id),
            authorization_project_name: Some(project_name),
        };
        self.update_firm(firm_id, patch).await
    }
}
