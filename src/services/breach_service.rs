// src/services/breach_service.rs

use tracing::{debug, info};
use validator::Validate;

use crate::{
    catalog::conduct_rules::find_conduct_rule,
    common::error::AppError,
    mappers::{map_breach, map_timeline_entry},
    models::breaches::{BreachPatch, BreachTimelineEntry, ConductBreach, NewBreach, NewTimelineEntry},
    services::store::{echo_row, SmcrStore},
};

impl SmcrStore {
    async fn require_breach(&self, breach_id: &str) -> Result<ConductBreach, AppError> {
        self.snapshot()
            .await
            .breaches
            .iter()
            .find(|b| b.id == breach_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("breach {breach_id}")))
    }

    pub async fn add_breach(&self, mut input: NewBreach) -> Result<ConductBreach, AppError> {
        input.validate()?;
        let firm_id = self.require_active_firm().await?;
        let rule = find_conduct_rule(&input.rule_id)
            .ok_or_else(|| AppError::UnknownConductRule(input.rule_id.clone()))?;
        input.rule_id = rule.id.to_string();
        self.require_person(&input.person_id).await?;

        debug!(firm_id = %firm_id, person_id = %input.person_id, rule_id = rule.id, "create_breach");
        let row = self.api.create_breach(&firm_id, &input).await?;
        let mut breach = map_breach(&echo_row(&input, row));
        if breach.firm_id.is_empty() {
            breach.firm_id = firm_id.clone();
        }

        self.update_state_in(Some(firm_id.as_str()), |state| state.breaches.push(breach.clone()))
            .await;
        info!(breach_id = %breach.id, rule_id = rule.id, severity = ?breach.severity, "Violação registada");
        Ok(breach)
    }

    pub async fn update_breach(&self, breach_id: &str, patch: BreachPatch) -> Result<ConductBreach, AppError> {
        let scope = self.active_scope().await;
        let mut breach = self.require_breach(breach_id).await?;

        debug!(breach_id, "update_breach");
        self.api.update_breach(breach_id, &patch).await?;

        // Aplicado ao registo atual: preserva entradas de linha do tempo concorrentes
        let current = self
            .update_state_in(scope.as_deref(), |state| {
                let existing = state.breaches.iter_mut().find(|b| b.id == breach_id)?;
                patch.apply_to(existing);
                Some(existing.clone())
            })
            .await
            .flatten();
        let breach = current.unwrap_or_else(|| {
            patch.apply_to(&mut breach);
            breach
        });
        info!(breach_id, status = ?breach.status, "Violação atualizada");
        Ok(breach)
    }

    /// A linha do tempo só cresce.
    pub async fn add_breach_timeline_entry(
        &self,
        breach_id: &str,
        entry: NewTimelineEntry,
    ) -> Result<BreachTimelineEntry, AppError> {
        entry.validate()?;
        let scope = self.active_scope().await;
        self.require_breach(breach_id).await?;

        debug!(breach_id, action = %entry.action, "add_breach_timeline_entry");
        let row = self.api.add_breach_timeline_entry(breach_id, &entry).await?;
        let created = map_timeline_entry(&echo_row(&entry, row));

        self.update_state_in(scope.as_deref(), |state| {
            if let Some(breach) = state.breaches.iter_mut().find(|b| b.id == breach_id) {
                breach.timeline.push(created.clone());
            }
        })
        .await;
        Ok(created)
    }

    pub async fn delete_breach(&self, breach_id: &str) -> Result<(), AppError> {
        let scope = self.active_scope().await;
        self.require_breach(breach_id).await?;

        debug!(breach_id, "delete_breach");
        self.api.delete_breach(breach_id).await?;
        self.update_state_in(scope.as_deref(), |state| state.breaches.retain(|b| b.id != breach_id))
            .await;
        info!(breach_id, "Violação removida");
        Ok(())
    }
}
