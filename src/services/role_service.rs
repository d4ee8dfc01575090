// src/services/role_service.rs

use tracing::{debug, info, warn};
use validator::Validate;

use crate::{
    catalog::functions::find_function,
    common::error::AppError,
    mappers::map_role,
    models::roles::{NewRole, RoleAssignment, RolePatch},
    services::{
        people_service::created_training_items,
        store::{echo_row, SmcrState, SmcrStore},
    },
    training::{filter_training_plan_by_role, recompute_completion, training_items_for_role},
};

/// Procura uma atribuição da mesma pessoa e função cujo período se sobrepõe.
fn check_role_overlap(state: &SmcrState, input: &NewRole) -> Result<(), AppError> {
    let conflict = state.roles.iter().find(|role| {
        role.person_id == input.person_id
            && role.function_id.eq_ignore_ascii_case(&input.function_id)
            && role.overlaps(input.start_date, input.end_date)
    });
    let Some(existing) = conflict else {
        return Ok(());
    };

    match existing.end_date {
        None => {
            let person_name = state
                .person(&existing.person_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| existing.person_id.clone());
            Err(AppError::RoleAlreadyAssigned {
                person_name,
                function_label: existing.function_label.clone(),
            })
        }
        Some(end) => Err(AppError::role_overlap(&existing.function_label, existing.start_date, end)),
    }
}

impl SmcrStore {
    /// Atribui uma função regulada: verifica sobreposição antes de qualquer
    /// chamada remota e semeia a formação exigida pela função.
    pub async fn assign_role(&self, mut input: NewRole) -> Result<RoleAssignment, AppError> {
        input.validate()?;
        let firm_id = self.require_active_firm().await?;

        let snapshot = self.snapshot().await;
        if snapshot.person(&input.person_id).is_none() {
            return Err(AppError::NotFound(format!("person {}", input.person_id)));
        }
        if input.function_label.trim().is_empty() {
            input.function_label = find_function(&input.function_id)
                .map(|f| f.label())
                .unwrap_or_else(|| input.function_id.clone());
        }
        check_role_overlap(&snapshot, &input)?;

        debug!(firm_id = %firm_id, person_id = %input.person_id, function_id = %input.function_id, "create_role");
        let row = self.api.create_role(&firm_id, &input).await?;
        let mut role = map_role(&echo_row(&input, row));
        if role.firm_id.is_empty() {
            role.firm_id = firm_id.clone();
        }
        let scope = Some(firm_id.as_str());
        self.update_state_in(scope, |state| state.roles.push(role.clone())).await;
        info!(role_id = %role.id, person_id = %role.person_id, label = %role.function_label, "✅ Função atribuída");

        // A função já existe remotamente: falha na formação não desfaz a atribuição
        let items = training_items_for_role(&role);
        if !items.is_empty() {
            debug!(person_id = %role.person_id, count = items.len(), "create_training_items");
            match self.api.create_training_items(&role.person_id, &items).await {
                Ok(rows) => {
                    let created = created_training_items(&items, rows);
                    self.merge_training(scope, &role.person_id, &created).await;
                }
                Err(e) => {
                    warn!(role_id = %role.id, error = %e, "Falha ao criar formação da função");
                }
            }
        }
        Ok(role)
    }

    pub async fn update_role(&self, role_id: &str, patch: RolePatch) -> Result<RoleAssignment, AppError> {
        let scope = self.active_scope().await;
        let mut role = self
            .snapshot()
            .await
            .roles
            .iter()
            .find(|r| r.id == role_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("role {role_id}")))?;

        debug!(role_id, "update_role");
        self.api.update_role(role_id, &patch).await?;

        let current = self
            .update_state_in(scope.as_deref(), |state| {
                let existing = state.roles.iter_mut().find(|r| r.id == role_id)?;
                patch.apply_to(existing);
                Some(existing.clone())
            })
            .await
            .flatten();
        info!(role_id, "Função atualizada");
        Ok(current.unwrap_or_else(|| {
            patch.apply_to(&mut role);
            role
        }))
    }

    /// Remove a atribuição e os itens de formação que ela originou.
    pub async fn remove_role(&self, role_id: &str) -> Result<(), AppError> {
        let scope = self.active_scope().await;
        let role = self
            .snapshot()
            .await
            .roles
            .iter()
            .find(|r| r.id == role_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("role {role_id}")))?;

        debug!(role_id, "delete_role");
        self.api.delete_role(role_id).await?;

        self.update_state_in(scope.as_deref(), |state| {
            state.roles.retain(|r| r.id != role_id);
            if let Some(person) = state.people.iter_mut().find(|p| p.id == role.person_id) {
                person.training_plan = filter_training_plan_by_role(&person.training_plan, role_id);
                recompute_completion(person);
            }
        })
        .await;
        info!(role_id, person_id = %role.person_id, "Função removida");
        Ok(())
    }
}
