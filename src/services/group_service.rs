// src/services/group_service.rs

// Entidades do grupo são globais: não dependem da firma ativa.

use tracing::{debug, info};
use validator::Validate;

use crate::{
    common::error::AppError,
    mappers::map_group_entity,
    models::group::{GroupEntity, GroupEntityPatch, NewGroupEntity},
    services::store::{echo_row, SmcrStore},
};

impl SmcrStore {
    pub async fn create_group_entity(&self, input: NewGroupEntity) -> Result<GroupEntity, AppError> {
        input.validate()?;

        debug!(name = %input.name, "create_group_entity");
        let row = self.api.create_group_entity(&input).await?;
        let entity = map_group_entity(&echo_row(&input, row));

        self.update_state(|state| state.group_entities.push(entity.clone())).await;
        info!(entity_id = %entity.id, "Entidade do grupo criada");
        Ok(entity)
    }

    pub async fn update_group_entity(
        &self,
        entity_id: &str,
        patch: GroupEntityPatch,
    ) -> Result<GroupEntity, AppError> {
        patch.validate()?;
        let mut entity = self
            .snapshot()
            .await
            .group_entities
            .iter()
            .find(|e| e.id == entity_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("group entity {entity_id}")))?;

        debug!(entity_id, "update_group_entity");
        self.api.update_group_entity(entity_id, &patch).await?;

        let current = self
            .update_state(|state| {
                let existing = state.group_entities.iter_mut().find(|e| e.id == entity_id)?;
                patch.apply_to(existing);
                Some(existing.clone())
            })
            .await;
        Ok(current.unwrap_or_else(|| {
            patch.apply_to(&mut entity);
            entity
        }))
    }

    /// Remove a entidade; os filhos ficam sem pai.
    pub async fn delete_group_entity(&self, entity_id: &str) -> Result<(), AppError> {
        let known = self.snapshot().await.group_entities.iter().any(|e| e.id == entity_id);
        if !known {
            return Err(AppError::NotFound(format!("group entity {entity_id}")));
        }

        debug!(entity_id, "delete_group_entity");
        self.api.delete_group_entity(entity_id).await?;

        self.update_state(|state| {
            state.group_entities.retain(|e| e.id != entity_id);
            for child in state
                .group_entities
                .iter_mut()
                .filter(|e| e.parent_id.as_deref() == Some(entity_id))
            {
                child.parent_id = None;
            }
        })
        .await;
        info!(entity_id, "Entidade do grupo removida");
        Ok(())
    }
}
