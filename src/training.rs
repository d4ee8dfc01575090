// src/training.rs

// Métricas derivadas do plano de formação.

use std::collections::HashSet;

use chrono::Duration;

use crate::{
    catalog::training::training_modules_for,
    models::{
        people::{NewTrainingItem, PersonRecord, TrainingPlanItem, TrainingStatus},
        roles::RoleAssignment,
    },
};

/// `round(100 * concluídos / total)`; plano vazio dá 0.
pub fn calculate_training_completion(plan: &[TrainingPlanItem]) -> u8 {
    if plan.is_empty() {
        return 0;
    }
    let completed = plan
        .iter()
        .filter(|item| item.status == TrainingStatus::Completed)
        .count();
    (100.0 * completed as f64 / plan.len() as f64).round() as u8
}

/// União sem duplicados, chaveada pelo id. Em conflito, o item existente ganha.
pub fn merge_training_plan(
    existing: &[TrainingPlanItem],
    additions: impl IntoIterator<Item = TrainingPlanItem>,
) -> Vec<TrainingPlanItem> {
    let mut seen: HashSet<String> = existing.iter().map(|item| item.id.clone()).collect();
    let mut merged = existing.to_vec();
    for item in additions {
        if seen.insert(item.id.clone()) {
            merged.push(item);
        }
    }
    merged
}

/// Remove os itens cujo `role_context` é a atribuição removida.
pub fn filter_training_plan_by_role(plan: &[TrainingPlanItem], role_id: &str) -> Vec<TrainingPlanItem> {
    plan.iter()
        .filter(|item| item.role_context.as_deref() != Some(role_id))
        .cloned()
        .collect()
}

/// Troca o plano e recalcula `training_completion` (só quando o plano não está vazio).
pub fn with_training_plan(person: &PersonRecord, plan: Vec<TrainingPlanItem>) -> PersonRecord {
    let mut updated = person.clone();
    updated.training_plan = plan;
    recompute_completion(&mut updated);
    updated
}

pub fn recompute_completion(person: &mut PersonRecord) {
    if !person.training_plan.is_empty() {
        person.assessment.training_completion = calculate_training_completion(&person.training_plan);
    }
}

/// Itens de formação que uma nova atribuição gera, a partir do catálogo.
pub fn training_items_for_role(role: &RoleAssignment) -> Vec<NewTrainingItem> {
    training_modules_for(&role.function_id)
        .iter()
        .map(|module| NewTrainingItem {
            module_id: module.id.to_string(),
            title: module.title.to_string(),
            description: Some(module.description.to_string()),
            status: TrainingStatus::NotStarted,
            due_date: Some(role.start_date + Duration::days(module.due_within_days)),
            role_context: Some(role.id.clone()),
            required: module.required,
        })
        .collect()
}
