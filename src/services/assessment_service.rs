// src/services/assessment_service.rs

use tracing::{debug, info, warn};
use validator::Validate;

use crate::{
    catalog::fitness::all_questions,
    common::error::AppError,
    mappers::map_assessment,
    models::{
        assessments::{AssessmentPatch, FitnessAssessmentRecord, FitnessResponse, FitnessStatus, NewAssessment},
        people::{AssessmentStatus, PersonPatch},
    },
    services::store::{echo_row, SmcrStore},
};

/// Uma resposta vazia por pergunta canônica.
fn seed_responses() -> Vec<FitnessResponse> {
    all_questions()
        .map(|q| FitnessResponse {
            question_id: q.id.to_string(),
            value: String::new(),
            notes: None,
        })
        .collect()
}

/// O que a avaliação já atualizada projeta na pessoa, se algo.
///
/// Só patches que mexem no status ou na determinação projetam. Uma avaliação
/// concluída projeta a determinação (mesmo que o patch só a acrescente);
/// entrar em revisão marca a pessoa como `due`.
fn person_projection(record: &FitnessAssessmentRecord, patch: &AssessmentPatch) -> Option<PersonPatch> {
    if patch.status.is_none() && patch.overall_determination.is_none() {
        return None;
    }
    match record.status {
        FitnessStatus::Completed => {
            let determination = record.overall_determination?;
            Some(PersonPatch {
                assessment_status: Some(determination.person_status()),
                last_assessment: Some(record.assessment_date),
                next_assessment: record.next_due_date,
                ..PersonPatch::default()
            })
        }
        FitnessStatus::InReview if patch.status.is_some() => Some(PersonPatch {
            assessment_status: Some(AssessmentStatus::Due),
            ..PersonPatch::default()
        }),
        FitnessStatus::InReview | FitnessStatus::Draft => None,
    }
}

impl SmcrStore {
    pub async fn create_assessment(&self, mut input: NewAssessment) -> Result<FitnessAssessmentRecord, AppError> {
        input.validate()?;
        let firm_id = self.require_active_firm().await?;
        let person = self.require_person(&input.person_id).await?;

        if input.responses.is_empty() {
            input.responses = seed_responses();
        }
        if input.person_name.is_none() {
            input.person_name = Some(person.name.clone());
        }

        debug!(firm_id = %firm_id, person_id = %input.person_id, "create_assessment");
        let row = self.api.create_assessment(&firm_id, &input).await?;
        let mut record = map_assessment(&echo_row(&input, row));
        if record.firm_id.is_empty() {
            record.firm_id = firm_id.clone();
        }

        self.update_state_in(Some(firm_id.as_str()), |state| state.assessments.push(record.clone()))
            .await;
        info!(assessment_id = %record.id, person_id = %record.person_id, "✅ Avaliação criada");
        Ok(record)
    }

    /// Atualiza a avaliação; concluir com determinação (ou pôr em revisão)
    /// propaga o status para a pessoa via `update_person`.
    ///
    /// A avaliação já está gravada quando a propagação corre: uma falha ao
    /// atualizar a pessoa fica num `warn!` e a avaliação é devolvida.
    pub async fn update_assessment(
        &self,
        assessment_id: &str,
        patch: AssessmentPatch,
    ) -> Result<FitnessAssessmentRecord, AppError> {
        let scope = self.active_scope().await;
        let mut record = self
            .snapshot()
            .await
            .assessments
            .iter()
            .find(|a| a.id == assessment_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("assessment {assessment_id}")))?;

        debug!(assessment_id, "update_assessment");
        self.api.update_assessment(assessment_id, &patch).await?;

        let current = self
            .update_state_in(scope.as_deref(), |state| {
                let existing = state.assessments.iter_mut().find(|a| a.id == assessment_id)?;
                patch.apply_to(existing);
                Some(existing.clone())
            })
            .await
            .flatten();
        let record = current.unwrap_or_else(|| {
            patch.apply_to(&mut record);
            record
        });
        info!(assessment_id, status = ?record.status, "Avaliação atualizada");

        if let Some(person_patch) = person_projection(&record, &patch) {
            if self.snapshot().await.person(&record.person_id).is_none() {
                warn!(assessment_id, person_id = %record.person_id, "Pessoa da avaliação não encontrada");
            } else if let Err(e) = self.update_person(&record.person_id, person_patch).await {
                warn!(
                    assessment_id,
                    person_id = %record.person_id,
                    error = %e,
                    "Falha ao propagar a avaliação para a pessoa"
                );
            }
        }
        Ok(record)
    }

    pub async fn delete_assessment(&self, assessment_id: &str) -> Result<(), AppError> {
        let snapshot = self.snapshot().await;
        let known = snapshot.assessments.iter().any(|a| a.id == assessment_id);
        if !known {
            return Err(AppError::NotFound(format!("assessment {assessment_id}")));
        }

        debug!(assessment_id, "delete_assessment");
        self.api.delete_assessment(assessment_id).await?;
        self.update_state_in(snapshot.active_firm_id.as_deref(), |state| {
            state.assessments.retain(|a| a.id != assessment_id)
        })
        .await;
        info!(assessment_id, "Avaliação removida");
        Ok(())
    }
}
