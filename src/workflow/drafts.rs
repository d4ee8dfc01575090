// src/workflow/drafts.rs

// Valores iniciais dos rascunhos especializados.
// Determinísticos, exceto pelo carimbo `last_updated`.

use chrono::Utc;

use crate::{
    catalog::{
        fitness::all_questions,
        templates::{
            CRIMINAL_CHECK_STEP, FP_CHECKLIST_STEP, REFERENCE_REQUEST_STEP,
            STATEMENT_OF_RESPONSIBILITIES_STEP, TRAINING_PLAN_STEP,
        },
        PRESCRIBED_RESPONSIBILITIES, SENIOR_MANAGEMENT_FUNCTIONS,
    },
    models::drafts::{
        CheckLevel, CheckOutcome, CriminalCheckDraft, FpCheck, FpChecklistDraft,
        ReferenceRequestDraft, SorFunctionEntry, SorResponsibilityEntry,
        StatementOfResponsibilitiesDraft, StepDraft, TrainingPlanDraft,
    },
};

pub fn default_fp_checklist_draft() -> FpChecklistDraft {
    FpChecklistDraft {
        candidate_name: String::new(),
        role: String::new(),
        checks: all_questions()
            .map(|q| FpCheck {
                question_id: q.id.to_string(),
                question: q.text.to_string(),
                answer: None,
                notes: String::new(),
            })
            .collect(),
        determination: None,
        conditions: Vec::new(),
        last_updated: Utc::now(),
    }
}

pub fn default_reference_request_draft() -> ReferenceRequestDraft {
    ReferenceRequestDraft {
        requests: Vec::new(),
        last_updated: Utc::now(),
    }
}

pub fn default_criminal_check_draft() -> CriminalCheckDraft {
    CriminalCheckDraft {
        provider: String::new(),
        check_level: CheckLevel::Standard,
        reference_number: String::new(),
        requested_at: None,
        completed_at: None,
        outcome: CheckOutcome::Pending,
        notes: String::new(),
        last_updated: Utc::now(),
    }
}

pub fn default_training_plan_draft() -> TrainingPlanDraft {
    TrainingPlanDraft {
        modules: Vec::new(),
        notes: String::new(),
        last_updated: Utc::now(),
    }
}

/// Uma entrada sem responsável por função SMF e por responsabilidade prescrita.
pub fn default_statement_of_responsibilities_draft() -> StatementOfResponsibilitiesDraft {
    StatementOfResponsibilitiesDraft {
        functions: SENIOR_MANAGEMENT_FUNCTIONS
            .iter()
            .map(|f| SorFunctionEntry {
                function_id: f.id.to_string(),
                title: f.title.to_string(),
                assigned_person_id: None,
                notes: String::new(),
            })
            .collect(),
        responsibilities: PRESCRIBED_RESPONSIBILITIES
            .iter()
            .map(|r| SorResponsibilityEntry {
                responsibility_id: r.id.to_string(),
                title: r.title.to_string(),
                assigned_person_id: None,
                notes: String::new(),
            })
            .collect(),
        overall_responsibilities: String::new(),
        last_updated: Utc::now(),
    }
}

/// Rascunho correspondente ao id sentinela da etapa, se houver.
pub fn default_draft_for_step(template_step_id: &str) -> Option<StepDraft> {
    match template_step_id {
        FP_CHECKLIST_STEP => Some(StepDraft::FpChecklist(default_fp_checklist_draft())),
        REFERENCE_REQUEST_STEP => Some(StepDraft::ReferenceRequest(default_reference_request_draft())),
        CRIMINAL_CHECK_STEP => Some(StepDraft::CriminalCheck(default_criminal_check_draft())),
        TRAINING_PLAN_STEP => Some(StepDraft::TrainingPlan(default_training_plan_draft())),
        STATEMENT_OF_RESPONSIBILITIES_STEP => Some(StepDraft::StatementOfResponsibilities(
            default_statement_of_responsibilities_draft(),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fitness::FITNESS_QUESTION_GROUPS;

    #[test]
    fn statement_seeds_every_catalog_entry_unassigned() {
        let draft = default_statement_of_responsibilities_draft();
        assert_eq!(draft.functions.len(), SENIOR_MANAGEMENT_FUNCTIONS.len());
        assert_eq!(draft.responsibilities.len(), PRESCRIBED_RESPONSIBILITIES.len());
        assert!(draft.functions.iter().all(|f| f.assigned_person_id.is_none()));
        assert!(draft.responsibilities.iter().all(|r| r.assigned_person_id.is_none()));
    }

    #[test]
    fn fp_checklist_has_one_check_per_question() {
        let expected: usize = FITNESS_QUESTION_GROUPS.iter().map(|g| g.questions.len()).sum();
        let draft = default_fp_checklist_draft();
        assert_eq!(draft.checks.len(), expected);
        assert!(draft.checks.iter().all(|c| c.answer.is_none()));
    }

    #[test]
    fn only_sentinel_steps_get_drafts() {
        assert!(matches!(default_draft_for_step(CRIMINAL_CHECK_STEP), Some(StepDraft::CriminalCheck(_))));
        assert!(matches!(default_draft_for_step(TRAINING_PLAN_STEP), Some(StepDraft::TrainingPlan(_))));
        assert!(default_draft_for_step("role-scoping").is_none());
    }
}
