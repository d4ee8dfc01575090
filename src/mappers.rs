// src/mappers.rs

// ---
// Mapeadores: RawRow -> modelo em memória
// ---
// Funções puras e totais. Linhas malformadas nunca falham: cada campo cai no
// seu default documentado.

use chrono::Utc;
use serde_json::Value;

use crate::{
    api::{RawRow, RegisterSnapshot},
    catalog::functions::find_function,
    models::{
        assessments::{Determination, FitnessAssessmentRecord, FitnessResponse, FitnessStatus},
        breaches::{BreachSeverity, BreachStatus, BreachTimelineEntry, ConductBreach},
        documents::{DocumentMetadata, WorkflowDocument},
        firm::Firm,
        group::{GroupEntity, GroupEntityType},
        people::{
            AssessmentStatus, FcaVerification, PersonAssessment, PersonRecord, TrainingPlanItem,
            TrainingStatus,
        },
        roles::{ApprovalStatus, FunctionType, RoleAssignment},
        workflows::{
            ChecklistItem, FieldValue, StepStatus, WorkflowInstance, WorkflowStatus,
            WorkflowStepInstance,
        },
    },
    training::calculate_training_completion,
};

const UNNAMED: &str = "Unnamed";

/// Só objetos dentro de arrays JSON viram linhas.
fn nested_rows(values: Vec<Value>) -> impl Iterator<Item = RawRow> {
    values.into_iter().filter_map(RawRow::from_value)
}

// --- Firmas e grupo ---

pub fn map_firm(row: &RawRow) -> Firm {
    Firm {
        id: row.id(),
        name: row.string_or("name", "Unnamed Firm"),
        created_at: row.datetime("created_at").unwrap_or_else(Utc::now),
        authorization_project_id: row.opt_string("authorization_project_id"),
        authorization_project_name: row.opt_string("authorization_project_name"),
    }
}

pub fn map_group_entity(row: &RawRow) -> GroupEntity {
    GroupEntity {
        id: row.id(),
        name: row.string_or("name", UNNAMED),
        entity_type: GroupEntityType::from_raw(&row.string("type")),
        parent_id: row.opt_string("parent_id"),
        linked_firm_id: row.opt_string("linked_firm_id"),
        linked_project_id: row.opt_string("linked_project_id"),
        linked_project_name: row.opt_string("linked_project_name"),
        ownership_percent: row.f64("ownership_percent"),
        country: row.opt_string("country"),
        regulatory_status: row.opt_string("regulatory_status"),
        created_at: row.datetime("created_at").unwrap_or_else(Utc::now),
    }
}

// --- Pessoas ---

fn map_fca_verification(row: &RawRow) -> Option<FcaVerification> {
    let raw = RawRow::new(row.json_object("fca_verification"));
    let status = raw.opt_string("status")?;
    Some(FcaVerification {
        status,
        last_checked: raw.datetime("last_checked").unwrap_or_else(Utc::now),
        control_functions: raw.string_list("control_functions"),
        has_enforcement_history: raw.bool("has_enforcement_history"),
    })
}

// A avaliação pode vir como objeto aninhado ou em colunas planas.
fn map_person_assessment(row: &RawRow) -> PersonAssessment {
    let nested = RawRow::new(row.json_object("assessment"));
    let source = if nested.as_map().is_empty() { row } else { &nested };
    let status_key = if source.has("assessment_status") { "assessment_status" } else { "status" };
    PersonAssessment {
        status: AssessmentStatus::from_raw(&source.string(status_key)),
        last_assessment: source.datetime("last_assessment"),
        next_assessment: source.datetime("next_assessment"),
        training_completion: source.u64("training_completion").unwrap_or(0).min(100) as u8,
    }
}

pub fn map_training_item(row: &RawRow) -> TrainingPlanItem {
    let title = row.string_or("title", UNNAMED);
    TrainingPlanItem {
        id: row.id(),
        module_id: row.opt_string("module_id").unwrap_or_else(|| title.clone()),
        title,
        description: row.opt_string("description"),
        status: TrainingStatus::from_raw(&row.string("status")),
        due_date: row.datetime("due_date"),
        completed_date: row.datetime("completed_date"),
        role_context: row.opt_string("role_context"),
        required: row.bool("required"),
    }
}

/// O plano embutido na linha (se houver) entra já; os itens buscados à parte
/// são fundidos pelo store.
pub fn map_person(row: &RawRow) -> PersonRecord {
    let training_plan: Vec<TrainingPlanItem> = nested_rows(row.json_array("training_plan"))
        .map(|item| map_training_item(&item))
        .collect();
    let mut assessment = map_person_assessment(row);
    if !training_plan.is_empty() {
        assessment.training_completion = calculate_training_completion(&training_plan);
    }

    PersonRecord {
        id: row.id(),
        firm_id: row.string("firm_id"),
        employee_id: row.string("employee_id"),
        name: row.string_or("name", UNNAMED),
        email: row.string("email"),
        department: row.string("department"),
        title: row.opt_string("title"),
        phone: row.opt_string("phone"),
        address: row.opt_string("address"),
        line_manager: row.opt_string("line_manager"),
        start_date: row.datetime("start_date"),
        hire_date: row.datetime("hire_date"),
        end_date: row.datetime("end_date"),
        irn: row.opt_string("irn"),
        fca_verification: map_fca_verification(row),
        is_psd: row.bool("is_psd"),
        psd_status: row.opt_string("psd_status"),
        assessment,
        training_plan,
        created_at: row.datetime("created_at").unwrap_or_else(Utc::now),
    }
}

// --- Funções reguladas ---

pub fn map_role(row: &RawRow) -> RoleAssignment {
    let function_id = row.string("function_id");
    let catalog = find_function(&function_id);
    let function_type = match row.opt_string("function_type") {
        Some(raw) => FunctionType::from_raw(&raw),
        None => catalog.map_or(FunctionType::Smf, |f| f.function_type),
    };
    let function_label = row
        .opt_string("function_label")
        .or_else(|| catalog.map(|f| f.label()))
        .unwrap_or_else(|| function_id.clone());
    let created_at = row.datetime("created_at").unwrap_or_else(Utc::now);

    RoleAssignment {
        id: row.id(),
        firm_id: row.string("firm_id"),
        person_id: row.string("person_id"),
        function_type,
        function_id,
        function_label,
        start_date: row.datetime("start_date").unwrap_or(created_at),
        end_date: row.datetime("end_date"),
        assessment_date: row.datetime("assessment_date"),
        approval_status: ApprovalStatus::from_raw(&row.string("approval_status")),
        notes: row.string("notes"),
        created_at,
    }
}

// --- Workflows ---

fn map_field_value(value: &Value) -> Option<FieldValue> {
    match value {
        Value::Bool(b) => Some(FieldValue::Bool(*b)),
        Value::String(s) => Some(FieldValue::Text(s.clone())),
        Value::Number(n) => Some(FieldValue::Text(n.to_string())),
        _ => None,
    }
}

fn map_checklist_item(row: &RawRow) -> ChecklistItem {
    ChecklistItem {
        id: row.id(),
        text: row.string("text"),
        completed: row.bool("completed"),
    }
}

pub fn map_workflow_step(row: &RawRow) -> WorkflowStepInstance {
    let form = row.has("form").then(|| {
        row.json_object("form")
            .iter()
            .filter_map(|(key, value)| Some((key.clone(), map_field_value(value)?)))
            .collect()
    });
    let checklist = row.has("checklist").then(|| {
        nested_rows(row.json_array("checklist"))
            .map(|item| map_checklist_item(&item))
            .collect()
    });
    // Rascunho malformado: a etapa fica sem rascunho
    let draft = row
        .has("draft")
        .then(|| serde_json::from_value(row.get("draft").clone()).ok())
        .flatten();
    let id = row.id();

    WorkflowStepInstance {
        template_step_id: row.opt_string("template_step_id").unwrap_or_else(|| id.clone()),
        id,
        title: row.string("title"),
        description: row.string("description"),
        status: StepStatus::from_raw(&row.string("status")),
        notes: row.opt_string("notes"),
        completed_at: row.datetime("completed_at"),
        form,
        checklist,
        draft,
    }
}

pub fn map_workflow(row: &RawRow) -> WorkflowInstance {
    let steps = nested_rows(row.json_array("steps"))
        .map(|step| map_workflow_step(&step))
        .collect();
    let launched_at = row
        .datetime("launched_at")
        .or_else(|| row.datetime("created_at"))
        .unwrap_or_else(Utc::now);

    WorkflowInstance {
        id: row.id(),
        firm_id: row.string("firm_id"),
        template_id: row.string("template_id"),
        name: row.string_or("name", UNNAMED),
        summary: row.string("summary"),
        owner_person_id: row.opt_string("owner_person_id"),
        owner_name: row.opt_string("owner_name"),
        launched_at,
        due_date: row.datetime("due_date"),
        status: WorkflowStatus::from_raw(&row.string("status")),
        steps,
        success_criteria: row.string_list("success_criteria"),
        trigger: row.opt_string("trigger"),
    }
}

// --- Avaliações ---

fn map_fitness_response(row: &RawRow) -> FitnessResponse {
    FitnessResponse {
        question_id: row.string("question_id"),
        value: row.string("value"),
        notes: row.opt_string("notes"),
    }
}

pub fn map_assessment(row: &RawRow) -> FitnessAssessmentRecord {
    let created_at = row.datetime("created_at").unwrap_or_else(Utc::now);
    FitnessAssessmentRecord {
        id: row.id(),
        firm_id: row.string("firm_id"),
        person_id: row.string("person_id"),
        person_name: row.opt_string("person_name"),
        role: row.opt_string("role"),
        assessment_date: row.datetime("assessment_date").unwrap_or(created_at),
        next_due_date: row.datetime("next_due_date"),
        status: FitnessStatus::from_raw(&row.string("status")),
        overall_determination: row
            .opt_string("overall_determination")
            .and_then(|raw| Determination::from_raw(&raw)),
        conditions: row.string_list("conditions"),
        responses: nested_rows(row.json_array("responses"))
            .map(|response| map_fitness_response(&response))
            .collect(),
        reviewer: row.opt_string("reviewer"),
        created_at,
    }
}

// --- Violações de conduta ---

pub fn map_timeline_entry(row: &RawRow) -> BreachTimelineEntry {
    BreachTimelineEntry {
        id: row.id(),
        timestamp: row.datetime("timestamp").unwrap_or_else(Utc::now),
        author: row.opt_string("author"),
        action: row.string("action"),
        notes: row.opt_string("notes"),
    }
}

pub fn map_breach(row: &RawRow) -> ConductBreach {
    let created_at = row.datetime("created_at").unwrap_or_else(Utc::now);
    ConductBreach {
        id: row.id(),
        firm_id: row.string("firm_id"),
        person_id: row.string("person_id"),
        rule_id: row.string("rule_id"),
        title: row.string("title"),
        description: row.string("description"),
        date_identified: row.datetime("date_identified").unwrap_or(created_at),
        severity: BreachSeverity::from_raw(&row.string("severity")),
        status: BreachStatus::from_raw(&row.string("status")),
        investigator: row.opt_string("investigator"),
        findings: row.opt_string("findings"),
        remediation: row.opt_string("remediation"),
        reported_to_fca: row.bool("reported_to_fca"),
        timeline: nested_rows(row.json_array("timeline"))
            .map(|entry| map_timeline_entry(&entry))
            .collect(),
        created_at,
    }
}

// --- Documentos ---

pub fn map_document(row: &RawRow) -> DocumentMetadata {
    DocumentMetadata {
        id: row.id(),
        person_id: row.string("person_id"),
        name: row.string_or("name", UNNAMED),
        category: row.string_or("category", "other"),
        size: row.u64("size").unwrap_or(0),
        mime_type: row.opt_string("mime_type"),
        uploaded_at: row
            .datetime("uploaded_at")
            .or_else(|| row.datetime("created_at"))
            .unwrap_or_else(Utc::now),
        notes: row.opt_string("notes"),
    }
}

pub fn map_workflow_document(row: &RawRow) -> WorkflowDocument {
    WorkflowDocument {
        id: row.id(),
        workflow_id: row.string("workflow_id"),
        step_id: row.opt_string("step_id"),
        name: row.string_or("name", UNNAMED),
        doc_type: row
            .opt_string("type")
            .or_else(|| row.opt_string("category"))
            .unwrap_or_else(|| "other".to_string()),
        size: row.u64("size").unwrap_or(0),
        uploaded_at: row
            .datetime("uploaded_at")
            .or_else(|| row.datetime("created_at"))
            .unwrap_or_else(Utc::now),
    }
}

// --- Registo externo ---

pub fn map_register_snapshot(row: &RawRow) -> RegisterSnapshot {
    RegisterSnapshot {
        status: row.string_or("status", "Unknown"),
        control_functions: row.string_list("control_functions"),
        has_enforcement_history: row.bool("has_enforcement_history"),
    }
}
