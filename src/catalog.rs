// src/catalog.rs

// Catálogos estáticos do regime (definidos em código, nunca buscados na API).

pub mod conduct_rules;
pub mod fitness;
pub mod functions;
pub mod responsibilities;
pub mod templates;
pub mod training;

pub use conduct_rules::{ConductRule, CONDUCT_RULES};
pub use fitness::{FitnessQuestion, FitnessQuestionGroup, FITNESS_QUESTION_GROUPS};
pub use functions::{FunctionDefinition, CERTIFICATION_FUNCTIONS, SENIOR_MANAGEMENT_FUNCTIONS};
pub use responsibilities::{PrescribedResponsibility, PRESCRIBED_RESPONSIBILITIES};
pub use templates::{
    FieldDefinition, FieldType, WorkflowTemplate, WorkflowTemplateStep, WORKFLOW_TEMPLATES,
};
pub use training::{TrainingModule, ROLE_TRAINING};
