// src/workflow.rs

// Motor de workflows: template -> instância, e mutações por etapa.

pub mod drafts;
pub mod instantiate;
pub mod steps;

pub use instantiate::instantiate_workflow;
pub use steps::derive_workflow_status;
