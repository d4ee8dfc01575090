pub mod store;
pub use store::{SmcrState, SmcrStore};
pub mod firm_service;
pub mod people_service;
pub mod role_service;
pub mod workflow_service;
pub use workflow_service::StepUpdate;
pub mod assessment_service;
pub mod breach_service;
pub mod group_service;
pub mod verification_service;
pub use verification_service::{reverify_people, ReverificationReport, VerificationEntry};
