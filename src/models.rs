pub mod assessments;
pub mod breaches;
pub mod documents;
pub mod drafts;
pub mod firm;
pub mod group;
pub mod people;
pub mod roles;
pub mod workflows;
