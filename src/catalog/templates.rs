// src/catalog/templates.rs

// ---
// Templates de workflow (estáticos)
// ---
// Etapas com um dos ids sentinela abaixo recebem um rascunho especializado
// ao instanciar o workflow.

pub const FP_CHECKLIST_STEP: &str = "fitness-propriety";
pub const REFERENCE_REQUEST_STEP: &str = "regulatory-references";
pub const CRIMINAL_CHECK_STEP: &str = "criminal-record-check";
pub const TRAINING_PLAN_STEP: &str = "training-plan";
pub const STATEMENT_OF_RESPONSIBILITIES_STEP: &str = "statement-of-responsibilities";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Textarea,
    Date,
    Select,
    Boolean,
    Number,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub field_type: FieldType,
    pub options: &'static [&'static str],
    pub required: bool,
    pub default: Option<&'static str>,
}

impl FieldDefinition {
    pub const fn new(id: &'static str, label: &'static str, field_type: FieldType) -> Self {
        Self {
            id,
            label,
            field_type,
            options: &[],
            required: false,
            default: None,
        }
    }

    pub const fn select(id: &'static str, label: &'static str, options: &'static [&'static str]) -> Self {
        Self {
            id,
            label,
            field_type: FieldType::Select,
            options,
            required: false,
            default: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowTemplateStep {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldDefinition],
    pub checklist: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub summary: &'static str,
    pub trigger: Option<&'static str>,
    pub success_criteria: &'static [&'static str],
    pub steps: &'static [WorkflowTemplateStep],
}

const SENIOR_FUNCTION_OPTIONS: &[&str] = &["SMF1", "SMF3", "SMF4", "SMF9", "SMF16", "SMF17", "SMF24"];
const CERTIFICATION_OPTIONS: &[&str] = &["CF1", "CF3", "CF6", "CF7", "CF8"];

pub static WORKFLOW_TEMPLATES: &[WorkflowTemplate] = &[
    WorkflowTemplate {
        id: "smf-onboarding",
        name: "Senior Manager Onboarding",
        summary: "Take a proposed Senior Manager from role scoping through to FCA approval.",
        trigger: Some("New Senior Management Function appointment"),
        success_criteria: &[
            "Fitness and propriety assessed and documented",
            "Regulatory references obtained for the last six years",
            "Statement of responsibilities agreed",
            "Application submitted to the FCA",
        ],
        steps: &[
            WorkflowTemplateStep {
                id: "role-scoping",
                title: "Role scoping",
                description: "Confirm the candidate, the function and the proposed start date.",
                fields: &[
                    FieldDefinition::new("candidateName", "Candidate name", FieldType::Text).required(),
                    FieldDefinition::select("functionId", "Senior Management Function", SENIOR_FUNCTION_OPTIONS).required(),
                    FieldDefinition::new("proposedStart", "Proposed start date", FieldType::Date),
                    FieldDefinition::new("internalCandidate", "Internal candidate", FieldType::Boolean),
                ],
                checklist: &[],
            },
            WorkflowTemplateStep {
                id: FP_CHECKLIST_STEP,
                title: "Fitness and propriety",
                description: "Assess honesty, competence and financial soundness.",
                fields: &[],
                checklist: &[],
            },
            WorkflowTemplateStep {
                id: REFERENCE_REQUEST_STEP,
                title: "Regulatory references",
                description: "Request references from every employer in the last six years.",
                fields: &[],
                checklist: &[],
            },
            WorkflowTemplateStep {
                id: CRIMINAL_CHECK_STEP,
                title: "Criminal record check",
                description: "Obtain a DBS check at the level required for the role.",
                fields: &[],
                checklist: &[],
            },
            WorkflowTemplateStep {
                id: STATEMENT_OF_RESPONSIBILITIES_STEP,
                title: "Statement of responsibilities",
                description: "Allocate functions and prescribed responsibilities.",
                fields: &[],
                checklist: &[],
            },
            WorkflowTemplateStep {
                id: TRAINING_PLAN_STEP,
                title: "Training plan",
                description: "Agree the induction and regulatory training plan.",
                fields: &[],
                checklist: &[],
            },
            WorkflowTemplateStep {
                id: "fca-application",
                title: "FCA application",
                description: "Submit Form A and track the application.",
                fields: &[
                    FieldDefinition::new("submissionReference", "Connect submission reference", FieldType::Text),
                    FieldDefinition::new("submittedOn", "Submitted on", FieldType::Date),
                ],
                checklist: &[
                    "Complete Form A on Connect",
                    "Attach the statement of responsibilities",
                    "Update the management responsibilities map",
                    "Record board approval in the minutes",
                ],
            },
        ],
    },
    WorkflowTemplate {
        id: "certification-annual-review",
        name: "Annual Certification Review",
        summary: "Re-assess and re-certify a certification employee.",
        trigger: Some("Certificate anniversary"),
        success_criteria: &["Fitness and propriety re-assessed", "Certificate issued or withheld"],
        steps: &[
            WorkflowTemplateStep {
                id: "review-scope",
                title: "Review scope",
                description: "Confirm the certification function and the review period.",
                fields: &[
                    FieldDefinition::select("certificationFunction", "Certification function", CERTIFICATION_OPTIONS).required(),
                    FieldDefinition::select("reviewType", "Review type", &["Annual", "Ad hoc"]),
                    FieldDefinition::new("reviewNotes", "Notes", FieldType::Textarea),
                ],
                checklist: &[],
            },
            WorkflowTemplateStep {
                id: FP_CHECKLIST_STEP,
                title: "Fitness and propriety",
                description: "Re-assess the employee against the fitness questions.",
                fields: &[],
                checklist: &[],
            },
            WorkflowTemplateStep {
                id: "evidence",
                title: "Evidence gathering",
                description: "Collect the evidence supporting the certificate.",
                fields: &[],
                checklist: &[
                    "Performance review on file",
                    "Conduct rules training completed",
                    "No open conduct breaches",
                ],
            },
            WorkflowTemplateStep {
                id: "sign-off",
                title: "Sign-off",
                description: "Record the certification decision.",
                fields: &[
                    FieldDefinition::new("approver", "Approver", FieldType::Text).required(),
                    FieldDefinition::new("certified", "Certificate issued", FieldType::Boolean),
                    FieldDefinition::new("approverEmail", "Approver email", FieldType::Email),
                ],
                checklist: &[],
            },
        ],
    },
    WorkflowTemplate {
        id: "conduct-breach-investigation",
        name: "Conduct Breach Investigation",
        summary: "Investigate a suspected conduct rule breach and notify the FCA where required.",
        trigger: Some("Suspected conduct rule breach"),
        success_criteria: &["Investigation concluded", "Form D notification assessed"],
        steps: &[
            WorkflowTemplateStep {
                id: "triage",
                title: "Triage",
                description: "Classify the suspected breach.",
                fields: &[
                    FieldDefinition::select("severity", "Severity", &["minor", "serious", "severe"]).with_default("minor"),
                    FieldDefinition::new("dateIdentified", "Date identified", FieldType::Date).required(),
                    FieldDefinition::new("witnesses", "Number of witnesses", FieldType::Number),
                ],
                checklist: &[],
            },
            WorkflowTemplateStep {
                id: "investigation",
                title: "Investigation",
                description: "Gather facts and interview the people involved.",
                fields: &[FieldDefinition::new("findings", "Findings", FieldType::Textarea)],
                checklist: &[
                    "Secure relevant records",
                    "Interview the individual",
                    "Interview witnesses",
                ],
            },
            WorkflowTemplateStep {
                id: "notification",
                title: "Regulatory notification",
                description: "Decide whether a Form D notification is required.",
                fields: &[FieldDefinition::new("notifyFca", "Notification required", FieldType::Boolean)],
                checklist: &["Disciplinary outcome recorded", "Form D submitted if required"],
            },
        ],
    },
    WorkflowTemplate {
        id: "smf-offboarding",
        name: "Senior Manager Offboarding",
        summary: "Hand over responsibilities and withdraw the approval.",
        trigger: None,
        success_criteria: &["Handover certificate completed", "Form C submitted"],
        steps: &[
            WorkflowTemplateStep {
                id: "handover",
                title: "Handover",
                description: "Prepare the handover of responsibilities.",
                fields: &[
                    FieldDefinition::new("successor", "Successor", FieldType::Text),
                    FieldDefinition::new("leavingDate", "Leaving date", FieldType::Date).required(),
                ],
                checklist: &["Handover certificate drafted", "Successor briefed"],
            },
            WorkflowTemplateStep {
                id: "withdrawal",
                title: "Withdrawal",
                description: "Withdraw the approval with the FCA.",
                fields: &[],
                checklist: &["Form C submitted within 7 business days", "Responsibilities map updated"],
            },
        ],
    },
];

pub fn find_template(template_id: &str) -> Option<&'static WorkflowTemplate> {
    WORKFLOW_TEMPLATES.iter().find(|t| t.id == template_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_ids_and_step_ids_are_unique() {
        let mut ids: Vec<&str> = WORKFLOW_TEMPLATES.iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), WORKFLOW_TEMPLATES.len());

        for template in WORKFLOW_TEMPLATES {
            let mut steps: Vec<&str> = template.steps.iter().map(|s| s.id).collect();
            steps.sort_unstable();
            steps.dedup();
            assert_eq!(steps.len(), template.steps.len(), "{}", template.id);
        }
    }

    #[test]
    fn onboarding_covers_every_sentinel_step() {
        let onboarding = find_template("smf-onboarding").unwrap();
        for sentinel in [
            FP_CHECKLIST_STEP,
            REFERENCE_REQUEST_STEP,
            CRIMINAL_CHECK_STEP,
            TRAINING_PLAN_STEP,
            STATEMENT_OF_RESPONSIBILITIES_STEP,
        ] {
            assert!(onboarding.steps.iter().any(|s| s.id == sentinel), "{sentinel}");
        }
    }
}
