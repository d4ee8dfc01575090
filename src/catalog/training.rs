// src/catalog/training.rs

// Mapeamento função -> módulos de formação obrigatórios.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingModule {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    // Prazo a partir do início da função
    pub due_within_days: i64,
    pub required: bool,
}

const CONDUCT_RULES_STAFF: TrainingModule = TrainingModule {
    id: "conduct-rules-staff",
    title: "Individual Conduct Rules",
    description: "The individual conduct rules and how they apply day to day.",
    due_within_days: 90,
    required: true,
};

const CONDUCT_RULES_SENIOR: TrainingModule = TrainingModule {
    id: "conduct-rules-senior-managers",
    title: "Senior Manager Conduct Rules",
    description: "SC1 to SC4 and the duty of responsibility.",
    due_within_days: 30,
    required: true,
};

const DUTY_OF_RESPONSIBILITY: TrainingModule = TrainingModule {
    id: "duty-of-responsibility",
    title: "Duty of Responsibility",
    description: "Reasonable steps, statements of responsibilities and handovers.",
    due_within_days: 30,
    required: true,
};

const FINANCIAL_CRIME: TrainingModule = TrainingModule {
    id: "financial-crime",
    title: "Financial Crime and AML",
    description: "Money laundering, sanctions and suspicious activity reporting.",
    due_within_days: 60,
    required: true,
};

const CONSUMER_DUTY: TrainingModule = TrainingModule {
    id: "consumer-duty",
    title: "Consumer Duty",
    description: "Delivering good outcomes for retail customers.",
    due_within_days: 90,
    required: true,
};

const CASS_ESSENTIALS: TrainingModule = TrainingModule {
    id: "cass-essentials",
    title: "Client Assets (CASS)",
    description: "Client money and custody asset rules.",
    due_within_days: 60,
    required: true,
};

const RISK_GOVERNANCE: TrainingModule = TrainingModule {
    id: "risk-governance",
    title: "Risk Governance",
    description: "Risk appetite, frameworks and board reporting.",
    due_within_days: 60,
    required: false,
};

pub struct RoleTraining {
    pub function_id: &'static str,
    pub modules: &'static [TrainingModule],
}

pub static ROLE_TRAINING: &[RoleTraining] = &[
    RoleTraining { function_id: "SMF1", modules: &[CONDUCT_RULES_SENIOR, DUTY_OF_RESPONSIBILITY, CONSUMER_DUTY] },
    RoleTraining { function_id: "SMF3", modules: &[CONDUCT_RULES_SENIOR, DUTY_OF_RESPONSIBILITY] },
    RoleTraining { function_id: "SMF4", modules: &[CONDUCT_RULES_SENIOR, DUTY_OF_RESPONSIBILITY, RISK_GOVERNANCE] },
    RoleTraining { function_id: "SMF9", modules: &[CONDUCT_RULES_SENIOR, DUTY_OF_RESPONSIBILITY] },
    RoleTraining { function_id: "SMF16", modules: &[CONDUCT_RULES_SENIOR, DUTY_OF_RESPONSIBILITY, CONSUMER_DUTY] },
    RoleTraining { function_id: "SMF17", modules: &[CONDUCT_RULES_SENIOR, DUTY_OF_RESPONSIBILITY, FINANCIAL_CRIME] },
    RoleTraining { function_id: "SMF24", modules: &[CONDUCT_RULES_SENIOR, DUTY_OF_RESPONSIBILITY] },
    RoleTraining { function_id: "CF3", modules: &[CONDUCT_RULES_STAFF, CASS_ESSENTIALS] },
    RoleTraining { function_id: "CF7", modules: &[CONDUCT_RULES_STAFF, CONSUMER_DUTY] },
    RoleTraining { function_id: "CF8", modules: &[CONDUCT_RULES_STAFF] },
];

/// Módulos de uma função; lista vazia quando não há mapeamento.
pub fn training_modules_for(function_id: &str) -> &'static [TrainingModule] {
    ROLE_TRAINING
        .iter()
        .find(|r| r.function_id.eq_ignore_ascii_case(function_id.trim()))
        .map(|r| r.modules)
        .unwrap_or(&[])
}
