// src/catalog/conduct_rules.rs

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConductRule {
    pub id: &'static str,
    pub title: &'static str,
    // Regras SC só se aplicam a Senior Managers
    pub senior_manager_only: bool,
}

pub static CONDUCT_RULES: &[ConductRule] = &[
    ConductRule { id: "ICR1", title: "You must act with integrity.", senior_manager_only: false },
    ConductRule { id: "ICR2", title: "You must act with due skill, care and diligence.", senior_manager_only: false },
    ConductRule { id: "ICR3", title: "You must be open and cooperative with the FCA, the PRA and other regulators.", senior_manager_only: false },
    ConductRule { id: "ICR4", title: "You must pay due regard to the interests of customers and treat them fairly.", senior_manager_only: false },
    ConductRule { id: "ICR5", title: "You must observe proper standards of market conduct.", senior_manager_only: false },
    ConductRule { id: "ICR6", title: "You must act to deliver good outcomes for retail customers.", senior_manager_only: false },
    ConductRule { id: "SC1", title: "You must take reasonable steps to ensure that the business of the firm for which you are responsible is controlled effectively.", senior_manager_only: true },
    ConductRule { id: "SC2", title: "You must take reasonable steps to ensure that the business of the firm for which you are responsible complies with the relevant requirements and standards of the regulatory system.", senior_manager_only: true },
    ConductRule { id: "SC3", title: "You must take reasonable steps to ensure that any delegation of your responsibilities is to an appropriate person and that you oversee the discharge of the delegated responsibility effectively.", senior_manager_only: true },
    ConductRule { id: "SC4", title: "You must disclose appropriately any information of which the FCA or PRA would reasonably expect notice.", senior_manager_only: true },
];

pub fn find_conduct_rule(id: &str) -> Option<&'static ConductRule> {
    CONDUCT_RULES.iter().find(|r| r.id.eq_ignore_ascii_case(id.trim()))
}
