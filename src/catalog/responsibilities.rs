// src/catalog/responsibilities.rs

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrescribedResponsibility {
    pub id: &'static str,
    pub title: &'static str,
    // Aplicável apenas a firmas "enhanced"
    pub enhanced_only: bool,
}

pub static PRESCRIBED_RESPONSIBILITIES: &[PrescribedResponsibility] = &[
    PrescribedResponsibility { id: "PR-a", title: "Performance of the firm's obligations under the Senior Managers regime", enhanced_only: false },
    PrescribedResponsibility { id: "PR-b", title: "Performance of the firm's obligations under the employee certification regime", enhanced_only: false },
    PrescribedResponsibility { id: "PR-b1", title: "Compliance with the rules on conduct rules training and reporting", enhanced_only: false },
    PrescribedResponsibility { id: "PR-d", title: "Policies and procedures for countering the risk of financial crime", enhanced_only: false },
    PrescribedResponsibility { id: "PR-z", title: "Compliance with CASS", enhanced_only: false },
    PrescribedResponsibility { id: "PR-c", title: "Compliance with the rules relating to the firm's Management Responsibilities Map", enhanced_only: true },
    PrescribedResponsibility { id: "PR-j", title: "Safeguarding the independence and performance of the internal audit function", enhanced_only: true },
    PrescribedResponsibility { id: "PR-k", title: "Safeguarding the independence and performance of the compliance function", enhanced_only: true },
    PrescribedResponsibility { id: "PR-l", title: "Safeguarding the independence and performance of the risk function", enhanced_only: true },
    PrescribedResponsibility { id: "PR-t", title: "Developing and maintaining the firm's business model", enhanced_only: true },
];

pub fn find_responsibility(id: &str) -> Option<&'static PrescribedResponsibility> {
    PRESCRIBED_RESPONSIBILITIES.iter().find(|r| r.id == id)
}
