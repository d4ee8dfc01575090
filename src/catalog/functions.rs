// src/catalog/functions.rs

use crate::models::roles::FunctionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionDefinition {
    pub id: &'static str,
    pub function_type: FunctionType,
    pub title: &'static str,
    pub description: &'static str,
}

impl FunctionDefinition {
    /// Rótulo mostrado nas atribuições, ex: "SMF16 Compliance Oversight".
    pub fn label(&self) -> String {
        format!("{} {}", self.id, self.title)
    }
}

const fn smf(id: &'static str, title: &'static str, description: &'static str) -> FunctionDefinition {
    FunctionDefinition {
        id,
        function_type: FunctionType::Smf,
        title,
        description,
    }
}

const fn cf(id: &'static str, title: &'static str, description: &'static str) -> FunctionDefinition {
    FunctionDefinition {
        id,
        function_type: FunctionType::Cf,
        title,
        description,
    }
}

pub static SENIOR_MANAGEMENT_FUNCTIONS: &[FunctionDefinition] = &[
    smf("SMF1", "Chief Executive", "Performing the function of having responsibility for carrying out the management of the conduct of the whole of the business."),
    smf("SMF2", "Chief Finance", "Responsible for management of the financial resources of the firm and reporting directly to the governing body."),
    smf("SMF3", "Executive Director", "A member of the governing body who is an employee of the firm."),
    smf("SMF4", "Chief Risk", "Responsible for overall management of the risk controls of the firm."),
    smf("SMF5", "Head of Internal Audit", "Responsible for management of the internal audit function."),
    smf("SMF6", "Head of Key Business Area", "Responsible for management of a business area that is significant to the firm."),
    smf("SMF7", "Group Entity Senior Manager", "Employed by a group entity and exercising significant influence over the firm."),
    smf("SMF9", "Chair", "Chairing the governing body of the firm."),
    smf("SMF10", "Chair of the Risk Committee", "Chairing the risk committee of the governing body."),
    smf("SMF11", "Chair of the Audit Committee", "Chairing the audit committee of the governing body."),
    smf("SMF12", "Chair of the Remuneration Committee", "Chairing the remuneration committee of the governing body."),
    smf("SMF13", "Chair of the Nominations Committee", "Chairing the nominations committee of the governing body."),
    smf("SMF14", "Senior Independent Director", "Performing the role of senior independent director."),
    smf("SMF16", "Compliance Oversight", "Responsible for the compliance function of the firm."),
    smf("SMF17", "Money Laundering Reporting", "Acting as the firm's money laundering reporting officer."),
    smf("SMF18", "Other Overall Responsibility", "Having overall responsibility for an activity, business area or management function."),
    smf("SMF24", "Chief Operations", "Responsible for the internal operations and technology of the firm."),
    smf("SMF27", "Partner", "A partner with significant responsibility for a business area."),
    smf("SMF29", "Limited Scope Function", "Senior manager in a limited scope firm performing a specified role."),
];

pub static CERTIFICATION_FUNCTIONS: &[FunctionDefinition] = &[
    cf("CF1", "Significant Management", "Senior staff with significant responsibility for a business area."),
    cf("CF2", "Proprietary Trader", "Employees dealing as principal."),
    cf("CF3", "CASS Oversight", "Oversight of client assets and money rules."),
    cf("CF4", "Benchmark Submission and Administration", "Involvement in benchmark submission or administration."),
    cf("CF5", "Algorithmic Trading", "Approving or monitoring algorithmic trading strategies."),
    cf("CF6", "Material Risk Taker", "Employees identified as material risk takers."),
    cf("CF7", "Client-Dealing", "Dealing with clients in a regulated capacity requiring qualifications."),
    cf("CF8", "Manager of Certification Employee", "Managing or supervising a certification employee."),
    cf("CF9", "Material Risk Taker (Other)", "Any employee who can cause significant harm to the firm or its customers."),
];

/// Procura uma função (SMF ou CF) pelo id, sem diferenciar maiúsculas.
pub fn find_function(function_id: &str) -> Option<&'static FunctionDefinition> {
    SENIOR_MANAGEMENT_FUNCTIONS
        .iter()
        .chain(CERTIFICATION_FUNCTIONS.iter())
        .find(|f| f.id.eq_ignore_ascii_case(function_id.trim()))
}
