// src/catalog/fitness.rs

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitnessQuestion {
    pub id: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitnessQuestionGroup {
    pub id: &'static str,
    pub title: &'static str,
    pub questions: &'static [FitnessQuestion],
}

pub static FITNESS_QUESTION_GROUPS: &[FitnessQuestionGroup] = &[
    FitnessQuestionGroup {
        id: "honesty",
        title: "Honesty, integrity and reputation",
        questions: &[
            FitnessQuestion { id: "honesty-criminal", text: "Has the individual been convicted of, or charged with, any criminal offence?" },
            FitnessQuestion { id: "honesty-civil", text: "Has the individual been the subject of any adverse finding in civil proceedings?" },
            FitnessQuestion { id: "honesty-regulatory", text: "Has the individual been the subject of any regulatory investigation or disciplinary action?" },
            FitnessQuestion { id: "honesty-disclosure", text: "Has the individual been candid and truthful in all dealings with regulators?" },
        ],
    },
    FitnessQuestionGroup {
        id: "competence",
        title: "Competence and capability",
        questions: &[
            FitnessQuestion { id: "competence-experience", text: "Does the individual have the experience required for the role?" },
            FitnessQuestion { id: "competence-qualifications", text: "Does the individual hold the qualifications required for the role?" },
            FitnessQuestion { id: "competence-training", text: "Has the individual completed the required regulatory training?" },
            FitnessQuestion { id: "competence-time", text: "Does the individual have sufficient time to perform the role?" },
        ],
    },
    FitnessQuestionGroup {
        id: "financial",
        title: "Financial soundness",
        questions: &[
            FitnessQuestion { id: "financial-judgments", text: "Has the individual been the subject of any judgment debt or award?" },
            FitnessQuestion { id: "financial-insolvency", text: "Has the individual been adjudged bankrupt or entered into an arrangement with creditors?" },
        ],
    },
];

/// Todas as perguntas canônicas, na ordem dos grupos.
pub fn all_questions() -> impl Iterator<Item = &'static FitnessQuestion> {
    FITNESS_QUESTION_GROUPS.iter().flat_map(|g| g.questions.iter())
}
