//! The fixed classification questionnaire.
//!
//! The catalog is a static table; questions are never added or mutated at
//! runtime. Callers look questions up by key with [`find_question`].

use serde::Serialize;

/// Section name under which classification answers are stored.
pub const CLASSIFICATION_SECTION: &str = "classification";

/// Question keys used by the catalog and the classifier.
pub mod keys {
    pub const INTENDED_PURPOSE: &str = "intended_purpose";
    pub const WHO_USES_IT: &str = "who_uses_it";
    pub const DEPLOY_CONTEXT: &str = "deploy_context";
    pub const MAKES_OR_SUPPORTS_DECISIONS: &str = "makes_or_supports_decisions";
    pub const AFFECTS_LEGAL_RIGHTS: &str = "affects_legal_rights";
    pub const SAFETY_COMPONENT: &str = "safety_component";
    pub const BIOMETRIC_IDENTIFICATION: &str = "biometric_identification";
    pub const USED_IN_PUBLIC_SPACE_FOR_POLICING: &str = "used_in_public_space_for_policing";
    pub const SUBLIMINAL_OR_MANIPULATIVE: &str = "subliminal_or_manipulative";
    pub const VULNERABLE_GROUPS_EXPLOITATION: &str = "vulnerable_groups_exploitation";
    pub const SOCIAL_SCORING: &str = "social_scoring";
    pub const EMOTION_RECOGNITION_WORK_OR_EDUCATION: &str =
        "emotion_recognition_work_or_education";
    pub const GPAI_FOUNDATION_MODEL_USED: &str = "gpaifoundation_model_used";
}

/// How a question is answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerType {
    /// Free text
    Text,
    /// "yes" / "no"
    YesNo,
    /// Exactly one of the question's options
    SingleSelect,
    /// Any subset of the question's options
    MultiSelect,
}

impl AnswerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerType::Text => "text",
            AnswerType::YesNo => "yes_no",
            AnswerType::SingleSelect => "single_select",
            AnswerType::MultiSelect => "multi_select",
        }
    }

    /// Whether answers are constrained to the question's option set.
    pub fn has_options(&self) -> bool {
        matches!(self, AnswerType::SingleSelect | AnswerType::MultiSelect)
    }
}

impl std::fmt::Display for AnswerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable option of a choice question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// A questionnaire entry.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Question {
    pub section: &'static str,
    #[serde(rename = "question_key")]
    pub key: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<&'static str>,
    #[serde(rename = "type")]
    pub answer_type: AnswerType,
    #[serde(skip_serializing_if = "no_options")]
    pub options: &'static [ChoiceOption],
    pub required: bool,
}

impl Question {
    /// Look up an option by its stored value.
    pub fn option(&self, value: &str) -> Option<&'static ChoiceOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

fn no_options(options: &&'static [ChoiceOption]) -> bool {
    options.is_empty()
}

const fn yes_no(key: &'static str, label: &'static str, help: Option<&'static str>) -> Question {
    Question {
        section: CLASSIFICATION_SECTION,
        key,
        label,
        help,
        answer_type: AnswerType::YesNo,
        options: &[],
        required: true,
    }
}

const WHO_USES_IT_OPTIONS: &[ChoiceOption] = &[
    ChoiceOption { value: "internal_staff", label: "Internal staff" },
    ChoiceOption { value: "customers", label: "Customers / end users" },
    ChoiceOption { value: "public", label: "General public" },
    ChoiceOption { value: "public_authority", label: "Public authority / government body" },
];

const DEPLOY_CONTEXT_OPTIONS: &[ChoiceOption] = &[
    ChoiceOption { value: "internal", label: "Internal only" },
    ChoiceOption { value: "customer_facing", label: "Customer-facing product/service" },
    ChoiceOption { value: "public_facing", label: "Public-facing" },
    ChoiceOption { value: "critical_process", label: "Used in a critical business process" },
];

/// The classification questionnaire, in display order.
pub static CLASSIFICATION_QUESTIONS: &[Question] = &[
    Question {
        section: CLASSIFICATION_SECTION,
        key: keys::INTENDED_PURPOSE,
        label: "Intended purpose",
        help: Some("One sentence describing what the AI system is for."),
        answer_type: AnswerType::Text,
        options: &[],
        required: true,
    },
    Question {
        section: CLASSIFICATION_SECTION,
        key: keys::WHO_USES_IT,
        label: "Who uses it",
        help: None,
        answer_type: AnswerType::MultiSelect,
        options: WHO_USES_IT_OPTIONS,
        required: true,
    },
    Question {
        section: CLASSIFICATION_SECTION,
        key: keys::DEPLOY_CONTEXT,
        label: "Deployment context",
        help: None,
        answer_type: AnswerType::SingleSelect,
        options: DEPLOY_CONTEXT_OPTIONS,
        required: true,
    },
    yes_no(
        keys::MAKES_OR_SUPPORTS_DECISIONS,
        "Does it make decisions or materially support decisions about people?",
        Some("Examples: hiring, firing, admissions, credit, benefits, policing, border control, healthcare triage."),
    ),
    yes_no(
        keys::AFFECTS_LEGAL_RIGHTS,
        "Could it affect a person’s legal rights, opportunities, or access to essential services?",
        None,
    ),
    yes_no(
        keys::SAFETY_COMPONENT,
        "Is it a safety component of a product (or used in a product’s safety function)?",
        Some("Example: medical device safety, industrial machinery safety, vehicles."),
    ),
    yes_no(
        keys::BIOMETRIC_IDENTIFICATION,
        "Does it perform biometric identification or categorisation of people?",
        Some("Face recognition, voice ID, emotion inference, biometric categorisation."),
    ),
    yes_no(
        keys::USED_IN_PUBLIC_SPACE_FOR_POLICING,
        "Is it used in public spaces for law enforcement purposes?",
        None,
    ),
    yes_no(
        keys::SUBLIMINAL_OR_MANIPULATIVE,
        "Does it use subliminal techniques or manipulative methods to materially distort behaviour?",
        None,
    ),
    yes_no(
        keys::VULNERABLE_GROUPS_EXPLOITATION,
        "Is it designed to exploit vulnerabilities of specific groups (age, disability, etc.)?",
        None,
    ),
    yes_no(
        keys::SOCIAL_SCORING,
        "Does it do social scoring of people (by a public or private entity)?",
        None,
    ),
    yes_no(
        keys::EMOTION_RECOGNITION_WORK_OR_EDUCATION,
        "Does it do emotion recognition in workplaces or educational settings?",
        None,
    ),
    yes_no(
        keys::GPAI_FOUNDATION_MODEL_USED,
        "Does it use a general-purpose AI / foundation model (e.g., GPT, Claude, Gemini, LLaMA)?",
        None,
    ),
];

/// Find a catalog question by key.
pub fn find_question(key: &str) -> Option<&'static Question> {
    CLASSIFICATION_QUESTIONS.iter().find(|q| q.key == key)
}
