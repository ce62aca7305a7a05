//! Completeness and shape checks for answer sets.
//!
//! The classifier accepts anything; callers that must reject incomplete
//! questionnaires run [`validate`] or [`require_complete`] first.

use serde::Serialize;

use crate::answers::{AnswerSet, AnswerValue, YesNo};
use crate::catalog::{find_question, AnswerType, Question, CLASSIFICATION_QUESTIONS};
use crate::error::{IntakeError, Result};

/// What is wrong with one answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// Required question left unanswered or blank
    MissingRequired,
    /// Value shape does not fit the answer type
    WrongType { expected: AnswerType },
    /// Yes/no question answered with something other than yes or no
    NotYesNo { value: String },
    /// Choice outside the question's option set
    UnknownOption { value: String },
    /// Key not in the catalog
    UnknownQuestion,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueKind::MissingRequired => write!(f, "required answer missing"),
            IssueKind::WrongType { expected } => write!(f, "expected a {} answer", expected),
            IssueKind::NotYesNo { value } => write!(f, "'{}' is not yes or no", value),
            IssueKind::UnknownOption { value } => write!(f, "'{}' is not a valid option", value),
            IssueKind::UnknownQuestion => write!(f, "not a catalog question"),
        }
    }
}

/// One validation finding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnswerIssue {
    pub question_key: String,
    #[serde(flatten)]
    pub kind: IssueKind,
}

/// All findings for an answer set, in catalog order followed by unknown keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<AnswerIssue>,
}

impl ValidationReport {
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn missing_keys(&self) -> Vec<&str> {
        self.issues
            .iter()
            .filter(|i| i.kind == IssueKind::MissingRequired)
            .map(|i| i.question_key.as_str())
            .collect()
    }

    fn push(&mut self, key: &str, kind: IssueKind) {
        self.issues.push(AnswerIssue {
            question_key: key.to_string(),
            kind,
        });
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} issue(s)", self.issues.len())?;
        for (i, issue) in self.issues.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}: {}", sep, issue.question_key, issue.kind)?;
        }
        Ok(())
    }
}

/// Check every catalog question against the answer set.
pub fn validate(answers: &AnswerSet) -> ValidationReport {
    let mut report = ValidationReport::default();

    for question in CLASSIFICATION_QUESTIONS {
        match answers.get(question.key) {
            None => {
                if question.required {
                    report.push(question.key, IssueKind::MissingRequired);
                }
            }
            Some(value) if value.is_blank() => {
                if question.required {
                    report.push(question.key, IssueKind::MissingRequired);
                }
            }
            Some(value) => {
                if let Some(kind) = check_value(question, value) {
                    report.push(question.key, kind);
                }
            }
        }
    }

    for (key, _) in answers.iter() {
        if find_question(key).is_none() {
            report.push(key, IssueKind::UnknownQuestion);
        }
    }

    report
}

/// Fail with [`IntakeError::Incomplete`] unless the answer set validates.
pub fn require_complete(answers: &AnswerSet) -> Result<()> {
    let report = validate(answers);
    if report.is_complete() {
        Ok(())
    } else {
        Err(IntakeError::Incomplete(report))
    }
}

fn check_value(question: &Question, value: &AnswerValue) -> Option<IssueKind> {
    let wrong_type = || IssueKind::WrongType {
        expected: question.answer_type,
    };

    match question.answer_type {
        AnswerType::Text => value.as_text().is_none().then(wrong_type),
        AnswerType::YesNo => match (YesNo::normalize(Some(value)), value) {
            (yn, _) if yn.is_determinate() => None,
            (_, AnswerValue::Text(s)) => Some(IssueKind::NotYesNo { value: s.clone() }),
            _ => Some(wrong_type()),
        },
        AnswerType::SingleSelect => match value.as_text() {
            None => Some(wrong_type()),
            Some(choice) => unknown_option(question, choice),
        },
        AnswerType::MultiSelect => match value.as_list() {
            None => Some(wrong_type()),
            Some(choices) => choices
                .iter()
                .find_map(|choice| unknown_option(question, choice)),
        },
    }
}

fn unknown_option(question: &Question, choice: &str) -> Option<IssueKind> {
    question.option(choice).is_none().then(|| IssueKind::UnknownOption {
        value: choice.to_string(),
    })
}
