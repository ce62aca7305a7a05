//! # aiact-intake
//!
//! Intake questionnaire and risk classification for EU AI Act compliance
//! documentation.
//!
//! ## Tier Precedence
//!
//! Prohibited > High-risk > Limited-risk > Minimal-risk. The first tier with a
//! firing trigger wins and lower tiers are never evaluated. An unacceptable
//! use overrides any lower classification regardless of the other answers.
//!
//! ## Components
//!
//! - **Catalog**: the fixed classification questionnaire
//! - **AnswerSet / AnswerValue**: typed answers decoded at the boundary
//! - **YesNo**: tri-state normalization of yes/no answers
//! - **classify**: pure decision table over the answer set
//! - **validate**: optional completeness checks for callers that need them
//! - **store**: codec for persisted answer rows and saved tier records
//!
//! ## Example
//!
//! ```rust
//! use aiact_intake::{classify, keys, AnswerSet, RiskTier};
//!
//! let mut answers = AnswerSet::new();
//! answers.insert(keys::SAFETY_COMPONENT, "yes");
//!
//! let result = classify(&answers);
//! assert_eq!(result.risk_tier, RiskTier::HighRisk);
//! assert_eq!(result.reasons.len(), 1);
//! ```

#![deny(unsafe_code)]

pub mod answers;
pub mod catalog;
pub mod classifier;
pub mod error;
pub mod store;
pub mod validation;

pub use answers::{AnswerSet, AnswerValue, YesNo};
pub use catalog::{
    find_question, keys, AnswerType, ChoiceOption, Question, CLASSIFICATION_QUESTIONS,
    CLASSIFICATION_SECTION,
};
pub use classifier::{
    classify, Classification, RiskTier, TierRule, Trigger, NO_TRIGGERS_REASON, TIER_RULES,
};
pub use error::{IntakeError, Result};
pub use store::{
    answers_from_rows, latest_tier, rows_from_answers, software_row, tier_row, AnswerRow,
    AI_SOFTWARE_KEY, SYSTEM_SECTION, TIER_QUESTION_KEY, TIER_SECTION, UPSERT_CONFLICT_TARGET,
};
pub use validation::{require_complete, validate, AnswerIssue, IssueKind, ValidationReport};
