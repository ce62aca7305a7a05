//! Codec for persisted intake answers.
//!
//! Answers are stored one row per question with the value wrapped as
//! `{ "<question_key>": <value> }`. Older rows hold the bare value, so
//! decoding accepts both shapes.
//!
//! The same table carries two other records: the saved risk tier
//! (`{ "value": "<tier>" }` under [`TIER_SECTION`]) and the AI software
//! named when a system is registered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::answers::{AnswerSet, AnswerValue};
use crate::catalog::{CLASSIFICATION_QUESTIONS, CLASSIFICATION_SECTION};
use crate::classifier::{Classification, RiskTier};

/// Conflict target used when upserting answer rows.
pub const UPSERT_CONFLICT_TARGET: &str = "ai_system_id,section,question_key";

/// Section and key of the saved risk tier record.
pub const TIER_SECTION: &str = "eu_ai_act_classification";
pub const TIER_QUESTION_KEY: &str = "risk_class";

/// Section and key of the registration answer naming the AI software in use.
pub const SYSTEM_SECTION: &str = "system";
pub const AI_SOFTWARE_KEY: &str = "ai_software_used";

/// One stored answer row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnswerRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_system_id: Option<String>,
    pub section: String,
    pub question_key: String,
    #[serde(default)]
    pub answer_json: Value,
    /// Set by the store on insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AnswerRow {
    fn keyed(ai_system_id: &str, section: &str, key: &str, value: Value) -> Self {
        let mut wrapped = serde_json::Map::new();
        wrapped.insert(key.to_string(), value);

        Self {
            ai_system_id: Some(ai_system_id.to_string()),
            section: section.to_string(),
            question_key: key.to_string(),
            answer_json: Value::Object(wrapped),
            created_at: None,
        }
    }

    /// The answer carried by this row, unwrapping the keyed object shape.
    pub fn answer(&self) -> Option<AnswerValue> {
        let raw = match &self.answer_json {
            Value::Object(map) => map.get(&self.question_key).unwrap_or(&self.answer_json),
            other => other,
        };
        AnswerValue::from_json(raw)
    }

    pub fn is_tier_record(&self) -> bool {
        self.section == TIER_SECTION && self.question_key == TIER_QUESTION_KEY
    }

    /// Tier held by a tier record. A missing, blank or unrecognized value
    /// reads as [`RiskTier::Unknown`].
    pub fn tier(&self) -> RiskTier {
        self.answer_json
            .get("value")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }
}

/// Rebuild the classification answer set from stored rows.
///
/// Rows from other sections are ignored. When a key appears twice the later
/// row wins.
pub fn answers_from_rows<'a, I>(rows: I) -> AnswerSet
where
    I: IntoIterator<Item = &'a AnswerRow>,
{
    let mut answers = AnswerSet::new();
    for row in rows {
        if row.section != CLASSIFICATION_SECTION {
            continue;
        }
        match row.answer() {
            Some(value) => answers.insert(row.question_key.clone(), value),
            None => {
                answers.remove(&row.question_key);
            }
        }
    }
    answers
}

/// One row per catalog question, in catalog order, ready for upsert.
/// Unanswered questions are written as `null`.
pub fn rows_from_answers(ai_system_id: &str, answers: &AnswerSet) -> Vec<AnswerRow> {
    CLASSIFICATION_QUESTIONS
        .iter()
        .map(|q| {
            let value = answers.get(q.key).map_or(Value::Null, AnswerValue::to_json);
            AnswerRow::keyed(ai_system_id, CLASSIFICATION_SECTION, q.key, value)
        })
        .collect()
}

/// Tier record for a computed classification. Records are appended, never
/// upserted, so the table keeps the tier history.
pub fn tier_row(ai_system_id: &str, classification: &Classification) -> AnswerRow {
    AnswerRow {
        ai_system_id: Some(ai_system_id.to_string()),
        section: TIER_SECTION.to_string(),
        question_key: TIER_QUESTION_KEY.to_string(),
        answer_json: serde_json::json!({ "value": classification.risk_tier.as_str() }),
        created_at: None,
    }
}

/// Tier of the newest tier record among `rows`, or [`RiskTier::Unknown`]
/// when there is none. Rows without a timestamp count as oldest; on equal
/// timestamps the later row wins.
pub fn latest_tier<'a, I>(rows: I) -> RiskTier
where
    I: IntoIterator<Item = &'a AnswerRow>,
{
    let mut latest: Option<&AnswerRow> = None;
    for row in rows.into_iter().filter(|row| row.is_tier_record()) {
        if latest.map_or(true, |best| row.created_at >= best.created_at) {
            latest = Some(row);
        }
    }
    latest.map_or(RiskTier::Unknown, AnswerRow::tier)
}

/// Registration answer naming the AI software a system uses.
pub fn software_row(ai_system_id: &str, software: &str) -> AnswerRow {
    AnswerRow::keyed(
        ai_system_id,
        SYSTEM_SECTION,
        AI_SOFTWARE_KEY,
        Value::String(software.to_string()),
    )
}
