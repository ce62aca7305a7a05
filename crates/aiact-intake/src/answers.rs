//! Answer values and yes/no normalization.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// A single answer as collected by the questionnaire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

impl AnswerValue {
    /// Decode a raw JSON answer.
    ///
    /// `null`, objects and arrays holding anything other than strings decode
    /// to `None` and are treated as unanswered.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match value {
            Value::Bool(b) => Some(AnswerValue::Bool(*b)),
            Value::String(s) => Some(AnswerValue::Text(s.clone())),
            Value::Number(n) => Some(AnswerValue::Text(n.to_string())),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_owned))
                .collect::<Option<Vec<_>>>()
                .map(AnswerValue::List),
            Value::Null | Value::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            AnswerValue::Bool(b) => serde_json::Value::Bool(*b),
            AnswerValue::Text(s) => serde_json::Value::String(s.clone()),
            AnswerValue::List(items) => items.iter().cloned().map(serde_json::Value::String).collect(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            AnswerValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Blank text and empty lists carry no answer.
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Bool(_) => false,
            AnswerValue::Text(s) => s.trim().is_empty(),
            AnswerValue::List(items) => items.is_empty(),
        }
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Bool(value)
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_owned())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(value: Vec<String>) -> Self {
        AnswerValue::List(value)
    }
}

impl From<&[&str]> for AnswerValue {
    fn from(value: &[&str]) -> Self {
        AnswerValue::List(value.iter().map(|s| (*s).to_owned()).collect())
    }
}

/// Tri-state normalization of a yes/no answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YesNo {
    Yes,
    No,
    /// Absent, or a value that is neither yes nor no
    Indeterminate,
}

impl YesNo {
    /// Accepts booleans and the case-sensitive strings "yes", "no", "true"
    /// and "false". Everything else is indeterminate.
    pub fn normalize(value: Option<&AnswerValue>) -> Self {
        match value {
            Some(AnswerValue::Bool(true)) => YesNo::Yes,
            Some(AnswerValue::Bool(false)) => YesNo::No,
            Some(AnswerValue::Text(s)) => match s.as_str() {
                "yes" | "true" => YesNo::Yes,
                "no" | "false" => YesNo::No,
                _ => YesNo::Indeterminate,
            },
            _ => YesNo::Indeterminate,
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, YesNo::Yes)
    }

    pub fn is_determinate(&self) -> bool {
        !matches!(self, YesNo::Indeterminate)
    }
}

/// A full set of questionnaire answers keyed by question key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<String, AnswerValue>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AnswerValue>) {
        self.answers.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<AnswerValue> {
        self.answers.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.answers.get(key)
    }

    /// Normalized yes/no reading of an answer.
    pub fn yes_no(&self, key: &str) -> YesNo {
        YesNo::normalize(self.get(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.answers.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Build an answer set from a JSON object, skipping entries that do not
    /// decode to an [`AnswerValue`].
    pub fn from_json_map(map: &serde_json::Map<String, serde_json::Value>) -> Self {
        let mut set = AnswerSet::new();
        for (key, raw) in map {
            match AnswerValue::from_json(raw) {
                Some(value) => set.insert(key.clone(), value),
                None => debug!(key = %key, "ignoring answer with no usable value"),
            }
        }
        set
    }
}

impl<'de> Deserialize<'de> for AnswerSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(AnswerSet::from_json_map(&map))
    }
}

impl<K, V> FromIterator<(K, V)> for AnswerSet
where
    K: Into<String>,
    V: Into<AnswerValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = AnswerSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}
