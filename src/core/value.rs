use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

/// A value committed into the edit accumulator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EditValue {
    Date(DateTime<Utc>),
    Json(Value),
}

impl EditValue {
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(date) => Some(*date),
            Self::Json(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Date(date) => Value::String(date.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Json(value) => value.clone(),
        }
    }
}

impl From<Value> for EditValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<DateTime<Utc>> for EditValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}
