use serde::Serialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    Array,
    Object,
    Scalar,
}

impl FieldKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
            _ => Self::Scalar,
        }
    }

    pub fn is_structural(self) -> bool {
        !matches!(self, Self::Scalar)
    }
}

/// Pre-edit copy of a field value, restored on cancel.
///
/// Objects are kept in serialized form so the live value can be edited
/// freely without touching the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Serialized(String),
    Value(Value),
}

impl Snapshot {
    pub fn capture(value: &Value) -> Self {
        if FieldKind::of(value) == FieldKind::Object {
            match serde_json::to_string(value) {
                Ok(serialized) => return Self::Serialized(serialized),
                Err(err) => warn!(error = %err, "object snapshot could not be serialized"),
            }
        }
        Self::Value(value.clone())
    }

    /// Returns the snapshotted value, or `None` when a serialized snapshot
    /// no longer deserializes.
    pub fn restore(&self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value.clone()),
            Self::Serialized(serialized) => match serde_json::from_str(serialized) {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!(error = %err, "object snapshot could not be restored");
                    None
                }
            },
        }
    }
}
