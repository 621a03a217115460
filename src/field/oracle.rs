use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Maps a dotted label key to a human-readable label.
pub trait LabelResolver {
    fn resolve_label(&self, label_key: &str) -> String;
}

impl<F> LabelResolver for F
where
    F: Fn(&str) -> String,
{
    fn resolve_label(&self, label_key: &str) -> String {
        self(label_key)
    }
}

/// Decides which widget a field renders with.
///
/// Every question defaults to "no opinion", which resolves to a plain
/// text input.
pub trait FieldClassifier {
    fn is_long_text(&self, _label_key: &str) -> bool {
        false
    }

    fn is_single_select(&self, _label_key: &str) -> bool {
        false
    }

    fn is_toggle(&self, _label_key: &str) -> bool {
        false
    }

    fn is_multi_select(&self, _label_key: &str) -> bool {
        false
    }

    fn is_chips(&self, _label_key: &str) -> bool {
        false
    }

    fn options_for(&self, _label_key: &str) -> Vec<SelectOption> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoClassification;

impl FieldClassifier for NoClassification {}
