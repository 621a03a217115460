use crate::field::dates::{is_date_label, parse_date};
use crate::field::kind::FieldKind;
use crate::field::oracle::{FieldClassifier, SelectOption};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayMode {
    Date,
    TextArea,
    DropDown,
    SwitchButton,
    MultiSelect,
    Chips,
    TextInput,
}

impl DisplayMode {
    pub fn has_options(self) -> bool {
        matches!(self, Self::DropDown | Self::MultiSelect)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub kind: FieldKind,
    pub mode: Option<DisplayMode>,
    pub options: Vec<SelectOption>,
    pub date: Option<DateTime<Utc>>,
}

impl Resolution {
    fn leaf(mode: DisplayMode) -> Self {
        Self {
            kind: FieldKind::Scalar,
            mode: Some(mode),
            options: Vec::new(),
            date: None,
        }
    }

    fn with_options(mode: DisplayMode, label_key: &str, options: Vec<SelectOption>) -> Self {
        if options.is_empty() {
            warn!(label_key, ?mode, "select field has no options, using a text input");
            return Self::leaf(DisplayMode::TextInput);
        }
        Self {
            options,
            ..Self::leaf(mode)
        }
    }
}

/// Resolves the widget for a field; first match wins.
pub fn resolve_display_mode(
    label_key: &str,
    value: &Value,
    classifier: &dyn FieldClassifier,
) -> Resolution {
    let kind = FieldKind::of(value);
    if kind.is_structural() {
        return resolve_structural(kind, label_key, classifier);
    }

    if is_date_label(label_key) {
        return Resolution {
            date: parse_date(value),
            ..Resolution::leaf(DisplayMode::Date)
        };
    }

    if classifier.is_long_text(label_key) {
        Resolution::leaf(DisplayMode::TextArea)
    } else if classifier.is_single_select(label_key) {
        Resolution::with_options(DisplayMode::DropDown, label_key, classifier.options_for(label_key))
    } else if classifier.is_toggle(label_key) {
        Resolution::leaf(DisplayMode::SwitchButton)
    } else if classifier.is_multi_select(label_key) {
        Resolution::with_options(DisplayMode::MultiSelect, label_key, classifier.options_for(label_key))
    } else if classifier.is_chips(label_key) {
        Resolution::leaf(DisplayMode::Chips)
    } else {
        Resolution::leaf(DisplayMode::TextInput)
    }
}

// Multi-value widgets own list-shaped values, so a structured value bound to
// one of them is edited as a single opaque leaf.
fn resolve_structural(kind: FieldKind, label_key: &str, classifier: &dyn FieldClassifier) -> Resolution {
    if classifier.is_multi_select(label_key) {
        return Resolution::with_options(
            DisplayMode::MultiSelect,
            label_key,
            classifier.options_for(label_key),
        );
    }
    if classifier.is_chips(label_key) {
        return Resolution::leaf(DisplayMode::Chips);
    }
    Resolution {
        kind,
        mode: None,
        options: Vec::new(),
        date: None,
    }
}
