use crate::core::{EditValue, ValuePath};
use crate::field::dates::parse_date;
use crate::field::display::{DisplayMode, resolve_display_mode};
use crate::field::kind::FieldKind;
use crate::field::labels::option_labels;
use crate::field::oracle::{FieldClassifier, LabelResolver, SelectOption};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// One editable leaf or structural node of a rendered field tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub display_label: String,
    /// Dotted key without indexes, used for labels and classification.
    pub label_key: String,
    /// Unique within a tree; doubles as the edit-accumulator key.
    pub path: ValuePath,
    pub value: Value,
    pub kind: FieldKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_mode: Option<DisplayMode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FieldDescriptor>,
    /// Index of the array element this field was flattened out of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub date_error: bool,
}

impl FieldDescriptor {
    pub fn is_leaf(&self) -> bool {
        self.display_mode.is_some()
    }

    pub fn is_composite(&self) -> bool {
        self.composite.is_some()
    }

    pub fn find(&self, path: &ValuePath) -> Option<&FieldDescriptor> {
        if self.path == *path {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(path))
    }

    pub fn find_mut(&mut self, path: &ValuePath) -> Option<&mut FieldDescriptor> {
        if self.path == *path {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(path))
    }

    /// Leaves in display order.
    pub fn leaves(&self) -> Vec<&FieldDescriptor> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a FieldDescriptor>) {
        if self.is_leaf() {
            out.push(self);
        }
        for child in &self.children {
            child.collect_leaves(out);
        }
    }

    /// Read-only text shown outside of edit mode.
    pub fn display_text(&self) -> String {
        match self.display_mode {
            Some(DisplayMode::Date) => self
                .date
                .map(|date| date.format("%d/%m/%Y").to_string())
                .unwrap_or_default(),
            Some(DisplayMode::DropDown | DisplayMode::MultiSelect) => {
                option_labels(&self.options, &self.value)
            }
            Some(DisplayMode::Chips) => match &self.value {
                Value::Array(items) => items.iter().map(plain_text).collect::<Vec<_>>().join(", "),
                other => plain_text(other),
            },
            Some(DisplayMode::SwitchButton) => match &self.value {
                Value::Bool(true) => "Oui".to_string(),
                Value::Bool(false) => "Non".to_string(),
                other => plain_text(other),
            },
            _ => plain_text(&self.value),
        }
    }

    /// Takes a user edit on this leaf and returns what should be committed,
    /// or `None` when a date field has no valid date to commit.
    ///
    /// A date edit replaces the raw text and unbinds the previous date, so a
    /// stale date is never written for invalid input.
    pub fn accept_edit(&mut self, value: Value) -> Option<EditValue> {
        self.value = value;
        if self.display_mode != Some(DisplayMode::Date) {
            return Some(EditValue::Json(self.value.clone()));
        }

        self.date = parse_date(&self.value);
        let date = self.date?;
        self.date_error = false;
        Some(EditValue::Date(date))
    }

    /// Deferred check after a date edit. Raises the error flag when the date
    /// is still unset and re-parses the raw value as a best effort.
    pub fn verify_date(&mut self) -> bool {
        if self.display_mode != Some(DisplayMode::Date) || self.date.is_some() {
            return false;
        }
        self.date_error = true;
        self.date = parse_date(&self.value);
        true
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn join_label_key(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{parent}.{field}")
    }
}

/// Builds descriptor trees. Only the root's own children are expanded; any
/// structured value below them stays an unexpanded node.
pub struct TreeBuilder<'a> {
    labels: &'a dyn LabelResolver,
    classifier: &'a dyn FieldClassifier,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(labels: &'a dyn LabelResolver, classifier: &'a dyn FieldClassifier) -> Self {
        Self { labels, classifier }
    }

    pub fn label(&self, label_key: &str) -> String {
        self.labels.resolve_label(label_key)
    }

    pub fn build(
        &self,
        display_label: impl Into<String>,
        label_key: &str,
        path: &ValuePath,
        value: &Value,
    ) -> FieldDescriptor {
        let mut root = self.node(display_label.into(), label_key, path.clone(), value, None);
        root.children = match (&root.kind, value) {
            (FieldKind::Array, Value::Array(items)) => self.array_children(label_key, &root, items),
            (FieldKind::Object, Value::Object(map)) => map
                .iter()
                .map(|(field, child)| self.keyed_child(label_key, path, field, child, None))
                .collect(),
            _ => Vec::new(),
        };
        debug!(
            path = %root.path,
            kind = ?root.kind,
            children = root.children.len(),
            "built field tree"
        );
        root
    }

    fn array_children(
        &self,
        label_key: &str,
        parent: &FieldDescriptor,
        items: &[Value],
    ) -> Vec<FieldDescriptor> {
        let mut out = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let item_path = parent.path.child_index(index);
            match item {
                Value::Object(map) => out.extend(
                    map.iter()
                        .map(|(field, child)| self.keyed_child(label_key, &item_path, field, child, Some(index))),
                ),
                _ => out.push(self.node(
                    parent.display_label.clone(),
                    label_key,
                    item_path,
                    item,
                    None,
                )),
            }
        }
        out
    }

    fn keyed_child(
        &self,
        parent_label_key: &str,
        parent_path: &ValuePath,
        field: &str,
        value: &Value,
        composite: Option<usize>,
    ) -> FieldDescriptor {
        let label_key = join_label_key(parent_label_key, field);
        let display_label = self.labels.resolve_label(&label_key);
        self.node(display_label, &label_key, parent_path.child_key(field), value, composite)
    }

    fn node(
        &self,
        display_label: String,
        label_key: &str,
        path: ValuePath,
        value: &Value,
        composite: Option<usize>,
    ) -> FieldDescriptor {
        let resolution = resolve_display_mode(label_key, value, self.classifier);
        FieldDescriptor {
            display_label,
            label_key: label_key.to_string(),
            path,
            value: value.clone(),
            kind: resolution.kind,
            display_mode: resolution.mode,
            options: resolution.options,
            children: Vec::new(),
            composite,
            date: resolution.date,
            date_error: false,
        }
    }
}
