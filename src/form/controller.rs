use crate::core::ValuePath;
use crate::field::{FieldClassifier, FieldDescriptor, LabelResolver, TreeBuilder, option_labels};
use crate::form::accumulator::EditAccumulator;
use crate::form::field::{FieldSpec, MetadataField};
use crate::runtime::{Scheduler, SchedulerCommand};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

/// Delay before a date edit that produced no valid date is flagged.
pub const DATE_CHECK_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// Emitted after every committed leaf write, carrying all pending edits.
    UpdatedFields(EditAccumulator),
    /// A date field did not settle on a valid date.
    DateInvalid { path: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    Committed,
    /// No valid date yet; a deferred check is pending.
    DatePending,
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    UnknownField,
    NotEditable,
    NotALeaf,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DateCheck {
    field: String,
    path: ValuePath,
}

/// Owns the fields of one editing form and the accumulator they write to.
pub struct FormController {
    labels: Box<dyn LabelResolver>,
    classifier: Box<dyn FieldClassifier>,
    fields: IndexMap<String, MetadataField>,
    updated: EditAccumulator,
    scheduler: Scheduler<DateCheck, DateCheck>,
    events: VecDeque<FormEvent>,
}

impl FormController {
    pub fn new(labels: impl LabelResolver + 'static, classifier: impl FieldClassifier + 'static) -> Self {
        Self {
            labels: Box::new(labels),
            classifier: Box::new(classifier),
            fields: IndexMap::new(),
            updated: EditAccumulator::new(),
            scheduler: Scheduler::new(),
            events: VecDeque::new(),
        }
    }

    fn builder(&self) -> TreeBuilder<'_> {
        TreeBuilder::new(&*self.labels, &*self.classifier)
    }

    /// Adds a field, replacing any field with the same code.
    pub fn add_field(&mut self, spec: FieldSpec) -> &MetadataField {
        let field = MetadataField::new(spec, &self.builder());
        let code = field.code().to_string();
        if self.fields.contains_key(&code) {
            debug!(%code, "replacing field");
        }
        self.fields.insert(code.clone(), field);
        &self.fields[&code]
    }

    pub fn field(&self, code: &str) -> Option<&MetadataField> {
        self.fields.get(code)
    }

    pub fn fields(&self) -> impl Iterator<Item = &MetadataField> {
        self.fields.values()
    }

    pub fn updated_fields(&self) -> &EditAccumulator {
        &self.updated
    }

    pub fn descriptor(&self, path: &str) -> Option<&FieldDescriptor> {
        let path = ValuePath::parse(path).ok()?;
        self.fields.values().find_map(|field| field.tree().find(&path))
    }

    pub fn begin_edit(&mut self) {
        for field in self.fields.values_mut() {
            field.begin_edit();
        }
    }

    /// Leaves edit mode and hands the pending edits to the caller.
    pub fn save(&mut self) -> EditAccumulator {
        for field in self.fields.values_mut() {
            field.commit();
        }
        self.updated.take()
    }

    /// Reverts every field to its pre-edit value and drops pending edits.
    pub fn cancel(&mut self) {
        let builder = TreeBuilder::new(&*self.labels, &*self.classifier);
        for (code, field) in self.fields.iter_mut() {
            field.cancel(&builder);
            self.scheduler.cancel_matching(|check| &check.field == code);
        }
        self.updated = EditAccumulator::new();
    }

    /// Presents a new value for a field; its tree is rebuilt from scratch.
    pub fn replace_value(&mut self, code: &str, value: Value) -> bool {
        let builder = TreeBuilder::new(&*self.labels, &*self.classifier);
        let Some(field) = self.fields.get_mut(code) else {
            return false;
        };
        field.replace_value(value, &builder);
        self.scheduler.cancel_matching(|check| check.field == code);
        true
    }

    /// Applies a user edit to the leaf at `path`.
    pub fn set_value(&mut self, path: &str, value: Value, now: Instant) -> ChangeOutcome {
        let Ok(path) = ValuePath::parse(path) else {
            return ChangeOutcome::Ignored(IgnoreReason::UnknownField);
        };
        let Some((code, field)) = self
            .fields
            .iter_mut()
            .find(|(_, field)| field.tree().find(&path).is_some())
        else {
            return ChangeOutcome::Ignored(IgnoreReason::UnknownField);
        };
        if !field.is_editable() {
            return ChangeOutcome::Ignored(IgnoreReason::NotEditable);
        }
        let Some(leaf) = field.tree_mut().find_mut(&path) else {
            return ChangeOutcome::Ignored(IgnoreReason::UnknownField);
        };
        if !leaf.is_leaf() {
            return ChangeOutcome::Ignored(IgnoreReason::NotALeaf);
        }

        let key = DateCheck {
            field: code.clone(),
            path,
        };
        match leaf.accept_edit(value) {
            Some(committed) => {
                self.updated.record(&key.path, committed);
                debug!(path = %key.path, pending = self.updated.len(), "field updated");
                self.scheduler.schedule(SchedulerCommand::Cancel { key }, now);
                self.events
                    .push_back(FormEvent::UpdatedFields(self.updated.clone()));
                ChangeOutcome::Committed
            }
            None => {
                self.scheduler.schedule(
                    SchedulerCommand::Debounce {
                        key: key.clone(),
                        delay: DATE_CHECK_DELAY,
                        event: key,
                    },
                    now,
                );
                ChangeOutcome::DatePending
            }
        }
    }

    /// Runs deferred date checks that are due at `now`.
    pub fn tick(&mut self, now: Instant) {
        for check in self.scheduler.drain_ready(now) {
            let Some(leaf) = self
                .fields
                .get_mut(&check.field)
                .and_then(|field| field.tree_mut().find_mut(&check.path))
            else {
                continue;
            };
            if leaf.verify_date() {
                debug!(path = %check.path, "date field left without a valid date");
                self.events.push_back(FormEvent::DateInvalid {
                    path: check.path.to_string(),
                });
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_due()
    }

    pub fn drain_events(&mut self) -> Vec<FormEvent> {
        self.events.drain(..).collect()
    }

    /// Display labels for values of the select field at `path`.
    pub fn labels_for(&self, path: &str, values: &Value) -> Option<String> {
        self.descriptor(path)
            .map(|leaf| option_labels(&leaf.options, values))
    }
}
