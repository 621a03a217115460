use crate::core::value_path::ensure_value_path_mut;
use crate::core::{EditValue, ValuePath};
use crate::error::PathError;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Pending edits keyed by field path, in first-write order.
///
/// One leaf owns each key; writes overwrite that key only and entries are
/// never removed on behalf of another leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EditAccumulator {
    entries: IndexMap<String, EditValue>,
}

impl EditAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: &ValuePath, value: EditValue) {
        self.entries.insert(path.to_string(), value);
    }

    pub fn get(&self, path: &str) -> Option<&EditValue> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EditValue)> {
        self.entries.iter().map(|(path, value)| (path.as_str(), value))
    }

    /// Hands the edits over to the owner that saves them.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Merges another accumulator key by key; entries of `other` win.
    pub fn merge(&mut self, other: &EditAccumulator) {
        for (path, value) in &other.entries {
            self.entries.insert(path.clone(), value.clone());
        }
    }

    /// Writes every entry into `document`, creating intermediate containers.
    pub fn apply_to(&self, document: &mut Value) -> Result<(), PathError> {
        for (path, value) in &self.entries {
            let parsed = ValuePath::parse(path)?;
            *ensure_value_path_mut(document, &parsed) = value.to_json();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::EditAccumulator;
    use crate::core::{EditValue, ValuePath};
    use chrono::NaiveDate;
    use serde_json::json;

    fn path(raw: &str) -> ValuePath {
        ValuePath::parse(raw).expect("path")
    }

    #[test]
    fn record_overwrites_per_key_only() {
        let mut acc = EditAccumulator::new();
        acc.record(&path("Title"), EditValue::Json(json!("a")));
        acc.record(&path("Tags[0]"), EditValue::Json(json!(1)));
        acc.record(&path("Title"), EditValue::Json(json!("b")));

        assert_eq!(acc.len(), 2);
        assert_eq!(acc.get("Title"), Some(&EditValue::Json(json!("b"))));
        assert!(acc.contains("Tags[0]"));
        let keys = acc.iter().map(|(k, _)| k.to_string()).collect::<Vec<_>>();
        assert_eq!(keys, vec!["Title", "Tags[0]"]);
    }

    #[test]
    fn apply_writes_nested_paths_and_dates() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 15)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("date")
            .and_utc();
        let mut acc = EditAccumulator::new();
        acc.record(&path("Metadata.Title"), EditValue::Json(json!("New")));
        acc.record(&path("Events[1].Date"), EditValue::Date(date));

        let mut doc = json!({"Metadata": {"Title": "Old", "Keep": 1}, "Events": [{"Date": "x"}, {}]});
        acc.apply_to(&mut doc).expect("apply");
        assert_eq!(
            doc,
            json!({
                "Metadata": {"Title": "New", "Keep": 1},
                "Events": [{"Date": "x"}, {"Date": "2020-01-15T00:00:00.000Z"}]
            })
        );
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut acc = EditAccumulator::new();
        acc.record(&path("Status"), EditValue::Json(json!(true)));
        let encoded = serde_json::to_value(&acc).expect("serialize");
        assert_eq!(encoded, json!({"Status": true}));
    }

    #[test]
    fn take_leaves_accumulator_empty() {
        let mut acc = EditAccumulator::new();
        acc.record(&path("A"), EditValue::Json(json!(1)));
        let mut other = EditAccumulator::new();
        other.record(&path("B"), EditValue::Json(json!(2)));
        acc.merge(&other);

        let taken = acc.take();
        assert_eq!(taken.len(), 2);
        assert!(acc.is_empty());
    }
}
