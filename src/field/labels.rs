use crate::field::oracle::SelectOption;
use serde_json::Value;

/// Label of the option whose value matches exactly, or the raw value.
pub fn option_label(options: &[SelectOption], value: &Value) -> String {
    if let Value::String(raw) = value {
        return options
            .iter()
            .find(|option| option.value == *raw)
            .map(|option| option.label.clone())
            .unwrap_or_else(|| raw.clone());
    }
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Display text for a committed single or multi-valued selection.
pub fn option_labels(options: &[SelectOption], values: &Value) -> String {
    match values {
        Value::Array(items) => items
            .iter()
            .map(|item| option_label(options, item))
            .collect::<Vec<_>>()
            .join(", "),
        single => option_label(options, single),
    }
}

#[cfg(test)]
mod tests {
    use super::{option_label, option_labels};
    use crate::field::oracle::SelectOption;
    use serde_json::json;

    fn options() -> Vec<SelectOption> {
        vec![SelectOption::new("A", "Alpha"), SelectOption::new("B", "Beta")]
    }

    #[test]
    fn unmatched_values_fall_back_to_raw() {
        assert_eq!(option_labels(&options(), &json!(["A", "C"])), "Alpha, C");
    }

    #[test]
    fn single_value_maps_to_label() {
        assert_eq!(option_labels(&options(), &json!("B")), "Beta");
        assert_eq!(option_label(&options(), &json!("Z")), "Z");
    }

    #[test]
    fn non_string_values_are_never_matched() {
        let numeric = vec![SelectOption::new("1", "One")];
        assert_eq!(option_label(&numeric, &json!(1)), "1");
        assert_eq!(option_labels(&numeric, &json!([])), "");
        assert_eq!(option_label(&numeric, &json!(null)), "");
    }
}
