//! Field catalog loaded from YAML: labels and widget classification for
//! metadata fields, keyed by glob patterns over dotted label keys.

use crate::error::CatalogError;
use crate::field::{FieldClassifier, LabelResolver, SelectOption};
use globset::{Glob, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CatalogFile {
    labels: IndexMap<String, String>,
    long_text: Vec<String>,
    single_select: IndexMap<String, Vec<SelectOption>>,
    toggle: Vec<String>,
    multi_select: IndexMap<String, Vec<SelectOption>>,
    chips: Vec<String>,
}

#[derive(Debug, Clone)]
struct PatternOptions {
    set: GlobSet,
    options: Vec<Vec<SelectOption>>,
}

impl PatternOptions {
    fn build(entries: IndexMap<String, Vec<SelectOption>>) -> Result<Self, CatalogError> {
        let patterns = entries.keys().cloned().collect::<Vec<_>>();
        Ok(Self {
            set: build_set(&patterns)?,
            options: entries.into_values().collect(),
        })
    }

    fn matches(&self, label_key: &str) -> bool {
        self.set.is_match(label_key)
    }

    fn first(&self, label_key: &str) -> Option<&[SelectOption]> {
        let idx = self.set.matches(label_key).into_iter().min()?;
        self.options.get(idx).map(Vec::as_slice)
    }
}

#[derive(Debug, Clone)]
pub struct FieldCatalog {
    labels: IndexMap<String, String>,
    long_text: GlobSet,
    single_select: PatternOptions,
    toggle: GlobSet,
    multi_select: PatternOptions,
    chips: GlobSet,
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self {
            labels: IndexMap::new(),
            long_text: GlobSet::empty(),
            single_select: PatternOptions {
                set: GlobSet::empty(),
                options: Vec::new(),
            },
            toggle: GlobSet::empty(),
            multi_select: PatternOptions {
                set: GlobSet::empty(),
                options: Vec::new(),
            },
            chips: GlobSet::empty(),
        }
    }
}

impl FieldCatalog {
    pub fn from_yaml_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(raw)?;
        Self::from_file(file)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml_str(&raw)?;
        debug!(path = %path.display(), labels = catalog.labels.len(), "field catalog loaded");
        Ok(catalog)
    }

    fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        Ok(Self {
            labels: file.labels,
            long_text: build_set(&file.long_text)?,
            single_select: PatternOptions::build(file.single_select)?,
            toggle: build_set(&file.toggle)?,
            multi_select: PatternOptions::build(file.multi_select)?,
            chips: build_set(&file.chips)?,
        })
    }
}

fn build_set(patterns: &[String]) -> Result<GlobSet, CatalogError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| CatalogError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| CatalogError::Pattern {
        pattern: patterns.join(", "),
        source,
    })
}

impl LabelResolver for FieldCatalog {
    /// Exact key first, then the last segment, then the key itself.
    fn resolve_label(&self, label_key: &str) -> String {
        if let Some(label) = self.labels.get(label_key) {
            return label.clone();
        }
        let last = label_key.rsplit('.').next().unwrap_or(label_key);
        self.labels
            .get(last)
            .cloned()
            .unwrap_or_else(|| label_key.to_string())
    }
}

impl FieldClassifier for FieldCatalog {
    fn is_long_text(&self, label_key: &str) -> bool {
        self.long_text.is_match(label_key)
    }

    fn is_single_select(&self, label_key: &str) -> bool {
        self.single_select.matches(label_key)
    }

    fn is_toggle(&self, label_key: &str) -> bool {
        self.toggle.is_match(label_key)
    }

    fn is_multi_select(&self, label_key: &str) -> bool {
        self.multi_select.matches(label_key)
    }

    fn is_chips(&self, label_key: &str) -> bool {
        self.chips.is_match(label_key)
    }

    fn options_for(&self, label_key: &str) -> Vec<SelectOption> {
        self.single_select
            .first(label_key)
            .or_else(|| self.multi_select.first(label_key))
            .map(<[SelectOption]>::to_vec)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::FieldCatalog;
    use crate::error::CatalogError;
    use crate::field::{
        DisplayMode, FieldClassifier, LabelResolver, SelectOption, TreeBuilder,
    };
    use crate::core::ValuePath;
    use serde_json::json;

    const CATALOG: &str = r#"
labels:
  Title: Intitulé
  Metadata.Description: Description du fonds
long_text:
  - "*.Description"
single_select:
  "*.DescriptionLevel":
    - { value: Item, label: Pièce }
    - { value: File, label: Dossier }
toggle:
  - "*.Status"
multi_select:
  "*.Permissions":
    - { value: READ, label: Lecture }
chips:
  - "*.Tags"
"#;

    fn catalog() -> FieldCatalog {
        FieldCatalog::from_yaml_str(CATALOG).expect("catalog should parse")
    }

    #[test]
    fn labels_fall_back_to_last_segment_then_key() {
        let catalog = catalog();
        assert_eq!(catalog.resolve_label("Metadata.Description"), "Description du fonds");
        assert_eq!(catalog.resolve_label("Metadata.Title"), "Intitulé");
        assert_eq!(catalog.resolve_label("Metadata.Unknown"), "Metadata.Unknown");
    }

    #[test]
    fn patterns_classify_label_keys() {
        let catalog = catalog();
        assert!(catalog.is_long_text("Metadata.Description"));
        assert!(catalog.is_single_select("Metadata.DescriptionLevel"));
        assert!(catalog.is_toggle("Contract.Status"));
        assert!(catalog.is_multi_select("Context.Permissions"));
        assert!(catalog.is_chips("Metadata.Tags"));
        assert!(!catalog.is_chips("Tags"));
        assert_eq!(
            catalog.options_for("Metadata.DescriptionLevel"),
            vec![SelectOption::new("Item", "Pièce"), SelectOption::new("File", "Dossier")]
        );
        assert!(catalog.options_for("Metadata.Title").is_empty());
    }

    #[test]
    fn drives_tree_building() {
        let catalog = catalog();
        let builder = TreeBuilder::new(&catalog, &catalog);
        let tree = builder.build(
            "Métadonnées",
            "Metadata",
            &ValuePath::from_code("Metadata"),
            &json!({
                "Title": "Report",
                "Description": "Long text",
                "DescriptionLevel": "Item",
                "Tags": ["a", "b"]
            }),
        );
        let modes = tree
            .children
            .iter()
            .map(|child| child.display_mode)
            .collect::<Vec<_>>();
        assert_eq!(
            modes,
            vec![
                Some(DisplayMode::TextInput),
                Some(DisplayMode::TextArea),
                Some(DisplayMode::DropDown),
                Some(DisplayMode::Chips),
            ]
        );
        assert_eq!(tree.children[0].display_label, "Intitulé");
        assert_eq!(tree.children[2].display_text(), "Pièce");
    }

    #[test]
    fn empty_document_is_an_empty_catalog() {
        let catalog = FieldCatalog::from_yaml_str("{}").expect("empty catalog");
        assert!(!catalog.is_long_text("Anything"));
        assert_eq!(catalog.resolve_label("A.B"), "A.B");
        assert!(!FieldCatalog::default().is_toggle("A"));
    }

    #[test]
    fn rejects_bad_patterns_and_unknown_sections() {
        let err = FieldCatalog::from_yaml_str("long_text: [\"a[\"]").expect_err("bad glob");
        assert!(matches!(err, CatalogError::Pattern { .. }));

        let err = FieldCatalog::from_yaml_str("colors: []").expect_err("unknown key");
        assert!(matches!(err, CatalogError::Yaml(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = FieldCatalog::load("/nonexistent/catalog.yaml").expect_err("missing");
        assert!(err.to_string().contains("/nonexistent/catalog.yaml"));
    }
}
