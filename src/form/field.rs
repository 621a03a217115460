use crate::core::ValuePath;
use crate::field::{FieldDescriptor, Snapshot, TreeBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

const GRID_COLUMNS: u8 = 12;
const DEFAULT_LABEL_SPAN: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EditState {
    Viewing,
    Editing,
}

/// Column spans of the label and the input on a 12-column grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridLayout {
    pub label_span: Option<u8>,
    pub input_span: u8,
}

impl GridLayout {
    pub fn resolve(label_size: Option<u8>, no_title: bool) -> Self {
        if no_title {
            return Self {
                label_span: None,
                input_span: GRID_COLUMNS,
            };
        }
        let label = label_size
            .filter(|size| (1..GRID_COLUMNS).contains(size))
            .unwrap_or(DEFAULT_LABEL_SPAN);
        Self {
            label_span: Some(label),
            input_span: GRID_COLUMNS - label,
        }
    }
}

/// Inputs for one rendered metadata field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    label_key: String,
    value: Value,
    title: Option<String>,
    code: Option<String>,
    label_size: Option<u8>,
    no_title: bool,
    can_update: bool,
    disabled: bool,
    collapse: bool,
}

impl FieldSpec {
    pub fn new(label_key: impl Into<String>, value: Value) -> Self {
        Self {
            label_key: label_key.into(),
            value,
            title: None,
            code: None,
            label_size: None,
            no_title: false,
            can_update: true,
            disabled: false,
            collapse: true,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Patch path of the field; defaults to the label key.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_label_size(mut self, size: u8) -> Self {
        self.label_size = Some(size);
        self
    }

    pub fn without_title(mut self) -> Self {
        self.no_title = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.can_update = false;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn expanded(mut self) -> Self {
        self.collapse = false;
        self
    }
}

/// One metadata field with its descriptor tree and edit lifecycle.
///
/// The tree is built from a value snapshot and rebuilt only when that
/// snapshot is restored or replaced.
#[derive(Debug, Clone)]
pub struct MetadataField {
    title: String,
    label_key: String,
    code: ValuePath,
    snapshot: Snapshot,
    tree: FieldDescriptor,
    state: EditState,
    layout: GridLayout,
    can_update: bool,
    disabled: bool,
    collapse: bool,
}

impl MetadataField {
    pub fn new(spec: FieldSpec, builder: &TreeBuilder<'_>) -> Self {
        let title = spec
            .title
            .unwrap_or_else(|| builder.label(spec.label_key.as_str()));
        let code = ValuePath::from_code(spec.code.as_deref().unwrap_or(spec.label_key.as_str()));
        let snapshot = Snapshot::capture(&spec.value);
        let tree = builder.build(title.clone(), &spec.label_key, &code, &spec.value);
        Self {
            title,
            label_key: spec.label_key,
            code,
            snapshot,
            tree,
            state: EditState::Viewing,
            layout: GridLayout::resolve(spec.label_size, spec.no_title),
            can_update: spec.can_update,
            disabled: spec.disabled,
            collapse: spec.collapse,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn label_key(&self) -> &str {
        &self.label_key
    }

    pub fn code(&self) -> &ValuePath {
        &self.code
    }

    pub fn tree(&self) -> &FieldDescriptor {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut FieldDescriptor {
        &mut self.tree
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapse
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_editable(&self) -> bool {
        self.state == EditState::Editing && self.can_update && !self.disabled
    }

    pub fn begin_edit(&mut self) {
        self.state = EditState::Editing;
    }

    /// Leaves edit mode; edits already live in the accumulator.
    pub fn commit(&mut self) {
        self.state = EditState::Viewing;
    }

    /// Leaves edit mode and rebuilds the tree from the pre-edit snapshot.
    /// Returns false when the field was not being edited or the snapshot
    /// could not be restored, in which case the tree is left untouched.
    pub fn cancel(&mut self, builder: &TreeBuilder<'_>) -> bool {
        if self.state != EditState::Editing {
            return false;
        }
        self.state = EditState::Viewing;
        let Some(restored) = self.snapshot.restore() else {
            warn!(code = %self.code, "revert skipped, snapshot unavailable");
            return false;
        };
        self.tree = builder.build(self.title.clone(), &self.label_key, &self.code, &restored);
        debug!(code = %self.code, "field reverted");
        true
    }

    /// Presents a new value: takes a fresh snapshot and rebuilds the tree.
    pub fn replace_value(&mut self, value: Value, builder: &TreeBuilder<'_>) {
        self.snapshot = Snapshot::capture(&value);
        self.tree = builder.build(self.title.clone(), &self.label_key, &self.code, &value);
    }

    /// Paths of every leaf, the keys this field may write.
    pub fn leaf_paths(&self) -> Vec<String> {
        self.tree
            .leaves()
            .into_iter()
            .map(|leaf| leaf.path.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{EditState, FieldSpec, GridLayout, MetadataField};
    use crate::core::ValuePath;
    use crate::field::{NoClassification, Snapshot, TreeBuilder};
    use serde_json::json;

    fn labels(key: &str) -> String {
        key.rsplit('.').next().unwrap_or(key).to_uppercase()
    }

    #[test]
    fn layout_honours_label_size_and_no_title() {
        assert_eq!(
            GridLayout::resolve(None, false),
            GridLayout {
                label_span: Some(3),
                input_span: 9
            }
        );
        assert_eq!(GridLayout::resolve(Some(4), false).input_span, 8);
        assert_eq!(GridLayout::resolve(Some(12), false).label_span, Some(3));
        assert_eq!(GridLayout::resolve(Some(0), false).label_span, Some(3));
        assert_eq!(
            GridLayout::resolve(Some(4), true),
            GridLayout {
                label_span: None,
                input_span: 12
            }
        );
    }

    #[test]
    fn code_defaults_to_label_key_and_title_to_resolved_label() {
        let builder = TreeBuilder::new(&labels, &NoClassification);
        let field = MetadataField::new(FieldSpec::new("Metadata.Title", json!("x")), &builder);
        assert_eq!(field.code().to_string(), "Metadata.Title");
        assert_eq!(field.title(), "TITLE");

        let field = MetadataField::new(
            FieldSpec::new("Title", json!("x"))
                .with_code("Units[0].Title")
                .with_title("Intitulé"),
            &builder,
        );
        assert_eq!(field.code(), &ValuePath::parse("Units[0].Title").expect("path"));
        assert_eq!(field.title(), "Intitulé");
    }

    #[test]
    fn edit_requires_edit_mode_update_right_and_enabled() {
        let builder = TreeBuilder::new(&labels, &NoClassification);
        let mut field = MetadataField::new(FieldSpec::new("Title", json!("x")), &builder);
        assert!(!field.is_editable());
        field.begin_edit();
        assert!(field.is_editable());
        field.set_disabled(true);
        assert!(!field.is_editable());

        let mut read_only = MetadataField::new(FieldSpec::new("Title", json!("x")).read_only(), &builder);
        read_only.begin_edit();
        assert!(!read_only.is_editable());
    }

    #[test]
    fn cancel_rebuilds_from_snapshot() {
        let builder = TreeBuilder::new(&labels, &NoClassification);
        let value = json!({"Title": "Report", "EventDate": "2020-01-15"});
        let mut field = MetadataField::new(FieldSpec::new("Metadata", value), &builder);
        let original = field.tree().clone();

        field.begin_edit();
        let path = ValuePath::parse("Metadata.Title").expect("path");
        let leaf = field.tree_mut().find_mut(&path).expect("leaf");
        leaf.accept_edit(json!("Memo"));
        assert_ne!(field.tree(), &original);

        assert!(field.cancel(&builder));
        assert_eq!(field.state(), EditState::Viewing);
        assert_eq!(field.tree(), &original);
    }

    #[test]
    fn unreadable_snapshot_leaves_edited_tree_in_place() {
        let builder = TreeBuilder::new(&labels, &NoClassification);
        let mut field = MetadataField::new(
            FieldSpec::new("Metadata", json!({"Title": "Report"})),
            &builder,
        );
        field.begin_edit();
        let path = ValuePath::parse("Metadata.Title").expect("path");
        field.tree_mut().find_mut(&path).expect("leaf").accept_edit(json!("Memo"));
        let edited = field.tree().clone();

        field.snapshot = Snapshot::Serialized("{\"Title\":".to_string());
        assert!(!field.cancel(&builder));
        assert_eq!(field.state(), EditState::Viewing);
        assert_eq!(field.tree(), &edited);
    }

    #[test]
    fn commit_keeps_edited_tree() {
        let builder = TreeBuilder::new(&labels, &NoClassification);
        let mut field = MetadataField::new(FieldSpec::new("Title", json!("a")), &builder);
        field.begin_edit();
        field.tree_mut().accept_edit(json!("b"));
        field.commit();

        assert_eq!(field.state(), EditState::Viewing);
        assert_eq!(field.tree().value, json!("b"));
        assert!(!field.cancel(&builder));
    }

    #[test]
    fn replace_value_takes_new_snapshot() {
        let builder = TreeBuilder::new(&labels, &NoClassification);
        let mut field = MetadataField::new(FieldSpec::new("Tags", json!([1])), &builder);
        field.replace_value(json!([1, 2]), &builder);
        assert_eq!(field.leaf_paths(), vec!["Tags[0]", "Tags[1]"]);

        field.begin_edit();
        assert!(field.cancel(&builder));
        assert_eq!(field.leaf_paths(), vec!["Tags[0]", "Tags[1]"]);
    }
}
