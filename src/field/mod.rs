//! Schema-less metadata field rendering: shape classification, one-level
//! expansion into descriptors and widget resolution.

pub mod dates;
pub mod descriptor;
pub mod display;
pub mod kind;
pub mod labels;
pub mod oracle;

pub use descriptor::{FieldDescriptor, TreeBuilder};
pub use display::{DisplayMode, Resolution, resolve_display_mode};
pub use kind::{FieldKind, Snapshot};
pub use labels::{option_label, option_labels};
pub use oracle::{FieldClassifier, LabelResolver, NoClassification, SelectOption};
