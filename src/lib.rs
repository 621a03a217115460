pub mod catalog;
pub mod client;
pub mod core;
pub mod error;
pub mod field;
pub mod form;
pub mod referential;
pub mod runtime;

pub use catalog::FieldCatalog;
pub use core::{EditValue, PathSegment, ValuePath};
pub use error::{CatalogError, PathError, TransportError};
pub use field::{
    DisplayMode, FieldClassifier, FieldDescriptor, FieldKind, LabelResolver, NoClassification,
    SelectOption, TreeBuilder,
};
pub use form::{
    ChangeOutcome, EditAccumulator, EditState, FieldSpec, FormController, FormEvent,
    MetadataField,
};
