pub mod accumulator;
pub mod controller;
pub mod field;

pub use accumulator::EditAccumulator;
pub use controller::{ChangeOutcome, DATE_CHECK_DELAY, FormController, FormEvent, IgnoreReason};
pub use field::{EditState, FieldSpec, GridLayout, MetadataField};
