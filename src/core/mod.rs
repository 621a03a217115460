pub mod value;
pub mod value_path;

pub use value::EditValue;
pub use value_path::{PathSegment, ValuePath};
