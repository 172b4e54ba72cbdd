pub mod catalog;
pub mod namespace;
pub mod padding;
pub mod resolver;

pub use catalog::{ElementType, FieldType, ScalarKind, INDIRECTION_WIDTH};
pub use namespace::Namespace;
pub use padding::{fillers_for_gap, pad_struct, round_up, Filler, FillerWidth, PaddedField, StructLayout, TrailingPadding};
pub use resolver::{qualified_name, scope_of, vtable_offset, FieldCategory, LayoutResolver};
