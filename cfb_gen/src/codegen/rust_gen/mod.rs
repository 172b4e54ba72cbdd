pub mod enums;
pub mod helpers;
pub mod structs;
pub mod tables;

/* Re-export main public functions */
pub use enums::{emit_enum, emit_union};
pub use structs::emit_struct;
pub use tables::emit_table;
