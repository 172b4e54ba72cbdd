//! Layout resolution and builder code generation for FlatBuffers schemas.
//!
//! `layout` turns a decoded schema into per-field sizes, alignments, defaults
//! and presence checks, and pads fixed-size structs with explicit fillers.
//! `codegen` renders the result as Rust builder source.

pub mod codegen;
pub mod error;
pub mod layout;

pub use codegen::{Generator, GeneratorOptions};
pub use error::{LayoutError, LayoutResult};
pub use layout::{LayoutResolver, Namespace, TrailingPadding};
