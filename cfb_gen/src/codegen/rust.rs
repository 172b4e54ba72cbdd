use crate::codegen::rust_gen::enums::{emit_enum, emit_union};
use crate::codegen::rust_gen::helpers::{emit_module_header, indent_block};
use crate::codegen::rust_gen::structs::emit_struct;
use crate::codegen::rust_gen::tables::emit_table;
use crate::codegen::GeneratorOptions;
use crate::error::LayoutResult;
use crate::layout::catalog::ident;
use crate::layout::{LayoutResolver, Namespace};
use cfb_schema::Schema;
use tracing::debug;

pub struct RustCodeGenerator<'a> {
  resolver: LayoutResolver<'a>,
  options: &'a GeneratorOptions,
}

impl<'a> RustCodeGenerator<'a> {
  pub fn new(schema: &'a Schema, options: &'a GeneratorOptions) -> Self {
    Self { resolver: LayoutResolver::new(schema), options }
  }

  /* Render the whole schema; nothing is returned unless every definition rendered */
  pub fn emit_code(&self, root: &Namespace<'_>) -> LayoutResult<String> {
    let mut out = String::new();

    if !root.objects.is_empty() || !root.enums.is_empty() {
      out.push_str(&self.emit_definitions(root)?);
    }

    for child in root.children.values() {
      if !child.has_definitions() {
        continue;
      }
      if !out.is_empty() {
        out.push('\n');
      }
      out.push_str(&self.emit_module(child)?);
    }

    let schema = self.resolver.schema();
    if let Some(file_ident) = schema.file_ident.as_deref().filter(|s| !s.is_empty()) {
      out.push_str(&format!("\npub const FILE_IDENTIFIER: &[u8] = b\"{}\";\n", file_ident.escape_default()));
    }
    if let Some(ext) = schema.file_ext.as_deref().filter(|s| !s.is_empty()) {
      out.push_str(&format!("\npub const FILE_EXTENSION: &str = \"{}\";\n", ext.escape_default()));
    }

    Ok(out)
  }

  fn emit_module(&self, namespace: &Namespace<'_>) -> LayoutResult<String> {
    let name = namespace.name().unwrap_or_default();
    let mut body = String::new();

    if !namespace.objects.is_empty() || !namespace.enums.is_empty() {
      body.push_str(&self.emit_definitions(namespace)?);
    }
    for child in namespace.children.values() {
      if child.has_definitions() {
        body.push('\n');
        body.push_str(&self.emit_module(child)?);
      }
    }

    debug!(namespace = %namespace.dotted_path(), "emitted module");

    let mut out = format!("pub mod {} {{\n", ident(name));
    out.push_str(&indent_block(&body, 1));
    out.push_str("}\n");
    Ok(out)
  }

  /* Enums first, then records, each in declaration order */
  fn emit_definitions(&self, namespace: &Namespace<'_>) -> LayoutResult<String> {
    let scope = &namespace.path;
    let mut parts = vec![emit_module_header(&self.options.runtime_crate)];

    for e in namespace.enums.values() {
      if e.is_union {
        parts.push(emit_union(&self.resolver, e, scope)?);
      } else {
        parts.push(emit_enum(e)?);
      }
    }
    for object in namespace.objects.values() {
      if object.is_struct {
        parts.push(emit_struct(&self.resolver, object, scope, self.options.trailing_padding)?);
      } else {
        parts.push(emit_table(&self.resolver, object, scope)?);
      }
    }

    Ok(parts.join("\n"))
  }
}
