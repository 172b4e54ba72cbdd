/* Helper utilities for Rust code generation */

/* Emitted code uses four-space indentation */
pub const INDENT: &str = "    ";

/* "role_type" -> "ROLE_TYPE", used in VT_/SIZE_/ALIGNMENT_ constants */
pub fn const_suffix(field_name: &str) -> String {
  field_name.to_ascii_uppercase()
}

/* Prefix every non-empty line of `text` with `levels` indents */
pub fn indent_block(text: &str, levels: usize) -> String {
  let prefix = INDENT.repeat(levels);
  let mut out = String::with_capacity(text.len());
  for line in text.lines() {
    if !line.is_empty() {
      out.push_str(&prefix);
      out.push_str(line);
    }
    out.push('\n');
  }
  out
}

pub fn emit_doc_comments(out: &mut String, documentation: &[String], indent: usize) {
  let prefix = INDENT.repeat(indent);
  for line in documentation {
    let line = line.trim_end();
    if line.is_empty() {
      out.push_str(&format!("{}///\n", prefix));
    } else if line.starts_with(' ') {
      out.push_str(&format!("{}///{}\n", prefix, line));
    } else {
      out.push_str(&format!("{}/// {}\n", prefix, line));
    }
  }
}

/* `use` lines every generated module starts with */
pub fn emit_module_header(runtime_crate: &str) -> String {
  let mut out = String::new();
  out.push_str("#![allow(unused_imports)]\n\n");
  out.push_str(&format!("use {}::builder::{{\n", runtime_crate));
  out.push_str(
    "    Builder, Component, DesignatedComponent, ReferenceVectorComponent, ScalarVectorComponent,\n",
  );
  out.push_str("    StringComponent,\n");
  out.push_str("};\n");
  out.push_str(&format!("use {}::scalar::Scalar;\n", runtime_crate));
  out.push_str(&format!("use {}::types::{{SOffset, SIZE_OF_SOFFSET}};\n", runtime_crate));
  out.push_str("#[cfg(not(target_endian = \"little\"))]\n");
  out.push_str("use std::mem::transmute;\n");
  out
}
