use crate::codegen::rust_gen::helpers::emit_doc_comments;
use crate::error::{LayoutError, LayoutResult};
use crate::layout::catalog::ident;
use crate::layout::namespace::split_name;
use crate::layout::padding::{pad_struct, Filler, TrailingPadding};
use crate::layout::resolver::{FieldCategory, LayoutResolver};
use cfb_schema::Object;
use tracing::debug;

fn push_filler(out: &mut String, filler: &Filler) {
  out.push_str(&format!("    pub {}: {},\n", filler.name(), filler.width.type_name()));
}

/* Fixed-size struct with explicit fillers, `is_present` and a `Scalar` impl */
pub fn emit_struct(
  resolver: &LayoutResolver<'_>,
  object: &Object,
  scope: &[String],
  trailing: TrailingPadding,
) -> LayoutResult<String> {
  let layout = pad_struct(resolver, object, trailing)?;
  let name = ident(split_name(&object.name).1);

  for padded in &layout.fields {
    match resolver.category(padded.field)? {
      FieldCategory::Scalar | FieldCategory::Enum | FieldCategory::Struct => {}
      other => {
        return Err(LayoutError::UnsupportedType {
          field: format!("{}.{}", object.name, padded.field.name),
          detail: format!("{:?} inside a struct", other),
        })
      }
    }
  }

  let alignment = match object.min_alignment() {
    0 => resolver.record_alignment(object)?,
    declared => declared,
  };

  let mut out = String::new();
  emit_doc_comments(&mut out, &object.documentation, 0);
  out.push_str(&format!("#[repr(C, align({}))]\n", alignment));
  out.push_str("#[derive(Default, Clone, Debug, PartialEq)]\n");
  out.push_str(&format!("pub struct {} {{\n", name));
  for padded in &layout.fields {
    for filler in &padded.fillers {
      push_filler(&mut out, filler);
    }
    emit_doc_comments(&mut out, &padded.field.documentation, 1);
    out.push_str(&format!(
      "    pub {}: {},\n",
      ident(&padded.field.name),
      resolver.type_name_in(padded.field, scope)?
    ));
  }
  for filler in &layout.trailing {
    push_filler(&mut out, filler);
  }
  out.push_str("}\n\n");

  let mut checks = Vec::with_capacity(layout.fields.len());
  for padded in &layout.fields {
    checks.push(resolver.presence_predicate_in(padded.field, scope, None)?);
  }
  let present = if checks.is_empty() { "false".to_string() } else { checks.join(" || ") };

  out.push_str(&format!("impl {} {{\n", name));
  out.push_str("    pub fn is_present(&self) -> bool {\n");
  out.push_str(&format!("        {}\n", present));
  out.push_str("    }\n");
  out.push_str("}\n\n");

  out.push_str(&format!("impl Scalar for {} {{\n", name));
  out.push_str("    #[cfg(target_endian = \"little\")]\n");
  out.push_str("    fn to_le(self) -> Self {\n");
  out.push_str("        self\n");
  out.push_str("    }\n\n");
  out.push_str("    #[cfg(target_endian = \"little\")]\n");
  out.push_str("    fn from_le(x: Self) -> Self {\n");
  out.push_str("        x\n");
  out.push_str("    }\n\n");
  out.push_str("    #[cfg(not(target_endian = \"little\"))]\n");
  out.push_str("    fn to_le(mut self) -> Self {\n");
  for padded in &layout.fields {
    let field = ident(&padded.field.name);
    out.push_str(&format!("        self.{0} = self.{0}.to_le();\n", field));
  }
  out.push_str("        self\n");
  out.push_str("    }\n\n");
  out.push_str("    #[cfg(not(target_endian = \"little\"))]\n");
  out.push_str("    fn from_le(mut x: Self) -> Self {\n");
  for padded in &layout.fields {
    let field = ident(&padded.field.name);
    out.push_str(&format!("        x.{0} = Scalar::from_le(x.{0});\n", field));
  }
  out.push_str("        x\n");
  out.push_str("    }\n");
  out.push_str("}\n");

  debug!(record = %object.name, fillers = layout.filler_count(), "emitted struct");
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use cfb_schema::{BaseType, Field, Schema, Type};

  fn vec3() -> Schema {
    Schema::new(
      vec![Object::fixed(
        "example.Vec3",
        vec![
          Field::new("x", Type::new(BaseType::ULong)).at(0, 0),
          Field::new("y", Type::new(BaseType::UByte)).at(1, 8),
          Field::new("z", Type::new(BaseType::ULong)).at(2, 16),
        ],
        24,
        8,
      )],
      vec![],
    )
  }

  #[test]
  fn test_struct_with_fillers() {
    let schema = vec3();
    let resolver = LayoutResolver::new(&schema);
    let code = emit_struct(&resolver, &schema.objects[0], &["example".to_string()], TrailingPadding::ToByteSize).unwrap();

    let expected_fields = "pub struct Vec3 {\n    pub x: u64,\n    pub y: u8,\n    pub padding0_: u8,\n    pub padding1_: u16,\n    pub padding2_: u32,\n    pub z: u64,\n}\n";
    assert!(code.starts_with("#[repr(C, align(8))]\n#[derive(Default, Clone, Debug, PartialEq)]\n"));
    assert!(code.contains(expected_fields), "{}", code);
    assert!(code.contains("        self.x != 0u64 || self.y != 0u8 || self.z != 0u64\n"));
    assert!(code.contains("        self.y = self.y.to_le();\n"));
    assert!(code.contains("        x.z = Scalar::from_le(x.z);\n"));
    assert!(!code.contains("padding0_ = "));
  }

  #[test]
  fn test_struct_trailing_fillers() {
    let schema = Schema::new(
      vec![Object::fixed(
        "example.Stat",
        vec![Field::new("hp", Type::new(BaseType::UInt)).at(0, 0), Field::new("mp", Type::new(BaseType::UByte)).at(1, 4)],
        8,
        4,
      )],
      vec![],
    );
    let resolver = LayoutResolver::new(&schema);
    let scope = ["example".to_string()];

    let padded = emit_struct(&resolver, &schema.objects[0], &scope, TrailingPadding::ToByteSize).unwrap();
    assert!(padded.contains("    pub mp: u8,\n    pub padding0_: u8,\n    pub padding1_: u16,\n}\n"));

    let canonical = emit_struct(&resolver, &schema.objects[0], &scope, TrailingPadding::None).unwrap();
    assert!(canonical.contains("    pub mp: u8,\n}\n"));
  }

  #[test]
  fn test_string_inside_struct_rejected() {
    let schema = Schema::new(
      vec![Object::fixed("Bad", vec![Field::new("name", Type::new(BaseType::String))], 4, 4)],
      vec![],
    );
    let resolver = LayoutResolver::new(&schema);
    let err = emit_struct(&resolver, &schema.objects[0], &[], TrailingPadding::None).unwrap_err();
    assert!(matches!(err, LayoutError::UnsupportedType { .. }));
  }
}
