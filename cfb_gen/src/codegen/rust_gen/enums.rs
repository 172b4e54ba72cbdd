use crate::codegen::rust_gen::helpers::emit_doc_comments;
use crate::error::{LayoutError, LayoutResult};
use crate::layout::catalog::{ident, ScalarKind};
use crate::layout::namespace::split_name;
use crate::layout::resolver::{qualified_name, tag_type_name, LayoutResolver};
use cfb_schema::{BaseType, Enum, EnumVal};

fn repr_of(e: &Enum) -> LayoutResult<ScalarKind> {
  match ScalarKind::from_base_type(e.underlying_type.base_type) {
    Some(kind) if kind != ScalarKind::Bool && !kind.is_float() => Ok(kind),
    _ => Err(LayoutError::UnsupportedType {
      field: e.name.clone(),
      detail: format!("enum underlying type {:?}", e.underlying_type.base_type),
    }),
  }
}

/* Zero member when there is one, otherwise the first declared */
fn default_member(values: &[EnumVal]) -> Option<&EnumVal> {
  values.iter().find(|v| v.value == 0).or_else(|| values.first())
}

fn emit_c_like(out: &mut String, name: &str, repr: &str, values: &[EnumVal], documentation: &[String]) {
  emit_doc_comments(out, documentation, 0);
  out.push_str(&format!("#[repr({})]\n", repr));
  out.push_str("#[derive(Clone, Copy, PartialEq, Debug)]\n");
  out.push_str(&format!("pub enum {} {{\n", name));
  for value in values {
    emit_doc_comments(out, &value.documentation, 1);
    out.push_str(&format!("    {} = {},\n", ident(&value.name), value.value));
  }
  out.push_str("}\n\n");

  if let Some(member) = default_member(values) {
    out.push_str(&format!("impl Default for {} {{\n", name));
    out.push_str("    fn default() -> Self {\n");
    out.push_str(&format!("        {}::{}\n", name, ident(&member.name)));
    out.push_str("    }\n");
    out.push_str("}\n\n");
  }

  out.push_str(&format!("impl Scalar for {} {{\n", name));
  for (signature, arg) in [("fn to_le(self) -> Self", "self"), ("fn from_le(x: Self) -> Self", "x")] {
    out.push_str(&format!("    {} {{\n", signature));
    out.push_str("        #[cfg(target_endian = \"little\")]\n");
    out.push_str("        {\n");
    out.push_str(&format!("            {}\n", arg));
    out.push_str("        }\n");
    out.push_str("        #[cfg(not(target_endian = \"little\"))]\n");
    out.push_str("        {\n");
    out.push_str(&format!("            unsafe {{ transmute(({} as {}).swap_bytes()) }}\n", arg, repr));
    out.push_str("        }\n");
    out.push_str("    }\n");
    if arg == "self" {
      out.push('\n');
    }
  }
  out.push_str("}\n");
}

pub fn emit_enum(e: &Enum) -> LayoutResult<String> {
  if e.values.is_empty() {
    return Err(LayoutError::EmptyEnum { enum_name: e.name.clone() });
  }
  let repr = repr_of(e)?;
  let name = ident(split_name(&e.name).1);

  let mut out = String::new();
  emit_c_like(&mut out, &name, repr.type_name(), &e.values, &e.documentation);
  Ok(out)
}

/* Union payload enum, its `Tag` discriminant enum, and `union_type()` */
pub fn emit_union(resolver: &LayoutResolver<'_>, e: &Enum, scope: &[String]) -> LayoutResult<String> {
  let name = ident(split_name(&e.name).1);
  let tag_name = ident(split_name(&tag_type_name(&e.name)).1);
  let schema = resolver.schema();

  let mut variants = Vec::new();
  for value in e.values.iter().filter(|v| v.value != 0) {
    let payload = match &value.union_type {
      Some(ty) if ty.base_type == BaseType::Obj => {
        let object = ty.type_index().and_then(|i| schema.object(i)).ok_or_else(|| LayoutError::DanglingReference {
          field: format!("{}.{}", e.name, value.name),
          table: "objects",
          index: ty.type_index().unwrap_or_default(),
          len: schema.objects.len(),
        })?;
        if object.is_struct {
          return Err(LayoutError::UnsupportedType {
            field: format!("{}.{}", e.name, value.name),
            detail: format!("struct '{}' as a union member", object.name),
          });
        }
        qualified_name(&object.name, scope)
      }
      Some(ty) => {
        return Err(LayoutError::UnsupportedType {
          field: format!("{}.{}", e.name, value.name),
          detail: format!("union member of base type {:?}", ty.base_type),
        })
      }
      None => value.name.clone(),
    };
    variants.push((value, payload));
  }
  if variants.is_empty() {
    return Err(LayoutError::EmptyEnum { enum_name: e.name.clone() });
  }

  let mut out = String::new();
  emit_doc_comments(&mut out, &e.documentation, 0);
  out.push_str("#[derive(Clone, PartialEq, Debug)]\n");
  out.push_str(&format!("pub enum {} {{\n", name));
  for (value, payload) in &variants {
    emit_doc_comments(&mut out, &value.documentation, 1);
    out.push_str(&format!("    {}({}),\n", ident(&value.name), payload));
  }
  out.push_str("}\n\n");

  out.push_str(&format!("impl {} {{\n", name));
  out.push_str(&format!("    pub fn union_type(&self) -> {} {{\n", tag_name));
  out.push_str("        match self {\n");
  for (value, _) in &variants {
    let member = ident(&value.name);
    out.push_str(&format!("            {}::{}(_) => {}::{},\n", name, member, tag_name, member));
  }
  out.push_str("        }\n");
  out.push_str("    }\n");
  out.push_str("}\n\n");

  emit_c_like(&mut out, &tag_name, ScalarKind::U8.type_name(), &e.values, &[]);
  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;
  use cfb_schema::{Object, Schema, Type};

  #[test]
  fn test_enum_output() {
    let e = Enum::new(
      "example.Color",
      BaseType::Byte,
      vec![EnumVal::new("Red", 0), EnumVal::new("Green", 1), EnumVal::new("Blue", 2)],
    );
    let code = emit_enum(&e).unwrap();
    assert!(code.starts_with("#[repr(i8)]\n#[derive(Clone, Copy, PartialEq, Debug)]\npub enum Color {\n"));
    assert!(code.contains("    Green = 1,\n"));
    assert!(code.contains("        Color::Red\n"));
    assert!(code.contains("unsafe { transmute((self as i8).swap_bytes()) }"));
    assert!(code.contains("unsafe { transmute((x as i8).swap_bytes()) }"));
  }

  #[test]
  fn test_enum_without_zero_defaults_to_first() {
    let e = Enum::new("Level", BaseType::UShort, vec![EnumVal::new("Low", 5), EnumVal::new("High", 9)]);
    let code = emit_enum(&e).unwrap();
    assert!(code.contains("#[repr(u16)]"));
    assert!(code.contains("        Level::Low\n"));
  }

  #[test]
  fn test_enum_rejections() {
    let empty = Enum::new("Nothing", BaseType::Byte, vec![]);
    assert!(matches!(emit_enum(&empty), Err(LayoutError::EmptyEnum { .. })));
    let float = Enum::new("Ratio", BaseType::Float, vec![EnumVal::new("Half", 0)]);
    assert!(matches!(emit_enum(&float), Err(LayoutError::UnsupportedType { .. })));
  }

  #[test]
  fn test_union_output() {
    let mut hero = EnumVal::new("Hero", 1);
    hero.union_type = Some(Type::with_index(BaseType::Obj, 0));
    let mut monster = EnumVal::new("Monster", 2);
    monster.union_type = Some(Type::with_index(BaseType::Obj, 1));
    let role = Enum::union("example.Role", vec![EnumVal::new("NONE", 0), hero, monster]);
    let schema = Schema::new(
      vec![Object::table("example.Hero", vec![]), Object::table("example.npc.Monster", vec![])],
      vec![role.clone()],
    );
    let resolver = LayoutResolver::new(&schema);

    let code = emit_union(&resolver, &role, &["example".to_string()]).unwrap();
    assert!(code.contains("pub enum Role {\n    Hero(Hero),\n    Monster(npc::Monster),\n}\n"));
    assert!(code.contains("    pub fn union_type(&self) -> RoleTag {\n"));
    assert!(code.contains("            Role::Monster(_) => RoleTag::Monster,\n"));
    assert!(code.contains("#[repr(u8)]\n#[derive(Clone, Copy, PartialEq, Debug)]\npub enum RoleTag {\n    NONE = 0,\n"));
    assert!(code.contains("        RoleTag::NONE\n"));
  }

  #[test]
  fn test_union_of_struct_rejected() {
    let mut pos = EnumVal::new("Pos", 1);
    pos.union_type = Some(Type::with_index(BaseType::Obj, 0));
    let role = Enum::union("Shape", vec![EnumVal::new("NONE", 0), pos]);
    let schema = Schema::new(vec![Object::fixed("Pos", vec![], 4, 4)], vec![role.clone()]);
    let resolver = LayoutResolver::new(&schema);
    assert!(matches!(emit_union(&resolver, &role, &[]), Err(LayoutError::UnsupportedType { .. })));
  }

  #[test]
  fn test_keyword_members_escaped() {
    let e = Enum::new("ex.Kind", BaseType::UByte, vec![EnumVal::new("type", 0), EnumVal::new("Other", 1)]);
    let code = emit_enum(&e).unwrap();
    assert!(code.contains("    r#type = 0,\n"));
    assert!(code.contains("        Kind::r#type\n"));
  }
}
