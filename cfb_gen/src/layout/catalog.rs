use crate::error::{LayoutError, LayoutResult};
use cfb_schema::{BaseType, Schema, Type};

/* Size and alignment of any reference (uoffset) slot */
pub const INDIRECTION_WIDTH: u64 = 4;

pub const STRING_TYPE_NAME: &str = "String";
pub const STRING_DEFAULT: &str = "String::new()";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
  Bool,
  I8,
  U8,
  I16,
  U16,
  I32,
  U32,
  I64,
  U64,
  F32,
  F64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveInfo {
  pub size: u64,
  pub alignment: u64,
  pub type_name: &'static str,
  pub default_literal: &'static str,
}

impl ScalarKind {
  pub fn from_base_type(base: BaseType) -> Option<Self> {
    match base {
      BaseType::Bool => Some(ScalarKind::Bool),
      BaseType::Byte => Some(ScalarKind::I8),
      BaseType::UByte => Some(ScalarKind::U8),
      BaseType::Short => Some(ScalarKind::I16),
      BaseType::UShort => Some(ScalarKind::U16),
      BaseType::Int => Some(ScalarKind::I32),
      BaseType::UInt => Some(ScalarKind::U32),
      BaseType::Long => Some(ScalarKind::I64),
      BaseType::ULong => Some(ScalarKind::U64),
      BaseType::Float => Some(ScalarKind::F32),
      BaseType::Double => Some(ScalarKind::F64),
      _ => None,
    }
  }

  pub fn info(self) -> PrimitiveInfo {
    let (size, type_name, default_literal) = match self {
      ScalarKind::Bool => (1, "bool", "false"),
      ScalarKind::I8 => (1, "i8", "0i8"),
      ScalarKind::U8 => (1, "u8", "0u8"),
      ScalarKind::I16 => (2, "i16", "0i16"),
      ScalarKind::U16 => (2, "u16", "0u16"),
      ScalarKind::I32 => (4, "i32", "0i32"),
      ScalarKind::U32 => (4, "u32", "0u32"),
      ScalarKind::I64 => (8, "i64", "0i64"),
      ScalarKind::U64 => (8, "u64", "0u64"),
      ScalarKind::F32 => (4, "f32", "0f32"),
      ScalarKind::F64 => (8, "f64", "0f64"),
    };
    PrimitiveInfo { size, alignment: size, type_name, default_literal }
  }

  pub fn size(self) -> u64 {
    self.info().size
  }

  pub fn type_name(self) -> &'static str {
    self.info().type_name
  }

  pub fn is_float(self) -> bool {
    matches!(self, ScalarKind::F32 | ScalarKind::F64)
  }

  /* Literal for a declared default; zero/false yields the catalog default */
  pub fn literal(self, default_integer: i64, default_real: f64) -> String {
    let name = self.type_name();
    match self {
      ScalarKind::Bool => (default_integer != 0).to_string(),
      ScalarKind::F32 | ScalarKind::F64 => {
        if default_real.is_nan() {
          format!("{}::NAN", name)
        } else if default_real.is_infinite() {
          let sign = if default_real > 0.0 { "" } else { "NEG_" };
          format!("{}::{}INFINITY", name, sign)
        } else if default_real == 0.0 {
          self.info().default_literal.to_string()
        } else if self == ScalarKind::F32 {
          format!("{:?}{}", default_real as f32, name)
        } else {
          format!("{:?}{}", default_real, name)
        }
      }
      /* Unsigned defaults arrive as the two's complement i64 bit pattern */
      ScalarKind::I8 => format!("{}{}", default_integer as i8, name),
      ScalarKind::U8 => format!("{}{}", default_integer as u8, name),
      ScalarKind::I16 => format!("{}{}", default_integer as i16, name),
      ScalarKind::U16 => format!("{}{}", default_integer as u16, name),
      ScalarKind::I32 => format!("{}{}", default_integer as i32, name),
      ScalarKind::U32 => format!("{}{}", default_integer as u32, name),
      ScalarKind::I64 => format!("{}{}", default_integer, name),
      ScalarKind::U64 => format!("{}{}", default_integer as u64, name),
    }
  }
}

/* Rust reserved keywords that need to be escaped with r# */
const RUST_KEYWORDS: &[&str] = &[
  "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
  "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "trait", "true",
  "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final",
  "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try",
];

/* Schema names as Rust identifiers */
pub fn ident(name: &str) -> String {
  if RUST_KEYWORDS.contains(&name) {
    format!("r#{}", name)
  } else {
    name.to_string()
  }
}

pub fn string_info() -> PrimitiveInfo {
  PrimitiveInfo {
    size: INDIRECTION_WIDTH,
    alignment: INDIRECTION_WIDTH,
    type_name: STRING_TYPE_NAME,
    default_literal: STRING_DEFAULT,
  }
}

/* Closed classification of a field's type descriptor */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
  Scalar(ScalarKind),
  Enum { repr: ScalarKind, index: usize },
  UnionTag(usize),
  String,
  Record(usize),
  Union(usize),
  Vector(ElementType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
  Scalar(ScalarKind),
  Enum { repr: ScalarKind, index: usize },
  String,
  Record(usize),
}

fn unsupported(field: &str, detail: String) -> LayoutError {
  LayoutError::UnsupportedType { field: field.to_string(), detail }
}

fn check_object(field: &str, schema: &Schema, index: usize) -> LayoutResult<usize> {
  if index < schema.objects.len() {
    Ok(index)
  } else {
    Err(LayoutError::DanglingReference { field: field.to_string(), table: "objects", index, len: schema.objects.len() })
  }
}

fn check_enum(field: &str, schema: &Schema, index: usize) -> LayoutResult<usize> {
  if index < schema.enums.len() {
    Ok(index)
  } else {
    Err(LayoutError::DanglingReference { field: field.to_string(), table: "enums", index, len: schema.enums.len() })
  }
}

pub fn classify(field: &str, ty: &Type, schema: &Schema) -> LayoutResult<FieldType> {
  let index = ty.type_index();

  if let Some(kind) = ScalarKind::from_base_type(ty.base_type) {
    return match index {
      None => Ok(FieldType::Scalar(kind)),
      Some(i) => Ok(FieldType::Enum { repr: kind, index: check_enum(field, schema, i)? }),
    };
  }

  match (ty.base_type, index) {
    (BaseType::UType, Some(i)) => Ok(FieldType::UnionTag(check_enum(field, schema, i)?)),
    (BaseType::String, _) => Ok(FieldType::String),
    (BaseType::Obj, Some(i)) => Ok(FieldType::Record(check_object(field, schema, i)?)),
    (BaseType::Union, Some(i)) => Ok(FieldType::Union(check_enum(field, schema, i)?)),
    (BaseType::Vector, _) => Ok(FieldType::Vector(classify_element(field, ty, schema)?)),
    (base, None) => Err(unsupported(field, format!("{:?} without a type index", base))),
    (base, Some(_)) => Err(unsupported(field, format!("base type {:?}", base))),
  }
}

fn classify_element(field: &str, ty: &Type, schema: &Schema) -> LayoutResult<ElementType> {
  let index = ty.type_index();

  if let Some(kind) = ScalarKind::from_base_type(ty.element) {
    return match index {
      None => Ok(ElementType::Scalar(kind)),
      Some(i) => Ok(ElementType::Enum { repr: kind, index: check_enum(field, schema, i)? }),
    };
  }

  match (ty.element, index) {
    (BaseType::String, _) => Ok(ElementType::String),
    (BaseType::Obj, Some(i)) => Ok(ElementType::Record(check_object(field, schema, i)?)),
    (BaseType::Union, _) | (BaseType::UType, _) => Err(unsupported(field, "vectors of unions".to_string())),
    (element, _) => Err(unsupported(field, format!("vector element {:?}", element))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cfb_schema::{Enum, EnumVal, Object};

  fn schema() -> Schema {
    Schema::new(
      vec![Object::table("example.Hero", vec![])],
      vec![Enum::new("example.Color", BaseType::Byte, vec![EnumVal::new("Red", 0)])],
    )
  }

  #[test]
  fn test_catalog_sizes_match_alignment() {
    for kind in [
      ScalarKind::Bool,
      ScalarKind::I8,
      ScalarKind::U8,
      ScalarKind::I16,
      ScalarKind::U16,
      ScalarKind::I32,
      ScalarKind::U32,
      ScalarKind::I64,
      ScalarKind::U64,
      ScalarKind::F32,
      ScalarKind::F64,
    ] {
      let info = kind.info();
      assert_eq!(info.size, info.alignment);
      assert!(info.default_literal.ends_with(info.type_name) || kind == ScalarKind::Bool);
    }
    assert_eq!(ScalarKind::U16.size(), 2);
    assert_eq!(ScalarKind::F64.size(), 8);
    assert_eq!(string_info().size, INDIRECTION_WIDTH);
    assert_eq!(string_info().default_literal, "String::new()");
  }

  #[test]
  fn test_declared_default_literals() {
    assert_eq!(ScalarKind::U16.literal(100, 0.0), "100u16");
    assert_eq!(ScalarKind::I8.literal(-3, 0.0), "-3i8");
    assert_eq!(ScalarKind::U64.literal(-1, 0.0), format!("{}u64", u64::MAX));
    assert_eq!(ScalarKind::Bool.literal(1, 0.0), "true");
    assert_eq!(ScalarKind::F32.literal(0, 1.5), "1.5f32");
    assert_eq!(ScalarKind::F64.literal(0, 2.0), "2.0f64");
    assert_eq!(ScalarKind::F32.literal(0, 0.0), "0f32");
    assert_eq!(ScalarKind::F64.literal(0, f64::NEG_INFINITY), "f64::NEG_INFINITY");
  }

  #[test]
  fn test_keyword_idents_escaped() {
    assert_eq!(ident("type"), "r#type");
    assert_eq!(ident("hp"), "hp");
  }

  #[test]
  fn test_classify_table() {
    let schema = schema();
    assert_eq!(classify("hp", &Type::new(BaseType::UInt), &schema).unwrap(), FieldType::Scalar(ScalarKind::U32));
    assert_eq!(
      classify("color", &Type::with_index(BaseType::Byte, 0), &schema).unwrap(),
      FieldType::Enum { repr: ScalarKind::I8, index: 0 }
    );
    assert_eq!(classify("role_type", &Type::with_index(BaseType::UType, 0), &schema).unwrap(), FieldType::UnionTag(0));
    assert_eq!(classify("name", &Type::new(BaseType::String), &schema).unwrap(), FieldType::String);
    assert_eq!(classify("hero", &Type::with_index(BaseType::Obj, 0), &schema).unwrap(), FieldType::Record(0));
    assert_eq!(classify("role", &Type::with_index(BaseType::Union, 0), &schema).unwrap(), FieldType::Union(0));
    assert_eq!(
      classify("heroes", &Type::vector_of(BaseType::Obj, Some(0)), &schema).unwrap(),
      FieldType::Vector(ElementType::Record(0))
    );
    assert_eq!(
      classify("lines", &Type::vector_of(BaseType::String, None), &schema).unwrap(),
      FieldType::Vector(ElementType::String)
    );
  }

  #[test]
  fn test_classify_failures() {
    let schema = schema();
    for ty in [
      Type::new(BaseType::None),
      Type::new(BaseType::Array),
      Type::new(BaseType::Vector64),
      Type::new(BaseType::UType),
      Type::vector_of(BaseType::Union, Some(0)),
    ] {
      let err = classify("f", &ty, &schema).unwrap_err();
      assert!(matches!(err, LayoutError::UnsupportedType { .. }), "{:?}", ty);
    }

    let err = classify("hero", &Type::with_index(BaseType::Obj, 3), &schema).unwrap_err();
    assert!(matches!(err, LayoutError::DanglingReference { table: "objects", index: 3, len: 1, .. }));
  }
}
