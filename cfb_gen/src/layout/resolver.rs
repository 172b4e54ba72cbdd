use crate::error::{LayoutError, LayoutResult};
use crate::layout::catalog::{self, ident, ElementType, FieldType, ScalarKind, INDIRECTION_WIDTH};
use crate::layout::namespace::split_name;
use cfb_schema::{Enum, Field, Object, Schema};

pub const UNION_TAG_SUFFIX: &str = "_type";
pub const VTABLE_FIRST_SLOT: u64 = 4;
/* A table with no fields is only its soffset */
pub const FIELDLESS_TABLE_ALIGNMENT: u64 = 1;

/* Exactly one per field; drives what the emitter renders for it */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCategory {
  Scalar,
  Enum,
  Struct,
  Table,
  String,
  Union,
  UnionTag,
  ScalarVector,
  StructVector,
  StringVector,
  TableVector,
}

/* Render a dotted schema name as a Rust path seen from `scope` */
pub fn qualified_name(full_name: &str, scope: &[String]) -> String {
  let (segments, leaf) = split_name(full_name);
  let common = scope.iter().zip(segments.iter()).take_while(|(a, b)| a.as_str() == **b).count();

  let mut parts: Vec<String> = Vec::new();
  for _ in common..scope.len() {
    parts.push("super".to_string());
  }
  parts.extend(segments[common..].iter().map(|segment| ident(segment)));
  parts.push(ident(leaf));
  parts.join("::")
}

/* Namespace segments of a dotted name */
pub fn scope_of(full_name: &str) -> Vec<String> {
  split_name(full_name).0.into_iter().map(str::to_string).collect()
}

/* vtable byte offset for slot `id` */
pub fn vtable_offset(id: u16) -> u64 {
  VTABLE_FIRST_SLOT + 2 * u64::from(id)
}

/* "example.Role" -> "example.RoleTag" */
pub fn tag_type_name(union_name: &str) -> String {
  format!("{}Tag", union_name)
}

/* "role_type" -> "role" */
pub fn union_field_name(tag_name: &str) -> &str {
  tag_name.strip_suffix(UNION_TAG_SUFFIX).unwrap_or(tag_name)
}

/* Query engine over one immutable schema; results are computed per call */
#[derive(Debug, Clone, Copy)]
pub struct LayoutResolver<'a> {
  schema: &'a Schema,
}

impl<'a> LayoutResolver<'a> {
  pub fn new(schema: &'a Schema) -> Self {
    Self { schema }
  }

  pub fn schema(&self) -> &'a Schema {
    self.schema
  }

  pub fn field_type(&self, field: &Field) -> LayoutResult<FieldType> {
    catalog::classify(&field.name, &field.field_type, self.schema)
  }

  /* Indices were checked by classification */
  fn object(&self, index: usize) -> &'a Object {
    &self.schema.objects[index]
  }

  fn enum_def(&self, index: usize) -> &'a Enum {
    &self.schema.enums[index]
  }

  fn render(&self, full_name: &str, scope: Option<&[String]>) -> String {
    match scope {
      Some(scope) => qualified_name(full_name, scope),
      None => ident(split_name(full_name).1),
    }
  }

  pub fn size_of(&self, field: &Field) -> LayoutResult<u64> {
    Ok(match self.field_type(field)? {
      FieldType::Scalar(kind) | FieldType::Enum { repr: kind, .. } => kind.size(),
      FieldType::UnionTag(_) => ScalarKind::U8.size(),
      FieldType::Record(index) => {
        let object = self.object(index);
        if object.is_struct {
          object.byte_size()
        } else {
          INDIRECTION_WIDTH
        }
      }
      FieldType::String | FieldType::Union(_) | FieldType::Vector(_) => INDIRECTION_WIDTH,
    })
  }

  pub fn alignment_of(&self, field: &Field) -> LayoutResult<u64> {
    Ok(match self.field_type(field)? {
      FieldType::Scalar(kind) | FieldType::Enum { repr: kind, .. } => kind.info().alignment,
      FieldType::UnionTag(_) => ScalarKind::U8.info().alignment,
      FieldType::Record(index) => {
        let object = self.object(index);
        if object.is_struct {
          object.min_alignment()
        } else {
          INDIRECTION_WIDTH
        }
      }
      FieldType::String | FieldType::Union(_) | FieldType::Vector(_) => INDIRECTION_WIDTH,
    })
  }

  fn element_of(&self, field: &Field) -> LayoutResult<ElementType> {
    match self.field_type(field)? {
      FieldType::Vector(element) => Ok(element),
      other => Err(LayoutError::UnsupportedType {
        field: field.name.clone(),
        detail: format!("element layout requested for non-vector {:?}", other),
      }),
    }
  }

  pub fn element_size_of(&self, field: &Field) -> LayoutResult<u64> {
    Ok(match self.element_of(field)? {
      ElementType::Scalar(kind) | ElementType::Enum { repr: kind, .. } => kind.size(),
      ElementType::Record(index) if self.object(index).is_struct => self.object(index).byte_size(),
      ElementType::Record(_) | ElementType::String => INDIRECTION_WIDTH,
    })
  }

  pub fn element_alignment_of(&self, field: &Field) -> LayoutResult<u64> {
    Ok(match self.element_of(field)? {
      ElementType::Scalar(kind) | ElementType::Enum { repr: kind, .. } => kind.info().alignment,
      ElementType::Record(index) if self.object(index).is_struct => self.object(index).min_alignment(),
      ElementType::Record(_) | ElementType::String => INDIRECTION_WIDTH,
    })
  }

  fn element_name(&self, element: ElementType, scope: Option<&[String]>) -> String {
    match element {
      ElementType::Scalar(kind) => kind.type_name().to_string(),
      ElementType::Enum { index, .. } => self.render(&self.enum_def(index).name, scope),
      ElementType::String => catalog::STRING_TYPE_NAME.to_string(),
      ElementType::Record(index) => self.render(&self.object(index).name, scope),
    }
  }

  fn type_name(&self, field: &Field, scope: Option<&[String]>) -> LayoutResult<String> {
    Ok(match self.field_type(field)? {
      FieldType::Scalar(kind) => kind.type_name().to_string(),
      FieldType::Enum { index, .. } => self.render(&self.enum_def(index).name, scope),
      FieldType::UnionTag(index) => self.render(&tag_type_name(&self.enum_def(index).name), scope),
      FieldType::String => catalog::STRING_TYPE_NAME.to_string(),
      FieldType::Record(index) => {
        let object = self.object(index);
        let name = self.render(&object.name, scope);
        if object.is_struct {
          name
        } else {
          format!("Option<{}>", name)
        }
      }
      FieldType::Union(index) => format!("Option<{}>", self.render(&self.enum_def(index).name, scope)),
      FieldType::Vector(element) => format!("Vec<{}>", self.element_name(element, scope)),
    })
  }

  /* Bare definition names */
  pub fn type_name_of(&self, field: &Field) -> LayoutResult<String> {
    self.type_name(field, None)
  }

  /* Paths relative to the namespace `scope` */
  pub fn type_name_in(&self, field: &Field, scope: &[String]) -> LayoutResult<String> {
    self.type_name(field, Some(scope))
  }

  fn member_named(&self, e: &Enum, field: &Field, value: i64) -> LayoutResult<String> {
    e.value_named(value).map(|v| ident(&v.name)).ok_or_else(|| LayoutError::MissingEnumValue {
      enum_name: e.name.clone(),
      field: field.name.clone(),
      value,
    })
  }

  fn default(&self, field: &Field, scope: Option<&[String]>) -> LayoutResult<String> {
    Ok(match self.field_type(field)? {
      FieldType::Scalar(kind) => kind.literal(field.default_integer, field.default_real),
      FieldType::Enum { index, .. } => {
        let e = self.enum_def(index);
        let member = self.member_named(e, field, field.default_integer)?;
        format!("{}::{}", self.render(&e.name, scope), member)
      }
      FieldType::UnionTag(index) => {
        let e = self.enum_def(index);
        let member = self.member_named(e, field, 0)?;
        format!("{}::{}", self.render(&tag_type_name(&e.name), scope), member)
      }
      FieldType::Record(index) if self.object(index).is_struct => "Default::default()".to_string(),
      FieldType::Record(_) | FieldType::Union(_) => "None".to_string(),
      FieldType::Vector(_) => "Vec::new()".to_string(),
      FieldType::String => catalog::STRING_DEFAULT.to_string(),
    })
  }

  pub fn default_of(&self, field: &Field) -> LayoutResult<String> {
    self.default(field, None)
  }

  pub fn default_in(&self, field: &Field, scope: &[String]) -> LayoutResult<String> {
    self.default(field, Some(scope))
  }

  fn presence(&self, field: &Field, scope: Option<&[String]>, bind: Option<&str>) -> LayoutResult<String> {
    let name = ident(&field.name);
    let binding = |target: String| match bind {
      Some(b) => format!("let Some({}) = {}", b, target),
      None => format!("{}.is_some()", target),
    };

    Ok(match self.field_type(field)? {
      FieldType::Record(index) if self.object(index).is_struct => format!("self.{}.is_present()", name),
      FieldType::Scalar(ScalarKind::Bool) => {
        if field.default_integer != 0 {
          format!("!self.{}", name)
        } else {
          format!("self.{}", name)
        }
      }
      FieldType::String | FieldType::Vector(_) => format!("!self.{}.is_empty()", name),
      FieldType::Union(_) | FieldType::Record(_) => binding(format!("self.{}", name)),
      FieldType::UnionTag(_) => match bind {
        Some(b) => format!("let Some({}) = {}", b, name),
        None => format!("self.{}.is_some()", ident(union_field_name(&field.name))),
      },
      FieldType::Scalar(kind) if kind.is_float() && field.default_real.is_nan() => format!("!self.{}.is_nan()", name),
      FieldType::Scalar(_) | FieldType::Enum { .. } => format!("self.{} != {}", name, self.default(field, scope)?),
    })
  }

  pub fn presence_predicate(&self, field: &Field, bind: Option<&str>) -> LayoutResult<String> {
    self.presence(field, None, bind)
  }

  pub fn presence_predicate_in(&self, field: &Field, scope: &[String], bind: Option<&str>) -> LayoutResult<String> {
    self.presence(field, Some(scope), bind)
  }

  pub fn category(&self, field: &Field) -> LayoutResult<FieldCategory> {
    Ok(match self.field_type(field)? {
      FieldType::Scalar(_) => FieldCategory::Scalar,
      FieldType::Enum { .. } => FieldCategory::Enum,
      FieldType::UnionTag(_) => FieldCategory::UnionTag,
      FieldType::String => FieldCategory::String,
      FieldType::Record(index) if self.object(index).is_struct => FieldCategory::Struct,
      FieldType::Record(_) => FieldCategory::Table,
      FieldType::Union(_) => FieldCategory::Union,
      FieldType::Vector(ElementType::Scalar(_)) | FieldType::Vector(ElementType::Enum { .. }) => {
        FieldCategory::ScalarVector
      }
      FieldType::Vector(ElementType::String) => FieldCategory::StringVector,
      FieldType::Vector(ElementType::Record(index)) if self.object(index).is_struct => FieldCategory::StructVector,
      FieldType::Vector(ElementType::Record(_)) => FieldCategory::TableVector,
    })
  }

  pub fn is_fixed_size_record_field(&self, field: &Field) -> LayoutResult<bool> {
    Ok(self.category(field)? == FieldCategory::Struct)
  }

  pub fn is_string_field(&self, field: &Field) -> LayoutResult<bool> {
    Ok(self.category(field)? == FieldCategory::String)
  }

  pub fn is_union_field(&self, field: &Field) -> LayoutResult<bool> {
    Ok(self.category(field)? == FieldCategory::Union)
  }

  pub fn is_union_tag_field(&self, field: &Field) -> LayoutResult<bool> {
    Ok(self.category(field)? == FieldCategory::UnionTag)
  }

  pub fn is_vector_field(&self, field: &Field) -> LayoutResult<bool> {
    Ok(matches!(self.field_type(field)?, FieldType::Vector(_)))
  }

  pub fn is_scalar_element(&self, field: &Field) -> LayoutResult<bool> {
    Ok(self.category(field)? == FieldCategory::ScalarVector)
  }

  pub fn is_string_element(&self, field: &Field) -> LayoutResult<bool> {
    Ok(self.category(field)? == FieldCategory::StringVector)
  }

  pub fn is_fixed_size_record_element(&self, field: &Field) -> LayoutResult<bool> {
    Ok(self.category(field)? == FieldCategory::StructVector)
  }

  pub fn record_alignment(&self, record: &Object) -> LayoutResult<u64> {
    let mut max = None;
    for field in &record.fields {
      let alignment = self.alignment_of(field)?;
      max = Some(max.map_or(alignment, |m: u64| m.max(alignment)));
    }
    max.ok_or_else(|| LayoutError::EmptyRecord { record: record.name.clone() })
  }

  pub fn table_alignment(&self, table: &Object) -> LayoutResult<u64> {
    if table.fields.is_empty() {
      Ok(FIELDLESS_TABLE_ALIGNMENT)
    } else {
      self.record_alignment(table)
    }
  }

  /* Stable: equal (alignment, size) keys keep declaration order */
  pub fn fields_by_alignment<'r>(&self, record: &'r Object) -> LayoutResult<Vec<&'r Field>> {
    let mut keyed = Vec::with_capacity(record.fields.len());
    for field in &record.fields {
      keyed.push(((self.alignment_of(field)?, self.size_of(field)?), field));
    }
    keyed.sort_by(|(a, _), (b, _)| b.cmp(a));
    Ok(keyed.into_iter().map(|(_, field)| field).collect())
  }

  pub fn fields_by_offset<'r>(&self, record: &'r Object) -> Vec<&'r Field> {
    let mut fields: Vec<&Field> = record.fields.iter().collect();
    fields.sort_by_key(|f| f.offset);
    fields
  }
}
