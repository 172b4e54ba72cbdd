use serde_derive::{Deserialize, Serialize};

/* Base kinds as named by the reflection schema (reflection.fbs) */
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub enum BaseType {
    #[default]
    None,
    UType,
    Bool,
    Byte,
    UByte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    String,
    Vector,
    Obj,
    Union,
    Array,
    Vector64,
}

impl BaseType {
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            BaseType::UType
                | BaseType::Bool
                | BaseType::Byte
                | BaseType::UByte
                | BaseType::Short
                | BaseType::UShort
                | BaseType::Int
                | BaseType::UInt
                | BaseType::Long
                | BaseType::ULong
                | BaseType::Float
                | BaseType::Double
        )
    }
}

fn no_index() -> i32 {
    -1
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(default)]
pub struct Type {
    pub base_type: BaseType,
    pub element: BaseType,
    #[serde(default = "no_index")]
    pub index: i32,
    pub fixed_length: u16,
}

impl Default for Type {
    fn default() -> Self {
        Self {
            base_type: BaseType::None,
            element: BaseType::None,
            index: -1,
            fixed_length: 0,
        }
    }
}

impl Type {
    pub fn new(base_type: BaseType) -> Self {
        Self {
            base_type,
            ..Self::default()
        }
    }

    pub fn with_index(base_type: BaseType, index: usize) -> Self {
        Self {
            base_type,
            index: index as i32,
            ..Self::default()
        }
    }

    pub fn vector_of(element: BaseType, index: Option<usize>) -> Self {
        Self {
            base_type: BaseType::Vector,
            element,
            index: index.map(|i| i as i32).unwrap_or(-1),
            fixed_length: 0,
        }
    }

    /* Index into the schema's objects or enums, if the descriptor carries one */
    pub fn type_index(&self) -> Option<usize> {
        usize::try_from(self.index).ok()
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(default)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: Type,
    pub id: u16,
    pub offset: u16,
    pub default_integer: i64,
    pub default_real: f64,
    pub deprecated: bool,
    pub required: bool,
    pub key: bool,
    pub documentation: Vec<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: Type) -> Self {
        Self {
            name: name.into(),
            field_type,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn at(mut self, id: u16, offset: u16) -> Self {
        self.id = id;
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn with_default_integer(mut self, value: i64) -> Self {
        self.default_integer = value;
        self
    }

    #[must_use]
    pub fn with_default_real(mut self, value: f64) -> Self {
        self.default_real = value;
        self
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(default)]
pub struct Object {
    pub name: String,
    pub fields: Vec<Field>,
    pub is_struct: bool,
    pub minalign: i32,
    pub bytesize: i32,
    pub documentation: Vec<String>,
}

impl Object {
    pub fn table(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
            ..Self::default()
        }
    }

    pub fn fixed(name: impl Into<String>, fields: Vec<Field>, bytesize: u32, minalign: u32) -> Self {
        Self {
            name: name.into(),
            fields,
            is_struct: true,
            minalign: minalign as i32,
            bytesize: bytesize as i32,
            documentation: Vec::new(),
        }
    }

    pub fn is_fixed_size(&self) -> bool {
        self.is_struct
    }

    /* Only meaningful for structs; tables report 0 */
    pub fn byte_size(&self) -> u64 {
        u64::try_from(self.bytesize).unwrap_or(0)
    }

    pub fn min_alignment(&self) -> u64 {
        u64::try_from(self.minalign).unwrap_or(0)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(default)]
pub struct EnumVal {
    pub name: String,
    pub value: i64,
    pub union_type: Option<Type>,
    pub documentation: Vec<String>,
}

impl EnumVal {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            ..Self::default()
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(default)]
pub struct Enum {
    pub name: String,
    pub values: Vec<EnumVal>,
    pub is_union: bool,
    pub underlying_type: Type,
    pub documentation: Vec<String>,
}

impl Enum {
    pub fn new(name: impl Into<String>, underlying: BaseType, values: Vec<EnumVal>) -> Self {
        Self {
            name: name.into(),
            values,
            is_union: false,
            underlying_type: Type::new(underlying),
            documentation: Vec::new(),
        }
    }

    pub fn union(name: impl Into<String>, values: Vec<EnumVal>) -> Self {
        Self {
            name: name.into(),
            values,
            is_union: true,
            underlying_type: Type::new(BaseType::UType),
            documentation: Vec::new(),
        }
    }

    pub fn value_named(&self, value: i64) -> Option<&EnumVal> {
        self.values.iter().find(|v| v.value == value)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(default)]
pub struct Schema {
    pub objects: Vec<Object>,
    pub enums: Vec<Enum>,
    pub file_ident: Option<String>,
    pub file_ext: Option<String>,
}

impl Schema {
    pub fn new(objects: Vec<Object>, enums: Vec<Enum>) -> Self {
        Self {
            objects,
            enums,
            file_ident: None,
            file_ext: None,
        }
    }

    pub fn object(&self, index: usize) -> Option<&Object> {
        self.objects.get(index)
    }

    pub fn enum_at(&self, index: usize) -> Option<&Enum> {
        self.enums.get(index)
    }

    pub fn object_named(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn enum_named(&self, name: &str) -> Option<&Enum> {
        self.enums.iter().find(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_index_defaults_to_none() {
        let ty: Type = serde_json::from_str(r#"{ "base_type": "Int" }"#).unwrap();
        assert_eq!(ty.base_type, BaseType::Int);
        assert_eq!(ty.element, BaseType::None);
        assert_eq!(ty.type_index(), None);
    }

    #[test]
    fn test_field_type_uses_reflection_key() {
        let field: Field = serde_json::from_str(
            r#"{ "name": "hp", "type": { "base_type": "UShort" }, "id": 2, "offset": 8, "default_integer": 100 }"#,
        )
        .unwrap();
        assert_eq!(field.name, "hp");
        assert_eq!(field.field_type.base_type, BaseType::UShort);
        assert_eq!(field.offset, 8);
        assert_eq!(field.default_integer, 100);
        assert!(!field.deprecated);
    }

    #[test]
    fn test_struct_object_sizes() {
        let object = Object::fixed("example.Vec3", vec![], 24, 8);
        assert!(object.is_fixed_size());
        assert_eq!(object.byte_size(), 24);
        assert_eq!(object.min_alignment(), 8);

        let table = Object::table("example.Monster", vec![]);
        assert!(!table.is_fixed_size());
        assert_eq!(table.byte_size(), 0);
    }

    #[test]
    fn test_enum_value_lookup() {
        let e = Enum::new(
            "example.Color",
            BaseType::Byte,
            vec![EnumVal::new("A", 1), EnumVal::new("B", 0), EnumVal::new("C", 2)],
        );
        assert_eq!(e.value_named(0).map(|v| v.name.as_str()), Some("B"));
        assert!(e.value_named(7).is_none());
    }
}
