use crate::codegen::rust_gen::helpers::{const_suffix, emit_doc_comments};
use crate::error::{LayoutError, LayoutResult};
use crate::layout::catalog::{ident, FieldType};
use crate::layout::namespace::split_name;
use crate::layout::resolver::{qualified_name, union_field_name, vtable_offset, FieldCategory, LayoutResolver};
use cfb_schema::{Field, Object};
use tracing::debug;

/* Declared default differs from the type's own `Default` */
fn overrides_default(resolver: &LayoutResolver<'_>, field: &Field) -> LayoutResult<bool> {
  Ok(match resolver.category(field)? {
    FieldCategory::Scalar | FieldCategory::Enum => field.default_integer != 0 || field.default_real != 0.0,
    _ => false,
  })
}

struct TableEmitter<'r, 'a> {
  resolver: &'r LayoutResolver<'a>,
  object: &'r Object,
  scope: &'r [String],
  name: &'r str,
}

impl TableEmitter<'_, '_> {
  fn live_fields(&self) -> Vec<&Field> {
    let mut fields: Vec<&Field> = self.object.fields.iter().filter(|f| !f.deprecated).collect();
    fields.sort_by_key(|f| f.id);
    fields
  }

  fn emit_definition(&self, out: &mut String, fields: &[&Field]) -> LayoutResult<()> {
    let mut members = Vec::new();
    for field in fields {
      if self.resolver.category(field)? != FieldCategory::UnionTag {
        members.push(*field);
      }
    }

    let mut manual_default = false;
    for field in &members {
      manual_default |= overrides_default(self.resolver, field)?;
    }

    emit_doc_comments(out, &self.object.documentation, 0);
    if manual_default {
      out.push_str("#[derive(Clone, Debug, PartialEq)]\n");
    } else {
      out.push_str("#[derive(Default, Clone, Debug, PartialEq)]\n");
    }
    out.push_str(&format!("pub struct {} {{\n", self.name));
    for field in &members {
      emit_doc_comments(out, &field.documentation, 1);
      out.push_str(&format!(
        "    pub {}: {},\n",
        ident(&field.name),
        self.resolver.type_name_in(field, self.scope)?
      ));
    }
    out.push_str("}\n\n");

    if manual_default {
      out.push_str(&format!("impl Default for {} {{\n", self.name));
      out.push_str("    fn default() -> Self {\n");
      out.push_str(&format!("        {} {{\n", self.name));
      for field in &members {
        out.push_str(&format!(
          "            {}: {},\n",
          ident(&field.name),
          self.resolver.default_in(field, self.scope)?
        ));
      }
      out.push_str("        }\n");
      out.push_str("    }\n");
      out.push_str("}\n\n");
    }
    Ok(())
  }

  fn emit_constants(&self, out: &mut String, fields: &[&Field]) -> LayoutResult<()> {
    out.push_str(&format!("impl {} {{\n", self.name));
    for field in fields {
      let suffix = const_suffix(&field.name);
      out.push_str(&format!("    const VT_{}: usize = {};\n", suffix, vtable_offset(field.id)));
      out.push_str(&format!("    const SIZE_{}: usize = {};\n", suffix, self.resolver.size_of(field)?));
      out.push_str(&format!("    const ALIGNMENT_{}: usize = {};\n", suffix, self.resolver.alignment_of(field)?));
    }
    out.push_str(&format!("    const ALIGNMENT: usize = {};\n", self.resolver.table_alignment(self.object)?));
    out.push_str("}\n\n");
    Ok(())
  }

  /* Reserve the uoffset slot and attach `component` to it */
  fn push_reference(&self, out: &mut String, field: &Field, component: &str) {
    let suffix = const_suffix(&field.name);
    out.push_str(&format!("            builder.align(Self::ALIGNMENT_{});\n", suffix));
    out.push_str("            let offset_position = builder.tell();\n");
    out.push_str(&format!("            builder.pad(Self::SIZE_{});\n", suffix));
    out.push_str("            builder.push_component(DesignatedComponent::new(\n");
    out.push_str("                offset_position,\n");
    out.push_str(&format!("                {},\n", component));
    out.push_str("            ));\n");
  }

  fn emit_push(&self, out: &mut String, field: &Field) -> LayoutResult<()> {
    let member = ident(&field.name);
    let suffix = const_suffix(&field.name);
    let category = self.resolver.category(field)?;

    match category {
      FieldCategory::Scalar | FieldCategory::Enum | FieldCategory::Struct => {
        out.push_str(&format!("        if {} {{\n", self.resolver.presence_predicate_in(field, self.scope, None)?));
        out.push_str(&format!("            builder.align(Self::ALIGNMENT_{});\n", suffix));
        out.push_str(&format!("            builder.push_scalar(self.{});\n", member));
      }
      FieldCategory::String => {
        out.push_str(&format!("        if {} {{\n", self.resolver.presence_predicate_in(field, self.scope, None)?));
        self.push_reference(out, field, &format!("Box::new(StringComponent::new(self.{}))", member));
      }
      FieldCategory::ScalarVector | FieldCategory::StructVector => {
        let alignment = self.resolver.element_alignment_of(field)?;
        out.push_str(&format!("        if {} {{\n", self.resolver.presence_predicate_in(field, self.scope, None)?));
        self.push_reference(out, field, &format!("Box::new(ScalarVectorComponent::new(self.{}, {}))", member, alignment));
      }
      FieldCategory::StringVector | FieldCategory::TableVector => {
        out.push_str(&format!("        if {} {{\n", self.resolver.presence_predicate_in(field, self.scope, None)?));
        if category == FieldCategory::StringVector {
          out.push_str(&format!("            let children = self.{}.into_iter().map(StringComponent::new);\n", member));
        } else {
          out.push_str(&format!("            let children = self.{}.into_iter();\n", member));
        }
        self.push_reference(out, field, "Box::new(ReferenceVectorComponent::new(children))");
      }
      FieldCategory::Table => {
        out.push_str(&format!("        if {} {{\n", self.resolver.presence_predicate_in(field, self.scope, Some("f"))?));
        self.push_reference(out, field, "Box::new(f)");
      }
      FieldCategory::Union => {
        let union_def = match self.resolver.field_type(field)? {
          FieldType::Union(index) => &self.resolver.schema().enums[index],
          other => {
            return Err(LayoutError::UnsupportedType {
              field: field.name.clone(),
              detail: format!("{:?} classified as a union", other),
            })
          }
        };
        let path = qualified_name(&union_def.name, self.scope);
        out.push_str(&format!("        if {} {{\n", self.resolver.presence_predicate_in(field, self.scope, Some("f"))?));
        out.push_str(&format!("            builder.align(Self::ALIGNMENT_{});\n", suffix));
        out.push_str("            let offset_position = builder.tell();\n");
        out.push_str(&format!("            builder.pad(Self::SIZE_{});\n", suffix));
        out.push_str("            let component: Box<dyn Component<'c> + 'c> = match f {\n");
        for value in union_def.values.iter().filter(|v| v.value != 0) {
          out.push_str(&format!("                {}::{}(v) => Box::new(v),\n", path, ident(&value.name)));
        }
        out.push_str("            };\n");
        out.push_str("            builder.push_component(DesignatedComponent::new(offset_position, component));\n");
      }
      FieldCategory::UnionTag => {
        out.push_str(&format!("        if {} {{\n", self.resolver.presence_predicate_in(field, self.scope, Some("f"))?));
        out.push_str(&format!("            builder.align(Self::ALIGNMENT_{});\n", suffix));
        out.push_str("            builder.push_scalar(f);\n");
      }
    }
    out.push_str("        }\n");
    Ok(())
  }

  fn emit_component(&self, out: &mut String, fields: &[&Field]) -> LayoutResult<()> {
    let mut ordered = Vec::new();
    for field in self.resolver.fields_by_alignment(self.object)? {
      if !field.deprecated {
        ordered.push(field);
      }
    }

    out.push_str(&format!("impl<'c> Component<'c> for {} {{\n", self.name));
    out.push_str("    fn build(self: Box<Self>, builder: &mut Builder<'c>) -> usize {\n");
    out.push_str("        let vtable_start = {\n");
    out.push_str("            let mut vtable = builder.start_vtable();\n");
    for field in &ordered {
      let suffix = const_suffix(&field.name);
      out.push_str(&format!("            if {} {{\n", self.resolver.presence_predicate_in(field, self.scope, None)?));
      out.push_str(&format!(
        "                vtable.add_field(Self::VT_{0}, Self::SIZE_{0}, Self::ALIGNMENT_{0});\n",
        suffix
      ));
      out.push_str("            }\n");
    }
    out.push_str("            vtable.finish()\n");
    out.push_str("        };\n\n");
    out.push_str("        builder.align_after(SIZE_OF_SOFFSET, Self::ALIGNMENT);\n\n");
    out.push_str("        let table_start = builder.tell();\n");
    out.push_str("        builder.push_scalar((table_start - vtable_start) as SOffset);\n");

    /* Tags are read before their payload is moved out of `self` */
    for field in fields {
      if self.resolver.category(field)? == FieldCategory::UnionTag {
        out.push_str(&format!(
          "        let {} = self.{}.as_ref().map(|v| v.union_type());\n",
          ident(&field.name),
          ident(union_field_name(&field.name))
        ));
      }
    }

    for field in &ordered {
      self.emit_push(out, field)?;
    }
    out.push('\n');
    out.push_str("        table_start\n");
    out.push_str("    }\n");
    out.push_str("}\n");
    Ok(())
  }
}

/* Table builder struct, its vtable constants and its `Component` impl */
pub fn emit_table(resolver: &LayoutResolver<'_>, object: &Object, scope: &[String]) -> LayoutResult<String> {
  let name = ident(split_name(&object.name).1);
  let emitter = TableEmitter { resolver, object, scope, name: &name };
  let fields = emitter.live_fields();

  let mut out = String::new();
  emitter.emit_definition(&mut out, &fields)?;
  emitter.emit_constants(&mut out, &fields)?;
  emitter.emit_component(&mut out, &fields)?;

  debug!(record = %object.name, fields = fields.len(), "emitted table");
  Ok(out)
}
