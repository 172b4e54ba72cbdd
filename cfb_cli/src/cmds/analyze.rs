/* Analyze command - print resolved record layouts */

use super::trailing_mode;
use anyhow::Context;
use cfb_gen::layout::padding::{pad_struct, TrailingPadding};
use cfb_gen::layout::{vtable_offset, LayoutResolver};
use cfb_schema::{Object, Schema};
use std::fmt::Write;
use std::path::PathBuf;

pub fn run(schema_path: PathBuf, no_trailing_padding: bool) -> anyhow::Result<()> {
    let schema = cfb_schema::load(&schema_path)
        .with_context(|| format!("loading schema {}", schema_path.display()))?;
    let report = render_report(&schema, trailing_mode(no_trailing_padding))
        .with_context(|| format!("analyzing {}", schema_path.display()))?;
    print!("{}", report);
    Ok(())
}

fn render_struct(
    resolver: &LayoutResolver<'_>,
    object: &Object,
    trailing: TrailingPadding,
    out: &mut String,
) -> anyhow::Result<()> {
    let layout = pad_struct(resolver, object, trailing)?;
    writeln!(
        out,
        "struct {} (size {}, align {}, {} filler(s))",
        object.name,
        object.byte_size(),
        object.min_alignment(),
        layout.filler_count()
    )?;
    for padded in &layout.fields {
        for filler in &padded.fillers {
            writeln!(out, "    {:<16} {:>3}  filler", filler.name(), filler.width.type_name())?;
        }
        writeln!(
            out,
            "    {:<16} {:>3}  @{} size {} align {}",
            padded.field.name,
            resolver.type_name_of(padded.field)?,
            padded.field.offset,
            resolver.size_of(padded.field)?,
            resolver.alignment_of(padded.field)?
        )?;
    }
    for filler in &layout.trailing {
        writeln!(out, "    {:<16} {:>3}  trailing filler", filler.name(), filler.width.type_name())?;
    }
    Ok(())
}

fn render_table(resolver: &LayoutResolver<'_>, object: &Object, out: &mut String) -> anyhow::Result<()> {
    writeln!(out, "table {} (align {})", object.name, resolver.table_alignment(object)?)?;
    for field in resolver.fields_by_alignment(object)? {
        let note = if field.deprecated { "  deprecated" } else { "" };
        writeln!(
            out,
            "    {:<16} {}  vt {} size {} align {} {:?}{}",
            field.name,
            resolver.type_name_of(field)?,
            vtable_offset(field.id),
            resolver.size_of(field)?,
            resolver.alignment_of(field)?,
            resolver.category(field)?,
            note
        )?;
    }
    Ok(())
}

pub fn render_report(schema: &Schema, trailing: TrailingPadding) -> anyhow::Result<String> {
    let resolver = LayoutResolver::new(schema);
    let mut out = String::new();
    for object in &schema.objects {
        if object.is_struct {
            render_struct(&resolver, object, trailing, &mut out)?;
        } else {
            render_table(&resolver, object, &mut out)?;
        }
    }
    Ok(out)
}
