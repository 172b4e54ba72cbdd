/* Generate command - render one builder source file per schema */

use super::trailing_mode;
use anyhow::Context;
use cfb_gen::{Generator, GeneratorOptions};
use std::path::PathBuf;
use tracing::{debug, info};

pub fn run(
    schema_path: PathBuf,
    output_dir: Option<PathBuf>,
    no_trailing_padding: bool,
    runtime_crate: String,
) -> anyhow::Result<()> {
    let options = GeneratorOptions {
        output_dir,
        runtime_crate,
        trailing_padding: trailing_mode(no_trailing_padding),
        ..GeneratorOptions::default()
    };
    debug!(?options, "generator options");

    let schema = cfb_schema::load(&schema_path)
        .with_context(|| format!("loading schema {}", schema_path.display()))?;
    info!(
        path = %schema_path.display(),
        objects = schema.objects.len(),
        enums = schema.enums.len(),
        "loaded schema"
    );

    let generator = Generator::new(options);
    let written = generator
        .generate(&schema, &schema_path)
        .with_context(|| format!("generating builders for {}", schema_path.display()))?;

    println!("{}", written.display());
    Ok(())
}
