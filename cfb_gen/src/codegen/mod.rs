pub mod rust;
pub mod rust_gen;

use crate::error::{LayoutError, LayoutResult};
use crate::layout::{Namespace, TrailingPadding};
use cfb_schema::Schema;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_SUFFIX: &str = "_builder.rs";
pub const DEFAULT_RUNTIME_CRATE: &str = "cfb";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
  /* Defaults to the schema file's directory */
  pub output_dir: Option<PathBuf>,
  pub suffix: String,
  /* Crate path used in the emitted `use` lines */
  pub runtime_crate: String,
  pub trailing_padding: TrailingPadding,
}

impl Default for GeneratorOptions {
  fn default() -> Self {
    Self {
      output_dir: None,
      suffix: DEFAULT_SUFFIX.to_string(),
      runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
      trailing_padding: TrailingPadding::default(),
    }
  }
}

pub struct Generator {
  options: GeneratorOptions,
}

impl Generator {
  pub fn new(options: GeneratorOptions) -> Self {
    Self { options }
  }

  pub fn options(&self) -> &GeneratorOptions {
    &self.options
  }

  /* `<dir>/<stem><suffix>`, the stem being the file name minus its last extension */
  pub fn output_path(&self, input: &Path) -> PathBuf {
    let dir = match &self.options.output_dir {
      Some(dir) => dir.clone(),
      None => match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
      },
    };
    let stem = input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    dir.join(format!("{}{}", stem, self.options.suffix))
  }

  pub fn render(&self, schema: &Schema) -> LayoutResult<String> {
    let root = Namespace::build(schema)?;
    info!(objects = schema.objects.len(), enums = schema.enums.len(), "built namespace tree");
    rust::RustCodeGenerator::new(schema, &self.options).emit_code(&root)
  }

  /* Render fully, then write; a failed render leaves no file behind */
  pub fn generate(&self, schema: &Schema, input: &Path) -> LayoutResult<PathBuf> {
    let code = self.render(schema)?;
    let path = self.output_path(input);

    if let Some(dir) = path.parent() {
      fs::create_dir_all(dir).map_err(|source| LayoutError::Io { path: dir.to_path_buf(), source })?;
    }
    fs::write(&path, code).map_err(|source| LayoutError::Io { path: path.clone(), source })?;

    info!(path = %path.display(), "wrote builder source");
    Ok(path)
  }
}
