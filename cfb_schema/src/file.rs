use crate::types::Schema;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/* ============================================================================
   Schema File Loading
   ============================================================================ */

/// Result alias used by the schema loader.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors raised while reading a decoded schema graph from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read schema '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but did not decode as JSON.
    #[error("failed to parse JSON schema '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file was read but did not decode as YAML.
    #[error("failed to parse YAML schema '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    /// The input is a format this loader does not decode.
    #[error("unsupported schema format '{}': {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },
}

/* Input encodings the loader understands */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Yaml,
}

impl SchemaFormat {
    /* Pick the decoder from the file extension */
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("json") => Ok(SchemaFormat::Json),
            Some("yaml") | Some("yml") => Ok(SchemaFormat::Yaml),
            Some("bfbs") => Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: "binary schema containers must be decoded to JSON first \
                         (flatc --json --strict-json --raw-binary reflection.fbs -- <file>.bfbs)"
                    .to_string(),
            }),
            Some(other) => Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: format!("unknown extension '.{}'", other),
            }),
            None => Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: "missing file extension".to_string(),
            }),
        }
    }
}

/* Decode a schema held in memory */
pub fn parse_str(content: &str, format: SchemaFormat, origin: &Path) -> LoadResult<Schema> {
    match format {
        SchemaFormat::Json => serde_json::from_str(content).map_err(|source| LoadError::Json {
            path: origin.to_path_buf(),
            source,
        }),
        SchemaFormat::Yaml => serde_yml::from_str(content).map_err(|source| LoadError::Yaml {
            path: origin.to_path_buf(),
            source,
        }),
    }
}

/* Load a decoded schema graph, dispatching on the file extension */
pub fn load<P: AsRef<Path>>(path: P) -> LoadResult<Schema> {
    let path = path.as_ref();
    let format = SchemaFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&content, format, path)
}
