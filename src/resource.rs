//! Resource resolution
//!
//! Documents are named by a logical source path. A [`ResourceResolver`]
//! turns that path into bytes; the compositor itself never touches the
//! filesystem or any global registry.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::ParseError;

/// File extensions of raster formats, which cannot be composited
const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

const BOM: &str = "\u{feff}";

/// Errors that can occur while locating a document
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("resource '{id}' not found")]
    Missing { id: String },

    #[error("'{source_path}' is a .{extension} raster image; only SVG documents are supported")]
    UnsupportedFormat {
        source_path: String,
        extension: String,
    },

    #[error("failed to read resource '{id}': {error}")]
    Io {
        id: String,
        #[source]
        error: io::Error,
    },
}

/// Resolve a logical source path to document bytes
pub trait ResourceResolver {
    fn resolve(&self, source: &str) -> Result<Vec<u8>, ResourceError>;
}

impl<F> ResourceResolver for F
where
    F: Fn(&str) -> Option<Vec<u8>>,
{
    fn resolve(&self, source: &str) -> Result<Vec<u8>, ResourceError> {
        self(source).ok_or_else(|| ResourceError::Missing {
            id: source.to_string(),
        })
    }
}

/// The logical id of `source` within `namespace`: `"{namespace}.{source}"`
pub fn logical_id(namespace: &str, source: &str) -> String {
    format!("{}.{}", namespace, source)
}

/// In-memory resources keyed by logical id
#[derive(Debug, Clone, Default)]
pub struct EmbeddedResources {
    namespace: String,
    entries: HashMap<String, Vec<u8>>,
}

impl EmbeddedResources {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entries: HashMap::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Register `bytes` under `source`, relative to this namespace
    pub fn insert(&mut self, source: &str, bytes: impl Into<Vec<u8>>) {
        self.entries
            .insert(logical_id(&self.namespace, source), bytes.into());
    }

    pub fn with(mut self, source: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(source, bytes);
        self
    }
}

impl ResourceResolver for EmbeddedResources {
    fn resolve(&self, source: &str) -> Result<Vec<u8>, ResourceError> {
        let id = logical_id(&self.namespace, source);
        self.entries
            .get(&id)
            .cloned()
            .ok_or(ResourceError::Missing { id })
    }
}

/// Resources read from files below a root directory
#[derive(Debug, Clone)]
pub struct FsResources {
    root: PathBuf,
}

impl FsResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceResolver for FsResources {
    fn resolve(&self, source: &str) -> Result<Vec<u8>, ResourceError> {
        let path = self.root.join(source);
        std::fs::read(&path).map_err(|error| {
            let id = path.display().to_string();
            if error.kind() == io::ErrorKind::NotFound {
                ResourceError::Missing { id }
            } else {
                ResourceError::Io { id, error }
            }
        })
    }
}

/// Reject sources that name a raster image, before anything is read.
pub fn check_vector_source(source: &str) -> Result<(), ResourceError> {
    let extension = Path::new(source)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension {
        Some(ext) if RASTER_EXTENSIONS.contains(&ext.as_str()) => {
            Err(ResourceError::UnsupportedFormat {
                source_path: source.to_string(),
                extension: ext,
            })
        }
        _ => Ok(()),
    }
}

/// Decode document bytes as UTF-8, dropping a leading byte-order mark
pub fn decode_document(bytes: Vec<u8>) -> Result<String, ParseError> {
    let text = String::from_utf8(bytes).map_err(|err| ParseError::Encoding {
        offset: err.utf8_error().valid_up_to(),
    })?;

    match text.strip_prefix(BOM) {
        Some(rest) => Ok(rest.to_string()),
        None => Ok(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_lookup_uses_namespace() {
        let resources = EmbeddedResources::new("App").with("Images.logo.svg", "<svg/>");
        assert_eq!(resources.resolve("Images.logo.svg").unwrap(), b"<svg/>");
    }

    #[test]
    fn test_embedded_missing_reports_logical_id() {
        let resources = EmbeddedResources::new("App");
        match resources.resolve("nope.svg") {
            Err(ResourceError::Missing { id }) => assert_eq!(id, "App.nope.svg"),
            other => panic!("expected missing resource, got {:?}", other),
        }
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |source: &str| (source == "a.svg").then(|| b"<svg/>".to_vec());
        assert!(resolver.resolve("a.svg").is_ok());
        assert!(matches!(
            resolver.resolve("b.svg"),
            Err(ResourceError::Missing { .. })
        ));
    }

    #[test]
    fn test_fs_missing_file() {
        let resources = FsResources::new(std::env::temp_dir());
        let result = resources.resolve("svg-layers-definitely-missing-file.svg");
        assert!(matches!(result, Err(ResourceError::Missing { .. })));
    }

    #[test]
    fn test_fs_reads_file() {
        let dir = std::env::temp_dir();
        let name = format!("svg-layers-resource-{}.svg", std::process::id());
        std::fs::write(dir.join(&name), "<svg/>").unwrap();

        let resources = FsResources::new(&dir);
        assert_eq!(resources.resolve(&name).unwrap(), b"<svg/>");

        std::fs::remove_file(dir.join(&name)).unwrap();
    }

    #[test]
    fn test_raster_sources_rejected() {
        assert!(check_vector_source("icons/logo.png").is_err());
        assert!(check_vector_source("icons/photo.JPG").is_err());
        match check_vector_source("a.webp") {
            Err(ResourceError::UnsupportedFormat { extension, .. }) => assert_eq!(extension, "webp"),
            other => panic!("expected unsupported format, got {:?}", other),
        }
    }

    #[test]
    fn test_vector_sources_accepted() {
        assert!(check_vector_source("icons/logo.svg").is_ok());
        assert!(check_vector_source("Images.logo.svg").is_ok());
        assert!(check_vector_source("no_extension").is_ok());
    }

    #[test]
    fn test_decode_strips_bom() {
        let mut bytes = "\u{feff}".as_bytes().to_vec();
        bytes.extend_from_slice(b"<svg/>");
        assert_eq!(decode_document(bytes).unwrap(), "<svg/>");
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let result = decode_document(vec![b'<', b's', 0xff, b'>']);
        assert_eq!(result, Err(ParseError::Encoding { offset: 2 }));
    }
}
