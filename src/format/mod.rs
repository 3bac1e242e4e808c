//! Document formats: reading files into the block model and writing it back.
//!
//! # Example
//!
//! ```no_run
//! use amendoc::format::FormatRegistry;
//! use amendoc::style::resolve_default;
//! use std::path::Path;
//!
//! fn main() -> amendoc::Result<()> {
//!     let registry = FormatRegistry::with_defaults();
//!     let doc = registry.read(Path::new("contract1.docx"))?;
//!     registry.write(&doc, &resolve_default(&doc), Path::new("copy.docx"))?;
//!     Ok(())
//! }
//! ```

mod docx;
mod text;

pub use docx::DocxFormat;
pub use text::TextFormat;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::Document;
use crate::style::StyleProfile;

/// A file format the pipeline can read and write.
///
/// Implement this trait to add support for a new document format.
pub trait DocumentFormat: Send + Sync {
    /// File extensions handled by this format.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["docx"]`).
    fn extensions(&self) -> &[&str];

    /// Name of this format.
    fn name(&self) -> &str;

    /// Parse a document from bytes.
    fn read_bytes(&self, bytes: &[u8]) -> Result<Document>;

    /// Serialize a document.
    ///
    /// `profile` fills formatting the document leaves unset.
    fn to_bytes(&self, doc: &Document, profile: &StyleProfile) -> Result<Vec<u8>>;

    /// Read a document from a file.
    fn read(&self, path: &Path) -> Result<Document> {
        let bytes = std::fs::read(path)?;
        self.read_bytes(&bytes)
    }

    /// Write a document to a file.
    fn write(&self, doc: &Document, profile: &StyleProfile, path: &Path) -> Result<()> {
        let bytes = self.to_bytes(doc, profile)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Plain text of a file, blocks separated by a blank line.
    fn extract_text(&self, path: &Path) -> Result<String> {
        Ok(self.read(path)?.plain_text())
    }

    /// Check if this format handles the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry mapping file extensions to formats.
pub struct FormatRegistry {
    formats: HashMap<String, Arc<dyn DocumentFormat>>,
    by_name: HashMap<String, Arc<dyn DocumentFormat>>,
}

impl FormatRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            formats: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with DOCX and plain text.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DocxFormat::new()));
        registry.register(Arc::new(TextFormat::new()));
        registry
    }

    /// Register a format for all its extensions.
    pub fn register(&mut self, format: Arc<dyn DocumentFormat>) {
        for ext in format.extensions() {
            self.formats.insert(ext.to_lowercase(), format.clone());
        }
        self.by_name.insert(format.name().to_lowercase(), format);
    }

    /// Get a format by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentFormat>> {
        self.formats.get(&ext.to_lowercase()).cloned()
    }

    /// Get a format by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentFormat>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.formats.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.formats.keys().map(|s| s.as_str()).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Format for a path, chosen by its extension.
    pub fn for_path(&self, path: &Path) -> Result<Arc<dyn DocumentFormat>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                Error::UnsupportedFormat(format!("{} has no file extension", path.display()))
            })?;

        self.get_by_extension(ext)
            .ok_or_else(|| Error::UnsupportedFormat(format!("no format for .{}", ext)))
    }

    /// Read a file with the format its extension selects.
    pub fn read(&self, path: &Path) -> Result<Document> {
        self.for_path(path)?.read(path)
    }

    /// Write a file with the format its extension selects.
    pub fn write(&self, doc: &Document, profile: &StyleProfile, path: &Path) -> Result<()> {
        self.for_path(path)?.write(doc, profile, path)
    }

    /// Extract the plain text of a file.
    pub fn extract_text(&self, path: &Path) -> Result<String> {
        self.for_path(path)?.extract_text(path)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_with_defaults() {
        let registry = FormatRegistry::with_defaults();
        assert!(registry.supports("docx"));
        assert!(registry.supports("DOCX"));
        assert!(registry.supports("txt"));
        assert!(!registry.supports("pdf"));
        assert_eq!(registry.supported_extensions(), vec!["docx", "text", "txt"]);
    }

    #[test]
    fn test_registry_get_by_name() {
        let registry = FormatRegistry::with_defaults();
        assert_eq!(registry.get_by_name("DOCX").unwrap().name(), "docx");
        assert!(registry.get_by_name("odt").is_none());
    }

    #[test]
    fn test_for_path_errors() {
        let registry = FormatRegistry::with_defaults();
        assert!(matches!(
            registry.for_path(Path::new("contract.pdf")),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            registry.for_path(Path::new("README")),
            Err(Error::UnsupportedFormat(_))
        ));
        assert_eq!(
            registry.for_path(Path::new("a/Contract1.DOCX")).unwrap().name(),
            "docx"
        );
    }
}
