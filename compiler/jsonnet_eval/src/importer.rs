//! Import resolution capability.

/// A resolved import.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportedFile {
    /// Identity of the file. Imports resolving to the same id share one
    /// parse and, within a render, one value.
    pub canonical: String,
    pub content: Vec<u8>,
}

/// Maps an import path, relative to the importing file, to its content.
///
/// `from` is the name of the importing file: the snippet name passed to
/// the render call, or the canonical id of an imported file.
pub trait Importer {
    fn import(&self, from: &str, path: &str) -> Result<ImportedFile, String>;
}

/// Rejects every import.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoImporter;

impl Importer for NoImporter {
    fn import(&self, _from: &str, path: &str) -> Result<ImportedFile, String> {
        Err(format!("imports are disabled, cannot resolve {path:?}"))
    }
}

/// Value of an external variable or top-level argument.
#[derive(Clone, Debug, PartialEq)]
pub enum ExtVar {
    /// Bound as a string.
    Str(String),
    /// Jsonnet code, evaluated on first use.
    Code(String),
    Json(serde_json::Value),
}
