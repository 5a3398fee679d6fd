use crate::loading::error::LoadError;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// One uploaded table, tagged with the label of the source it belongs to.
///
/// The label is always supplied by the caller; it is never inferred from the file
/// name or its contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceInput {
    label: String,
    bytes: Vec<u8>,
}

impl SourceInput {
    /// Wraps an in-memory buffer, e.g. the content of an upload widget.
    pub fn from_bytes(label: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            label: label.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk in one go.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] with the offending path if the file cannot be read.
    pub fn from_path(label: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let label = label.into();
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| LoadError::Io {
            source_label: label.clone(),
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self { label, bytes })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn fingerprint_into<H: Hasher>(&self, state: &mut H) {
        self.hash(state);
    }
}
