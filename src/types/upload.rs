// src/types/upload.rs
//! File values handed to the upload form

use crate::utils::{content_type_for, format_size};

/// A file offered to the form by a drop or a picker, before acceptance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Candidate whose declared type is derived from the file name
    pub fn from_name(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = content_type_for(&name);
        Self::new(name, content_type, bytes)
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A candidate that passed acceptance. Only the validation module builds these,
/// so holding one means the declared type is `application/pdf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl SelectedFile {
    pub(crate) fn accept(candidate: CandidateFile) -> Self {
        Self {
            name: candidate.name,
            content_type: candidate.content_type,
            bytes: candidate.bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `resume.pdf (1.2MB)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, format_size(self.len()))
    }
}
