// src/upload_form/validation.rs
use thiserror::Error;

use crate::types::{CandidateFile, SelectedFile};
use crate::utils::{whole_megabytes, PDF_CONTENT_TYPE};

/// Matches the analysis backend's own request limit
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please upload your resume as a PDF.")]
    MissingResume,
    #[error("Only PDF files are accepted.")]
    WrongFileType { content_type: String },
    #[error("Please drop a single PDF file.")]
    TooManyFiles { count: usize },
    #[error("File too large. Max size is {}MB.", megabytes(.limit))]
    TooLarge { size: u64, limit: u64 },
    #[error("Please enter a job description.")]
    MissingJobDescription,
}

fn megabytes(limit: &u64) -> u64 {
    whole_megabytes(*limit)
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingResume => "RESUME_MISSING",
            Self::WrongFileType { .. } => "RESUME_WRONG_TYPE",
            Self::TooManyFiles { .. } => "RESUME_TOO_MANY_FILES",
            Self::TooLarge { .. } => "RESUME_TOO_LARGE",
            Self::MissingJobDescription => "JOB_DESCRIPTION_MISSING",
        }
    }
}

/// Acceptance rules applied to every file entering the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileRules {
    pub max_upload_bytes: Option<u64>,
}

impl Default for FileRules {
    fn default() -> Self {
        Self {
            max_upload_bytes: Some(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }
}

impl FileRules {
    pub fn unlimited() -> Self {
        Self {
            max_upload_bytes: None,
        }
    }

    /// Exact match on the declared type; the extension plays no part here
    pub fn accept(&self, candidate: CandidateFile) -> Result<SelectedFile, ValidationError> {
        if candidate.content_type != PDF_CONTENT_TYPE {
            return Err(ValidationError::WrongFileType {
                content_type: candidate.content_type,
            });
        }

        if let Some(limit) = self.max_upload_bytes {
            let size = candidate.len();
            if size > limit {
                return Err(ValidationError::TooLarge { size, limit });
            }
        }

        Ok(SelectedFile::accept(candidate))
    }

    /// A drop holds zero or more files; zero means nothing happened
    pub fn accept_drop(
        &self,
        mut dropped: Vec<CandidateFile>,
    ) -> Result<Option<SelectedFile>, ValidationError> {
        match dropped.len() {
            0 => Ok(None),
            1 => self.accept(dropped.remove(0)).map(Some),
            count => Err(ValidationError::TooManyFiles { count }),
        }
    }
}

/// Submit-time check over the whole form
pub fn validate_submission<'a>(
    file: Option<&'a SelectedFile>,
    job_description: &str,
) -> Result<&'a SelectedFile, ValidationError> {
    let file = file.ok_or(ValidationError::MissingResume)?;

    // Last gate before the network
    if file.content_type() != PDF_CONTENT_TYPE {
        return Err(ValidationError::WrongFileType {
            content_type: file.content_type().to_string(),
        });
    }

    if job_description.trim().is_empty() {
        return Err(ValidationError::MissingJobDescription);
    }

    Ok(file)
}
