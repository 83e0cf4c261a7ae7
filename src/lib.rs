// src/lib.rs
//! Resume feedback form: select a PDF resume, type a job description, send
//! both to an analysis endpoint and show the feedback it returns.

pub mod cli;
pub mod core;
pub mod types;
pub mod upload_form;
pub mod utils;

pub use crate::core::{AnalysisClient, ConfigManager, FeedbackService, SubmissionError};
pub use crate::types::{CandidateFile, SelectedFile};
pub use crate::upload_form::{
    render_form, FeedbackView, FileRules, SubmissionOutcome, SubmitRefusal, UploadForm,
    ValidationError,
};
