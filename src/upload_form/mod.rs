// src/upload_form/mod.rs
//! The resume upload form: drop/select zone, job description box, submit
//! handler and feedback panel.

pub mod busy;
pub mod render;
pub mod state;
pub mod validation;

pub use busy::{BusyFlag, BusyIndicator};
pub use render::{render_form, FeedbackView};
pub use state::{SubmissionOutcome, SubmitRefusal, UploadForm};
pub use validation::{FileRules, ValidationError, DEFAULT_MAX_UPLOAD_BYTES};
