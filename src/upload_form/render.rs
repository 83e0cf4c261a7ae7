// src/upload_form/render.rs
//! Terminal projections of the form. Nothing here mutates state.

use std::fmt;

use super::state::{SubmissionOutcome, UploadForm};

pub const FEEDBACK_PLACEHOLDER: &str = "Your feedback will appear here after submission.";
pub const DROP_ZONE_PROMPT: &str = "Drag & drop or click to select a PDF";
pub const JOB_DESCRIPTION_PLACEHOLDER: &str = "Paste the job description here...";
pub const SUBMIT_LABEL: &str = "Analyze Resume";
pub const SUBMIT_BUSY_LABEL: &str = "Analyzing...";

/// What the feedback panel shows for a given outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackView<'a> {
    Placeholder,
    Error(&'a str),
    /// Shown verbatim, whitespace included
    Feedback(&'a str),
}

impl<'a> FeedbackView<'a> {
    pub fn of(outcome: &'a SubmissionOutcome) -> Self {
        match outcome {
            SubmissionOutcome::None => Self::Placeholder,
            SubmissionOutcome::Error(message) => Self::Error(message),
            SubmissionOutcome::Feedback(text) if text.is_empty() => Self::Placeholder,
            SubmissionOutcome::Feedback(text) => Self::Feedback(text),
        }
    }

    /// The text the user reads, without any decoration
    pub fn text(&self) -> &'a str {
        match *self {
            Self::Placeholder => FEEDBACK_PLACEHOLDER,
            Self::Error(message) => message,
            Self::Feedback(text) => text,
        }
    }
}

impl fmt::Display for FeedbackView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => write!(f, "  {}", FEEDBACK_PLACEHOLDER),
            Self::Error(message) if message.is_empty() => writeln!(f, "  ! Error:"),
            Self::Error(message) => {
                for line in message.lines() {
                    writeln!(f, "  ! Error: {}", line)?;
                }
                Ok(())
            }
            Self::Feedback(text) => f.write_str(text),
        }
    }
}

pub fn submit_label(form: &UploadForm) -> String {
    let label = if form.is_busy() {
        SUBMIT_BUSY_LABEL
    } else {
        SUBMIT_LABEL
    };
    if form.can_submit() {
        format!("[ {} ]", label)
    } else {
        format!("[ {} ] (disabled)", label)
    }
}

/// Whole form: drop zone, text box, submit control and feedback panel
pub fn render_form(form: &UploadForm) -> String {
    let mut out = String::new();

    out.push_str("Upload Resume (PDF)\n");
    match form.file() {
        Some(file) => out.push_str(&format!("  [ {} ]\n", file.label())),
        None => out.push_str(&format!("  [ {} ]\n", DROP_ZONE_PROMPT)),
    }
    if let Some(e) = form.validation_error() {
        out.push_str(&format!("  ! {}\n", e));
    }

    out.push_str("\nJob Description\n");
    let description = form.job_description();
    if description.trim().is_empty() {
        out.push_str(&format!("  {}\n", JOB_DESCRIPTION_PLACEHOLDER));
    } else {
        let first_line = description.trim().lines().next().unwrap_or_default();
        out.push_str(&format!(
            "  {} ({} characters)\n",
            first_line,
            description.chars().count()
        ));
    }

    out.push_str(&format!("\n{}\n", submit_label(form)));

    out.push_str("\nFeedback\n");
    out.push_str(&FeedbackView::of(form.outcome()).to_string());
    if !out.ends_with('\n') {
        out.push('\n');
    }

    out
}
