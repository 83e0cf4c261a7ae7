// src/core/service_client.rs
//! HTTP client for the resume analysis endpoint - one multipart POST per submission

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use thiserror::Error;
use tracing::{error, info, trace, warn};

use crate::core::config_manager::ServiceConfig;
use crate::types::{AnalysisErrorBody, AnalysisResponse, SelectedFile};

pub const RESUME_FIELD: &str = "resume";
pub const JOB_DESCRIPTION_FIELD: &str = "jobDescription";

/// Shown whenever the failure carries no message of its own
pub const GENERIC_FAILURE_MESSAGE: &str = "There was an error analyzing your resume.";

/// One resume plus one job description, borrowed from the form for the
/// lifetime of the request.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest<'a> {
    pub file: &'a SelectedFile,
    pub job_description: &'a str,
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("analysis service returned {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Rejected { status: u16, message: Option<String> },

    #[error("analysis service returned {status} without a feedback field")]
    MissingFeedback { status: u16, message: Option<String> },
}

impl SubmissionError {
    /// Text for the error panel: the server's own `error` string when it sent
    /// one, the generic fallback otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            }
            | Self::MissingFeedback {
                message: Some(message),
                ..
            } => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Seam between the form and whatever answers its submissions
#[async_trait]
pub trait FeedbackService: Send + Sync {
    /// Returns the feedback text for one resume/job-description pair
    async fn analyze(&self, request: AnalysisRequest<'_>) -> Result<String, SubmissionError>;
}

pub struct AnalysisClient {
    client: reqwest::Client,
    endpoint_url: String,
}

impl AnalysisClient {
    /// Create a client for a fixed endpoint. Without a timeout the transport
    /// default applies.
    pub fn new(endpoint_url: String, timeout_seconds: Option<u64>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint_url,
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::new(config.endpoint_url.clone(), config.timeout_seconds)
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    fn build_form(request: AnalysisRequest<'_>) -> Result<Form, SubmissionError> {
        let resume = Part::bytes(request.file.bytes().to_vec())
            .file_name(request.file.name().to_string())
            .mime_str(request.file.content_type())?;

        Ok(Form::new()
            .part(RESUME_FIELD, resume)
            .text(JOB_DESCRIPTION_FIELD, request.job_description.to_string()))
    }
}

#[async_trait]
impl FeedbackService for AnalysisClient {
    async fn analyze(&self, request: AnalysisRequest<'_>) -> Result<String, SubmissionError> {
        let form = Self::build_form(request)?;

        info!(
            "Calling resume analysis service: {} ({} bytes)",
            self.endpoint_url,
            request.file.len()
        );

        let response = self
            .client
            .post(&self.endpoint_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("Analysis request failed: {}", e);
                SubmissionError::Transport(e)
            })?;

        let status = response.status();
        trace!("Response status: {}", status);

        let response_text = response.text().await.unwrap_or_else(|e| {
            warn!("Failed to read analysis response body: {}", e);
            String::new()
        });

        if status.is_success() {
            match serde_json::from_str::<AnalysisResponse>(&response_text) {
                Ok(parsed) => {
                    info!("Received {} bytes of feedback", parsed.feedback.len());
                    Ok(parsed.feedback)
                }
                Err(e) => {
                    warn!(
                        "Analysis response is missing feedback ({}). Raw response: {}",
                        e, response_text
                    );
                    Err(SubmissionError::MissingFeedback {
                        status: status.as_u16(),
                        message: AnalysisErrorBody::message_from(&response_text),
                    })
                }
            }
        } else {
            error!("Analysis service error response {}: {}", status, response_text);
            Err(SubmissionError::Rejected {
                status: status.as_u16(),
                message: AnalysisErrorBody::message_from(&response_text),
            })
        }
    }
}
