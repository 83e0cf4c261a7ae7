// src/upload_form/state.rs
//! Upload form state and the handlers that mutate it

use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::busy::{BusyFlag, BusyIndicator};
use super::validation::{validate_submission, FileRules, ValidationError};
use crate::core::service_client::{AnalysisRequest, FeedbackService, SubmissionError};
use crate::types::{CandidateFile, SelectedFile};

/// Result of the last submission attempt; each attempt replaces it whole
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionOutcome {
    #[default]
    None,
    Feedback(String),
    Error(String),
}

impl SubmissionOutcome {
    pub fn feedback(&self) -> Option<&str> {
        match self {
            Self::Feedback(text) => Some(text),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(text) => Some(text),
            _ => None,
        }
    }
}

impl From<Result<String, SubmissionError>> for SubmissionOutcome {
    fn from(result: Result<String, SubmissionError>) -> Self {
        match result {
            Ok(feedback) => Self::Feedback(feedback),
            Err(e) => Self::Error(e.user_message()),
        }
    }
}

/// Why a submit action produced no request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRefusal {
    /// A request is already in flight; the trigger is disabled
    Busy,
    Invalid(ValidationError),
}

/// Resume + job description form.
///
/// Validation runs when a file is accepted (drop or pick, same rules) and
/// again on submit. A rejection only sets the validation message; the
/// current selection and text are left as they were.
#[derive(Debug, Default)]
pub struct UploadForm {
    rules: FileRules,
    file: Option<SelectedFile>,
    job_description: String,
    validation_error: Option<ValidationError>,
    outcome: SubmissionOutcome,
    busy: BusyFlag,
}

impl UploadForm {
    pub fn new(rules: FileRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn validation_error(&self) -> Option<&ValidationError> {
        self.validation_error.as_ref()
    }

    pub fn outcome(&self) -> &SubmissionOutcome {
        &self.outcome
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn busy_indicator(&self) -> BusyIndicator {
        self.busy.indicator()
    }

    /// Whether the submit control is enabled
    pub fn can_submit(&self) -> bool {
        !self.is_busy() && self.file.is_some() && !self.job_description.trim().is_empty()
    }

    /// File picker handler
    pub fn select_file(&mut self, candidate: CandidateFile) -> Result<(), ValidationError> {
        let accepted = self.rules.accept(candidate).map(Some);
        self.apply_acceptance(accepted)
    }

    /// Drop zone handler; an empty drop changes nothing
    pub fn drop_files(&mut self, dropped: Vec<CandidateFile>) -> Result<(), ValidationError> {
        let accepted = self.rules.accept_drop(dropped);
        self.apply_acceptance(accepted)
    }

    fn apply_acceptance(
        &mut self,
        accepted: Result<Option<SelectedFile>, ValidationError>,
    ) -> Result<(), ValidationError> {
        match accepted {
            Ok(Some(file)) => {
                info!("Selected resume {}", file.label());
                self.file = Some(file);
                self.validation_error = None;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                warn!("Rejected resume file: {} ({})", e, e.code());
                self.validation_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Text box handler, called with the full current text on every edit
    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.job_description = text.into();
        if self.validation_error == Some(ValidationError::MissingJobDescription)
            && !self.job_description.trim().is_empty()
        {
            self.validation_error = None;
        }
    }

    /// Runs submit-time validation without touching the network
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        match validate_submission(self.file.as_ref(), &self.job_description) {
            Ok(_) => Ok(()),
            Err(e) => {
                self.validation_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Submit handler: validate, send one request, store its outcome.
    ///
    /// The busy flag is raised for exactly the lifetime of the request and
    /// lowered on every exit, including a panicking service or this future
    /// being dropped mid-flight.
    pub async fn submit<S>(&mut self, service: &S) -> Result<&SubmissionOutcome, SubmitRefusal>
    where
        S: FeedbackService + ?Sized,
    {
        if self.busy.is_busy() {
            return Err(SubmitRefusal::Busy);
        }

        let file = match validate_submission(self.file.as_ref(), &self.job_description) {
            Ok(file) => file,
            Err(e) => {
                warn!("Submission refused: {} ({})", e, e.code());
                self.validation_error = Some(e.clone());
                return Err(SubmitRefusal::Invalid(e));
            }
        };
        self.validation_error = None;

        let request = AnalysisRequest {
            file,
            job_description: &self.job_description,
        };
        let submission_id = Uuid::new_v4();
        let span = info_span!("resume_submission", %submission_id, resume = %file.name());

        let _busy = self.busy.engage();
        let result = service.analyze(request).instrument(span.clone()).await;

        span.in_scope(|| match &result {
            Ok(_) => info!("Submission completed with feedback"),
            Err(e) => warn!("Submission failed: {}", e),
        });
        self.outcome = SubmissionOutcome::from(result);

        Ok(&self.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::PDF_CONTENT_TYPE;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    enum Reply {
        Feedback(&'static str),
        Rejected(Option<&'static str>),
        Panic,
        Hang,
    }

    /// Records what it was asked and what the busy flag looked like meanwhile
    struct FakeService {
        reply: Reply,
        calls: AtomicUsize,
        seen_busy: Mutex<Vec<bool>>,
        seen_description: Mutex<Option<String>>,
        indicator: Mutex<Option<BusyIndicator>>,
    }

    impl FakeService {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                seen_busy: Mutex::new(Vec::new()),
                seen_description: Mutex::new(None),
                indicator: Mutex::new(None),
            }
        }

        fn watching(self, form: &UploadForm) -> Self {
            *self.indicator.lock().unwrap() = Some(form.busy_indicator());
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FeedbackService for FakeService {
        async fn analyze(&self, request: AnalysisRequest<'_>) -> Result<String, SubmissionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_description.lock().unwrap() = Some(request.job_description.to_string());
            if let Some(indicator) = self.indicator.lock().unwrap().as_ref() {
                self.seen_busy.lock().unwrap().push(indicator.is_busy());
            }

            match self.reply {
                Reply::Feedback(text) => Ok(text.to_string()),
                Reply::Rejected(message) => Err(SubmissionError::Rejected {
                    status: 500,
                    message: message.map(str::to_string),
                }),
                Reply::Panic => panic!("service exploded"),
                Reply::Hang => std::future::pending().await,
            }
        }
    }

    fn pdf() -> CandidateFile {
        CandidateFile::new("resume.pdf", PDF_CONTENT_TYPE, b"%PDF-1.7".to_vec())
    }

    fn ready_form() -> UploadForm {
        let mut form = UploadForm::default();
        form.select_file(pdf()).expect("pdf accepted");
        form.set_job_description("Senior Rust engineer");
        form
    }

    #[test]
    fn test_non_pdf_never_selected() {
        let mut form = UploadForm::default();
        let png = CandidateFile::new("photo.png", "image/png", vec![0x89]);

        let err = form.select_file(png.clone()).unwrap_err();
        assert_eq!(err.to_string(), "Only PDF files are accepted.");
        assert!(form.file().is_none());
        assert_eq!(form.validation_error(), Some(&err));

        // Same rule through the drop zone
        assert!(form.drop_files(vec![png]).is_err());
        assert!(form.file().is_none());
    }

    #[test]
    fn test_rejection_keeps_existing_selection() {
        let mut form = ready_form();
        let docx = CandidateFile::from_name("resume.docx", vec![1, 2]);

        assert!(form.drop_files(vec![docx]).is_err());
        assert_eq!(form.file().map(|f| f.name()), Some("resume.pdf"));
        assert_eq!(form.job_description(), "Senior Rust engineer");

        assert!(form.drop_files(vec![pdf(), pdf()]).is_err());
        assert_eq!(form.file().map(|f| f.name()), Some("resume.pdf"));
    }

    #[test]
    fn test_new_selection_replaces_old_and_clears_message() {
        let mut form = UploadForm::default();
        let _ = form.select_file(CandidateFile::new("a.txt", "text/plain", vec![]));
        assert!(form.validation_error().is_some());

        form.select_file(pdf()).unwrap();
        let other = CandidateFile::new("other.pdf", PDF_CONTENT_TYPE, vec![1]);
        form.drop_files(vec![other]).unwrap();

        assert_eq!(form.file().map(|f| f.name()), Some("other.pdf"));
        assert!(form.validation_error().is_none());

        // Empty drop is a no-op
        form.drop_files(vec![]).unwrap();
        assert_eq!(form.file().map(|f| f.name()), Some("other.pdf"));
    }

    #[test]
    fn test_size_limit_applies_on_selection() {
        let mut form = UploadForm::new(FileRules {
            max_upload_bytes: Some(4),
        });
        let big = CandidateFile::new("big.pdf", PDF_CONTENT_TYPE, vec![0; 5]);
        assert_eq!(form.select_file(big).unwrap_err().code(), "RESUME_TOO_LARGE");
        assert!(form.file().is_none());
    }

    #[test]
    fn test_typing_description_clears_missing_description_message() {
        let mut form = UploadForm::default();
        form.select_file(pdf()).unwrap();
        assert!(form.validate().is_err());
        assert_eq!(
            form.validation_error(),
            Some(&ValidationError::MissingJobDescription)
        );

        form.set_job_description("  ");
        assert!(form.validation_error().is_some());

        form.set_job_description("Data engineer");
        assert!(form.validation_error().is_none());

        // Other messages are left for their own handlers
        let _ = form.select_file(CandidateFile::new("a.txt", "text/plain", vec![]));
        form.set_job_description("Data engineer, remote");
        assert_eq!(form.validation_error().map(|e| e.code()), Some("RESUME_WRONG_TYPE"));
    }

    #[test]
    fn test_can_submit() {
        let mut form = UploadForm::default();
        assert!(!form.can_submit());
        form.select_file(pdf()).unwrap();
        assert!(!form.can_submit());
        form.set_job_description("  ");
        assert!(!form.can_submit());
        form.set_job_description("Backend role");
        assert!(form.can_submit());
    }

    #[tokio::test]
    async fn test_empty_description_rejected_before_network() {
        let service = FakeService::new(Reply::Feedback("unused"));

        let mut with_file = UploadForm::default();
        with_file.select_file(pdf()).unwrap();
        with_file.set_job_description(" \n ");
        let refusal = with_file.submit(&service).await.unwrap_err();
        assert_eq!(
            refusal,
            SubmitRefusal::Invalid(ValidationError::MissingJobDescription)
        );

        let mut without_file = UploadForm::default();
        assert!(without_file.submit(&service).await.is_err());

        assert_eq!(service.calls(), 0);
        assert!(!with_file.is_busy());
        assert_eq!(with_file.outcome(), &SubmissionOutcome::None);
    }

    #[tokio::test]
    async fn test_success_sets_feedback_and_clears_error() {
        let mut form = ready_form();
        let failing = FakeService::new(Reply::Rejected(Some("Y")));
        form.submit(&failing).await.unwrap();
        assert_eq!(form.outcome().error(), Some("Y"));

        let service = FakeService::new(Reply::Feedback("X")).watching(&form);
        let outcome = form.submit(&service).await.unwrap();
        assert_eq!(outcome, &SubmissionOutcome::Feedback("X".to_string()));
        assert_eq!(form.outcome().error(), None);

        assert_eq!(*service.seen_busy.lock().unwrap(), vec![true]);
        assert!(!form.is_busy());
    }

    #[tokio::test]
    async fn test_failure_sets_error_and_clears_feedback() {
        let mut form = ready_form();
        form.submit(&FakeService::new(Reply::Feedback("X")))
            .await
            .unwrap();
        assert_eq!(form.outcome().feedback(), Some("X"));

        form.submit(&FakeService::new(Reply::Rejected(Some("Y"))))
            .await
            .unwrap();
        assert_eq!(form.outcome(), &SubmissionOutcome::Error("Y".to_string()));
        assert_eq!(form.outcome().feedback(), None);

        form.submit(&FakeService::new(Reply::Rejected(None)))
            .await
            .unwrap();
        assert_eq!(
            form.outcome().error(),
            Some("There was an error analyzing your resume.")
        );
    }

    #[tokio::test]
    async fn test_description_sent_untrimmed() {
        let mut form = ready_form();
        form.set_job_description("  Rust\n  Tokio  ");
        let service = FakeService::new(Reply::Feedback("ok"));
        form.submit(&service).await.unwrap();
        assert_eq!(
            service.seen_description.lock().unwrap().as_deref(),
            Some("  Rust\n  Tokio  ")
        );
    }

    #[tokio::test]
    async fn test_busy_cleared_when_service_panics() {
        let mut form = ready_form();
        let indicator = form.busy_indicator();
        let service = FakeService::new(Reply::Panic).watching(&form);

        let handle = tokio::spawn(async move {
            let _ = form.submit(&service).await;
        });
        assert!(handle.await.unwrap_err().is_panic());
        assert!(!indicator.is_busy());
    }

    #[tokio::test]
    async fn test_busy_cleared_when_submission_dropped() {
        let mut form = ready_form();
        let service = FakeService::new(Reply::Hang).watching(&form);

        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            form.submit(&service),
        )
        .await;

        assert!(timed_out.is_err());
        assert_eq!(*service.seen_busy.lock().unwrap(), vec![true]);
        assert!(!form.is_busy());
        assert_eq!(form.outcome(), &SubmissionOutcome::None);
    }

    #[tokio::test]
    async fn test_submit_refused_while_busy() {
        let mut form = ready_form();
        let service = FakeService::new(Reply::Feedback("late"));
        // A request still in flight
        std::mem::forget(form.busy.engage());

        assert_eq!(form.submit(&service).await, Err(SubmitRefusal::Busy));
        assert_eq!(service.calls(), 0);
    }
}
