// src/cli.rs
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::core::{AnalysisClient, ConfigManager, FsOps};
use crate::upload_form::{render_form, BusyIndicator, SubmissionOutcome, SubmitRefusal, UploadForm};

#[derive(Parser)]
#[command(name = "resume-feedback")]
#[command(about = "Send a PDF resume and a job description for tailored feedback")]
pub struct Cli {
    /// YAML configuration file (defaults to ./resume-feedback.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Analysis endpoint, overrides config and environment
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate the inputs, submit them and print the feedback
    Analyze(SubmissionArgs),
    /// Run the form's validation without contacting the service
    Validate(SubmissionArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct SubmissionArgs {
    /// Resume file; only PDFs are accepted
    #[arg(long)]
    pub resume: PathBuf,

    #[command(flatten)]
    pub job_description: JobDescriptionSource,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct JobDescriptionSource {
    /// Job description text
    #[arg(long)]
    pub job_description: Option<String>,

    /// File holding the job description, `-` for stdin
    #[arg(long)]
    pub job_description_file: Option<PathBuf>,
}

impl JobDescriptionSource {
    async fn read(&self) -> Result<String> {
        match (&self.job_description, &self.job_description_file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => FsOps::read_text(path).await,
            (None, None) => Ok(String::new()),
        }
    }
}

pub async fn handle_command(command: Command, config: &ConfigManager) -> Result<ExitCode> {
    let succeeded = match command {
        Command::Analyze(args) => analyze(args, config).await?,
        Command::Validate(args) => validate(args, config).await?,
        Command::Config => {
            print!("{}", config.to_yaml()?);
            true
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Fills a form from the arguments. `false` when the resume was rejected.
async fn fill_form(args: &SubmissionArgs, form: &mut UploadForm) -> Result<bool> {
    let candidate = FsOps::load_candidate(&args.resume).await?;
    let accepted = form.select_file(candidate).is_ok();
    form.set_job_description(args.job_description.read().await?);
    Ok(accepted)
}

async fn validate(args: SubmissionArgs, config: &ConfigManager) -> Result<bool> {
    let mut form = UploadForm::new(config.file_rules());
    let accepted = fill_form(&args, &mut form).await?;
    let valid = accepted && form.validate().is_ok();

    print!("{}", render_form(&form));
    Ok(valid)
}

async fn analyze(args: SubmissionArgs, config: &ConfigManager) -> Result<bool> {
    let mut form = UploadForm::new(config.file_rules());
    if !fill_form(&args, &mut form).await? {
        print!("{}", render_form(&form));
        return Ok(false);
    }

    let client = AnalysisClient::from_config(&config.service)?;
    info!("Submitting {} to {}", args.resume.display(), client.endpoint_url());

    let (done_tx, done_rx) = oneshot::channel();
    let spinner = tokio::spawn(show_busy(form.busy_indicator(), done_rx));
    let result = form.submit(&client).await.cloned();
    let _ = done_tx.send(());
    let _ = spinner.await;

    let succeeded = match result {
        Ok(SubmissionOutcome::Feedback(_)) => true,
        Ok(_) => false,
        Err(SubmitRefusal::Busy) => {
            warn!("Submit ignored, a request is already in flight");
            false
        }
        Err(SubmitRefusal::Invalid(_)) => false,
    };

    print!("{}", render_form(&form));
    Ok(succeeded)
}

/// Busy indicator for interactive terminals. Runs until `done` fires and
/// always terminates its own line before returning.
async fn show_busy(indicator: BusyIndicator, mut done: oneshot::Receiver<()>) {
    if !std::io::stderr().is_terminal() {
        return;
    }

    let mut ticker = tokio::time::interval(Duration::from_millis(500));
    let mut shown = false;
    loop {
        tokio::select! {
            _ = &mut done => break,
            _ = ticker.tick() => {
                if indicator.is_busy() {
                    let mut stderr = std::io::stderr();
                    let _ = if shown {
                        write!(stderr, ".")
                    } else {
                        write!(stderr, "Analyzing...")
                    };
                    let _ = stderr.flush();
                    shown = true;
                }
            }
        }
    }

    if shown {
        eprintln!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn analyze_args(resume: PathBuf) -> SubmissionArgs {
        SubmissionArgs {
            resume,
            job_description: JobDescriptionSource {
                job_description: Some("Rust developer".to_string()),
                job_description_file: None,
            },
        }
    }

    async fn endpoint_answering(status: u16, body: serde_json::Value) -> (MockServer, ConfigManager) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
        let config = ConfigManager::default().with_endpoint(Some(format!("{}/analyze", server.uri())));
        (server, config)
    }

    fn pdf_on_disk(dir: &tempfile::TempDir) -> PathBuf {
        let resume = dir.path().join("resume.pdf");
        std::fs::write(&resume, b"%PDF-1.7\n").unwrap();
        resume
    }

    #[test]
    fn test_cli_parses_analyze() {
        let cli = Cli::try_parse_from([
            "resume-feedback",
            "--endpoint",
            "http://127.0.0.1:9/analyze",
            "analyze",
            "--resume",
            "cv.pdf",
            "--job-description",
            "Rust developer",
        ])
        .unwrap();

        assert_eq!(cli.endpoint.as_deref(), Some("http://127.0.0.1:9/analyze"));
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.resume, PathBuf::from("cv.pdf"));
                assert_eq!(
                    args.job_description.job_description.as_deref(),
                    Some("Rust developer")
                );
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_job_description_source_is_exclusive_and_required() {
        assert!(Cli::try_parse_from(["resume-feedback", "validate", "--resume", "cv.pdf"]).is_err());
        assert!(Cli::try_parse_from([
            "resume-feedback",
            "validate",
            "--resume",
            "cv.pdf",
            "--job-description",
            "x",
            "--job-description-file",
            "jd.txt",
        ])
        .is_err());
    }

    #[tokio::test]
    async fn test_validate_rejects_non_pdf_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let resume = dir.path().join("resume.docx");
        std::fs::write(&resume, b"PK").unwrap();

        let args = SubmissionArgs {
            resume,
            job_description: JobDescriptionSource {
                job_description: Some("Rust developer".to_string()),
                job_description_file: None,
            },
        };
        assert!(!validate(args, &ConfigManager::default()).await.unwrap());
    }

    #[tokio::test]
    async fn test_analyze_succeeds_on_feedback() {
        let dir = tempfile::tempdir().unwrap();
        let (_server, config) =
            endpoint_answering(200, serde_json::json!({ "feedback": "Add metrics" })).await;

        assert!(analyze(analyze_args(pdf_on_disk(&dir)), &config).await.unwrap());
    }

    #[tokio::test]
    async fn test_analyze_fails_on_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let (_server, config) =
            endpoint_answering(500, serde_json::json!({ "error": "AI generation failed" })).await;

        assert!(!analyze(analyze_args(pdf_on_disk(&dir)), &config).await.unwrap());
    }

    #[tokio::test]
    async fn test_handle_command_exit_codes() {
        let dir = tempfile::tempdir().unwrap();

        let (_ok_server, ok_config) =
            endpoint_answering(200, serde_json::json!({ "feedback": "Solid" })).await;
        let code = handle_command(Command::Analyze(analyze_args(pdf_on_disk(&dir))), &ok_config)
            .await
            .unwrap();
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::SUCCESS));

        let (_err_server, err_config) =
            endpoint_answering(500, serde_json::json!({ "error": "quota exceeded" })).await;
        let code = handle_command(Command::Analyze(analyze_args(pdf_on_disk(&dir))), &err_config)
            .await
            .unwrap();
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::FAILURE));
    }

    #[tokio::test]
    async fn test_spinner_stops_when_done() {
        let form = UploadForm::default();
        let (done_tx, done_rx) = oneshot::channel();
        let spinner = tokio::spawn(show_busy(form.busy_indicator(), done_rx));
        let _ = done_tx.send(());

        tokio::time::timeout(Duration::from_secs(2), spinner)
            .await
            .expect("spinner returns after done")
            .unwrap();
    }
}
