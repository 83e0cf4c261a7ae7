// src/types/mod.rs
pub mod response;
pub mod upload;

pub use response::{AnalysisErrorBody, AnalysisResponse};
pub use upload::{CandidateFile, SelectedFile};
