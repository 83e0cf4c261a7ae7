// src/types/response.rs
use serde::{Deserialize, Serialize};

// ===== Analysis Service Response Types =====

/// Success body of the analysis endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub feedback: String,
}

/// Error body of the analysis endpoint; every field is optional on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl AnalysisErrorBody {
    /// Lenient parse: anything that is not an object with a string `error` yields `None`
    pub fn message_from(raw: &str) -> Option<String> {
        serde_json::from_str::<AnalysisErrorBody>(raw)
            .ok()
            .and_then(|body| body.error)
    }
}
