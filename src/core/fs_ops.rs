// src/core/fs_ops.rs
//! File system access for the CLI front end

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::types::CandidateFile;
use crate::utils::format_size;

pub struct FsOps;

impl FsOps {
    /// Read a file the way a file picker hands it over: name, declared type
    /// from the extension, and the full contents.
    pub async fn load_candidate(path: &Path) -> Result<CandidateFile> {
        let bytes = fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .with_context(|| format!("Path has no usable file name: {}", path.display()))?;

        let candidate = CandidateFile::from_name(name, bytes);
        info!(
            "Loaded {} as {} ({})",
            path.display(),
            candidate.content_type,
            format_size(candidate.len())
        );
        Ok(candidate)
    }

    /// Read text from a file, or from stdin when the path is `-`
    pub async fn read_text(path: &Path) -> Result<String> {
        if path == Path::new("-") {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read from stdin")?;
            return Ok(text);
        }

        fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }
}
