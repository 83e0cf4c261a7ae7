// src/utils.rs
pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Declared content type for a file name, the way a browser file picker reports it
pub fn content_type_for(filename: &str) -> &'static str {
    match get_file_extension(filename).as_deref() {
        Some("pdf") => PDF_CONTENT_TYPE,
        Some("docx") => DOCX_CONTENT_TYPE,
        _ => FALLBACK_CONTENT_TYPE,
    }
}

/// Whole megabytes, rounded down, for user-facing limits
pub fn whole_megabytes(bytes: u64) -> u64 {
    bytes / BYTES_PER_MB
}

/// Human readable size, e.g. `1.5MB` or `320KB`
pub fn format_size(bytes: u64) -> String {
    if bytes >= BYTES_PER_MB {
        format!("{:.1}MB", bytes as f64 / BYTES_PER_MB as f64)
    } else if bytes >= 1024 {
        format!("{}KB", bytes / 1024)
    } else {
        format!("{}B", bytes)
    }
}
