pub mod json;
pub mod pdf;
pub mod text;

use crate::config::ReportConfig;
use crate::detect::DeviceRegistry;
use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Ordered result lines of one run. Append-only while the run is in
/// progress, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultLog(Vec<String>);

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn push(&mut self, line: String) {
        self.0.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for ResultLog {
    fn from(lines: Vec<String>) -> Self {
        Self(lines)
    }
}

/// A completed run, borrowed for encoding.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub registry: &'a DeviceRegistry,
    pub log: &'a ResultLog,
}

/// Output encodings a report can be saved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[value(name = "txt")]
    Text,
    Json,
    Pdf,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Pdf => "pdf",
        }
    }

    /// Encode `report` in this format.
    pub fn encode(self, report: Report<'_>) -> Result<Vec<u8>> {
        match self {
            ReportFormat::Text => Ok(text::encode(report.log).into_bytes()),
            ReportFormat::Json => json::encode(report.registry, report.log),
            ReportFormat::Pdf => pdf::render(pdf::TITLE, report.log.lines()),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// `<prefix>_<YYYYMMDD>_<HHMMSS>.<ext>`
pub fn default_file_name(prefix: &str, format: ReportFormat, now: DateTime<Local>) -> String {
    format!(
        "{}_{}.{}",
        prefix,
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Destination for a save: the explicit path if given, otherwise a
/// timestamped name in the configured report directory.
pub fn resolve_path(explicit: Option<&Path>, config: &ReportConfig, format: ReportFormat) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let name = default_file_name(&config.prefix, format, Local::now());
            match &config.directory {
                Some(dir) => dir.join(name),
                None => PathBuf::from(name),
            }
        }
    }
}

/// Encode `report` and write it to `path`, replacing any existing file.
pub fn save(report: Report<'_>, format: ReportFormat, path: &Path) -> Result<()> {
    let bytes = format.encode(report)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| Error::ReportWrite {
            path: path.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, bytes).map_err(|source| Error::ReportWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), %format, "report saved");
    Ok(())
}
