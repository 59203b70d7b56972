//! Export of a document as a downloadable or printable artifact.
//!
//! `pdf` goes to a print surface as HTML and `docx` is the same HTML under a
//! Word file name and media type. Neither is a real binary format.

use crate::fs::write_atomic;
use crate::model::Document;
use crate::serialize::{html, json};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("could not serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Docx,
    Html,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Pdf,
        ExportFormat::Docx,
        ExportFormat::Html,
        ExportFormat::Json,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf | ExportFormat::Html => "text/html",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ExportError::UnsupportedFormat(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Download,
    Print,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub file_name: String,
    pub media_type: &'static str,
    pub body: String,
    pub delivery: Delivery,
}

/// Builds the artifact for `format` without delivering it.
pub fn build_artifact(
    document: &Document,
    format: ExportFormat,
) -> Result<ExportArtifact, ExportError> {
    let body = match format {
        ExportFormat::Json => json::serialize(document)?,
        ExportFormat::Pdf | ExportFormat::Docx | ExportFormat::Html => html::serialize(document),
    };
    let delivery = match format {
        ExportFormat::Pdf => Delivery::Print,
        _ => Delivery::Download,
    };
    Ok(ExportArtifact {
        format,
        file_name: format!("{}.{}", document.title, format.name()),
        media_type: format.media_type(),
        body,
        delivery,
    })
}

/// Where artifacts end up: a download location and a print surface.
pub trait ExportSink {
    fn download(&mut self, artifact: &ExportArtifact) -> Result<(), ExportError>;
    fn print(&mut self, artifact: &ExportArtifact) -> Result<(), ExportError>;
}

/// Builds and delivers an export. On error nothing is left behind by the sink.
pub fn export_document(
    document: &Document,
    format: ExportFormat,
    sink: &mut dyn ExportSink,
) -> Result<ExportArtifact, ExportError> {
    let artifact = build_artifact(document, format)?;
    let delivered = match artifact.delivery {
        Delivery::Download => sink.download(&artifact),
        Delivery::Print => sink.print(&artifact),
    };
    match delivered {
        Ok(()) => {
            debug!(%format, file = %artifact.file_name, "export delivered");
            Ok(artifact)
        }
        Err(err) => {
            warn!(%format, %err, "export failed");
            Err(err)
        }
    }
}

/// Writes downloads into a directory; print jobs become `{title}.print.html`.
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            written: Vec::new(),
        }
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write(&mut self, file_name: &str, body: &str) -> Result<(), ExportError> {
        let path = self.root.join(sanitize_file_name(file_name));
        write_atomic(&path, body.as_bytes())?;
        self.written.push(path);
        Ok(())
    }
}

impl ExportSink for DirectorySink {
    fn download(&mut self, artifact: &ExportArtifact) -> Result<(), ExportError> {
        self.write(&artifact.file_name, &artifact.body)
    }

    fn print(&mut self, artifact: &ExportArtifact) -> Result<(), ExportError> {
        let stem = artifact
            .file_name
            .strip_suffix(".pdf")
            .unwrap_or(&artifact.file_name);
        self.write(&format!("{stem}.print.html"), &artifact.body)
    }
}

// Titles are free text; keep them from escaping the export directory.
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() || cleaned.starts_with('.') {
        format!("document{cleaned}")
    } else {
        cleaned
    }
}
