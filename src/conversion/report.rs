//! Conversion report: per-split counts plus every diagnostic raised.
//!
//! Nothing that goes wrong with a single image or split aborts a run; it
//! becomes a [`ConversionIssue`] here instead, is logged when added, and is
//! printed with the final summary.

use serde::Serialize;
use std::fmt;

/// The outcome of one conversion run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ConversionReport {
    /// VOC dataset root that was read.
    pub source: String,
    /// YOLO dataset root that was written.
    pub output: String,
    /// One entry per split that had an index file (or one `all` entry in flat mode).
    pub splits: Vec<SplitSummary>,
    /// Diagnostics in the order they were raised.
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    pub fn new(source: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            ..Default::default()
        }
    }

    /// Record an issue and log it at the matching level.
    pub fn add(&mut self, issue: ConversionIssue) {
        match issue.severity {
            ConversionSeverity::Error => log::error!("{}", issue),
            ConversionSeverity::Warning => log::warn!("{}", issue),
            ConversionSeverity::Info => log::info!("{}", issue),
        }
        self.issues.push(issue);
    }

    pub fn error_count(&self) -> usize {
        self.count(ConversionSeverity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(ConversionSeverity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(ConversionSeverity::Info)
    }

    /// Issues carrying `code`, in the order they were raised.
    pub fn issues_with_code(&self, code: IssueCode) -> impl Iterator<Item = &ConversionIssue> {
        self.issues.iter().filter(move |issue| issue.code == code)
    }

    /// Summary for a split by name.
    pub fn split(&self, name: &str) -> Option<&SplitSummary> {
        self.splits.iter().find(|split| split.name == name)
    }

    fn count(&self, severity: ConversionSeverity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Converted {} -> {}", self.source, self.output)?;

        if self.splits.is_empty() {
            writeln!(f, "  no splits converted")?;
        }
        for split in &self.splits {
            writeln!(f, "  {}", split)?;
        }

        for (title, severity) in [
            ("Errors", ConversionSeverity::Error),
            ("Warnings", ConversionSeverity::Warning),
            ("Notes", ConversionSeverity::Info),
        ] {
            let count = self.count(severity);
            if count == 0 {
                continue;
            }
            writeln!(f)?;
            writeln!(f, "{} ({}):", title, count)?;
            for issue in self.issues.iter().filter(|i| i.severity == severity) {
                writeln!(f, "  - {}", issue)?;
            }
        }

        Ok(())
    }
}

/// Counts for one split.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SplitSummary {
    pub name: String,
    /// Ids listed in the split index.
    pub ids: usize,
    pub labels_written: usize,
    pub images_copied: usize,
    /// Label rows written across all label files.
    pub objects_written: usize,
    /// Objects dropped because their class is not in the class map.
    pub objects_skipped: usize,
}

impl fmt::Display for SplitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} id(s), {} label file(s) with {} object(s), {} image(s) copied",
            self.name, self.ids, self.labels_written, self.objects_written, self.images_copied
        )?;
        if self.objects_skipped > 0 {
            write!(f, ", {} object(s) skipped", self.objects_skipped)?;
        }
        Ok(())
    }
}

/// A single diagnostic raised during conversion.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConversionIssue {
    pub severity: ConversionSeverity,
    pub code: IssueCode,
    pub split: Option<String>,
    /// Image id the issue concerns, if any.
    pub id: Option<String>,
    pub message: String,
}

impl ConversionIssue {
    pub fn error(code: IssueCode, message: impl Into<String>) -> Self {
        Self::with_severity(ConversionSeverity::Error, code, message)
    }

    pub fn warning(code: IssueCode, message: impl Into<String>) -> Self {
        Self::with_severity(ConversionSeverity::Warning, code, message)
    }

    pub fn info(code: IssueCode, message: impl Into<String>) -> Self {
        Self::with_severity(ConversionSeverity::Info, code, message)
    }

    /// Attach the split and image id this issue belongs to.
    pub fn at(mut self, split: Option<&str>, id: Option<&str>) -> Self {
        self.split = split.map(ToOwned::to_owned);
        self.id = id.map(ToOwned::to_owned);
        self
    }

    fn with_severity(
        severity: ConversionSeverity,
        code: IssueCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code,
            split: None,
            id: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConversionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.split, &self.id) {
            (Some(split), Some(id)) => write!(f, "[{}/{}] ", split, id)?,
            (Some(split), None) => write!(f, "[{}] ", split)?,
            (None, Some(id)) => write!(f, "[{}] ", id)?,
            (None, None) => {}
        }
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSeverity {
    /// The item could not be converted.
    Error,
    /// Something the user asked for is missing from the output.
    Warning,
    /// A policy decision; output is complete.
    Info,
}

/// Stable issue codes for programmatic consumption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// `ImageSets/Main/<split>.txt` does not exist; split skipped.
    MissingSplitFile,
    /// Split index exists but could not be read; split skipped.
    UnreadableSplitFile,
    /// No `Annotations/<id>.xml`; no label file written.
    MissingAnnotation,
    /// No `JPEGImages/<id>.jpg`; nothing copied.
    MissingImage,
    /// Object class is not in the class map; object skipped.
    UnknownClass,
    /// Annotation could not be parsed or has no usable size; no label file written.
    MalformedAnnotation,
    /// `<size>` missing or zero; dimensions read from the image header.
    SizeFromImage,
    /// Writing a label or copying an image failed.
    WriteFailed,
}
