use std::path::PathBuf;
use thiserror::Error;

/// The main error type for voc2yolo operations.
///
/// Only whole-run failures surface here. Per-image problems (missing files,
/// unknown classes, broken XML) are collected as diagnostics in the
/// [`ConversionReport`](crate::conversion::ConversionReport) instead.
#[derive(Debug, Error)]
pub enum Voc2YoloError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid VOC layout at {path}: {message}")]
    VocLayoutInvalid { path: PathBuf, message: String },

    #[error("Failed to parse VOC XML from {path}: {message}")]
    VocXmlParse { path: PathBuf, message: String },

    #[error("Failed to parse data.yaml from {path}: {source}")]
    DataYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid class map: {0}")]
    ClassMapInvalid(String),

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Invalid image dimensions in {path}: {message}")]
    ImageDimensionInvalid { path: PathBuf, message: String },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),

    #[error("Conversion finished with {error_count} error(s) and {warning_count} warning(s) (--strict)")]
    StrictFailed {
        error_count: usize,
        warning_count: usize,
    },

    #[error("Unsupported report format: {0}")]
    UnsupportedReportFormat(String),
}
