//! VOC → YOLO dataset conversion.
//!
//! Walks the split index files of a VOC dataset and, for every listed id,
//! writes a YOLO label file and copies the JPEG into the mirrored
//! `images/<split>/` + `labels/<split>/` tree. Ids are independent of each
//! other and are converted on a bounded rayon pool; per-id diagnostics are
//! merged back in index order so the report does not depend on scheduling.

pub mod report;

pub use report::{
    ConversionIssue, ConversionReport, ConversionSeverity, IssueCode, SplitSummary,
};

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::Voc2YoloError;
use crate::ir::io_voc_xml::{self, VocLayout};
use crate::ir::io_yolo::{self, YoloLayout};
use crate::ir::split::{self, DEFAULT_SPLITS};
use crate::ir::ClassMap;

/// Split name used in the report for flat conversions.
pub const FLAT_SPLIT_NAME: &str = "all";

/// Everything one conversion run needs. Immutable once built.
#[derive(Clone, Debug)]
pub struct ConvertConfig {
    /// VOC dataset root (or its `Annotations/` directory).
    pub voc_root: PathBuf,
    /// Root of the YOLO tree to write.
    pub output_dir: PathBuf,
    pub classes: ClassMap,
    /// Split names to look up under `ImageSets/Main/`.
    pub splits: Vec<String>,
    /// Worker threads; `None` uses rayon's default (one per core).
    pub jobs: Option<usize>,
    /// Ignore split files and convert every annotation into `labels/`.
    pub flat: bool,
}

impl ConvertConfig {
    /// Config with the default `train`/`val`/`test` splits.
    pub fn new(
        voc_root: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        classes: ClassMap,
    ) -> Self {
        Self {
            voc_root: voc_root.into(),
            output_dir: output_dir.into(),
            classes,
            splits: DEFAULT_SPLITS.iter().map(|s| s.to_string()).collect(),
            jobs: None,
            flat: false,
        }
    }

    pub fn with_splits<I, S>(mut self, splits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.splits = splits.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn with_flat(mut self, flat: bool) -> Self {
        self.flat = flat;
        self
    }
}

/// Convert a VOC dataset to YOLO as described by `config`.
///
/// Returns `Err` only for whole-run failures: an invalid VOC root, an output
/// directory that cannot be created, or a worker pool that cannot start.
/// Everything else ends up in the returned report.
pub fn convert_dataset(config: &ConvertConfig) -> Result<ConversionReport, Voc2YoloError> {
    let voc = io_voc_xml::discover_layout(&config.voc_root)?;
    let yolo = YoloLayout::new(&config.output_dir);
    fs::create_dir_all(&yolo.root).map_err(Voc2YoloError::Io)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs.unwrap_or(0))
        .build()?;

    let mut report = ConversionReport::new(
        voc.root.display().to_string(),
        yolo.root.display().to_string(),
    );
    let ctx = ConvertContext {
        voc: &voc,
        yolo: &yolo,
        classes: &config.classes,
    };

    let mut produced: Vec<&str> = Vec::new();

    if config.flat {
        let ids = io_voc_xml::collect_annotation_ids(&voc)?;
        log::info!("converting {} annotation(s) without splits", ids.len());
        yolo.create_split_dirs(None)?;
        let summary = pool.install(|| convert_ids(&ctx, None, &ids, &mut report));
        report.splits.push(summary);
    } else {
        for split_name in &config.splits {
            let split_name = split_name.as_str();
            let index_path = voc.split_index_path(split_name);
            let index = match split::read_split_index(&index_path, split_name) {
                Ok(Some(index)) => index,
                Ok(None) => {
                    report.add(
                        ConversionIssue::warning(
                            IssueCode::MissingSplitFile,
                            format!(
                                "split index {} not found; split skipped",
                                index_path.display()
                            ),
                        )
                        .at(Some(split_name), None),
                    );
                    continue;
                }
                Err(err) => {
                    report.add(
                        ConversionIssue::error(
                            IssueCode::UnreadableSplitFile,
                            format!(
                                "failed to read {}: {err}; split skipped",
                                index_path.display()
                            ),
                        )
                        .at(Some(split_name), None),
                    );
                    continue;
                }
            };

            log::info!("converting split '{}' ({} id(s))", split_name, index.ids.len());
            yolo.create_split_dirs(Some(split_name))?;
            let summary =
                pool.install(|| convert_ids(&ctx, Some(split_name), &index.ids, &mut report));
            report.splits.push(summary);
            produced.push(split_name);
        }
    }

    let splits = (!config.flat).then_some(produced.as_slice());
    io_yolo::write_data_yaml(&yolo, splits, &config.classes)?;

    Ok(report)
}

struct ConvertContext<'a> {
    voc: &'a VocLayout,
    yolo: &'a YoloLayout,
    classes: &'a ClassMap,
}

/// What happened to one image id.
#[derive(Debug, Default)]
struct ImageOutcome {
    label_written: bool,
    image_copied: bool,
    objects_written: usize,
    objects_skipped: usize,
    issues: Vec<ConversionIssue>,
}

fn convert_ids(
    ctx: &ConvertContext<'_>,
    split: Option<&str>,
    ids: &[String],
    report: &mut ConversionReport,
) -> SplitSummary {
    let outcomes: Vec<ImageOutcome> = ids
        .par_iter()
        .map(|id| convert_image(ctx, split, id))
        .collect();

    let mut summary = SplitSummary {
        name: split.unwrap_or(FLAT_SPLIT_NAME).to_string(),
        ids: ids.len(),
        ..Default::default()
    };

    for outcome in outcomes {
        summary.labels_written += usize::from(outcome.label_written);
        summary.images_copied += usize::from(outcome.image_copied);
        summary.objects_written += outcome.objects_written;
        summary.objects_skipped += outcome.objects_skipped;
        for issue in outcome.issues {
            report.add(issue);
        }
    }

    summary
}

fn convert_image(ctx: &ConvertContext<'_>, split: Option<&str>, id: &str) -> ImageOutcome {
    let mut outcome = ImageOutcome::default();
    let annotation_path = ctx.voc.annotation_path(id);
    let image_path = ctx.voc.image_path(id);
    let has_image = image_path.is_file();

    if annotation_path.is_file() {
        match build_label_lines(ctx, &annotation_path, has_image.then_some(image_path.as_path())) {
            Ok(labels) => {
                outcome.objects_written = labels.lines.len();
                outcome.objects_skipped = labels.skipped.len();
                for name in labels.skipped {
                    outcome.issues.push(
                        ConversionIssue::warning(
                            IssueCode::UnknownClass,
                            format!("class '{name}' not in class map; object skipped"),
                        )
                        .at(split, Some(id)),
                    );
                }
                if labels.size_from_image {
                    outcome.issues.push(
                        ConversionIssue::info(
                            IssueCode::SizeFromImage,
                            format!(
                                "<size> missing or zero in {}; used dimensions of {}",
                                annotation_path.display(),
                                image_path.display()
                            ),
                        )
                        .at(split, Some(id)),
                    );
                }

                let label_path = ctx.yolo.label_path(split, id);
                match io_yolo::write_label_file(&label_path, &labels.lines) {
                    Ok(()) => outcome.label_written = true,
                    Err(err) => outcome.issues.push(
                        ConversionIssue::error(
                            IssueCode::WriteFailed,
                            format!("failed to write {}: {err}", label_path.display()),
                        )
                        .at(split, Some(id)),
                    ),
                }
            }
            Err(err) => outcome.issues.push(
                ConversionIssue::error(IssueCode::MalformedAnnotation, err.to_string())
                    .at(split, Some(id)),
            ),
        }
    } else {
        outcome.issues.push(
            ConversionIssue::warning(
                IssueCode::MissingAnnotation,
                format!("{} not found; no label written", annotation_path.display()),
            )
            .at(split, Some(id)),
        );
    }

    if has_image {
        let destination = ctx.yolo.image_path(split, &image_path);
        match io_yolo::copy_image(&image_path, &destination) {
            Ok(()) => outcome.image_copied = true,
            Err(err) => outcome.issues.push(
                ConversionIssue::error(
                    IssueCode::WriteFailed,
                    format!(
                        "failed to copy {} to {}: {err}",
                        image_path.display(),
                        destination.display()
                    ),
                )
                .at(split, Some(id)),
            ),
        }
    } else {
        outcome.issues.push(
            ConversionIssue::warning(
                IssueCode::MissingImage,
                format!("{} not found; image not copied", image_path.display()),
            )
            .at(split, Some(id)),
        );
    }

    outcome
}

/// Label rows for one annotation, computed before anything is written.
struct LabelLines {
    lines: Vec<String>,
    /// Class names of skipped objects, in document order.
    skipped: Vec<String>,
    size_from_image: bool,
}

fn build_label_lines(
    ctx: &ConvertContext<'_>,
    annotation_path: &Path,
    image_path: Option<&Path>,
) -> Result<LabelLines, Voc2YoloError> {
    let annotation = io_voc_xml::read_voc_xml(annotation_path)?;

    let (width, height, size_from_image) = match (annotation.dimensions(), image_path) {
        (Some((width, height)), _) => (width, height, false),
        (None, Some(image_path)) => {
            let (width, height) = read_image_dimensions(image_path)?;
            (width, height, true)
        }
        (None, None) => {
            return Err(Voc2YoloError::VocXmlParse {
                path: annotation_path.to_path_buf(),
                message: "missing or zero <size> and no image to read dimensions from"
                    .to_string(),
            })
        }
    };

    let mut lines = Vec::with_capacity(annotation.objects.len());
    let mut skipped = Vec::new();
    for object in annotation.objects {
        match ctx.classes.get(&object.name) {
            Some(class_id) => {
                let bbox = object.bbox.to_yolo(width as f64, height as f64);
                lines.push(io_yolo::format_label_line(class_id, &bbox));
            }
            None => skipped.push(object.name),
        }
    }

    Ok(LabelLines {
        lines,
        skipped,
        size_from_image,
    })
}

fn read_image_dimensions(path: &Path) -> Result<(u32, u32), Voc2YoloError> {
    let size = imagesize::size(path).map_err(|source| Voc2YoloError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    let width = u32::try_from(size.width).ok().filter(|w| *w > 0);
    let height = u32::try_from(size.height).ok().filter(|h| *h > 0);
    match (width, height) {
        (Some(width), Some(height)) => Ok((width, height)),
        _ => Err(Voc2YoloError::ImageDimensionInvalid {
            path: path.to_path_buf(),
            message: format!(
                "image dimensions {}x{} are not usable",
                size.width, size.height
            ),
        }),
    }
}
