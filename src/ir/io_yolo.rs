//! Ultralytics-style YOLO writer.
//!
//! Output layout is `images/<split>/<id>.jpg` + `labels/<split>/<id>.txt`
//! (or `images/` + `labels/` without a split level in flat mode), plus a
//! `data.yaml` describing the splits and class names.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{ClassMap, YoloBox};
use crate::error::Voc2YoloError;

const LABEL_EXTENSION: &str = "txt";

/// Output directories of a YOLO dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YoloLayout {
    pub root: PathBuf,
}

impl YoloLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `images/<split>/`, or `images/` when `split` is `None`.
    pub fn images_dir(&self, split: Option<&str>) -> PathBuf {
        let dir = self.root.join("images");
        match split {
            Some(split) => dir.join(split),
            None => dir,
        }
    }

    /// `labels/<split>/`, or `labels/` when `split` is `None`.
    pub fn labels_dir(&self, split: Option<&str>) -> PathBuf {
        let dir = self.root.join("labels");
        match split {
            Some(split) => dir.join(split),
            None => dir,
        }
    }

    pub fn label_path(&self, split: Option<&str>, id: &str) -> PathBuf {
        self.labels_dir(split).join(format!("{id}.{LABEL_EXTENSION}"))
    }

    /// Destination for a copied image; keeps the source file name.
    pub fn image_path(&self, split: Option<&str>, source: &Path) -> PathBuf {
        let dir = self.images_dir(split);
        match source.file_name() {
            Some(name) => dir.join(name),
            None => dir,
        }
    }

    /// Create `images/<split>/` and `labels/<split>/`.
    pub fn create_split_dirs(&self, split: Option<&str>) -> Result<(), Voc2YoloError> {
        fs::create_dir_all(self.images_dir(split)).map_err(Voc2YoloError::Io)?;
        fs::create_dir_all(self.labels_dir(split)).map_err(Voc2YoloError::Io)?;
        Ok(())
    }
}

/// Format one label row: `<class_id> <cx> <cy> <w> <h>` at 6 decimals.
pub fn format_label_line(class_id: u32, bbox: &YoloBox) -> String {
    format!(
        "{} {:.6} {:.6} {:.6} {:.6}",
        class_id, bbox.x_center, bbox.y_center, bbox.width, bbox.height
    )
}

/// Write a label file in one go, one line per row with a trailing newline.
///
/// An empty `lines` slice produces an empty file: the image was annotated
/// but contains none of the mapped classes. The target is replaced
/// atomically, so a failed write leaves any previous file untouched.
pub fn write_label_file(path: &Path, lines: &[String]) -> Result<(), Voc2YoloError> {
    let mut content = String::with_capacity(lines.len() * 48);
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    replace_atomically(path, |tmp| fs::write(tmp, &content)).map_err(Voc2YoloError::Io)
}

/// Copy an image into the output tree, replacing `destination` atomically.
pub fn copy_image(source: &Path, destination: &Path) -> Result<(), Voc2YoloError> {
    replace_atomically(destination, |tmp| fs::copy(source, tmp).map(|_| ()))
        .map_err(Voc2YoloError::Io)
}

/// Fill a sibling temp file with `fill`, then rename it over `path`.
///
/// The temp file lives in the same directory so the rename never crosses
/// filesystems. It is removed again if any step fails.
fn replace_atomically<F>(path: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let tmp = temp_sibling(path);
    let result = fill(&tmp).and_then(|()| fs::rename(&tmp, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `data.yaml` for the converted dataset.
///
/// `splits` lists the splits that were actually produced; they are written
/// as `images/<split>` entries. `None` marks flat output, where both `train`
/// and `val` point at `images`.
pub fn write_data_yaml(
    layout: &YoloLayout,
    splits: Option<&[&str]>,
    class_map: &ClassMap,
) -> Result<(), Voc2YoloError> {
    let mut yaml = format!(
        "path: {}\n",
        yaml_single_quoted(&layout.root.to_string_lossy())
    );

    match splits {
        Some(splits) => {
            for split in splits {
                yaml.push_str(&format!(
                    "{}: {}\n",
                    yaml_single_quoted(split),
                    yaml_single_quoted(&format!("images/{split}"))
                ));
            }
        }
        None => yaml.push_str("'train': 'images'\n'val': 'images'\n"),
    }

    yaml.push_str("\nnames:\n");
    for (idx, name) in class_map.names_by_id().iter().enumerate() {
        yaml.push_str(&format!("  {}: {}\n", idx, yaml_single_quoted(name)));
    }

    fs::create_dir_all(&layout.root).map_err(Voc2YoloError::Io)?;
    fs::write(layout.root.join("data.yaml"), yaml).map_err(Voc2YoloError::Io)
}

fn yaml_single_quoted(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}
