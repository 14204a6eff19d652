//! Pascal VOC reader.
//!
//! Supports the standard VOC layout: `Annotations/` with one XML file per
//! image, `JPEGImages/` with the pictures and `ImageSets/Main/` with the
//! split index files.

use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;
use walkdir::WalkDir;

use super::{BBoxXYXY, Pixel};
use crate::error::Voc2YoloError;

const VOC_XML_EXTENSION: &str = "xml";
const VOC_IMAGE_EXTENSION: &str = "jpg";

/// Resolved directories of a VOC dataset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocLayout {
    pub root: PathBuf,
    pub annotations_dir: PathBuf,
    pub images_dir: PathBuf,
    pub image_sets_dir: PathBuf,
}

impl VocLayout {
    /// Path of the annotation document for an image id.
    pub fn annotation_path(&self, id: &str) -> PathBuf {
        self.annotations_dir.join(format!("{id}.{VOC_XML_EXTENSION}"))
    }

    /// Path of the JPEG for an image id.
    pub fn image_path(&self, id: &str) -> PathBuf {
        self.images_dir.join(format!("{id}.{VOC_IMAGE_EXTENSION}"))
    }

    /// Path of the index file for a split (`ImageSets/Main/<split>.txt`).
    pub fn split_index_path(&self, split: &str) -> PathBuf {
        self.image_sets_dir.join(format!("{split}.txt"))
    }
}

/// One parsed annotation document.
#[derive(Clone, Debug, PartialEq)]
pub struct VocAnnotation {
    /// `(width, height)` as written in `<size>`, if present.
    pub size: Option<(u32, u32)>,
    /// Objects in document order.
    pub objects: Vec<VocObject>,
}

impl VocAnnotation {
    /// Usable image dimensions: present and both positive.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.size.filter(|&(width, height)| width > 0 && height > 0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VocObject {
    pub name: String,
    pub bbox: BBoxXYXY<Pixel>,
}

/// Resolve the VOC layout for `path`.
///
/// `path` may be the dataset root or its `Annotations/` directory.
/// `JPEGImages/` and `ImageSets/Main/` need not exist; missing files under
/// them are reported per image / per split during conversion.
pub fn discover_layout(input: &Path) -> Result<VocLayout, Voc2YoloError> {
    if !input.is_dir() {
        return Err(Voc2YoloError::VocLayoutInvalid {
            path: input.to_path_buf(),
            message: "input must be a directory".to_string(),
        });
    }

    let root = if input.join("Annotations").is_dir() {
        input.to_path_buf()
    } else if is_dir_named(input, "Annotations") {
        input
            .parent()
            .ok_or_else(|| Voc2YoloError::VocLayoutInvalid {
                path: input.to_path_buf(),
                message: "Annotations directory has no parent directory".to_string(),
            })?
            .to_path_buf()
    } else {
        return Err(Voc2YoloError::VocLayoutInvalid {
            path: input.to_path_buf(),
            message: "expected a VOC dataset root containing Annotations/ or an Annotations/ directory itself"
                .to_string(),
        });
    };

    Ok(VocLayout {
        annotations_dir: root.join("Annotations"),
        images_dir: root.join("JPEGImages"),
        image_sets_dir: root.join("ImageSets").join("Main"),
        root,
    })
}

/// List the image ids of every `*.xml` directly under `Annotations/`, sorted.
///
/// The extension match is exact so that every returned id resolves through
/// [`VocLayout::annotation_path`].
///
/// Nested XML files are not part of the VOC layout; they are skipped with a
/// warning.
pub fn collect_annotation_ids(layout: &VocLayout) -> Result<Vec<String>, Voc2YoloError> {
    let dir = &layout.annotations_dir;
    let mut ids = Vec::new();

    for entry in fs::read_dir(dir).map_err(Voc2YoloError::Io)? {
        let entry = entry.map_err(Voc2YoloError::Io)?;
        let path = entry.path();
        if path.is_file() && has_xml_extension(&path) {
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(stem.to_string());
            } else {
                log::warn!("skipping annotation with non UTF-8 name: {}", path.display());
            }
        }
    }
    ids.sort();

    let mut nested_xml = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false).min_depth(2) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("skipping unreadable entry under {}: {err}", dir.display());
                continue;
            }
        };

        if entry.file_type().is_file() && has_xml_extension(entry.path()) {
            nested_xml.push(entry.path().to_path_buf());
        }
    }

    if !nested_xml.is_empty() {
        nested_xml.sort_by_cached_key(|path| rel_string(dir, path));
        log::warn!(
            "Annotations/ is scanned flat (non-recursive); skipping {} nested .xml file(s), e.g. {}",
            nested_xml.len(),
            rel_string(dir, &nested_xml[0])
        );
    }

    Ok(ids)
}

/// Read and parse one VOC annotation file.
pub fn read_voc_xml(path: &Path) -> Result<VocAnnotation, Voc2YoloError> {
    let xml = fs::read_to_string(path).map_err(|source| Voc2YoloError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("failed to read file: {source}"),
    })?;
    parse_voc_xml_str(&xml, path)
}

/// Parse VOC XML from a string. `path` is only used in error messages.
pub fn parse_voc_xml_str(xml: &str, path: &Path) -> Result<VocAnnotation, Voc2YoloError> {
    let document =
        roxmltree::Document::parse(xml).map_err(|source| Voc2YoloError::VocXmlParse {
            path: path.to_path_buf(),
            message: source.to_string(),
        })?;

    let annotation = document.root_element();
    if annotation.tag_name().name() != "annotation" {
        return Err(Voc2YoloError::VocXmlParse {
            path: path.to_path_buf(),
            message: "missing <annotation> root element".to_string(),
        });
    }

    let size = match child_element(annotation, "size") {
        Some(size) => Some((
            parse_required_u32(size, "width", path, "<size>")?,
            parse_required_u32(size, "height", path, "<size>")?,
        )),
        None => None,
    };

    let mut objects = Vec::new();
    for object in annotation
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
    {
        let name = required_child_text(object, "name", path, "<object>")?;
        let bndbox = required_child_element(object, "bndbox", path, "<object>")?;

        let xmin = parse_required_f64(bndbox, "xmin", path, "<bndbox>")?;
        let xmax = parse_required_f64(bndbox, "xmax", path, "<bndbox>")?;
        let ymin = parse_required_f64(bndbox, "ymin", path, "<bndbox>")?;
        let ymax = parse_required_f64(bndbox, "ymax", path, "<bndbox>")?;

        objects.push(VocObject {
            name,
            bbox: BBoxXYXY::from_xyxy(xmin, ymin, xmax, ymax),
        });
    }

    Ok(VocAnnotation {
        size,
        objects,
    })
}

fn required_child_element<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<Node<'a, 'input>, Voc2YoloError> {
    child_element(node, tag).ok_or_else(|| Voc2YoloError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn required_child_text(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<String, Voc2YoloError> {
    optional_child_text(node, tag).ok_or_else(|| Voc2YoloError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn parse_required_u32(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<u32, Voc2YoloError> {
    let raw = required_child_text(node, tag, path, context)?;
    raw.parse::<u32>().map_err(|_| Voc2YoloError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("invalid <{tag}> value '{raw}' in {context}; expected u32"),
    })
}

fn parse_required_f64(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<f64, Voc2YoloError> {
    let raw = required_child_text(node, tag, path, context)?;
    raw.parse::<f64>().map_err(|_| Voc2YoloError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!(
            "invalid <{tag}> value '{raw}' in {context}; expected floating-point number"
        ),
    })
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn optional_child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

fn has_xml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == VOC_XML_EXTENSION)
        .unwrap_or(false)
}

fn is_dir_named(path: &Path, dir_name: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.eq_ignore_ascii_case(dir_name))
        .unwrap_or(false)
}

fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
