#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// `(class name, xmin, ymin, xmax, ymax)`
pub type ObjectSpec<'a> = (&'a str, f64, f64, f64, f64);

pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

/// Writes a small bitmap under the `.jpg` name VOC expects. The converter
/// copies bytes verbatim and sniffs headers by content, so the format does
/// not matter.
pub fn write_image(root: &Path, id: &str, width: u32, height: u32) {
    let path = root.join("JPEGImages").join(format!("{id}.jpg"));
    fs::create_dir_all(path.parent().expect("image parent")).expect("create JPEGImages");
    fs::write(path, bmp_bytes(width, height)).expect("write image");
}

pub fn voc_xml(width: u32, height: u32, objects: &[ObjectSpec<'_>]) -> String {
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<annotation>\n  <folder>VOC</folder>\n  <size>\n    <width>{width}</width>\n    <height>{height}</height>\n    <depth>3</depth>\n  </size>\n"
    );
    for (name, xmin, ymin, xmax, ymax) in objects {
        xml.push_str(&format!(
            "  <object>\n    <name>{name}</name>\n    <difficult>0</difficult>\n    <bndbox>\n      <xmin>{xmin}</xmin>\n      <ymin>{ymin}</ymin>\n      <xmax>{xmax}</xmax>\n      <ymax>{ymax}</ymax>\n    </bndbox>\n  </object>\n"
        ));
    }
    xml.push_str("</annotation>\n");
    xml
}

pub fn write_annotation(root: &Path, id: &str, width: u32, height: u32, objects: &[ObjectSpec<'_>]) {
    write_raw_annotation(root, id, &voc_xml(width, height, objects));
}

pub fn write_raw_annotation(root: &Path, id: &str, xml: &str) {
    let path = root.join("Annotations").join(format!("{id}.xml"));
    fs::create_dir_all(path.parent().expect("annotation parent")).expect("create Annotations");
    fs::write(path, xml).expect("write annotation");
}

pub fn write_split(root: &Path, split: &str, ids: &[&str]) {
    let dir = root.join("ImageSets/Main");
    fs::create_dir_all(&dir).expect("create ImageSets/Main");
    let mut content = ids.join("\n");
    content.push('\n');
    fs::write(dir.join(format!("{split}.txt")), content).expect("write split index");
}

/// A VOC root with two train images, one val image and no test split.
pub fn create_sample_voc_dataset(root: &Path) {
    fs::create_dir_all(root.join("Annotations")).expect("create Annotations");

    write_annotation(
        root,
        "000001",
        100,
        200,
        &[("jg", 0.0, 0.0, 10.0, 20.0), ("ld", 50.0, 100.0, 100.0, 200.0)],
    );
    write_image(root, "000001", 100, 200);

    write_annotation(root, "000002", 640, 480, &[("zsp", 64.0, 48.0, 320.0, 240.0)]);
    write_image(root, "000002", 640, 480);

    write_annotation(root, "000003", 50, 50, &[("txx", 5.0, 5.0, 45.0, 45.0)]);
    write_image(root, "000003", 50, 50);

    write_split(root, "train", &["000001", "000002"]);
    write_split(root, "val", &["000003"]);
}

/// Sorted file names directly inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| {
            entry
                .expect("dir entry")
                .file_name()
                .to_string_lossy()
                .to_string()
        })
        .collect();
    names.sort();
    names
}
