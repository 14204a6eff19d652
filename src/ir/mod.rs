//! Dataset types and on-disk formats.
//!
//! VOC boxes are pixel-space XYXY; YOLO boxes are normalized center/size.
//! The [`Pixel`] / [`Normalized`] markers keep the two apart at compile time,
//! and [`BBoxXYXY::to_yolo`] is the single place that crosses between them.
//!
//! # Example
//!
//! ```
//! use voc2yolo::ir::{BBoxXYXY, Pixel};
//! use voc2yolo::ir::io_yolo::format_label_line;
//!
//! let bbox = BBoxXYXY::<Pixel>::from_xyxy(0.0, 0.0, 10.0, 20.0);
//! let line = format_label_line(0, &bbox.to_yolo(100.0, 200.0));
//! assert_eq!(line, "0 0.050000 0.050000 0.100000 0.100000");
//! ```

mod bbox;
mod class_map;
mod coord;
pub mod io_voc_xml;
pub mod io_yolo;
mod space;
pub mod split;

pub use bbox::{BBoxXYXY, YoloBox};
pub use class_map::ClassMap;
pub use coord::Coord;
pub use space::{Normalized, Pixel};
