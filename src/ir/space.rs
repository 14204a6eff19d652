//! Coordinate space markers.
//!
//! VOC stores boxes in pixels, YOLO stores them as fractions of the image
//! size. The markers keep the two from being mixed up at compile time.

use std::fmt;

/// Absolute pixel positions, (0, 0) at the top-left corner of the image.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Positions divided by the image width/height.
///
/// Values inside the image fall in `[0, 1]`, but nothing clamps them: a VOC
/// box that overhangs the image normalizes to values outside that range.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}

impl fmt::Debug for Pixel {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl fmt::Debug for Normalized {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}
