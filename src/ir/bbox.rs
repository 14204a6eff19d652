//! Bounding boxes and the VOC ⇄ YOLO geometry conversion.

use super::coord::Coord;
use super::{Normalized, Pixel};

/// An axis-aligned bounding box in XYXY form (xmin, ymin, xmax, ymax).
///
/// Ordering (`min <= max`) is not enforced. VOC files in the wild contain
/// inverted and zero-area boxes, and those pass through conversion unchanged
/// rather than failing it.
#[derive(Clone, Copy, PartialEq)]
pub struct BBoxXYXY<TSpace> {
    pub min: Coord<TSpace>,
    pub max: Coord<TSpace>,
}

/// A YOLO box: center and size, all four relative to the image dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YoloBox {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl<TSpace> BBoxXYXY<TSpace> {
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            min: Coord::new(xmin, ymin),
            max: Coord::new(xmax, ymax),
        }
    }

    /// Builds a box from center and size.
    #[inline]
    pub fn from_cxcywh(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self::from_xyxy(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0)
    }

    #[inline]
    pub fn xmin(&self) -> f64 {
        self.min.x
    }

    #[inline]
    pub fn ymin(&self) -> f64 {
        self.min.y
    }

    #[inline]
    pub fn xmax(&self) -> f64 {
        self.max.x
    }

    #[inline]
    pub fn ymax(&self) -> f64 {
        self.max.y
    }

    /// May be negative if the box is malformed (xmax < xmin).
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// May be negative if the box is malformed (ymax < ymin).
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Returns `(center_x, center_y, width, height)` in the box's own space.
    #[inline]
    pub fn to_cxcywh(&self) -> (f64, f64, f64, f64) {
        (
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            self.width(),
            self.height(),
        )
    }
}

impl<TSpace> std::fmt::Debug for BBoxXYXY<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBoxXYXY")
            .field("xmin", &self.min.x)
            .field("ymin", &self.min.y)
            .field("xmax", &self.max.x)
            .field("ymax", &self.max.y)
            .finish()
    }
}

impl BBoxXYXY<Pixel> {
    /// Converts a pixel box to YOLO's normalized center/size form.
    ///
    /// The center and size are computed in pixel space first and then divided
    /// by the image dimensions. No clamping is applied, so boxes that overhang
    /// the image produce values outside `[0, 1]`. A zero-area box produces a
    /// zero width or height.
    pub fn to_yolo(&self, image_width: f64, image_height: f64) -> YoloBox {
        let (cx, cy, w, h) = self.to_cxcywh();
        YoloBox {
            x_center: cx / image_width,
            y_center: cy / image_height,
            width: w / image_width,
            height: h / image_height,
        }
    }
}

impl BBoxXYXY<Normalized> {
    /// Converts normalized coordinates back to pixels.
    pub fn to_pixel(&self, image_width: f64, image_height: f64) -> BBoxXYXY<Pixel> {
        BBoxXYXY {
            min: self.min.rescale(image_width, image_height),
            max: self.max.rescale(image_width, image_height),
        }
    }
}

impl YoloBox {
    /// Recovers the pixel box this YOLO box was computed from.
    pub fn to_pixel(&self, image_width: f64, image_height: f64) -> BBoxXYXY<Pixel> {
        BBoxXYXY::<Normalized>::from_cxcywh(self.x_center, self.y_center, self.width, self.height)
            .to_pixel(image_width, image_height)
    }
}
