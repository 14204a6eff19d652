//! Typed 2D points.

use std::marker::PhantomData;

/// A point tagged with its coordinate space ([`Pixel`](super::Pixel) or
/// [`Normalized`](super::Normalized)).
#[derive(Clone, Copy, PartialEq)]
pub struct Coord<TSpace> {
    pub x: f64,
    pub y: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Coord<TSpace> {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            _space: PhantomData,
        }
    }

    /// Scales both axes, moving the point into another coordinate space.
    #[inline]
    pub(crate) fn rescale<TOther>(&self, sx: f64, sy: f64) -> Coord<TOther> {
        Coord::new(self.x * sx, self.y * sy)
    }
}

impl<TSpace> std::fmt::Debug for Coord<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coord")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Normalized, Pixel};

    #[test]
    fn rescale_changes_space_and_values() {
        let px: Coord<Pixel> = Coord::new(50.0, 20.0);
        let norm: Coord<Normalized> = px.rescale(1.0 / 100.0, 1.0 / 40.0);
        assert_eq!(norm.x, 0.5);
        assert_eq!(norm.y, 0.5);
    }
}
