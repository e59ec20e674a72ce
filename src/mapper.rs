//! Domain-to-screen coordinate mapping.
//!
//! Every diagram that plots data (function graphs, bar charts, normalized
//! particle positions) goes through one of the two maps here, so that a value
//! at the end of an axis always lands exactly on the inset edge of the plot.

use glam::DVec2;

/// Affine map from a domain range onto a pixel span, with inset padding.
///
/// `p1` may be smaller than `p0` (screen y grows downward, so a y axis is
/// usually mapped onto `[bottom, top]`); padding is always applied inward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMap {
    pub lo: f64,
    pub hi: f64,
    pub p0: f64,
    pub p1: f64,
    pub padding: f64,
}

impl AxisMap {
    pub fn new(domain: [f64; 2], span: [f64; 2]) -> Self {
        Self {
            lo: domain[0],
            hi: domain[1],
            p0: span[0],
            p1: span[1],
            padding: 0.0,
        }
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Map a domain value to a pixel coordinate.
    ///
    /// A zero-width domain (`lo == hi`) divides by 1 instead of 0, so the
    /// result is finite and the value just shifts by `v - lo` fractions.
    pub fn to_screen(&self, v: f64) -> f64 {
        let dir = if self.p1 < self.p0 { -1.0 } else { 1.0 };
        let inner = self.p1 - self.p0 - 2.0 * dir * self.padding;
        self.p0 + dir * self.padding + self.fraction(v) * inner
    }

    /// Position of `v` within the domain, 0 at `lo` and 1 at `hi`
    pub fn fraction(&self, v: f64) -> f64 {
        let width = self.hi - self.lo;
        let width = if width == 0.0 { 1.0 } else { width };
        (v - self.lo) / width
    }

    pub fn contains(&self, v: f64) -> bool {
        let (min, max) = if self.lo <= self.hi {
            (self.lo, self.hi)
        } else {
            (self.hi, self.lo)
        };
        v >= min && v <= max
    }
}

/// A pair of axis maps for 2D plots
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotMap {
    pub x: AxisMap,
    pub y: AxisMap,
}

impl PlotMap {
    pub fn to_screen(&self, p: DVec2) -> DVec2 {
        DVec2::new(self.x.to_screen(p.x), self.y.to_screen(p.y))
    }
}

/// Scale a normalized `[0,1]^2` position to pixel bounds (no padding)
#[inline]
pub fn scale_normalized(p: DVec2, bounds: DVec2) -> DVec2 {
    p * bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_land_on_padded_edges() {
        let map = AxisMap::new([-10.0, 10.0], [0.0, 800.0]).with_padding(50.0);
        assert_eq!(map.to_screen(-10.0), 50.0);
        assert_eq!(map.to_screen(10.0), 750.0);
        assert_eq!(map.to_screen(0.0), 400.0);
    }

    #[test]
    fn inverted_span_pads_inward() {
        let map = AxisMap::new([-5.0, 5.0], [450.0, 0.0]).with_padding(50.0);
        assert_eq!(map.to_screen(-5.0), 400.0);
        assert_eq!(map.to_screen(5.0), 50.0);
    }

    #[test]
    fn degenerate_domain_is_finite() {
        let map = AxisMap::new([3.0, 3.0], [0.0, 100.0]).with_padding(10.0);
        assert_eq!(map.to_screen(3.0), 10.0);
        assert!(map.to_screen(4.0).is_finite());
    }

    #[test]
    fn normalized_scaling() {
        let p = scale_normalized(DVec2::new(0.25, 0.5), DVec2::new(800.0, 500.0));
        assert_eq!(p, DVec2::new(200.0, 250.0));
    }
}
