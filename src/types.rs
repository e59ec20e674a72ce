//! Small numeric newtypes shared by the mapper, evaluators and renderers.
//!
//! Points themselves are plain `glam::DVec2` in screen pixels; these types
//! cover the values that are easy to mix up (degrees vs radians, a viewport
//! vs a point).

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use glam::DVec2;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

fn check_positive(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else if val == 0.0 {
        Err(NumericError::Zero)
    } else if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// Pixel dimensions of a diagram's drawing surface (SVG viewBox)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Create a viewport (unchecked, for the built-in constants).
    pub const fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }

    /// Create a viewport from user-provided dimensions
    pub fn try_new(width: f64, height: f64) -> Result<Self, NumericError> {
        Ok(Viewport {
            width: check_positive(width)?,
            height: check_positive(height)?,
        })
    }

    pub fn size(self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    pub fn center(self) -> DVec2 {
        self.size() / 2.0
    }

    pub fn contains(self, p: DVec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }
}

/// Angle in radians
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Radians(pub f64);

impl Radians {
    pub fn from_degrees(deg: f64) -> Self {
        Radians(deg.to_radians())
    }

    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    pub fn to_degrees(self) -> f64 {
        self.0.to_degrees()
    }

    /// Unit vector pointing along this angle (screen space, y down)
    pub fn unit(self) -> DVec2 {
        DVec2::new(self.0.cos(), self.0.sin())
    }

    /// Rotate `p` about `center` by this angle
    pub fn rotate_about(self, p: DVec2, center: DVec2) -> DVec2 {
        center + DVec2::from_angle(self.0).rotate(p - center)
    }
}

impl Add for Radians {
    type Output = Radians;
    fn add(self, rhs: Radians) -> Radians {
        Radians(self.0 + rhs.0)
    }
}

impl Sub for Radians {
    type Output = Radians;
    fn sub(self, rhs: Radians) -> Radians {
        Radians(self.0 - rhs.0)
    }
}

impl Mul<f64> for Radians {
    type Output = Radians;
    fn mul(self, rhs: f64) -> Radians {
        Radians(self.0 * rhs)
    }
}

impl Neg for Radians {
    type Output = Radians;
    fn neg(self) -> Radians {
        Radians(-self.0)
    }
}

impl fmt::Display for Radians {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}rad", self.0)
    }
}
