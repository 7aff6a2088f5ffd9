//! Screen geometry.

use serde::{Deserialize, Serialize};
use storyreel_core::error::DomainError;
use storyreel_core::ids::Orientation;

/// Size of one page on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` unless both sides are finite and
    /// positive.
    pub fn new(width: f64, height: f64) -> Result<Self, DomainError> {
        let valid = |side: f64| side.is_finite() && side > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(DomainError::Validation(format!(
                "viewport must be positive, got {width}x{height}"
            )))
        }
    }

    /// Page extent along the scroll axis: height when vertical, width when
    /// horizontal.
    #[must_use]
    pub fn extent(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Vertical => self.height,
            Orientation::Horizontal => self.width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_rejects_degenerate_sizes() {
        assert!(Viewport::new(0.0, 800.0).is_err());
        assert!(Viewport::new(400.0, f64::NAN).is_err());
        assert!(Viewport::new(-1.0, 800.0).is_err());
    }

    #[test]
    fn test_extent_follows_orientation() {
        let viewport = Viewport::new(400.0, 800.0).unwrap();

        assert!((viewport.extent(Orientation::Vertical) - 800.0).abs() < f64::EPSILON);
        assert!((viewport.extent(Orientation::Horizontal) - 400.0).abs() < f64::EPSILON);
    }
}
