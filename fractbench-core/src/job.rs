use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Violated `JobSpec` invariant. Raised by the loader, never by the
/// rendering core, which assumes validated specs.
#[derive(Debug, Error, PartialEq)]
pub enum JobSpecError {
    #[error("viewport is inverted or empty: left_x {left_x} >= right_x {right_x}")]
    InvertedViewport { left_x: f64, right_x: f64 },

    #[error("resolution must be positive, got {p_x}x{p_y}")]
    ZeroResolution { p_x: u32, p_y: u32 },
}

/// Immutable description of one image to render.
///
/// The viewport is the rectangle of the complex plane with its left edge at
/// `left_x`, right edge at `right_x`, and top edge at `top_y`; the bottom
/// edge is implied by the square-pixel step size. `(a, b)` is the constant
/// `c` of the quadratic map `z <- z^2 + c`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    pub left_x: f64,
    pub right_x: f64,
    pub top_y: f64,
    pub p_x: u32,
    pub p_y: u32,
    pub a: f64,
    pub b: f64,
    pub iter_limit: u32,
}

impl JobSpec {
    /// Per-pixel coordinate delta, identical for both axes.
    pub fn step_size(&self) -> f64 {
        (self.right_x - self.left_x) / self.p_x as f64
    }

    /// Check the invariants the rendering core relies on.
    pub fn validate(&self) -> Result<(), JobSpecError> {
        if self.left_x >= self.right_x {
            return Err(JobSpecError::InvertedViewport {
                left_x: self.left_x,
                right_x: self.right_x,
            });
        }
        if self.p_x == 0 || self.p_y == 0 {
            return Err(JobSpecError::ZeroResolution {
                p_x: self.p_x,
                p_y: self.p_y,
            });
        }
        Ok(())
    }
}
