//! Core data model and host pixel kernel for escape-time rendering.
//!
//! This crate is deliberately free of I/O and device code: it defines the
//! job description, the byte-grid image type, and the per-pixel iteration
//! that both the CPU and GPU paths implement.

pub mod image;
pub mod job;
pub mod kernel;

pub use image::Image;
pub use job::{JobSpec, JobSpecError};
pub use kernel::{escape_iterations, shade};

/// What a render path hands back to the caller: the finished grid and the
/// wall-clock time the whole operation took, in milliseconds.
#[derive(Debug)]
pub struct RenderResult {
    pub elapsed_ms: f64,
    pub image: Image,
}
