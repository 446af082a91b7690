//! Multi-core CPU rendering path: row-band domain decomposition over a
//! fixed worker pool.

pub mod band;
pub mod chunk;
pub mod scheduler;

pub use band::render_band;
pub use chunk::{partition, Chunk};
pub use scheduler::{render_image, render_image_with_workers, RenderError};
