//! GPU rendering path: wgpu compute-shader escape-time rendering.
//!
//! Lifecycle: [`GpuContext::init`] binds a device once, [`RenderKernel::new`]
//! compiles the shader once, then any number of [`render_image`] calls may
//! follow. [`GpuContext::shutdown`] consumes the context, so the type system
//! rules out renders after teardown.

mod context;
mod error;
mod kernel;
mod launch;

pub use context::{DeviceLimits, GpuContext};
pub use error::GpuError;
pub use kernel::{BlockShape, RenderKernel};
pub use launch::{render_image, LaunchPlan};
