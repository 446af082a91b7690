//! GPU error types.

use thiserror::Error;

/// Fatal GPU-path failures. There is no CPU fallback; callers abort the
/// render operation on any of these.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("no GPU adapter at device id {0}")]
    InvalidDeviceId(usize),

    #[error("failed to create device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    #[error("kernel compilation failed: {0}")]
    KernelBuild(String),

    #[error("device buffer allocation failed: {0}")]
    Allocation(String),

    #[error("buffer mapping failed: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    #[error("device channel closed during readback")]
    ReadbackChannel,
}
