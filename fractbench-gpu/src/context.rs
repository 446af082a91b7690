//! GPU device initialization, capability queries, and teardown.

use crate::error::GpuError;

/// Lane width assumed when the backend does not report subgroup sizes.
pub const FALLBACK_LANE_WIDTH: u32 = 32;

/// The two device limits the launch planner sizes thread blocks from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceLimits {
    /// Maximum threads in one workgroup.
    pub max_invocations: u32,
    /// Hardware lockstep group width; rows are laid along it for coalesced
    /// stores.
    pub lane_width: u32,
}

impl DeviceLimits {
    fn from_wgpu(limits: &wgpu::Limits) -> Self {
        let lane_width = if limits.min_subgroup_size > 0 {
            limits.min_subgroup_size
        } else {
            FALLBACK_LANE_WIDTH
        };
        Self {
            max_invocations: limits.max_compute_invocations_per_workgroup,
            lane_width,
        }
    }
}

/// Holds the bound wgpu device and queue plus the queried limits.
///
/// Created once per process, read-only across renders, released exactly
/// once by [`GpuContext::shutdown`].
#[derive(Debug)]
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub limits: DeviceLimits,
}

impl GpuContext {
    /// Bind the adapter with the given index.
    ///
    /// Adapters are enumerated explicitly rather than letting wgpu's power
    /// heuristics choose, so `device_id` addresses the same adapter on
    /// every run. An out-of-range id is fatal.
    pub fn init(device_id: usize) -> Result<Self, GpuError> {
        pollster::block_on(Self::init_async(device_id))
    }

    async fn init_async(device_id: usize) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .enumerate_adapters(wgpu::Backends::all())
            .into_iter()
            .nth(device_id)
            .ok_or(GpuError::InvalidDeviceId(device_id))?;

        log::info!("GPU adapter {device_id}: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("fractbench"),
                    required_features: wgpu::Features::empty(),
                    // Adapter limits directly: compute shaders need storage
                    // buffers, which the downlevel defaults exclude.
                    required_limits: adapter.limits(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let limits = DeviceLimits::from_wgpu(&device.limits());
        log::debug!(
            "device limits: {} invocations/workgroup, lane width {}",
            limits.max_invocations,
            limits.lane_width
        );

        Ok(Self {
            device,
            queue,
            limits,
        })
    }

    /// Release the device context.
    ///
    /// Consumes the context, so no kernel built on it can be launched
    /// afterwards; render handles borrowing it will not compile past this
    /// point.
    pub fn shutdown(self) {
        log::debug!("GPU context released");
    }
}
