//! Compiled kernel handle: shader module, bind group layout, pipeline.

use crate::context::GpuContext;
use crate::error::GpuError;

/// Workgroup shape baked into the compiled kernel.
///
/// `x` is the device lane width so each row of a block maps onto one
/// lockstep group, giving coalesced stores along image rows; `y` fills the
/// rest of the invocation budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockShape {
    pub x: u32,
    pub y: u32,
}

impl BlockShape {
    pub fn for_context(ctx: &GpuContext) -> Self {
        Self {
            x: ctx.limits.lane_width,
            y: (ctx.limits.max_invocations / ctx.limits.lane_width).max(1),
        }
    }

    pub fn threads(&self) -> u32 {
        self.x * self.y
    }
}

/// Process-wide compiled kernel: built once after context init, reused by
/// every render until shutdown.
pub struct RenderKernel {
    pub(crate) pipeline: wgpu::ComputePipeline,
    pub(crate) bind_group_layout: wgpu::BindGroupLayout,
    pub block: BlockShape,
}

impl RenderKernel {
    /// Compile `shaders/escape.wgsl` for the bound device.
    ///
    /// The workgroup size cannot vary per dispatch in WGSL, so the block
    /// shape chosen from the device limits is substituted into the shader
    /// template here. Compilation problems surface through a validation
    /// error scope rather than aborting the process.
    pub fn new(ctx: &GpuContext) -> Result<Self, GpuError> {
        let block = BlockShape::for_context(ctx);
        log::debug!("building kernel with {}x{} workgroups", block.x, block.y);

        let source = include_str!("shaders/escape.wgsl")
            .replace("{{WG_X}}", &block.x.to_string())
            .replace("{{WG_Y}}", &block.y.to_string());

        ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("escape.wgsl"),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("escape_bind_group_layout"),
                    entries: &[
                        // 0 - render params uniform
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::COMPUTE,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                        // 1 - dense pixel buffer, one cell per padded pixel
                        wgpu::BindGroupLayoutEntry {
                            binding: 1,
                            visibility: wgpu::ShaderStages::COMPUTE,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Storage { read_only: false },
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                    ],
                });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("escape_pipeline_layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipeline = ctx
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("escape_pipeline"),
                layout: Some(&pipeline_layout),
                module: &module,
                entry_point: Some("render"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            });

        if let Some(error) = pollster::block_on(ctx.device.pop_error_scope()) {
            return Err(GpuError::KernelBuild(error.to_string()));
        }

        Ok(Self {
            pipeline,
            bind_group_layout,
            block,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DeviceLimits;

    fn block_for(limits: DeviceLimits) -> BlockShape {
        BlockShape {
            x: limits.lane_width,
            y: (limits.max_invocations / limits.lane_width).max(1),
        }
    }

    #[test]
    fn block_fills_invocation_budget() {
        let block = block_for(DeviceLimits {
            max_invocations: 1024,
            lane_width: 32,
        });
        assert_eq!((block.x, block.y), (32, 32));
        assert_eq!(block.threads(), 1024);
    }

    #[test]
    fn narrow_budget_keeps_one_lane_row() {
        // A budget smaller than the lane width still yields a launchable
        // one-row block.
        let block = block_for(DeviceLimits {
            max_invocations: 16,
            lane_width: 32,
        });
        assert_eq!((block.x, block.y), (32, 1));
    }

    #[test]
    fn shader_template_slots_are_substituted() {
        let source = include_str!("shaders/escape.wgsl")
            .replace("{{WG_X}}", "8")
            .replace("{{WG_Y}}", "4");
        assert!(!source.contains("{{"));
        assert!(source.contains("@workgroup_size(8, 4, 1)"));
    }
}
