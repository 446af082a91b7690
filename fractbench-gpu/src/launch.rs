//! Launch planning and the per-render dispatch/readback sequence.

use std::time::Instant;

use bytemuck::{Pod, Zeroable};
use fractbench_core::{Image, JobSpec, RenderResult};
use wgpu::util::DeviceExt;

use crate::context::GpuContext;
use crate::error::GpuError;
use crate::kernel::{BlockShape, RenderKernel};

/// Block/grid geometry for one render.
///
/// The grid covers the image by ceiling division, so the launched thread
/// space is the requested resolution padded up to the next block-size
/// multiple on each axis; the padding is cropped away after readback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaunchPlan {
    pub block: BlockShape,
    pub grid_x: u32,
    pub grid_y: u32,
}

impl LaunchPlan {
    pub fn new(p_x: u32, p_y: u32, block: BlockShape) -> Self {
        Self {
            block,
            grid_x: p_x.div_ceil(block.x),
            grid_y: p_y.div_ceil(block.y),
        }
    }

    /// Padded width `r_x = block_x * grid_x >= p_x`.
    pub fn padded_x(&self) -> u32 {
        self.block.x * self.grid_x
    }

    /// Padded height `r_y = block_y * grid_y >= p_y`.
    pub fn padded_y(&self) -> u32 {
        self.block.y * self.grid_y
    }

    /// Right viewport edge adjusted for column padding.
    ///
    /// The device derives its step from the padded width, so when columns
    /// are padded the right edge moves out by one step per extra column;
    /// the padded viewport then has the same per-pixel step as the
    /// requested one.
    pub fn extended_right_x(&self, job: &JobSpec) -> f64 {
        let extra_columns = self.padded_x() - job.p_x;
        job.right_x + extra_columns as f64 * job.step_size()
    }
}

/// Uniform block for `escape.wgsl`; layout must match `RenderParams`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct RenderParams {
    left_x: f32,
    right_x: f32,
    top_y: f32,
    a: f32,
    b: f32,
    iter_limit: u32,
    padded_width: u32,
    _pad: u32,
}

impl RenderParams {
    fn new(job: &JobSpec, plan: &LaunchPlan) -> Self {
        Self {
            left_x: job.left_x as f32,
            right_x: plan.extended_right_x(job) as f32,
            top_y: job.top_y as f32,
            a: job.a as f32,
            b: job.b as f32,
            iter_limit: job.iter_limit,
            padded_width: plan.padded_x(),
            _pad: 0,
        }
    }
}

/// Render one job on the bound device with the compiled kernel.
///
/// Launches one thread per padded pixel, blocks until the device-to-host
/// copy completes, and crops the result to `p_y x p_x`. The device pixel
/// buffer lives only for this call; there is no pooling. Elapsed time
/// covers planning, upload, compute, readback and crop.
pub fn render_image(
    ctx: &GpuContext,
    kernel: &RenderKernel,
    job: &JobSpec,
) -> Result<RenderResult, GpuError> {
    pollster::block_on(render_async(ctx, kernel, job))
}

async fn render_async(
    ctx: &GpuContext,
    kernel: &RenderKernel,
    job: &JobSpec,
) -> Result<RenderResult, GpuError> {
    let start = Instant::now();

    let plan = LaunchPlan::new(job.p_x, job.p_y, kernel.block);
    let padded_x = plan.padded_x();
    let padded_y = plan.padded_y();
    log::debug!(
        "gpu render: {}x{} padded to {}x{}, grid {}x{}",
        job.p_x,
        job.p_y,
        padded_x,
        padded_y,
        plan.grid_x,
        plan.grid_y
    );

    // One u32 cell per padded pixel; WGSL storage buffers have no byte
    // element type, the host narrows while cropping.
    let buffer_size = padded_x as u64 * padded_y as u64 * std::mem::size_of::<u32>() as u64;

    ctx.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);

    // wgpu zero-fills fresh buffers, matching the zero-initialized device
    // array the kernel scatters into.
    let pixel_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("escape_pixels"),
        size: buffer_size,
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        mapped_at_creation: false,
    });

    let staging_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("escape_staging"),
        size: buffer_size,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let params = RenderParams::new(job, &plan);
    let params_buffer = ctx
        .device
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("escape_params"),
            contents: bytemuck::bytes_of(&params),
            usage: wgpu::BufferUsages::UNIFORM,
        });

    if let Some(error) = ctx.device.pop_error_scope().await {
        return Err(GpuError::Allocation(error.to_string()));
    }

    let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("escape_bind_group"),
        layout: &kernel.bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: params_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: pixel_buffer.as_entire_binding(),
            },
        ],
    });

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("escape_encoder"),
        });
    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("escape_pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&kernel.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(plan.grid_x, plan.grid_y, 1);
    }
    encoder.copy_buffer_to_buffer(&pixel_buffer, 0, &staging_buffer, 0, buffer_size);
    ctx.queue.submit(std::iter::once(encoder.finish()));

    let cells = read_cells(ctx, &staging_buffer).await?;

    // Crop: keep the first p_y rows and the first p_x columns of each,
    // narrowing cells to bytes.
    let mut data = Vec::with_capacity(job.p_x as usize * job.p_y as usize);
    for row in cells
        .chunks_exact(padded_x as usize)
        .take(job.p_y as usize)
    {
        data.extend(row[..job.p_x as usize].iter().map(|&cell| cell as u8));
    }
    let image = Image::from_bands(job.p_x, [data]);

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    Ok(RenderResult { elapsed_ms, image })
}

async fn read_cells(ctx: &GpuContext, buffer: &wgpu::Buffer) -> Result<Vec<u32>, GpuError> {
    let slice = buffer.slice(..);

    let (tx, rx) = futures_channel::oneshot::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });

    ctx.device.poll(wgpu::Maintain::Wait);

    rx.await
        .map_err(|_| GpuError::ReadbackChannel)?
        .map_err(GpuError::BufferMap)?;

    let cells = {
        let view = slice.get_mapped_range();
        bytemuck::cast_slice(&view).to_vec()
    };
    buffer.unmap();

    Ok(cells)
}
