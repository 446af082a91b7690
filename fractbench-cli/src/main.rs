//! Benchmark driver: load CSV job lists, render each job on the enabled
//! paths, log per-image latency, optionally write PNGs.

mod joblist;
mod writer;

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use fractbench_gpu::{GpuContext, RenderKernel};

/// Escape-time fractal render benchmark.
///
/// Renders every job in the given CSV lists on the multi-core CPU path
/// and/or the GPU path, writing one elapsed-milliseconds line per job to
/// cpu_times.txt / gpu_times.txt.
#[derive(Parser)]
#[command(name = "fractbench", version)]
struct Args {
    /// Render on the multi-core CPU path
    #[arg(short = 'm', long = "cpu")]
    cpu: bool,

    /// Render on the GPU path
    #[arg(short = 'g', long = "gpu")]
    gpu: bool,

    /// Adapter index for the GPU path
    #[arg(long, default_value_t = 0)]
    device: usize,

    /// Write each rendered image as a grayscale PNG in the current
    /// directory (existing files are overwritten)
    #[arg(short = 'i', long = "images")]
    images: bool,

    /// CSV job lists: left_x,right_x,top_y,p_x,p_y,a,b,iter_limit per line
    #[arg(required = true)]
    job_files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if !args.cpu && !args.gpu {
        bail!("select at least one render path (--cpu and/or --gpu)");
    }

    let jobs = joblist::load_job_lists(&args.job_files)?;
    log::info!("loaded {} jobs from {} files", jobs.len(), args.job_files.len());

    // Open timing logs before any rendering so an unwritable log fails
    // fast instead of after a long run.
    let mut cpu_log = open_log(args.cpu, "cpu_times.txt")?;
    let mut gpu_log = open_log(args.gpu, "gpu_times.txt")?;

    // The GPU context and compiled kernel are process-wide: bound and
    // built once here, reused for every job, released once at the end.
    let gpu = if args.gpu {
        let ctx = GpuContext::init(args.device)?;
        let kernel = RenderKernel::new(&ctx)?;
        Some((ctx, kernel))
    } else {
        None
    };

    let total = jobs.len();
    for (index, job) in jobs.iter().enumerate() {
        if args.cpu {
            log::info!("rendering image {}/{total} on cpu", index + 1);
            let result = fractbench_cpu::render_image(job)?;
            record(&mut cpu_log, "cpu_times.txt", result.elapsed_ms)?;
            if args.images {
                let name = format!("{}_cpu", writer::padded_name(index + 1, total));
                writer::write_png(&result.image, &name, Path::new("."))?;
            }
        }
        if let Some((ctx, kernel)) = &gpu {
            log::info!("rendering image {}/{total} on gpu", index + 1);
            let result = fractbench_gpu::render_image(ctx, kernel, job)?;
            record(&mut gpu_log, "gpu_times.txt", result.elapsed_ms)?;
            if args.images {
                let name = format!("{}_gpu", writer::padded_name(index + 1, total));
                writer::write_png(&result.image, &name, Path::new("."))?;
            }
        }
    }

    if let Some((ctx, _)) = gpu {
        ctx.shutdown();
    }
    Ok(())
}

fn open_log(enabled: bool, name: &str) -> Result<Option<File>> {
    if !enabled {
        return Ok(None);
    }
    let file = File::create(name).with_context(|| format!("cannot open {name}"))?;
    Ok(Some(file))
}

fn record(log: &mut Option<File>, name: &str, elapsed_ms: f64) -> Result<()> {
    if let Some(file) = log {
        writeln!(file, "{elapsed_ms}").with_context(|| format!("cannot write {name}"))?;
    }
    Ok(())
}
