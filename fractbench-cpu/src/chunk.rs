use fractbench_core::JobSpec;
use serde::{Deserialize, Serialize};

/// One worker's slice of a job: a contiguous band of image rows.
///
/// Carries everything the band renderer needs so that a chunk can cross a
/// message-passing boundary on its own; the full `JobSpec` never does.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub left_x: f64,
    pub right_x: f64,
    /// y coordinate of this band's first (topmost) row.
    pub top_y_offset: f64,
    pub a: f64,
    pub b: f64,
    pub p_x: u32,
    pub row_count: u32,
    pub iter_limit: u32,
}

impl Chunk {
    pub fn step_size(&self) -> f64 {
        (self.right_x - self.left_x) / self.p_x as f64
    }
}

/// Split a job's rows into `workers` chunks.
///
/// `base = p_y / workers` rows per chunk; the first `p_y % workers` chunks
/// carry one extra row so every row is assigned exactly once. Offsets are
/// cumulative: each chunk starts where the previous one ended, stepping
/// down by `step_size` per row. Chunk order is row order, so concatenating
/// worker output in chunk order rebuilds the image directly.
pub fn partition(job: &JobSpec, workers: u32) -> Vec<Chunk> {
    assert!(workers > 0, "worker count must be positive");

    let step_size = job.step_size();
    let base = job.p_y / workers;
    let remainder = job.p_y % workers;

    let mut chunks = Vec::with_capacity(workers as usize);
    let mut current_y = job.top_y;
    for i in 0..workers {
        let extra = u32::from(i < remainder);
        let row_count = base + extra;
        chunks.push(Chunk {
            left_x: job.left_x,
            right_x: job.right_x,
            top_y_offset: current_y,
            a: job.a,
            b: job.b,
            p_x: job.p_x,
            row_count,
            iter_limit: job.iter_limit,
        });
        current_y -= step_size * row_count as f64;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(p_y: u32) -> JobSpec {
        JobSpec {
            left_x: -2.0,
            right_x: 2.0,
            top_y: 2.0,
            p_x: 8,
            p_y,
            a: -0.8,
            b: 0.156,
            iter_limit: 50,
        }
    }

    #[test]
    fn ten_rows_over_three_workers() {
        // base = 3, remainder = 1: the first chunk picks up the extra row.
        let counts: Vec<u32> = partition(&job(10), 3).iter().map(|c| c.row_count).collect();
        assert_eq!(counts, vec![4, 3, 3]);
    }

    #[test]
    fn row_counts_cover_every_row_exactly_once() {
        for p_y in 1..=64 {
            for workers in 1..=16 {
                let chunks = partition(&job(p_y), workers);
                let total: u32 = chunks.iter().map(|c| c.row_count).sum();
                assert_eq!(total, p_y, "p_y={p_y} workers={workers}");
            }
        }
    }

    #[test]
    fn row_counts_differ_by_at_most_one() {
        for p_y in 1..=64 {
            for workers in 1..=16 {
                let chunks = partition(&job(p_y), workers);
                let max = chunks.iter().map(|c| c.row_count).max().unwrap();
                let min = chunks.iter().map(|c| c.row_count).min().unwrap();
                assert!(max - min <= 1, "p_y={p_y} workers={workers}");
            }
        }
    }

    #[test]
    fn offsets_are_cumulative() {
        let j = job(10);
        let step = j.step_size();
        let chunks = partition(&j, 3);
        assert_eq!(chunks[0].top_y_offset, j.top_y);
        for pair in chunks.windows(2) {
            let expected = pair[0].top_y_offset - step * pair[0].row_count as f64;
            assert_eq!(pair[1].top_y_offset, expected);
        }
    }

    #[test]
    fn more_workers_than_rows_yields_empty_chunks() {
        let chunks = partition(&job(2), 5);
        let counts: Vec<u32> = chunks.iter().map(|c| c.row_count).collect();
        assert_eq!(counts, vec![1, 1, 0, 0, 0]);
    }

    #[test]
    fn chunk_step_matches_job_step() {
        let j = job(10);
        for chunk in partition(&j, 4) {
            assert_eq!(chunk.step_size(), j.step_size());
        }
    }
}
