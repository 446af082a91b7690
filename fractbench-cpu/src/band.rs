use crate::chunk::Chunk;
use fractbench_core::kernel::render_point;

/// Render one chunk's band of rows.
///
/// Walks rows from `top_y_offset` downward and columns from `left_x`
/// rightward, one `step_size` at a time, shading each point with the host
/// pixel kernel. Returns `row_count * p_x` bytes, rows in order. Pure
/// function of its chunk; this is the whole body of a worker task.
pub fn render_band(chunk: &Chunk) -> Vec<u8> {
    let step_size = chunk.step_size();
    let mut band = Vec::with_capacity(chunk.row_count as usize * chunk.p_x as usize);

    let mut y = chunk.top_y_offset;
    for _ in 0..chunk.row_count {
        let mut x = chunk.left_x;
        for _ in 0..chunk.p_x {
            band.push(render_point(x, y, chunk.a, chunk.b, chunk.iter_limit));
            x += step_size;
        }
        y -= step_size;
    }
    band
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk() -> Chunk {
        Chunk {
            left_x: -2.0,
            right_x: 2.0,
            top_y_offset: 2.0,
            a: 0.0,
            b: 0.0,
            p_x: 4,
            row_count: 4,
            iter_limit: 10,
        }
    }

    #[test]
    fn band_has_row_count_times_width_bytes() {
        let band = render_band(&chunk());
        assert_eq!(band.len(), 16);
    }

    #[test]
    fn empty_chunk_renders_nothing() {
        let mut c = chunk();
        c.row_count = 0;
        assert!(render_band(&c).is_empty());
    }

    #[test]
    fn corners_of_wide_viewport_escape_immediately() {
        // Top-left point (-2, 2) has |z0|^2 = 8 >= 4: zero iterations,
        // shade 0 via the ramp (not the interior branch).
        let band = render_band(&chunk());
        assert_eq!(band[0], 0);
    }

    #[test]
    fn two_identical_chunks_render_identically() {
        assert_eq!(render_band(&chunk()), render_band(&chunk()));
    }
}
