//! Host-side escape-time kernel, f64 arithmetic.
//!
//! The GPU path re-expresses the same iteration in f32 inside
//! `fractbench-gpu/src/shaders/escape.wgsl`; the two may differ by a few
//! color levels near escape boundaries, which is accepted.

/// Iterate `z <- z^2 + c` from `z0 = x0 + i*y0` with `c = a + i*b`.
///
/// Returns the number of completed iterations before `|z|^2` reached 4,
/// capped at `iter_limit`. The starting point itself is tested before the
/// first iteration, so a point already outside radius 2 returns 0.
pub fn escape_iterations(x0: f64, y0: f64, a: f64, b: f64, iter_limit: u32) -> u32 {
    let mut x = x0;
    let mut y = y0;
    let mut i = 0;
    while i < iter_limit && x * x + y * y < 4.0 {
        let tx = x;
        let ty = y;
        x = tx * tx - ty * ty + a;
        y = 2.0 * tx * ty + b;
        i += 1;
    }
    i
}

/// Map an iteration count to a grayscale byte.
///
/// Points that never escaped (`i == iter_limit`) are interior and render
/// black; escaped points ramp as `255 * 4 * i / iter_limit`, saturating
/// at 255. Integer arithmetic, widened so the product cannot overflow.
pub fn shade(i: u32, iter_limit: u32) -> u8 {
    if i == iter_limit {
        return 0;
    }
    let ramp = (255u64 * 4 * i as u64) / iter_limit as u64;
    ramp.min(255) as u8
}

/// Escape-time shade for a single point: the composition the row renderer
/// applies per pixel.
pub fn render_point(x0: f64, y0: f64, a: f64, b: f64, iter_limit: u32) -> u8 {
    shade(escape_iterations(x0, y0, a, b, iter_limit), iter_limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes_under_zero_constant() {
        // c = 0, z0 = 0 stays at 0 forever.
        assert_eq!(escape_iterations(0.0, 0.0, 0.0, 0.0, 1000), 1000);
    }

    #[test]
    fn point_outside_radius_two_escapes_immediately() {
        // |z0|^2 = 9 >= 4 before the first iteration.
        assert_eq!(escape_iterations(3.0, 0.0, 0.0, 0.0, 100), 0);
    }

    #[test]
    fn escape_count_grows_toward_boundary() {
        // Walking in from the edge of the c = 0 disc, later escapes.
        let near = escape_iterations(1.5, 0.0, 0.0, 0.0, 1000);
        let nearer = escape_iterations(1.1, 0.0, 0.0, 0.0, 1000);
        assert!(near < nearer);
        assert!(nearer < 1000);
    }

    #[test]
    fn interior_shade_is_black() {
        assert_eq!(shade(10, 10), 0);
        assert_eq!(shade(0, 0), 0); // iter_limit = 0 means everything is interior
    }

    #[test]
    fn shade_matches_ramp_formula() {
        assert_eq!(shade(1, 10), 102); // 255*4*1/10 = 102
        assert_eq!(shade(2, 10), 204);
        assert_eq!(shade(3, 10), 255); // 306 saturates
        assert_eq!(shade(0, 10), 0);
    }

    #[test]
    fn shade_is_monotonic_in_escape_count() {
        let limit = 1000;
        let mut previous = 0u8;
        for i in 0..limit {
            let s = shade(i, limit);
            assert!(s >= previous, "shade regressed at i={i}");
            previous = s;
        }
    }

    #[test]
    fn shade_saturates_for_large_products() {
        // 255 * 4 * i overflows u32 for large i; widened math must not.
        assert_eq!(shade(u32::MAX - 1, u32::MAX), 255);
    }

    #[test]
    fn julia_constant_changes_escape_profile() {
        // Same point, different c: counts differ.
        let plain = escape_iterations(0.3, 0.3, 0.0, 0.0, 500);
        let julia = escape_iterations(0.3, 0.3, -0.8, 0.156, 500);
        assert_ne!(plain, julia);
    }
}
