use crate::Field2;

/// Per-step multiplier for a decay `rate` over `dt`.
pub fn damping_factor(rate: f32, dt: f32) -> f32 {
    (1.0 - rate).clamp(0.0, 1.0).powf(dt)
}

pub fn damp(field: &mut Field2, rate: f32, dt: f32) {
    field.scale_in_place(damping_factor(rate, dt));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Grid2;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    #[test]
    fn zero_rate_is_identity() {
        assert_eq!(damping_factor(0.0, 1.0), 1.0);
        assert_eq!(damping_factor(0.0, 0.25), 1.0);
    }

    #[test]
    fn factor_is_clamped() {
        assert_eq!(damping_factor(1.5, 1.0), 0.0);
        assert_eq!(damping_factor(-0.5, 1.0), 1.0);
    }

    #[test]
    fn damp_scales_every_cell_including_halo() {
        let grid = Grid2::new(2, 2, 1.0);
        let mut field = Field2::new(grid, 2.0);
        damp(&mut field, 0.75, 0.5);
        assert_close(field.get(0, 0), 1.0, 1e-6);
        assert_close(field.get(2, 2), 1.0, 1e-6);
    }
}
