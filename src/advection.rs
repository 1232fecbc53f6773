use crate::boundary::{enforce_boundary_with, BoundaryKind, WallMode};
use crate::Field2;

/// Semi-Lagrangian transport of `field` through `(u, v)` over `dt`.
///
/// Every interior cell center is traced back along its own velocity and
/// `field` is bilinearly sampled there. Halo cells of `out` are refreshed
/// with `kind` afterwards.
pub fn advect_into(
    out: &mut Field2,
    field: &Field2,
    u: &Field2,
    v: &Field2,
    dt: f32,
    kind: BoundaryKind,
    walls: WallMode,
) {
    let grid = field.grid();
    out.fill_interior(|i, j| {
        let (x, y) = grid.cell_center(i, j);
        let back = (x - dt * u.get(i, j), y - dt * v.get(i, j));
        field.sample_linear(back)
    });
    enforce_boundary_with(out, kind, walls);
}
