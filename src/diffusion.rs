use crate::boundary::{enforce_boundary_with, BoundaryKind, WallMode};
use crate::storage::{GridStorage, Slot};
use crate::Field2;

pub const DIFFUSION_ITERATIONS: usize = 9;

/// Implicit weight `k = dt * viscosity * dx^2`.
pub fn diffusion_coefficient(viscosity: f32, dt: f32, dx: f32) -> f32 {
    dt * viscosity * dx * dx
}

/// One relaxation pass: `(Q + k * (down + left + right + up)) / (1 + 4k)`
/// over the interior of `out`, reading only from `field`.
pub fn relax_into(out: &mut Field2, field: &Field2, k: f32) {
    let denom = 1.0 + 4.0 * k;
    out.fill_interior(|i, j| {
        let neighbours = field.get(i, j - 1)
            + field.get(i - 1, j)
            + field.get(i + 1, j)
            + field.get(i, j + 1);
        (field.get(i, j) + k * neighbours) / denom
    });
}

/// Relaxes `prev` into `new` for [`DIFFUSION_ITERATIONS`] passes, swapping
/// source and destination each pass. Returns the slot written last.
pub fn diffuse(
    storage: &mut GridStorage,
    prev: Slot,
    new: Slot,
    viscosity: f32,
    dt: f32,
    kind: BoundaryKind,
    walls: WallMode,
) -> Slot {
    let k = diffusion_coefficient(viscosity, dt, storage.grid().dx());
    let (mut src, mut dst) = (new, prev);
    for _ in 0..DIFFUSION_ITERATIONS {
        std::mem::swap(&mut src, &mut dst);
        let (out, others) = storage.split_out(dst);
        relax_into(out, others.get(src), k);
        enforce_boundary_with(out, kind, walls);
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Role, RoleTable};
    use crate::Grid2;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    fn storage_with_prev(
        grid: Grid2,
        f: impl Fn(usize, usize) -> f32 + Sync,
    ) -> (GridStorage, RoleTable) {
        let mut storage = GridStorage::new(grid);
        let roles = RoleTable::default();
        let prev = roles.slot(Role::PrevDensity);
        storage.field_mut(prev).fill_interior(f);
        crate::boundary::enforce_boundary(storage.field_mut(prev), BoundaryKind::NoNegate);
        (storage, roles)
    }

    #[test]
    fn zero_viscosity_is_identity() {
        let grid = Grid2::new(6, 5, 0.7);
        let (mut storage, roles) =
            storage_with_prev(grid, |i, j| (i as f32 * 1.3 - j as f32).sin());
        let prev = roles.slot(Role::PrevDensity);
        let new = roles.slot(Role::Density);
        let before = storage.field(prev).clone();
        let out = diffuse(
            &mut storage,
            prev,
            new,
            0.0,
            1.0,
            BoundaryKind::NoNegate,
            WallMode::Reference,
        );
        assert_eq!(out, new);
        for j in 1..=5 {
            for i in 1..=6 {
                assert_close(storage.get(new, i, j), before.get(i, j), 1e-6);
            }
        }
    }

    #[test]
    fn odd_iteration_count_lands_in_new_slot() {
        assert_eq!(DIFFUSION_ITERATIONS % 2, 1);
        let grid = Grid2::new(3, 3, 1.0);
        let (mut storage, roles) = storage_with_prev(grid, |_i, _j| 1.0);
        let out = diffuse(
            &mut storage,
            roles.slot(Role::PrevDensity),
            roles.slot(Role::Density),
            0.1,
            1.0,
            BoundaryKind::NoNegate,
            WallMode::Reference,
        );
        assert_eq!(out, roles.slot(Role::Density));
    }

    #[test]
    fn spike_spreads_to_neighbours() {
        let grid = Grid2::new(7, 7, 1.0);
        let (mut storage, roles) =
            storage_with_prev(grid, |i, j| if i == 4 && j == 4 { 1.0 } else { 0.0 });
        let new = roles.slot(Role::Density);
        diffuse(
            &mut storage,
            roles.slot(Role::PrevDensity),
            new,
            0.2,
            1.0,
            BoundaryKind::NoNegate,
            WallMode::Reference,
        );
        let center = storage.get(new, 4, 4);
        let side = storage.get(new, 5, 4);
        assert!(center < 1.0, "center should lose mass, got {center}");
        assert!(side > 0.0, "neighbour should gain mass, got {side}");
        assert_close(side, storage.get(new, 3, 4), 1e-6);
        assert_close(side, storage.get(new, 4, 5), 1e-6);
    }

    #[test]
    fn relax_into_matches_formula() {
        let grid = Grid2::new(3, 3, 1.0);
        let field = Field2::from_fn(grid, |i, j| (i * 5 + j) as f32);
        let mut out = Field2::new(grid, 0.0);
        relax_into(&mut out, &field, 0.5);
        let neighbours = field.get(2, 1) + field.get(1, 2) + field.get(3, 2) + field.get(2, 3);
        let expected = (field.get(2, 2) + 0.5 * neighbours) / 3.0;
        assert_close(out.get(2, 2), expected, 1e-5);
    }
}
