use crate::boundary::{enforce_boundary_with, BoundaryKind, WallMode};
use crate::storage::{GridStorage, Role, RoleTable, Slot};
use crate::Field2;

pub const PRESSURE_ITERATIONS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    fn boundary(self) -> BoundaryKind {
        match self {
            Axis::X => BoundaryKind::NegateX,
            Axis::Y => BoundaryKind::NegateY,
        }
    }
}

/// Central-difference divergence over the interior; halo copied unsigned.
pub fn divergence_into(out: &mut Field2, u: &Field2, v: &Field2, walls: WallMode) {
    let inv_2dx = 1.0 / (2.0 * u.grid().dx());
    out.fill_interior(|i, j| {
        let du = u.get(i + 1, j) - u.get(i - 1, j);
        let dv = v.get(i, j + 1) - v.get(i, j - 1);
        du * inv_2dx + dv * inv_2dx
    });
    enforce_boundary_with(out, BoundaryKind::NoNegate, walls);
}

/// One Jacobi sweep of `lap(P) = div`, reading the previous iterate `pressure`.
pub fn jacobi_pass_into(out: &mut Field2, pressure: &Field2, divergence: &Field2) {
    let dx = pressure.grid().dx();
    let dx2 = dx * dx;
    out.fill_interior(|i, j| {
        let neighbours = pressure.get(i, j - 1)
            + pressure.get(i - 1, j)
            + pressure.get(i + 1, j)
            + pressure.get(i, j + 1);
        (neighbours - dx2 * divergence.get(i, j)) / 4.0
    });
}

/// Runs [`PRESSURE_ITERATIONS`] Jacobi passes from a zero guess, ping-ponging
/// between `pressure` and `scratch` with the first pass writing `pressure`.
/// Returns the slot written last.
pub fn solve_pressure(
    storage: &mut GridStorage,
    divergence: Slot,
    pressure: Slot,
    scratch: Slot,
    walls: WallMode,
) -> Slot {
    storage.zero(scratch);
    let (mut src, mut dst) = (pressure, scratch);
    for _ in 0..PRESSURE_ITERATIONS {
        std::mem::swap(&mut src, &mut dst);
        let (out, others) = storage.split_out(dst);
        jacobi_pass_into(out, others.get(src), others.get(divergence));
        enforce_boundary_with(out, BoundaryKind::NoNegate, walls);
    }
    dst
}

/// Subtracts the central-difference pressure gradient along `axis` from one
/// velocity component and reflects it at the walls.
pub fn subtract_pressure_gradient(
    component: &mut Field2,
    pressure: &Field2,
    axis: Axis,
    walls: WallMode,
) {
    let inv_2dx = 1.0 / (2.0 * pressure.grid().dx());
    component.update_interior(|i, j, value| {
        let dp = match axis {
            Axis::X => pressure.get(i + 1, j) - pressure.get(i - 1, j),
            Axis::Y => pressure.get(i, j + 1) - pressure.get(i, j - 1),
        };
        value - dp * inv_2dx
    });
    enforce_boundary_with(component, axis.boundary(), walls);
}

/// Removes the divergent part of the current velocity in place.
///
/// The gradient is taken from the `Pressure` slot. With an even pass count
/// that slot holds the next-to-last Jacobi iterate, matching the solver's
/// established output.
pub fn project(storage: &mut GridStorage, roles: &RoleTable, walls: WallMode) {
    let u = roles.slot(Role::U);
    let v = roles.slot(Role::V);
    let div = roles.slot(Role::Divergence);
    let pressure = roles.slot(Role::Pressure);

    let (out, others) = storage.split_out(div);
    divergence_into(out, others.get(u), others.get(v), walls);

    solve_pressure(storage, div, pressure, roles.slot(Role::PressureScratch), walls);

    let (out, others) = storage.split_out(u);
    subtract_pressure_gradient(out, others.get(pressure), Axis::X, walls);
    let (out, others) = storage.split_out(v);
    subtract_pressure_gradient(out, others.get(pressure), Axis::Y, walls);
}

/// RMS of the interior divergence of `(u, v)`.
pub fn divergence_rms(u: &Field2, v: &Field2) -> f32 {
    let mut div = Field2::new(u.grid(), 0.0);
    divergence_into(&mut div, u, v, WallMode::Reference);
    div.interior_rms()
}
