use crate::Field2;
use serde::{Deserialize, Serialize};

/// How halo cells mirror the adjacent interior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryKind {
    NoNegate,
    NegateX,
    NegateY,
}

/// Right-wall treatment.
///
/// `Reference` negates the right column for [`BoundaryKind::NegateY`], which
/// is what the solver has always produced. `Symmetric` mirrors the left wall
/// and negates it for [`BoundaryKind::NegateX`] instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallMode {
    #[default]
    Reference,
    Symmetric,
}

impl WallMode {
    fn negate_right(self, kind: BoundaryKind) -> bool {
        match self {
            WallMode::Reference => kind == BoundaryKind::NegateY,
            WallMode::Symmetric => kind == BoundaryKind::NegateX,
        }
    }
}

pub fn enforce_boundary(field: &mut Field2, kind: BoundaryKind) {
    enforce_boundary_with(field, kind, WallMode::Reference);
}

pub fn enforce_boundary_with(field: &mut Field2, kind: BoundaryKind, walls: WallMode) {
    let grid = field.grid();
    let nx = grid.nx();
    let ny = grid.ny();
    let sign = |negate: bool| -> f32 { if negate { -1.0 } else { 1.0 } };

    let row_sign = sign(kind == BoundaryKind::NegateY);
    for i in 1..=nx {
        field.set(i, 0, row_sign * field.get(i, 1));
        field.set(i, ny + 1, row_sign * field.get(i, ny));
    }

    let left_sign = sign(kind == BoundaryKind::NegateX);
    let right_sign = sign(walls.negate_right(kind));
    for j in 1..=ny {
        field.set(0, j, left_sign * field.get(1, j));
        field.set(nx + 1, j, right_sign * field.get(nx, j));
    }

    average_corners(field);
}

/// Sets each corner to the mean of its two neighbouring halo cells.
fn average_corners(field: &mut Field2) {
    let grid = field.grid();
    let nx = grid.nx();
    let ny = grid.ny();
    field.set(0, 0, 0.5 * (field.get(1, 0) + field.get(0, 1)));
    field.set(0, ny + 1, 0.5 * (field.get(1, ny + 1) + field.get(0, ny)));
    field.set(nx + 1, 0, 0.5 * (field.get(nx, 0) + field.get(nx + 1, 1)));
    field.set(
        nx + 1,
        ny + 1,
        0.5 * (field.get(nx, ny + 1) + field.get(nx + 1, ny)),
    );
}
