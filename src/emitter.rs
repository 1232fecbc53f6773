use crate::config::{EmitterConfig, SimParams};
use crate::storage::Sources;
use crate::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// Paints dye and pushes the fluid.
    Primary,
    /// Pushes the fluid only.
    Secondary,
}

/// Pointer sample for one frame, in host pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub previous: Vec2,
    pub button: PointerButton,
}

/// Everything the host observed since the last step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub pointer: Option<PointerState>,
}

impl FrameInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn drag(previous: Vec2, position: Vec2, button: PointerButton) -> Self {
        Self {
            pointer: Some(PointerState {
                position,
                previous,
                button,
            }),
        }
    }
}

/// Supplies the per-frame source fields.
pub trait SourceProvider {
    /// Writes all three source fields and reports whether dye emission is active.
    fn fill_sources(&mut self, sources: &mut Sources<'_>, params: &SimParams) -> bool;
}

impl<F> SourceProvider for F
where
    F: FnMut(&mut Sources<'_>) -> bool,
{
    fn fill_sources(&mut self, sources: &mut Sources<'_>, _params: &SimParams) -> bool {
        self(sources)
    }
}

impl SourceProvider for FrameInput {
    fn fill_sources(&mut self, sources: &mut Sources<'_>, params: &SimParams) -> bool {
        emit_into(sources, self, &params.emitter, params.dt)
    }
}

/// Gaussian brush falloff, saturated to `[0, 1]`.
pub fn emission_weight(distance: f32, radius: f32) -> f32 {
    let er = 2.21 * distance / radius;
    (2.0 * (-er * er).exp()).clamp(0.0, 1.0)
}

/// Rasterizes the pointer brush into the source fields over the whole padded
/// grid. Returns `true` when dye is being painted.
pub fn emit_into(
    sources: &mut Sources<'_>,
    input: &FrameInput,
    emitter: &EmitterConfig,
    dt: f32,
) -> bool {
    let Some(pointer) = input.pointer else {
        sources.clear();
        return false;
    };
    let grid = sources.density.grid();
    let px = emitter.cell_pixels;
    let weight_at = |i: usize, j: usize| {
        let center = Vec2::new(px * (i as f32 + 0.5), px * (j as f32 + 0.5));
        emission_weight(pointer.position.distance(center), emitter.radius)
    };

    let painting = pointer.button == PointerButton::Primary;
    if painting {
        sources
            .density
            .fill_with_index(|i, j| emitter.rate * weight_at(i, j));
    } else {
        sources.density.fill(0.0);
    }

    // Pixel displacement per step, converted to world units per step.
    let velocity = pointer
        .position
        .sub(pointer.previous)
        .scale(grid.dx() / (dt * px) * emitter.velocity_scale);
    sources
        .u
        .fill_with_index(|i, j| velocity.x * weight_at(i, j));
    sources
        .v
        .fill_with_index(|i, j| velocity.y * weight_at(i, j));
    painting
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{GridStorage, Role, RoleTable};
    use crate::Grid2;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    fn emitter() -> EmitterConfig {
        EmitterConfig {
            radius: 8.0,
            rate: 0.5,
            velocity_scale: 1.0,
            cell_pixels: 2.0,
        }
    }

    #[test]
    fn weight_saturates_near_center_and_decays() {
        assert_eq!(emission_weight(0.0, 10.0), 1.0);
        let far = emission_weight(20.0, 10.0);
        assert!(far < 1e-3, "far weight {far}");
        let mid = emission_weight(4.0, 10.0);
        assert!(mid > far && mid <= 1.0);
    }

    #[test]
    fn idle_input_clears_sources() {
        let grid = Grid2::new(4, 4, 1.0);
        let mut storage = GridStorage::new(grid);
        let roles = RoleTable::default();
        storage.field_mut(roles.slot(Role::InputDensity)).fill(3.0);
        storage.field_mut(roles.slot(Role::InputU)).fill(3.0);
        let mut sources = storage.sources_mut(&roles);
        let active = emit_into(&mut sources, &FrameInput::idle(), &emitter(), 1.0);
        assert!(!active);
        assert_eq!(sources.density.interior_sum(), 0.0);
        assert_eq!(sources.u.interior_sum(), 0.0);
        assert_eq!(sources.v.interior_sum(), 0.0);
    }

    #[test]
    fn primary_drag_paints_density_and_velocity() {
        let grid = Grid2::new(8, 8, 0.5);
        let mut storage = GridStorage::new(grid);
        let roles = RoleTable::default();
        let mut sources = storage.sources_mut(&roles);
        // Cell (4, 4) is centered at pixel (9, 9).
        let input = FrameInput::drag(
            Vec2::new(7.0, 9.0),
            Vec2::new(9.0, 9.0),
            PointerButton::Primary,
        );
        let active = emit_into(&mut sources, &input, &emitter(), 1.0);
        assert!(active);
        assert_close(sources.density.get(4, 4), 0.5, 1e-6);
        // 2 px / 2 px-per-cell * 0.5 world units per cell.
        assert_close(sources.u.get(4, 4), 0.5, 1e-6);
        assert_close(sources.v.get(4, 4), 0.0, 1e-6);
        assert!(sources.density.get(0, 0) < sources.density.get(4, 4));
    }

    #[test]
    fn secondary_drag_pushes_without_dye() {
        let grid = Grid2::new(8, 8, 1.0);
        let mut storage = GridStorage::new(grid);
        let roles = RoleTable::default();
        let mut sources = storage.sources_mut(&roles);
        let input = FrameInput::drag(
            Vec2::new(9.0, 9.0),
            Vec2::new(9.0, 5.0),
            PointerButton::Secondary,
        );
        let active = emit_into(&mut sources, &input, &emitter(), 2.0);
        assert!(!active);
        assert_eq!(sources.density.interior_sum(), 0.0);
        assert!(sources.v.get(4, 2) < 0.0);
    }
}
