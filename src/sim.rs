use crate::advection::advect_into;
use crate::boundary::{enforce_boundary_with, BoundaryKind};
use crate::config::{FluidConfig, SimParams};
use crate::damping::damp;
use crate::diffusion::diffuse;
use crate::emitter::{FrameInput, SourceProvider};
use crate::error::Result;
use crate::projection::{divergence_rms, project};
use crate::storage::{GridStorage, Role, RoleTable, Sources};
use crate::{Field2, Grid2};

/// Frame-level diagnostics for the current state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepStats {
    pub frame: u64,
    pub total_density: f32,
    /// Smallest and largest finite interior density.
    pub density_range: (f32, f32),
    pub max_speed: f32,
    pub divergence_rms: f32,
}

/// Owns every simulation buffer and advances them one frame at a time.
#[derive(Clone, Debug)]
pub struct FluidSim {
    params: SimParams,
    storage: GridStorage,
    roles: RoleTable,
    frame: u64,
}

impl FluidSim {
    pub fn new(config: &FluidConfig) -> Result<Self> {
        let params = config.validate()?;
        log::debug!(
            "fluid sim {}x{} dx={} dt={} walls={:?}",
            params.grid.nx(),
            params.grid.ny(),
            params.grid.dx(),
            params.dt,
            params.walls
        );
        Ok(Self {
            params,
            storage: GridStorage::new(params.grid),
            roles: RoleTable::default(),
            frame: 0,
        })
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn grid(&self) -> Grid2 {
        self.params.grid
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    pub fn storage(&self) -> &GridStorage {
        &self.storage
    }

    pub fn field(&self, role: Role) -> &Field2 {
        self.storage.field(self.roles.slot(role))
    }

    pub fn density(&self) -> &Field2 {
        self.field(Role::Density)
    }

    pub fn velocity_u(&self) -> &Field2 {
        self.field(Role::U)
    }

    pub fn velocity_v(&self) -> &Field2 {
        self.field(Role::V)
    }

    pub fn swap_velocity(&mut self) {
        self.roles.swap_velocity();
    }

    pub fn swap_density(&mut self) {
        self.roles.swap_density();
    }

    /// Advances one frame using pointer input.
    pub fn step(&mut self, input: &FrameInput) {
        let mut input = *input;
        self.step_from(&mut input);
    }

    pub fn step_from(&mut self, provider: &mut impl SourceProvider) {
        let params = self.params;
        self.step_with(|sources| provider.fill_sources(sources, &params));
    }

    /// Advances one frame. The source fields start zeroed; `fill_sources`
    /// writes whatever it needs and returns whether dye emission is active.
    pub fn step_with(&mut self, fill_sources: impl FnOnce(&mut Sources<'_>) -> bool) {
        let emitting = {
            let mut sources = self.storage.sources_mut(&self.roles);
            sources.clear();
            fill_sources(&mut sources)
        };
        self.velocity_phase();
        self.density_phase(emitting);
        self.frame += 1;
        log::trace!("frame {} done, emitting={}", self.frame, emitting);
    }

    fn velocity_phase(&mut self) {
        let p = self.params;

        self.roles.swap_velocity();
        self.advect(Role::PrevU, Role::U, Role::PrevU, Role::PrevV, BoundaryKind::NegateX);
        self.advect(Role::PrevV, Role::V, Role::PrevU, Role::PrevV, BoundaryKind::NegateY);

        damp(self.field_mut(Role::U), p.velocity_damping, p.dt);
        damp(self.field_mut(Role::V), p.velocity_damping, p.dt);

        self.roles.swap_velocity();
        self.diffuse(Role::PrevU, Role::U, p.velocity_viscosity, BoundaryKind::NegateX);
        self.diffuse(Role::PrevV, Role::V, p.velocity_viscosity, BoundaryKind::NegateY);

        self.integrate(Role::U, Role::InputU, BoundaryKind::NegateX);
        self.integrate(Role::V, Role::InputV, BoundaryKind::NegateY);

        project(&mut self.storage, &self.roles, p.walls);
    }

    fn density_phase(&mut self, emitting: bool) {
        let p = self.params;

        self.roles.swap_density();
        self.advect(Role::PrevDensity, Role::Density, Role::U, Role::V, BoundaryKind::NoNegate);

        self.roles.swap_density();
        self.diffuse(Role::PrevDensity, Role::Density, p.density_viscosity, BoundaryKind::NoNegate);

        damp(self.field_mut(Role::Density), p.density_damping, p.dt);

        if emitting {
            self.integrate(Role::Density, Role::InputDensity, BoundaryKind::NoNegate);
        }
    }

    fn field_mut(&mut self, role: Role) -> &mut Field2 {
        self.storage.field_mut(self.roles.slot(role))
    }

    fn advect(&mut self, source: Role, target: Role, u: Role, v: Role, kind: BoundaryKind) {
        let (out, others) = self.storage.split_out(self.roles.slot(target));
        advect_into(
            out,
            others.get(self.roles.slot(source)),
            others.get(self.roles.slot(u)),
            others.get(self.roles.slot(v)),
            self.params.dt,
            kind,
            self.params.walls,
        );
    }

    fn diffuse(&mut self, previous: Role, current: Role, viscosity: f32, kind: BoundaryKind) {
        let written = diffuse(
            &mut self.storage,
            self.roles.slot(previous),
            self.roles.slot(current),
            viscosity,
            self.params.dt,
            kind,
            self.params.walls,
        );
        if written != self.roles.slot(current) {
            self.roles.swap(previous, current);
        }
    }

    /// `target += dt * source`, then refresh the halo.
    fn integrate(&mut self, target: Role, source: Role, kind: BoundaryKind) {
        let (out, others) = self.storage.split_out(self.roles.slot(target));
        out.add_scaled_in_place(others.get(self.roles.slot(source)), self.params.dt);
        enforce_boundary_with(out, kind, self.params.walls);
    }

    pub fn stats(&self) -> StepStats {
        let u = self.velocity_u();
        let v = self.velocity_v();
        let grid = self.grid();
        let mut max_speed = 0.0_f32;
        for j in 1..=grid.ny() {
            for i in 1..=grid.nx() {
                let speed = (u.get(i, j).powi(2) + v.get(i, j).powi(2)).sqrt();
                max_speed = max_speed.max(speed);
            }
        }
        StepStats {
            frame: self.frame,
            total_density: self.density().interior_sum(),
            density_range: self.density().min_max(),
            max_speed,
            divergence_rms: divergence_rms(u, v),
        }
    }
}
