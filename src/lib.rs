mod advection;
mod boundary;
mod config;
mod damping;
mod diffusion;
mod emitter;
mod error;
mod field;
mod grid;
mod projection;
mod render;
mod sim;
mod storage;
mod vec2;

pub use advection::advect_into;
pub use boundary::{enforce_boundary, enforce_boundary_with, BoundaryKind, WallMode};
pub use config::{EmitterConfig, FluidConfig, SimParams, MAX_PADDED_CELLS};
pub use damping::{damp, damping_factor};
pub use diffusion::{diffuse, diffusion_coefficient, relax_into, DIFFUSION_ITERATIONS};
pub use emitter::{
    emission_weight, emit_into, FrameInput, PointerButton, PointerState, SourceProvider,
};
pub use error::{ConfigError, Result};
pub use field::Field2;
pub use grid::Grid2;
pub use projection::{
    divergence_into, divergence_rms, jacobi_pass_into, project, solve_pressure,
    subtract_pressure_gradient, Axis, PRESSURE_ITERATIONS,
};
pub use render::{blend_into, density_to_rgb, velocity_to_rgb};
pub use sim::{FluidSim, StepStats};
pub use storage::{GridStorage, Role, RoleTable, Slot, SlotsExcept, Sources};
pub use vec2::Vec2;
