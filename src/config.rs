use crate::boundary::WallMode;
use crate::error::{ConfigError, Result};
use crate::Grid2;
use serde::{Deserialize, Serialize};

/// Pointer emission settings, in host pixel units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub radius: f32,
    pub rate: f32,
    pub velocity_scale: f32,
    pub cell_pixels: f32,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            radius: 20.0,
            rate: 1.0,
            velocity_scale: 0.75,
            cell_pixels: 4.0,
        }
    }
}

/// Construction-time simulation settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidConfig {
    pub nx: usize,
    pub ny: usize,
    /// Width of the interior in world units; cells are square.
    pub domain_width: f32,
    pub dt: f32,
    pub density_viscosity: f32,
    pub velocity_viscosity: f32,
    pub density_damping: f32,
    pub velocity_damping: f32,
    pub walls: WallMode,
    pub emitter: EmitterConfig,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            nx: 128,
            ny: 128,
            domain_width: 100.0,
            dt: 1.0,
            density_viscosity: 0.00001,
            velocity_viscosity: 0.00001,
            density_damping: 0.01,
            velocity_damping: 0.0001,
            walls: WallMode::Reference,
            emitter: EmitterConfig::default(),
        }
    }
}

/// Validated parameters derived from a [`FluidConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimParams {
    pub grid: Grid2,
    pub dt: f32,
    pub density_viscosity: f32,
    pub velocity_viscosity: f32,
    pub density_damping: f32,
    pub velocity_damping: f32,
    pub walls: WallMode,
    pub emitter: EmitterConfig,
}

fn positive(name: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn finite(name: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NotFinite { name, value })
    }
}

fn unit(name: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfUnitRange { name, value })
    }
}

/// Upper bound on padded cells per buffer; twelve buffers are allocated.
pub const MAX_PADDED_CELLS: usize = 1 << 24;

impl FluidConfig {
    pub fn cell_size(&self) -> f32 {
        self.domain_width / self.nx as f32
    }

    pub fn validate(&self) -> Result<SimParams> {
        if self.nx == 0 || self.ny == 0 {
            return Err(ConfigError::InvalidResolution {
                nx: self.nx,
                ny: self.ny,
            });
        }
        let padded = self
            .nx
            .checked_add(2)
            .zip(self.ny.checked_add(2))
            .and_then(|(w, h)| w.checked_mul(h));
        if padded.map_or(true, |cells| cells > MAX_PADDED_CELLS) {
            return Err(ConfigError::TooLarge {
                nx: self.nx,
                ny: self.ny,
                max: MAX_PADDED_CELLS,
            });
        }
        positive("domain_width", self.domain_width)?;
        let dx = positive("cell size", self.cell_size())?;
        let dt = positive("dt", self.dt)?;
        let emitter = EmitterConfig {
            radius: positive("emitter.radius", self.emitter.radius)?,
            rate: finite("emitter.rate", self.emitter.rate)?,
            velocity_scale: positive("emitter.velocity_scale", self.emitter.velocity_scale)?,
            cell_pixels: positive("emitter.cell_pixels", self.emitter.cell_pixels)?,
        };
        Ok(SimParams {
            grid: Grid2::new(self.nx, self.ny, dx),
            dt,
            density_viscosity: unit("density_viscosity", self.density_viscosity)?,
            velocity_viscosity: unit("velocity_viscosity", self.velocity_viscosity)?,
            density_damping: unit("density_damping", self.density_damping)?,
            velocity_damping: unit("velocity_damping", self.velocity_damping)?,
            walls: self.walls,
            emitter,
        })
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let params = FluidConfig::default().validate().expect("defaults are valid");
        assert_eq!(params.grid.nx(), 128);
        assert!((params.grid.dx() - 100.0 / 128.0).abs() < 1e-6);
        assert_eq!(params.walls, WallMode::Reference);
    }

    #[test]
    fn zero_resolution_is_rejected() {
        let config = FluidConfig {
            ny: 0,
            ..FluidConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidResolution { nx: 128, ny: 0 })
        );
    }

    #[test]
    fn oversized_resolution_is_rejected() {
        let config = FluidConfig {
            nx: usize::MAX,
            ny: 4,
            ..FluidConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooLarge { nx: usize::MAX, ny: 4, .. })
        ));

        let config = FluidConfig {
            nx: 8192,
            ny: 8192,
            ..FluidConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::TooLarge { .. })));

        let config = FluidConfig {
            nx: 4094,
            ny: 4094,
            ..FluidConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn damping_outside_unit_range_is_rejected() {
        let config = FluidConfig {
            velocity_damping: 1.5,
            ..FluidConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfUnitRange {
                name: "velocity_damping",
                ..
            })
        ));
    }

    #[test]
    fn non_finite_viscosity_is_rejected() {
        let config = FluidConfig {
            density_viscosity: f32::NAN,
            ..FluidConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_dt_is_rejected() {
        let config = FluidConfig {
            dt: 0.0,
            ..FluidConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { name: "dt", .. })
        ));
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = FluidConfig::from_json(
            r#"{ "nx": 32, "ny": 16, "walls": "symmetric", "emitter": { "radius": 5.0 } }"#,
        )
        .expect("valid json");
        assert_eq!(config.nx, 32);
        assert_eq!(config.ny, 16);
        assert_eq!(config.walls, WallMode::Symmetric);
        assert_eq!(config.emitter.radius, 5.0);
        assert_eq!(config.emitter.cell_pixels, 4.0);
        assert_eq!(config.dt, 1.0);
    }
}
