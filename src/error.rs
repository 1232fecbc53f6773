use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid resolution must be positive, got {nx}x{ny}")]
    InvalidResolution { nx: usize, ny: usize },

    #[error("grid {nx}x{ny} exceeds {max} padded cells")]
    TooLarge { nx: usize, ny: usize, max: usize },

    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },

    #[error("{name} must be finite and > 0, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("{name} must be finite and within [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f32 },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
