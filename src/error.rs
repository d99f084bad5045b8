// Error types: configuration validation and start-up failures

use thiserror::Error;

/// Configuration Errors
#[derive(Error, Debug, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Grid needs at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: u32, cols: u32 },
    #[error("Cell spacing must be positive (got {0})")]
    InvalidSpacing(f32),
    #[error("Safe zone half-width must not be negative (got {0})")]
    InvalidSafeRadius(f32),
    #[error("Probability for {name} must lie in [0, 1] (got {value})")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("Altitude band is empty ({min} > {max})")]
    InvalidAltitudeBand { min: f32, max: f32 },
    #[error("Flight rate {name} must be positive (got {value})")]
    InvalidRate { name: &'static str, value: f32 },
    #[error("Tick rate must be positive")]
    ZeroTickRate,
    #[error("Unknown log level '{0}'")]
    UnknownLogLevel(String),
}

/// Start-up Errors
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}
