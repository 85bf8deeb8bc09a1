use thiserror::Error;

/// Errors raised anywhere in a simulation run.
#[derive(Error, Debug)]
pub enum GolfError {
    #[error("altitude units must be \"m\" or \"km\", got \"{0}\"")]
    InvalidUnit(String),

    #[error("geopotential height {geopotential_km} km is outside the standard atmosphere (max 84.85 km)")]
    OutOfDomain { geopotential_km: f64 },

    #[error("no drag curve calibrated for dimple ratio {ratio}; available: {available:?}")]
    UnknownDimpleRatio { ratio: f64, available: Vec<f64> },

    #[error("invalid drag curve for dimple ratio {ratio}: {reason}")]
    InvalidCurve { ratio: f64, reason: String },

    #[error("drag table has no Reynolds number range shared by every curve")]
    EmptyTable,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("integration failed at t = {time} s: {reason}")]
    Integration { time: f64, reason: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GolfError>;
