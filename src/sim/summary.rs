use serde::{Deserialize, Serialize};

use crate::error::{GolfError, Result};
use crate::sim::trajectory::Trajectory;

/// Scalar outputs of one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantitiesOfInterest {
    pub max_height: f64,     // m above launch
    pub max_range: f64,      // m, straight-line from launch
    pub time_of_flight: f64, // s, time of the last retained sample
}

impl QuantitiesOfInterest {
    /// Summarize an already trimmed trajectory.
    pub fn from_trajectory(traj: &Trajectory) -> Result<Self> {
        let time_of_flight = traj
            .last_time()
            .ok_or_else(|| GolfError::Configuration("cannot summarize an empty trajectory".into()))?;
        Ok(Self {
            max_height: max_of(&traj.heights()),
            max_range: max_of(&traj.range_magnitudes()),
            time_of_flight,
        })
    }
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
