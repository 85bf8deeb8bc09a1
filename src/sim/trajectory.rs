use std::fmt;
use std::str::FromStr;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::dynamics::state::{BallState, StateArray};
use crate::error::{GolfError, Result};

// ---------------------------------------------------------------------------
// Trimming policy
// ---------------------------------------------------------------------------

/// Which samples survive once the ball drops below its launch height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrimPolicy {
    /// Keep every sample with `z >= z0`, wherever it lies in time. A ball
    /// that dips below launch height and climbs back keeps the later part.
    #[default]
    #[serde(rename = "mask")]
    Mask,
    /// Keep samples up to, not including, the first one with `z < z0`.
    #[serde(rename = "truncate")]
    TruncateAtFirstViolation,
}

impl FromStr for TrimPolicy {
    type Err = GolfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mask" => Ok(TrimPolicy::Mask),
            "truncate" => Ok(TrimPolicy::TruncateAtFirstViolation),
            other => Err(GolfError::Configuration(format!(
                "unknown trim policy '{}' (expected 'mask' or 'truncate')",
                other
            ))),
        }
    }
}

impl fmt::Display for TrimPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrimPolicy::Mask => write!(f, "mask"),
            TrimPolicy::TruncateAtFirstViolation => write!(f, "truncate"),
        }
    }
}

// ---------------------------------------------------------------------------
// Trajectory
// ---------------------------------------------------------------------------

/// Time-ordered ball states from one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    states: Vec<BallState>,
}

impl Trajectory {
    pub fn new(times: Vec<f64>, states: Vec<BallState>) -> Result<Self> {
        if times.len() != states.len() {
            return Err(GolfError::Configuration(format!(
                "trajectory has {} times but {} states",
                times.len(),
                states.len()
            )));
        }
        Ok(Self { times, states })
    }

    /// Build from integrator output rows.
    pub fn from_rows(times: &[f64], rows: &[StateArray]) -> Result<Self> {
        Self::new(times.to_vec(), rows.iter().map(BallState::from_array).collect())
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[BallState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &BallState)> + '_ {
        self.times.iter().copied().zip(self.states.iter())
    }

    pub fn initial(&self) -> Option<&BallState> {
        self.states.first()
    }

    pub fn last_time(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// Copy of the trajectory without the samples below launch height.
    pub fn trimmed(&self, policy: TrimPolicy) -> Trajectory {
        let Some(z0) = self.initial().map(BallState::height) else {
            return self.clone();
        };
        let keep: Vec<usize> = match policy {
            TrimPolicy::Mask => (0..self.len()).filter(|&i| self.states[i].height() >= z0).collect(),
            TrimPolicy::TruncateAtFirstViolation => {
                (0..self.len()).take_while(|&i| self.states[i].height() >= z0).collect()
            }
        };
        Trajectory {
            times: keep.iter().map(|&i| self.times[i]).collect(),
            states: keep.iter().map(|&i| self.states[i]).collect(),
        }
    }

    // --- derived series, relative to the first sample unless noted ---

    pub fn relative_positions(&self) -> Vec<Vector3<f64>> {
        let Some(p0) = self.initial().map(|s| s.pos) else {
            return Vec::new();
        };
        self.states.iter().map(|s| s.pos - p0).collect()
    }

    pub fn heights(&self) -> Vec<f64> {
        self.relative_positions().iter().map(|r| r.z).collect()
    }

    /// Straight-line distance from the launch point.
    pub fn range_magnitudes(&self) -> Vec<f64> {
        self.relative_positions().iter().map(|r| r.norm()).collect()
    }

    /// Horizontal distance from the frame origin, not from the launch point.
    pub fn ground_distances(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.pos.x.hypot(s.pos.y)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn state_at(x: f64, y: f64, z: f64) -> BallState {
        BallState {
            pos: Vector3::new(x, y, z),
            vel: Vector3::zeros(),
            theta: Vector3::zeros(),
            omega: Vector3::zeros(),
        }
    }

    fn from_heights(z: &[f64]) -> Trajectory {
        let times = (0..z.len()).map(|i| i as f64 * 0.1).collect();
        let states = z.iter().enumerate().map(|(i, &h)| state_at(i as f64, 0.0, h)).collect();
        Trajectory::new(times, states).unwrap()
    }

    fn kept_heights(t: &Trajectory) -> Vec<f64> {
        t.states().iter().map(|s| s.height()).collect()
    }

    #[test]
    fn mismatched_lengths_rejected() {
        assert!(Trajectory::new(vec![0.0, 1.0], vec![state_at(0.0, 0.0, 0.0)]).is_err());
    }

    #[test]
    fn simple_arc_trimmed_after_landing() {
        let t = from_heights(&[1.0, 3.0, 4.0, 2.0, 0.5, -1.0]);
        for policy in [TrimPolicy::Mask, TrimPolicy::TruncateAtFirstViolation] {
            let trimmed = t.trimmed(policy);
            assert_eq!(kept_heights(&trimmed), vec![1.0, 3.0, 4.0, 2.0], "{}", policy);
            assert_relative_eq!(trimmed.last_time().unwrap(), 0.3);
        }
    }

    #[test]
    fn dip_and_recover_distinguishes_policies() {
        let t = from_heights(&[0.0, 2.0, -0.5, 1.0, -2.0]);
        assert_eq!(kept_heights(&t.trimmed(TrimPolicy::Mask)), vec![0.0, 2.0, 1.0]);
        assert_eq!(kept_heights(&t.trimmed(TrimPolicy::TruncateAtFirstViolation)), vec![0.0, 2.0]);
    }

    #[test]
    fn trimming_is_idempotent() {
        let t = from_heights(&[0.0, 2.0, -0.5, 1.0, 0.0, -2.0]);
        for policy in [TrimPolicy::Mask, TrimPolicy::TruncateAtFirstViolation] {
            let once = t.trimmed(policy);
            assert_eq!(once.trimmed(policy), once, "{}", policy);
        }
    }

    #[test]
    fn trimming_leaves_source_untouched() {
        let t = from_heights(&[0.0, 1.0, -1.0]);
        let before = t.clone();
        let _ = t.trimmed(TrimPolicy::Mask);
        assert_eq!(t, before);
    }

    #[test]
    fn descending_launch_keeps_first_sample_only() {
        let t = from_heights(&[0.0, -0.1, -0.4]);
        let trimmed = t.trimmed(TrimPolicy::Mask);
        assert_eq!(trimmed.len(), 1);
        assert_eq!(trimmed.last_time(), Some(0.0));
    }

    #[test]
    fn empty_trajectory_trims_to_empty() {
        let t = Trajectory::new(Vec::new(), Vec::new()).unwrap();
        assert!(t.trimmed(TrimPolicy::Mask).is_empty());
        assert!(t.heights().is_empty());
    }

    #[test]
    fn derived_series_are_relative_to_launch() {
        let times = vec![0.0, 1.0, 2.0];
        let states = vec![state_at(10.0, 5.0, 100.0), state_at(13.0, 9.0, 112.0), state_at(16.0, 5.0, 100.0)];
        let t = Trajectory::new(times, states).unwrap();
        assert_eq!(t.heights(), vec![0.0, 12.0, 0.0]);
        assert_eq!(t.range_magnitudes(), vec![0.0, 13.0, 6.0]);
    }

    #[test]
    fn ground_distance_is_measured_from_the_origin() {
        let times = vec![0.0, 1.0, 2.0];
        let states = vec![state_at(3.0, 4.0, 100.0), state_at(6.0, 8.0, 112.0), state_at(0.0, 0.0, 100.0)];
        let t = Trajectory::new(times, states).unwrap();
        assert_eq!(t.ground_distances(), vec![5.0, 10.0, 0.0]);
        assert_eq!(t.range_magnitudes(), vec![0.0, 13.0, 5.0]);
    }

    #[test]
    fn policy_parsing_and_yaml_names() {
        assert_eq!("mask".parse::<TrimPolicy>().unwrap(), TrimPolicy::Mask);
        assert_eq!("truncate".parse::<TrimPolicy>().unwrap(), TrimPolicy::TruncateAtFirstViolation);
        assert!("prefix".parse::<TrimPolicy>().is_err());

        let yaml = serde_yaml::to_string(&TrimPolicy::TruncateAtFirstViolation).unwrap();
        assert_eq!(yaml.trim(), "truncate");
        let back: TrimPolicy = serde_yaml::from_str("mask").unwrap();
        assert_eq!(back, TrimPolicy::Mask);
    }
}
