use nalgebra::Vector3;

use crate::error::{GolfError, Result};

// ---------------------------------------------------------------------------
// Flat state layout used inside the integrator
// ---------------------------------------------------------------------------

pub const STATE_DIM: usize = 12;

/// `[px, py, pz, vx, vy, vz, theta_x, theta_y, theta_z, wx, wy, wz]`
pub type StateArray = [f64; STATE_DIM];

pub const POS: usize = 0;
pub const VEL: usize = 3;
pub const THETA: usize = 6;
pub const OMEGA: usize = 9;

/// Names of the state components, in array order.
pub const STATE_COLUMNS: [&str; STATE_DIM] = [
    "p_LL_x", "p_LL_y", "p_LL_z",
    "v_LL_x", "v_LL_y", "v_LL_z",
    "theta_x", "theta_y", "theta_z",
    "w_x", "w_y", "w_z",
];

pub(crate) fn vec3(x: &StateArray, offset: usize) -> Vector3<f64> {
    Vector3::new(x[offset], x[offset + 1], x[offset + 2])
}

// ---------------------------------------------------------------------------
// Ball state: position, velocity, orientation, angular velocity
// ---------------------------------------------------------------------------

/// Ball state in the local-level frame (right-handed, z up).
///
/// Orientation angles are integrated from the angular velocity but feed no
/// force. Angular velocity is constant over a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallState {
    pub pos: Vector3<f64>,    // m
    pub vel: Vector3<f64>,    // m/s
    pub theta: Vector3<f64>,  // rad
    pub omega: Vector3<f64>,  // rad/s
}

impl BallState {
    pub fn from_array(x: &StateArray) -> Self {
        Self {
            pos: vec3(x, POS),
            vel: vec3(x, VEL),
            theta: vec3(x, THETA),
            omega: vec3(x, OMEGA),
        }
    }

    pub fn to_array(&self) -> StateArray {
        let mut x = [0.0; STATE_DIM];
        for (offset, v) in [(POS, &self.pos), (VEL, &self.vel), (THETA, &self.theta), (OMEGA, &self.omega)] {
            x[offset..offset + 3].copy_from_slice(v.as_slice());
        }
        x
    }

    pub fn height(&self) -> f64 {
        self.pos.z
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }
}

// ---------------------------------------------------------------------------
// Launch conditions
// ---------------------------------------------------------------------------

/// How the ball leaves the tee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchConditions {
    pub angle_deg: f64,       // elevation above horizontal
    pub azimuth_deg: f64,     // rotation about z from +x
    pub speed: f64,           // m/s
    pub position: Vector3<f64>,
    pub omega: Vector3<f64>,  // rad/s, local-level frame
}

impl LaunchConditions {
    /// Initial state; orientation angles start at zero.
    pub fn initial_state(&self) -> BallState {
        let (ang, az) = (self.angle_deg.to_radians(), self.azimuth_deg.to_radians());
        BallState {
            pos: self.position,
            vel: Vector3::new(
                ang.cos() * az.cos() * self.speed,
                ang.cos() * az.sin() * self.speed,
                ang.sin() * self.speed,
            ),
            theta: Vector3::zeros(),
            omega: self.omega,
        }
    }
}

// ---------------------------------------------------------------------------
// Fixed physical parameters of one run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallParams {
    pub mass: f64,           // kg
    pub diameter: f64,       // m
    pub dimple_ratio: f64,   // dimple depth / diameter
    pub magnus_coeff: f64,   // S, N per (rad/s · m/s)
    pub gravity: Vector3<f64>,
    pub rho_scale: f64,      // multiplier on standard density
    pub wind: Vector3<f64>,  // m/s, constant
}

impl BallParams {
    pub fn validate(&self) -> Result<()> {
        let all_finite = [self.mass, self.diameter, self.dimple_ratio, self.magnus_coeff, self.rho_scale]
            .iter()
            .chain(self.gravity.iter())
            .chain(self.wind.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(GolfError::Configuration("ball parameters must be finite".into()));
        }
        if self.mass <= 0.0 {
            return Err(GolfError::Configuration(format!("mass must be positive, got {}", self.mass)));
        }
        if self.diameter <= 0.0 {
            return Err(GolfError::Configuration(format!(
                "diameter must be positive, got {}",
                self.diameter
            )));
        }
        if self.rho_scale < 0.0 {
            return Err(GolfError::Configuration(format!(
                "density scale must not be negative, got {}",
                self.rho_scale
            )));
        }
        Ok(())
    }
}

impl Default for BallParams {
    fn default() -> Self {
        Self {
            mass: 0.0459,
            diameter: 0.04222,
            dimple_ratio: 0.0125,
            magnus_coeff: 5e-6,
            gravity: Vector3::new(0.0, 0.0, -9.81),
            rho_scale: 1.0,
            wind: Vector3::zeros(),
        }
    }
}

impl Default for LaunchConditions {
    fn default() -> Self {
        Self {
            angle_deg: 38.0,
            azimuth_deg: 0.0,
            speed: 70.0,
            position: Vector3::zeros(),
            omega: Vector3::zeros(),
        }
    }
}
