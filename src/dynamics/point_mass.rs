use nalgebra::Vector3;

use crate::drag::{DragColumn, DragTable};
use crate::dynamics::state::{vec3, BallParams, StateArray, OMEGA, POS, STATE_DIM, THETA, VEL};
use crate::error::Result;
use crate::physics::aerodynamics::{cross_section_area, drag_force, magnus_force, reference_length};
use crate::physics::atmosphere::{self, AltitudeUnit};

// ---------------------------------------------------------------------------
// Equations of motion (spinning point mass)
// ---------------------------------------------------------------------------

/// Forces acting on the ball at one instant.
#[derive(Debug, Clone, Copy)]
pub struct AeroForces {
    pub rel_wind: Vector3<f64>,  // ball velocity relative to the air
    pub density: f64,            // scaled air density, kg/m^3
    pub cd: f64,
    pub reynolds: f64,
    pub drag: Vector3<f64>,      // N
    pub magnus: Vector3<f64>,    // N
    pub accel: Vector3<f64>,     // m/s^2, including gravity
}

/// Evaluate drag, Magnus lift and total acceleration for state `x`.
pub fn aero_forces(x: &StateArray, params: &BallParams, column: &DragColumn<'_>) -> Result<AeroForces> {
    let height = x[POS + 2];
    let rel_wind = vec3(x, VEL) - params.wind;
    let speed = rel_wind.norm();

    let area = cross_section_area(params.diameter);
    let l_ref = reference_length(area);
    let density = atmosphere::standard_density(height, AltitudeUnit::Meters)? * params.rho_scale;
    let sample = column.drag_coefficient(height, speed, l_ref, density)?;

    let drag = drag_force(&rel_wind, density, sample.cd, area);
    let magnus = magnus_force(params.magnus_coeff, &vec3(x, OMEGA), &rel_wind);
    let accel = (drag + magnus) / params.mass + params.gravity;

    Ok(AeroForces {
        rel_wind,
        density,
        cd: sample.cd,
        reynolds: sample.reynolds,
        drag,
        magnus,
        accel,
    })
}

/// Time derivative of the state for a pre-selected drag column.
///
/// Position follows velocity, velocity follows the acceleration, the
/// orientation angles follow the angular velocity, and the angular velocity
/// itself is held constant.
pub fn derivatives_with_column(
    x: &StateArray,
    params: &BallParams,
    column: &DragColumn<'_>,
) -> Result<StateArray> {
    let forces = aero_forces(x, params, column)?;

    let mut dx = [0.0; STATE_DIM];
    dx[POS..POS + 3].copy_from_slice(&x[VEL..VEL + 3]);
    dx[VEL..VEL + 3].copy_from_slice(forces.accel.as_slice());
    dx[THETA..THETA + 3].copy_from_slice(&x[OMEGA..OMEGA + 3]);
    // dx[OMEGA..] stays zero: spin is not modelled dynamically
    Ok(dx)
}

/// Time derivative of the state, looking up the drag column for the
/// ball's dimple ratio.
pub fn derivatives(x: &StateArray, params: &BallParams, table: &DragTable) -> Result<StateArray> {
    let column = table.column(params.dimple_ratio)?;
    derivatives_with_column(x, params, &column)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::{BallState, LaunchConditions};
    use crate::error::GolfError;
    use approx::assert_relative_eq;

    fn table() -> DragTable {
        DragTable::standard().unwrap()
    }

    fn launch_state() -> StateArray {
        LaunchConditions::default().initial_state().to_array()
    }

    #[test]
    fn kinematic_passthrough() {
        let mut x = launch_state();
        x[OMEGA..OMEGA + 3].copy_from_slice(&[1.0, -2.0, 3.0]);
        let dx = derivatives(&x, &BallParams::default(), &table()).unwrap();
        assert_eq!(&dx[POS..POS + 3], &x[VEL..VEL + 3]);
        assert_eq!(&dx[THETA..THETA + 3], &[1.0, -2.0, 3.0]);
        assert_eq!(&dx[OMEGA..OMEGA + 3], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn launch_acceleration_matches_hand_calculation() {
        let params = BallParams::default();
        let t = table();
        let x = launch_state();
        let col = t.column(params.dimple_ratio).unwrap();
        let f = aero_forces(&x, &params, &col).unwrap();

        assert_relative_eq!(f.reynolds, 199_789.64296596052, max_relative = 1e-9);
        assert_relative_eq!(f.cd, 0.3827970408474173, max_relative = 1e-8);

        let area = cross_section_area(params.diameter);
        let q = 0.5 * f.density * 70.0 * 70.0;
        let drag_mag = q * f.cd * area;
        assert_relative_eq!(f.drag.norm(), drag_mag, max_relative = 1e-12);

        let v_hat = BallState::from_array(&x).vel / 70.0;
        let expected = -v_hat * drag_mag / params.mass + params.gravity;
        assert_relative_eq!(f.accel, expected, max_relative = 1e-12);
    }

    #[test]
    fn drag_decelerates_ball() {
        let dx = derivatives(&launch_state(), &BallParams::default(), &table()).unwrap();
        // Drag opposes +x flight; gravity and drag both pull down.
        assert!(dx[VEL] < 0.0);
        assert!(dx[VEL + 2] < -9.81);
        assert_eq!(dx[VEL + 1], 0.0);
    }

    #[test]
    fn no_spin_means_no_magnus() {
        let params = BallParams { wind: Vector3::new(-3.0, 4.0, 0.0), ..Default::default() };
        let t = table();
        let col = t.column(params.dimple_ratio).unwrap();
        let f = aero_forces(&launch_state(), &params, &col).unwrap();
        assert_eq!(f.magnus, Vector3::zeros());
    }

    #[test]
    fn moving_with_the_wind_feels_only_gravity() {
        let wind = Vector3::new(5.0, -2.0, 0.5);
        let params = BallParams { wind, ..Default::default() };
        let mut x = launch_state();
        x[VEL..VEL + 3].copy_from_slice(wind.as_slice());
        x[OMEGA..OMEGA + 3].copy_from_slice(&[0.0, -300.0, 0.0]);
        let dx = derivatives(&x, &params, &table()).unwrap();
        assert!(dx.iter().all(|v| v.is_finite()));
        assert_eq!(&dx[VEL..VEL + 3], params.gravity.as_slice());
    }

    #[test]
    fn density_scale_scales_drag() {
        let t = table();
        let base = BallParams::default();
        let thin = BallParams { rho_scale: 0.5, ..base };
        let x = launch_state();
        let f1 = aero_forces(&x, &base, &t.column(base.dimple_ratio).unwrap()).unwrap();
        let f2 = aero_forces(&x, &thin, &t.column(thin.dimple_ratio).unwrap()).unwrap();
        assert_relative_eq!(f2.density, 0.5 * f1.density, max_relative = 1e-12);
        assert!(f2.drag.norm() < f1.drag.norm());
    }

    #[test]
    fn vacuum_is_pure_gravity() {
        let params = BallParams { rho_scale: 0.0, ..Default::default() };
        let dx = derivatives(&launch_state(), &params, &table()).unwrap();
        assert_eq!(&dx[VEL..VEL + 3], params.gravity.as_slice());
    }

    #[test]
    fn unknown_ratio_propagates() {
        let params = BallParams { dimple_ratio: 0.02, ..Default::default() };
        assert!(matches!(
            derivatives(&launch_state(), &params, &table()),
            Err(GolfError::UnknownDimpleRatio { .. })
        ));
    }

    #[test]
    fn above_atmosphere_is_domain_error() {
        let mut x = launch_state();
        x[POS + 2] = 90_000.0;
        assert!(matches!(
            derivatives(&x, &BallParams::default(), &table()),
            Err(GolfError::OutOfDomain { .. })
        ));
    }
}
