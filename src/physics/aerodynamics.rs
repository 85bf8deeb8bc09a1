use nalgebra::Vector3;

/// Frontal area of a sphere of diameter `d`.
pub fn cross_section_area(diameter: f64) -> f64 {
    (diameter / 2.0).powi(2) * std::f64::consts::PI
}

/// Diameter of the circle with area `area`, used as the Reynolds length.
pub fn reference_length(area: f64) -> f64 {
    (4.0 * area / std::f64::consts::PI).sqrt()
}

/// Dynamic pressure `0.5 * rho * v^2`.
pub fn dynamic_pressure(density: f64, speed: f64) -> f64 {
    0.5 * density * speed * speed
}

/// Aerodynamic drag force opposing the air-relative velocity.
///
/// Zero relative wind has no direction, so it produces no drag.
pub fn drag_force(rel_wind: &Vector3<f64>, density: f64, cd: f64, area: f64) -> Vector3<f64> {
    let speed = rel_wind.norm();
    if speed > 0.0 {
        let drag_mag = dynamic_pressure(density, speed) * cd * area;
        -rel_wind * (drag_mag / speed)
    } else {
        Vector3::zeros()
    }
}

/// Simplified Magnus lift `S * (omega x v_rel)`.
pub fn magnus_force(coefficient: f64, omega: &Vector3<f64>, rel_wind: &Vector3<f64>) -> Vector3<f64> {
    omega.cross(rel_wind) * coefficient
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_length_recovers_diameter() {
        let d = 0.04222;
        assert_relative_eq!(reference_length(cross_section_area(d)), d, max_relative = 1e-14);
    }

    #[test]
    fn drag_opposes_relative_wind() {
        let v = Vector3::new(30.0, 0.0, 40.0);
        let f = drag_force(&v, 1.225, 0.4, 1.4e-3);
        assert!(f.dot(&v) < 0.0);
        assert_relative_eq!(f.norm(), 0.5 * 1.225 * 2500.0 * 0.4 * 1.4e-3, max_relative = 1e-12);
        assert_relative_eq!(f.cross(&v).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn no_drag_without_relative_wind() {
        let f = drag_force(&Vector3::zeros(), 1.225, 0.4, 1.4e-3);
        assert_eq!(f, Vector3::zeros());
        assert!(f.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn backspin_lifts() {
        // Flying along +x with spin about -y gives lift along +z.
        let v = Vector3::new(50.0, 0.0, 0.0);
        let omega = Vector3::new(0.0, -300.0, 0.0);
        let f = magnus_force(5e-6, &omega, &v);
        assert!(f.z > 0.0);
        assert_relative_eq!(f.z, 5e-6 * 300.0 * 50.0, max_relative = 1e-12);
        assert_relative_eq!(f.x, 0.0);
    }

    #[test]
    fn no_magnus_without_spin() {
        let f = magnus_force(5e-6, &Vector3::zeros(), &Vector3::new(70.0, 1.0, 3.0));
        assert_eq!(f, Vector3::zeros());
    }
}
