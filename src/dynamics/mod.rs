pub mod point_mass;
pub mod state;

pub use point_mass::{aero_forces, derivatives, derivatives_with_column, AeroForces};
pub use state::{BallParams, BallState, LaunchConditions, StateArray, STATE_DIM};
