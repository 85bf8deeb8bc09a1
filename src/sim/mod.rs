pub mod grid;
pub mod integrator;
pub mod runner;
pub mod summary;
pub mod trajectory;

pub use grid::TimeGrid;
pub use integrator::{Dopri5, OdeSystem, Stats, Tolerances};
pub use runner::{run, simulate, simulate_with, BallSystem, RunOutput};
pub use summary::QuantitiesOfInterest;
pub use trajectory::{Trajectory, TrimPolicy};
