pub mod config;
pub mod drag;
pub mod dynamics;
pub mod error;
pub mod io;
pub mod physics;
pub mod sim;

pub use config::{InputOverrides, SimInputs};
pub use drag::{DragCurve, DragTable};
pub use dynamics::{BallParams, BallState, LaunchConditions};
pub use error::{GolfError, Result};
pub use sim::{run, simulate, QuantitiesOfInterest, RunOutput, TimeGrid, Trajectory, TrimPolicy};
