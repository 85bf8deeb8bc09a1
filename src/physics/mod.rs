pub mod atmosphere;
pub mod aerodynamics;

pub use atmosphere::{AltitudeUnit, Atmo};
