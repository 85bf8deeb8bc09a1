use crate::drag::{DragColumn, DragTable};
use crate::dynamics::point_mass::derivatives_with_column;
use crate::dynamics::state::{BallParams, LaunchConditions, StateArray, STATE_DIM};
use crate::error::{GolfError, Result};
use crate::sim::grid::TimeGrid;
use crate::sim::integrator::{Dopri5, OdeSystem, Stats};
use crate::sim::summary::QuantitiesOfInterest;
use crate::sim::trajectory::{TrimPolicy, Trajectory};

// ---------------------------------------------------------------------------
// Ball equations of motion as an ODE system
// ---------------------------------------------------------------------------

/// Point-mass ball model with its drag column resolved once per run.
pub struct BallSystem<'a> {
    params: &'a BallParams,
    column: DragColumn<'a>,
}

impl<'a> BallSystem<'a> {
    pub fn new(params: &'a BallParams, table: &'a DragTable) -> Result<Self> {
        params.validate()?;
        let column = table.column(params.dimple_ratio)?;
        Ok(Self { params, column })
    }
}

impl OdeSystem<STATE_DIM> for BallSystem<'_> {
    fn rhs(&self, _t: f64, y: &StateArray) -> Result<StateArray> {
        derivatives_with_column(y, self.params, &self.column)
    }
}

// ---------------------------------------------------------------------------
// Full run
// ---------------------------------------------------------------------------

/// Result of one run: the trimmed trajectory and its summary.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub trajectory: Trajectory,
    pub qoi: QuantitiesOfInterest,
    pub stats: Stats,
}

fn check_launch(launch: &LaunchConditions) -> Result<()> {
    let finite = [launch.angle_deg, launch.azimuth_deg, launch.speed]
        .iter()
        .chain(launch.position.iter())
        .chain(launch.omega.iter())
        .all(|v| v.is_finite());
    if finite {
        Ok(())
    } else {
        Err(GolfError::Configuration("launch conditions must be finite".into()))
    }
}

/// Integrate over every grid time with a caller-supplied solver.
/// Returns the untrimmed trajectory.
pub fn simulate_with(
    params: &BallParams,
    launch: &LaunchConditions,
    grid: &TimeGrid,
    table: &DragTable,
    solver: &mut Dopri5,
) -> Result<Trajectory> {
    check_launch(launch)?;
    let system = BallSystem::new(params, table)?;
    let times = grid.times();
    let x0 = launch.initial_state().to_array();
    let rows = solver.integrate(&system, &x0, &times)?;
    Trajectory::from_rows(&times, &rows)
}

/// Integrate with default tolerances. Returns the untrimmed trajectory.
pub fn simulate(
    params: &BallParams,
    launch: &LaunchConditions,
    grid: &TimeGrid,
    table: &DragTable,
) -> Result<Trajectory> {
    simulate_with(params, launch, grid, table, &mut Dopri5::default())
}

/// Integrate, trim and summarize.
pub fn run(
    params: &BallParams,
    launch: &LaunchConditions,
    grid: &TimeGrid,
    table: &DragTable,
    trim: TrimPolicy,
) -> Result<RunOutput> {
    let mut solver = Dopri5::default();
    let raw = simulate_with(params, launch, grid, table, &mut solver)?;
    let trajectory = raw.trimmed(trim);
    let qoi = QuantitiesOfInterest::from_trajectory(&trajectory)?;
    Ok(RunOutput { trajectory, qoi, stats: solver.stats() })
}
