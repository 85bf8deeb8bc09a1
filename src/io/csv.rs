use std::io::Write;
use std::path::Path;

use crate::dynamics::state::STATE_COLUMNS;
use crate::error::Result;
use crate::sim::trajectory::Trajectory;

/// Write trajectory data to CSV format.
///
/// Columns: time, p_LL_x, p_LL_y, p_LL_z, v_LL_x, v_LL_y, v_LL_z,
///          theta_x, theta_y, theta_z, w_x, w_y, w_z
///
/// Values are written in shortest round-trip form so the file reloads
/// bit-for-bit.
pub fn write_trajectory<W: Write>(writer: W, traj: &Trajectory) -> Result<()> {
    let mut wtr = ::csv::Writer::from_writer(writer);

    let mut header = vec!["time"];
    header.extend(STATE_COLUMNS);
    wtr.write_record(&header)?;

    for (t, s) in traj.iter() {
        let mut row = vec![t.to_string()];
        row.extend(s.to_array().iter().map(|v| v.to_string()));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write trajectory to a CSV file at the given path.
pub fn write_trajectory_file<P: AsRef<Path>>(path: P, traj: &Trajectory) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_trajectory(file, traj)
}
