use golfball::{run, BallParams, DragTable, LaunchConditions, TimeGrid, TrimPolicy};
use nalgebra::Vector3;

/// Sweep launch elevation with and without backspin and print the
/// quantities of interest for each shot.
fn main() -> golfball::Result<()> {
    let table = DragTable::standard()?;
    let params = BallParams::default();
    let grid = TimeGrid::new(0.0, 20.0, 0.01)?;
    let (re_min, re_max) = table.domain();

    println!("=== Launch Angle Sweep (70 m/s, eD = {}) ===\n", params.dimple_ratio);
    println!("Drag table: {} rows, Re {:.0} .. {:.0}\n", table.len(), re_min, re_max);

    for (label, spin) in [("no spin", 0.0), ("backspin 250 rad/s", -250.0)] {
        println!("  {}", label);
        println!("  {:>6}  {:>10}  {:>10}  {:>8}", "angle", "range (m)", "height (m)", "tof (s)");
        println!("  {}", "-".repeat(40));

        for angle in (2..=12).map(|i| i as f64 * 5.0) {
            let launch = LaunchConditions {
                angle_deg: angle,
                omega: Vector3::new(0.0, spin, 0.0),
                ..Default::default()
            };
            let out = run(&params, &launch, &grid, &table, TrimPolicy::Mask)?;
            println!(
                "  {:>6.1}  {:>10.2}  {:>10.2}  {:>8.2}",
                angle, out.qoi.max_range, out.qoi.max_height, out.qoi.time_of_flight
            );
        }
        println!();
    }

    Ok(())
}
