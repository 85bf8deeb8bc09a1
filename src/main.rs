use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use golfball::config::{InputOverrides, SimInputs, DEFAULT_INPUT_FILE};
use golfball::io::{write_qoi_file, write_trajectory_file};
use golfball::{DragTable, QuantitiesOfInterest, TrimPolicy};

/// 3D golf ball flight with drag crisis and Magnus lift.
///
/// Inputs come from a YAML file; any option given here replaces the
/// matching entry of that file.
#[derive(Parser, Debug)]
#[command(name = "golfball", version, about, long_about = None)]
struct Cli {
    /// Print inputs and outputs to stdout
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Input YAML file (default: projectile_inputs.yml, created if missing)
    #[arg(short = 'i', long = "in_filename", value_name = "IN_FILENAME")]
    in_filename: Option<PathBuf>,

    /// Start time (s)
    #[arg(long = "t_init", allow_negative_numbers = true)]
    t_init: Option<f64>,

    /// Stop time (s), not included in the output grid
    #[arg(long = "t_stop", allow_negative_numbers = true)]
    t_stop: Option<f64>,

    /// Output time step (s)
    #[arg(long)]
    dt: Option<f64>,

    /// Initial position in the local-level frame (m)
    #[arg(long = "pos_LL", num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    pos_ll: Option<Vec<f64>>,

    /// Angular velocity in the local-level frame (rad/s)
    #[arg(long = "w_LL_B_LL", num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    w_ll_b_ll: Option<Vec<f64>>,

    /// Launch speed (m/s)
    #[arg(long = "vel_mag")]
    vel_mag: Option<f64>,

    /// Launch elevation angle (deg)
    #[arg(long, allow_negative_numbers = true)]
    angle: Option<f64>,

    /// Launch azimuth from +x towards +y (deg)
    #[arg(long, allow_negative_numbers = true)]
    azimuth: Option<f64>,

    /// Ball mass (kg)
    #[arg(short = 'm', long = "m")]
    m: Option<f64>,

    /// Ball diameter (m)
    #[arg(short = 'D', long = "D")]
    d: Option<f64>,

    /// Dimple depth to diameter ratio
    #[arg(long = "eD")]
    e_d: Option<f64>,

    /// Magnus coefficient
    #[arg(long = "S", allow_negative_numbers = true)]
    s: Option<f64>,

    /// Gravity vector (m/s^2)
    #[arg(long = "g_LL", num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    g_ll: Option<Vec<f64>>,

    /// Multiplier on the standard air density
    #[arg(long = "rho_scale")]
    rho_scale: Option<f64>,

    /// Constant wind velocity (m/s)
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    wind: Option<Vec<f64>>,

    /// QoI output YAML file
    #[arg(short = 'o', long = "out_filename", value_name = "OUT_FILENAME")]
    out_filename: Option<String>,

    /// Write the trimmed trajectory to CSV
    #[arg(long = "write_traj")]
    write_traj: bool,

    /// Trajectory CSV file
    #[arg(long = "traj_filename")]
    traj_filename: Option<String>,

    /// Trimming policy: mask or truncate
    #[arg(long)]
    trim: Option<TrimPolicy>,

    /// Use a merged drag table CSV instead of the built-in curves
    #[arg(long = "cd_table", value_name = "FILE", conflicts_with = "curves_dir")]
    cd_table: Option<PathBuf>,

    /// Build the drag table from per-ratio curve CSVs in DIR
    #[arg(long = "curves_dir", value_name = "DIR")]
    curves_dir: Option<PathBuf>,

    /// Save the merged drag table as CSV
    #[arg(long = "write_cd_table", value_name = "FILE")]
    write_cd_table: Option<PathBuf>,
}

fn triple(v: &Option<Vec<f64>>) -> Option<[f64; 3]> {
    v.as_deref().and_then(|s| <[f64; 3]>::try_from(s).ok())
}

impl Cli {
    fn overrides(&self) -> InputOverrides {
        InputOverrides {
            out_filename: self.out_filename.clone(),
            traj_filename: self.traj_filename.clone(),
            write_traj: self.write_traj,
            trim: self.trim,
            t_init: self.t_init,
            t_stop: self.t_stop,
            dt: self.dt,
            angle: self.angle,
            azimuth: self.azimuth,
            vel_mag: self.vel_mag,
            pos_ll: triple(&self.pos_ll),
            w_ll_b_ll: triple(&self.w_ll_b_ll),
            m: self.m,
            d: self.d,
            e_d: self.e_d,
            s: self.s,
            g_ll: triple(&self.g_ll),
            rho_scale: self.rho_scale,
            wind: triple(&self.wind),
        }
    }
}

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

fn print_inputs(inputs: &SimInputs) {
    for (group, entries) in inputs.listing() {
        println!("{} Parameters", group);
        println!("----------------");
        let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (name, value) in entries {
            println!("-- {:<w$}: {}", name, value, w = width + 2);
        }
        println!();
    }
}

fn print_qoi(qoi: &QuantitiesOfInterest) {
    println!("Quantities of Interest (QoI):");
    println!("-----------------------------");
    println!("-- Distance Travelled: {:12.6} m", qoi.max_range);
    println!("-- Max Height:         {:12.6} m", qoi.max_height);
    println!("-- time @ impact:      {:12.6} s", qoi.time_of_flight);
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn load_inputs(cli: &Cli) -> golfball::Result<SimInputs> {
    match &cli.in_filename {
        Some(path) => SimInputs::load(path),
        None => {
            if !Path::new(DEFAULT_INPUT_FILE).is_file() {
                SimInputs::write_default(DEFAULT_INPUT_FILE)?;
            }
            SimInputs::load(DEFAULT_INPUT_FILE)
        }
    }
}

fn load_table(cli: &Cli) -> golfball::Result<DragTable> {
    match (&cli.cd_table, &cli.curves_dir) {
        (Some(file), _) => DragTable::read_csv_file(file),
        (None, Some(dir)) => DragTable::from_curves_dir(dir),
        (None, None) => DragTable::standard(),
    }
}

fn execute(cli: &Cli) -> golfball::Result<()> {
    let mut inputs = load_inputs(cli)?;
    inputs.apply(&cli.overrides());
    inputs.validate()?;

    let table = load_table(cli)?;
    if let Some(path) = &cli.write_cd_table {
        table.write_csv_file(path)?;
    }

    if cli.verbose {
        print_inputs(&inputs);
    }

    let out = golfball::run(
        &inputs.ball_params(),
        &inputs.launch(),
        &inputs.grid()?,
        &table,
        inputs.config.trim,
    )?;

    if cli.verbose {
        print_qoi(&out.qoi);
    }

    write_qoi_file(&inputs.config.out_filename, &out.qoi)?;
    if inputs.config.write_traj {
        write_trajectory_file(&inputs.config.traj_filename, &out.trajectory)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("golfball: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn legacy_option_spellings_parse() {
        let cli = Cli::try_parse_from([
            "golfball", "-v", "-i", "in.yml", "--angle", "12", "--w_LL_B_LL", "0", "-250", "0",
            "--g_LL", "0", "0", "-9.8", "-m", "0.046", "-D", "0.043", "--eD", "0.005",
            "--trim", "truncate", "-o", "out.yml", "--write_traj",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.in_filename, Some(PathBuf::from("in.yml")));
        let o = cli.overrides();
        assert_eq!(o.angle, Some(12.0));
        assert_eq!(o.w_ll_b_ll, Some([0.0, -250.0, 0.0]));
        assert_eq!(o.g_ll, Some([0.0, 0.0, -9.8]));
        assert_eq!(o.m, Some(0.046));
        assert_eq!(o.d, Some(0.043));
        assert_eq!(o.e_d, Some(0.005));
        assert_eq!(o.trim, Some(TrimPolicy::TruncateAtFirstViolation));
        assert_eq!(o.out_filename.as_deref(), Some("out.yml"));
        assert!(o.write_traj);
        assert_eq!(o.vel_mag, None);
    }

    #[test]
    fn vector_options_need_three_values() {
        assert!(Cli::try_parse_from(["golfball", "--wind", "1", "2"]).is_err());
        assert!(Cli::try_parse_from(["golfball", "--trim", "prefix"]).is_err());
        assert!(Cli::try_parse_from(["golfball", "--cd_table", "a.csv", "--curves_dir", "d"]).is_err());
    }
}
