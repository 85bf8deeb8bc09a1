//! Simulation inputs as a YAML document.
//!
//! The document has four groups, mirroring the command-line options:
//!
//! ```yaml
//! config: { out_filename, traj_filename, write_traj, trim }
//! time:   { t_init, t_stop, dt }
//! state:  { angle, azimuth, vel_mag, pos_LL, w_LL_B_LL }
//! params: { m, D, eD, S, g_LL, rho_scale, wind }
//! ```

use std::fs;
use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::dynamics::state::{BallParams, LaunchConditions};
use crate::error::{GolfError, Result};
use crate::sim::grid::TimeGrid;
use crate::sim::trajectory::TrimPolicy;

pub const DEFAULT_INPUT_FILE: &str = "projectile_inputs.yml";
pub const DEFAULT_OUTPUT_FILE: &str = "projectile_outputs.yml";
pub const DEFAULT_TRAJ_FILE: &str = "projectile_trajectory.csv";

/// Written to [`DEFAULT_INPUT_FILE`] when no input file exists yet.
pub const DEFAULT_INPUTS_YAML: &str = "\
# Golfball Sim Inputs
config:
  out_filename: projectile_outputs.yml
  traj_filename: projectile_trajectory.csv
  write_traj: false
  trim: mask
time:
  t_init: 0.0
  t_stop: 20.0
  dt: 0.01
state:
  angle: 38.0
  azimuth: 0.0
  vel_mag: 70.0
  pos_LL: [0.0, 0.0, 0.0]
  w_LL_B_LL: [0.0, 0.0, 0.0]
params:
  m: 0.0459
  D: 0.04222
  eD: 0.0125
  S: 0.000005
  g_LL: [0.0, 0.0, -9.81]
  rho_scale: 1.0
  wind: [0.0, 0.0, 0.0]
";

// ---------------------------------------------------------------------------
// Document groups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub out_filename: String,
    pub traj_filename: String,
    pub write_traj: bool,
    #[serde(default)]
    pub trim: TrimPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeConfig {
    pub t_init: f64,
    pub t_stop: f64,
    pub dt: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateConfig {
    pub angle: f64,   // deg
    pub azimuth: f64, // deg
    pub vel_mag: f64, // m/s
    #[serde(rename = "pos_LL")]
    pub pos_ll: [f64; 3],
    #[serde(rename = "w_LL_B_LL")]
    pub w_ll_b_ll: [f64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamsConfig {
    pub m: f64,
    #[serde(rename = "D")]
    pub d: f64,
    #[serde(rename = "eD")]
    pub e_d: f64,
    #[serde(rename = "S")]
    pub s: f64,
    #[serde(rename = "g_LL")]
    pub g_ll: [f64; 3],
    pub rho_scale: f64,
    pub wind: [f64; 3],
}

/// Complete simulation input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimInputs {
    pub config: OutputConfig,
    pub time: TimeConfig,
    pub state: StateConfig,
    pub params: ParamsConfig,
}

/// Values that replace the document's entries when present.
///
/// `write_traj` can only switch trajectory output on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputOverrides {
    pub out_filename: Option<String>,
    pub traj_filename: Option<String>,
    pub write_traj: bool,
    pub trim: Option<TrimPolicy>,
    pub t_init: Option<f64>,
    pub t_stop: Option<f64>,
    pub dt: Option<f64>,
    pub angle: Option<f64>,
    pub azimuth: Option<f64>,
    pub vel_mag: Option<f64>,
    pub pos_ll: Option<[f64; 3]>,
    pub w_ll_b_ll: Option<[f64; 3]>,
    pub m: Option<f64>,
    pub d: Option<f64>,
    pub e_d: Option<f64>,
    pub s: Option<f64>,
    pub g_ll: Option<[f64; 3]>,
    pub rho_scale: Option<f64>,
    pub wind: Option<[f64; 3]>,
}

fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *slot = v.clone();
    }
}

impl SimInputs {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the default input document to `path`.
    pub fn write_default<P: AsRef<Path>>(path: P) -> Result<()> {
        fs::write(path, DEFAULT_INPUTS_YAML)?;
        Ok(())
    }

    pub fn apply(&mut self, o: &InputOverrides) {
        set(&mut self.config.out_filename, &o.out_filename);
        set(&mut self.config.traj_filename, &o.traj_filename);
        if o.write_traj {
            self.config.write_traj = true;
        }
        set(&mut self.config.trim, &o.trim);

        set(&mut self.time.t_init, &o.t_init);
        set(&mut self.time.t_stop, &o.t_stop);
        set(&mut self.time.dt, &o.dt);

        set(&mut self.state.angle, &o.angle);
        set(&mut self.state.azimuth, &o.azimuth);
        set(&mut self.state.vel_mag, &o.vel_mag);
        set(&mut self.state.pos_ll, &o.pos_ll);
        set(&mut self.state.w_ll_b_ll, &o.w_ll_b_ll);

        set(&mut self.params.m, &o.m);
        set(&mut self.params.d, &o.d);
        set(&mut self.params.e_d, &o.e_d);
        set(&mut self.params.s, &o.s);
        set(&mut self.params.g_ll, &o.g_ll);
        set(&mut self.params.rho_scale, &o.rho_scale);
        set(&mut self.params.wind, &o.wind);
    }

    pub fn ball_params(&self) -> BallParams {
        let p = &self.params;
        BallParams {
            mass: p.m,
            diameter: p.d,
            dimple_ratio: p.e_d,
            magnus_coeff: p.s,
            gravity: Vector3::from(p.g_ll),
            rho_scale: p.rho_scale,
            wind: Vector3::from(p.wind),
        }
    }

    pub fn launch(&self) -> LaunchConditions {
        let s = &self.state;
        LaunchConditions {
            angle_deg: s.angle,
            azimuth_deg: s.azimuth,
            speed: s.vel_mag,
            position: Vector3::from(s.pos_ll),
            omega: Vector3::from(s.w_ll_b_ll),
        }
    }

    pub fn grid(&self) -> Result<TimeGrid> {
        TimeGrid::new(self.time.t_init, self.time.t_stop, self.time.dt)
    }

    pub fn validate(&self) -> Result<()> {
        self.grid()?;
        self.ball_params().validate()?;
        let s = &self.state;
        let launch_finite = [s.angle, s.azimuth, s.vel_mag]
            .iter()
            .chain(s.pos_ll.iter())
            .chain(s.w_ll_b_ll.iter())
            .all(|v| v.is_finite());
        if !launch_finite {
            return Err(GolfError::Configuration("state values must be finite".into()));
        }
        if self.config.out_filename.is_empty() {
            return Err(GolfError::Configuration("out_filename must not be empty".into()));
        }
        if self.config.write_traj && self.config.traj_filename.is_empty() {
            return Err(GolfError::Configuration("traj_filename must not be empty".into()));
        }
        Ok(())
    }

    /// Each group as `(name, [(key, value)])`, keys sorted, for display.
    pub fn listing(&self) -> Vec<(&'static str, Vec<(&'static str, String)>)> {
        let c = &self.config;
        let t = &self.time;
        let s = &self.state;
        let p = &self.params;
        let mut groups = vec![
            (
                "config",
                vec![
                    ("out_filename", c.out_filename.clone()),
                    ("traj_filename", c.traj_filename.clone()),
                    ("write_traj", c.write_traj.to_string()),
                    ("trim", c.trim.to_string()),
                ],
            ),
            (
                "time",
                vec![
                    ("t_init", format!("{:?}", t.t_init)),
                    ("t_stop", format!("{:?}", t.t_stop)),
                    ("dt", format!("{:?}", t.dt)),
                ],
            ),
            (
                "state",
                vec![
                    ("angle", format!("{:?}", s.angle)),
                    ("azimuth", format!("{:?}", s.azimuth)),
                    ("vel_mag", format!("{:?}", s.vel_mag)),
                    ("pos_LL", format!("{:?}", s.pos_ll)),
                    ("w_LL_B_LL", format!("{:?}", s.w_ll_b_ll)),
                ],
            ),
            (
                "params",
                vec![
                    ("m", format!("{:?}", p.m)),
                    ("D", format!("{:?}", p.d)),
                    ("eD", format!("{:?}", p.e_d)),
                    ("S", format!("{:?}", p.s)),
                    ("g_LL", format!("{:?}", p.g_ll)),
                    ("rho_scale", format!("{:?}", p.rho_scale)),
                    ("wind", format!("{:?}", p.wind)),
                ],
            ),
        ];
        for (_, entries) in &mut groups {
            entries.sort_by(|a, b| a.0.cmp(b.0));
        }
        groups
    }
}

impl Default for SimInputs {
    fn default() -> Self {
        let params = BallParams::default();
        let launch = LaunchConditions::default();
        Self {
            config: OutputConfig {
                out_filename: DEFAULT_OUTPUT_FILE.into(),
                traj_filename: DEFAULT_TRAJ_FILE.into(),
                write_traj: false,
                trim: TrimPolicy::Mask,
            },
            time: TimeConfig { t_init: 0.0, t_stop: 20.0, dt: 0.01 },
            state: StateConfig {
                angle: launch.angle_deg,
                azimuth: launch.azimuth_deg,
                vel_mag: launch.speed,
                pos_ll: launch.position.into(),
                w_ll_b_ll: launch.omega.into(),
            },
            params: ParamsConfig {
                m: params.mass,
                d: params.diameter,
                e_d: params.dimple_ratio,
                s: params.magnus_coeff,
                g_ll: params.gravity.into(),
                rho_scale: params.rho_scale,
                wind: params.wind.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_document_matches_defaults() {
        let parsed = SimInputs::from_yaml_str(DEFAULT_INPUTS_YAML).unwrap();
        assert_eq!(parsed, SimInputs::default());
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn yaml_round_trip_keeps_document_key_names() {
        let text = SimInputs::default().to_yaml_string().unwrap();
        for key in ["pos_LL:", "w_LL_B_LL:", "D:", "eD:", "S:", "g_LL:", "trim: mask"] {
            assert!(text.contains(key), "missing {} in\n{}", key, text);
        }
        assert_eq!(SimInputs::from_yaml_str(&text).unwrap(), SimInputs::default());
    }

    #[test]
    fn trim_defaults_to_mask_when_absent() {
        let text = DEFAULT_INPUTS_YAML.replace("  trim: mask\n", "");
        let inputs = SimInputs::from_yaml_str(&text).unwrap();
        assert_eq!(inputs.config.trim, TrimPolicy::Mask);
    }

    #[test]
    fn unknown_and_missing_keys_rejected() {
        let extra = DEFAULT_INPUTS_YAML.replace("  rho_scale: 1.0\n", "  rho_scale: 1.0\n  spin_decay: 0.1\n");
        assert!(matches!(SimInputs::from_yaml_str(&extra), Err(GolfError::Yaml(_))));
        let missing = DEFAULT_INPUTS_YAML.replace("  dt: 0.01\n", "");
        assert!(matches!(SimInputs::from_yaml_str(&missing), Err(GolfError::Yaml(_))));
    }

    #[test]
    fn overrides_replace_only_given_values() {
        let mut inputs = SimInputs::default();
        inputs.apply(&InputOverrides {
            angle: Some(12.0),
            w_ll_b_ll: Some([0.0, -250.0, 0.0]),
            g_ll: Some([0.0, 0.0, -9.8]),
            trim: Some(TrimPolicy::TruncateAtFirstViolation),
            ..Default::default()
        });
        assert_eq!(inputs.state.angle, 12.0);
        assert_eq!(inputs.state.w_ll_b_ll, [0.0, -250.0, 0.0]);
        assert_eq!(inputs.params.g_ll, [0.0, 0.0, -9.8]);
        assert_eq!(inputs.config.trim, TrimPolicy::TruncateAtFirstViolation);
        assert_eq!(inputs.state.vel_mag, 70.0);
        assert_eq!(inputs.params.m, 0.0459);
        assert_eq!(inputs.config.out_filename, DEFAULT_OUTPUT_FILE);
        assert!(!inputs.config.write_traj);
    }

    #[test]
    fn write_traj_flag_only_switches_on() {
        let mut inputs = SimInputs::default();
        inputs.config.write_traj = true;
        inputs.apply(&InputOverrides::default());
        assert!(inputs.config.write_traj);

        let mut inputs = SimInputs::default();
        inputs.apply(&InputOverrides { write_traj: true, ..Default::default() });
        assert!(inputs.config.write_traj);
    }

    #[test]
    fn conversions_to_model_types() {
        let inputs = SimInputs::default();
        assert_eq!(inputs.ball_params(), BallParams::default());
        assert_eq!(inputs.launch(), LaunchConditions::default());
        assert_eq!(inputs.grid().unwrap().len(), 2000);
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut inputs = SimInputs::default();
        inputs.time.dt = 0.0;
        assert!(matches!(inputs.validate(), Err(GolfError::Configuration(_))));

        let mut inputs = SimInputs::default();
        inputs.params.m = -0.1;
        assert!(inputs.validate().is_err());

        let mut inputs = SimInputs::default();
        inputs.state.vel_mag = f64::NAN;
        assert!(inputs.validate().is_err());
    }

    #[test]
    fn listing_is_sorted_per_group() {
        let listing = SimInputs::default().listing();
        let names: Vec<_> = listing.iter().map(|(g, _)| *g).collect();
        assert_eq!(names, vec!["config", "time", "state", "params"]);
        let params = &listing[3].1;
        let keys: Vec<_> = params.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["D", "S", "eD", "g_LL", "m", "rho_scale", "wind"]);
        assert!(params.contains(&("g_LL", "[0.0, 0.0, -9.81]".to_string())));
    }

    #[test]
    fn write_default_then_load() {
        let path = std::env::temp_dir().join(format!("golfball_inputs_{}.yml", std::process::id()));
        SimInputs::write_default(&path).unwrap();
        let loaded = SimInputs::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, SimInputs::default());
    }
}
