//! Raw drag calibration curves: Cd against Reynolds number for one dimple
//! (roughness) size ratio, as digitized from wind-tunnel data on dimpled and
//! roughened spheres.
//!
//! Curves are stored as headerless two-column CSV (`Re,Cd`). Representative
//! copies of the five reference curves live in `data/dimpled_spheres/` and
//! are compiled into the library.

use std::io::Read;
use std::path::Path;

use crate::error::{GolfError, Result};

pub const SMOOTH_RATIO: f64 = 0.0;
pub const ROUGH_1P5E3_RATIO: f64 = 1.5e-3;
pub const ROUGH_5E3_RATIO: f64 = 5e-3;
pub const ROUGH_1P25E2_RATIO: f64 = 1.25e-2;
pub const GOLF_BALL_RATIO: f64 = 1.04e-1;

/// Dimple ratios and file names of the curves merged into the standard table.
pub const STANDARD_CURVE_FILES: [(f64, &str); 4] = [
    (SMOOTH_RATIO, "eD0_smooth.csv"),
    (ROUGH_1P5E3_RATIO, "eD1p5e-3.csv"),
    (ROUGH_5E3_RATIO, "eD5e-3.csv"),
    (ROUGH_1P25E2_RATIO, "eD1p25e-2.csv"),
];

pub const GOLF_BALL_CURVE_FILE: &str = "GolfBall.csv";

const EMBEDDED_SMOOTH: &str = include_str!("../../data/dimpled_spheres/eD0_smooth.csv");
const EMBEDDED_1P5E3: &str = include_str!("../../data/dimpled_spheres/eD1p5e-3.csv");
const EMBEDDED_5E3: &str = include_str!("../../data/dimpled_spheres/eD5e-3.csv");
const EMBEDDED_1P25E2: &str = include_str!("../../data/dimpled_spheres/eD1p25e-2.csv");
const EMBEDDED_GOLF_BALL: &str = include_str!("../../data/dimpled_spheres/GolfBall.csv");

/// One calibration curve, sorted by ascending Reynolds number.
///
/// Only built through [`DragCurve::new`], so every curve holds at least one
/// sample and its two columns have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct DragCurve {
    dimple_ratio: f64,
    reynolds: Vec<f64>,
    cd: Vec<f64>,
}

impl DragCurve {
    /// Build a curve from `(Re, Cd)` samples in any order.
    ///
    /// Samples are sorted by Reynolds number. Duplicate Reynolds numbers and
    /// non-finite values are rejected.
    pub fn new(dimple_ratio: f64, samples: Vec<(f64, f64)>) -> Result<Self> {
        let invalid = |reason: String| GolfError::InvalidCurve { ratio: dimple_ratio, reason };

        if !dimple_ratio.is_finite() {
            return Err(invalid("non-finite dimple ratio".into()));
        }
        if samples.is_empty() {
            return Err(invalid("no samples".into()));
        }
        if let Some((re, cd)) = samples.iter().find(|(re, cd)| !re.is_finite() || !cd.is_finite()) {
            return Err(invalid(format!("non-finite sample ({}, {})", re, cd)));
        }

        let mut samples = samples;
        samples.sort_by(|a, b| a.0.total_cmp(&b.0));
        if let Some(pair) = samples.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(invalid(format!("duplicate Reynolds number {}", pair[0].0)));
        }

        let (reynolds, cd): (Vec<f64>, Vec<f64>) = samples.into_iter().unzip();
        Ok(Self { dimple_ratio, reynolds, cd })
    }

    /// Parse a headerless `Re,Cd` CSV stream.
    pub fn from_reader<R: Read>(dimple_ratio: f64, reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut samples = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            if record.len() < 2 {
                return Err(GolfError::InvalidCurve {
                    ratio: dimple_ratio,
                    reason: format!("row {} has {} column(s), expected 2", row + 1, record.len()),
                });
            }
            let parse = |field: &str| {
                field.parse::<f64>().map_err(|e| GolfError::InvalidCurve {
                    ratio: dimple_ratio,
                    reason: format!("row {}: cannot parse {:?}: {}", row + 1, field, e),
                })
            };
            samples.push((parse(&record[0])?, parse(&record[1])?));
        }

        Self::new(dimple_ratio, samples)
    }

    /// Read a headerless `Re,Cd` CSV file.
    pub fn from_path<P: AsRef<Path>>(dimple_ratio: f64, path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(dimple_ratio, file)
    }

    pub fn dimple_ratio(&self) -> f64 {
        self.dimple_ratio
    }

    pub fn reynolds(&self) -> &[f64] {
        &self.reynolds
    }

    pub fn cd(&self) -> &[f64] {
        &self.cd
    }

    pub fn len(&self) -> usize {
        self.reynolds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reynolds.is_empty()
    }

    pub fn min_reynolds(&self) -> f64 {
        self.reynolds[0]
    }

    pub fn max_reynolds(&self) -> f64 {
        self.reynolds[self.reynolds.len() - 1]
    }
}

/// The four curves that make up the standard merged table.
pub fn reference_curves() -> Result<Vec<DragCurve>> {
    [
        (SMOOTH_RATIO, EMBEDDED_SMOOTH),
        (ROUGH_1P5E3_RATIO, EMBEDDED_1P5E3),
        (ROUGH_5E3_RATIO, EMBEDDED_5E3),
        (ROUGH_1P25E2_RATIO, EMBEDDED_1P25E2),
    ]
    .into_iter()
    .map(|(ratio, text)| DragCurve::from_reader(ratio, text.as_bytes()))
    .collect()
}

/// Measured golf ball curve. Its Reynolds coverage is too narrow to share a
/// table with the sphere curves, so it is not part of the standard table.
pub fn golf_ball_curve() -> Result<DragCurve> {
    DragCurve::from_reader(GOLF_BALL_RATIO, EMBEDDED_GOLF_BALL.as_bytes())
}

/// Load the standard curve files from a directory.
pub fn load_curves_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<DragCurve>> {
    let dir = dir.as_ref();
    STANDARD_CURVE_FILES
        .iter()
        .map(|&(ratio, name)| DragCurve::from_path(ratio, dir.join(name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_curves_parse() {
        let curves = reference_curves().unwrap();
        assert_eq!(curves.len(), 4);
        let ratios: Vec<f64> = curves.iter().map(|c| c.dimple_ratio()).collect();
        assert_eq!(ratios, vec![0.0, 1.5e-3, 5e-3, 1.25e-2]);
        for c in &curves {
            assert!(c.reynolds().windows(2).all(|w| w[0] < w[1]));
            assert!(c.cd().iter().all(|&cd| cd > 0.0 && cd < 1.0));
        }
        assert_eq!(curves[3].reynolds()[0], 20_000.0);
        assert_eq!(curves[3].cd()[0], 0.466);
    }

    #[test]
    fn golf_ball_curve_is_narrow() {
        let golf = golf_ball_curve().unwrap();
        let smooth = &reference_curves().unwrap()[0];
        assert_eq!(golf.dimple_ratio(), GOLF_BALL_RATIO);
        assert!(golf.min_reynolds() > smooth.min_reynolds());
        assert!(golf.max_reynolds() < smooth.max_reynolds());
    }

    #[test]
    fn unsorted_samples_are_sorted() {
        let c = DragCurve::new(0.0, vec![(3.0, 0.3), (1.0, 0.1), (2.0, 0.2)]).unwrap();
        assert_eq!(c.reynolds(), &[1.0, 2.0, 3.0]);
        assert_eq!(c.cd(), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn duplicates_and_empty_rejected() {
        assert!(matches!(
            DragCurve::new(0.0, vec![(1.0, 0.1), (1.0, 0.2)]),
            Err(GolfError::InvalidCurve { .. })
        ));
        assert!(DragCurve::new(0.0, vec![]).is_err());
        assert!(DragCurve::new(0.0, vec![(f64::NAN, 0.2)]).is_err());
        assert!(DragCurve::new(f64::NAN, vec![(1.0, 0.2)]).is_err());
    }

    #[test]
    fn single_sample_curve_has_matching_columns() {
        let c = DragCurve::new(1e-3, vec![(5e4, 0.4)]).unwrap();
        assert_eq!(c.len(), 1);
        assert!(!c.is_empty());
        assert_eq!(c.reynolds().len(), c.cd().len());
        assert_eq!(c.min_reynolds(), 5e4);
        assert_eq!(c.max_reynolds(), 5e4);
        assert_eq!(c.dimple_ratio(), 1e-3);
    }

    #[test]
    fn malformed_csv_rejected() {
        let err = DragCurve::from_reader(0.0, "1000,0.4\n2000,abc\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("row 2"), "{}", err);
        let err = DragCurve::from_reader(0.0, "1000\n".as_bytes()).unwrap_err();
        assert!(matches!(err, GolfError::InvalidCurve { .. }));
    }

    #[test]
    fn csv_whitespace_tolerated() {
        let c = DragCurve::from_reader(5e-3, " 1e4 , 0.45\n2e4,0.44 \n".as_bytes()).unwrap();
        assert_eq!(c.reynolds(), &[1e4, 2e4]);
        assert_eq!(c.cd(), &[0.45, 0.44]);
    }
}
