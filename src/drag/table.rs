use std::io::{Read, Write};
use std::path::Path;

use crate::drag::curves::{self, DragCurve};
use crate::drag::interp::{interp_clamped, interp_within};
use crate::error::{GolfError, Result};
use crate::physics::atmosphere::{self, AltitudeUnit};

// ---------------------------------------------------------------------------
// Merged drag coefficient table
// ---------------------------------------------------------------------------

/// Drag coefficient against Reynolds number, one column per dimple ratio,
/// over a Reynolds index shared by every column.
///
/// Built once and only read afterwards; share it by reference across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct DragTable {
    reynolds: Vec<f64>,
    ratios: Vec<f64>,
    columns: Vec<Vec<f64>>,
}

/// Result of one drag coefficient evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSample {
    pub cd: f64,
    pub reynolds: f64,
}

impl DragTable {
    /// Merge per-ratio curves onto the union of their Reynolds samples.
    ///
    /// Cells without a native sample are filled by linear interpolation in
    /// Reynolds number along their own curve. Cells outside a curve's
    /// sampled range cannot be filled, and any row holding one is dropped,
    /// so the table spans only the range every curve covers.
    pub fn from_curves(curves: &[DragCurve]) -> Result<Self> {
        if curves.is_empty() {
            return Err(GolfError::EmptyTable);
        }
        for (i, c) in curves.iter().enumerate() {
            if curves[..i].iter().any(|o| o.dimple_ratio() == c.dimple_ratio()) {
                return Err(GolfError::InvalidCurve {
                    ratio: c.dimple_ratio(),
                    reason: "more than one curve for this ratio".into(),
                });
            }
        }

        let mut index: Vec<f64> = curves.iter().flat_map(|c| c.reynolds().iter().copied()).collect();
        index.sort_by(f64::total_cmp);
        index.dedup();

        let mut reynolds = Vec::with_capacity(index.len());
        let mut columns = vec![Vec::with_capacity(index.len()); curves.len()];
        for re in index {
            let row: Option<Vec<f64>> = curves
                .iter()
                .map(|c| interp_within(re, c.reynolds(), c.cd()))
                .collect();
            if let Some(row) = row {
                reynolds.push(re);
                for (col, cd) in columns.iter_mut().zip(row) {
                    col.push(cd);
                }
            }
        }

        if reynolds.is_empty() {
            return Err(GolfError::EmptyTable);
        }

        Ok(Self {
            reynolds,
            ratios: curves.iter().map(|c| c.dimple_ratio()).collect(),
            columns,
        })
    }

    /// Table built from the compiled-in reference curves.
    pub fn standard() -> Result<Self> {
        Self::from_curves(&curves::reference_curves()?)
    }

    /// Table built from the standard curve files found in `dir`.
    pub fn from_curves_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Self::from_curves(&curves::load_curves_dir(dir)?)
    }

    pub fn reynolds(&self) -> &[f64] {
        &self.reynolds
    }

    pub fn ratios(&self) -> &[f64] {
        &self.ratios
    }

    pub fn len(&self) -> usize {
        self.reynolds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reynolds.is_empty()
    }

    /// Reynolds number range covered by the table.
    pub fn domain(&self) -> (f64, f64) {
        (self.reynolds[0], self.reynolds[self.reynolds.len() - 1])
    }

    /// Column calibrated for `dimple_ratio`.
    ///
    /// There is no interpolation between ratios: the ratio must name one of
    /// the calibrated columns (compared with a 1e-9 relative tolerance so
    /// that `0.0125` and `1.25e-2` written differently still match).
    pub fn column(&self, dimple_ratio: f64) -> Result<DragColumn<'_>> {
        let tol = 1e-9 * dimple_ratio.abs().max(f64::MIN_POSITIVE);
        let idx = self
            .ratios
            .iter()
            .position(|&r| (r - dimple_ratio).abs() <= tol)
            .ok_or_else(|| GolfError::UnknownDimpleRatio {
                ratio: dimple_ratio,
                available: self.ratios.clone(),
            })?;
        Ok(DragColumn {
            dimple_ratio: self.ratios[idx],
            reynolds: &self.reynolds,
            cd: &self.columns[idx],
        })
    }

    /// Cd at a Reynolds number, clamped to the table's end values outside
    /// its domain.
    pub fn cd(&self, reynolds: f64, dimple_ratio: f64) -> Result<f64> {
        Ok(self.column(dimple_ratio)?.cd_at(reynolds))
    }

    /// Cd for flight conditions; see [`DragColumn::drag_coefficient`].
    pub fn drag_coefficient(
        &self,
        height: f64,
        vel_mag: f64,
        reference_length: f64,
        density: f64,
        dimple_ratio: f64,
    ) -> Result<DragSample> {
        self.column(dimple_ratio)?
            .drag_coefficient(height, vel_mag, reference_length, density)
    }

    // -----------------------------------------------------------------------
    // Persisted form: `Re,<ratio>,<ratio>,...`
    // -----------------------------------------------------------------------

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = vec!["Re".to_string()];
        header.extend(self.ratios.iter().map(|r| r.to_string()));
        wtr.write_record(&header)?;

        for (i, re) in self.reynolds.iter().enumerate() {
            let mut row = vec![re.to_string()];
            row.extend(self.columns.iter().map(|col| col[i].to_string()));
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }

    pub fn read_csv<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let bad = |reason: String| GolfError::Configuration(format!("drag table: {}", reason));
        let parse = |field: &str| field.parse::<f64>().map_err(|e| bad(format!("{:?}: {}", field, e)));

        let headers = rdr.headers()?.clone();
        if headers.len() < 2 {
            return Err(bad("expected a Re column and at least one ratio column".into()));
        }
        let ratios = headers.iter().skip(1).map(parse).collect::<Result<Vec<f64>>>()?;
        for (i, &r) in ratios.iter().enumerate() {
            if !r.is_finite() {
                return Err(bad(format!("non-finite dimple ratio {}", r)));
            }
            if ratios[..i].contains(&r) {
                return Err(bad(format!("dimple ratio {} appears twice", r)));
            }
        }

        let mut reynolds = Vec::new();
        let mut columns = vec![Vec::new(); ratios.len()];
        for record in rdr.records() {
            let record = record?;
            let values = record.iter().map(parse).collect::<Result<Vec<f64>>>()?;
            if values.iter().any(|v| !v.is_finite()) {
                return Err(bad(format!("non-finite value in row {:?}", values)));
            }
            if let Some(&last) = reynolds.last() {
                if values[0] <= last {
                    return Err(bad(format!("Reynolds index not increasing at {}", values[0])));
                }
            }
            reynolds.push(values[0]);
            for (col, v) in columns.iter_mut().zip(&values[1..]) {
                col.push(*v);
            }
        }

        if reynolds.is_empty() {
            return Err(GolfError::EmptyTable);
        }
        Ok(Self { reynolds, ratios, columns })
    }

    pub fn read_csv_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::read_csv(file)
    }
}

/// One dimple-ratio column of a [`DragTable`].
#[derive(Debug, Clone, Copy)]
pub struct DragColumn<'a> {
    pub dimple_ratio: f64,
    reynolds: &'a [f64],
    cd: &'a [f64],
}

impl DragColumn<'_> {
    pub fn cd_at(&self, reynolds: f64) -> f64 {
        interp_clamped(reynolds, self.reynolds, self.cd)
    }

    /// Cd for a ball at `height` (m) moving at `vel_mag` (m/s) through air.
    ///
    /// The temperature for the Reynolds number comes from the standard
    /// atmosphere at `height`; `density` is supplied by the caller so it
    /// may be scaled.
    pub fn drag_coefficient(
        &self,
        height: f64,
        vel_mag: f64,
        reference_length: f64,
        density: f64,
    ) -> Result<DragSample> {
        let temperature =
            atmosphere::standard_temperature(atmosphere::geopotential(height, AltitudeUnit::Meters))?;
        let reynolds = atmosphere::reynolds_number(vel_mag, density, reference_length, temperature);
        if !reynolds.is_finite() {
            return Err(GolfError::Configuration(format!(
                "non-finite Reynolds number for speed {} and density {}",
                vel_mag, density
            )));
        }
        Ok(DragSample { cd: self.cd_at(reynolds), reynolds })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
