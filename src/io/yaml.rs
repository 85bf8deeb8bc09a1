use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::sim::summary::QuantitiesOfInterest;

/// Write the quantities of interest as a flat YAML mapping.
pub fn write_qoi<W: Write>(writer: W, qoi: &QuantitiesOfInterest) -> Result<()> {
    serde_yaml::to_writer(writer, qoi)?;
    Ok(())
}

pub fn write_qoi_file<P: AsRef<Path>>(path: P, qoi: &QuantitiesOfInterest) -> Result<()> {
    write_qoi(File::create(path)?, qoi)
}

pub fn read_qoi_file<P: AsRef<Path>>(path: P) -> Result<QuantitiesOfInterest> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&text)?)
}
