use std::fmt;
use std::str::FromStr;

use crate::error::{GolfError, Result};

// ---------------------------------------------------------------------------
// 1976 US Standard Atmosphere (geopotential 0 - 84.85 km)
// ---------------------------------------------------------------------------

pub const EARTH_RADIUS_KM: f64 = 6356.766;    // radius used for geopotential conversion
pub const MAX_GEOPOTENTIAL_KM: f64 = 84.85;   // top of the modelled mesosphere

const MOLAR_MASS_AIR: f64 = 0.0289644;        // kg/mol
const GAS_CONSTANT: f64 = 8.3144598;          // J/(mol·K)
const GAMMA: f64 = 1.4;                       // ratio of specific heats

const SUTHERLAND_MU0: f64 = 18.27e-6;         // reference viscosity, Pa·s
const SUTHERLAND_T0: f64 = 291.15;            // reference temperature, K
const SUTHERLAND_C: f64 = 120.0;              // Sutherland constant, K

/// Unit an altitude argument is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltitudeUnit {
    Meters,
    Kilometers,
}

impl AltitudeUnit {
    fn to_km(self, altitude: f64) -> f64 {
        match self {
            AltitudeUnit::Meters => altitude / 1000.0,
            AltitudeUnit::Kilometers => altitude,
        }
    }
}

impl FromStr for AltitudeUnit {
    type Err = GolfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "m" => Ok(AltitudeUnit::Meters),
            "km" => Ok(AltitudeUnit::Kilometers),
            other => Err(GolfError::InvalidUnit(other.to_string())),
        }
    }
}

impl fmt::Display for AltitudeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AltitudeUnit::Meters => write!(f, "m"),
            AltitudeUnit::Kilometers => write!(f, "km"),
        }
    }
}

/// Atmospheric properties at one geometric altitude.
#[derive(Debug, Clone, Copy)]
pub struct Atmo {
    pub geopotential_km: f64,
    pub temperature: f64,  // K
    pub pressure: f64,     // Pa
    pub density: f64,      // kg/m^3
    pub sound_speed: f64,  // m/s
}

/// Evaluate every standard-atmosphere quantity at once.
pub fn standard_atmosphere(altitude: f64, units: AltitudeUnit) -> Result<Atmo> {
    let geopotential_km = geopotential(altitude, units);
    let temperature = standard_temperature(geopotential_km)?;
    let pressure = standard_pressure(altitude, units)?;
    let density = ideal_gas_density(pressure, temperature);
    Ok(Atmo {
        geopotential_km,
        temperature,
        pressure,
        density,
        sound_speed: (GAMMA * pressure / density).sqrt(),
    })
}

/// Geometric to geopotential altitude, returned in km.
///
/// `h_geo = R * h / (R + h)`, evaluated in kilometres regardless of the
/// input unit.
pub fn geopotential(altitude: f64, units: AltitudeUnit) -> f64 {
    geopotential_with_radius(altitude, units, EARTH_RADIUS_KM)
}

pub fn geopotential_with_radius(altitude: f64, units: AltitudeUnit, earth_radius_km: f64) -> f64 {
    let h = units.to_km(altitude);
    earth_radius_km * h / (earth_radius_km + h)
}

/// Standard temperature (K) at a geopotential height in km.
///
/// Seven linear segments with breakpoints at 11, 20, 32, 47, 51, 71 and
/// 84.85 km. Heights below sea level extend the tropospheric lapse rate.
pub fn standard_temperature(geopotential_km: f64) -> Result<f64> {
    let h = geopotential_km;
    let t = if h <= 11.0 {
        288.15 - 6.5 * h
    } else if h <= 20.0 {
        216.65
    } else if h <= 32.0 {
        196.65 + h
    } else if h <= 47.0 {
        228.65 + 2.8 * (h - 32.0)
    } else if h <= 51.0 {
        270.65
    } else if h <= 71.0 {
        270.65 - 2.8 * (h - 51.0)
    } else if h <= MAX_GEOPOTENTIAL_KM {
        214.65 - 2.0 * (h - 71.0)
    } else {
        return Err(GolfError::OutOfDomain { geopotential_km: h });
    };
    Ok(t)
}

/// Standard pressure (Pa) at a geometric altitude.
pub fn standard_pressure(altitude: f64, units: AltitudeUnit) -> Result<f64> {
    let h = geopotential(altitude, units);
    let t = standard_temperature(h)?;

    let p = if h <= 11.0 {
        101_325.0 * (288.15 / t).powf(-5.255877)
    } else if h <= 20.0 {
        22_632.06 * (-0.1577 * (h - 11.0)).exp()
    } else if h <= 32.0 {
        5_474.889 * (216.65 / t).powf(34.16319)
    } else if h <= 47.0 {
        868.0187 * (228.65 / t).powf(12.2011)
    } else if h <= 51.0 {
        110.9063 * (-0.1262 * (h - 47.0)).exp()
    } else if h <= 71.0 {
        66.93887 * (270.65 / t).powf(-12.2011)
    } else {
        // standard_temperature already rejected anything above 84.85 km
        3.956420 * (214.65 / t).powf(-17.0816)
    };
    Ok(p)
}

/// Standard density (kg/m^3) from the ideal gas law.
pub fn standard_density(altitude: f64, units: AltitudeUnit) -> Result<f64> {
    let pressure = standard_pressure(altitude, units)?;
    let temperature = standard_temperature(geopotential(altitude, units))?;
    Ok(ideal_gas_density(pressure, temperature))
}

/// Speed of sound (m/s), `sqrt(gamma * P / rho)`.
pub fn speed_of_sound(altitude: f64, units: AltitudeUnit) -> Result<f64> {
    let density = standard_density(altitude, units)?;
    let pressure = standard_pressure(altitude, units)?;
    Ok((GAMMA * pressure / density).sqrt())
}

/// Dynamic viscosity of air (Pa·s) at a temperature in kelvin (Sutherland).
pub fn dynamic_viscosity(temperature: f64) -> f64 {
    SUTHERLAND_MU0 * (SUTHERLAND_T0 + SUTHERLAND_C) / (temperature + SUTHERLAND_C)
        * (temperature / SUTHERLAND_T0).powf(1.5)
}

/// Reynolds number `v * rho * L / mu`.
pub fn reynolds_number(velocity: f64, density: f64, reference_length: f64, temperature: f64) -> f64 {
    velocity * density * reference_length / dynamic_viscosity(temperature)
}

fn ideal_gas_density(pressure: f64, temperature: f64) -> f64 {
    MOLAR_MASS_AIR * pressure / (GAS_CONSTANT * temperature)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
