use crate::error::{GolfError, Result};

/// Uniform output times `t_init, t_init + dt, ...` strictly below `t_stop`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    t_init: f64,
    dt: f64,
    len: usize,
}

impl TimeGrid {
    pub fn new(t_init: f64, t_stop: f64, dt: f64) -> Result<Self> {
        if !(t_init.is_finite() && t_stop.is_finite() && dt.is_finite()) {
            return Err(GolfError::Configuration("time grid values must be finite".into()));
        }
        if dt <= 0.0 {
            return Err(GolfError::Configuration(format!("dt must be positive, got {}", dt)));
        }
        if t_stop <= t_init {
            return Err(GolfError::Configuration(format!(
                "t_stop ({}) must be greater than t_init ({})",
                t_stop, t_init
            )));
        }
        let len = ((t_stop - t_init) / dt).ceil() as usize;
        Ok(Self { t_init, dt, len })
    }

    pub fn t_init(&self) -> f64 {
        self.t_init
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn time(&self, i: usize) -> f64 {
        self.t_init + i as f64 * self.dt
    }

    pub fn times(&self) -> Vec<f64> {
        (0..self.len).map(|i| self.time(i)).collect()
    }
}
