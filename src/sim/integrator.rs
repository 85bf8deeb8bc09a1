use crate::error::{GolfError, Result};

// ---------------------------------------------------------------------------
// Adaptive Dormand-Prince 5(4) integrator with output on a fixed grid
// ---------------------------------------------------------------------------

/// A first-order ODE system `dy/dt = f(t, y)`.
pub trait OdeSystem<const N: usize> {
    fn rhs(&self, t: f64, y: &[f64; N]) -> Result<[f64; N]>;
}

/// Mixed absolute/relative error tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub rtol: f64,
    pub atol: f64,
}

impl Tolerances {
    pub fn new(rtol: f64, atol: f64) -> Self {
        Self { rtol, atol }
    }
}

impl Default for Tolerances {
    /// sqrt(machine epsilon), the customary default for LSODA-style solvers.
    fn default() -> Self {
        Self { rtol: 1.49012e-8, atol: 1.49012e-8 }
    }
}

/// Work counters for one integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub evaluations: usize,
    pub accepted: usize,
    pub rejected: usize,
}

pub const DEFAULT_MAX_STEPS: usize = 500;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

// Butcher tableau
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 5th-order weights (also row 7 of the tableau, FSAL)
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// 5th minus embedded 4th-order weights
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

/// Dormand-Prince 5(4) with FSAL and standard step-size control.
///
/// Each call to [`Dopri5::integrate`] lands exactly on every requested output
/// time by shortening the step that would cross it, so no dense-output
/// interpolation is involved.
#[derive(Debug, Clone)]
pub struct Dopri5 {
    tol: Tolerances,
    max_steps: usize,
    stats: Stats,
}

impl Dopri5 {
    pub fn new(tol: Tolerances) -> Self {
        Self { tol, max_steps: DEFAULT_MAX_STEPS, stats: Stats::default() }
    }

    /// Attempted steps allowed between two consecutive output times.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Integrate from `times[0]` and return the state at every time in
    /// `times` (ascending). The first row is `y0`.
    pub fn integrate<S, const N: usize>(
        &mut self,
        sys: &S,
        y0: &[f64; N],
        times: &[f64],
    ) -> Result<Vec<[f64; N]>>
    where
        S: OdeSystem<N>,
    {
        self.stats = Stats::default();
        let mut out = Vec::with_capacity(times.len());
        let Some(&t0) = times.first() else {
            return Ok(out);
        };
        if !y0.iter().all(|v| v.is_finite()) {
            return Err(GolfError::Integration { time: t0, reason: "non-finite initial state".into() });
        }
        out.push(*y0);
        if times.len() == 1 {
            return Ok(out);
        }

        let mut t = t0;
        let mut y = *y0;
        let mut k1 = self.eval(sys, t, &y)?;
        let mut h = self.initial_step(sys, t, &y, &k1)?;

        for &t_out in &times[1..] {
            let mut attempts = 0;
            while t < t_out {
                if attempts == self.max_steps {
                    return Err(GolfError::Integration {
                        time: t,
                        reason: format!("more than {} steps needed to reach t = {}", self.max_steps, t_out),
                    });
                }
                attempts += 1;

                let landing = t + h >= t_out;
                let hs = if landing { t_out - t } else { h };
                let (y_new, k7, err) = self.try_step(sys, t, &y, &k1, hs)?;

                if err <= 1.0 {
                    self.stats.accepted += 1;
                    t = if landing { t_out } else { t + hs };
                    y = y_new;
                    k1 = k7;
                    let factor = if err == 0.0 {
                        MAX_FACTOR
                    } else {
                        (SAFETY * err.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
                    };
                    h = hs * factor;
                } else {
                    self.stats.rejected += 1;
                    h = hs * (SAFETY * err.powf(-0.2)).max(MIN_FACTOR);
                    if h <= 1e-14 * t.abs().max(1.0) {
                        return Err(GolfError::Integration {
                            time: t,
                            reason: format!("step size underflow (h = {:e})", h),
                        });
                    }
                }
            }
            out.push(y);
        }

        Ok(out)
    }

    fn eval<S, const N: usize>(&mut self, sys: &S, t: f64, y: &[f64; N]) -> Result<[f64; N]>
    where
        S: OdeSystem<N>,
    {
        self.stats.evaluations += 1;
        let dy = sys.rhs(t, y)?;
        if dy.iter().all(|v| v.is_finite()) {
            Ok(dy)
        } else {
            Err(GolfError::Integration { time: t, reason: "non-finite derivative".into() })
        }
    }

    /// One trial step of size `h`: returns the 5th-order solution, the
    /// derivative there and the scaled RMS error estimate.
    fn try_step<S, const N: usize>(
        &mut self,
        sys: &S,
        t: f64,
        y: &[f64; N],
        k1: &[f64; N],
        h: f64,
    ) -> Result<([f64; N], [f64; N], f64)>
    where
        S: OdeSystem<N>,
    {
        let k2 = self.eval(sys, t + C2 * h, &stage(y, h, &[(A21, k1)]))?;
        let k3 = self.eval(sys, t + C3 * h, &stage(y, h, &[(A31, k1), (A32, &k2)]))?;
        let k4 = self.eval(sys, t + C4 * h, &stage(y, h, &[(A41, k1), (A42, &k2), (A43, &k3)]))?;
        let k5 = self.eval(
            sys,
            t + C5 * h,
            &stage(y, h, &[(A51, k1), (A52, &k2), (A53, &k3), (A54, &k4)]),
        )?;
        let k6 = self.eval(
            sys,
            t + h,
            &stage(y, h, &[(A61, k1), (A62, &k2), (A63, &k3), (A64, &k4), (A65, &k5)]),
        )?;
        let y_new = stage(y, h, &[(B1, k1), (B3, &k3), (B4, &k4), (B5, &k5), (B6, &k6)]);
        let k7 = self.eval(sys, t + h, &y_new)?;

        let mut sum = 0.0;
        for i in 0..N {
            let e = h * (E1 * k1[i] + E3 * k3[i] + E4 * k4[i] + E5 * k5[i] + E6 * k6[i] + E7 * k7[i]);
            let sc = self.tol.atol + self.tol.rtol * y[i].abs().max(y_new[i].abs());
            sum += (e / sc).powi(2);
        }
        let err = (sum / N as f64).sqrt();
        Ok((y_new, k7, err))
    }

    /// Starting step from the local scale of the solution and its derivative.
    fn initial_step<S, const N: usize>(&mut self, sys: &S, t: f64, y: &[f64; N], f0: &[f64; N]) -> Result<f64>
    where
        S: OdeSystem<N>,
    {
        let sc: Vec<f64> = y.iter().map(|v| self.tol.atol + self.tol.rtol * v.abs()).collect();
        let rms = |v: &mut dyn Iterator<Item = f64>| {
            let (sum, n) = v.fold((0.0, 0usize), |(s, n), x| (s + x * x, n + 1));
            (sum / n as f64).sqrt()
        };

        let d0 = rms(&mut y.iter().zip(&sc).map(|(v, s)| v / s));
        let d1 = rms(&mut f0.iter().zip(&sc).map(|(v, s)| v / s));
        let h0 = if d0 < 1e-5 || d1 < 1e-5 { 1e-6 } else { 0.01 * d0 / d1 };

        let y1 = stage(y, h0, &[(1.0, f0)]);
        let f1 = self.eval(sys, t + h0, &y1)?;
        let d2 = rms(&mut f1.iter().zip(f0).zip(&sc).map(|((a, b), s)| (a - b) / s)) / h0;

        let dmax = d1.max(d2);
        let h1 = if dmax <= 1e-15 { (h0 * 1e-3).max(1e-6) } else { (0.01 / dmax).powf(0.2) };
        Ok((100.0 * h0).min(h1))
    }
}

impl Default for Dopri5 {
    fn default() -> Self {
        Self::new(Tolerances::default())
    }
}

/// `y + h * sum(a_j * k_j)`
fn stage<const N: usize>(y: &[f64; N], h: f64, terms: &[(f64, &[f64; N])]) -> [f64; N] {
    let mut out = *y;
    for (i, o) in out.iter_mut().enumerate() {
        let incr: f64 = terms.iter().map(|(a, k)| a * k[i]).sum();
        *o += h * incr;
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
