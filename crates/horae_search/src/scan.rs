//! Coarse scan + bisection kernel shared by every search.
//!
//! A search supplies a scalar "signed error" function of time. The scanner
//! samples it on a fixed grid and reports brackets where the sign changes;
//! the refiner bisects one bracket down to the root.
//!
//! Angular error functions must be built with
//! [`horae_core::shortest_signed_angle`] and scanned with
//! [`Continuity::Angular`], which rejects the ±180° wrap jump so the antipode
//! of the target is never reported as a root.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::SearchError;

/// Default number of bisection halvings. 40 halvings of a 6-hour bracket
/// leave a residual well under a microsecond.
pub const DEFAULT_BISECTION_ITERATIONS: u32 = 40;

/// Slack when deciding whether the last grid step lands exactly on `end`.
const GRID_EPSILON: f64 = 1e-9;

/// Uniform sampling grid over `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanGrid {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl ScanGrid {
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        Self { start, end, step }
    }

    /// Reject empty or malformed grids before any evaluation.
    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(SearchError::InvalidRange("range bounds must be finite"));
        }
        if self.end < self.start {
            return Err(SearchError::InvalidRange("end must not precede start"));
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(SearchError::InvalidRange("step must be positive"));
        }
        Ok(())
    }

    /// Number of samples, including both endpoints.
    pub fn sample_count(&self) -> usize {
        let steps = ((self.end - self.start) / self.step - GRID_EPSILON).ceil();
        steps.max(0.0) as usize + 1
    }

    /// Time of sample `i`: `start + i * step`, clamped to `end`.
    ///
    /// Computed from the index rather than accumulated, so long scans do not
    /// drift.
    pub fn sample(&self, i: usize) -> f64 {
        (self.start + i as f64 * self.step).min(self.end)
    }

    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.sample_count()).map(|i| self.sample(i))
    }
}

/// How consecutive samples relate across a sign change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuity {
    /// Any sign change is a crossing.
    Plain,
    /// Values live in `(-180, 180]`; a jump of 180° or more between samples is
    /// the wrap point, not a root.
    Angular,
}

impl Continuity {
    fn is_genuine(self, f_a: f64, f_b: f64) -> bool {
        match self {
            Self::Plain => true,
            Self::Angular => (f_a - f_b).abs() < 180.0,
        }
    }
}

/// Interval `[t_a, t_b]` known to contain a root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub t_a: f64,
    pub f_a: f64,
    pub t_b: f64,
    pub f_b: f64,
}

impl Bracket {
    /// A bracket whose root is already exact at an endpoint.
    pub fn exact_root(&self) -> Option<f64> {
        if self.f_a == 0.0 {
            Some(self.t_a)
        } else if self.f_b == 0.0 {
            Some(self.t_b)
        } else {
            None
        }
    }

    pub fn midpoint(&self) -> f64 {
        0.5 * (self.t_a + self.t_b)
    }
}

/// Walk `grid` forward and collect sign-change brackets.
///
/// A bracket is emitted when consecutive samples have opposite sign, or when
/// the current sample is exactly zero. A zero first sample yields the
/// degenerate bracket `[start, start]`. `limit` stops the scan after that
/// many brackets.
pub fn scan_brackets<F>(
    f: &F,
    grid: &ScanGrid,
    continuity: Continuity,
    limit: Option<usize>,
) -> Result<Vec<Bracket>, SearchError>
where
    F: Fn(f64) -> Result<f64, SearchError>,
{
    grid.validate()?;

    let mut brackets = Vec::new();
    let n = grid.sample_count();
    let full = |b: &[Bracket]| limit.is_some_and(|l| b.len() >= l);

    let mut t_prev = grid.start;
    let mut f_prev = f(t_prev)?;
    if f_prev == 0.0 {
        brackets.push(Bracket {
            t_a: t_prev,
            f_a: 0.0,
            t_b: t_prev,
            f_b: 0.0,
        });
    }

    let mut taken = 1;
    for i in 1..n {
        if full(&brackets) {
            break;
        }
        let t_curr = grid.sample(i);
        let f_curr = f(t_curr)?;
        taken += 1;

        let crossing = f_curr == 0.0
            || (f_prev != 0.0 && f_prev * f_curr < 0.0 && continuity.is_genuine(f_prev, f_curr));
        if crossing {
            trace!(t_a = t_prev, t_b = t_curr, f_a = f_prev, f_b = f_curr, "bracket");
            brackets.push(Bracket {
                t_a: t_prev,
                f_a: f_prev,
                t_b: t_curr,
                f_b: f_curr,
            });
        }

        t_prev = t_curr;
        f_prev = f_curr;
    }

    debug!(samples = taken, brackets = brackets.len(), "scan complete");
    Ok(brackets)
}

/// Bisect `bracket` for `iterations` halvings.
///
/// An exact-zero endpoint or midpoint is returned immediately. Otherwise the
/// half whose endpoints still differ in sign is kept, and the final midpoint
/// is returned.
pub fn refine<F>(f: &F, bracket: &Bracket, iterations: u32) -> Result<f64, SearchError>
where
    F: Fn(f64) -> Result<f64, SearchError>,
{
    if let Some(t) = bracket.exact_root() {
        return Ok(t);
    }

    let mut t_a = bracket.t_a;
    let mut f_a = bracket.f_a;
    let mut t_b = bracket.t_b;

    for _ in 0..iterations {
        let t_mid = 0.5 * (t_a + t_b);
        let f_mid = f(t_mid)?;
        if f_mid == 0.0 {
            return Ok(t_mid);
        }
        if f_a * f_mid < 0.0 {
            t_b = t_mid;
        } else {
            t_a = t_mid;
            f_a = f_mid;
        }
    }

    Ok(0.5 * (t_a + t_b))
}

/// Scan `grid` and refine every bracket found.
pub fn find_roots<F>(
    f: &F,
    grid: &ScanGrid,
    continuity: Continuity,
    iterations: u32,
    limit: Option<usize>,
) -> Result<Vec<f64>, SearchError>
where
    F: Fn(f64) -> Result<f64, SearchError>,
{
    scan_brackets(f, grid, continuity, limit)?
        .iter()
        .map(|b| refine(f, b, iterations))
        .collect()
}
