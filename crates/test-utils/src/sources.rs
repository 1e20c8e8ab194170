//! Synthetic grid sources with predictable, verifiable value patterns.
//!
//! A [`SyntheticSource`] computes samples from a closure at the full logical
//! dataset shape and counts every read, so tests can both check blended
//! values exactly and observe how many samples a code path touched (the way
//! the search-cache tests detect a full search versus a hint hit).

use std::cell::Cell;

use wind_grid::{GridSource, Variable};

/// A [`GridSource`] backed by a value function instead of a file.
pub struct SyntheticSource<F> {
    value: F,
    reads: Cell<u64>,
}

impl<F> SyntheticSource<F>
where
    F: Fn(usize, usize, Variable, usize, usize) -> f64,
{
    /// Wrap a value function `(hour, pressure, variable, lat, lon) -> f64`.
    pub fn new(value: F) -> Self {
        Self {
            value,
            reads: Cell::new(0),
        }
    }

    /// Number of samples read since creation or the last reset.
    pub fn reads(&self) -> u64 {
        self.reads.get()
    }

    /// Reset the read counter.
    pub fn reset_reads(&self) {
        self.reads.set(0);
    }
}

impl<F> GridSource for SyntheticSource<F>
where
    F: Fn(usize, usize, Variable, usize, usize) -> f64,
{
    fn sample(
        &self,
        hour: usize,
        pressure: usize,
        variable: Variable,
        lat: usize,
        lon: usize,
    ) -> f64 {
        self.reads.set(self.reads.get() + 1);
        (self.value)(hour, pressure, variable, lat, lon)
    }
}

/// An atmosphere with evenly spaced height levels and uniform wind.
///
/// Heights are `base + spacing * level`, identical everywhere and at every
/// hour; the wind is `(u, v)` at every point. Useful wherever a test needs
/// valid vertical structure without caring about gradients.
pub fn layered_atmosphere(
    base: f64,
    spacing: f64,
    u: f64,
    v: f64,
) -> SyntheticSource<impl Fn(usize, usize, Variable, usize, usize) -> f64> {
    SyntheticSource::new(move |_hour, pressure, variable, _lat, _lon| match variable {
        Variable::Height => base + spacing * pressure as f64,
        Variable::UWind => u,
        Variable::VWind => v,
    })
}

/// Like [`layered_atmosphere`], but the wind components scale with the hour
/// index (`u = hour * u_per_hour`, `v = hour * v_per_hour`), so tests can
/// tell exactly how the temporal blend weighted the two endpoints.
pub fn hour_scaled_wind(
    base: f64,
    spacing: f64,
    u_per_hour: f64,
    v_per_hour: f64,
) -> SyntheticSource<impl Fn(usize, usize, Variable, usize, usize) -> f64> {
    SyntheticSource::new(move |hour, pressure, variable, _lat, _lon| match variable {
        Variable::Height => base + spacing * pressure as f64,
        Variable::UWind => hour as f64 * u_per_hour,
        Variable::VWind => hour as f64 * v_per_hour,
    })
}
