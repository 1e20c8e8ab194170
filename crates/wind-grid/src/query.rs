//! Public wind query entry point.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::axes::{self, Variable};
use crate::blend;
use crate::error::QueryError;
use crate::horizontal::{self, lambda, HorizontalBracket};
use crate::store::GridSource;
use crate::vertical::{self, LevelHint, SearchCache, VerticalLevel};

/// An interpolated wind sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wind {
    /// Eastward component, m/s.
    pub u: f64,
    /// Northward component, m/s.
    pub v: f64,
    /// True when at least one vertical resolution fell outside the stored
    /// levels and was clamped to a boundary value.
    pub extrapolated: bool,
}

/// Stateful query handle over a grid source.
///
/// Holds the per-instance search cache, so `wind_at` takes `&mut self`;
/// concurrent queries need separate samplers, which may share one read-only
/// [`crate::Dataset`] through `Arc`.
pub struct WindSampler<S> {
    source: S,
    start_time: DateTime<Utc>,
    cache: SearchCache,
}

impl<S: GridSource> WindSampler<S> {
    /// Create a sampler over `source`, whose time axis starts at
    /// `start_time`.
    pub fn new(source: S, start_time: DateTime<Utc>) -> Self {
        Self {
            source,
            start_time,
            cache: SearchCache::default(),
        }
    }

    /// The timestamp of the first time slice.
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// The timestamp of the last time slice; queries at or past this fail.
    pub fn coverage_end(&self) -> DateTime<Utc> {
        let secs = axes::HOUR_OFFSETS[axes::HOURS - 1] * 3600.0;
        self.start_time + Duration::milliseconds((secs * 1000.0) as i64)
    }

    /// Number of times a vertical search has clamped to a boundary level
    /// since this sampler was created. Each clamp transition counts once,
    /// however many queries stay clamped afterwards.
    pub fn clamp_events(&self) -> u64 {
        self.cache.clamp_events
    }

    /// Borrow the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Interpolate the wind at a position and time.
    ///
    /// Fails with [`QueryError::OutOfTimeRange`] for timestamps before the
    /// first or at/after the last time slice, and [`QueryError::OutOfGrid`]
    /// for horizontal positions outside the grid. On failure no wind values
    /// are produced.
    pub fn wind_at(
        &mut self,
        latitude: f64,
        longitude: f64,
        altitude: f64,
        time: DateTime<Utc>,
    ) -> Result<Wind, QueryError> {
        let hours = (time - self.start_time).num_milliseconds() as f64 / 3_600_000.0;
        let hour_before = hour_bracket(hours).ok_or(QueryError::OutOfTimeRange)?;
        let hour_lambda = lambda(
            axes::HOUR_OFFSETS[hour_before],
            axes::HOUR_OFFSETS[hour_before + 1],
            hours,
        )
        .ok_or(QueryError::OutOfTimeRange)?;

        // One horizontal resolution shared by both hour endpoints and every
        // level probe.
        let point = horizontal::resolve(latitude, longitude)?;

        self.cache.rehome(hour_before);

        // The height profile evolves between time samples, so each endpoint
        // gets its own vertical resolution and its own hint.
        let level_before = resolve_tracked(
            &self.source,
            hour_before,
            altitude,
            &point,
            &mut self.cache.before,
            &mut self.cache.clamp_events,
        );
        let level_after = resolve_tracked(
            &self.source,
            hour_before + 1,
            altitude,
            &point,
            &mut self.cache.after,
            &mut self.cache.clamp_events,
        );

        let component = |variable: Variable| {
            let before = blend::vertical(
                &self.source,
                hour_before,
                &level_before,
                altitude,
                variable,
                &point,
            );
            let after = blend::vertical(
                &self.source,
                hour_before + 1,
                &level_after,
                altitude,
                variable,
                &point,
            );
            blend::lerp(before, after, hour_lambda)
        };

        let extrapolated = matches!(level_before, VerticalLevel::Degenerate { .. })
            || matches!(level_after, VerticalLevel::Degenerate { .. });

        Ok(Wind {
            u: component(Variable::UWind),
            v: component(Variable::VWind),
            extrapolated,
        })
    }
}

/// Resolve one hour endpoint's vertical bracket, emitting the edge-triggered
/// extrapolation diagnostic when the hint transitions into a clamped state.
fn resolve_tracked<S: GridSource>(
    source: &S,
    hour: usize,
    altitude: f64,
    point: &HorizontalBracket,
    hint: &mut LevelHint,
    clamp_events: &mut u64,
) -> VerticalLevel {
    let previous = *hint;
    let level = vertical::resolve_level(source, hour, altitude, point, hint);

    if hint.is_clamped() && previous != *hint {
        *clamp_events += 1;
        match *hint {
            LevelHint::BelowRange => warn!(
                altitude_m = altitude,
                clamp_level_mb = axes::PRESSURE_MB[0],
                "altitude below stored levels; clamping to the lowest"
            ),
            LevelHint::AboveRange => warn!(
                altitude_m = altitude,
                clamp_level_mb = axes::PRESSURE_MB[axes::PRESSURE_LEVELS - 1],
                "altitude above stored levels; clamping to the highest"
            ),
            _ => unreachable!(),
        }
    }

    level
}

/// Index of the time-axis interval containing `hours`, if any.
///
/// The axis may be non-uniform, so this searches rather than divides.
fn hour_bracket(hours: f64) -> Option<usize> {
    let last = axes::HOUR_OFFSETS[axes::HOURS - 1];
    if !(hours >= axes::HOUR_OFFSETS[0] && hours < last) {
        return None;
    }
    Some(axes::HOUR_OFFSETS.partition_point(|&h| h <= hours) - 1)
}
