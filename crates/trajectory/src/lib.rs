//! Drift trajectory integration over the wind-grid query engine.
//!
//! The integrator is a state machine over discrete timesteps: each step asks
//! an external altitude model where the payload is vertically, queries the
//! wind there, and advances latitude/longitude with an explicit forward
//! Euler update in a local flat-Earth tangent frame. Trajectory samples go
//! to an external output sink at a decimation interval, plus once at run
//! end.
//!
//! Both collaborators are traits ([`AltitudeModel`], [`OutputSink`]); the
//! engine neither models flight dynamics nor owns the output format.

mod integrator;
mod model;

pub use integrator::{run, IntegratorConfig, Launch, RunReport, Termination};
pub use model::{AltitudeModel, OutputSink, TrajectorySample, VecSink};

/// Wrap a latitude into [−90, 90] by repeated wraparound.
///
/// Handles a previous step having crossed a pole.
pub fn wrap_latitude(mut lat: f64) -> f64 {
    while lat < -90.0 {
        lat += 180.0;
    }
    while lat > 90.0 {
        lat -= 180.0;
    }
    lat
}

/// Wrap a longitude into [0, 360] by repeated wraparound.
///
/// Handles a previous step having crossed the antimeridian in either
/// direction; the grid's seam regime accepts 360 itself.
pub fn wrap_longitude(mut lon: f64) -> f64 {
    while lon < 0.0 {
        lon += 360.0;
    }
    while lon > 360.0 {
        lon -= 360.0;
    }
    lon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latitude_wraps_into_range() {
        assert_eq!(wrap_latitude(45.0), 45.0);
        assert_eq!(wrap_latitude(-90.0), -90.0);
        assert_eq!(wrap_latitude(91.0), -89.0);
        assert_eq!(wrap_latitude(-91.5), 88.5);
    }

    #[test]
    fn longitude_wraps_into_range() {
        assert_eq!(wrap_longitude(10.0), 10.0);
        assert!((wrap_longitude(-0.1) - 359.9).abs() < 1e-12);
        assert_eq!(wrap_longitude(360.5), 0.5);
        assert_eq!(wrap_longitude(-720.5), 359.5);
    }
}
