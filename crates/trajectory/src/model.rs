//! Collaborator boundaries of the integrator: the altitude model that drives
//! the vertical profile and the sink that receives trajectory samples.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Vertical flight profile, supplied by the caller.
///
/// The integrator knows nothing about ascent rates or burst physics; it only
/// asks "where is the payload now?". Implementations may keep internal state
/// (the trait takes `&mut self`) and signal the end of the flight by
/// returning `None`.
pub trait AltitudeModel {
    /// Altitude in metres at `elapsed` seconds since run start, or `None`
    /// once the flight has terminated.
    fn altitude_at(&mut self, elapsed: f64) -> Option<f64>;
}

/// One emitted trajectory position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectorySample {
    /// Degrees north.
    pub latitude: f64,
    /// Degrees east, in [0, 360].
    pub longitude: f64,
    /// Metres.
    pub altitude: f64,
    /// Timestamp of this position.
    pub time: DateTime<Utc>,
}

/// Receiver for emitted trajectory samples.
///
/// Called once every decimation interval and once, unconditionally, at run
/// end — including for degraded runs, which still deliver the partial
/// trajectory.
pub trait OutputSink {
    fn emit(&mut self, sample: &TrajectorySample);
}

/// Sink that collects every emitted sample in memory.
#[derive(Debug, Default)]
pub struct VecSink {
    samples: Vec<TrajectorySample>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<TrajectorySample> {
        self.samples
    }
}

impl OutputSink for VecSink {
    fn emit(&mut self, sample: &TrajectorySample) {
        self.samples.push(*sample);
    }
}
