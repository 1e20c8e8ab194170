//! The forward-Euler stepping loop.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, info};

use wind_grid::{GridSource, QueryError, WindSampler};

use crate::model::{AltitudeModel, OutputSink, TrajectorySample};
use crate::{wrap_latitude, wrap_longitude};

/// Mean Earth radius, metres.
const EARTH_RADIUS_M: f64 = 6_371_009.0;

/// Stepping parameters.
#[derive(Debug, Clone)]
pub struct IntegratorConfig {
    /// Timestep in seconds.
    pub timestep: f64,
    /// Emit one sample to the sink every this many steps.
    pub decimation: u32,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0,
            decimation: 25,
        }
    }
}

/// Initial payload state.
#[derive(Debug, Clone, Copy)]
pub struct Launch {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub time: DateTime<Utc>,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The altitude model signalled the end of the flight. Full success.
    Landed,
    /// The next step would leave the dataset's temporal coverage. The
    /// trajectory so far was emitted; degraded success.
    DatasetExhausted,
    /// A wind lookup failed. The trajectory so far was emitted; degraded
    /// success.
    WindUnavailable(QueryError),
}

impl Termination {
    /// Whether the run completed its full flight profile.
    pub fn is_success(self) -> bool {
        matches!(self, Termination::Landed)
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub termination: Termination,
    /// Completed integration steps.
    pub steps: u64,
    /// Samples delivered to the sink, final emission included.
    pub emitted: u64,
    /// The last position, as emitted at run end.
    pub final_sample: TrajectorySample,
}

/// Integrate a trajectory from `launch` until the altitude model terminates
/// or the dataset runs out under the payload.
///
/// Whatever the outcome, the sink receives the partial trajectory and one
/// final unconditional sample; only [`Termination::Landed`] counts as full
/// success.
pub fn run<S, A, K>(
    sampler: &mut WindSampler<S>,
    altitude_model: &mut A,
    sink: &mut K,
    launch: Launch,
    config: &IntegratorConfig,
) -> RunReport
where
    S: GridSource,
    A: AltitudeModel + ?Sized,
    K: OutputSink + ?Sized,
{
    let mut latitude = launch.latitude;
    let mut longitude = launch.longitude;
    let mut altitude = launch.altitude;
    let mut time = launch.time;

    let coverage_end = sampler.coverage_end();
    let step = Duration::milliseconds((config.timestep * 1000.0).round() as i64);

    info!(
        latitude,
        longitude,
        altitude,
        time = %time,
        "starting trajectory run"
    );
    debug!(
        timestep_s = config.timestep,
        decimation = config.decimation,
        coverage_end = %coverage_end,
        "integrator configuration"
    );

    let mut steps: u64 = 0;
    let mut emitted: u64 = 0;
    let mut log_counter: u32 = 0;

    let termination = loop {
        let elapsed = (time - launch.time).num_milliseconds() as f64 / 1000.0;
        match altitude_model.altitude_at(elapsed) {
            Some(alt) => altitude = alt,
            None => break Termination::Landed,
        }

        latitude = wrap_latitude(latitude);
        longitude = wrap_longitude(longitude);

        if time >= coverage_end {
            error!(time = %time, "prediction reached the end of the dataset's time axis");
            break Termination::DatasetExhausted;
        }

        let wind = match sampler.wind_at(latitude, longitude, altitude, time) {
            Ok(wind) => wind,
            Err(err) => {
                error!(
                    latitude,
                    longitude,
                    altitude,
                    time = %time,
                    error = %err,
                    "wind lookup failed; emitting partial trajectory"
                );
                break Termination::WindUnavailable(err);
            }
        };

        let (m_per_deg_lat, m_per_deg_lon) = tangent_frame(latitude, altitude);
        latitude += wind.v * config.timestep / m_per_deg_lat;
        longitude += wind.u * config.timestep / m_per_deg_lon;
        steps += 1;

        if log_counter == config.decimation {
            sink.emit(&TrajectorySample {
                latitude,
                longitude,
                altitude,
                time,
            });
            emitted += 1;
            log_counter = 0;
        }
        log_counter += 1;

        time = time + step;
    };

    // One unconditional emission so the trajectory always ends at the final
    // state, decimation notwithstanding.
    let final_sample = TrajectorySample {
        latitude,
        longitude,
        altitude,
        time,
    };
    sink.emit(&final_sample);
    emitted += 1;

    info!(
        ?termination,
        steps,
        emitted,
        latitude = final_sample.latitude,
        longitude = final_sample.longitude,
        "trajectory run finished"
    );

    RunReport {
        termination,
        steps,
        emitted,
        final_sample,
    }
}

/// Metres spanned by one degree of latitude and of longitude at a position.
///
/// Local flat-Earth tangent-plane approximation: the latitude scale is the
/// meridian arc at radius (Earth + altitude); the longitude scale shrinks
/// with the sine of the colatitude as meridians converge toward the poles.
fn tangent_frame(latitude: f64, altitude: f64) -> (f64, f64) {
    let colatitude = (90.0 - latitude).to_radians();
    let r = EARTH_RADIUS_M + altitude;
    let m_per_deg = std::f64::consts::TAU * r / 360.0;
    (m_per_deg, m_per_deg * colatitude.sin())
}
