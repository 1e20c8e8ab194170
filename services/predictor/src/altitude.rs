//! Standard balloon flight profile: constant-rate ascent to burst, then a
//! descent that slows as the air thickens toward sea level.

use trajectory::AltitudeModel;

/// Approximate atmospheric density scale height, metres.
const SCALE_HEIGHT_M: f64 = 8_000.0;

/// Ascent/burst/descent altitude model.
///
/// Ascent is linear at `ascent_rate` from the launch altitude to the burst
/// altitude. Descent assumes the payload falls at its terminal velocity,
/// which scales with `exp(h / 2H)` for an exponential density profile, so
/// `descent_rate` is the touchdown (sea-level) rate. The model integrates
/// the descent incrementally across calls; elapsed times must not go
/// backwards.
#[derive(Debug)]
pub struct AscentProfile {
    launch_altitude: f64,
    ascent_rate: f64,
    burst_altitude: f64,
    descent_rate: f64,
    /// Descent integration state: (last elapsed, altitude then).
    descent: Option<(f64, f64)>,
}

impl AscentProfile {
    pub fn new(
        launch_altitude: f64,
        ascent_rate: f64,
        burst_altitude: f64,
        descent_rate: f64,
    ) -> Self {
        Self {
            launch_altitude,
            ascent_rate,
            burst_altitude,
            descent_rate,
            descent: None,
        }
    }

    fn burst_time(&self) -> f64 {
        (self.burst_altitude - self.launch_altitude) / self.ascent_rate
    }
}

impl AltitudeModel for AscentProfile {
    fn altitude_at(&mut self, elapsed: f64) -> Option<f64> {
        let burst_time = self.burst_time();
        if elapsed <= burst_time {
            return Some(self.launch_altitude + self.ascent_rate * elapsed);
        }

        let (mut t, mut altitude) = self.descent.unwrap_or((burst_time, self.burst_altitude));
        while t < elapsed && altitude > 0.0 {
            let dt = (elapsed - t).min(1.0);
            let rate = self.descent_rate * (altitude / (2.0 * SCALE_HEIGHT_M)).exp();
            altitude -= rate * dt;
            t += dt;
        }
        self.descent = Some((elapsed, altitude));

        (altitude > 0.0).then_some(altitude)
    }
}
