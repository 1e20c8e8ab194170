//! Quadrilinear blending: three nested linear interpolations over the
//! latitude/longitude, pressure, and time axes.

use crate::axes::Variable;
use crate::horizontal::HorizontalBracket;
use crate::store::GridSource;
use crate::vertical::VerticalLevel;

#[inline]
pub(crate) fn lerp(left: f64, right: f64, lambda: f64) -> f64 {
    (1.0 - lambda) * left + lambda * right
}

/// Bilinear blend of the four corner samples at a fixed hour and pressure
/// level: south/north pairs along latitude, then the results along
/// longitude.
pub(crate) fn bilinear<S: GridSource>(
    source: &S,
    hour: usize,
    pressure: usize,
    variable: Variable,
    p: &HorizontalBracket,
) -> f64 {
    let sw = source.sample(hour, pressure, variable, p.lat_south, p.lon_west);
    let se = source.sample(hour, pressure, variable, p.lat_south, p.lon_east);
    let nw = source.sample(hour, pressure, variable, p.lat_south + 1, p.lon_west);
    let ne = source.sample(hour, pressure, variable, p.lat_south + 1, p.lon_east);

    let west = lerp(sw, nw, p.lat_lambda);
    let east = lerp(se, ne, p.lat_lambda);
    lerp(west, east, p.lon_lambda)
}

/// Blend between a level's lower and upper bilinear values, weighted by the
/// altitude's position between the bounding heights. A degenerate level
/// collapses to its single stored value with no blend.
pub(crate) fn vertical<S: GridSource>(
    source: &S,
    hour: usize,
    level: &VerticalLevel,
    altitude: f64,
    variable: Variable,
    p: &HorizontalBracket,
) -> f64 {
    match *level {
        VerticalLevel::Degenerate { index, .. } => bilinear(source, hour, index, variable, p),
        VerticalLevel::Bracket {
            below,
            height_below,
            height_above,
        } => {
            let t = (altitude - height_below) / (height_above - height_below);
            let lower = bilinear(source, hour, below, variable, p);
            let upper = bilinear(source, hour, below + 1, variable, p);
            lerp(lower, upper, t)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Value = a fixed linear function of the indices, so blends are exactly
    /// predictable.
    struct PlaneSource;

    impl GridSource for PlaneSource {
        fn sample(
            &self,
            hour: usize,
            pressure: usize,
            variable: Variable,
            lat: usize,
            lon: usize,
        ) -> f64 {
            hour as f64 * 10_000.0
                + pressure as f64 * 100.0
                + variable.index() as f64 * 7.0
                + lat as f64
                + lon as f64 * 0.001
        }
    }

    fn bracket(lat_lambda: f64, lon_lambda: f64) -> HorizontalBracket {
        HorizontalBracket {
            lat_south: 100,
            lat_lambda,
            lon_west: 40,
            lon_east: 41,
            lon_lambda,
        }
    }

    #[test]
    fn bilinear_at_node_returns_stored_value() {
        let p = bracket(0.0, 0.0);
        let got = bilinear(&PlaneSource, 2, 5, Variable::UWind, &p);
        assert_eq!(got, PlaneSource.sample(2, 5, Variable::UWind, 100, 40));
    }

    #[test]
    fn bilinear_is_exact_on_a_plane() {
        let p = bracket(0.25, 0.5);
        let got = bilinear(&PlaneSource, 0, 0, Variable::Height, &p);
        let want = 100.25 + 40.5 * 0.001;
        assert!((got - want).abs() < 1e-12);
    }

    #[test]
    fn vertical_blend_mixes_both_levels() {
        // Midway between levels 5 and 6 the blend must land halfway between
        // the two bilinear values, not collapse to the lower one.
        let p = bracket(0.0, 0.0);
        let level = VerticalLevel::Bracket {
            below: 5,
            height_below: 1000.0,
            height_above: 2000.0,
        };
        let got = vertical(&PlaneSource, 0, &level, 1500.0, Variable::UWind, &p);
        let lower = bilinear(&PlaneSource, 0, 5, Variable::UWind, &p);
        let upper = bilinear(&PlaneSource, 0, 6, Variable::UWind, &p);
        assert!(upper > lower);
        assert!((got - (lower + upper) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn vertical_blend_hits_endpoints_exactly() {
        let p = bracket(0.0, 0.0);
        let level = VerticalLevel::Bracket {
            below: 3,
            height_below: 500.0,
            height_above: 700.0,
        };
        let lower = bilinear(&PlaneSource, 1, 3, Variable::VWind, &p);
        let upper = bilinear(&PlaneSource, 1, 4, Variable::VWind, &p);
        assert_eq!(
            vertical(&PlaneSource, 1, &level, 500.0, Variable::VWind, &p),
            lower
        );
        assert_eq!(
            vertical(&PlaneSource, 1, &level, 700.0, Variable::VWind, &p),
            upper
        );
    }

    #[test]
    fn degenerate_level_collapses_to_single_value() {
        let p = bracket(0.0, 0.0);
        let level = VerticalLevel::Degenerate {
            index: 0,
            height: 110.0,
        };
        let got = vertical(&PlaneSource, 0, &level, -50.0, Variable::UWind, &p);
        assert_eq!(got, bilinear(&PlaneSource, 0, 0, Variable::UWind, &p));
    }
}
