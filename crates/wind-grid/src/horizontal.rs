//! Horizontal (latitude/longitude) bracket resolution.
//!
//! Latitude maps to a row bracket by direct scaling; longitude needs three
//! regimes because the grid covers [0°, 359.5°] while real queries can land
//! exactly on 360° or a hair under 0° after wraparound normalization.

use crate::axes;
use crate::error::QueryError;

/// Tolerance for fractional positions slightly outside their bracket.
pub(crate) const LAMBDA_TOLERANCE: f64 = 1e-7;

/// Fractional position of `value` between `left` and `right`.
///
/// Positions outside [0, 1] by no more than [`LAMBDA_TOLERANCE`] clamp to
/// the nearest end; anything further out is rejected.
pub(crate) fn lambda(left: f64, right: f64, value: f64) -> Option<f64> {
    let l = (value - left) / (right - left);
    if l < 0.0 {
        if l > -LAMBDA_TOLERANCE {
            Some(0.0)
        } else {
            None
        }
    } else if l > 1.0 {
        if l < 1.0 + LAMBDA_TOLERANCE {
            Some(1.0)
        } else {
            None
        }
    } else if l.is_nan() {
        None
    } else {
        Some(l)
    }
}

/// A bilinear bracket: bounding row/column indices plus the fractional
/// position of the query point inside the cell. Derived per query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalBracket {
    /// Index of the row just south of the point (north row is `+ 1`).
    pub lat_south: usize,
    /// Fractional position between the south and north rows.
    pub lat_lambda: f64,
    /// Index of the column just west of the point.
    pub lon_west: usize,
    /// Index of the column just east; column 0 when wrapping the seam.
    pub lon_east: usize,
    /// Fractional position between the west and east columns.
    pub lon_lambda: f64,
}

/// Resolve a latitude/longitude pair to its bilinear bracket.
pub fn resolve(lat: f64, lon: f64) -> Result<HorizontalBracket, QueryError> {
    let south = (lat * 2.0 + 180.0).floor();
    if !(0.0..=(axes::LATITUDES - 2) as f64).contains(&south) {
        return Err(QueryError::OutOfGrid);
    }
    let lat_south = south as usize;
    let lat_lambda = lambda(
        axes::latitude(lat_south),
        axes::latitude(lat_south + 1),
        lat,
    )
    .ok_or(QueryError::OutOfGrid)?;

    let last = axes::LONGITUDES - 1;
    let (lon_west, lon_east, lon_lambda) = if lon > axes::longitude(last)
        && lon < 360.0 + LAMBDA_TOLERANCE
    {
        // Seam wrap: the cell between the last column and column 0,
        // referencing the east value as its axis value + 360.
        let l = lambda(axes::longitude(last), axes::longitude(0) + 360.0, lon)
            .ok_or(QueryError::OutOfGrid)?;
        (last, 0, l)
    } else if lon > -LAMBDA_TOLERANCE && lon < 0.0 {
        // Just under zero: clamps into the first cell.
        let l = lambda(axes::longitude(0), axes::longitude(1), lon).ok_or(QueryError::OutOfGrid)?;
        (0, 1, l)
    } else {
        let west = (lon * 2.0).floor();
        if !(0.0..=(axes::LONGITUDES - 2) as f64).contains(&west) {
            return Err(QueryError::OutOfGrid);
        }
        let west = west as usize;
        let l = lambda(axes::longitude(west), axes::longitude(west + 1), lon)
            .ok_or(QueryError::OutOfGrid)?;
        (west, west + 1, l)
    };

    Ok(HorizontalBracket {
        lat_south,
        lat_lambda,
        lon_west,
        lon_east,
        lon_lambda,
    })
}
