//! Compiled-in axis tables and the logical shape of the dataset.
//!
//! The dataset file carries no header; its layout is fixed by convention and
//! described entirely by the constants here. Axis tables are produced
//! upstream together with the dataset itself and are shared, immutably, by
//! every open handle.

/// Number of time slices (3-hourly forecast steps out to +192 h).
pub const HOURS: usize = 65;

/// Number of pressure levels.
pub const PRESSURE_LEVELS: usize = 47;

/// Number of stored variables per grid point.
pub const VARIABLES: usize = 3;

/// Number of latitude rows (0.5° spacing, −90° to 90° inclusive).
pub const LATITUDES: usize = 361;

/// Number of longitude columns (0.5° spacing, 0° to 359.5°).
pub const LONGITUDES: usize = 720;

/// Total number of f64 samples in a dataset file.
pub const SAMPLES: usize = HOURS * PRESSURE_LEVELS * VARIABLES * LATITUDES * LONGITUDES;

/// Exact byte length a dataset file must have.
pub const DATASET_BYTES: u64 = (SAMPLES * std::mem::size_of::<f64>()) as u64;

/// A variable stored in the grid, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Geopotential height of the pressure level, metres.
    Height,
    /// Eastward wind component, m/s.
    UWind,
    /// Northward wind component, m/s.
    VWind,
}

impl Variable {
    /// Index of this variable along the third dataset axis.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Variable::Height => 0,
            Variable::UWind => 1,
            Variable::VWind => 2,
        }
    }
}

/// Time axis: offsets in hours since the dataset start time.
///
/// Uniformly 3-hourly for the current upstream model, but nothing in the
/// query engine assumes uniform spacing.
pub const HOUR_OFFSETS: [f64; HOURS] = [
    0.0, 3.0, 6.0, 9.0, 12.0, 15.0, 18.0, 21.0, 24.0, 27.0, 30.0, 33.0, 36.0,
    39.0, 42.0, 45.0, 48.0, 51.0, 54.0, 57.0, 60.0, 63.0, 66.0, 69.0, 72.0,
    75.0, 78.0, 81.0, 84.0, 87.0, 90.0, 93.0, 96.0, 99.0, 102.0, 105.0, 108.0,
    111.0, 114.0, 117.0, 120.0, 123.0, 126.0, 129.0, 132.0, 135.0, 138.0,
    141.0, 144.0, 147.0, 150.0, 153.0, 156.0, 159.0, 162.0, 165.0, 168.0,
    171.0, 174.0, 177.0, 180.0, 183.0, 186.0, 189.0, 192.0,
];

/// Pressure axis in millibars.
///
/// Ordered surface-first so that the stored geopotential height (variable 0)
/// is strictly increasing with index at any fixed hour and location.
pub const PRESSURE_MB: [f64; PRESSURE_LEVELS] = [
    1000.0, 975.0, 950.0, 925.0, 900.0, 875.0, 850.0, 825.0, 800.0, 775.0,
    750.0, 725.0, 700.0, 675.0, 650.0, 625.0, 600.0, 575.0, 550.0, 525.0,
    500.0, 475.0, 450.0, 425.0, 400.0, 375.0, 350.0, 325.0, 300.0, 275.0,
    250.0, 225.0, 200.0, 175.0, 150.0, 125.0, 100.0, 70.0, 50.0, 40.0, 30.0,
    20.0, 15.0, 10.0, 7.0, 5.0, 3.0,
];

/// Latitude of a grid row, degrees north.
#[inline]
pub fn latitude(index: usize) -> f64 {
    -90.0 + index as f64 * 0.5
}

/// Longitude of a grid column, degrees east.
#[inline]
pub fn longitude(index: usize) -> f64 {
    index as f64 * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_matches_byte_length() {
        assert_eq!(SAMPLES, 65 * 47 * 3 * 361 * 720);
        assert_eq!(DATASET_BYTES, SAMPLES as u64 * 8);
    }

    #[test]
    fn hour_offsets_ascend_from_zero() {
        assert_eq!(HOUR_OFFSETS[0], 0.0);
        assert!(HOUR_OFFSETS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn pressure_levels_descend() {
        // Surface-first ordering: pressure falls, height rises.
        assert!(PRESSURE_MB.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(PRESSURE_MB.len(), PRESSURE_LEVELS);
    }

    #[test]
    fn axis_endpoints() {
        assert_eq!(latitude(0), -90.0);
        assert_eq!(latitude(LATITUDES - 1), 90.0);
        assert_eq!(longitude(0), 0.0);
        assert_eq!(longitude(LONGITUDES - 1), 359.5);
    }
}
