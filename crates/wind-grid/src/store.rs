//! Memory-mapped dataset storage.
//!
//! A [`Dataset`] owns a read-only mapping of the flat binary sample file.
//! The mapping is created once at open, may be shared by any number of
//! readers (wrap the handle in `Arc` and hand each thread its own
//! [`crate::WindSampler`]), and is unmapped exactly once when the last handle
//! drops.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use memmap2::Mmap;
use tracing::info;

use crate::axes::{self, Variable};
use crate::error::DatasetError;

/// Raw indexed access to the five-axis sample grid.
///
/// Implementors expose the logical shape `[hour][pressure][variable]
/// [latitude][longitude]` described in [`crate::axes`]. This is the
/// innermost, highest-frequency read path of the engine: bounds are the
/// caller's responsibility and implementations should not branch on them.
/// Tests substitute synthetic in-memory sources for the mapped file.
pub trait GridSource {
    /// Read one sample. Indices must lie within the dataset shape.
    fn sample(
        &self,
        hour: usize,
        pressure: usize,
        variable: Variable,
        lat: usize,
        lon: usize,
    ) -> f64;
}

impl<S: GridSource + ?Sized> GridSource for &S {
    #[inline]
    fn sample(
        &self,
        hour: usize,
        pressure: usize,
        variable: Variable,
        lat: usize,
        lon: usize,
    ) -> f64 {
        (**self).sample(hour, pressure, variable, lat, lon)
    }
}

impl<S: GridSource + ?Sized> GridSource for Arc<S> {
    #[inline]
    fn sample(
        &self,
        hour: usize,
        pressure: usize,
        variable: Variable,
        lat: usize,
        lon: usize,
    ) -> f64 {
        (**self).sample(hour, pressure, variable, lat, lon)
    }
}

/// A read-only, memory-mapped wind dataset file.
#[derive(Debug)]
pub struct Dataset {
    map: Mmap,
}

impl Dataset {
    /// Open and map a dataset file.
    ///
    /// The file's byte length must equal [`axes::DATASET_BYTES`] exactly;
    /// any mismatch is rejected before mapping.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                DatasetError::NotFound(path.to_path_buf())
            } else {
                DatasetError::Io(err)
            }
        })?;

        let actual = file.metadata()?.len();
        if actual != axes::DATASET_BYTES {
            return Err(DatasetError::SizeMismatch {
                expected: axes::DATASET_BYTES,
                actual,
            });
        }

        // Safety: the mapping is read-only and the file is produced once by
        // the upstream dataset generator, then never rewritten in place.
        let map = unsafe { Mmap::map(&file) }.map_err(DatasetError::MapFailed)?;

        info!(path = %path.display(), bytes = actual, "opened wind dataset");

        Ok(Self { map })
    }

    /// Bounds-checked sample read for use at API boundaries.
    pub fn sample_checked(
        &self,
        hour: usize,
        pressure: usize,
        variable: Variable,
        lat: usize,
        lon: usize,
    ) -> Option<f64> {
        if hour >= axes::HOURS
            || pressure >= axes::PRESSURE_LEVELS
            || lat >= axes::LATITUDES
            || lon >= axes::LONGITUDES
        {
            return None;
        }
        Some(self.sample(hour, pressure, variable, lat, lon))
    }

    /// Row-major linear index for the five logical axes.
    #[inline]
    fn flat_index(hour: usize, pressure: usize, variable: usize, lat: usize, lon: usize) -> usize {
        (((hour * axes::PRESSURE_LEVELS + pressure) * axes::VARIABLES + variable)
            * axes::LATITUDES
            + lat)
            * axes::LONGITUDES
            + lon
    }
}

impl GridSource for Dataset {
    #[inline]
    fn sample(
        &self,
        hour: usize,
        pressure: usize,
        variable: Variable,
        lat: usize,
        lon: usize,
    ) -> f64 {
        let index = Self::flat_index(hour, pressure, variable.index(), lat, lon);
        debug_assert!(index < axes::SAMPLES);
        // Safety: index is within the mapped region, which is exactly
        // SAMPLES f64 values long (checked at open).
        unsafe {
            let ptr = self.map.as_ptr().add(index * std::mem::size_of::<f64>()) as *const f64;
            ptr.read_unaligned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_rejects_missing_file() {
        let err = Dataset::open("/nonexistent/wind.bin").unwrap_err();
        assert!(matches!(err, DatasetError::NotFound(_)));
    }

    #[test]
    fn open_rejects_wrong_size() {
        let file = test_utils::sized_file(1024);
        let err = Dataset::open(file.path()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::SizeMismatch { actual: 1024, .. }
        ));
    }

    #[test]
    fn open_maps_exact_size_file() {
        // A sparse file of the right length reads as zeros without
        // allocating the full dataset on disk.
        let file = test_utils::exact_size_dataset_file();
        let dataset = Dataset::open(file.path()).unwrap();
        assert_eq!(dataset.sample(0, 0, Variable::Height, 0, 0), 0.0);
        assert_eq!(
            dataset.sample(
                axes::HOURS - 1,
                axes::PRESSURE_LEVELS - 1,
                Variable::VWind,
                axes::LATITUDES - 1,
                axes::LONGITUDES - 1,
            ),
            0.0
        );
    }

    #[test]
    fn checked_read_rejects_out_of_shape_indices() {
        let file = test_utils::exact_size_dataset_file();
        let dataset = Dataset::open(file.path()).unwrap();

        assert!(dataset
            .sample_checked(0, 0, Variable::Height, 0, 0)
            .is_some());
        assert!(dataset
            .sample_checked(axes::HOURS, 0, Variable::Height, 0, 0)
            .is_none());
        assert!(dataset
            .sample_checked(0, 0, Variable::Height, axes::LATITUDES, 0)
            .is_none());
    }

    #[test]
    fn flat_index_is_row_major() {
        assert_eq!(Dataset::flat_index(0, 0, 0, 0, 0), 0);
        assert_eq!(Dataset::flat_index(0, 0, 0, 0, 1), 1);
        assert_eq!(Dataset::flat_index(0, 0, 0, 1, 0), axes::LONGITUDES);
        assert_eq!(
            Dataset::flat_index(1, 0, 0, 0, 0),
            axes::PRESSURE_LEVELS * axes::VARIABLES * axes::LATITUDES * axes::LONGITUDES
        );
    }
}
