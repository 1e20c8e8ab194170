//! Shared test utilities for the drift-predictor workspace.
//!
//! Real dataset files are ~19 GB, which no test suite should require. The
//! helpers here substitute the two things tests actually need: synthetic
//! [`wind_grid::GridSource`] implementations computed on the fly at full
//! logical shape, and sized scratch files for exercising the open path.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod sources;

// Re-export commonly used items at the crate root
pub use fixtures::{exact_size_dataset_file, sized_file};
pub use sources::{hour_scaled_wind, layered_atmosphere, SyntheticSource};

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}
