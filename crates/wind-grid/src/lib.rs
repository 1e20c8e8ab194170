//! Wind-field query engine over a fixed-shape gridded forecast dataset.
//!
//! This crate answers one question: "what is the wind here, now?". The data
//! behind the answer is a memory-mapped binary array of f64 samples shaped
//! `[hour][pressure level][variable][latitude][longitude]` (see [`axes`]),
//! where variable 0 is geopotential height and variables 1/2 are the eastward
//! and northward wind components.
//!
//! # Architecture
//!
//! ```text
//! WindSampler::wind_at(lat, lon, alt, time)
//!      │
//!      ├─► hour bracket        (search over the time axis)
//!      ├─► horizontal bracket  (direct scaling + wraparound regimes)
//!      ├─► vertical bracket    (cached hint, bisection fallback)
//!      │         │
//!      │         └─► bilinear height reads at candidate levels
//!      │
//!      └─► quadrilinear blend: lat/lon → pressure → time
//!               │
//!               ▼
//!          Wind { u, v, extrapolated }
//! ```
//!
//! The vertical axis is the interesting one: pressure levels map to geometric
//! heights that vary with location and time, so every altitude lookup first
//! resolves the height column at the query point. A per-sampler hint makes
//! the common case (consecutive, spatially close queries) O(1); bisection
//! over the monotone height column covers the rest.
//!
//! # Example
//!
//! ```ignore
//! use chrono::Utc;
//! use wind_grid::{Dataset, WindSampler};
//!
//! let dataset = Dataset::open("/data/wind/2024062300.bin")?;
//! let mut sampler = WindSampler::new(dataset, dataset_start_time);
//! let wind = sampler.wind_at(52.2135, 0.0964, 12_000.0, Utc::now())?;
//! println!("u = {} m/s, v = {} m/s", wind.u, wind.v);
//! ```

pub mod axes;
mod blend;
pub mod error;
pub mod horizontal;
mod query;
pub mod store;
pub mod vertical;

pub use axes::Variable;
pub use error::{DatasetError, QueryError};
pub use horizontal::HorizontalBracket;
pub use query::{Wind, WindSampler};
pub use store::{Dataset, GridSource};
pub use vertical::{LevelHint, VerticalLevel};
