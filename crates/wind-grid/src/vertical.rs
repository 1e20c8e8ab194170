//! Vertical (pressure-level) bracket resolution.
//!
//! Pressure levels map to geometric heights that depend on location and
//! time, so finding "which levels bound this altitude" means searching the
//! height column interpolated at the query point. The column is strictly
//! increasing with level index, which makes bisection correct; a per-sampler
//! hint makes the expected case — consecutive queries from a smoothly
//! ascending or descending trajectory — constant time.

use crate::axes::{self, Variable};
use crate::blend;
use crate::horizontal::HorizontalBracket;
use crate::store::GridSource;

/// Cached pressure-bracket hint for one hour endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelHint {
    /// No usable information from a previous query.
    #[default]
    Unknown,
    /// The last query sat below the lowest stored level.
    BelowRange,
    /// The last query sat above the highest stored level.
    AboveRange,
    /// The last query resolved to the bracket starting at this index.
    Bracket(usize),
}

impl LevelHint {
    /// Whether this hint records extrapolation outside vertical coverage.
    pub fn is_clamped(self) -> bool {
        matches!(self, LevelHint::BelowRange | LevelHint::AboveRange)
    }
}

/// A resolved vertical position within the pressure axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerticalLevel {
    /// The altitude lies between levels `below` and `below + 1`.
    Bracket {
        below: usize,
        height_below: f64,
        height_above: f64,
    },
    /// The altitude lies outside vertical coverage, collapsed to the single
    /// boundary level at `index` (0 or the topmost level).
    Degenerate { index: usize, height: f64 },
}

/// Per-sampler search cache: the hour bracket the hints were computed for,
/// one hint per hour endpoint, and a count of clamp transitions for
/// observability. This is the only mutable state in the query engine.
#[derive(Debug, Clone, Default)]
pub(crate) struct SearchCache {
    pub hour_index: Option<usize>,
    pub before: LevelHint,
    pub after: LevelHint,
    pub clamp_events: u64,
}

impl SearchCache {
    /// Invalidate both hints if the hour bracket has moved; the height
    /// profile differs between time samples, so stale hints must not be
    /// trusted across them.
    pub fn rehome(&mut self, hour_index: usize) {
        if self.hour_index != Some(hour_index) {
            self.hour_index = Some(hour_index);
            self.before = LevelHint::Unknown;
            self.after = LevelHint::Unknown;
        }
    }
}

/// Find the pressure bracket containing `target` at one hour endpoint.
///
/// `hour` is the actual time index to read (the caller applies the +1 for
/// the hour-after endpoint). Updates `hint` to the resolved bracket, or to a
/// clamped state when the target falls outside vertical coverage.
pub(crate) fn resolve_level<S: GridSource>(
    source: &S,
    hour: usize,
    target: f64,
    point: &HorizontalBracket,
    hint: &mut LevelHint,
) -> VerticalLevel {
    let len = axes::PRESSURE_LEVELS;
    let column = |index: usize| blend::bilinear(source, hour, index, Variable::Height, point);

    // Quick paths from the cache: clamped hints re-check only their
    // boundary; a bracket hint that still contains the target returns
    // immediately.
    let window_hint = match *hint {
        LevelHint::Unknown => None,
        LevelHint::BelowRange => {
            let lowest = column(0);
            if target < lowest {
                return VerticalLevel::Degenerate {
                    index: 0,
                    height: lowest,
                };
            }
            Some(0)
        }
        LevelHint::AboveRange => {
            let highest = column(len - 1);
            if target > highest {
                return VerticalLevel::Degenerate {
                    index: len - 1,
                    height: highest,
                };
            }
            Some(len - 2)
        }
        LevelHint::Bracket(i) => Some(i),
    };

    // Establish a window [below, above] whose interpolated heights are known
    // to bound the target, clamping to a degenerate level when the target is
    // outside coverage entirely.
    let (mut below, mut above, mut height_below, mut height_above) = match window_hint {
        None => {
            let lowest = column(0);
            if target < lowest {
                *hint = LevelHint::BelowRange;
                return VerticalLevel::Degenerate {
                    index: 0,
                    height: lowest,
                };
            }
            let highest = column(len - 1);
            if target > highest {
                *hint = LevelHint::AboveRange;
                return VerticalLevel::Degenerate {
                    index: len - 1,
                    height: highest,
                };
            }
            (0, len - 1, lowest, highest)
        }
        Some(i) => {
            let hint_below = column(i);
            let hint_above = column(i + 1);
            debug_assert!(
                hint_below < hint_above,
                "height field must be strictly increasing with level index"
            );

            if hint_below <= target && target <= hint_above {
                *hint = LevelHint::Bracket(i);
                return VerticalLevel::Bracket {
                    below: i,
                    height_below: hint_below,
                    height_above: hint_above,
                };
            }

            if target < hint_below {
                // Moved down; search the window beneath the hint.
                if i == 0 {
                    *hint = LevelHint::BelowRange;
                    return VerticalLevel::Degenerate {
                        index: 0,
                        height: hint_below,
                    };
                }
                let lowest = column(0);
                if target < lowest {
                    *hint = LevelHint::BelowRange;
                    return VerticalLevel::Degenerate {
                        index: 0,
                        height: lowest,
                    };
                }
                (0, i, lowest, hint_below)
            } else {
                // Moved up; search the window above the hint.
                if i + 1 == len - 1 {
                    *hint = LevelHint::AboveRange;
                    return VerticalLevel::Degenerate {
                        index: len - 1,
                        height: hint_above,
                    };
                }
                let highest = column(len - 1);
                if target > highest {
                    *hint = LevelHint::AboveRange;
                    return VerticalLevel::Degenerate {
                        index: len - 1,
                        height: highest,
                    };
                }
                (i + 1, len - 1, hint_above, highest)
            }
        }
    };

    // Bisect the window on the monotone height column down to width 1.
    while above - below > 1 {
        let mid = (above + below) / 2;
        let mid_height = column(mid);
        if mid_height <= target {
            below = mid;
            height_below = mid_height;
        } else {
            above = mid;
            height_above = mid_height;
        }
    }

    debug_assert!(height_below <= target && target <= height_above);

    *hint = LevelHint::Bracket(below);
    VerticalLevel::Bracket {
        below,
        height_below,
        height_above,
    }
}

/// Hint-free reference search: a plain linear scan of the height column.
///
/// Exists to validate the hinted fast path; tests compare the two across
/// target sweeps. Not used on the query path.
pub fn resolve_level_linear<S: GridSource>(
    source: &S,
    hour: usize,
    target: f64,
    point: &HorizontalBracket,
) -> VerticalLevel {
    let len = axes::PRESSURE_LEVELS;
    let column = |index: usize| blend::bilinear(source, hour, index, Variable::Height, point);

    let lowest = column(0);
    if target < lowest {
        return VerticalLevel::Degenerate {
            index: 0,
            height: lowest,
        };
    }
    for below in 0..len - 1 {
        let height_above = column(below + 1);
        if target <= height_above {
            return VerticalLevel::Bracket {
                below,
                height_below: column(below),
                height_above,
            };
        }
    }
    VerticalLevel::Degenerate {
        index: len - 1,
        height: column(len - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Synthetic strictly-increasing height column, uniform horizontally;
    /// heights are `120 + 250 * index` metres with a per-hour offset so the
    /// two endpoints differ.
    struct ColumnSource;

    impl ColumnSource {
        fn height(hour: usize, index: usize) -> f64 {
            120.0 + 250.0 * index as f64 + 30.0 * hour as f64
        }
    }

    impl GridSource for ColumnSource {
        fn sample(
            &self,
            hour: usize,
            pressure: usize,
            variable: Variable,
            _lat: usize,
            _lon: usize,
        ) -> f64 {
            match variable {
                Variable::Height => Self::height(hour, pressure),
                _ => 0.0,
            }
        }
    }

    fn point() -> HorizontalBracket {
        HorizontalBracket {
            lat_south: 180,
            lat_lambda: 0.5,
            lon_west: 100,
            lon_east: 101,
            lon_lambda: 0.25,
        }
    }

    fn assert_brackets(level: VerticalLevel, target: f64) {
        match level {
            VerticalLevel::Bracket {
                below,
                height_below,
                height_above,
            } => {
                assert!(below < axes::PRESSURE_LEVELS - 1);
                assert!(
                    height_below <= target && target <= height_above,
                    "target {target} outside [{height_below}, {height_above}]"
                );
            }
            VerticalLevel::Degenerate { .. } => panic!("unexpected degenerate for {target}"),
        }
    }

    #[test]
    fn interior_targets_bracket_correctly_from_cold_cache() {
        let p = point();
        let top = ColumnSource::height(0, axes::PRESSURE_LEVELS - 1);
        let mut target = 120.0;
        while target <= top {
            let mut hint = LevelHint::Unknown;
            let level = resolve_level(&ColumnSource, 0, target, &p, &mut hint);
            assert_brackets(level, target);
            target += 97.0;
        }
    }

    #[test]
    fn hinted_search_matches_linear_reference() {
        // One warm hint walked through an ascent/descent profile must agree
        // with the stateless scan at every step.
        let p = point();
        let mut hint = LevelHint::Unknown;
        let top = ColumnSource::height(1, axes::PRESSURE_LEVELS - 1);

        let mut targets = Vec::new();
        let mut t = -200.0;
        while t < top + 500.0 {
            targets.push(t);
            t += 333.0;
        }
        let down: Vec<f64> = targets.iter().rev().copied().collect();
        targets.extend(down);

        for target in targets {
            let fast = resolve_level(&ColumnSource, 1, target, &p, &mut hint);
            let slow = resolve_level_linear(&ColumnSource, 1, target, &p);
            assert_eq!(fast, slow, "divergence at target {target}");
        }
    }

    #[test]
    fn below_lowest_clamps_degenerate() {
        let p = point();
        let mut hint = LevelHint::Unknown;
        let level = resolve_level(&ColumnSource, 0, 50.0, &p, &mut hint);
        assert_eq!(
            level,
            VerticalLevel::Degenerate {
                index: 0,
                height: 120.0
            }
        );
        assert_eq!(hint, LevelHint::BelowRange);
    }

    #[test]
    fn above_highest_clamps_degenerate() {
        let p = point();
        let top = ColumnSource::height(0, axes::PRESSURE_LEVELS - 1);
        let mut hint = LevelHint::Unknown;
        let level = resolve_level(&ColumnSource, 0, top + 1.0, &p, &mut hint);
        assert_eq!(
            level,
            VerticalLevel::Degenerate {
                index: axes::PRESSURE_LEVELS - 1,
                height: top
            }
        );
        assert_eq!(hint, LevelHint::AboveRange);
    }

    #[test]
    fn boundary_heights_resolve_as_brackets() {
        let p = point();
        let mut hint = LevelHint::Unknown;
        let level = resolve_level(&ColumnSource, 0, 120.0, &p, &mut hint);
        assert_eq!(
            level,
            VerticalLevel::Bracket {
                below: 0,
                height_below: 120.0,
                height_above: 370.0
            }
        );

        let top = ColumnSource::height(0, axes::PRESSURE_LEVELS - 1);
        let mut hint = LevelHint::Unknown;
        let level = resolve_level(&ColumnSource, 0, top, &p, &mut hint);
        assert_brackets(level, top);
    }

    #[test]
    fn repeated_resolution_is_stable_and_keeps_hint() {
        let p = point();
        let mut hint = LevelHint::Unknown;
        let first = resolve_level(&ColumnSource, 0, 5_000.0, &p, &mut hint);
        let hint_after_first = hint;

        for _ in 0..5 {
            let level = resolve_level(&ColumnSource, 0, 5_000.0, &p, &mut hint);
            assert_eq!(level, first);
            assert_eq!(hint, hint_after_first);
        }
    }

    #[test]
    fn hint_hit_reads_only_one_bracket() {
        // A warm bracket hint must resolve from exactly the two candidate
        // columns (4 corner reads each) without widening the search.
        struct Counting<'a>(&'a std::cell::Cell<u64>);
        impl GridSource for Counting<'_> {
            fn sample(
                &self,
                hour: usize,
                pressure: usize,
                variable: Variable,
                lat: usize,
                lon: usize,
            ) -> f64 {
                self.0.set(self.0.get() + 1);
                ColumnSource.sample(hour, pressure, variable, lat, lon)
            }
        }

        let reads = std::cell::Cell::new(0);
        let source = Counting(&reads);
        let p = point();
        let mut hint = LevelHint::Unknown;

        resolve_level(&source, 0, 5_000.0, &p, &mut hint);
        assert!(matches!(hint, LevelHint::Bracket(_)));

        reads.set(0);
        resolve_level(&source, 0, 5_040.0, &p, &mut hint);
        assert_eq!(reads.get(), 8);
    }

    #[test]
    fn rehome_invalidates_hints_only_on_hour_change() {
        let mut cache = SearchCache::default();
        cache.rehome(4);
        cache.before = LevelHint::Bracket(10);
        cache.after = LevelHint::Bracket(11);

        cache.rehome(4);
        assert_eq!(cache.before, LevelHint::Bracket(10));

        cache.rehome(5);
        assert_eq!(cache.before, LevelHint::Unknown);
        assert_eq!(cache.after, LevelHint::Unknown);
        assert_eq!(cache.hour_index, Some(5));
    }
}
