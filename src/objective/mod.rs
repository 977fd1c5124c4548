//! Sleep schedule objective.
//!
//! Seven weighted penalty terms over the 7x96 decision grid, summed:
//!
//! | Term | Per day | Default weight |
//! |---|---|---|
//! | target sleep | `(sum_s x[d,s] - target)^2` | 20 |
//! | forbidden slots | asleep slots marked `cannot_sleep` | 50 |
//! | continuity | `-sum_s x[d,s] x[d,s+1]` | 10 |
//! | granularity | `len % 6` for each sleep block not a multiple of 6 | 1 |
//! | regularity | `sum_s x[d,s] x[d+1,s]` | 2 |
//! | segmentation | `(blocks - ideal)^2` | 30 |
//! | wake gap | awake runs outside `[4, 20]` slots | 25 / 15 per slot |
//!
//! The first, second, third and fifth terms are quadratic and compiled into
//! a [`QuboModel`](crate::qubo::QuboModel). The rest depend on run lengths
//! and are evaluated on the assignment itself.

mod builder;
mod energy;
pub mod runs;
mod weights;

pub use builder::ObjectiveBuilder;
pub use energy::{EnergyBreakdown, Objective};
pub use weights::{PenaltyWeights, WakeGapBounds};
