//! Weekly sleep schedule optimization.
//!
//! A week is a 7x96 grid of 15-minute slots, each a binary decision
//! variable (`1` asleep, `0` awake). The crate turns caller constraints
//! into a single scalar objective and minimizes it with simulated
//! annealing:
//!
//! - **Objective** ([`objective`]): seven weighted penalty terms for
//!   target sleep, forbidden slots, continuity, 90-minute granularity,
//!   day-to-day regularity, segmentation and wake-gap bounds. The
//!   quadratic terms are accumulated into a sparse [`qubo::QuboModel`];
//!   the run-length terms are evaluated on the assignment itself.
//! - **Annealing** ([`sa`]): single-flip Metropolis sweeps over a fixed
//!   cooling schedule, returning the lowest-energy assignment and its
//!   energy.
//! - **Schedule** ([`schedule`]): the winning bits reshaped into the
//!   day/slot grid with per-day sleep totals.
//!
//! [`SleepPlanner`] wires the three phases together and reports per-phase
//! timings; [`solve`] is the one-call form.
//!
//! # Features
//!
//! - `parallel`: run independent annealing reads on rayon.
//! - `serde`: serialization for configs, breakdowns and the
//!   [`api`](crate::api) request/response types.

#[cfg(feature = "serde")]
pub mod api;
pub mod constraints;
pub mod error;
pub mod grid;
pub mod objective;
pub mod planner;
pub mod qubo;
pub mod sa;
pub mod schedule;

pub use constraints::SleepConstraints;
pub use error::{BuildError, ConfigError, Error, ValidationError};
pub use planner::{solve, PhaseTimings, PlanOutcome, SleepPlanner};
pub use schedule::Schedule;
