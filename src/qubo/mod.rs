//! Quadratic unconstrained binary optimization (QUBO) models.
//!
//! A [`QuboModel`] is a sparse map of linear and pairwise coefficients over
//! binary variables plus a constant offset. Penalty terms are accumulated
//! into it numerically, then [`QuboModel::compile`] produces a
//! [`CompiledQubo`] with per-variable adjacency for fast flip evaluation.
//!
//! Binary variables satisfy `x * x = x`, so a squared self-term collapses
//! to a linear coefficient.

mod compiled;
mod model;

pub use compiled::CompiledQubo;
pub use model::QuboModel;
