//! Simulated Annealing (SA) over binary variables.
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Each sweep proposes flipping every variable once and
//! accepts a worsening flip with probability `exp(-delta / T)`; the
//! temperature falls over a fixed number of sweeps. The lowest-energy
//! assignment seen is returned, with its energy as a quality signal.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

mod config;
mod runner;
mod types;

pub use config::{CoolingSchedule, SaConfig};
pub use runner::{SaResult, SaRunner};
pub use types::BinaryProblem;
