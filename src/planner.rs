//! End-to-end solve: build objective, anneal, materialize.
//!
//! Each phase runs inside its own `tracing` span (`build_objective`,
//! `anneal`, `materialize`). Nothing is emitted unless the caller installs
//! a subscriber; the same durations are returned in [`PhaseTimings`].

use crate::constraints::SleepConstraints;
use crate::error::Error;
use crate::objective::{EnergyBreakdown, ObjectiveBuilder, PenaltyWeights};
use crate::sa::{SaConfig, SaResult, SaRunner};
use crate::schedule::Schedule;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span};

/// Wall-clock time spent in each phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseTimings {
    pub build: Duration,
    pub solve: Duration,
    pub materialize: Duration,
}

impl PhaseTimings {
    pub fn total(&self) -> Duration {
        self.build + self.solve + self.materialize
    }
}

/// Result of one planning run.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// The materialized schedule.
    pub schedule: Schedule,

    /// Total energy of the schedule. Lower is better; compare across runs
    /// with the same constraints to judge solve quality.
    pub energy: f64,

    /// Weighted contribution of each penalty term.
    pub breakdown: EnergyBreakdown,

    /// Raw annealer statistics.
    pub solver: SaResult,

    pub timings: PhaseTimings,
}

/// Weekly sleep schedule planner.
///
/// # Examples
///
/// ```no_run
/// use u_sleepqubo::{SleepConstraints, SleepPlanner};
///
/// let constraints = SleepConstraints::unrestricted(32, 1).with_forbidden_range(36..72);
/// let outcome = SleepPlanner::default().plan(&constraints)?;
/// println!("{}", outcome.schedule);
/// # Ok::<(), u_sleepqubo::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SleepPlanner {
    weights: PenaltyWeights,
    sa_config: SaConfig,
}

impl SleepPlanner {
    pub fn new(weights: PenaltyWeights, sa_config: SaConfig) -> Self {
        Self { weights, sa_config }
    }

    pub fn with_weights(mut self, weights: PenaltyWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_sa_config(mut self, sa_config: SaConfig) -> Self {
        self.sa_config = sa_config;
        self
    }

    pub fn weights(&self) -> &PenaltyWeights {
        &self.weights
    }

    pub fn sa_config(&self) -> &SaConfig {
        &self.sa_config
    }

    /// Runs the full pipeline for one set of constraints.
    pub fn plan(&self, constraints: &SleepConstraints) -> Result<PlanOutcome, Error> {
        self.sa_config.validate()?;

        let started = Instant::now();
        let objective = {
            let _span = info_span!(
                "build_objective",
                target_slots = constraints.target_sleep_time(),
                ideal_segments = constraints.ideal_segments(),
                forbidden = constraints.forbidden_count()
            )
            .entered();
            let objective = ObjectiveBuilder::new(self.weights.clone()).build(constraints)?;
            debug!(
                interactions = objective.qubo().num_interactions(),
                elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
                "objective built"
            );
            objective
        };
        let build = started.elapsed();

        let started = Instant::now();
        let solver = {
            let _span = info_span!(
                "anneal",
                sweeps = self.sa_config.num_sweeps,
                reads = self.sa_config.num_reads
            )
            .entered();
            let result = SaRunner::run(&objective, &self.sa_config)?;
            debug!(
                best_energy = result.best_energy,
                accepted = result.accepted_moves,
                descent = result.descent_moves,
                initial_temperature = result.initial_temperature,
                final_temperature = result.final_temperature,
                elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
                "annealing finished"
            );
            result
        };
        let solve = started.elapsed();

        let started = Instant::now();
        let (schedule, breakdown) = {
            let _span = info_span!("materialize").entered();
            let schedule = Schedule::from_assignment(&solver.best);
            let breakdown = objective.breakdown(schedule.as_bits());
            debug!(
                sleep_slots = ?schedule.daily_sleep_slots(),
                elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
                "schedule materialized"
            );
            (schedule, breakdown)
        };
        let materialize = started.elapsed();

        let timings = PhaseTimings {
            build,
            solve,
            materialize,
        };
        info!(
            energy = solver.best_energy,
            total_ms = timings.total().as_secs_f64() * 1e3,
            "sleep schedule planned"
        );

        Ok(PlanOutcome {
            schedule,
            energy: solver.best_energy,
            breakdown,
            solver,
            timings,
        })
    }
}

/// Plans with default weights and solver settings and returns the nested
/// `[day][slot]` grid.
pub fn solve(
    cannot_sleep: &[Vec<bool>],
    target_sleep_time: i64,
    ideal_segments: i64,
) -> Result<Vec<Vec<u8>>, Error> {
    let constraints = SleepConstraints::from_rows(cannot_sleep, target_sleep_time, ideal_segments)?;
    let outcome = SleepPlanner::default().plan(&constraints)?;
    Ok(outcome.schedule.to_rows())
}
