//! Objective assembly from constraints and weights.

use super::energy::Objective;
use super::weights::PenaltyWeights;
use crate::constraints::SleepConstraints;
use crate::error::BuildError;
use crate::grid::{SlotId, NUM_DAYS, NUM_VARS, SLOTS_PER_DAY};
use crate::qubo::QuboModel;

/// Builds an [`Objective`] for one set of constraints.
///
/// The quadratic terms (target sleep, forbidden slots, continuity and
/// day-to-day regularity) are accumulated straight into a [`QuboModel`].
/// The run-length terms are carried by the objective and evaluated per
/// assignment.
#[derive(Debug, Clone, Default)]
pub struct ObjectiveBuilder {
    weights: PenaltyWeights,
}

impl ObjectiveBuilder {
    pub fn new(weights: PenaltyWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &PenaltyWeights {
        &self.weights
    }

    /// Assembles the objective.
    pub fn build(&self, constraints: &SleepConstraints) -> Result<Objective, BuildError> {
        self.weights.validate()?;

        let mut qubo = QuboModel::new(NUM_VARS);
        self.add_target_sleep(&mut qubo, constraints.target_sleep_time());
        check_finite(&qubo, "target sleep")?;
        self.add_forbidden(&mut qubo, constraints);
        self.add_continuity(&mut qubo);
        self.add_regularity(&mut qubo);
        check_finite(&qubo, "objective")?;

        let ideal = constraints.ideal_segments() as f64;
        if !(self.weights.segmentation * ideal * ideal).is_finite() {
            return Err(BuildError::NonFinite {
                term: "segmentation",
            });
        }

        Ok(Objective::new(qubo, self.weights.clone(), constraints.clone()))
    }

    /// `w * (sum_s x[d,s] - T)^2` per day. With `x^2 = x` this expands to
    /// `w * (1 - 2T)` on every variable, `2w` on every pair within the day
    /// and `w * T^2` constant.
    fn add_target_sleep(&self, qubo: &mut QuboModel, target: i64) {
        let w = self.weights.target_sleep;
        let t = target as f64;
        for day in 0..NUM_DAYS {
            let base = day * SLOTS_PER_DAY;
            for s in 0..SLOTS_PER_DAY {
                qubo.add_linear(base + s, w * (1.0 - 2.0 * t));
                for r in s + 1..SLOTS_PER_DAY {
                    qubo.add_quadratic(base + s, base + r, 2.0 * w);
                }
            }
            qubo.add_offset(w * t * t);
        }
    }

    fn add_forbidden(&self, qubo: &mut QuboModel, constraints: &SleepConstraints) {
        let w = self.weights.forbidden;
        for id in SlotId::all() {
            if *constraints.cannot_sleep().get(id.day, id.slot) {
                qubo.add_linear(id.index(), w);
            }
        }
    }

    /// `-w * x[d,s] * x[d,s+1]` for adjacent slots within each day.
    fn add_continuity(&self, qubo: &mut QuboModel) {
        let w = self.weights.continuity;
        for day in 0..NUM_DAYS {
            let base = day * SLOTS_PER_DAY;
            for s in 0..SLOTS_PER_DAY - 1 {
                qubo.add_quadratic(base + s, base + s + 1, -w);
            }
        }
    }

    /// `w * x[d,s] * x[d+1,s]` for each slot across consecutive days.
    fn add_regularity(&self, qubo: &mut QuboModel) {
        let w = self.weights.regularity;
        for day in 0..NUM_DAYS - 1 {
            for s in 0..SLOTS_PER_DAY {
                qubo.add_quadratic(
                    day * SLOTS_PER_DAY + s,
                    (day + 1) * SLOTS_PER_DAY + s,
                    w,
                );
            }
        }
    }
}

fn check_finite(qubo: &QuboModel, term: &'static str) -> Result<(), BuildError> {
    if qubo.is_finite() {
        Ok(())
    } else {
        Err(BuildError::NonFinite { term })
    }
}
