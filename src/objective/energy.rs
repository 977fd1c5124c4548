//! Assembled objective and its energy evaluation.

use super::runs;
use super::weights::PenaltyWeights;
use crate::constraints::SleepConstraints;
use crate::grid::{NUM_DAYS, NUM_VARS, SLOTS_PER_DAY};
use crate::qubo::{CompiledQubo, QuboModel};
use crate::sa::BinaryProblem;
use std::fmt;

/// Weighted contribution of each penalty term for one assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnergyBreakdown {
    pub target_sleep: f64,
    pub forbidden: f64,
    pub continuity: f64,
    pub granularity: f64,
    pub regularity: f64,
    pub segmentation: f64,
    pub wake_gap: f64,
}

impl EnergyBreakdown {
    /// Terms carried by the QUBO coefficient map.
    pub fn quadratic_part(&self) -> f64 {
        self.target_sleep + self.forbidden + self.continuity + self.regularity
    }

    /// Terms evaluated on runs of the assignment.
    pub fn run_part(&self) -> f64 {
        self.granularity + self.segmentation + self.wake_gap
    }

    pub fn total(&self) -> f64 {
        self.quadratic_part() + self.run_part()
    }
}

impl fmt::Display for EnergyBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={:.1} target={:.1} forbidden={:.1} continuity={:.1} granularity={:.1} \
             regularity={:.1} segmentation={:.1} wake_gap={:.1}",
            self.total(),
            self.target_sleep,
            self.forbidden,
            self.continuity,
            self.granularity,
            self.regularity,
            self.segmentation,
            self.wake_gap
        )
    }
}

/// Scalar cost over the 672 sleep variables.
///
/// Energy is the compiled QUBO part plus the run-length terms of every day.
/// The wake-gap stretch that crosses midnight is charged once per day edge
/// inside [`runs::wake_gap_within`] and again as a joined run, so a long
/// awake evening followed by a long awake morning pays three times.
#[derive(Debug, Clone)]
pub struct Objective {
    qubo: QuboModel,
    compiled: CompiledQubo,
    weights: PenaltyWeights,
    constraints: SleepConstraints,
}

impl Objective {
    pub(super) fn new(
        qubo: QuboModel,
        weights: PenaltyWeights,
        constraints: SleepConstraints,
    ) -> Self {
        let compiled = qubo.compile();
        Self {
            qubo,
            compiled,
            weights,
            constraints,
        }
    }

    /// Coefficient map of the quadratic terms.
    pub fn qubo(&self) -> &QuboModel {
        &self.qubo
    }

    pub fn compiled(&self) -> &CompiledQubo {
        &self.compiled
    }

    pub fn weights(&self) -> &PenaltyWeights {
        &self.weights
    }

    pub fn constraints(&self) -> &SleepConstraints {
        &self.constraints
    }

    /// Total energy of a full assignment.
    pub fn energy(&self, state: &[u8]) -> f64 {
        self.compiled.energy(state)
            + (0..NUM_DAYS)
                .map(|day| self.day_run_energy(state, day, None))
                .sum::<f64>()
    }

    /// Per-term energy of a full assignment, evaluated term by term from
    /// the grid rather than from the coefficient map.
    pub fn breakdown(&self, state: &[u8]) -> EnergyBreakdown {
        debug_assert_eq!(state.len(), NUM_VARS);
        let w = &self.weights;
        let target = self.constraints.target_sleep_time() as f64;
        let ideal = self.constraints.ideal_segments() as f64;

        let mut out = EnergyBreakdown::default();
        for d in 0..NUM_DAYS {
            let slots = day_slice(state, d);
            let asleep = slots.iter().filter(|&&x| x != 0).count() as f64;
            out.target_sleep += w.target_sleep * (asleep - target).powi(2);

            let forbidden = self.constraints.cannot_sleep().day(d);
            let violations = slots
                .iter()
                .zip(forbidden)
                .filter(|&(&x, &f)| x != 0 && f)
                .count();
            out.forbidden += w.forbidden * violations as f64;

            let pairs = slots.windows(2).filter(|p| p[0] != 0 && p[1] != 0).count();
            out.continuity -= w.continuity * pairs as f64;

            out.granularity +=
                w.granularity * runs::granularity_excess(slots, w.block_slots) as f64;

            if d + 1 < NUM_DAYS {
                let same = slots
                    .iter()
                    .zip(day_slice(state, d + 1))
                    .filter(|&(&a, &b)| a != 0 && b != 0)
                    .count();
                out.regularity += w.regularity * same as f64;
            }

            let segments = runs::segment_count(slots) as f64;
            out.segmentation += w.segmentation * (segments - ideal).powi(2);

            out.wake_gap += runs::wake_gap_within(slots, &w.wake_gap);
            if d > 0 {
                out.wake_gap += runs::wake_gap_across(day_slice(state, d - 1), slots, &w.wake_gap);
            }
        }
        out
    }

    /// Run-length energy owned by `day`: its granularity, segmentation and
    /// in-day wake gaps plus the midnight stretch joining it to `day - 1`.
    ///
    /// `flipped` evaluates the energy as if that variable were toggled.
    fn day_run_energy(&self, state: &[u8], day: usize, flipped: Option<usize>) -> f64 {
        let w = &self.weights;
        let current = day_with_flip(state, day, flipped);
        let segments = runs::segment_count(&current) as f64;
        let ideal = self.constraints.ideal_segments() as f64;

        let mut energy = w.granularity * runs::granularity_excess(&current, w.block_slots) as f64
            + w.segmentation * (segments - ideal).powi(2)
            + runs::wake_gap_within(&current, &w.wake_gap);
        if day > 0 {
            let prev = day_with_flip(state, day - 1, flipped);
            energy += runs::wake_gap_across(&prev, &current, &w.wake_gap);
        }
        energy
    }
}

fn day_slice(state: &[u8], day: usize) -> &[u8] {
    &state[day * SLOTS_PER_DAY..(day + 1) * SLOTS_PER_DAY]
}

/// Copy of one day's bits with `flipped` toggled if it falls inside it.
fn day_with_flip(state: &[u8], day: usize, flipped: Option<usize>) -> [u8; SLOTS_PER_DAY] {
    let start = day * SLOTS_PER_DAY;
    let mut out = [0u8; SLOTS_PER_DAY];
    out.copy_from_slice(&state[start..start + SLOTS_PER_DAY]);
    if let Some(i) = flipped.filter(|i| (start..start + SLOTS_PER_DAY).contains(i)) {
        out[i - start] ^= 1;
    }
    out
}

impl BinaryProblem for Objective {
    fn num_variables(&self) -> usize {
        NUM_VARS
    }

    fn energy(&self, state: &[u8]) -> f64 {
        Objective::energy(self, state)
    }

    /// QUBO local field plus the run terms of the flipped day and the
    /// following day, whose midnight stretch depends on it.
    fn flip_delta(&self, state: &[u8], var: usize) -> f64 {
        let day = var / SLOTS_PER_DAY;
        let last = (day + 1).min(NUM_DAYS - 1);
        let runs_delta: f64 = (day..=last)
            .map(|d| self.day_run_energy(state, d, Some(var)) - self.day_run_energy(state, d, None))
            .sum();
        self.compiled.flip_delta(state, var) + runs_delta
    }
}
