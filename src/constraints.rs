//! Caller-supplied constraints for one solve.

use crate::error::ValidationError;
use crate::grid::{Grid, NUM_DAYS, SLOTS_PER_DAY};

/// Constraint input for a weekly schedule.
///
/// `target_sleep_time` is in slots per day and `ideal_segments` in sleep
/// blocks per day. Neither is range-checked: out-of-range values only make
/// the corresponding penalty impossible to satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct SleepConstraints {
    cannot_sleep: Grid<bool>,
    target_sleep_time: i64,
    ideal_segments: i64,
}

impl SleepConstraints {
    /// Builds constraints from a validated grid.
    pub fn new(cannot_sleep: Grid<bool>, target_sleep_time: i64, ideal_segments: i64) -> Self {
        Self {
            cannot_sleep,
            target_sleep_time,
            ideal_segments,
        }
    }

    /// Builds constraints from nested rows, rejecting any shape other than 7x96.
    pub fn from_rows(
        cannot_sleep: &[Vec<bool>],
        target_sleep_time: i64,
        ideal_segments: i64,
    ) -> Result<Self, ValidationError> {
        if cannot_sleep.len() != NUM_DAYS {
            return Err(ValidationError::DayCount {
                expected: NUM_DAYS,
                actual: cannot_sleep.len(),
            });
        }
        if let Some((day, row)) = cannot_sleep
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != SLOTS_PER_DAY)
        {
            return Err(ValidationError::SlotCount {
                day,
                expected: SLOTS_PER_DAY,
                actual: row.len(),
            });
        }

        let flat: Vec<bool> = cannot_sleep.iter().flatten().copied().collect();
        let grid = Grid::from_flat(flat).ok_or(ValidationError::DayCount {
            expected: NUM_DAYS,
            actual: cannot_sleep.len(),
        })?;
        Ok(Self::new(grid, target_sleep_time, ideal_segments))
    }

    /// Constraints with no forbidden slots.
    pub fn unrestricted(target_sleep_time: i64, ideal_segments: i64) -> Self {
        Self::new(Grid::filled(false), target_sleep_time, ideal_segments)
    }

    /// Marks `slots` as forbidden on every day.
    pub fn with_forbidden_range(mut self, slots: std::ops::Range<usize>) -> Self {
        for day in 0..NUM_DAYS {
            for slot in slots.clone().filter(|&s| s < SLOTS_PER_DAY) {
                self.cannot_sleep.set(day, slot, true);
            }
        }
        self
    }

    pub fn cannot_sleep(&self) -> &Grid<bool> {
        &self.cannot_sleep
    }

    pub fn target_sleep_time(&self) -> i64 {
        self.target_sleep_time
    }

    pub fn ideal_segments(&self) -> i64 {
        self.ideal_segments
    }

    /// Number of forbidden cells across the week.
    pub fn forbidden_count(&self) -> usize {
        self.cannot_sleep.as_flat().iter().filter(|&&b| b).count()
    }
}
