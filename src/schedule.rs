//! Materializing solver assignments into the week grid.

use crate::grid::{Grid, SlotId, NUM_DAYS, NUM_VARS, SLOTS_PER_HOUR};
use crate::objective::runs;
use std::collections::HashMap;
use std::fmt;

/// A 7x96 sleep schedule: `1` asleep, `0` awake.
///
/// Built verbatim from the solver output; no correction is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    grid: Grid<u8>,
}

impl Schedule {
    /// From a dense row-major assignment. Missing trailing entries are
    /// awake and any non-zero value counts as asleep.
    pub fn from_assignment(bits: &[u8]) -> Self {
        let mut grid = Grid::filled(0u8);
        for id in SlotId::all() {
            if bits.get(id.index()).is_some_and(|&b| b != 0) {
                grid.set(id.day, id.slot, 1);
            }
        }
        Self { grid }
    }

    /// From a sparse assignment keyed by cell. Unlisted cells are awake.
    pub fn from_slots<I>(assignment: I) -> Self
    where
        I: IntoIterator<Item = (SlotId, u8)>,
    {
        let mut grid = Grid::filled(0u8);
        for (id, value) in assignment {
            grid.set(id.day, id.slot, u8::from(value != 0));
        }
        Self { grid }
    }

    /// From a sparse assignment keyed by variable label (`x_{day}_{slot}`).
    /// Labels that name no cell are ignored.
    pub fn from_labels(assignment: &HashMap<String, u8>) -> Self {
        Self::from_slots(
            assignment
                .iter()
                .filter_map(|(label, &value)| Some((label.parse::<SlotId>().ok()?, value))),
        )
    }

    pub fn grid(&self) -> &Grid<u8> {
        &self.grid
    }

    pub fn is_asleep(&self, day: usize, slot: usize) -> bool {
        *self.grid.get(day, slot) != 0
    }

    /// Asleep slots per day.
    pub fn daily_sleep_slots(&self) -> [usize; NUM_DAYS] {
        let mut out = [0; NUM_DAYS];
        for (total, row) in out.iter_mut().zip(self.grid.rows()) {
            *total = row.iter().filter(|&&x| x != 0).count();
        }
        out
    }

    /// Hours asleep per day (`slots / 4`).
    pub fn daily_sleep_hours(&self) -> [f64; NUM_DAYS] {
        self.daily_sleep_slots()
            .map(|slots| slots as f64 / SLOTS_PER_HOUR as f64)
    }

    /// Lengths of the sleep blocks of one day, in slots.
    pub fn segments(&self, day: usize) -> Vec<usize> {
        runs::runs(self.grid.day(day), true).collect()
    }

    /// Flat row-major bits, suitable for re-evaluating the objective.
    pub fn as_bits(&self) -> &[u8] {
        self.grid.as_flat()
    }

    /// Nested `[day][slot]` form.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.grid.to_rows()
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::from_assignment(&[0; NUM_VARS])
    }
}

/// One line per day: `█` asleep, space awake, then the day's total.
impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.daily_sleep_hours();
        for (day, row) in self.grid.rows().enumerate() {
            write!(f, "Day {}: ", day + 1)?;
            for &x in row {
                f.write_str(if x != 0 { "█" } else { " " })?;
            }
            writeln!(f, " | Total sleep time: {:.2} hours", hours[day])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::SLOTS_PER_DAY;

    #[test]
    fn test_partial_assignment_defaults_to_awake() {
        let schedule = Schedule::from_slots([
            (SlotId::new(0, 0).unwrap(), 1),
            (SlotId::new(6, 95).unwrap(), 1),
        ]);
        let rows = schedule.to_rows();
        assert_eq!(rows.len(), NUM_DAYS);
        assert!(rows.iter().all(|r| r.len() == SLOTS_PER_DAY));
        let ones: usize = rows.iter().flatten().map(|&x| x as usize).sum();
        assert_eq!(ones, 2);
        assert!(schedule.is_asleep(0, 0));
        assert!(schedule.is_asleep(6, 95));
        assert!(!schedule.is_asleep(3, 50));
    }

    #[test]
    fn test_empty_assignment_keeps_shape() {
        let schedule = Schedule::from_slots(std::iter::empty());
        assert_eq!(schedule, Schedule::default());
        assert_eq!(schedule.to_rows().len(), NUM_DAYS);
        assert_eq!(schedule.daily_sleep_slots(), [0; NUM_DAYS]);
    }

    #[test]
    fn test_labels_ignore_unknown_names() {
        let mut labels = HashMap::new();
        labels.insert("x_2_10".to_string(), 1);
        labels.insert("x_2_11".to_string(), 0);
        labels.insert("x_9_0".to_string(), 1);
        labels.insert("aux_0".to_string(), 1);
        let schedule = Schedule::from_labels(&labels);
        assert!(schedule.is_asleep(2, 10));
        assert!(!schedule.is_asleep(2, 11));
        assert_eq!(schedule.daily_sleep_slots().iter().sum::<usize>(), 1);
    }

    #[test]
    fn test_short_dense_assignment_padded_with_awake() {
        let schedule = Schedule::from_assignment(&[1, 1, 2]);
        assert_eq!(schedule.daily_sleep_slots()[0], 3);
        assert_eq!(*schedule.grid().get(0, 2), 1);
        assert_eq!(schedule.as_bits().len(), NUM_VARS);
    }

    #[test]
    fn test_daily_hours_and_segments() {
        let mut bits = vec![0u8; NUM_VARS];
        bits[..32].fill(1);
        bits[SLOTS_PER_DAY + 10..SLOTS_PER_DAY + 16].fill(1);
        bits[SLOTS_PER_DAY + 50..SLOTS_PER_DAY + 62].fill(1);
        let schedule = Schedule::from_assignment(&bits);
        let hours = schedule.daily_sleep_hours();
        assert_eq!(hours[0], 8.0);
        assert_eq!(hours[1], 4.5);
        assert_eq!(hours[2], 0.0);
        assert_eq!(schedule.segments(0), vec![32]);
        assert_eq!(schedule.segments(1), vec![6, 12]);
    }

    #[test]
    fn test_display_reports_totals() {
        let mut bits = vec![0u8; NUM_VARS];
        bits[..32].fill(1);
        let text = Schedule::from_assignment(&bits).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), NUM_DAYS);
        assert!(lines[0].starts_with("Day 1: █"));
        assert!(lines[0].ends_with("Total sleep time: 8.00 hours"));
        assert!(lines[6].ends_with("Total sleep time: 0.00 hours"));
    }
}
