//! Week grid shape and decision variable addressing.
//!
//! A week is 7 days of 96 fifteen-minute slots. Every `(day, slot)` cell
//! owns exactly one binary decision variable, indexed row-major:
//! `index = day * SLOTS_PER_DAY + slot`.

use std::fmt;
use std::str::FromStr;

/// Number of days in the planning horizon.
pub const NUM_DAYS: usize = 7;

/// Number of 15-minute slots per day.
pub const SLOTS_PER_DAY: usize = 96;

/// Total number of binary decision variables.
pub const NUM_VARS: usize = NUM_DAYS * SLOTS_PER_DAY;

/// Slots per hour, used when reporting sleep totals.
pub const SLOTS_PER_HOUR: usize = 4;

/// A single cell of the week grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId {
    /// Day index in `0..NUM_DAYS`.
    pub day: usize,
    /// Slot index in `0..SLOTS_PER_DAY`.
    pub slot: usize,
}

impl SlotId {
    /// Creates a slot id, returning `None` if it lies outside the grid.
    pub fn new(day: usize, slot: usize) -> Option<Self> {
        (day < NUM_DAYS && slot < SLOTS_PER_DAY).then_some(Self { day, slot })
    }

    /// Row-major variable index of this cell.
    #[inline]
    pub fn index(self) -> usize {
        self.day * SLOTS_PER_DAY + self.slot
    }

    /// Inverse of [`SlotId::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        (index < NUM_VARS).then(|| Self {
            day: index / SLOTS_PER_DAY,
            slot: index % SLOTS_PER_DAY,
        })
    }

    /// Iterates all cells in row-major order.
    pub fn all() -> impl Iterator<Item = SlotId> {
        (0..NUM_VARS).map(|i| Self {
            day: i / SLOTS_PER_DAY,
            slot: i % SLOTS_PER_DAY,
        })
    }
}

/// Variable labels take the form `x_{day}_{slot}`.
impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x_{}_{}", self.day, self.slot)
    }
}

impl FromStr for SlotId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix("x_").ok_or(())?;
        let (day, slot) = rest.split_once('_').ok_or(())?;
        let day = day.parse().map_err(|_| ())?;
        let slot = slot.parse().map_err(|_| ())?;
        SlotId::new(day, slot).ok_or(())
    }
}

/// Dense `NUM_DAYS x SLOTS_PER_DAY` grid stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `value`.
    pub fn filled(value: T) -> Self {
        Self {
            cells: vec![value; NUM_VARS],
        }
    }
}

impl<T> Grid<T> {
    /// Wraps a row-major vector. Returns `None` unless it holds exactly
    /// [`NUM_VARS`] cells.
    pub fn from_flat(cells: Vec<T>) -> Option<Self> {
        (cells.len() == NUM_VARS).then_some(Self { cells })
    }

    pub fn get(&self, day: usize, slot: usize) -> &T {
        &self.cells[day * SLOTS_PER_DAY + slot]
    }

    pub fn set(&mut self, day: usize, slot: usize, value: T) {
        self.cells[day * SLOTS_PER_DAY + slot] = value;
    }

    /// The cells of one day.
    pub fn day(&self, day: usize) -> &[T] {
        let start = day * SLOTS_PER_DAY;
        &self.cells[start..start + SLOTS_PER_DAY]
    }

    /// Iterates the days as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks_exact(SLOTS_PER_DAY)
    }

    pub fn as_flat(&self) -> &[T] {
        &self.cells
    }

    pub fn into_flat(self) -> Vec<T> {
        self.cells
    }
}

impl<T: Clone> Grid<T> {
    /// Nested `Vec` form, one inner vector per day.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.rows().map(<[T]>::to_vec).collect()
    }
}
