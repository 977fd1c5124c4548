//! Run-length penalties evaluated on a concrete day assignment.
//!
//! These terms depend on maximal runs of equal bits, which are step
//! functions of the assignment rather than low-degree polynomials, so they
//! are computed literally instead of being compiled into the QUBO.

use super::weights::WakeGapBounds;

/// Lengths of maximal runs of asleep (`asleep = true`) or awake slots.
pub fn runs(day: &[u8], asleep: bool) -> impl Iterator<Item = usize> + '_ {
    let mut slots = day.iter().peekable();
    std::iter::from_fn(move || {
        // Skip to the start of the next matching run.
        while slots.next_if(|&&x| (x != 0) != asleep).is_some() {}
        let mut len = 0;
        while slots.next_if(|&&x| (x != 0) == asleep).is_some() {
            len += 1;
        }
        (len > 0).then_some(len)
    })
}

/// Number of sleep blocks: a block starts at slot 0 if asleep, or wherever
/// an awake slot is followed by an asleep one.
pub fn segment_count(day: &[u8]) -> usize {
    runs(day, true).count()
}

/// Sum of `len % block` over asleep runs whose length is not a multiple
/// of `block`. A zero `block` imposes no granularity and yields 0.
pub fn granularity_excess(day: &[u8], block: usize) -> usize {
    if block == 0 {
        return 0;
    }
    runs(day, true).map(|len| len % block).sum()
}

/// Awake slots before the first asleep slot.
pub fn leading_awake(day: &[u8]) -> usize {
    day.iter().take_while(|&&x| x == 0).count()
}

/// Awake slots after the last asleep slot.
pub fn trailing_awake(day: &[u8]) -> usize {
    day.iter().rev().take_while(|&&x| x == 0).count()
}

/// Wake-gap penalty for every awake run inside one day, including the
/// leading and trailing runs truncated at the day edges.
pub fn wake_gap_within(day: &[u8], bounds: &WakeGapBounds) -> f64 {
    runs(day, false).map(|len| bounds.penalty(len)).sum()
}

/// Wake-gap penalty for the awake stretch spanning midnight: the previous
/// day's trailing run joined with this day's leading run.
///
/// Both pieces are also penalized on their own by [`wake_gap_within`].
pub fn wake_gap_across(prev_day: &[u8], day: &[u8], bounds: &WakeGapBounds) -> f64 {
    bounds.penalty(trailing_awake(prev_day) + leading_awake(day))
}
