//! Penalty weights for the sleep objective.

use crate::error::BuildError;

/// Bounds on the length of a contiguous awake stretch, in slots.
///
/// A run shorter than `min_slots` costs `(min_slots - len) * short_penalty`;
/// a run longer than `max_slots` costs `(len - max_slots) * long_penalty`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WakeGapBounds {
    pub min_slots: usize,
    pub max_slots: usize,
    pub short_penalty: f64,
    pub long_penalty: f64,
}

impl Default for WakeGapBounds {
    fn default() -> Self {
        Self {
            min_slots: 4,
            max_slots: 20,
            short_penalty: 25.0,
            long_penalty: 15.0,
        }
    }
}

impl WakeGapBounds {
    /// Penalty for one awake run of `len` slots. Empty runs cost nothing.
    #[inline]
    pub fn penalty(&self, len: usize) -> f64 {
        if len == 0 {
            0.0
        } else if len < self.min_slots {
            (self.min_slots - len) as f64 * self.short_penalty
        } else if len > self.max_slots {
            (len - self.max_slots) as f64 * self.long_penalty
        } else {
            0.0
        }
    }
}

/// Weights of the additive penalty terms.
///
/// # Examples
///
/// ```
/// use u_sleepqubo::objective::PenaltyWeights;
///
/// let weights = PenaltyWeights::default()
///     .with_forbidden(80.0)
///     .with_segmentation(10.0);
/// assert!(weights.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PenaltyWeights {
    /// `(sum - target)^2` per day.
    pub target_sleep: f64,

    /// Each asleep slot marked as forbidden.
    pub forbidden: f64,

    /// Subtracted for every adjacent asleep pair within a day.
    pub continuity: f64,

    /// Per slot of remainder when a sleep block is not a multiple of
    /// `block_slots`.
    pub granularity: f64,

    /// Sleep block unit for the granularity term (6 slots = 90 minutes).
    pub block_slots: usize,

    /// Each slot asleep on two consecutive days.
    pub regularity: f64,

    /// `(segments - ideal)^2` per day.
    pub segmentation: f64,

    /// Awake stretch bounds.
    pub wake_gap: WakeGapBounds,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            target_sleep: 20.0,
            forbidden: 50.0,
            continuity: 10.0,
            granularity: 1.0,
            block_slots: 6,
            regularity: 2.0,
            segmentation: 30.0,
            wake_gap: WakeGapBounds::default(),
        }
    }
}

impl PenaltyWeights {
    pub fn with_target_sleep(mut self, w: f64) -> Self {
        self.target_sleep = w;
        self
    }

    pub fn with_forbidden(mut self, w: f64) -> Self {
        self.forbidden = w;
        self
    }

    pub fn with_continuity(mut self, w: f64) -> Self {
        self.continuity = w;
        self
    }

    pub fn with_granularity(mut self, w: f64) -> Self {
        self.granularity = w;
        self
    }

    pub fn with_block_slots(mut self, n: usize) -> Self {
        self.block_slots = n;
        self
    }

    pub fn with_regularity(mut self, w: f64) -> Self {
        self.regularity = w;
        self
    }

    pub fn with_segmentation(mut self, w: f64) -> Self {
        self.segmentation = w;
        self
    }

    pub fn with_wake_gap(mut self, bounds: WakeGapBounds) -> Self {
        self.wake_gap = bounds;
        self
    }

    /// Validates the weights.
    pub fn validate(&self) -> Result<(), BuildError> {
        let named = [
            ("target_sleep", self.target_sleep),
            ("forbidden", self.forbidden),
            ("continuity", self.continuity),
            ("granularity", self.granularity),
            ("regularity", self.regularity),
            ("segmentation", self.segmentation),
            ("wake_gap.short_penalty", self.wake_gap.short_penalty),
            ("wake_gap.long_penalty", self.wake_gap.long_penalty),
        ];
        if let Some(&(name, value)) = named.iter().find(|(_, v)| !v.is_finite()) {
            return Err(BuildError::InvalidWeight { name, value });
        }
        if self.block_slots == 0 {
            return Err(BuildError::InvalidWeight {
                name: "block_slots",
                value: 0.0,
            });
        }
        if self.wake_gap.min_slots > self.wake_gap.max_slots {
            return Err(BuildError::InvertedWakeBounds {
                min: self.wake_gap.min_slots,
                max: self.wake_gap.max_slots,
            });
        }
        Ok(())
    }
}
