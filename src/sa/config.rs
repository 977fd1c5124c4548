//! SA configuration and cooling schedules.

use crate::error::ConfigError;

/// How temperature falls from the initial to the minimum value across the
/// fixed number of sweeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// Geometric interpolation: `T_k = T_0 * (T_min / T_0)^(k / (n - 1))`.
    ///
    /// Spends most sweeps at low temperature.
    #[default]
    Geometric,

    /// Linear interpolation: `T_k = T_0 - k * (T_0 - T_min) / (n - 1)`.
    Linear,
}

/// Configuration for the binary Simulated Annealing solver.
///
/// Temperatures left unset are estimated from sampled flip deltas before
/// the first read.
///
/// # Examples
///
/// ```
/// use u_sleepqubo::sa::{CoolingSchedule, SaConfig};
///
/// let config = SaConfig::default()
///     .with_num_sweeps(500)
///     .with_num_reads(4)
///     .with_cooling(CoolingSchedule::Linear)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Number of sweeps per read. One sweep proposes a flip of every
    /// variable once, in index order.
    pub num_sweeps: usize,

    /// Number of independent reads. The lowest-energy read is returned.
    pub num_reads: usize,

    /// Temperature of the first sweep.
    pub initial_temperature: Option<f64>,

    /// Temperature of the last sweep.
    pub min_temperature: Option<f64>,

    /// Cooling schedule.
    pub cooling: CoolingSchedule,

    /// Random seed for reproducibility. Read `r` uses `seed + r`.
    pub seed: Option<u64>,

    /// Whether to run reads in parallel using rayon.
    ///
    /// Only takes effect with the `parallel` feature.
    pub parallel: bool,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            num_sweeps: 1000,
            num_reads: 1,
            initial_temperature: None,
            min_temperature: None,
            cooling: CoolingSchedule::default(),
            seed: None,
            parallel: false,
        }
    }
}

impl SaConfig {
    pub fn with_num_sweeps(mut self, n: usize) -> Self {
        self.num_sweeps = n;
        self
    }

    pub fn with_num_reads(mut self, n: usize) -> Self {
        self.num_reads = n;
        self
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = Some(t);
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = Some(t);
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_sweeps == 0 {
            return Err(ConfigError::ZeroSweeps);
        }
        if self.num_reads == 0 {
            return Err(ConfigError::ZeroReads);
        }
        for (name, t) in [
            ("initial_temperature", self.initial_temperature),
            ("min_temperature", self.min_temperature),
        ] {
            if let Some(value) = t.filter(|t| !(t.is_finite() && *t > 0.0)) {
                return Err(ConfigError::BadTemperature { name, value });
            }
        }
        if let (Some(initial), Some(min)) = (self.initial_temperature, self.min_temperature) {
            if min >= initial {
                return Err(ConfigError::TemperatureOrder { initial, min });
            }
        }
        Ok(())
    }
}

/// Temperature for sweep `k` of `n`.
pub(super) fn temperature_at(
    cooling: CoolingSchedule,
    initial: f64,
    min: f64,
    k: usize,
    n: usize,
) -> f64 {
    let progress = if n > 1 {
        k as f64 / (n - 1) as f64
    } else {
        0.0
    };
    match cooling {
        CoolingSchedule::Geometric => initial * (min / initial).powf(progress),
        CoolingSchedule::Linear => initial - progress * (initial - min),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SaConfig::default();
        assert_eq!(config.num_sweeps, 1000);
        assert_eq!(config.num_reads, 1);
        assert!(config.initial_temperature.is_none());
        assert_eq!(config.cooling, CoolingSchedule::Geometric);
    }

    #[test]
    fn test_validate_ok() {
        assert!(SaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_sweeps() {
        let config = SaConfig::default().with_num_sweeps(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroSweeps));
    }

    #[test]
    fn test_validate_zero_reads() {
        let config = SaConfig::default().with_num_reads(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroReads));
    }

    #[test]
    fn test_validate_bad_temperature() {
        let config = SaConfig::default().with_initial_temperature(-1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadTemperature {
                name: "initial_temperature",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_min_ge_initial() {
        let config = SaConfig::default()
            .with_initial_temperature(10.0)
            .with_min_temperature(20.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TemperatureOrder { .. })
        ));
    }

    #[test]
    fn test_schedule_endpoints() {
        for cooling in [CoolingSchedule::Geometric, CoolingSchedule::Linear] {
            let first = temperature_at(cooling, 100.0, 0.1, 0, 50);
            let last = temperature_at(cooling, 100.0, 0.1, 49, 50);
            assert!((first - 100.0).abs() < 1e-9);
            assert!((last - 0.1).abs() < 1e-9);
        }
    }

    #[test]
    fn test_schedule_is_monotone() {
        for cooling in [CoolingSchedule::Geometric, CoolingSchedule::Linear] {
            let temps: Vec<f64> = (0..20)
                .map(|k| temperature_at(cooling, 50.0, 0.01, k, 20))
                .collect();
            assert!(temps.windows(2).all(|w| w[1] < w[0]));
        }
    }

    #[test]
    fn test_geometric_midpoint() {
        let mid = temperature_at(CoolingSchedule::Geometric, 100.0, 1.0, 1, 3);
        assert!((mid - 10.0).abs() < 1e-9);
    }
}
