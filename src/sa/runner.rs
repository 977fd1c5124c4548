//! SA execution loop.

use super::config::{temperature_at, SaConfig};
use super::types::BinaryProblem;
use crate::error::ConfigError;
use rand::Rng;
use u_numflow::random::create_rng;

/// Target acceptance of an average uphill move at the first sweep.
const INITIAL_ACCEPTANCE: f64 = 0.5;

/// Target acceptance of the smallest uphill move at the last sweep.
const FINAL_ACCEPTANCE: f64 = 0.01;

/// Random states sampled when estimating temperatures.
const TEMPERATURE_SAMPLES: usize = 4;

/// Deltas above `-DESCENT_TOLERANCE` do not count as improving in the
/// closing descent, so rounding noise cannot make it cycle.
const DESCENT_TOLERANCE: f64 = 1e-9;

/// Result of a Simulated Annealing run.
///
/// `best_energy` is recomputed from scratch for `best`, so callers can use
/// it to judge solve quality.
#[derive(Debug, Clone)]
pub struct SaResult {
    /// The lowest-energy assignment found across all reads.
    pub best: Vec<u8>,

    /// Energy of `best`.
    pub best_energy: f64,

    /// Best energy of each read, in read order.
    pub read_energies: Vec<f64>,

    /// Sweeps per read.
    pub sweeps: usize,

    /// Total flip proposals across all reads.
    pub iterations: usize,

    /// Number of accepted flips across all reads (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving flips across all reads.
    pub improving_moves: usize,

    /// Flips made by the zero-temperature descent that closes each read.
    pub descent_moves: usize,

    /// Temperature of the first sweep.
    pub initial_temperature: f64,

    /// Temperature of the last sweep.
    pub final_temperature: f64,

    /// Best energy of the winning read after each sweep.
    pub energy_history: Vec<f64>,
}

/// Outcome of one independent read.
#[derive(Debug, Clone)]
struct ReadOutcome {
    best: Vec<u8>,
    best_energy: f64,
    accepted_moves: usize,
    improving_moves: usize,
    descent_moves: usize,
    energy_history: Vec<f64>,
}

/// Executes binary Simulated Annealing with single-flip Metropolis sweeps.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA and returns the best assignment over all reads.
    ///
    /// Each read ends with a greedy descent from its best state, so the
    /// returned assignment has no strictly improving single flip.
    /// Never fails for lack of convergence: the best assignment seen is
    /// returned however poor it is.
    pub fn run<P: BinaryProblem>(problem: &P, config: &SaConfig) -> Result<SaResult, ConfigError> {
        config.validate()?;

        let base_seed = config.seed.unwrap_or_else(rand::random);
        let (initial_temperature, min_temperature) =
            resolve_temperatures(problem, config, base_seed);

        let outcomes = run_reads(problem, config, base_seed, initial_temperature, min_temperature);

        let read_energies: Vec<f64> = outcomes.iter().map(|o| o.best_energy).collect();
        let accepted_moves = outcomes.iter().map(|o| o.accepted_moves).sum();
        let improving_moves = outcomes.iter().map(|o| o.improving_moves).sum();
        let descent_moves = outcomes.iter().map(|o| o.descent_moves).sum();

        // Reads are never empty after validation; the first of equal-energy
        // reads wins.
        let winner = outcomes
            .into_iter()
            .reduce(|best, o| if o.best_energy < best.best_energy { o } else { best })
            .ok_or(ConfigError::ZeroReads)?;

        Ok(SaResult {
            best_energy: winner.best_energy,
            best: winner.best,
            read_energies,
            sweeps: config.num_sweeps,
            iterations: config.num_reads * config.num_sweeps * problem.num_variables(),
            accepted_moves,
            improving_moves,
            descent_moves,
            initial_temperature,
            final_temperature: temperature_at(
                config.cooling,
                initial_temperature,
                min_temperature,
                config.num_sweeps - 1,
                config.num_sweeps,
            ),
            energy_history: winner.energy_history,
        })
    }
}

#[cfg(feature = "parallel")]
fn run_reads<P: BinaryProblem>(
    problem: &P,
    config: &SaConfig,
    base_seed: u64,
    t0: f64,
    t_min: f64,
) -> Vec<ReadOutcome> {
    use rayon::prelude::*;

    if config.parallel {
        (0..config.num_reads)
            .into_par_iter()
            .map(|r| run_read(problem, config, base_seed.wrapping_add(r as u64), t0, t_min))
            .collect()
    } else {
        (0..config.num_reads)
            .map(|r| run_read(problem, config, base_seed.wrapping_add(r as u64), t0, t_min))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn run_reads<P: BinaryProblem>(
    problem: &P,
    config: &SaConfig,
    base_seed: u64,
    t0: f64,
    t_min: f64,
) -> Vec<ReadOutcome> {
    (0..config.num_reads)
        .map(|r| run_read(problem, config, base_seed.wrapping_add(r as u64), t0, t_min))
        .collect()
}

fn run_read<P: BinaryProblem>(
    problem: &P,
    config: &SaConfig,
    seed: u64,
    t0: f64,
    t_min: f64,
) -> ReadOutcome {
    let mut rng = create_rng(seed);
    let n = problem.num_variables();

    let mut state = problem.initial_state(&mut rng);
    let mut current_energy = problem.energy(&state);
    let mut best = state.clone();
    let mut best_energy = current_energy;

    let mut accepted_moves = 0usize;
    let mut improving_moves = 0usize;
    let mut energy_history = Vec::with_capacity(config.num_sweeps);

    for sweep in 0..config.num_sweeps {
        let temperature = temperature_at(config.cooling, t0, t_min, sweep, config.num_sweeps);

        for var in 0..n {
            let delta = problem.flip_delta(&state, var);

            // Metropolis acceptance criterion
            let accept = if delta < 0.0 {
                improving_moves += 1;
                true
            } else {
                rng.random_range(0.0..1.0) < (-delta / temperature).exp()
            };

            if accept {
                state[var] ^= 1;
                current_energy += delta;
                accepted_moves += 1;

                if current_energy < best_energy {
                    best.copy_from_slice(&state);
                    best_energy = current_energy;
                }
            }
        }

        energy_history.push(best_energy);
    }

    let descent_moves = descend(problem, &mut best);

    // Drop accumulated rounding from the incremental updates.
    let best_energy = problem.energy(&best);
    if let Some(last) = energy_history.last_mut() {
        *last = best_energy;
    }

    ReadOutcome {
        best,
        best_energy,
        accepted_moves,
        improving_moves,
        descent_moves,
        energy_history,
    }
}

/// Zero-temperature sweeps: takes every improving flip until a full sweep
/// makes none. Returns the number of flips made.
fn descend<P: BinaryProblem>(problem: &P, state: &mut [u8]) -> usize {
    let mut flips = 0;
    loop {
        let before = flips;
        for var in 0..problem.num_variables() {
            if problem.flip_delta(state, var) < -DESCENT_TOLERANCE {
                state[var] ^= 1;
                flips += 1;
            }
        }
        if flips == before {
            return flips;
        }
    }
}

/// Fills in unset temperatures from sampled flip deltas.
///
/// The initial temperature accepts an average uphill flip from a random
/// state with probability [`INITIAL_ACCEPTANCE`]. The minimum accepts the
/// smallest uphill flip out of a local minimum with probability
/// [`FINAL_ACCEPTANCE`].
fn resolve_temperatures<P: BinaryProblem>(
    problem: &P,
    config: &SaConfig,
    seed: u64,
) -> (f64, f64) {
    if let (Some(t0), Some(t_min)) = (config.initial_temperature, config.min_temperature) {
        return (t0, t_min);
    }

    let deltas = sample_uphill_deltas(problem, seed);
    let t0 = config
        .initial_temperature
        .unwrap_or(-deltas.average / INITIAL_ACCEPTANCE.ln());
    let t_min = config
        .min_temperature
        .unwrap_or(-deltas.smallest_settled / FINAL_ACCEPTANCE.ln());

    if t_min < t0 {
        (t0, t_min)
    } else if config.initial_temperature.is_some() {
        (t0, t0 * 1e-3)
    } else {
        (t_min * 1e3, t_min)
    }
}

/// Uphill flip statistics used for temperature estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
struct UphillDeltas {
    /// Mean strictly positive delta at random states.
    average: f64,

    /// Smallest strictly positive delta at greedily settled states.
    smallest_settled: f64,
}

/// Samples a few random states, then settles each one with [`descend`].
/// A flat landscape falls back to `1.0` for both.
fn sample_uphill_deltas<P: BinaryProblem>(problem: &P, seed: u64) -> UphillDeltas {
    let mut rng = create_rng(seed ^ 0x5eed_7e3f);
    let n = problem.num_variables();
    let mut sum = 0.0;
    let mut count = 0usize;
    let mut smallest = f64::INFINITY;

    for _ in 0..TEMPERATURE_SAMPLES {
        let mut state = problem.initial_state(&mut rng);
        for var in 0..n {
            let delta = problem.flip_delta(&state, var);
            if delta > DESCENT_TOLERANCE {
                sum += delta;
                count += 1;
            }
        }

        descend(problem, &mut state);
        for var in 0..n {
            let delta = problem.flip_delta(&state, var);
            if delta > DESCENT_TOLERANCE {
                smallest = smallest.min(delta);
            }
        }
    }

    let average = if count == 0 { 1.0 } else { sum / count as f64 };
    UphillDeltas {
        average,
        smallest_settled: if smallest.is_finite() {
            smallest.min(average)
        } else {
            average
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qubo::QuboModel;
    use crate::sa::CoolingSchedule;

    // ---- OneMax: minimize -(number of ones) ----

    struct OneMax {
        n: usize,
    }

    impl BinaryProblem for OneMax {
        fn num_variables(&self) -> usize {
            self.n
        }

        fn energy(&self, state: &[u8]) -> f64 {
            -(state.iter().filter(|&&x| x != 0).count() as f64)
        }

        fn flip_delta(&self, state: &[u8], var: usize) -> f64 {
            if state[var] != 0 {
                1.0
            } else {
                -1.0
            }
        }
    }

    /// Frustrated chain: neighbors prefer to differ, so the optimum
    /// alternates 0/1 with energy -(n / 2).
    fn alternating_chain(n: usize) -> QuboModel {
        let mut q = QuboModel::new(n);
        for i in 0..n {
            q.add_linear(i, -1.0);
        }
        for i in 0..n - 1 {
            q.add_quadratic(i, i + 1, 2.0);
        }
        q
    }

    #[test]
    fn test_sa_onemax() {
        let problem = OneMax { n: 50 };
        let config = SaConfig::default().with_num_sweeps(100).with_seed(42);

        let result = SaRunner::run(&problem, &config).unwrap();

        assert_eq!(result.best_energy, -50.0);
        assert!(result.best.iter().all(|&x| x == 1));
        assert!(result.improving_moves > 0);
    }

    #[test]
    fn test_sa_alternating_chain() {
        let n = 16;
        let compiled = alternating_chain(n).compile();
        let config = SaConfig::default()
            .with_num_sweeps(300)
            .with_num_reads(4)
            .with_seed(7);

        let result = SaRunner::run(&compiled, &config).unwrap();

        assert!(
            result.best_energy <= -(n as f64 / 2.0) + 1e-9,
            "expected alternating optimum, got {}",
            result.best_energy
        );
        assert!((compiled.energy(&result.best) - result.best_energy).abs() < 1e-9);
    }

    #[test]
    fn test_sa_linear_cooling() {
        let compiled = alternating_chain(20).compile();
        let config = SaConfig::default()
            .with_num_sweeps(300)
            .with_initial_temperature(5.0)
            .with_min_temperature(0.01)
            .with_cooling(CoolingSchedule::Linear)
            .with_num_reads(4)
            .with_seed(3);

        let result = SaRunner::run(&compiled, &config).unwrap();

        assert!(result.best_energy <= -10.0 + 1e-9);
        assert!((result.initial_temperature - 5.0).abs() < 1e-12);
        assert!((result.final_temperature - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_sa_is_reproducible_with_seed() {
        let compiled = alternating_chain(30).compile();
        let config = SaConfig::default().with_num_sweeps(50).with_seed(11);

        let a = SaRunner::run(&compiled, &config).unwrap();
        let b = SaRunner::run(&compiled, &config).unwrap();

        assert_eq!(a.best, b.best);
        assert_eq!(a.energy_history, b.energy_history);
    }

    #[test]
    fn test_sa_counts() {
        let problem = OneMax { n: 10 };
        let config = SaConfig::default()
            .with_num_sweeps(20)
            .with_num_reads(3)
            .with_seed(1);

        let result = SaRunner::run(&problem, &config).unwrap();

        assert_eq!(result.iterations, 3 * 20 * 10);
        assert_eq!(result.sweeps, 20);
        assert_eq!(result.read_energies.len(), 3);
        assert_eq!(result.energy_history.len(), 20);
        assert!(result.accepted_moves >= result.improving_moves);
    }

    #[test]
    fn test_sa_returns_best_read() {
        let compiled = alternating_chain(30).compile();
        let config = SaConfig::default()
            .with_num_sweeps(5)
            .with_num_reads(6)
            .with_seed(5);

        let result = SaRunner::run(&compiled, &config).unwrap();

        let min = result
            .read_energies
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        assert_eq!(result.best_energy, min);
    }

    #[test]
    fn test_sa_energy_history_non_increasing() {
        let compiled = alternating_chain(30).compile();
        let config = SaConfig::default().with_num_sweeps(100).with_seed(42);

        let result = SaRunner::run(&compiled, &config).unwrap();

        for window in result.energy_history.windows(2) {
            assert!(
                window[1] <= window[0] + 1e-10,
                "best energy history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_sa_high_temperature_accepts_uphill() {
        let problem = OneMax { n: 20 };
        let config = SaConfig::default()
            .with_num_sweeps(100)
            .with_initial_temperature(1e8)
            .with_min_temperature(1e7)
            .with_seed(42);

        let result = SaRunner::run(&problem, &config).unwrap();

        let acceptance_ratio = result.accepted_moves as f64 / result.iterations as f64;
        assert!(
            acceptance_ratio > 0.95,
            "expected high acceptance at high temp, got {acceptance_ratio}"
        );
    }

    #[test]
    fn test_sa_rejects_invalid_config() {
        let problem = OneMax { n: 4 };
        let config = SaConfig::default().with_num_sweeps(0);
        assert_eq!(
            SaRunner::run(&problem, &config).unwrap_err(),
            ConfigError::ZeroSweeps
        );
    }

    #[test]
    fn test_estimated_temperatures_are_ordered() {
        let compiled = alternating_chain(20).compile();
        let (t0, t_min) = resolve_temperatures(&compiled, &SaConfig::default(), 9);
        assert!(t0 > t_min && t_min > 0.0);
    }

    #[test]
    fn test_minimum_temperature_comes_from_settled_states() {
        // Every settled state of the chain has an isolated 1 whose flip
        // costs exactly 1.
        let compiled = alternating_chain(20).compile();
        let (_, t_min) = resolve_temperatures(&compiled, &SaConfig::default(), 9);
        assert!((t_min - 1.0 / 100f64.ln()).abs() < 1e-12, "t_min = {t_min}");
    }

    #[test]
    fn test_default_config_returns_local_minimum() {
        let compiled = alternating_chain(40).compile();
        for seed in 0..4 {
            let result = SaRunner::run(&compiled, &SaConfig::default().with_seed(seed)).unwrap();
            for var in 0..compiled.num_variables() {
                let delta = compiled.flip_delta(&result.best, var);
                assert!(delta >= -1e-9, "seed {seed}: flipping {var} improves by {delta}");
            }
            assert_eq!(result.energy_history.last(), Some(&result.best_energy));
        }
    }

    #[test]
    fn test_descent_stops_at_local_minimum() {
        let compiled = alternating_chain(12).compile();
        let mut state = vec![0u8; 12];
        let flips = descend(&compiled, &mut state);
        assert!(flips > 0);
        assert!((0..12).all(|v| compiled.flip_delta(&state, v) >= 0.0));
        assert_eq!(descend(&compiled, &mut state), 0);
    }

    #[test]
    fn test_flat_problem_still_runs() {
        let compiled = QuboModel::new(8).compile();
        let result = SaRunner::run(&compiled, &SaConfig::default().with_num_sweeps(3).with_seed(0))
            .unwrap();
        assert_eq!(result.best.len(), 8);
        assert_eq!(result.best_energy, 0.0);
    }
}
