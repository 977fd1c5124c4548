//! Core trait for binary Simulated Annealing.

use rand::Rng;

/// A minimization problem over a vector of binary variables.
///
/// The annealer only ever proposes single-bit flips, so the problem
/// supplies the exact energy change of a flip. Implementations should make
/// [`flip_delta`](BinaryProblem::flip_delta) much cheaper than a full
/// [`energy`](BinaryProblem::energy) evaluation.
///
/// # Examples
///
/// ```ignore
/// struct OneMax { n: usize }
///
/// impl BinaryProblem for OneMax {
///     fn num_variables(&self) -> usize { self.n }
///
///     fn energy(&self, state: &[u8]) -> f64 {
///         -(state.iter().filter(|&&x| x != 0).count() as f64)
///     }
///
///     fn flip_delta(&self, state: &[u8], var: usize) -> f64 {
///         if state[var] != 0 { 1.0 } else { -1.0 }
///     }
/// }
/// ```
pub trait BinaryProblem: Send + Sync {
    /// Number of binary variables.
    fn num_variables(&self) -> usize;

    /// Energy of a full assignment. Lower is better.
    fn energy(&self, state: &[u8]) -> f64;

    /// Energy change from toggling `state[var]`, leaving `state` unchanged.
    fn flip_delta(&self, state: &[u8], var: usize) -> f64;

    /// Creates a random starting assignment.
    fn initial_state<R: Rng>(&self, rng: &mut R) -> Vec<u8> {
        (0..self.num_variables())
            .map(|_| rng.random_range(0..2u8))
            .collect()
    }
}
