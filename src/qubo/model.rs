//! Sparse QUBO coefficient map.

use super::compiled::CompiledQubo;
use std::collections::BTreeMap;

/// Sparse linear + quadratic coefficients over `num_variables` binaries.
///
/// Pair keys are normalized so that `i < j`. Iteration order is by key,
/// which keeps compilation deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuboModel {
    num_variables: usize,
    linear: BTreeMap<usize, f64>,
    quadratic: BTreeMap<(usize, usize), f64>,
    offset: f64,
}

impl QuboModel {
    /// Creates an empty model over `num_variables` variables.
    pub fn new(num_variables: usize) -> Self {
        Self {
            num_variables,
            ..Self::default()
        }
    }

    /// Adds `coeff * x_i`.
    pub fn add_linear(&mut self, i: usize, coeff: f64) {
        debug_assert!(i < self.num_variables, "variable {i} out of range");
        *self.linear.entry(i).or_insert(0.0) += coeff;
    }

    /// Adds `coeff * x_i * x_j`. A self-pair folds into the linear term.
    pub fn add_quadratic(&mut self, i: usize, j: usize, coeff: f64) {
        debug_assert!(
            i < self.num_variables && j < self.num_variables,
            "pair ({i}, {j}) out of range"
        );
        if i == j {
            self.add_linear(i, coeff);
            return;
        }
        let key = if i < j { (i, j) } else { (j, i) };
        *self.quadratic.entry(key).or_insert(0.0) += coeff;
    }

    /// Adds a constant to the energy.
    pub fn add_offset(&mut self, value: f64) {
        self.offset += value;
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Linear coefficient of `x_i` (0 if absent).
    pub fn linear(&self, i: usize) -> f64 {
        self.linear.get(&i).copied().unwrap_or(0.0)
    }

    /// Pair coefficient of `x_i * x_j` (0 if absent), order-insensitive.
    pub fn quadratic(&self, i: usize, j: usize) -> f64 {
        let key = if i < j { (i, j) } else { (j, i) };
        self.quadratic.get(&key).copied().unwrap_or(0.0)
    }

    pub fn linear_terms(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.linear.iter().map(|(&i, &c)| (i, c))
    }

    pub fn quadratic_terms(&self) -> impl Iterator<Item = ((usize, usize), f64)> + '_ {
        self.quadratic.iter().map(|(&k, &c)| (k, c))
    }

    /// Number of stored pair coefficients.
    pub fn num_interactions(&self) -> usize {
        self.quadratic.len()
    }

    /// Highest polynomial degree with a non-zero coefficient.
    pub fn degree(&self) -> usize {
        if self.quadratic.values().any(|&c| c != 0.0) {
            2
        } else if self.linear.values().any(|&c| c != 0.0) {
            1
        } else {
            0
        }
    }

    /// True if the offset and every coefficient are finite.
    pub fn is_finite(&self) -> bool {
        self.offset.is_finite()
            && self.linear.values().all(|c| c.is_finite())
            && self.quadratic.values().all(|c| c.is_finite())
    }

    /// Evaluates the model for a full assignment (`state[i]` is 0 or 1).
    pub fn energy(&self, state: &[u8]) -> f64 {
        debug_assert_eq!(state.len(), self.num_variables);
        let linear: f64 = self
            .linear
            .iter()
            .filter(|(&i, _)| state[i] != 0)
            .map(|(_, &c)| c)
            .sum();
        let quadratic: f64 = self
            .quadratic
            .iter()
            .filter(|(&(i, j), _)| state[i] != 0 && state[j] != 0)
            .map(|(_, &c)| c)
            .sum();
        self.offset + linear + quadratic
    }

    /// Compiles to dense adjacency form, dropping zero coefficients.
    pub fn compile(&self) -> CompiledQubo {
        let mut linear = vec![0.0; self.num_variables];
        for (&i, &c) in &self.linear {
            linear[i] = c;
        }
        let mut neighbors = vec![Vec::new(); self.num_variables];
        for (&(i, j), &c) in &self.quadratic {
            if c != 0.0 {
                neighbors[i].push((j, c));
                neighbors[j].push((i, c));
            }
        }
        CompiledQubo::new(linear, neighbors, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_keys_are_normalized() {
        let mut q = QuboModel::new(4);
        q.add_quadratic(3, 1, 2.0);
        q.add_quadratic(1, 3, 0.5);
        assert_eq!(q.num_interactions(), 1);
        assert!((q.quadratic(1, 3) - 2.5).abs() < 1e-12);
        assert!((q.quadratic(3, 1) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_self_pair_folds_to_linear() {
        let mut q = QuboModel::new(2);
        q.add_quadratic(1, 1, 3.0);
        assert_eq!(q.num_interactions(), 0);
        assert!((q.linear(1) - 3.0).abs() < 1e-12);
        assert_eq!(q.degree(), 1);
    }

    #[test]
    fn test_energy_of_small_model() {
        // (x0 + x1 - 1)^2 = -x0 - x1 + 2 x0 x1 + 1
        let mut q = QuboModel::new(2);
        q.add_linear(0, -1.0);
        q.add_linear(1, -1.0);
        q.add_quadratic(0, 1, 2.0);
        q.add_offset(1.0);
        assert!((q.energy(&[0, 0]) - 1.0).abs() < 1e-12);
        assert!((q.energy(&[1, 0]) - 0.0).abs() < 1e-12);
        assert!((q.energy(&[0, 1]) - 0.0).abs() < 1e-12);
        assert!((q.energy(&[1, 1]) - 1.0).abs() < 1e-12);
        assert_eq!(q.degree(), 2);
    }

    #[test]
    fn test_compiled_matches_sparse_energy() {
        let mut q = QuboModel::new(3);
        q.add_linear(0, 1.5);
        q.add_linear(2, -4.0);
        q.add_quadratic(0, 2, 3.0);
        q.add_quadratic(1, 2, -1.0);
        q.add_offset(0.25);
        let c = q.compile();
        for bits in 0..8u8 {
            let state = [bits & 1, (bits >> 1) & 1, (bits >> 2) & 1];
            assert!((q.energy(&state) - c.energy(&state)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_non_finite_detected() {
        let mut q = QuboModel::new(1);
        assert!(q.is_finite());
        q.add_offset(f64::INFINITY);
        assert!(!q.is_finite());
    }
}
