//! Dense adjacency form of a QUBO, used by the annealer.

use crate::sa::BinaryProblem;

/// Compiled QUBO: dense linear terms and per-variable neighbor lists.
///
/// Each pair coefficient appears in both endpoints' neighbor lists so the
/// local field of any variable is a single scan of its list.
#[derive(Debug, Clone)]
pub struct CompiledQubo {
    linear: Vec<f64>,
    neighbors: Vec<Vec<(usize, f64)>>,
    offset: f64,
}

impl CompiledQubo {
    pub(super) fn new(linear: Vec<f64>, neighbors: Vec<Vec<(usize, f64)>>, offset: f64) -> Self {
        Self {
            linear,
            neighbors,
            offset,
        }
    }

    pub fn num_variables(&self) -> usize {
        self.linear.len()
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Number of stored pair coefficients touching `i`.
    pub fn degree_of(&self, i: usize) -> usize {
        self.neighbors[i].len()
    }

    /// `h_i + sum_j J_ij x_j`: energy change per unit increase of `x_i`.
    #[inline]
    pub fn local_field(&self, state: &[u8], i: usize) -> f64 {
        self.neighbors[i]
            .iter()
            .filter(|&&(j, _)| state[j] != 0)
            .fold(self.linear[i], |acc, &(_, c)| acc + c)
    }

    /// Energy change from flipping `x_i`.
    #[inline]
    pub fn flip_delta(&self, state: &[u8], i: usize) -> f64 {
        let field = self.local_field(state, i);
        if state[i] != 0 {
            -field
        } else {
            field
        }
    }

    pub fn energy(&self, state: &[u8]) -> f64 {
        debug_assert_eq!(state.len(), self.linear.len());
        let mut energy = self.offset;
        for (i, &x) in state.iter().enumerate() {
            if x == 0 {
                continue;
            }
            energy += self.linear[i];
            // Count each pair once from its lower endpoint.
            energy += self.neighbors[i]
                .iter()
                .filter(|&&(j, _)| j > i && state[j] != 0)
                .map(|&(_, c)| c)
                .sum::<f64>();
        }
        energy
    }
}

impl BinaryProblem for CompiledQubo {
    fn num_variables(&self) -> usize {
        self.linear.len()
    }

    fn energy(&self, state: &[u8]) -> f64 {
        CompiledQubo::energy(self, state)
    }

    fn flip_delta(&self, state: &[u8], var: usize) -> f64 {
        CompiledQubo::flip_delta(self, state, var)
    }
}
