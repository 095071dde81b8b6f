//! Precedence graph between stations.
//!
//! Two `N×N` matrices indexed by station index:
//! - `adjacency[i][j] = 1` iff station `i` directly feeds station `j`
//! - `input_ratio[i][j]`: units of `i` consumed per unit produced by `j`
//!
//! The graph is immutable once built and can be shared across
//! concurrent simulations.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Material flow graph of the production line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecedenceGraph {
    adjacency: Vec<Vec<u8>>,
    input_ratio: Vec<Vec<f64>>,
    /// Stations ordered predecessors-first. Shorter than the station
    /// count when the graph contains a cycle.
    order: Vec<usize>,
}

impl PrecedenceGraph {
    /// Builds the graph from `(from, to, ratio)` links.
    ///
    /// Links pointing outside `0..size` are ignored; the builder rejects
    /// them before this point.
    pub fn from_links(size: usize, links: &[(usize, usize, f64)]) -> Self {
        let mut adjacency = vec![vec![0u8; size]; size];
        let mut input_ratio = vec![vec![0.0; size]; size];
        for &(from, to, ratio) in links {
            if from < size && to < size {
                adjacency[from][to] = 1;
                input_ratio[from][to] = ratio;
            }
        }
        let order = topological_order(&adjacency);
        Self {
            adjacency,
            input_ratio,
            order,
        }
    }

    /// Number of stations.
    #[inline]
    pub fn size(&self) -> usize {
        self.adjacency.len()
    }

    /// Whether `from` directly feeds `to` (0 or 1).
    #[inline]
    pub fn adjacency(&self, from: usize, to: usize) -> u8 {
        self.adjacency[from][to]
    }

    /// Units of `from` consumed per unit of `to`.
    #[inline]
    pub fn input_ratio(&self, from: usize, to: usize) -> f64 {
        self.input_ratio[from][to]
    }

    /// Direct predecessors of a station, ascending.
    pub fn predecessors(&self, station: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.size()).filter(move |&p| self.adjacency[p][station] == 1)
    }

    /// Direct successors of a station, ascending.
    pub fn successors(&self, station: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.size()).filter(move |&s| self.adjacency[station][s] == 1)
    }

    /// Whether the station has no predecessors.
    pub fn is_input(&self, station: usize) -> bool {
        self.predecessors(station).next().is_none()
    }

    /// Whether the station has no successors.
    pub fn is_output(&self, station: usize) -> bool {
        self.successors(station).next().is_none()
    }

    /// Stations ordered so that every predecessor precedes its successors.
    pub fn topological_order(&self) -> &[usize] {
        &self.order
    }

    /// Whether every station appears in the topological order.
    pub fn is_acyclic(&self) -> bool {
        self.order.len() == self.size()
    }
}

/// Kahn's algorithm. Ready stations are queued FIFO, seeded in index order.
///
/// # Reference
/// Kahn (1962), "Topological sorting of large networks"
fn topological_order(adjacency: &[Vec<u8>]) -> Vec<usize> {
    let n = adjacency.len();
    let mut in_degree: Vec<usize> = (0..n)
        .map(|j| (0..n).filter(|&i| adjacency[i][j] == 1).count())
        .collect();
    let mut ready: VecDeque<usize> = (0..n).filter(|&j| in_degree[j] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while let Some(node) = ready.pop_front() {
        order.push(node);
        for next in 0..n {
            if adjacency[node][next] == 1 {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.push_back(next);
                }
            }
        }
    }
    order
}
