/*
 *  SPDX-License-Identifier: Apache-2.0 OR MIT
 *  © 2020-2022 ETH Zurich and other contributors, see AUTHORS.txt for details
 */

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

use ordered_float::NotNan;
use rustc_hash::{FxHashMap, FxHashSet};

/// The cost of a path.
pub type Cost = NotNan<f32>;

/// A cell of a grid level.
pub type Cell = (i32, i32);

// SAFETY: 0, 1 and sqrt(2) are not NaN
pub const COST_ZERO: Cost = unsafe { NotNan::new_unchecked(0.) };
const COST_STRAIGHT: Cost = unsafe { NotNan::new_unchecked(1.) };
const COST_DIAGONAL: Cost = unsafe { NotNan::new_unchecked(std::f32::consts::SQRT_2) };

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct Frontier<N> {
    cost: Cost,
    node: N,
}

impl<N: Ord> Ord for Frontier<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed, BinaryHeap is a max-heap
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl<N: Ord> PartialOrd for Frontier<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Searches a minimal-cost path from `initial` to `destination` with Dijkstra's algorithm.
///
/// `adj` returns the neighbours of a node with the non-negative cost of reaching them.
/// Returns the nodes of the path from `initial` to `destination` inclusive, None if unreachable.
pub fn dijkstras_shortest_path<N, F>(initial: N, destination: N, adj: F) -> Option<Vec<N>>
where
    N: Copy + Ord + Hash,
    F: Fn(N) -> Vec<(Cost, N)>,
{
    let mut dist = FxHashMap::default();
    let mut prev = FxHashMap::default();
    let mut queue = BinaryHeap::new();
    dist.insert(initial, COST_ZERO);
    queue.push(Frontier {
        cost: COST_ZERO,
        node: initial,
    });

    while let Some(Frontier { cost, node }) = queue.pop() {
        if node == destination {
            let mut path = vec![node];
            let mut current = node;
            while let Some(&previous) = prev.get(&current) {
                path.push(previous);
                current = previous;
            }
            path.reverse();
            log::debug!("Found path of {} nodes with cost {cost}", path.len());
            return Some(path);
        }

        // Skip entries superseded by a cheaper one
        if dist.get(&node).map_or(false, |best| cost > *best) {
            continue;
        }

        for (edge_cost, neighbor) in adj(node) {
            let total = cost + edge_cost;
            if dist.get(&neighbor).map_or(true, |known| total < *known) {
                dist.insert(neighbor, total);
                prev.insert(neighbor, node);
                queue.push(Frontier {
                    cost: total,
                    node: neighbor,
                });
            }
        }
    }

    log::debug!("No path to destination after visiting {} nodes", dist.len());
    None
}

/// Computes the minimal cost from `initial` to every reachable node.
pub fn dijkstras_shortest_path_to_all<N, F>(initial: N, adj: F) -> FxHashMap<N, Cost>
where
    N: Copy + Ord + Hash,
    F: Fn(N) -> Vec<(Cost, N)>,
{
    let mut dist = FxHashMap::default();
    let mut queue = BinaryHeap::new();
    dist.insert(initial, COST_ZERO);
    queue.push(Frontier {
        cost: COST_ZERO,
        node: initial,
    });

    while let Some(Frontier { cost, node }) = queue.pop() {
        if dist.get(&node).map_or(false, |best| cost > *best) {
            continue;
        }
        for (edge_cost, neighbor) in adj(node) {
            let total = cost + edge_cost;
            if dist.get(&neighbor).map_or(true, |known| total < *known) {
                dist.insert(neighbor, total);
                queue.push(Frontier {
                    cost: total,
                    node: neighbor,
                });
            }
        }
    }

    dist
}

/// Returns the walkable cells among the 8 neighbours of `cell`, with a cost of 1 or sqrt(2) for diagonals.
pub fn navigation_edges(spaces: &FxHashSet<Cell>, (x, y): Cell) -> Vec<(Cost, Cell)> {
    let mut edges = Vec::with_capacity(8);
    for dx in -1..=1 {
        for dy in -1..=1 {
            let next = (x + dx, y + dy);
            let cost = match (dx, dy) {
                (0, 0) => continue,
                (0, _) | (_, 0) => COST_STRAIGHT,
                _ => COST_DIAGONAL,
            };
            if spaces.contains(&next) {
                edges.push((cost, next));
            }
        }
    }
    edges
}
