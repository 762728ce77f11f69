//! Generation stepping under a multi-state survival/spawn rule.
//!
//! All reads come from an immutable snapshot of generation N and all writes go
//! to a separate generation N+1 buffer, so no cell sees a neighbor's updated
//! value within the same tick. The buffer is split into x-slabs of `N²` cells;
//! slabs are independent and may be computed in any order or in parallel.

use rayon::prelude::*;
use rayon::ThreadPool;

use super::grid::CellSource;
use super::neighborhood::count_neighbors;
use super::rule::{RuleTable, TransitionPolicy};

/// Next state of one cell given its current state and live-neighbor count.
///
/// Decay-on-death:
/// - top state `S-1` stays at the top if `survival[c]`, else drops one state
/// - decaying states `0 < v < S-1` always drop one state
/// - dead cells become `(S-1) * spawn[c]`
///
/// Decrement-then-boost:
/// - live cells become `v - 1 + survival[c]`
/// - dead cells become `(S-1) * spawn[c]`
#[inline]
pub fn next_state(rule: &RuleTable, current: u8, count: u8) -> u8 {
    let top = rule.top_state();
    if current == 0 {
        return top * rule.spawns(count);
    }
    match rule.policy() {
        TransitionPolicy::DecayOnDeath => {
            if current == top {
                current - (1 - rule.survives(count))
            } else {
                current - 1
            }
        }
        TransitionPolicy::DecrementThenBoost => current - 1 + rule.survives(count),
    }
}

/// Whether `next_state` reads the neighbor count for a cell in `current`.
#[inline]
fn needs_count(rule: &RuleTable, current: u8) -> bool {
    match rule.policy() {
        TransitionPolicy::DecayOnDeath => current == 0 || current == rule.top_state(),
        TransitionPolicy::DecrementThenBoost => true,
    }
}

/// Compute slab `x` of the next generation into `out` (`N²` cells, y-major).
pub fn step_slab<S: CellSource + ?Sized>(snapshot: &S, rule: &RuleTable, x: usize, out: &mut [u8]) {
    let n = snapshot.side();
    debug_assert_eq!(out.len(), n * n);

    for y in 0..n {
        for z in 0..n {
            let current = snapshot.cell(x, y, z);
            let count = if needs_count(rule, current) {
                count_neighbors(
                    snapshot,
                    rule.neighborhood(),
                    rule.alive_predicate(),
                    rule.state_count(),
                    x,
                    y,
                    z,
                )
            } else {
                0
            };
            out[y * n + z] = next_state(rule, current, count);
        }
    }
}

/// Step every slab on the calling thread.
pub fn step_sequential<S: CellSource + ?Sized>(snapshot: &S, rule: &RuleTable, out: &mut [u8]) {
    let n = snapshot.side();
    for (x, slab) in out.chunks_mut(n * n).enumerate() {
        step_slab(snapshot, rule, x, slab);
    }
}

/// Step every slab on `pool`, returning once all slabs are written.
pub fn step_parallel<S: CellSource + Sync + ?Sized>(
    snapshot: &S,
    rule: &RuleTable,
    out: &mut [u8],
    pool: &ThreadPool,
) {
    let n = snapshot.side();
    pool.install(|| {
        out.par_chunks_mut(n * n)
            .enumerate()
            .for_each(|(x, slab)| step_slab(snapshot, rule, x, slab));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::grid::Grid;
    use crate::automaton::neighborhood::Neighborhood;

    fn step(grid: &Grid, rule: &RuleTable) -> Grid {
        let mut next = grid.clone();
        step_sequential(grid, rule, next.cells_mut());
        next
    }

    #[test]
    fn test_next_state_decay_on_death() {
        let rule = RuleTable::rule_445();

        // Dead cell spawns only on exactly 4
        assert_eq!(next_state(&rule, 0, 4), 4);
        assert_eq!(next_state(&rule, 0, 3), 0);
        assert_eq!(next_state(&rule, 0, 5), 0);

        // Top state survives on 4, else starts decaying
        assert_eq!(next_state(&rule, 4, 4), 4);
        assert_eq!(next_state(&rule, 4, 0), 3);

        // Decaying states ignore neighbors
        assert_eq!(next_state(&rule, 3, 4), 2);
        assert_eq!(next_state(&rule, 2, 4), 1);
        assert_eq!(next_state(&rule, 1, 4), 0);
    }

    #[test]
    fn test_next_state_decrement_then_boost() {
        let rule = RuleTable::rule_445().with_policy(TransitionPolicy::DecrementThenBoost);

        assert_eq!(next_state(&rule, 0, 4), 4);
        assert_eq!(next_state(&rule, 0, 2), 0);
        assert_eq!(next_state(&rule, 4, 4), 4);
        assert_eq!(next_state(&rule, 4, 1), 3);
        // A decaying cell with the right neighbors holds its state
        assert_eq!(next_state(&rule, 2, 4), 2);
        assert_eq!(next_state(&rule, 2, 3), 1);
        assert_eq!(next_state(&rule, 1, 3), 0);
    }

    #[test]
    fn test_two_state_rule_is_binary_life() {
        let rule = RuleTable::from_counts(&[4], &[4], 2, Neighborhood::Moore).unwrap();
        assert_eq!(next_state(&rule, 1, 4), 1);
        assert_eq!(next_state(&rule, 1, 3), 0);
        assert_eq!(next_state(&rule, 0, 4), 1);
    }

    #[test]
    fn test_step_b4s4_cross() {
        let rule = RuleTable::from_counts(&[4], &[4], 2, Neighborhood::Moore).unwrap();
        let mut grid = Grid::new(8, 2).unwrap();
        for (x, y, z) in [(4, 4, 4), (3, 4, 4), (5, 4, 4), (4, 3, 4), (4, 5, 4)] {
            grid.set(x, y, z, 1).unwrap();
        }

        let next = step(&grid, &rule);

        // Center had 4 neighbors, survives
        assert_eq!(next.get(4, 4, 4).unwrap(), 1);
        // Each arm had 3 neighbors, dies
        assert_eq!(next.get(3, 4, 4).unwrap(), 0);
        assert_eq!(next.get(4, 5, 4).unwrap(), 0);
        // Diagonal cell between two arms sees center + 2 arms: no spawn
        assert_eq!(next.get(3, 3, 4).unwrap(), 0);
    }

    #[test]
    fn test_step_reads_only_the_snapshot() {
        // A line of three top-state cells: if writes leaked into reads, the
        // update order along x would change the outcome.
        let rule = RuleTable::from_counts(&[2], &[2], 3, Neighborhood::VonNeumann).unwrap();
        let mut grid = Grid::new(5, 3).unwrap();
        for x in 1..4 {
            grid.set(x, 2, 2, 2).unwrap();
        }

        let next = step(&grid, &rule);

        // Ends have 1 neighbor: decay; middle has 2: survives
        assert_eq!(next.get(1, 2, 2).unwrap(), 1);
        assert_eq!(next.get(2, 2, 2).unwrap(), 2);
        assert_eq!(next.get(3, 2, 2).unwrap(), 1);
        // Cell beside the middle touches only the middle: no spawn
        assert_eq!(next.get(2, 1, 2).unwrap(), 0);
    }

    #[test]
    fn test_empty_grid_stays_empty() {
        let grid = Grid::new(4, 5).unwrap();
        let next = step(&grid, &RuleTable::rule_445());
        assert!(next.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        use rand::SeedableRng;
        use rand_chacha::ChaCha8Rng;

        let mut grid = Grid::new(9, 5).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        grid.populate(crate::config::ResetPolicy::Uniform, &mut rng);
        let rule = RuleTable::rule_445();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .unwrap();
        let mut parallel = grid.clone();
        step_parallel(&grid, &rule, parallel.cells_mut(), &pool);

        assert_eq!(parallel, step(&grid, &rule));
    }
}
