//! Grid storage, cell access, toroidal wrap and population.

use std::fmt;

use rand::Rng;

use crate::automaton::neighborhood::Offset;
use crate::config::ResetPolicy;
use crate::error::{ConfigError, EngineError};

/// Smallest side length for which every neighbor of a cell is a distinct cell.
pub const MIN_SIDE: usize = 3;

/// Largest side length accepted; keeps `N³` comfortably allocatable.
pub const MAX_SIDE: usize = 1024;

/// Largest number of states a byte-sized cell can hold.
pub const MAX_STATES: usize = 256;

/// Read access to a generation of cells through toroidal topology.
///
/// Implemented by [`Grid`] (wrap by modular arithmetic) and by
/// [`HaloGrid`](crate::automaton::halo::HaloGrid) (wrap by materialized border
/// planes). Both must agree for every cell and offset.
pub trait CellSource {
    /// Side length `N` of the logical grid.
    fn side(&self) -> usize;

    /// State of the cell at `(x, y, z) + offset`, wrapped on every axis.
    ///
    /// `(x, y, z)` must lie in `[0, N-1]`; offsets are unit steps.
    fn wrapped(&self, x: usize, y: usize, z: usize, offset: Offset) -> u8;

    #[inline]
    fn cell(&self, x: usize, y: usize, z: usize) -> u8 {
        self.wrapped(x, y, z, [0, 0, 0])
    }
}

/// Resolve `coord + delta` on a circular axis of length `side`.
#[inline]
pub fn wrap(coord: usize, delta: i8, side: usize) -> usize {
    (coord as isize + delta as isize).rem_euclid(side as isize) as usize
}

/// A cubic grid of cell states in one contiguous buffer.
///
/// Layout is x-major: the cell `(x, y, z)` lives at `x*N*N + y*N + z`, so each
/// x-slab of `N²` cells is contiguous.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    side: usize,
    state_count: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Allocate an all-dead grid.
    pub fn new(side: usize, state_count: usize) -> Result<Self, ConfigError> {
        check_shape(side, state_count)?;
        Ok(Grid {
            side,
            state_count,
            cells: vec![0; side * side * side],
        })
    }

    /// Build a grid from an x-major buffer of exactly `N³` cells, checking every state.
    pub fn from_cells(side: usize, state_count: usize, cells: Vec<u8>) -> Result<Self, EngineError> {
        check_shape(side, state_count)?;
        let expected = side * side * side;
        if cells.len() != expected {
            return Err(EngineError::CellCount {
                expected,
                got: cells.len(),
            });
        }
        if let Some(&value) = cells.iter().find(|&&v| v as usize >= state_count) {
            return Err(EngineError::InvalidState { value, state_count });
        }
        Ok(Grid {
            side,
            state_count,
            cells,
        })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn state_count(&self) -> usize {
        self.state_count
    }

    /// Raw x-major cell buffer.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }

    /// Calculate the linear index for a 3D coordinate.
    #[inline]
    pub fn index_of(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.side + y) * self.side + z
    }

    /// Check if coordinates are within grid bounds.
    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.side && y < self.side && z < self.side
    }

    fn checked_index(&self, x: usize, y: usize, z: usize) -> Result<usize, EngineError> {
        if self.in_bounds(x, y, z) {
            Ok(self.index_of(x, y, z))
        } else {
            Err(EngineError::OutOfRange {
                x,
                y,
                z,
                size: self.side,
            })
        }
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> Result<u8, EngineError> {
        let idx = self.checked_index(x, y, z)?;
        Ok(self.cells[idx])
    }

    pub fn set(&mut self, x: usize, y: usize, z: usize, value: u8) -> Result<(), EngineError> {
        let idx = self.checked_index(x, y, z)?;
        if value as usize >= self.state_count {
            return Err(EngineError::InvalidState {
                value,
                state_count: self.state_count,
            });
        }
        self.cells[idx] = value;
        Ok(())
    }

    /// Kill every cell.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Number of cells in any nonzero state.
    pub fn live_cells(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Assign every cell an independent random state under `policy`.
    pub fn populate<R: Rng + ?Sized>(&mut self, policy: ResetPolicy, rng: &mut R) {
        let states = self.state_count;
        match policy {
            ResetPolicy::Biased { alive_probability } => {
                for cell in self.cells.iter_mut() {
                    *cell = if rng.gen_bool(alive_probability) {
                        rng.gen_range(1..states) as u8
                    } else {
                        0
                    };
                }
            }
            ResetPolicy::Uniform => {
                for cell in self.cells.iter_mut() {
                    *cell = rng.gen_range(0..states) as u8;
                }
            }
        }
    }
}

fn check_shape(side: usize, state_count: usize) -> Result<(), ConfigError> {
    if !(MIN_SIDE..=MAX_SIDE).contains(&side) {
        return Err(ConfigError::GridSize {
            size: side,
            min: MIN_SIDE,
            max: MAX_SIDE,
        });
    }
    if state_count < 2 {
        return Err(ConfigError::TooFewStates(state_count));
    }
    if state_count > MAX_STATES {
        return Err(ConfigError::TooManyStates(state_count));
    }
    Ok(())
}

impl CellSource for Grid {
    fn side(&self) -> usize {
        self.side
    }

    #[inline]
    fn wrapped(&self, x: usize, y: usize, z: usize, offset: Offset) -> u8 {
        let [dx, dy, dz] = offset;
        let idx = self.index_of(
            wrap(x, dx, self.side),
            wrap(y, dy, self.side),
            wrap(z, dz, self.side),
        );
        self.cells[idx]
    }
}

/// One line per x-layer, each y-row of z cells closed by `|`.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat((self.side + 1) * self.side);
        writeln!(f, "{rule}")?;
        for x in 0..self.side {
            for y in 0..self.side {
                for z in 0..self.side {
                    let c = if self.cells[self.index_of(x, y, z)] == 0 {
                        ' '
                    } else {
                        '█'
                    };
                    write!(f, "{c}")?;
                }
                write!(f, "|")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_create_grid() {
        let grid = Grid::new(8, 5).unwrap();
        assert_eq!(grid.side(), 8);
        assert_eq!(grid.state_count(), 5);
        assert_eq!(grid.cells().len(), 512);
        assert!(grid.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_create_grid_rejects_bad_shapes() {
        assert!(matches!(
            Grid::new(2, 5),
            Err(ConfigError::GridSize { size: 2, .. })
        ));
        assert!(matches!(Grid::new(4, 1), Err(ConfigError::TooFewStates(1))));
        assert!(matches!(
            Grid::new(4, 257),
            Err(ConfigError::TooManyStates(257))
        ));
    }

    #[test]
    fn test_index_of() {
        let grid = Grid::new(4, 2).unwrap();

        // First cell
        assert_eq!(grid.index_of(0, 0, 0), 0);
        // Last cell
        assert_eq!(grid.index_of(3, 3, 3), 63);
        // z is fastest, x slowest
        assert_eq!(grid.index_of(0, 0, 1), 1);
        assert_eq!(grid.index_of(0, 1, 0), 4);
        assert_eq!(grid.index_of(1, 0, 0), 16);
    }

    #[test]
    fn test_in_bounds() {
        let grid = Grid::new(4, 2).unwrap();

        assert!(grid.in_bounds(0, 0, 0));
        assert!(grid.in_bounds(3, 3, 3));
        assert!(grid.in_bounds(2, 2, 2));

        assert!(!grid.in_bounds(4, 0, 0));
        assert!(!grid.in_bounds(0, 4, 0));
        assert!(!grid.in_bounds(0, 0, 4));
    }

    #[test]
    fn test_get_and_set() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set(1, 2, 3, 4).unwrap();
        assert_eq!(grid.get(1, 2, 3).unwrap(), 4);
        assert_eq!(grid.get(3, 2, 1).unwrap(), 0);
        assert_eq!(grid.live_cells(), 1);
    }

    #[test]
    fn test_out_of_range_access_fails() {
        let mut grid = Grid::new(5, 5).unwrap();
        assert!(matches!(
            grid.get(5, 0, 0),
            Err(EngineError::OutOfRange { x: 5, size: 5, .. })
        ));
        assert!(matches!(
            grid.set(0, 0, 9, 1),
            Err(EngineError::OutOfRange { z: 9, .. })
        ));
        // Nothing was written
        assert_eq!(grid.live_cells(), 0);
    }

    #[test]
    fn test_set_rejects_state_above_count() {
        let mut grid = Grid::new(4, 5).unwrap();
        assert!(matches!(
            grid.set(0, 0, 0, 5),
            Err(EngineError::InvalidState {
                value: 5,
                state_count: 5
            })
        ));
    }

    #[test]
    fn test_from_cells_validates_states() {
        let mut cells = vec![0u8; 27];
        cells[13] = 3;
        assert!(matches!(
            Grid::from_cells(3, 3, cells.clone()),
            Err(EngineError::InvalidState { value: 3, .. })
        ));
        let grid = Grid::from_cells(3, 4, cells).unwrap();
        assert_eq!(grid.get(1, 1, 1).unwrap(), 3);

        assert!(matches!(
            Grid::from_cells(3, 4, vec![0; 10]),
            Err(EngineError::CellCount {
                expected: 27,
                got: 10
            })
        ));
    }

    #[test]
    fn test_from_cells_rejects_oversized_buffer() {
        assert!(matches!(
            Grid::from_cells(3, 2, vec![1; 28]),
            Err(EngineError::CellCount {
                expected: 27,
                got: 28
            })
        ));
    }

    #[test]
    fn test_wrap_on_each_side() {
        assert_eq!(wrap(0, -1, 5), 4);
        assert_eq!(wrap(4, 1, 5), 0);
        assert_eq!(wrap(2, 1, 5), 3);
        assert_eq!(wrap(2, 0, 5), 2);
    }

    #[test]
    fn test_wrapped_lookup_crosses_faces_edges_and_vertices() {
        let mut grid = Grid::new(5, 2).unwrap();
        grid.set(4, 2, 2, 1).unwrap();
        grid.set(4, 4, 2, 1).unwrap();
        grid.set(4, 4, 4, 1).unwrap();

        // Face: (0,2,2) looking at -x
        assert_eq!(grid.wrapped(0, 2, 2, [-1, 0, 0]), 1);
        // Edge: (0,0,2) looking at -x,-y
        assert_eq!(grid.wrapped(0, 0, 2, [-1, -1, 0]), 1);
        // Vertex: (0,0,0) looking at -x,-y,-z
        assert_eq!(grid.wrapped(0, 0, 0, [-1, -1, -1]), 1);
        // And the reverse direction
        assert_eq!(grid.wrapped(4, 4, 4, [1, 1, 1]), 0);
        grid.set(0, 0, 0, 1).unwrap();
        assert_eq!(grid.wrapped(4, 4, 4, [1, 1, 1]), 1);
    }

    #[test]
    fn test_populate_zero_probability_is_all_dead() {
        let mut grid = Grid::new(6, 5).unwrap();
        grid.set(1, 1, 1, 3).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        grid.populate(
            ResetPolicy::Biased {
                alive_probability: 0.0,
            },
            &mut rng,
        );
        assert!(grid.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_populate_full_probability_is_all_alive() {
        let mut grid = Grid::new(6, 5).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        grid.populate(
            ResetPolicy::Biased {
                alive_probability: 1.0,
            },
            &mut rng,
        );
        assert!(grid.cells().iter().all(|&c| (1..5).contains(&c)));
    }

    #[test]
    fn test_populate_uniform_covers_dead_state() {
        let mut grid = Grid::new(10, 3).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        grid.populate(ResetPolicy::Uniform, &mut rng);
        assert!(grid.cells().iter().all(|&c| c < 3));
        // 1000 draws over 3 states: every state shows up
        for state in 0..3u8 {
            assert!(grid.cells().contains(&state));
        }
    }

    #[test]
    fn test_display_layers() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.set(0, 0, 0, 1).unwrap();
        grid.set(2, 1, 2, 1).unwrap();
        let text = grid.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "-".repeat(12));
        assert_eq!(lines[1], "█  |   |   |");
        assert_eq!(lines[2], "   |   |   |");
        assert_eq!(lines[3], "   |  █|   |");
        assert_eq!(lines[4], "-".repeat(12));
    }
}
