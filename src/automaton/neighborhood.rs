//! Neighborhood shapes and live-neighbor counting.

use serde::Deserialize;

use crate::automaton::grid::CellSource;
use crate::error::ConfigError;

/// Unit step from a cell to one of its neighbors, as `[dx, dy, dz]`.
pub type Offset = [i8; 3];

/// Moore neighborhood: 26 surrounding cells (3x3x3 minus center)
pub static MOORE_OFFSETS: [Offset; 26] = [
    // x = -1
    [-1, -1, -1],
    [-1, -1, 0],
    [-1, -1, 1],
    [-1, 0, -1],
    [-1, 0, 0],
    [-1, 0, 1],
    [-1, 1, -1],
    [-1, 1, 0],
    [-1, 1, 1],
    // x = 0, skipping the center
    [0, -1, -1],
    [0, -1, 0],
    [0, -1, 1],
    [0, 0, -1],
    [0, 0, 1],
    [0, 1, -1],
    [0, 1, 0],
    [0, 1, 1],
    // x = 1
    [1, -1, -1],
    [1, -1, 0],
    [1, -1, 1],
    [1, 0, -1],
    [1, 0, 0],
    [1, 0, 1],
    [1, 1, -1],
    [1, 1, 0],
    [1, 1, 1],
];

/// Von Neumann neighborhood: 6 face-adjacent cells
pub static VON_NEUMANN_OFFSETS: [Offset; 6] = [
    [-1, 0, 0],
    [1, 0, 0],
    [0, -1, 0],
    [0, 1, 0],
    [0, 0, -1],
    [0, 0, 1],
];

/// Which cells count as neighbors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Neighborhood {
    /// 26 neighbors within Chebyshev distance 1.
    #[default]
    Moore,
    /// 6 axis-aligned neighbors.
    VonNeumann,
}

impl Neighborhood {
    pub fn offsets(self) -> &'static [Offset] {
        match self {
            Neighborhood::Moore => &MOORE_OFFSETS,
            Neighborhood::VonNeumann => &VON_NEUMANN_OFFSETS,
        }
    }

    /// Highest neighbor count this shape can produce.
    pub fn max_neighbors(self) -> usize {
        self.offsets().len()
    }

    /// Letter used in rule notation.
    pub fn letter(self) -> char {
        match self {
            Neighborhood::Moore => 'M',
            Neighborhood::VonNeumann => 'N',
        }
    }

    /// Parse the neighborhood field of rule notation.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "moore" => Ok(Neighborhood::Moore),
            "n" | "vn" | "vonneumann" | "von_neumann" => Ok(Neighborhood::VonNeumann),
            _ => Err(ConfigError::Neighborhood(s.trim().to_string())),
        }
    }
}

/// Which stored states count as alive when tallying neighbors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlivePredicate {
    /// Any nonzero state, including cells that are decaying.
    #[default]
    NonZero,
    /// Only cells at the top state `S-1`.
    MaxState,
}

impl AlivePredicate {
    #[inline]
    pub fn is_alive(self, state: u8, state_count: usize) -> bool {
        match self {
            AlivePredicate::NonZero => state != 0,
            AlivePredicate::MaxState => state as usize == state_count - 1,
        }
    }
}

/// Count alive neighbors of `(x, y, z)` in `source`, wrapping on every axis.
///
/// Returns a value in `[0, 26]` for Moore and `[0, 6]` for von Neumann.
pub fn count_neighbors<S: CellSource + ?Sized>(
    source: &S,
    neighborhood: Neighborhood,
    alive: AlivePredicate,
    state_count: usize,
    x: usize,
    y: usize,
    z: usize,
) -> u8 {
    let mut count = 0;
    for &offset in neighborhood.offsets() {
        if alive.is_alive(source.wrapped(x, y, z, offset), state_count) {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::grid::Grid;

    fn cross_grid() -> Grid {
        // Center + 4 neighbors in the y/z plane
        let mut grid = Grid::new(8, 2).unwrap();
        for (x, y, z) in [(4, 4, 4), (4, 3, 4), (4, 5, 4), (4, 4, 3), (4, 4, 5)] {
            grid.set(x, y, z, 1).unwrap();
        }
        grid
    }

    #[test]
    fn test_offset_tables() {
        assert_eq!(Neighborhood::Moore.max_neighbors(), 26);
        assert_eq!(Neighborhood::VonNeumann.max_neighbors(), 6);
        assert!(!MOORE_OFFSETS.contains(&[0, 0, 0]));

        let mut sorted = MOORE_OFFSETS.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 26);

        for offset in VON_NEUMANN_OFFSETS {
            let manhattan: i32 = offset.iter().map(|&d| (d as i32).abs()).sum();
            assert_eq!(manhattan, 1);
            assert!(MOORE_OFFSETS.contains(&offset));
        }
    }

    #[test]
    fn test_count_neighbors() {
        let grid = cross_grid();
        let moore = |x, y, z| {
            count_neighbors(&grid, Neighborhood::Moore, AlivePredicate::NonZero, 2, x, y, z)
        };

        // Center sees its 4 arms
        assert_eq!(moore(4, 4, 4), 4);
        // Each arm sees the center and the 2 arms orthogonal to it
        assert_eq!(moore(4, 3, 4), 3);
        assert_eq!(moore(4, 4, 5), 3);
        // Far cell sees nothing
        assert_eq!(moore(0, 0, 0), 0);
    }

    #[test]
    fn test_count_neighbors_von_neumann() {
        let grid = cross_grid();
        let vn = |x, y, z| {
            count_neighbors(
                &grid,
                Neighborhood::VonNeumann,
                AlivePredicate::NonZero,
                2,
                x,
                y,
                z,
            )
        };

        assert_eq!(vn(4, 4, 4), 4);
        // Diagonal arms are not face-adjacent
        assert_eq!(vn(4, 3, 4), 1);
        // Cell beside the plane touches only the center
        assert_eq!(vn(3, 4, 4), 1);
    }

    #[test]
    fn test_count_wraps_across_corner() {
        let mut grid = Grid::new(5, 2).unwrap();
        grid.set(4, 4, 4, 1).unwrap();
        let count = count_neighbors(
            &grid,
            Neighborhood::Moore,
            AlivePredicate::NonZero,
            2,
            0,
            0,
            0,
        );
        assert_eq!(count, 1);
    }

    #[test]
    fn test_alive_predicates() {
        assert!(AlivePredicate::NonZero.is_alive(1, 5));
        assert!(AlivePredicate::NonZero.is_alive(4, 5));
        assert!(!AlivePredicate::NonZero.is_alive(0, 5));

        assert!(AlivePredicate::MaxState.is_alive(4, 5));
        assert!(!AlivePredicate::MaxState.is_alive(3, 5));
        assert!(!AlivePredicate::MaxState.is_alive(0, 5));
    }

    #[test]
    fn test_max_state_predicate_ignores_decaying_cells() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set(2, 2, 1, 4).unwrap();
        grid.set(2, 2, 3, 2).unwrap();
        let count = |alive| count_neighbors(&grid, Neighborhood::Moore, alive, 5, 2, 2, 2);
        assert_eq!(count(AlivePredicate::NonZero), 2);
        assert_eq!(count(AlivePredicate::MaxState), 1);
    }

    #[test]
    fn test_parse_neighborhood() {
        assert_eq!(Neighborhood::parse("M").unwrap(), Neighborhood::Moore);
        assert_eq!(Neighborhood::parse("moore").unwrap(), Neighborhood::Moore);
        assert_eq!(Neighborhood::parse(" n ").unwrap(), Neighborhood::VonNeumann);
        assert_eq!(Neighborhood::parse("VN").unwrap(), Neighborhood::VonNeumann);
        assert!(matches!(
            Neighborhood::parse("hex"),
            Err(ConfigError::Neighborhood(s)) if s == "hex"
        ));
    }
}
