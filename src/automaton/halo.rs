//! Halo-padded snapshots.
//!
//! A [`HaloGrid`] stores an `(N+2)³` copy of a grid whose one-cell-deep border
//! mirrors the opposite side of the torus. Neighbor lookups then index the
//! padded buffer directly, with no modular arithmetic on the hot path.
//!
//! The border is filled one axis at a time: faces along x first, then y planes
//! spanning the already-filled x border, then z planes spanning both. Edge and
//! vertex halo cells fall out of the later passes.

use crate::automaton::grid::{CellSource, Grid};
use crate::automaton::neighborhood::Offset;

pub struct HaloGrid {
    side: usize,
    padded: usize,
    cells: Vec<u8>,
}

impl HaloGrid {
    pub fn from_grid(grid: &Grid) -> Self {
        let padded = grid.side() + 2;
        let mut halo = HaloGrid {
            side: grid.side(),
            padded,
            cells: vec![0; padded * padded * padded],
        };
        halo.refresh(grid);
        halo
    }

    /// Copy `grid` into the interior and rebuild the border.
    ///
    /// `grid` must have the side length this halo was built for.
    pub fn refresh(&mut self, grid: &Grid) {
        debug_assert_eq!(grid.side(), self.side);
        let n = self.side;
        for x in 0..n {
            for y in 0..n {
                let src = grid.index_of(x, y, 0);
                let dst = self.padded_index(x + 1, y + 1, 1);
                self.cells[dst..dst + n].copy_from_slice(&grid.cells()[src..src + n]);
            }
        }
        self.fill_halo();
    }

    #[inline]
    fn padded_index(&self, px: usize, py: usize, pz: usize) -> usize {
        (px * self.padded + py) * self.padded + pz
    }

    fn fill_halo(&mut self) {
        let n = self.side;
        let p = self.padded;

        // x faces
        for py in 1..=n {
            for pz in 1..=n {
                self.copy_cell([n, py, pz], [0, py, pz]);
                self.copy_cell([1, py, pz], [n + 1, py, pz]);
            }
        }
        // y faces, spanning the x border
        for px in 0..p {
            for pz in 1..=n {
                self.copy_cell([px, n, pz], [px, 0, pz]);
                self.copy_cell([px, 1, pz], [px, n + 1, pz]);
            }
        }
        // z faces, spanning both borders
        for px in 0..p {
            for py in 0..p {
                self.copy_cell([px, py, n], [px, py, 0]);
                self.copy_cell([px, py, 1], [px, py, n + 1]);
            }
        }
    }

    #[inline]
    fn copy_cell(&mut self, from: [usize; 3], to: [usize; 3]) {
        let src = self.padded_index(from[0], from[1], from[2]);
        let dst = self.padded_index(to[0], to[1], to[2]);
        self.cells[dst] = self.cells[src];
    }
}

impl CellSource for HaloGrid {
    fn side(&self) -> usize {
        self.side
    }

    #[inline]
    fn wrapped(&self, x: usize, y: usize, z: usize, offset: Offset) -> u8 {
        let [dx, dy, dz] = offset;
        let px = (x as isize + 1 + dx as isize) as usize;
        let py = (y as isize + 1 + dy as isize) as usize;
        let pz = (z as isize + 1 + dz as isize) as usize;
        self.cells[self.padded_index(px, py, pz)]
    }
}
