//! Region extraction and import operations.

use super::grid::Grid;
use crate::error::EngineError;

/// An axis-aligned box of cells, `min` inclusive and `max` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub min: [usize; 3],
    pub max: [usize; 3],
}

impl Region {
    pub fn new(min: [usize; 3], max: [usize; 3]) -> Self {
        Region { min, max }
    }

    /// The whole grid.
    pub fn full(grid: &Grid) -> Self {
        let n = grid.side();
        Region {
            min: [0; 3],
            max: [n; 3],
        }
    }

    /// Number of cells in the box; zero when any axis is empty or inverted.
    /// Saturates at `usize::MAX` for boxes no grid could hold.
    pub fn volume(&self) -> usize {
        (0..3)
            .map(|axis| self.max[axis].saturating_sub(self.min[axis]))
            .fold(1, usize::saturating_mul)
    }

    fn check(&self, grid: &Grid) -> Result<(), EngineError> {
        let n = grid.side();
        if self.max.iter().any(|&m| m > n) {
            return Err(EngineError::OutOfRange {
                x: self.max[0].saturating_sub(1),
                y: self.max[1].saturating_sub(1),
                z: self.max[2].saturating_sub(1),
                size: n,
            });
        }
        Ok(())
    }
}

/// Copy the cells of `region` into `out_buf`.
///
/// # Layout
/// The buffer is filled in x,y,z order (x changes slowest, z fastest), the
/// same order as the grid itself. `import_region` reads the same layout.
///
/// # Returns
/// Number of cells written. An empty region writes nothing.
pub fn extract_region(grid: &Grid, region: Region, out_buf: &mut [u8]) -> Result<usize, EngineError> {
    region.check(grid)?;
    let total = region.volume();
    if total == 0 {
        return Ok(0);
    }
    if out_buf.len() < total {
        return Err(EngineError::BufferTooSmall {
            needed: total,
            got: out_buf.len(),
        });
    }

    let [min_x, min_y, min_z] = region.min;
    let [max_x, max_y, max_z] = region.max;
    let row = max_z - min_z;
    let mut offset = 0;
    for x in min_x..max_x {
        for y in min_y..max_y {
            let idx = grid.index_of(x, y, min_z);
            out_buf[offset..offset + row].copy_from_slice(&grid.cells()[idx..idx + row]);
            offset += row;
        }
    }
    Ok(offset)
}

/// Overwrite the cells of `region` from `in_buf`, laid out as `extract_region` writes it.
///
/// Every value is checked against the state count before anything is
/// written, so a rejected import leaves the grid untouched.
pub fn import_region(grid: &mut Grid, region: Region, in_buf: &[u8]) -> Result<usize, EngineError> {
    region.check(grid)?;
    let total = region.volume();
    if total == 0 {
        return Ok(0);
    }
    if in_buf.len() < total {
        return Err(EngineError::BufferTooSmall {
            needed: total,
            got: in_buf.len(),
        });
    }
    let state_count = grid.state_count();
    if let Some(&value) = in_buf[..total].iter().find(|&&v| v as usize >= state_count) {
        return Err(EngineError::InvalidState { value, state_count });
    }

    let [min_x, min_y, min_z] = region.min;
    let [max_x, max_y, max_z] = region.max;
    let row = max_z - min_z;
    let mut offset = 0;
    for x in min_x..max_x {
        for y in min_y..max_y {
            let idx = grid.index_of(x, y, min_z);
            grid.cells_mut()[idx..idx + row].copy_from_slice(&in_buf[offset..offset + row]);
            offset += row;
        }
    }
    Ok(offset)
}
