//! Region extraction and import FFI functions.

use super::coord;
use crate::automaton::region::Region;
use crate::engine::Engine;

/// Build a region from C bounds; `None` when any bound is negative or any
/// upper bound lies past the grid.
///
/// Checked before the caller's buffer is sliced, so the slice length never
/// exceeds `N³`.
fn region_from(engine: &Engine, min: [i32; 3], max: [i32; 3]) -> Option<Region> {
    let size = engine.size();
    let mut lo = [0; 3];
    let mut hi = [0; 3];
    for axis in 0..3 {
        lo[axis] = coord(min[axis])?;
        hi[axis] = coord(max[axis]).filter(|&m| m <= size)?;
    }
    Some(Region::new(lo, hi))
}

/// Extracts a box of cells, `min` inclusive and `max` exclusive, into a flat buffer.
///
/// # Layout
/// The buffer is filled in x,y,z order (x changes slowest, z changes fastest),
/// the same order as the grid. This matches the layout expected by
/// `va_engine_import_region`.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Engine, or null
/// - `out_buf` must point to a buffer with at least
///   `(max_x - min_x) * (max_y - min_y) * (max_z - min_z)` bytes
///
/// # Returns
/// Number of bytes written, or 0 on error.
#[no_mangle]
pub unsafe extern "C" fn va_engine_extract_region(
    ptr: *const Engine,
    out_buf: *mut u8,
    min_x: i32,
    min_y: i32,
    min_z: i32,
    max_x: i32,
    max_y: i32,
    max_z: i32,
) -> u64 {
    if ptr.is_null() || out_buf.is_null() {
        return 0;
    }
    let engine = &*ptr;
    let Some(region) = region_from(engine, [min_x, min_y, min_z], [max_x, max_y, max_z]) else {
        return 0;
    };

    let buf_slice = std::slice::from_raw_parts_mut(out_buf, region.volume());
    engine
        .extract_region(region, buf_slice)
        .map_or(0, |written| written as u64)
}

/// Imports a box of cells from a flat buffer.
///
/// # Layout
/// The buffer is read in x,y,z order (matching `va_engine_extract_region`).
/// Every value must be below the state count; otherwise nothing is written.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Engine, or null
/// - `in_buf` must point to a buffer with at least
///   `(max_x - min_x) * (max_y - min_y) * (max_z - min_z)` bytes
///
/// # Returns
/// Number of bytes read, or 0 on error.
#[no_mangle]
pub unsafe extern "C" fn va_engine_import_region(
    ptr: *mut Engine,
    in_buf: *const u8,
    min_x: i32,
    min_y: i32,
    min_z: i32,
    max_x: i32,
    max_y: i32,
    max_z: i32,
) -> u64 {
    if ptr.is_null() || in_buf.is_null() {
        return 0;
    }
    let engine = &mut *ptr;
    let Some(region) = region_from(engine, [min_x, min_y, min_z], [max_x, max_y, max_z]) else {
        return 0;
    };

    let buf_slice = std::slice::from_raw_parts(in_buf, region.volume());
    engine
        .import_region(region, buf_slice)
        .map_or(0, |read| read as u64)
}
