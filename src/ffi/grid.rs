//! Cell access, ticking, and reset.

use super::coord;
use crate::engine::Engine;

/// Gets the side length `N` of the grid.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Engine, or null
///
/// # Returns
/// The side length, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn va_engine_size(ptr: *const Engine) -> u32 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).size() as u32
}

/// Gets the number of states `S` of the engine's rule.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Engine, or null
///
/// # Returns
/// The state count, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn va_engine_state_count(ptr: *const Engine) -> u32 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).state_count() as u32
}

/// Gets the state of a cell. Coordinates never wrap.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Engine, or null
///
/// # Returns
/// The state in `[0, S-1]`, or -1 if out of range or ptr is null.
#[no_mangle]
pub unsafe extern "C" fn va_engine_cell_state(ptr: *const Engine, x: i32, y: i32, z: i32) -> i32 {
    if ptr.is_null() {
        return -1;
    }
    let (Some(x), Some(y), Some(z)) = (coord(x), coord(y), coord(z)) else {
        return -1;
    };
    match (*ptr).cell_state(x, y, z) {
        Ok(state) => i32::from(state),
        Err(_) => -1,
    }
}

/// Sets the state of a cell between ticks.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Engine, or null
///
/// # Returns
/// 0 on success, 1 on failure (null pointer, out of range, or state ≥ S)
#[no_mangle]
pub unsafe extern "C" fn va_engine_set_cell(
    ptr: *mut Engine,
    x: i32,
    y: i32,
    z: i32,
    state: u8,
) -> i32 {
    if ptr.is_null() {
        return 1;
    }
    let (Some(x), Some(y), Some(z)) = (coord(x), coord(y), coord(z)) else {
        return 1;
    };
    match (*ptr).set_cell(x, y, z, state) {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

/// Advances the automaton by one generation.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Engine, or null
#[no_mangle]
pub unsafe extern "C" fn va_engine_tick(ptr: *mut Engine) {
    if ptr.is_null() {
        return;
    }
    (*ptr).tick();
}

/// Re-randomizes every cell and restarts the generation counter.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Engine, or null
#[no_mangle]
pub unsafe extern "C" fn va_engine_reset(ptr: *mut Engine) {
    if ptr.is_null() {
        return;
    }
    (*ptr).reset();
}

/// Counts cells in any nonzero state.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Engine, or null
///
/// # Returns
/// The live-cell count, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn va_engine_live_cells(ptr: *const Engine) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).live_cells() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::lifecycle::{va_engine_create, va_engine_destroy, va_engine_generation};
    use std::ptr;

    #[test]
    fn test_dimensions() {
        unsafe {
            let engine = va_engine_create(7, ptr::null(), 0.3, 1);
            assert_eq!(va_engine_size(engine), 7);
            assert_eq!(va_engine_state_count(engine), 5);
            va_engine_destroy(engine);
        }
    }

    #[test]
    fn test_set_and_get_cell() {
        unsafe {
            let engine = va_engine_create(5, ptr::null(), 0.0, 1);
            assert_eq!(va_engine_live_cells(engine), 0);

            assert_eq!(va_engine_set_cell(engine, 1, 2, 3, 4), 0);
            assert_eq!(va_engine_cell_state(engine, 1, 2, 3), 4);
            assert_eq!(va_engine_live_cells(engine), 1);

            // State 5 is not below S = 5
            assert_eq!(va_engine_set_cell(engine, 1, 2, 3, 5), 1);
            assert_eq!(va_engine_cell_state(engine, 1, 2, 3), 4);

            va_engine_destroy(engine);
        }
    }

    #[test]
    fn test_out_of_range_never_wraps() {
        unsafe {
            let engine = va_engine_create(5, ptr::null(), 1.0, 1);
            assert_eq!(va_engine_cell_state(engine, 5, 0, 0), -1);
            assert_eq!(va_engine_cell_state(engine, 0, -1, 0), -1);
            assert_eq!(va_engine_cell_state(engine, 0, 0, 100), -1);
            assert_eq!(va_engine_set_cell(engine, -1, 0, 0, 1), 1);
            assert_eq!(va_engine_set_cell(engine, 0, 0, 5, 1), 1);
            va_engine_destroy(engine);
        }
    }

    #[test]
    fn test_tick_and_reset() {
        unsafe {
            let engine = va_engine_create(6, ptr::null(), 0.3, 9);
            va_engine_tick(engine);
            va_engine_tick(engine);
            assert_eq!(va_engine_generation(engine), 2);

            va_engine_reset(engine);
            assert_eq!(va_engine_generation(engine), 0);
            va_engine_destroy(engine);
        }
    }

    #[test]
    fn test_lone_cell_decays() {
        unsafe {
            let engine = va_engine_create(5, ptr::null(), 0.0, 1);
            va_engine_set_cell(engine, 2, 2, 2, 4);
            va_engine_tick(engine);
            assert_eq!(va_engine_cell_state(engine, 2, 2, 2), 3);
            va_engine_destroy(engine);
        }
    }

    #[test]
    fn test_null_pointer_handling() {
        unsafe {
            assert_eq!(va_engine_size(ptr::null()), 0);
            assert_eq!(va_engine_state_count(ptr::null()), 0);
            assert_eq!(va_engine_cell_state(ptr::null(), 0, 0, 0), -1);
            assert_eq!(va_engine_set_cell(ptr::null_mut(), 0, 0, 0, 1), 1);
            assert_eq!(va_engine_live_cells(ptr::null()), 0);

            // Should not crash
            va_engine_tick(ptr::null_mut());
            va_engine_reset(ptr::null_mut());
        }
    }
}
