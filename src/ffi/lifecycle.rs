//! Engine creation, destruction, and generation queries.

use std::ffi::CStr;
use std::os::raw::c_char;

use log::warn;

use crate::config::{EngineConfig, ResetPolicy, DEFAULT_RULE};
use crate::engine::Engine;
use crate::error::EngineError;

/// Creates an engine, populates it once, and returns an opaque pointer.
///
/// - `rule` is a preset name or `survival/spawn/states/neighborhood` notation;
///   null selects the default 4/4/5/M rule.
/// - A negative `alive_probability` selects uniform reset over all states.
/// - A `seed` of 0 seeds the reset generator from entropy.
///
/// # Safety
/// - `rule` must be null or point to a NUL-terminated string
/// - The returned pointer must eventually be freed with `va_engine_destroy()`
///
/// # Returns
/// A pointer to a new Engine, or null if the arguments are invalid.
#[no_mangle]
pub unsafe extern "C" fn va_engine_create(
    size: u16,
    rule: *const c_char,
    alive_probability: f32,
    seed: u64,
) -> *mut Engine {
    let rule = if rule.is_null() {
        DEFAULT_RULE.to_string()
    } else {
        match CStr::from_ptr(rule).to_str() {
            Ok(rule) => rule.to_string(),
            Err(_) => {
                warn!("va_engine_create: rule is not valid UTF-8");
                return std::ptr::null_mut();
            }
        }
    };
    let reset = if alive_probability < 0.0 {
        ResetPolicy::Uniform
    } else {
        ResetPolicy::Biased {
            alive_probability: f64::from(alive_probability),
        }
    };
    let config = EngineConfig {
        size: usize::from(size),
        rule,
        reset,
        seed: (seed != 0).then_some(seed),
        ..EngineConfig::default()
    };
    into_handle(Engine::from_config(&config))
}

/// Creates an engine from a TOML configuration file.
///
/// # Safety
/// - `path` must be null or point to a NUL-terminated string
/// - The returned pointer must eventually be freed with `va_engine_destroy()`
///
/// # Returns
/// A pointer to a new Engine, or null if the file is missing or invalid.
#[no_mangle]
pub unsafe extern "C" fn va_engine_create_from_config(path: *const c_char) -> *mut Engine {
    if path.is_null() {
        return std::ptr::null_mut();
    }
    let path = match CStr::from_ptr(path).to_str() {
        Ok(path) => path,
        Err(_) => {
            warn!("va_engine_create_from_config: path is not valid UTF-8");
            return std::ptr::null_mut();
        }
    };
    let engine = EngineConfig::load(path)
        .map_err(EngineError::from)
        .and_then(|config| Engine::from_config(&config));
    into_handle(engine)
}

fn into_handle(engine: Result<Engine, EngineError>) -> *mut Engine {
    match engine {
        Ok(engine) => Box::into_raw(Box::new(engine)),
        Err(e) => {
            warn!("engine creation failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Destroys an engine and frees its memory.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `va_engine_create()`, or null
/// - `ptr` must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn va_engine_destroy(ptr: *mut Engine) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

/// Gets the generation counter of an engine.
///
/// # Safety
/// - `ptr` must be a valid pointer to an Engine, or null
///
/// # Returns
/// Generations since creation or the last reset, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn va_engine_generation(ptr: *const Engine) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    (*ptr).generation()
}
