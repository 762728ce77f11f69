//! C ABI for hosts that drive the engine across a language boundary.
//!
//! Every function takes an opaque `*mut Engine` from `va_engine_create` and
//! tolerates null by returning a sentinel. The logic lives in
//! [`Engine`](crate::engine::Engine); these are thin wrappers that handle
//! null checks, pointer safety and C-to-Rust conversions.
//!
//! An engine handle is not synchronized. Hosts that tick from one thread and
//! read from another must serialize the calls themselves.

pub mod grid;
pub mod lifecycle;
pub mod region;

pub use grid::{
    va_engine_cell_state, va_engine_live_cells, va_engine_reset, va_engine_set_cell,
    va_engine_size, va_engine_state_count, va_engine_tick,
};
pub use lifecycle::{
    va_engine_create, va_engine_create_from_config, va_engine_destroy, va_engine_generation,
};
pub use region::{va_engine_extract_region, va_engine_import_region};

/// Convert a C coordinate to an index; negative values have none.
pub(crate) fn coord(value: i32) -> Option<usize> {
    usize::try_from(value).ok()
}
