//! Core automaton logic: grid storage, toroidal wrap, neighbor counting,
//! rule tables and generation stepping.
//!
//! The [`Engine`](crate::engine::Engine) drives these; the FFI layer in `ffi/`
//! only ever goes through the engine.

pub mod grid;
pub mod halo;
pub mod neighborhood;
pub mod region;
pub mod rule;
pub mod stepping;

pub use grid::{wrap, CellSource, Grid};
pub use halo::HaloGrid;
pub use neighborhood::{count_neighbors, AlivePredicate, Neighborhood, Offset};
pub use region::{extract_region, import_region, Region};
pub use rule::{RuleTable, TransitionPolicy};
pub use stepping::{next_state, step_parallel, step_sequential, step_slab};
