//! Voxel Automata - multi-state 3D cellular automata on a toroidal grid.
//!
//! A cubic grid of cells, each in one of `S` states, advances in synchronous
//! generations under a survival/spawn rule table. The modules are layered:
//!
//! - [`automaton`]: grid storage, wrap, neighbor counting, rules and stepping
//! - [`engine`]: double-buffered grid plus worker pool, one tick at a time
//! - [`clock`]: fixed-rate ticking on a background thread with published snapshots
//! - [`config`]: TOML startup configuration
//! - [`ffi`]: a C ABI over [`Engine`] for hosts in other languages
//!
//! ```
//! use voxel_automata::{Engine, EngineConfig};
//!
//! let config = EngineConfig {
//!     size: 8,
//!     rule: "amoeba".to_string(),
//!     seed: Some(7),
//!     ..EngineConfig::default()
//! };
//! let mut engine = Engine::from_config(&config)?;
//! engine.tick();
//! assert_eq!(engine.generation(), 1);
//! # Ok::<(), voxel_automata::EngineError>(())
//! ```

pub mod automaton;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod ffi;

pub use automaton::{AlivePredicate, Grid, Neighborhood, Region, RuleTable, TransitionPolicy};
pub use clock::{ClockReport, SimulationClock};
pub use config::{EngineConfig, ResetPolicy, WrapStrategy};
pub use engine::Engine;
pub use error::{ConfigError, EngineError};
