//! Error types for engine construction and cell access.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// A configuration that cannot describe a valid automaton.
///
/// Raised once, at startup, and never coerced into something valid.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Grid side length outside the supported range.
    #[error("grid size {size} is outside the supported range {min}..={max}")]
    GridSize { size: usize, min: usize, max: usize },

    /// Fewer than two states leaves no room for a live cell.
    #[error("state count {0} must be at least 2")]
    TooFewStates(usize),

    /// Cells are stored as bytes.
    #[error("state count {0} exceeds the 256 states a cell can hold")]
    TooManyStates(usize),

    /// A survival or spawn table with the wrong number of entries.
    #[error("{table} table has {len} entries, expected 27")]
    TableLength { table: &'static str, len: usize },

    /// A survival or spawn entry that is not a boolean.
    #[error("{table}[{index}] is {value}, expected 0 or 1")]
    TableValue {
        table: &'static str,
        index: usize,
        value: u8,
    },

    /// A neighbor count no neighborhood can produce.
    #[error("neighbor count {0} is above the maximum of 26")]
    NeighborCount(u32),

    /// Malformed `survival/spawn/states/neighborhood` notation.
    #[error("invalid rule {rule:?}: {reason}")]
    RuleSyntax { rule: String, reason: String },

    /// Neighborhood letter that is neither Moore nor von Neumann.
    #[error("unknown neighborhood {0:?}, expected M or N")]
    Neighborhood(String),

    #[error("alive probability {0} is outside [0, 1]")]
    AliveProbability(f64),

    #[error("tick frequency {0} Hz must be finite and positive")]
    Frequency(f64),

    /// The TOML document did not deserialize.
    #[error("malformed configuration: {0}")]
    Parse(#[source] Arc<toml::de::Error>),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },
}

/// Errors surfaced by a running [`Engine`](crate::engine::Engine).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A coordinate outside `[0, N-1]` on some axis. Public access never wraps.
    #[error("coordinate ({x}, {y}, {z}) is outside the {size}x{size}x{size} grid")]
    OutOfRange {
        x: usize,
        y: usize,
        z: usize,
        size: usize,
    },

    /// A state value that is not below the configured state count.
    #[error("state {value} is not below the state count {state_count}")]
    InvalidState { value: u8, state_count: usize },

    /// A grid whose shape does not match the engine's.
    #[error("grid of side {got} and {got_states} states does not fit an engine of side {expected} and {expected_states} states")]
    ShapeMismatch {
        expected: usize,
        expected_states: usize,
        got: usize,
        got_states: usize,
    },

    /// A cell buffer that does not hold exactly `N³` cells.
    #[error("cell buffer holds {got} cells, a grid of this side holds {expected}")]
    CellCount { expected: usize, got: usize },

    #[error("region buffer holds {got} cells, {needed} required")]
    BufferTooSmall { needed: usize, got: usize },

    /// A control message sent to a clock whose thread has exited.
    #[error("simulation clock has stopped")]
    ClockStopped,

    #[error("failed to spawn clock thread: {0}")]
    Spawn(std::io::Error),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
