//! The automaton engine: one grid, one rule, one tick at a time.
//!
//! The engine keeps two grids. At the start of a tick they are swapped, so the
//! previous live grid becomes the read-only snapshot of generation N and the
//! other buffer is overwritten with generation N+1. Workers each own one
//! x-slab of the output and all of them finish before `tick` returns.

use std::sync::Arc;

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::automaton::grid::Grid;
use crate::automaton::halo::HaloGrid;
use crate::automaton::region::{self, Region};
use crate::automaton::rule::RuleTable;
use crate::automaton::stepping::step_parallel;
use crate::config::{EngineConfig, ResetPolicy, WrapStrategy};
use crate::error::EngineError;

pub struct Engine {
    live: Grid,
    snapshot: Grid,
    halo: Option<HaloGrid>,
    rule: RuleTable,
    reset_policy: ResetPolicy,
    rng: ChaCha8Rng,
    thread_pool: rayon::ThreadPool,
    generation: u64,
}

impl Engine {
    /// Create an engine with default settings for `rule` and an all-dead grid.
    pub fn new(size: usize, rule: RuleTable) -> Result<Self, EngineError> {
        let config = EngineConfig {
            size,
            ..EngineConfig::default()
        };
        Engine::build(&config, rule)
    }

    /// Create an engine from validated configuration and populate it once.
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let rule = config.rule_table()?;
        let mut engine = Engine::build(config, rule)?;
        engine.reset();
        Ok(engine)
    }

    fn build(config: &EngineConfig, rule: RuleTable) -> Result<Self, EngineError> {
        config.reset.validate()?;
        let live = Grid::new(config.size, rule.state_count())?;
        let snapshot = live.clone();
        let halo = match config.wrap {
            WrapStrategy::Modular => None,
            WrapStrategy::Halo => Some(HaloGrid::from_grid(&live)),
        };
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("automaton-worker-{i}"))
            .build()?;

        info!(
            "engine created: {n}x{n}x{n} grid, rule {rule}, {:?} transition, {:?} wrap, {} workers",
            rule.policy(),
            config.wrap,
            thread_pool.current_num_threads(),
            n = config.size,
        );

        Ok(Engine {
            live,
            snapshot,
            halo,
            rule,
            reset_policy: config.reset,
            rng,
            thread_pool,
            generation: 0,
        })
    }

    /// Side length `N`.
    pub fn size(&self) -> usize {
        self.live.side()
    }

    /// Number of states `S`.
    pub fn state_count(&self) -> usize {
        self.rule.state_count()
    }

    /// Generations advanced since construction or the last reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn rule(&self) -> &RuleTable {
        &self.rule
    }

    pub fn reset_policy(&self) -> ResetPolicy {
        self.reset_policy
    }

    /// The live grid, as of the last completed tick.
    pub fn grid(&self) -> &Grid {
        &self.live
    }

    /// An owned copy of the live grid for readers on other threads.
    pub fn snapshot(&self) -> Arc<Grid> {
        Arc::new(self.live.clone())
    }

    pub fn cell_state(&self, x: usize, y: usize, z: usize) -> Result<u8, EngineError> {
        self.live.get(x, y, z)
    }

    /// Place a single cell, for hosts seeding a pattern between ticks.
    pub fn set_cell(&mut self, x: usize, y: usize, z: usize, value: u8) -> Result<(), EngineError> {
        self.live.set(x, y, z, value)
    }

    /// Number of cells in any nonzero state.
    pub fn live_cells(&self) -> usize {
        self.live.live_cells()
    }

    /// Re-randomize every cell under the configured reset policy.
    pub fn reset(&mut self) {
        self.live.populate(self.reset_policy, &mut self.rng);
        self.generation = 0;
        info!("grid reset: {} live cells", self.live.live_cells());
    }

    /// Kill every cell.
    pub fn clear(&mut self) {
        self.live.clear();
        self.generation = 0;
    }

    /// Replace the live grid wholesale; its shape must match the engine's.
    pub fn load(&mut self, grid: Grid) -> Result<(), EngineError> {
        if grid.side() != self.size() || grid.state_count() != self.state_count() {
            return Err(EngineError::ShapeMismatch {
                expected: self.size(),
                expected_states: self.state_count(),
                got: grid.side(),
                got_states: grid.state_count(),
            });
        }
        self.live = grid;
        self.generation = 0;
        Ok(())
    }

    /// Advance exactly one generation.
    pub fn tick(&mut self) {
        std::mem::swap(&mut self.live, &mut self.snapshot);

        match self.halo.as_mut() {
            Some(halo) => {
                halo.refresh(&self.snapshot);
                step_parallel(&*halo, &self.rule, self.live.cells_mut(), &self.thread_pool);
            }
            None => step_parallel(
                &self.snapshot,
                &self.rule,
                self.live.cells_mut(),
                &self.thread_pool,
            ),
        }

        self.generation += 1;
        debug!(
            "generation {}: {} live cells",
            self.generation,
            self.live.live_cells()
        );
    }

    pub fn tick_many(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    pub fn extract_region(&self, region: Region, out_buf: &mut [u8]) -> Result<usize, EngineError> {
        region::extract_region(&self.live, region, out_buf)
    }

    pub fn import_region(&mut self, region: Region, in_buf: &[u8]) -> Result<usize, EngineError> {
        region::import_region(&mut self.live, region, in_buf)
    }
}
