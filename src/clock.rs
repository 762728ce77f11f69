//! Fixed-rate simulation clock.
//!
//! The clock thread ticks a shared [`Engine`] at a fixed frequency. Tick and
//! reset both hold the engine lock for their whole duration, so they never
//! interleave. After each completed tick or reset the thread publishes an
//! immutable `Arc<Grid>`; renderers read that and never a grid mid-update.
//!
//! Control messages (reset, stop) arrive over a crossbeam channel. The thread
//! waits for its next tick with `recv_timeout`, so a stop request wakes it
//! immediately, but never in the middle of a tick.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::{info, warn};
use parking_lot::{Mutex, RwLock};

use crate::automaton::grid::Grid;
use crate::config::validate_frequency;
use crate::engine::Engine;
use crate::error::EngineError;

/// Capacity of the control channel; senders block when the thread falls behind.
const CONTROL_CAPACITY: usize = 16;

enum Control {
    /// Re-randomize between ticks; the reply carries the new live-cell count.
    Reset { reply: Sender<usize> },
    Stop,
}

/// Summary returned when the clock is stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClockReport {
    /// Ticks issued by the clock thread.
    pub ticks: u64,
    /// Engine generation when the thread exited.
    pub generation: u64,
    /// Whether the clock thread was joined cleanly.
    pub joined: bool,
}

pub struct SimulationClock {
    engine: Arc<Mutex<Engine>>,
    published: Arc<RwLock<Arc<Grid>>>,
    ticks: Arc<AtomicU64>,
    control: Sender<Control>,
    handle: Option<JoinHandle<()>>,
}

impl SimulationClock {
    /// Move `engine` onto a new clock thread ticking `frequency_hz` times per second.
    pub fn start(engine: Engine, frequency_hz: f64) -> Result<Self, EngineError> {
        validate_frequency(frequency_hz)?;
        let period = Duration::from_secs_f64(1.0 / frequency_hz);

        let published = Arc::new(RwLock::new(engine.snapshot()));
        let engine = Arc::new(Mutex::new(engine));
        let ticks = Arc::new(AtomicU64::new(0));
        let (control, control_rx) = bounded(CONTROL_CAPACITY);

        let state = ClockThread {
            engine: Arc::clone(&engine),
            published: Arc::clone(&published),
            ticks: Arc::clone(&ticks),
            control_rx,
            period,
        };
        let handle = thread::Builder::new()
            .name("automaton-clock".to_string())
            .spawn(move || state.run())
            .map_err(EngineError::Spawn)?;

        info!("simulation clock started at {frequency_hz} Hz");
        Ok(SimulationClock {
            engine,
            published,
            ticks,
            control,
            handle: Some(handle),
        })
    }

    /// The grid as of the most recent completed tick or reset.
    pub fn latest(&self) -> Arc<Grid> {
        self.published.read().clone()
    }

    /// Ticks issued so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Shared handle to the engine. Holding its lock pauses the clock.
    ///
    /// Only the clock publishes: changes made through this handle reach
    /// [`latest`](Self::latest) with the next tick. Use
    /// [`with_engine`](Self::with_engine) to publish them at once.
    pub fn engine(&self) -> &Arc<Mutex<Engine>> {
        &self.engine
    }

    /// Run `f` on the engine between ticks, then publish the resulting grid.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> R {
        apply_and_publish(&self.engine, &self.published, f)
    }

    /// Reset the grid between ticks and wait until the new grid is published.
    ///
    /// Returns the number of live cells after the reset.
    pub fn reset(&self) -> Result<usize, EngineError> {
        let (reply, reply_rx) = bounded(1);
        self.control
            .send(Control::Reset { reply })
            .map_err(|_| EngineError::ClockStopped)?;
        reply_rx.recv().map_err(|_| EngineError::ClockStopped)
    }

    /// Stop the clock after any in-flight tick and join its thread.
    pub fn stop(mut self) -> ClockReport {
        self.shutdown()
    }

    fn shutdown(&mut self) -> ClockReport {
        let joined = match self.handle.take() {
            Some(handle) => {
                // The thread may already be gone; joining still reports how it exited.
                let _ = self.control.send(Control::Stop);
                handle.join().is_ok()
            }
            None => true,
        };
        let report = ClockReport {
            ticks: self.ticks(),
            generation: self.engine.lock().generation(),
            joined,
        };
        if !joined {
            warn!("simulation clock thread panicked");
        }
        info!(
            "simulation clock stopped after {} ticks at generation {}",
            report.ticks, report.generation
        );
        report
    }
}

impl Drop for SimulationClock {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.shutdown();
        }
    }
}

/// State owned by the clock thread.
struct ClockThread {
    engine: Arc<Mutex<Engine>>,
    published: Arc<RwLock<Arc<Grid>>>,
    ticks: Arc<AtomicU64>,
    control_rx: Receiver<Control>,
    period: Duration,
}

impl ClockThread {
    fn run(self) {
        let mut next_tick = Instant::now() + self.period;
        loop {
            let wait = next_tick.saturating_duration_since(Instant::now());
            match self.control_rx.recv_timeout(wait) {
                Ok(Control::Stop) | Err(RecvTimeoutError::Disconnected) => break,
                Ok(Control::Reset { reply }) => {
                    let live = self.apply(|engine| {
                        engine.reset();
                        engine.live_cells()
                    });
                    // Caller may have given up waiting.
                    let _ = reply.send(live);
                    continue;
                }
                Err(RecvTimeoutError::Timeout) => {}
            }

            self.apply(Engine::tick);
            self.ticks.fetch_add(1, Ordering::AcqRel);

            next_tick += self.period;
            let now = Instant::now();
            if next_tick < now {
                // Fell behind; skip the missed ticks rather than bursting.
                next_tick = now + self.period;
            }
        }
    }

    fn apply<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> R {
        apply_and_publish(&self.engine, &self.published, f)
    }
}

/// Run `f` under the engine lock and publish the resulting grid.
fn apply_and_publish<R>(
    engine: &Mutex<Engine>,
    published: &RwLock<Arc<Grid>>,
    f: impl FnOnce(&mut Engine) -> R,
) -> R {
    let (result, grid) = {
        let mut engine = engine.lock();
        let result = f(&mut *engine);
        (result, engine.snapshot())
    };
    *published.write() = grid;
    result
}
