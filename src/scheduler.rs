//! Game loop scheduler
//!
//! Drives a core at one of two cadences: interval-stepped (fixed
//! wall-clock period, grid games) or frame-stepped (one callback per
//! display refresh, continuous games). The shell owns the real clock and
//! calls [`LoopScheduler::advance`]; the scheduler decides how many steps
//! are due and invokes the step callback, so cancellation is a single
//! well-defined operation instead of an orphaned recurring callback.
//!
//! Every start/stop/restart bumps the session epoch. Deferred one-shot
//! effects (delayed food respawn, reload completion) carry the epoch they
//! were scheduled under and are dropped at fire time if it no longer
//! matches.

use crate::consts::{MAX_CATCHUP_STEPS, MAX_SUBSTEPS, SIM_DT};
use crate::error::GameError;

/// Stepping cadence for a game loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cadence {
    /// Fixed wall-clock period between steps (milliseconds)
    Interval { period_ms: u32 },
    /// One step per display refresh, substepped at a fixed timestep
    PerFrame,
}

/// Host-driven loop scheduler owning the liveness flag and epoch
#[derive(Debug)]
pub struct LoopScheduler {
    cadence: Cadence,
    running: bool,
    epoch: u64,
    last_ms: Option<f64>,
    accumulator_ms: f64,
    accumulator_s: f32,
}

impl LoopScheduler {
    pub fn interval(period_ms: u32) -> Self {
        Self::new(Cadence::Interval { period_ms })
    }

    pub fn per_frame() -> Self {
        Self::new(Cadence::PerFrame)
    }

    fn new(cadence: Cadence) -> Self {
        Self {
            cadence,
            running: false,
            epoch: 0,
            last_ms: None,
            accumulator_ms: 0.0,
            accumulator_s: 0.0,
        }
    }

    /// Begin scheduling steps. Returns the epoch for this run; deferred
    /// actions scheduled during the run should carry it.
    pub fn start(&mut self) -> Result<u64, GameError> {
        if self.running {
            return Err(GameError::InvalidTransition("start while running"));
        }
        self.running = true;
        self.epoch += 1;
        self.last_ms = None;
        self.accumulator_ms = 0.0;
        self.accumulator_s = 0.0;
        log::debug!("scheduler started (epoch {})", self.epoch);
        Ok(self.epoch)
    }

    /// Stop scheduling. Idempotent: a second call is a no-op and leaves
    /// the same terminal state. No step callback runs after this returns.
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.epoch += 1;
            self.last_ms = None;
            self.accumulator_ms = 0.0;
            self.accumulator_s = 0.0;
            log::debug!("scheduler stopped (epoch {})", self.epoch);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current epoch; changes on every start and stop.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Liveness check for a callback scheduled under `epoch`
    pub fn is_live(&self, epoch: u64) -> bool {
        self.running && epoch == self.epoch
    }

    /// Change the interval period (grid level-up). Cancels the pending
    /// step and rearms from now.
    pub fn set_period(&mut self, period_ms: u32) {
        if let Cadence::Interval { period_ms: p } = &mut self.cadence {
            *p = period_ms;
            self.accumulator_ms = 0.0;
        }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Advance the loop to wall-clock time `now_ms`, invoking `step` once
    /// per due simulation step with the step's dt in seconds. Returns the
    /// number of steps run (0 when stopped).
    pub fn advance<F: FnMut(f32)>(&mut self, now_ms: f64, mut step: F) -> u32 {
        if !self.running {
            return 0;
        }
        let elapsed_ms = match self.last_ms {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);

        match self.cadence {
            Cadence::Interval { period_ms } => {
                self.accumulator_ms += elapsed_ms;
                let period = period_ms.max(1) as f64;
                let mut steps = 0;
                while self.accumulator_ms >= period && steps < MAX_CATCHUP_STEPS {
                    // Liveness check at callback entry: the previous step
                    // may have stopped the session.
                    if !self.running {
                        break;
                    }
                    step(period as f32 / 1000.0);
                    self.accumulator_ms -= period;
                    steps += 1;
                }
                if steps == MAX_CATCHUP_STEPS {
                    // Shed the backlog rather than spiral
                    self.accumulator_ms = 0.0;
                }
                steps
            }
            Cadence::PerFrame => {
                // Clamp long frames (tab switch, debugger pause)
                let dt = (elapsed_ms as f32 / 1000.0).min(0.1);
                self.accumulator_s += dt;
                let mut substeps = 0;
                while self.accumulator_s >= SIM_DT && substeps < MAX_SUBSTEPS {
                    if !self.running {
                        break;
                    }
                    step(SIM_DT);
                    self.accumulator_s -= SIM_DT;
                    substeps += 1;
                }
                substeps
            }
        }
    }
}

/// A one-shot action scheduled for a future simulation time
#[derive(Debug, Clone)]
struct Deferred<A> {
    due: u64,
    epoch: u64,
    action: A,
}

/// Epoch-tagged deferred action queue
///
/// `due` is in whatever time unit the owning session counts (elapsed
/// milliseconds for the grid core, ticks for the arena core). Actions
/// whose epoch no longer matches at fire time are dropped, never run.
#[derive(Debug, Clone, Default)]
pub struct DeferredActions<A> {
    pending: Vec<Deferred<A>>,
    stale_dropped: u64,
}

impl<A> DeferredActions<A> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            stale_dropped: 0,
        }
    }

    pub fn schedule(&mut self, due: u64, epoch: u64, action: A) {
        self.pending.push(Deferred { due, epoch, action });
    }

    /// Remove and return every action due at or before `now` whose epoch
    /// matches `current_epoch`. Stale entries are dropped and counted.
    pub fn drain_due(&mut self, now: u64, current_epoch: u64) -> Vec<A> {
        let mut due = Vec::new();
        let mut keep = Vec::with_capacity(self.pending.len());
        for entry in self.pending.drain(..) {
            if entry.due > now {
                keep.push(entry);
            } else if entry.epoch == current_epoch {
                due.push(entry.action);
            } else {
                self.stale_dropped += 1;
                log::debug!(
                    "dropped stale deferred action: {}",
                    GameError::StaleCallback {
                        scheduled: entry.epoch,
                        current: current_epoch
                    }
                );
            }
        }
        self.pending = keep;
        due
    }

    /// Drop everything still pending (session reset)
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// How many actions have been dropped as stale over the queue's life
    pub fn stale_dropped(&self) -> u64 {
        self.stale_dropped
    }
}
