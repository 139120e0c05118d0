//! Error taxonomy for the simulation cores
//!
//! Every variant is recoverable: a failed spawn search skips that spawn
//! cycle, an invalid lifecycle call is ignored, and a stale callback
//! becomes a no-op. Nothing here is allowed to stop the game loop.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Spawn-validity search ran out of retries; the playfield is too
    /// crowded. Callers skip the spawn cycle.
    #[error("no valid spawn position after {attempts} attempts")]
    PlacementExhausted { attempts: u32 },

    /// A lifecycle operation arrived in the wrong phase (e.g. `start`
    /// while already Running). Callers ignore it.
    #[error("invalid transition: {0}")]
    InvalidTransition(&'static str),

    /// A deferred action fired for a session generation that has since
    /// been reset or closed. Callers drop the action without mutating.
    #[error("stale callback: scheduled for epoch {scheduled}, current epoch {current}")]
    StaleCallback { scheduled: u64, current: u64 },
}
