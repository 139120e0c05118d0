//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity index)
//! - No rendering or platform dependencies
//!
//! Two cores share the leaf components: the grid core (discrete
//! coordinate-stepped games) and the arena core (real-valued
//! position/velocity games).

pub mod actor;
pub mod arena;
pub mod collision;
pub mod grid;
pub mod placement;

pub use actor::{Asteroid, BoundaryPolicy, Bullet, Particle, PowerUp, PowerUpKind, Ship, Zombie};
pub use arena::{ArenaMode, ArenaSession, ArenaSnapshot};
pub use collision::{asteroid_score, circles_overlap, detect, split_asteroid};
pub use grid::{GridCell, GridConfig, GridSession, GridSnapshot};
pub use placement::{MAX_PLACEMENT_ATTEMPTS, free_cell, spawn_point};

use serde::{Deserialize, Serialize};

/// Lifecycle phase shared by both cores
///
/// `GameOver` is terminal until an explicit restart re-enters `Running`
/// through `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    GameOver,
}

/// Lifecycle notifications drained by the shell each frame
///
/// The shell collaborator owns overlays and the restart button; these
/// events tell it when to show them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    Started,
    LevelUp { level: u32 },
    GameOver { score: u64, level: u32 },
    Restarted,
}

/// HUD fields surfaced to the text collaborator after every step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Hud {
    pub score: u64,
    pub level: u32,
    /// Lives for the asteroids variant, health for zombie-rush; unused (0)
    /// by the grid core
    pub lives: u32,
    /// Ammo for the zombie-rush variant; None elsewhere
    pub ammo: Option<u32>,
}
