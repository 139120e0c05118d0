//! Neon Arcade - simulation cores for a collection of arcade games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid core, arena core, collisions)
//! - `scheduler`: Game loop driver (interval-stepped and frame-stepped)
//! - `input`: Keyboard/touch normalization into one command vocabulary
//! - `highscores`: In-memory leaderboard
//!
//! Rendering, DOM chrome, and asset loading are external collaborators:
//! the cores expose read-only snapshots plus HUD fields, and consume
//! commands from the input router.

pub mod error;
pub mod highscores;
pub mod input;
pub mod scheduler;
pub mod sim;

pub use error::GameError;
pub use highscores::HighScores;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep for the continuous cores (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Maximum catch-up steps per advance for interval-stepped games
    pub const MAX_CATCHUP_STEPS: u32 = 4;

    /// Playfield dimensions (pixels) for the continuous cores
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Grid dimensions (cells) for the grid core
    pub const GRID_WIDTH: i32 = 30;
    pub const GRID_HEIGHT: i32 = 30;

    /// Per-step velocity damping for actors that coast (ship, player)
    pub const VELOCITY_DAMPING: f32 = 0.98;

    /// Ship defaults
    pub const SHIP_RADIUS: f32 = 12.0;
    pub const SHIP_THRUST: f32 = 6.0;
    pub const SHIP_TURN_RATE: f32 = 0.087; // radians per step (~5 degrees)
    pub const SHIP_LIVES: u8 = 3;
    pub const SHIP_INVINCIBLE_TICKS: u32 = 120;
    pub const SHIP_FIRE_COOLDOWN_TICKS: u32 = 15;

    /// Bullet defaults
    pub const BULLET_RADIUS: f32 = 2.0;
    pub const BULLET_SPEED: f32 = 420.0;
    pub const BULLET_TTL_TICKS: u32 = 60;

    /// Asteroid defaults
    pub const ASTEROID_MAX_RADIUS: f32 = 40.0;
    /// Asteroids larger than this split in two when shot
    pub const ASTEROID_SPLIT_MIN_RADIUS: f32 = 20.0;
    /// Minimum distance from the ship for a fresh asteroid spawn
    pub const ASTEROID_SPAWN_CLEARANCE: f32 = 100.0;
    pub const ASTEROID_MAX_SPEED: f32 = 90.0;

    /// Zombie-rush defaults
    pub const PLAYER_SPEED: f32 = 180.0;
    pub const PLAYER_RADIUS: f32 = 14.0;
    pub const PLAYER_HEALTH: i32 = 100;
    pub const PLAYER_HURT_TICKS: u32 = 45;
    pub const ZOMBIE_RADIUS: f32 = 13.0;
    pub const ZOMBIE_BASE_SPEED: f32 = 55.0;
    pub const ZOMBIE_DAMAGE: i32 = 10;
    pub const ZOMBIE_SPAWN_CLEARANCE: f32 = 150.0;
    pub const AMMO_CAPACITY: u32 = 12;
    pub const RELOAD_TICKS: u32 = 90;
    pub const POWERUP_RADIUS: f32 = 10.0;
    pub const POWERUP_TTL_TICKS: u32 = 600;
    pub const POWERUP_DROP_CHANCE: f64 = 0.2;
    pub const RAPID_FIRE_TICKS: u32 = 300;

    /// Grid core defaults
    pub const GRID_BASE_INTERVAL_MS: u32 = 100;
    pub const GRID_MIN_INTERVAL_MS: u32 = 50;
    pub const GRID_INTERVAL_STEP_MS: u32 = 10;
    pub const FOOD_VALUE: u64 = 10;
    pub const FOOD_RESPAWN_DELAY_MS: u32 = 500;
    pub const SPECIAL_FOOD_TTL_STEPS: u32 = 100;
    pub const LEVEL_SCORE_THRESHOLD: u64 = 100;
    pub const OBSTACLES_PER_LEVEL: u32 = 2;
}

/// Wrap a position torus-style into `[0, width) x [0, height)`
#[inline]
pub fn wrap_position(mut pos: Vec2, width: f32, height: f32) -> Vec2 {
    if pos.x < 0.0 {
        pos.x += width;
    } else if pos.x >= width {
        pos.x -= width;
    }
    if pos.y < 0.0 {
        pos.y += height;
    } else if pos.y >= height {
        pos.y -= height;
    }
    pos
}

/// Clamp a position (with radius) inside `[0, width] x [0, height]`
#[inline]
pub fn clamp_position(pos: Vec2, radius: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(radius, width - radius),
        pos.y.clamp(radius, height - radius),
    )
}

/// Unit vector for a heading angle (0 = +x, counterclockwise)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
