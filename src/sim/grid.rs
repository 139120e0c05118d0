//! Grid simulation core (snake-style games)
//!
//! Discrete coordinate-stepped simulation: one step per scheduler
//! interval, direction changes buffered and committed at step
//! boundaries, exact-cell collision. The step interval shrinks as the
//! level climbs, so the game accelerates.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;
use crate::input::{Direction, InputState};
use crate::scheduler::DeferredActions;

use super::placement::free_cell;
use super::{Hud, Phase, SessionEvent};

/// Integer cell coordinate, bounded by the grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbor cell one step in `dir`, wrapped torus-style
    pub fn stepped(self, dir: Direction, width: i32, height: i32) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: (self.x + dx).rem_euclid(width),
            y: (self.y + dy).rem_euclid(height),
        }
    }
}

/// Standard food: fixed value, respawns after a delay once eaten
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub cell: GridCell,
    pub value: u64,
}

/// Bonus food: level-scaled value, disappears when its countdown ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecialFood {
    pub cell: GridCell,
    pub value: u64,
    pub ttl_steps: u32,
}

/// Per-variant tuning for the grid core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
    pub base_interval_ms: u32,
    pub min_interval_ms: u32,
    /// How much the interval shrinks per level
    pub interval_step_ms: u32,
    /// Reject direction changes that reverse the current heading
    pub reverse_guard: bool,
    pub obstacles_per_level: u32,
    pub food_value: u64,
    pub food_respawn_delay_ms: u32,
    pub special_food_ttl_steps: u32,
    /// Score per level: level N ends at `N * level_threshold`
    pub level_threshold: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            base_interval_ms: GRID_BASE_INTERVAL_MS,
            min_interval_ms: GRID_MIN_INTERVAL_MS,
            interval_step_ms: GRID_INTERVAL_STEP_MS,
            reverse_guard: true,
            obstacles_per_level: OBSTACLES_PER_LEVEL,
            food_value: FOOD_VALUE,
            food_respawn_delay_ms: FOOD_RESPAWN_DELAY_MS,
            special_food_ttl_steps: SPECIAL_FOOD_TTL_STEPS,
            level_threshold: LEVEL_SCORE_THRESHOLD,
        }
    }
}

/// Deferred one-shot effects owned by the grid core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GridDeferred {
    RespawnFood,
}

/// Read-only state snapshot for the draw collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub snake: Vec<GridCell>,
    pub food: Option<Food>,
    pub special_food: Option<SpecialFood>,
    pub obstacles: Vec<GridCell>,
    pub phase: Phase,
    pub hud: Hud,
}

/// One snake-style game session
///
/// Owns all mutable state exclusively; multiple sessions coexist in
/// isolation. Mutation happens only inside [`GridSession::step`] and the
/// lifecycle operations.
#[derive(Debug)]
pub struct GridSession {
    config: GridConfig,
    rng: Pcg32,
    snake: VecDeque<GridCell>,
    direction: Direction,
    next_direction: Direction,
    food: Option<Food>,
    special_food: Option<SpecialFood>,
    obstacles: Vec<GridCell>,
    score: u64,
    level: u32,
    interval_ms: u32,
    phase: Phase,
    /// Session generation; stale deferred actions are detected against it
    epoch: u64,
    /// Elapsed session time in milliseconds, advanced one interval per step
    clock_ms: u64,
    deferred: DeferredActions<GridDeferred>,
    events: Vec<SessionEvent>,
}

impl GridSession {
    pub fn new(config: GridConfig) -> Self {
        let interval_ms = config.base_interval_ms;
        Self {
            config,
            rng: Pcg32::seed_from_u64(0),
            snake: VecDeque::new(),
            direction: Direction::Right,
            next_direction: Direction::Right,
            food: None,
            special_food: None,
            obstacles: Vec::new(),
            score: 0,
            level: 1,
            interval_ms,
            phase: Phase::Idle,
            epoch: 0,
            clock_ms: 0,
            deferred: DeferredActions::new(),
            events: Vec::new(),
        }
    }

    /// Reset and enter Running. Calling this while already Running is an
    /// ignored invalid transition.
    pub fn start(&mut self, seed: u64) -> Result<(), GameError> {
        if self.phase == Phase::Running {
            log::warn!("ignoring start: session already running");
            return Err(GameError::InvalidTransition("start while running"));
        }
        self.epoch += 1;
        self.rng = Pcg32::seed_from_u64(seed);
        self.snake.clear();
        self.snake
            .push_front(GridCell::new(self.config.width / 3, self.config.height / 3));
        self.direction = Direction::Right;
        self.next_direction = Direction::Right;
        self.food = None;
        self.special_food = None;
        self.obstacles.clear();
        self.score = 0;
        self.level = 1;
        self.interval_ms = self.config.base_interval_ms;
        self.clock_ms = 0;
        self.deferred.clear();
        self.place_food();
        for _ in 0..self.level * self.config.obstacles_per_level {
            self.place_obstacle();
        }
        self.phase = Phase::Running;
        self.events.push(SessionEvent::Started);
        log::info!("grid session started (seed {seed})");
        Ok(())
    }

    /// Leave Running or GameOver. Idempotent: a second call changes
    /// nothing and schedules nothing.
    pub fn stop(&mut self) {
        if self.phase != Phase::Idle {
            self.phase = Phase::Idle;
            self.epoch += 1;
            self.deferred.clear();
            log::info!("grid session stopped");
        }
    }

    /// Stop, then start fresh with a new seed
    pub fn restart(&mut self, seed: u64) -> Result<(), GameError> {
        self.stop();
        self.start(seed)?;
        self.events.push(SessionEvent::Restarted);
        Ok(())
    }

    /// Advance one simulation step. Fires once per scheduler interval;
    /// not Running means no-op.
    pub fn step(&mut self, input: &mut InputState) {
        if self.phase != Phase::Running {
            return;
        }
        self.clock_ms += self.interval_ms as u64;

        // Timed one-shot effects come first; stale entries no-op inside
        for action in self.deferred.drain_due(self.clock_ms, self.epoch) {
            match action {
                GridDeferred::RespawnFood => {
                    if self.food.is_none() {
                        self.place_food();
                    }
                }
            }
        }

        // Commit the buffered direction; a reversal is rejected so the
        // head cannot fold into the neck
        if let Some(requested) = input.direction.take() {
            let reversal = requested == self.direction.opposite();
            if !(self.config.reverse_guard && reversal) {
                self.next_direction = requested;
            }
        }
        self.direction = self.next_direction;

        let head = self.snake[0].stepped(self.direction, self.config.width, self.config.height);

        // Collision checks in fixed order: self-body, then obstacles.
        // The tail cell still counts; it has not popped yet this step.
        if self.snake.contains(&head) || self.obstacles.contains(&head) {
            self.game_over();
            return;
        }

        self.snake.push_front(head);

        // Consumables: grow on either kind, pop otherwise
        let mut grew = false;
        if let Some(food) = self.food.filter(|f| f.cell == head) {
            self.food = None;
            self.score += food.value;
            self.deferred.schedule(
                self.clock_ms + self.config.food_respawn_delay_ms as u64,
                self.epoch,
                GridDeferred::RespawnFood,
            );
            grew = true;
        } else if let Some(special) = self.special_food.filter(|s| s.cell == head) {
            self.special_food = None;
            self.score += special.value;
            grew = true;
        }
        if !grew {
            let _ = self.snake.pop_back();
        }

        // Special food countdown, then a level-scaled chance of a new one
        if let Some(special) = &mut self.special_food {
            special.ttl_steps -= 1;
            if special.ttl_steps == 0 {
                self.special_food = None;
            }
        } else {
            let chance = (0.02 * self.level as f64).min(0.2);
            if self.rng.random_bool(chance) {
                self.place_special_food();
            }
        }

        if grew && self.score >= self.level as u64 * self.config.level_threshold {
            self.level_up();
        }
    }

    /// Level transition inside Running: faster steps, one more obstacle
    fn level_up(&mut self) {
        self.level += 1;
        self.interval_ms = self
            .interval_ms
            .saturating_sub(self.config.interval_step_ms)
            .max(self.config.min_interval_ms);
        self.place_obstacle();
        self.events.push(SessionEvent::LevelUp { level: self.level });
        log::info!("level up: {} (interval {}ms)", self.level, self.interval_ms);
    }

    fn game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.events.push(SessionEvent::GameOver {
            score: self.score,
            level: self.level,
        });
        log::info!("game over: score {} level {}", self.score, self.level);
    }

    fn place_food(&mut self) {
        match self.free_cell_for_spawn() {
            Ok(cell) => {
                self.food = Some(Food {
                    cell,
                    value: self.config.food_value,
                });
            }
            Err(err) => {
                // Too crowded right now; try again next respawn window
                log::debug!("food spawn skipped: {err}");
                self.deferred.schedule(
                    self.clock_ms + self.config.food_respawn_delay_ms as u64,
                    self.epoch,
                    GridDeferred::RespawnFood,
                );
            }
        }
    }

    fn place_special_food(&mut self) {
        match self.free_cell_for_spawn() {
            Ok(cell) => {
                self.special_food = Some(SpecialFood {
                    cell,
                    value: 50 * self.level as u64,
                    ttl_steps: self.config.special_food_ttl_steps,
                });
            }
            Err(err) => log::debug!("special food spawn skipped: {err}"),
        }
    }

    fn place_obstacle(&mut self) {
        let snake: Vec<GridCell> = self.snake.iter().copied().collect();
        let mut taken: Vec<GridCell> = self.obstacles.clone();
        if let Some(food) = self.food {
            taken.push(food.cell);
        }
        if let Some(special) = self.special_food {
            taken.push(special.cell);
        }
        let head_buffer = self.snake.front().map(|head| (*head, 3));
        match free_cell(
            &mut self.rng,
            self.config.width,
            self.config.height,
            &[&snake, &taken],
            head_buffer,
        ) {
            Ok(cell) => self.obstacles.push(cell),
            Err(err) => log::debug!("obstacle spawn skipped: {err}"),
        }
    }

    fn free_cell_for_spawn(&mut self) -> Result<GridCell, GameError> {
        let snake: Vec<GridCell> = self.snake.iter().copied().collect();
        let mut taken: Vec<GridCell> = self.obstacles.clone();
        if let Some(food) = self.food {
            taken.push(food.cell);
        }
        if let Some(special) = self.special_food {
            taken.push(special.cell);
        }
        free_cell(
            &mut self.rng,
            self.config.width,
            self.config.height,
            &[&snake, &taken],
            None,
        )
    }

    /// Current step interval; the shell rearms its scheduler with this
    /// after every step because level-ups shrink it
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            level: self.level,
            lives: 0,
            ammo: None,
        }
    }

    /// Read-only snapshot for the draw collaborator
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            snake: self.snake.iter().copied().collect(),
            food: self.food,
            special_food: self.special_food,
            obstacles: self.obstacles.clone(),
            phase: self.phase,
            hud: self.hud(),
        }
    }

    /// Drain lifecycle events for the shell
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}
