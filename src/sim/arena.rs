//! Continuous simulation core (asteroids / zombie-rush)
//!
//! Frame-stepped with a fixed dt from the scheduler. Each tick:
//! apply input forces, integrate every actor, resolve collisions in
//! table order, run the wave director, expire ttl-bound actors. Within
//! one tick movement strictly precedes collision evaluation, which
//! strictly precedes HUD/score visibility.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GameError;
use crate::input::InputState;
use crate::scheduler::DeferredActions;
use crate::{heading, wrap_position};

use super::actor::{
    Asteroid, BoundaryPolicy, Bullet, Particle, PowerUp, PowerUpKind, Ship, Zombie, spawn_burst,
};
use super::collision::{asteroid_score, circles_overlap, detect, split_asteroid};
use super::placement::spawn_point;
use super::{Hud, Phase, SessionEvent};

/// Which continuous game this session runs
///
/// The two variants differ in movement model and boundary policy:
/// asteroids rotates/thrusts and wraps; zombie-rush moves on two axes
/// and clamps. Preserved as configuration, never unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaMode {
    Asteroids,
    ZombieRush,
}

/// Deferred one-shot effects owned by the arena core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArenaDeferred {
    ReloadComplete,
}

/// Read-only state snapshot for the draw collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub mode: ArenaMode,
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub asteroids: Vec<Asteroid>,
    pub zombies: Vec<Zombie>,
    pub powerups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    pub phase: Phase,
    pub hud: Hud,
}

/// One continuous-space game session
///
/// Owns every actor exclusively; actors are removed by index on ttl
/// expiry or collision resolution, never shared across sessions.
#[derive(Debug)]
pub struct ArenaSession {
    mode: ArenaMode,
    width: f32,
    height: f32,
    rng: Pcg32,
    ship: Ship,
    bullets: Vec<Bullet>,
    asteroids: Vec<Asteroid>,
    zombies: Vec<Zombie>,
    powerups: Vec<PowerUp>,
    particles: Vec<Particle>,
    score: u64,
    wave: u32,
    phase: Phase,
    epoch: u64,
    ticks: u64,
    deferred: DeferredActions<ArenaDeferred>,
    events: Vec<SessionEvent>,
}

impl ArenaSession {
    pub fn new(mode: ArenaMode) -> Self {
        Self {
            mode,
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            rng: Pcg32::seed_from_u64(0),
            ship: Ship::new(Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0)),
            bullets: Vec::new(),
            asteroids: Vec::new(),
            zombies: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            score: 0,
            wave: 1,
            phase: Phase::Idle,
            epoch: 0,
            ticks: 0,
            deferred: DeferredActions::new(),
            events: Vec::new(),
        }
    }

    /// Reset and enter Running with the first wave on the field.
    /// Calling this while already Running is an ignored invalid
    /// transition.
    pub fn start(&mut self, seed: u64) -> Result<(), GameError> {
        if self.phase == Phase::Running {
            log::warn!("ignoring start: session already running");
            return Err(GameError::InvalidTransition("start while running"));
        }
        self.epoch += 1;
        self.rng = Pcg32::seed_from_u64(seed);
        self.ship = Ship::new(Vec2::new(self.width / 2.0, self.height / 2.0));
        self.bullets.clear();
        self.asteroids.clear();
        self.zombies.clear();
        self.powerups.clear();
        self.particles.clear();
        self.score = 0;
        self.wave = 1;
        self.ticks = 0;
        self.deferred.clear();
        self.spawn_wave();
        self.phase = Phase::Running;
        self.events.push(SessionEvent::Started);
        log::info!("arena session started ({:?}, seed {seed})", self.mode);
        Ok(())
    }

    /// Leave Running or GameOver. Idempotent.
    pub fn stop(&mut self) {
        if self.phase != Phase::Idle {
            self.phase = Phase::Idle;
            self.epoch += 1;
            self.deferred.clear();
            log::info!("arena session stopped");
        }
    }

    /// Stop, then start fresh with a new seed
    pub fn restart(&mut self, seed: u64) -> Result<(), GameError> {
        self.stop();
        self.start(seed)?;
        self.events.push(SessionEvent::Restarted);
        Ok(())
    }

    /// Advance one fixed timestep
    pub fn tick(&mut self, input: &InputState, dt: f32) {
        if self.phase != Phase::Running {
            return;
        }
        self.ticks += 1;

        for action in self.deferred.drain_due(self.ticks, self.epoch) {
            match action {
                ArenaDeferred::ReloadComplete => {
                    self.ship.ammo = AMMO_CAPACITY;
                    self.ship.reloading = false;
                    log::debug!("reload complete");
                }
            }
        }

        self.apply_input(input);
        self.integrate(dt);
        self.resolve_collisions();
        if self.phase != Phase::Running {
            return;
        }
        self.direct_waves();
        self.expire();
    }

    /// Input-derived forces and fire control, read once at tick start
    fn apply_input(&mut self, input: &InputState) {
        match self.mode {
            ArenaMode::Asteroids => {
                if input.rotate_left {
                    self.ship.angle -= SHIP_TURN_RATE;
                }
                if input.rotate_right {
                    self.ship.angle += SHIP_TURN_RATE;
                }
                if input.thrust {
                    self.ship.vel += heading(self.ship.angle) * SHIP_THRUST;
                }
                if input.fire && self.ship.fire_cooldown == 0 {
                    self.bullets.push(Bullet::fired_from(&self.ship));
                    self.ship.fire_cooldown = self.ship.shot_cooldown();
                }
            }
            ArenaMode::ZombieRush => {
                let axis = Vec2::new(input.axis_x(), input.axis_y());
                if axis != Vec2::ZERO {
                    self.ship.vel = axis.normalize() * PLAYER_SPEED;
                    self.ship.angle = axis.y.atan2(axis.x);
                }
                if input.reload {
                    self.try_reload();
                }
                if input.fire && self.ship.fire_cooldown == 0 {
                    if self.ship.reloading {
                        // Mid-reload the trigger does nothing
                    } else if self.ship.ammo == 0 {
                        self.try_reload();
                    } else {
                        self.ship.ammo -= 1;
                        self.bullets.push(Bullet::fired_from(&self.ship));
                        self.ship.fire_cooldown = self.ship.shot_cooldown();
                    }
                }
            }
        }
    }

    /// Begin a reload unless one is in flight or the clip is full
    fn try_reload(&mut self) {
        if self.ship.reloading || self.ship.ammo == AMMO_CAPACITY {
            return;
        }
        self.ship.reloading = true;
        self.deferred.schedule(
            self.ticks + RELOAD_TICKS as u64,
            self.epoch,
            ArenaDeferred::ReloadComplete,
        );
        log::debug!("reload started");
    }

    fn boundary_policy(&self) -> BoundaryPolicy {
        match self.mode {
            ArenaMode::Asteroids => BoundaryPolicy::Wrap,
            ArenaMode::ZombieRush => BoundaryPolicy::Clamp,
        }
    }

    fn integrate(&mut self, dt: f32) {
        let (w, h) = (self.width, self.height);
        self.ship.update(dt, self.boundary_policy(), w, h);
        for bullet in &mut self.bullets {
            bullet.update(dt);
            if self.mode == ArenaMode::Asteroids {
                bullet.pos = wrap_position(bullet.pos, w, h);
            }
        }
        for asteroid in &mut self.asteroids {
            asteroid.update(dt, w, h);
        }
        let target = self.ship.pos;
        for zombie in &mut self.zombies {
            zombie.update(dt, target, w, h);
        }
        for powerup in &mut self.powerups {
            powerup.update();
        }
        for particle in &mut self.particles {
            particle.update(dt);
        }
    }

    /// Table-driven resolution, destructive pair kinds first.
    /// A bullet spent on an asteroid cannot also save the ship this tick,
    /// and an asteroid removed by a bullet no longer threatens it.
    fn resolve_collisions(&mut self) {
        match self.mode {
            ArenaMode::Asteroids => {
                self.resolve_bullets_vs_asteroids();
                if self.phase == Phase::Running {
                    self.resolve_ship_vs_asteroids();
                }
            }
            ArenaMode::ZombieRush => {
                self.resolve_bullets_vs_zombies();
                if self.phase == Phase::Running {
                    self.resolve_zombies_vs_player();
                }
                if self.phase == Phase::Running {
                    self.resolve_player_vs_powerups();
                }
            }
        }
    }

    fn resolve_bullets_vs_asteroids(&mut self) {
        let mut bullet_hit = vec![false; self.bullets.len()];
        let mut asteroid_hit = vec![false; self.asteroids.len()];
        let hits = detect(
            &self.bullets,
            &self.asteroids,
            &mut bullet_hit,
            &mut asteroid_hit,
            |b| (b.pos, b.radius),
            |a| (a.pos, a.radius),
        );
        if hits.is_empty() {
            return;
        }
        let mut children = Vec::new();
        for &(_, j) in &hits {
            let rock = &self.asteroids[j];
            self.score += asteroid_score(rock.radius);
            if rock.splits() {
                children.extend(split_asteroid(&mut self.rng, rock));
            }
            let pos = rock.pos;
            spawn_burst(&mut self.rng, &mut self.particles, pos, 12);
        }
        let mut keep_bullet = bullet_hit.iter().map(|hit| !hit);
        self.bullets.retain(|_| keep_bullet.next().unwrap_or(true));
        let mut keep_rock = asteroid_hit.iter().map(|hit| !hit);
        self.asteroids.retain(|_| keep_rock.next().unwrap_or(true));
        self.asteroids.extend(children);
    }

    fn resolve_ship_vs_asteroids(&mut self) {
        if self.ship.is_invincible() {
            return;
        }
        let hit = self
            .asteroids
            .iter()
            .any(|a| circles_overlap(self.ship.pos, self.ship.radius, a.pos, a.radius));
        if !hit {
            return;
        }
        self.ship.lives = self.ship.lives.saturating_sub(1);
        let pos = self.ship.pos;
        spawn_burst(&mut self.rng, &mut self.particles, pos, 20);
        if self.ship.lives == 0 {
            self.game_over();
        } else {
            self.ship.respawn_at_center(self.width, self.height);
        }
    }

    fn resolve_bullets_vs_zombies(&mut self) {
        let mut bullet_hit = vec![false; self.bullets.len()];
        let mut zombie_hit = vec![false; self.zombies.len()];
        let hits = detect(
            &self.bullets,
            &self.zombies,
            &mut bullet_hit,
            &mut zombie_hit,
            |b| (b.pos, b.radius),
            |z| (z.pos, z.radius),
        );
        if hits.is_empty() {
            return;
        }
        let mut dead = vec![false; self.zombies.len()];
        for &(_, j) in &hits {
            let zombie = &mut self.zombies[j];
            zombie.health -= 1;
            if zombie.health <= 0 {
                dead[j] = true;
                self.score += 25 * self.wave as u64;
                let pos = zombie.pos;
                spawn_burst(&mut self.rng, &mut self.particles, pos, 12);
                if self.rng.random_bool(POWERUP_DROP_CHANCE) {
                    let kind = match self.rng.random_range(0..3) {
                        0 => PowerUpKind::Medkit,
                        1 => PowerUpKind::AmmoCache,
                        _ => PowerUpKind::RapidFire,
                    };
                    self.powerups.push(PowerUp::new(pos, kind));
                }
            }
        }
        let mut keep_bullet = bullet_hit.iter().map(|hit| !hit);
        self.bullets.retain(|_| keep_bullet.next().unwrap_or(true));
        let mut keep_zombie = dead.iter().map(|d| !d);
        self.zombies.retain(|_| keep_zombie.next().unwrap_or(true));
    }

    fn resolve_zombies_vs_player(&mut self) {
        if self.ship.is_invincible() {
            return;
        }
        let bitten = self
            .zombies
            .iter()
            .any(|z| circles_overlap(self.ship.pos, self.ship.radius, z.pos, z.radius));
        if !bitten {
            return;
        }
        self.ship.health -= ZOMBIE_DAMAGE;
        self.ship.invincible_ticks = PLAYER_HURT_TICKS;
        if self.ship.health <= 0 {
            self.game_over();
        }
    }

    fn resolve_player_vs_powerups(&mut self) {
        let ship_pos = self.ship.pos;
        let ship_radius = self.ship.radius;
        let mut collected = Vec::new();
        self.powerups.retain(|p| {
            if circles_overlap(ship_pos, ship_radius, p.pos, p.radius) {
                collected.push(p.kind);
                false
            } else {
                true
            }
        });
        for kind in collected {
            match kind {
                PowerUpKind::Medkit => {
                    self.ship.health = (self.ship.health + 25).min(PLAYER_HEALTH);
                }
                PowerUpKind::AmmoCache => {
                    // Instant refill also cancels a reload in flight;
                    // the deferred completion becomes harmless
                    self.ship.ammo = AMMO_CAPACITY;
                    self.ship.reloading = false;
                }
                PowerUpKind::RapidFire => {
                    self.ship.rapid_fire_ticks = RAPID_FIRE_TICKS;
                }
            }
            log::debug!("power-up applied: {kind:?}");
        }
    }

    /// Spawn the next wave once the field is clear, with a grace window
    fn direct_waves(&mut self) {
        let field_clear = match self.mode {
            ArenaMode::Asteroids => self.asteroids.is_empty(),
            ArenaMode::ZombieRush => self.zombies.is_empty(),
        };
        if !field_clear {
            return;
        }
        self.wave += 1;
        self.spawn_wave();
        self.ship.invincible_ticks = SHIP_INVINCIBLE_TICKS;
        self.events.push(SessionEvent::LevelUp { level: self.wave });
        log::info!("wave {} incoming", self.wave);
    }

    /// Populate the field for the current wave number
    fn spawn_wave(&mut self) {
        match self.mode {
            ArenaMode::Asteroids => {
                let count = 2 + self.wave;
                for _ in 0..count {
                    let exclusions = [(self.ship.pos, self.ship.radius)];
                    match spawn_point(
                        &mut self.rng,
                        self.width,
                        self.height,
                        &exclusions,
                        ASTEROID_SPAWN_CLEARANCE,
                    ) {
                        Ok(pos) => {
                            let radius =
                                self.rng.random_range(ASTEROID_SPLIT_MIN_RADIUS..ASTEROID_MAX_RADIUS);
                            let rock = Asteroid::new(&mut self.rng, pos, radius);
                            self.asteroids.push(rock);
                        }
                        Err(err) => log::debug!("asteroid spawn skipped: {err}"),
                    }
                }
            }
            ArenaMode::ZombieRush => {
                let count = 3 + 2 * self.wave;
                for _ in 0..count {
                    let exclusions = [(self.ship.pos, self.ship.radius)];
                    match spawn_point(
                        &mut self.rng,
                        self.width,
                        self.height,
                        &exclusions,
                        ZOMBIE_SPAWN_CLEARANCE,
                    ) {
                        Ok(pos) => {
                            let wave = self.wave;
                            let zombie = Zombie::new(&mut self.rng, pos, wave);
                            self.zombies.push(zombie);
                        }
                        Err(err) => log::debug!("zombie spawn skipped: {err}"),
                    }
                }
            }
        }
    }

    /// Remove ttl-expired and out-of-bounds actors
    fn expire(&mut self) {
        let (w, h) = (self.width, self.height);
        match self.mode {
            ArenaMode::Asteroids => self.bullets.retain(|b| !b.is_expired()),
            ArenaMode::ZombieRush => self
                .bullets
                .retain(|b| !b.is_expired() && !b.is_out_of_bounds(w, h)),
        }
        self.particles.retain(|p| !p.is_expired());
        self.powerups.retain(|p| !p.is_expired());
    }

    fn game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.events.push(SessionEvent::GameOver {
            score: self.score,
            level: self.wave,
        });
        log::info!("game over: score {} wave {}", self.score, self.wave);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn mode(&self) -> ArenaMode {
        self.mode
    }

    pub fn hud(&self) -> Hud {
        let (lives, ammo) = match self.mode {
            ArenaMode::Asteroids => (self.ship.lives as u32, None),
            ArenaMode::ZombieRush => (self.ship.health.max(0) as u32, Some(self.ship.ammo)),
        };
        Hud {
            score: self.score,
            level: self.wave,
            lives,
            ammo,
        }
    }

    /// Read-only snapshot for the draw collaborator
    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            mode: self.mode,
            ship: self.ship.clone(),
            bullets: self.bullets.clone(),
            asteroids: self.asteroids.clone(),
            zombies: self.zombies.clone(),
            powerups: self.powerups.clone(),
            particles: self.particles.clone(),
            phase: self.phase,
            hud: self.hud(),
        }
    }

    /// Drain lifecycle events for the shell
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    fn running(mode: ArenaMode, seed: u64) -> ArenaSession {
        let mut session = ArenaSession::new(mode);
        session.start(seed).unwrap();
        session
    }

    #[test]
    fn bullet_splits_large_asteroid_and_scores() {
        // Scenario: bullet overlapping an asteroid of radius 25
        let mut session = running(ArenaMode::Asteroids, 1);
        session.asteroids.clear();
        session.bullets.clear();
        let rock = Asteroid::new(&mut session.rng, Vec2::new(400.0, 300.0), 25.0);
        session.asteroids.push(rock);
        session.bullets.push(Bullet {
            pos: Vec2::new(400.0, 300.0),
            vel: Vec2::ZERO,
            radius: BULLET_RADIUS,
            ttl_ticks: 10,
        });
        let score_before = session.score();
        session.resolve_bullets_vs_asteroids();
        assert_eq!(session.score(), score_before + 40);
        assert!(session.bullets.is_empty());
        assert_eq!(session.asteroids.len(), 2);
        for child in &session.asteroids {
            assert_eq!(child.radius, 12.5);
        }
    }

    #[test]
    fn small_asteroid_does_not_split() {
        let mut session = running(ArenaMode::Asteroids, 2);
        session.asteroids.clear();
        session.bullets.clear();
        let rock = Asteroid::new(&mut session.rng, Vec2::new(200.0, 200.0), 12.5);
        session.asteroids.push(rock);
        session.bullets.push(Bullet {
            pos: Vec2::new(200.0, 200.0),
            vel: Vec2::ZERO,
            radius: BULLET_RADIUS,
            ttl_ticks: 10,
        });
        session.resolve_bullets_vs_asteroids();
        assert!(session.asteroids.is_empty());
        assert_eq!(session.score(), 80);
    }

    #[test]
    fn last_life_collision_is_game_over() {
        // Scenario: lives=1, not invincible, asteroid on top of the ship
        let mut session = running(ArenaMode::Asteroids, 3);
        session.asteroids.clear();
        session.ship.lives = 1;
        session.ship.invincible_ticks = 0;
        let rock = Asteroid::new(&mut session.rng, session.ship.pos, 30.0);
        session.asteroids.push(rock);
        session.resolve_collisions();
        assert_eq!(session.phase(), Phase::GameOver);
        assert!(
            session
                .take_events()
                .iter()
                .any(|e| matches!(e, SessionEvent::GameOver { .. }))
        );
    }

    #[test]
    fn surviving_collision_respawns_with_invincibility() {
        let mut session = running(ArenaMode::Asteroids, 4);
        session.asteroids.clear();
        session.ship.lives = 3;
        session.ship.invincible_ticks = 0;
        session.ship.pos = Vec2::new(100.0, 100.0);
        let rock = Asteroid::new(&mut session.rng, session.ship.pos, 30.0);
        session.asteroids.push(rock);
        session.resolve_collisions();
        assert_eq!(session.ship.lives, 2);
        assert_eq!(session.ship.pos, Vec2::new(400.0, 300.0));
        assert_eq!(session.ship.invincible_ticks, SHIP_INVINCIBLE_TICKS);
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn invincible_ship_shrugs_off_asteroids() {
        let mut session = running(ArenaMode::Asteroids, 5);
        session.asteroids.clear();
        session.ship.lives = 2;
        session.ship.invincible_ticks = 60;
        let rock = Asteroid::new(&mut session.rng, session.ship.pos, 30.0);
        session.asteroids.push(rock);
        session.resolve_collisions();
        assert_eq!(session.ship.lives, 2);
    }

    #[test]
    fn bullet_cannot_save_ship_in_same_tick() {
        // One bullet, one deadly asteroid overlapping both the bullet
        // and the ship: the bullet resolves first, removing the rock,
        // so the ship survives on the destructive-pair ordering.
        let mut session = running(ArenaMode::Asteroids, 6);
        session.asteroids.clear();
        session.bullets.clear();
        session.ship.lives = 1;
        session.ship.invincible_ticks = 0;
        let rock = Asteroid::new(&mut session.rng, session.ship.pos, 15.0);
        session.asteroids.push(rock);
        session.bullets.push(Bullet {
            pos: session.ship.pos,
            vel: Vec2::ZERO,
            radius: BULLET_RADIUS,
            ttl_ticks: 10,
        });
        session.resolve_collisions();
        // Rock died to the bullet before the ship check ran
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.ship.lives, 1);
    }

    #[test]
    fn wave_director_spawns_next_wave_with_grace() {
        let mut session = running(ArenaMode::Asteroids, 7);
        session.asteroids.clear();
        session.ship.invincible_ticks = 0;
        let input = InputState::new();
        session.tick(&input, SIM_DT);
        assert_eq!(session.wave(), 2);
        assert_eq!(session.asteroids.len(), 4); // 2 + wave
        assert!(session.ship.invincible_ticks > 0);
        assert!(
            session
                .take_events()
                .iter()
                .any(|e| matches!(e, SessionEvent::LevelUp { level: 2 }))
        );
    }

    #[test]
    fn reload_blocks_firing_until_complete() {
        // Scenario: reload with ammo=0, fire mid-reload
        let mut session = running(ArenaMode::ZombieRush, 8);
        session.zombies.clear();
        session.ship.ammo = 0;
        let mut input = InputState::new();
        input.reload = true;
        session.tick(&input, SIM_DT);
        assert!(session.ship.reloading);

        let mut fire = InputState::new();
        fire.fire = true;
        for _ in 0..10 {
            session.tick(&fire, SIM_DT);
            assert_eq!(session.ship.ammo, 0);
            assert!(session.bullets.is_empty());
        }

        // Run out the reload timer
        let idle = InputState::new();
        for _ in 0..RELOAD_TICKS as usize {
            session.tick(&idle, SIM_DT);
        }
        assert!(!session.ship.reloading);
        assert_eq!(session.ship.ammo, AMMO_CAPACITY);

        // Clear the field so the fresh bullet survives to be counted
        session.zombies.clear();
        session.tick(&fire, SIM_DT);
        assert_eq!(session.ship.ammo, AMMO_CAPACITY - 1);
        assert_eq!(session.bullets.len(), 1);
    }

    #[test]
    fn reload_cannot_retrigger_while_reloading_or_full() {
        let mut session = running(ArenaMode::ZombieRush, 9);
        session.zombies.clear();
        // Full clip: no reload starts
        session.try_reload();
        assert!(!session.ship.reloading);
        assert!(session.deferred.is_empty());
        // Partial clip: one reload starts, the second request is ignored
        session.ship.ammo = 3;
        session.try_reload();
        assert!(session.ship.reloading);
        session.try_reload();
        let mut input = InputState::new();
        input.reload = true;
        session.tick(&input, SIM_DT);
        // Only the original completion is pending
        let due = session.deferred.drain_due(session.ticks + RELOAD_TICKS as u64, session.epoch);
        assert_eq!(due.len(), 1);
    }

    #[test]
    fn firing_on_empty_clip_starts_a_reload() {
        let mut session = running(ArenaMode::ZombieRush, 10);
        session.zombies.clear();
        session.ship.ammo = 0;
        let mut fire = InputState::new();
        fire.fire = true;
        session.tick(&fire, SIM_DT);
        assert!(session.ship.reloading);
        assert!(session.bullets.is_empty());
    }

    #[test]
    fn zombie_bite_damages_through_then_grace() {
        let mut session = running(ArenaMode::ZombieRush, 11);
        session.zombies.clear();
        session.ship.invincible_ticks = 0;
        let mut zombie = Zombie::new(&mut session.rng, session.ship.pos, 1);
        zombie.speed = 0.0;
        session.zombies.push(zombie);
        session.resolve_collisions();
        assert_eq!(session.ship.health, PLAYER_HEALTH - ZOMBIE_DAMAGE);
        assert_eq!(session.ship.invincible_ticks, PLAYER_HURT_TICKS);
        // Still overlapping, but inside the grace window
        session.resolve_collisions();
        assert_eq!(session.ship.health, PLAYER_HEALTH - ZOMBIE_DAMAGE);
    }

    #[test]
    fn depleted_health_is_game_over() {
        let mut session = running(ArenaMode::ZombieRush, 12);
        session.zombies.clear();
        session.ship.invincible_ticks = 0;
        session.ship.health = ZOMBIE_DAMAGE;
        let mut zombie = Zombie::new(&mut session.rng, session.ship.pos, 1);
        zombie.speed = 0.0;
        session.zombies.push(zombie);
        session.resolve_collisions();
        assert_eq!(session.phase(), Phase::GameOver);
    }

    #[test]
    fn powerups_apply_and_disappear() {
        let mut session = running(ArenaMode::ZombieRush, 13);
        session.zombies.clear();
        session.ship.health = 50;
        session.ship.ammo = 2;
        session
            .powerups
            .push(PowerUp::new(session.ship.pos, PowerUpKind::Medkit));
        session
            .powerups
            .push(PowerUp::new(session.ship.pos, PowerUpKind::AmmoCache));
        session.resolve_collisions();
        assert_eq!(session.ship.health, 75);
        assert_eq!(session.ship.ammo, AMMO_CAPACITY);
        assert!(session.powerups.is_empty());
    }

    #[test]
    fn restart_matches_fresh_start() {
        let mut session = running(ArenaMode::Asteroids, 14);
        let input = InputState::new();
        for _ in 0..120 {
            session.tick(&input, SIM_DT);
        }
        session.stop();
        session.stop(); // Idempotent
        assert_eq!(session.phase(), Phase::Idle);
        session.start(14).unwrap();
        let restarted = session.snapshot();

        let fresh = running(ArenaMode::Asteroids, 14);
        let first = fresh.snapshot();
        assert_eq!(restarted.hud, first.hud);
        assert_eq!(restarted.asteroids.len(), first.asteroids.len());
        assert!(restarted.bullets.is_empty());
        assert_eq!(restarted.ship.lives, SHIP_LIVES);
    }

    proptest! {
        /// Every surviving actor stays inside the playfield under
        /// arbitrary held-input sequences, and score/wave stay monotone.
        #[test]
        fn actors_stay_in_bounds(
            seed in 0u64..500,
            inputs in proptest::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 1..150)
        ) {
            let mut session = running(ArenaMode::Asteroids, seed);
            let mut last_score = 0;
            let mut last_wave = 1;
            for (thrust, fire, rotate) in inputs {
                let mut input = InputState::new();
                input.thrust = thrust;
                input.fire = fire;
                input.rotate_left = rotate;
                session.tick(&input, SIM_DT);
                if session.phase() != Phase::Running {
                    break;
                }
                let shot = session.snapshot();
                let in_bounds = |p: Vec2| {
                    p.x >= 0.0 && p.x < ARENA_WIDTH && p.y >= 0.0 && p.y < ARENA_HEIGHT
                };
                prop_assert!(in_bounds(shot.ship.pos));
                for b in &shot.bullets {
                    prop_assert!(in_bounds(b.pos));
                }
                for a in &shot.asteroids {
                    prop_assert!(in_bounds(a.pos));
                }
                prop_assert!(session.score() >= last_score);
                prop_assert!(session.wave() >= last_wave);
                last_score = session.score();
                last_wave = session.wave();
            }
        }
    }
}
