//! Continuous-space entity model
//!
//! Every actor is a plain struct held in a typed vector on the arena
//! session, updated by a single function per kind and removed by index.
//! Movement integration is explicit Euler with per-step damping for
//! actors that coast.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{clamp_position, heading, wrap_position};

/// Edge policy for an actor kind
///
/// Asteroids-style actors wrap torus-style; the zombie-rush player and
/// zombies clamp to the playfield. Both policies are per-variant
/// configuration, never unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    Wrap,
    Clamp,
}

/// Apply a boundary policy to a position
pub fn apply_boundary(pos: Vec2, radius: f32, policy: BoundaryPolicy, width: f32, height: f32) -> Vec2 {
    match policy {
        BoundaryPolicy::Wrap => wrap_position(pos, width, height),
        BoundaryPolicy::Clamp => clamp_position(pos, radius, width, height),
    }
}

/// The player vessel, shared by both arena variants
///
/// Asteroids uses `lives` + rotation/thrust; zombie-rush uses `health`,
/// `ammo`, and axis movement. Unused fields stay at their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle in radians (0 = +x)
    pub angle: f32,
    pub radius: f32,
    pub lives: u8,
    pub health: i32,
    /// Ticks of invincibility remaining (respawn / wave grace)
    pub invincible_ticks: u32,
    /// Ticks until the next shot is allowed
    pub fire_cooldown: u32,
    pub ammo: u32,
    /// A reload is in flight; firing and re-reloading are both blocked
    pub reloading: bool,
    /// Ticks of halved fire cooldown remaining (RapidFire power-up)
    pub rapid_fire_ticks: u32,
}

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            angle: -std::f32::consts::FRAC_PI_2, // Facing up
            radius: SHIP_RADIUS,
            lives: SHIP_LIVES,
            health: PLAYER_HEALTH,
            invincible_ticks: 0,
            fire_cooldown: 0,
            ammo: AMMO_CAPACITY,
            reloading: false,
            rapid_fire_ticks: 0,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }

    /// Integrate one step: damping then position, per-tick counters decay
    pub fn update(&mut self, dt: f32, policy: BoundaryPolicy, width: f32, height: f32) {
        self.vel *= VELOCITY_DAMPING;
        self.pos += self.vel * dt;
        self.pos = apply_boundary(self.pos, self.radius, policy, width, height);
        self.invincible_ticks = self.invincible_ticks.saturating_sub(1);
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);
        self.rapid_fire_ticks = self.rapid_fire_ticks.saturating_sub(1);
    }

    /// Effective cooldown after a shot, honoring RapidFire
    pub fn shot_cooldown(&self) -> u32 {
        if self.rapid_fire_ticks > 0 {
            SHIP_FIRE_COOLDOWN_TICKS / 2
        } else {
            SHIP_FIRE_COOLDOWN_TICKS
        }
    }

    /// Reposition to center with a fresh invincibility window (life lost)
    pub fn respawn_at_center(&mut self, width: f32, height: f32) {
        self.pos = Vec2::new(width / 2.0, height / 2.0);
        self.vel = Vec2::ZERO;
        self.angle = -std::f32::consts::FRAC_PI_2;
        self.invincible_ticks = SHIP_INVINCIBLE_TICKS;
    }
}

/// A fired projectile; expires by ttl rather than at the screen edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub ttl_ticks: u32,
}

impl Bullet {
    /// Spawn from the ship's nose along its facing
    pub fn fired_from(ship: &Ship) -> Self {
        let dir = heading(ship.angle);
        Self {
            pos: ship.pos + dir * (ship.radius + 2.0),
            vel: dir * BULLET_SPEED + ship.vel,
            radius: BULLET_RADIUS,
            ttl_ticks: BULLET_TTL_TICKS,
        }
    }

    /// Integrate one step. The owning session applies the boundary
    /// policy afterward: wrap for asteroids, off-bounds expiry for the
    /// clamp-variant games.
    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.ttl_ticks = self.ttl_ticks.saturating_sub(1);
    }

    pub fn is_expired(&self) -> bool {
        self.ttl_ticks == 0
    }

    /// Outside the playfield entirely (no-wrap variants expire here)
    pub fn is_out_of_bounds(&self, width: f32, height: f32) -> bool {
        self.pos.x < -self.radius
            || self.pos.x > width + self.radius
            || self.pos.y < -self.radius
            || self.pos.y > height + self.radius
    }
}

/// A drifting rock; larger ones split in two when shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Radial jitter per vertex, render-only jaggedness
    pub vertices: Vec<f32>,
}

impl Asteroid {
    pub fn new<R: Rng>(rng: &mut R, pos: Vec2, radius: f32) -> Self {
        let speed = rng.random_range(20.0..ASTEROID_MAX_SPEED);
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let vertices = (0..10)
            .map(|_| rng.random_range(0.75..1.25))
            .collect();
        Self {
            pos,
            vel: heading(angle) * speed,
            radius,
            vertices,
        }
    }

    pub fn update(&mut self, dt: f32, width: f32, height: f32) {
        self.pos += self.vel * dt;
        self.pos = apply_boundary(self.pos, self.radius, BoundaryPolicy::Wrap, width, height);
    }

    /// Large enough to split into two children when destroyed
    pub fn splits(&self) -> bool {
        self.radius > ASTEROID_SPLIT_MIN_RADIUS
    }
}

/// A shambler that seeks the player every step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zombie {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub health: i32,
    pub speed: f32,
}

impl Zombie {
    pub fn new<R: Rng>(rng: &mut R, pos: Vec2, wave: u32) -> Self {
        // Later waves shamble faster and soak more hits
        let speed = ZOMBIE_BASE_SPEED + rng.random_range(0.0..20.0) + wave as f32 * 4.0;
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: ZOMBIE_RADIUS,
            health: 1 + (wave / 3) as i32,
            speed,
        }
    }

    /// Steer toward the target and integrate one step
    pub fn update(&mut self, dt: f32, target: Vec2, width: f32, height: f32) {
        let to_target = (target - self.pos).normalize_or_zero();
        self.vel = to_target * self.speed;
        self.pos += self.vel * dt;
        self.pos = apply_boundary(self.pos, self.radius, BoundaryPolicy::Clamp, width, height);
    }
}

/// Power-up effect applied on pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Medkit,
    AmmoCache,
    RapidFire,
}

/// A collectible dropped by a kill; despawns when its ttl runs out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub radius: f32,
    pub ttl_ticks: u32,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            pos,
            kind,
            radius: POWERUP_RADIUS,
            ttl_ticks: POWERUP_TTL_TICKS,
        }
    }

    pub fn update(&mut self) {
        self.ttl_ticks = self.ttl_ticks.saturating_sub(1);
    }

    pub fn is_expired(&self) -> bool {
        self.ttl_ticks == 0
    }
}

/// A cosmetic burst fragment; never gameplay-affecting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub size: f32,
}

impl Particle {
    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.vel *= VELOCITY_DAMPING;
        self.life -= dt * 1.5;
        self.size *= 0.995;
    }

    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }
}

/// Burst of particles at a kill/split site
pub fn spawn_burst<R: Rng>(rng: &mut R, particles: &mut Vec<Particle>, pos: Vec2, count: usize) {
    for _ in 0..count {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(40.0..180.0);
        particles.push(Particle {
            pos,
            vel: heading(angle) * speed,
            life: rng.random_range(0.4..1.0),
            size: rng.random_range(1.5..4.0),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn ship_wraps_at_bounds() {
        let mut ship = Ship::new(Vec2::new(799.0, 300.0));
        ship.vel = Vec2::new(600.0, 0.0);
        ship.update(1.0 / 60.0, BoundaryPolicy::Wrap, 800.0, 600.0);
        assert!(ship.pos.x < 12.0, "expected wrap, got {}", ship.pos.x);
    }

    #[test]
    fn player_clamps_at_bounds() {
        let mut ship = Ship::new(Vec2::new(795.0, 300.0));
        ship.vel = Vec2::new(600.0, 0.0);
        ship.update(1.0 / 60.0, BoundaryPolicy::Clamp, 800.0, 600.0);
        assert_eq!(ship.pos.x, 800.0 - ship.radius);
    }

    #[test]
    fn damping_slows_coasting_ship() {
        let mut ship = Ship::new(Vec2::new(400.0, 300.0));
        ship.vel = Vec2::new(100.0, 0.0);
        ship.update(1.0 / 60.0, BoundaryPolicy::Wrap, 800.0, 600.0);
        assert!((ship.vel.x - 98.0).abs() < 0.001);
    }

    #[test]
    fn bullet_expires_by_ttl() {
        let ship = Ship::new(Vec2::new(400.0, 300.0));
        let mut bullet = Bullet::fired_from(&ship);
        assert!(!bullet.is_expired());
        for _ in 0..BULLET_TTL_TICKS {
            bullet.update(1.0 / 60.0);
        }
        assert!(bullet.is_expired());
    }

    #[test]
    fn bullet_off_bounds_detection() {
        let mut ship = Ship::new(Vec2::new(700.0, 300.0));
        ship.angle = 0.0;
        let mut bullet = Bullet::fired_from(&ship);
        assert!(!bullet.is_out_of_bounds(800.0, 600.0));
        for _ in 0..20 {
            bullet.update(1.0 / 60.0);
        }
        assert!(bullet.is_out_of_bounds(800.0, 600.0));
    }

    #[test]
    fn zombie_seeks_target() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut zombie = Zombie::new(&mut rng, Vec2::new(100.0, 100.0), 1);
        let target = Vec2::new(400.0, 300.0);
        let before = zombie.pos.distance(target);
        zombie.update(1.0 / 60.0, target, 800.0, 600.0);
        assert!(zombie.pos.distance(target) < before);
    }

    #[test]
    fn split_threshold() {
        let mut rng = Pcg32::seed_from_u64(9);
        let big = Asteroid::new(&mut rng, Vec2::ZERO, 25.0);
        let small = Asteroid::new(&mut rng, Vec2::ZERO, 12.5);
        assert!(big.splits());
        assert!(!small.splits());
    }
}
