//! Collision detection and split/score helpers
//!
//! Continuous collisions are circle-overlap tests; grid collisions are
//! exact cell equality and live with the grid core. Resolution policy is
//! table-driven inside each core, evaluated once per step after all
//! entities have moved, destructive pair kinds first. The helpers here
//! are the pieces every resolution shares: pair detection that skips
//! already-removed entities, asteroid splitting, and radius scoring.

use glam::Vec2;
use rand::Rng;

use crate::consts::ASTEROID_MAX_SPEED;
use crate::heading;

use super::actor::Asteroid;

/// Circle overlap: distance strictly less than the radius sum
#[inline]
pub fn circles_overlap(pa: Vec2, ra: f32, pb: Vec2, rb: f32) -> bool {
    pa.distance_squared(pb) < (ra + rb) * (ra + rb)
}

/// Detect overlapping pairs between two entity lists.
///
/// `removed_a` / `removed_b` mark entities already resolved by an earlier
/// pair kind this step; they are skipped, and each reported hit marks its
/// participants so one bullet never kills twice in a step.
pub fn detect<A, B>(
    a_list: &[A],
    b_list: &[B],
    removed_a: &mut [bool],
    removed_b: &mut [bool],
    circle_of_a: impl Fn(&A) -> (Vec2, f32),
    circle_of_b: impl Fn(&B) -> (Vec2, f32),
) -> Vec<(usize, usize)> {
    let mut hits = Vec::new();
    for (i, a) in a_list.iter().enumerate() {
        if removed_a[i] {
            continue;
        }
        let (pa, ra) = circle_of_a(a);
        for (j, b) in b_list.iter().enumerate() {
            if removed_b[j] {
                continue;
            }
            let (pb, rb) = circle_of_b(b);
            if circles_overlap(pa, ra, pb, rb) {
                removed_a[i] = true;
                removed_b[j] = true;
                hits.push((i, j));
                break;
            }
        }
    }
    hits
}

/// Points awarded for destroying an asteroid: smaller rocks pay more
#[inline]
pub fn asteroid_score(radius: f32) -> u64 {
    ((100.0 / radius).round() as u64) * 10
}

/// Split a destroyed asteroid into two half-radius children with
/// independent random velocities
pub fn split_asteroid<R: Rng>(rng: &mut R, parent: &Asteroid) -> [Asteroid; 2] {
    let child_radius = parent.radius / 2.0;
    [
        child_of(rng, parent.pos, child_radius),
        child_of(rng, parent.pos, child_radius),
    ]
}

fn child_of<R: Rng>(rng: &mut R, pos: Vec2, radius: f32) -> Asteroid {
    let mut child = Asteroid::new(rng, pos, radius);
    // Children fly apart faster than a fresh spawn drifts
    let speed = rng.random_range(40.0..ASTEROID_MAX_SPEED * 1.5);
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    child.vel = heading(angle) * speed;
    child
}
