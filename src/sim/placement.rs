//! Random placement validator
//!
//! Finds a grid cell or continuous spawn point satisfying exclusion
//! constraints by rejection sampling. The original games looped until a
//! free position turned up; here the search is bounded so a crowded
//! playfield degrades to a skipped spawn cycle instead of a livelock.

use glam::Vec2;
use rand::Rng;

use crate::error::GameError;

use super::grid::GridCell;

/// Retry budget before a spawn search reports exhaustion
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 2048;

/// Find a free grid cell: uniformly sampled, not equal to any excluded
/// cell, and outside the buffer zone (Chebyshev distance) around
/// `buffer`, if one is given.
pub fn free_cell<R: Rng>(
    rng: &mut R,
    width: i32,
    height: i32,
    exclusions: &[&[GridCell]],
    buffer: Option<(GridCell, i32)>,
) -> Result<GridCell, GameError> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let candidate = GridCell {
            x: rng.random_range(0..width),
            y: rng.random_range(0..height),
        };
        let occupied = exclusions
            .iter()
            .any(|set| set.iter().any(|cell| *cell == candidate));
        if occupied {
            continue;
        }
        if let Some((center, distance)) = buffer {
            if (candidate.x - center.x).abs() < distance
                && (candidate.y - center.y).abs() < distance
            {
                continue;
            }
        }
        return Ok(candidate);
    }
    Err(GameError::PlacementExhausted {
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}

/// Find a continuous spawn point: uniformly sampled within
/// `[0, width) x [0, height)`, with Euclidean distance to every exclusion
/// center exceeding that exclusion's radius plus `min_separation`.
pub fn spawn_point<R: Rng>(
    rng: &mut R,
    width: f32,
    height: f32,
    exclusions: &[(Vec2, f32)],
    min_separation: f32,
) -> Result<Vec2, GameError> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let candidate = Vec2::new(rng.random_range(0.0..width), rng.random_range(0.0..height));
        let blocked = exclusions
            .iter()
            .any(|(center, radius)| candidate.distance(*center) <= radius + min_separation);
        if !blocked {
            return Ok(candidate);
        }
    }
    Err(GameError::PlacementExhausted {
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn free_cell_avoids_exclusions() {
        let mut rng = Pcg32::seed_from_u64(7);
        // Exclude everything except (0, 0)
        let mut taken = Vec::new();
        for x in 0..4 {
            for y in 0..4 {
                if !(x == 0 && y == 0) {
                    taken.push(GridCell { x, y });
                }
            }
        }
        let cell = free_cell(&mut rng, 4, 4, &[&taken], None).unwrap();
        assert_eq!(cell, GridCell { x: 0, y: 0 });
    }

    #[test]
    fn free_cell_respects_buffer_zone() {
        let mut rng = Pcg32::seed_from_u64(11);
        let head = GridCell { x: 2, y: 2 };
        for _ in 0..50 {
            let cell = free_cell(&mut rng, 6, 6, &[], Some((head, 3))).unwrap();
            let near = (cell.x - head.x).abs() < 3 && (cell.y - head.y).abs() < 3;
            assert!(!near, "cell {cell:?} inside head buffer");
        }
    }

    #[test]
    fn full_grid_reports_exhaustion() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut taken = Vec::new();
        for x in 0..3 {
            for y in 0..3 {
                taken.push(GridCell { x, y });
            }
        }
        let result = free_cell(&mut rng, 3, 3, &[&taken], None);
        assert!(matches!(
            result,
            Err(GameError::PlacementExhausted { .. })
        ));
    }

    #[test]
    fn spawn_point_clears_exclusion_radius() {
        let mut rng = Pcg32::seed_from_u64(42);
        let ship = (Vec2::new(400.0, 300.0), 12.0);
        for _ in 0..50 {
            let p = spawn_point(&mut rng, 800.0, 600.0, &[ship], 100.0).unwrap();
            assert!(p.distance(ship.0) > 112.0);
            assert!(p.x >= 0.0 && p.x < 800.0);
            assert!(p.y >= 0.0 && p.y < 600.0);
        }
    }
}
