//! # Starfield Simulation
//!
//! Radial particle model for the warp effect: stars sit on rays from the
//! canvas center, move outward every frame, and respawn near the center
//! once they cross the outer radius.
//!
//! Two field modes exist, matching the two historical renderers:
//! - [`FieldMode::Compound`] spawns the whole population up front and grows
//!   each star's distance by 1% of itself per frame, so stars accelerate
//!   the farther out they are.
//! - [`FieldMode::ContinuousSpawn`] trickles stars in one per frame and
//!   moves each at a constant speed fixed at spawn time.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// ============================================================================
// Field Constants
// ============================================================================

/// Outer radius of the field. A star past this is recycled.
pub const MAX_DISTANCE: f64 = 1000.0;

/// Distance a recycled star restarts from.
pub const RESET_DISTANCE: f64 = 0.1;

/// Per-frame increment is `distance / SPEED_DIVISOR` (directly in Compound
/// mode, frozen at spawn time in ContinuousSpawn mode).
const SPEED_DIVISOR: f64 = 100.0;

// ============================================================================
// Field Mode
// ============================================================================

/// Motion and spawn policy for the whole field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldMode {
    /// Full population at start, `distance += distance / 100` per frame,
    /// recycling keeps the star on its original ray.
    Compound,
    /// Empty at start, one new star per frame until the target is reached,
    /// `distance += speed` per frame, recycling redraws the angle.
    ContinuousSpawn,
}

impl Default for FieldMode {
    fn default() -> Self {
        FieldMode::ContinuousSpawn
    }
}

// ============================================================================
// Star
// ============================================================================

/// One particle of the field.
#[derive(Debug, Clone, Copy)]
pub struct Star {
    /// Ray angle in radians, in `[0, 2π)`.
    pub angle: f64,
    /// Radial offset from the canvas center, in `[0, MAX_DISTANCE]`.
    pub distance: f64,
    /// Per-frame increment, `Some` only in ContinuousSpawn mode.
    ///
    /// Fixed at `distance / 100` using the spawn-time distance and never
    /// recomputed, not even when the star is recycled. The stale speed
    /// after a recycle is a quirk of the original renderer that callers
    /// rely on for the look of the field.
    pub speed: Option<f64>,
}

impl Star {
    /// Draw a fresh star from the injected random source.
    pub fn spawn<R: Rng>(mode: FieldMode, rng: &mut R) -> Self {
        let angle = rng.gen::<f64>() * 2.0 * PI;
        let distance = rng.gen::<f64>() * MAX_DISTANCE;
        let speed = match mode {
            FieldMode::Compound => None,
            FieldMode::ContinuousSpawn => Some(distance / SPEED_DIVISOR),
        };
        Self {
            angle,
            distance,
            speed,
        }
    }
}

// ============================================================================
// Starfield
// ============================================================================

/// Ordered population of stars plus its spawn/recycle policy.
pub struct Starfield {
    stars: Vec<Star>,
    target: usize,
    mode: FieldMode,
}

impl Starfield {
    /// Create a field with the given target population size.
    ///
    /// Compound mode fills the population immediately; ContinuousSpawn
    /// starts empty and gains one star per [`step`](Self::step).
    pub fn new<R: Rng>(mode: FieldMode, target: usize, rng: &mut R) -> Self {
        let stars = match mode {
            FieldMode::Compound => (0..target).map(|_| Star::spawn(mode, rng)).collect(),
            FieldMode::ContinuousSpawn => Vec::with_capacity(target),
        };
        Self {
            stars,
            target,
            mode,
        }
    }

    pub fn mode(&self) -> FieldMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Current particle state, in population order.
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Advance the field by one frame tick.
    ///
    /// Growth runs before the motion update so a star spawned this frame
    /// also receives this frame's update. Every star past [`MAX_DISTANCE`]
    /// is recycled to [`RESET_DISTANCE`] in the same tick.
    pub fn step<R: Rng>(&mut self, rng: &mut R) {
        if self.mode == FieldMode::ContinuousSpawn && self.stars.len() < self.target {
            self.stars.push(Star::spawn(self.mode, rng));
        }

        let mode = self.mode;
        for star in &mut self.stars {
            let increment = match star.speed {
                Some(speed) => speed,
                None => star.distance / SPEED_DIVISOR,
            };
            star.distance += increment;

            if star.distance > MAX_DISTANCE {
                star.distance = RESET_DISTANCE;
                if mode == FieldMode::ContinuousSpawn {
                    star.angle = rng.gen::<f64>() * 2.0 * PI;
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5742)
    }

    #[test]
    fn spawn_draws_within_ranges() {
        let mut rng = rng();
        for _ in 0..1000 {
            let star = Star::spawn(FieldMode::ContinuousSpawn, &mut rng);
            assert!(star.angle >= 0.0 && star.angle < 2.0 * PI);
            assert!(star.distance >= 0.0 && star.distance <= MAX_DISTANCE);
            let speed = star.speed.unwrap();
            assert!(speed >= 0.0);
            assert_eq!(speed, star.distance / 100.0);
        }
    }

    #[test]
    fn compound_stars_have_no_stored_speed() {
        let mut rng = rng();
        let star = Star::spawn(FieldMode::Compound, &mut rng);
        assert!(star.speed.is_none());
    }

    #[test]
    fn compound_field_is_full_at_start() {
        let mut rng = rng();
        let field = Starfield::new(FieldMode::Compound, 250, &mut rng);
        assert_eq!(field.len(), 250);
    }

    #[test]
    fn continuous_field_grows_one_per_frame_up_to_target() {
        let mut rng = rng();
        let mut field = Starfield::new(FieldMode::ContinuousSpawn, 10, &mut rng);
        assert!(field.is_empty());

        for expected in 1..=10 {
            field.step(&mut rng);
            assert_eq!(field.len(), expected);
        }
        for _ in 0..5 {
            field.step(&mut rng);
            assert_eq!(field.len(), 10);
        }
    }

    #[test]
    fn invariants_hold_over_many_steps() {
        let mut rng = rng();
        for mode in [FieldMode::Compound, FieldMode::ContinuousSpawn] {
            let mut field = Starfield::new(mode, 100, &mut rng);
            for _ in 0..500 {
                field.step(&mut rng);
                for star in field.stars() {
                    assert!(star.distance >= 0.0 && star.distance <= MAX_DISTANCE);
                    assert!(star.angle >= 0.0 && star.angle < 2.0 * PI);
                }
            }
        }
    }

    #[test]
    fn recycle_resets_distance_and_keeps_speed() {
        let mut rng = rng();
        let mut field = Starfield {
            stars: vec![Star {
                angle: 1.0,
                distance: 999.5,
                speed: Some(5.0),
            }],
            target: 1,
            mode: FieldMode::ContinuousSpawn,
        };
        field.step(&mut rng);

        let star = field.stars()[0];
        assert_eq!(star.distance, RESET_DISTANCE);
        assert_eq!(star.speed, Some(5.0));
        assert!(star.angle >= 0.0 && star.angle < 2.0 * PI);
    }

    #[test]
    fn compound_recycle_keeps_angle() {
        let mut rng = rng();
        let mut field = Starfield {
            stars: vec![Star {
                angle: 2.5,
                distance: 999.5,
                speed: None,
            }],
            target: 1,
            mode: FieldMode::Compound,
        };
        field.step(&mut rng);

        let star = field.stars()[0];
        assert_eq!(star.distance, RESET_DISTANCE);
        assert_eq!(star.angle, 2.5);
    }

    #[test]
    fn star_exactly_on_outer_radius_is_not_recycled() {
        // Recycling requires distance strictly greater than the radius.
        let mut rng = rng();
        let mut field = Starfield {
            stars: vec![Star {
                angle: 0.0,
                distance: MAX_DISTANCE,
                speed: Some(0.0),
            }],
            target: 1,
            mode: FieldMode::ContinuousSpawn,
        };
        for _ in 0..10 {
            field.step(&mut rng);
        }
        assert_eq!(field.stars()[0].distance, MAX_DISTANCE);
    }
}
