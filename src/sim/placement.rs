//! Random target placement
//!
//! Centers are drawn uniformly from the rectangle of points whose circle stays
//! inside the surface.

use glam::Vec2;
use rand::Rng;

use super::target::SurfaceSize;
use crate::consts::MIN_TARGET_RADIUS;
use crate::error::GameError;

/// Where a new target goes, and the radius it actually got
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub center: Vec2,
    pub radius: u32,
}

/// Pick a center for a circle of `radius` on `size`.
///
/// A radius too large for the surface is shrunk to the largest one that fits.
/// Fails only when not even a minimum-size target fits.
pub fn place<R: Rng>(
    size: SurfaceSize,
    radius: u32,
    rng: &mut R,
) -> Result<Placement, GameError> {
    let fitting = size.max_radius();
    if fitting < MIN_TARGET_RADIUS {
        return Err(GameError::InvalidGeometry {
            width: size.width,
            height: size.height,
            radius,
        });
    }
    let radius = radius.clamp(MIN_TARGET_RADIUS, fitting);

    let r = radius as f32;
    let x = rng.random_range(r..=size.width as f32 - r);
    let y = rng.random_range(r..=size.height as f32 - r);

    Ok(Placement {
        center: Vec2::new(x, y),
        radius,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_place_within_valid_centers() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let p = place(SurfaceSize::new(400, 400), 20, &mut rng).unwrap();
            assert_eq!(p.radius, 20);
            assert!((20.0..=380.0).contains(&p.center.x));
            assert!((20.0..=380.0).contains(&p.center.y));
        }
    }

    #[test]
    fn test_place_clamps_oversized_radius() {
        let mut rng = Pcg32::seed_from_u64(1);
        let p = place(SurfaceSize::new(60, 200), 50, &mut rng).unwrap();
        assert_eq!(p.radius, 30);
        assert_eq!(p.center.x, 30.0);
        assert!((30.0..=170.0).contains(&p.center.y));
    }

    #[test]
    fn test_place_zero_radius_becomes_minimum() {
        let mut rng = Pcg32::seed_from_u64(1);
        let p = place(SurfaceSize::new(100, 100), 0, &mut rng).unwrap();
        assert_eq!(p.radius, MIN_TARGET_RADIUS);
    }

    #[test]
    fn test_place_surface_too_small() {
        let mut rng = Pcg32::seed_from_u64(1);
        let err = place(SurfaceSize::new(1, 400), 10, &mut rng).unwrap_err();
        assert!(matches!(err, GameError::InvalidGeometry { width: 1, .. }));
        assert!(place(SurfaceSize::new(0, 0), 1, &mut rng).is_err());
    }

    #[test]
    fn test_place_is_deterministic_per_seed() {
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        for _ in 0..10 {
            let size = SurfaceSize::new(640, 480);
            assert_eq!(place(size, 15, &mut a), place(size, 15, &mut b));
        }
    }

    proptest! {
        #[test]
        fn prop_circle_stays_in_bounds(
            width in 2u32..2000,
            height in 2u32..2000,
            radius in 1u32..=50,
            seed in any::<u64>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let size = SurfaceSize::new(width, height);
            let p = place(size, radius, &mut rng).unwrap();
            let r = p.radius as f32;
            prop_assert!(p.radius <= radius);
            prop_assert!(p.center.x - r >= 0.0 && p.center.x + r <= width as f32);
            prop_assert!(p.center.y - r >= 0.0 && p.center.y + r <= height as f32);
        }
    }
}
