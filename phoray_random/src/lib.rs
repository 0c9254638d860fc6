use phoray::*;

use core::iter;
pub use rand;

pub trait Random: Sized {
    /// Generate a randomized instance of this type using the provided `rng`
    ///
    /// This method must not fail. If creating an instance is faillible, keep trying until success
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self;
}

impl Random for Ray {
    /// A ray starting anywhere in a 14 wide cube, with a unit direction and
    /// an X-ray wavelength.
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        let endpoint = Point::from(rand_vect(rng, 7.0));

        let direction = loop {
            if let Some(v) = UnitVector::try_new(rand_vect(rng, 1.0), Float::EPSILON * 8.0) {
                break v;
            }
        };
        Self::new(endpoint, direction.into_inner(), rng.gen_range(1e-10..1e-8))
    }
}

impl Random for Frame {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        Self::new(rand_vect(rng, 5.0), rand_vect(rng, core::f64::consts::PI))
    }
}

impl Random for Member {
    /// A member with up to two parent frames.
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        let num_parents = rng.gen_range(0..3);
        let parents = iter::repeat_with(|| Frame::random(rng)).take(num_parents).collect();
        Self::with_parents(parents, Frame::random(rng), Frame::random(rng))
    }
}

impl Random for Rays {
    /// A batch with a few missing lanes.
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        const MIN_NUM_RAYS: usize = 1;
        const MAX_NUM_RAYS: usize = 32;
        let num_rays = rng.gen_range(MIN_NUM_RAYS..MAX_NUM_RAYS);

        iter::repeat_with(|| rng.gen_bool(0.9).then(|| Ray::random(rng)))
            .take(num_rays)
            .collect()
    }
}

/// `n` rays starting at `z = -distance` inside a `width` wide square,
/// all heading toward `+z` within a small cone.
pub fn random_beam(rng: &mut (impl rand::Rng + ?Sized), n: usize, width: Float, distance: Float) -> Rays {
    iter::repeat_with(|| {
        let start = Point::new(
            (rng.gen::<Float>() - 0.5) * width,
            (rng.gen::<Float>() - 0.5) * width,
            -distance,
        );
        let tilt = rand_vect(rng, 0.1);
        Ray::new(start, Vector::new(tilt.x, tilt.y, 1.0).normalize(), rng.gen_range(1e-10..1e-8))
    })
    .take(n)
    .collect()
}

pub fn rand_vect(rng: &mut (impl rand::Rng + ?Sized), max_coord_mag: Float) -> Vector {
    // the rng generates floats in 0.0..1.0, scale and translate the range accordingly

    Vector::from_fn(|_, _| (rng.gen::<Float>() - 0.5) * (max_coord_mag.abs() * 2.0))
}
