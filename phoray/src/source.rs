use crate::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

/// How a [`Source`] spreads its rays, in its local frame. Rays are emitted
/// around the local `+z` axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Distribution {
    /// Every ray starts at the local origin, along `+z`.
    #[default]
    Point,
    /// Gaussian spot and divergence. `size` holds the standard deviation of
    /// the starting point along each axis. `divergence` holds the standard
    /// deviations of the direction's tilt: `divergence.x` spreads rays along
    /// x (a rotation about y) and `divergence.y` along y (a rotation about x).
    Gaussian { size: Vector, divergence: Vector },
}

/// A light source, placed in the world by a [`Member`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Source {
    pub member: Member,
    pub wavelength: Float,
    pub distribution: Distribution,
    /// Seeds the random generator, so a source always generates the same rays.
    pub seed: u64,
}

impl Source {
    /// A point source, sending all its rays along its local `+z` axis.
    #[must_use]
    pub fn trivial(member: Member, wavelength: Float) -> Self {
        Self {
            member,
            wavelength,
            distribution: Distribution::Point,
            seed: 0,
        }
    }

    #[must_use]
    pub fn gaussian(member: Member, wavelength: Float, size: Vector, divergence: Vector, seed: u64) -> Self {
        Self {
            member,
            wavelength,
            distribution: Distribution::Gaussian { size, divergence },
            seed,
        }
    }

    /// The ray along the source's axis, in local coordinates.
    #[inline]
    #[must_use]
    pub fn central_ray(&self) -> Ray {
        Ray::new(Point::origin(), Vector::z(), self.wavelength)
    }

    /// `n` rays, in the source's local coordinates.
    #[must_use]
    pub fn generate_local(&self, n: usize) -> Rays {
        match &self.distribution {
            Distribution::Point => (0..n).map(|_| self.central_ray()).collect(),
            Distribution::Gaussian { size, divergence } => {
                let mut rng = StdRng::seed_from_u64(self.seed);
                let mut gauss = |sigma: Float| rng.sample::<Float, _>(StandardNormal) * sigma;

                (0..n)
                    .map(|_| {
                        let position = Vector::new(gauss(size.x), gauss(size.y), gauss(size.z));
                        let tilt = Vector::new(
                            gauss(divergence.y),
                            gauss(divergence.x),
                            gauss(divergence.z),
                        );
                        self.central_ray().translate(&position).deviate(&tilt)
                    })
                    .collect()
            }
        }
    }

    /// `n` rays, in world coordinates.
    #[must_use]
    pub fn generate(&self, n: usize) -> Rays {
        let rays = self.member.globalize(&self.generate_local(n));
        log::trace!("generated {} rays at wavelength {}", rays.len(), self.wavelength);
        rays
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f64::consts::FRAC_PI_2;

    #[test]
    fn test_trivial_source() {
        let member = Member::new(
            Vector::new(1.0, 2.0, 3.0),
            Vector::new(FRAC_PI_2, 0.0, 0.0),
            Vector::zeros(),
            Vector::zeros(),
        );
        let rays = Source::trivial(member, 1e-9).generate(4);

        assert_eq!(rays.len(), 4);
        assert_eq!(rays.alive(), 4);
        for ray in rays.iter().flatten() {
            assert_relative_eq!(ray.endpoint, Point::new(1.0, 2.0, 3.0));
            assert_relative_eq!(ray.direction, Vector::new(0.0, -1.0, 0.0), epsilon = 1e-12);
            assert_eq!(ray.wavelength, 1e-9);
        }
    }

    #[test]
    fn test_gaussian_source_is_reproducible() {
        let source = Source::gaussian(
            Member::default(),
            1e-9,
            Vector::new(1e-3, 2e-3, 0.0),
            Vector::new(1e-4, 1e-4, 0.0),
            42,
        );
        assert_eq!(source.generate(16), source.generate(16));

        let other = Source { seed: 43, ..source.clone() };
        assert_ne!(source.generate(16), other.generate(16));
    }

    #[test]
    fn test_gaussian_source_spread() {
        let source = Source::gaussian(
            Member::default(),
            1e-9,
            Vector::new(1e-3, 0.0, 0.0),
            Vector::new(0.0, 1e-2, 0.0),
            7,
        );
        let rays = source.generate_local(2000);

        let mut spread_x = 0.0;
        for ray in rays.iter().flatten() {
            assert_eq!(ray.endpoint.y, 0.0);
            assert_eq!(ray.endpoint.z, 0.0);
            // no divergence along x
            assert_relative_eq!(ray.direction.x, 0.0, epsilon = 1e-15);
            assert_relative_eq!(ray.direction.norm(), 1.0, epsilon = 1e-12);
            spread_x += ray.endpoint.x * ray.endpoint.x;
        }
        let sigma = (spread_x / 2000.0).sqrt();
        assert!((sigma - 1e-3).abs() < 1e-4, "sigma = {sigma}");
    }

    #[test]
    fn test_zero_divergence_gaussian_is_collimated() {
        let source = Source::gaussian(Member::default(), 0.0, Vector::new(1.0, 1.0, 0.0), Vector::zeros(), 0);
        for ray in source.generate(8).iter().flatten() {
            assert_relative_eq!(ray.direction, Vector::z());
        }
    }
}
