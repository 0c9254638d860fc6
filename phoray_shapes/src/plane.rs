use super::*;

/// The plane `z = 0`, lit from `-z`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Plane {
    aperture: Aperture,
}

impl Plane {
    #[inline]
    #[must_use]
    pub fn new(aperture: Aperture) -> Self {
        Self { aperture }
    }
}

impl Surface for Plane {
    /// Solved linearly. A ray parallel to the plane never meets it.
    #[inline]
    fn intersection(&self, ray: &Ray) -> Option<Point> {
        let dz = ray.direction.z;
        (dz != 0.0).then(|| ray.along(-ray.endpoint.z / dz))
    }

    #[inline]
    fn normal(&self, _: &Point) -> Vector {
        Vector::new(0.0, 0.0, -1.0)
    }

    #[inline]
    fn aperture(&self) -> &Aperture {
        &self.aperture
    }

    fn mesh(&self, resolution: usize) -> Mesh {
        Mesh::grid(&self.aperture, resolution, |_, _| 0.0)
    }
}
