use super::*;

/// Half a cylinder of signed radius `R`, with its axis parallel to x through
/// `(0, 0, -R)` and its vertex line along the x axis.
///
/// Like [`Sphere`], `R > 0` is concave and `R < 0` convex, seen from `-z`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cylinder {
    radius: Float,
    aperture: Aperture,
}

impl Default for Cylinder {
    #[inline]
    fn default() -> Self {
        Self {
            radius: 1.0,
            aperture: Aperture::default(),
        }
    }
}

impl Cylinder {
    /// The aperture's `ysize` is clamped to `1.5 |R|`.
    pub fn try_new(radius: Float, aperture: Aperture) -> Result<Self> {
        let radius = non_degenerate("R", radius)?;
        Ok(Self {
            radius,
            aperture: clamp_aperture("cylinder", aperture, Float::INFINITY, 1.5 * radius.abs()),
        })
    }

    #[inline]
    #[must_use]
    pub fn radius(&self) -> Float {
        self.radius
    }
}

impl Quadric for Cylinder {
    #[inline]
    fn coefficients(&self, ray: &Ray) -> [Float; 3] {
        let (ay, az) = (ray.endpoint.y, ray.endpoint.z + self.radius);
        let d = &ray.direction;
        [
            d.y * d.y + d.z * d.z,
            2.0 * (ay * d.y + az * d.z),
            ay * ay + az * az - self.radius * self.radius,
        ]
    }

    #[inline]
    fn select(&self, ray: &Ray, roots: [Float; 2]) -> Point {
        let z0 = ray.endpoint.z + self.radius;
        ray.along(branch(self.radius, z0, ray.direction.z, roots))
    }
}

impl Surface for Cylinder {
    #[inline]
    fn intersection(&self, ray: &Ray) -> Option<Point> {
        quadric_intersection(self, ray)
    }

    #[inline]
    fn intersect_all(&self, rays: &Rays) -> Vec<Option<Point>> {
        quadric_intersect_all(self, rays)
    }

    #[inline]
    fn normal(&self, point: &Point) -> Vector {
        (-Vector::new(0.0, point.y, point.z + self.radius) / self.radius).normalize()
    }

    #[inline]
    fn aperture(&self) -> &Aperture {
        &self.aperture
    }

    fn mesh(&self, resolution: usize) -> Mesh {
        let (r, sign) = (self.radius, self.radius.signum());
        Mesh::grid(&self.aperture, resolution, |_, y| {
            sign * sqrt_clamped(r * r - y * y) - r
        })
    }
}
