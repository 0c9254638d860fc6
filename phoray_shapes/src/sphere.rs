use super::*;

/// Half a sphere of signed radius `R`, with its vertex at the origin and its
/// center at `(0, 0, -R)`.
///
/// When `R > 0` this is the half above the center, a concave mirror seen
/// from `-z`. When `R < 0` it is the half below, a convex one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    radius: Float,
    aperture: Aperture,
}

impl Default for Sphere {
    #[inline]
    fn default() -> Self {
        Self {
            radius: 1.0,
            aperture: Aperture::default(),
        }
    }
}

impl Sphere {
    /// The aperture is clamped to `|R|` in both directions.
    pub fn try_new(radius: Float, aperture: Aperture) -> Result<Self> {
        let radius = non_degenerate("R", radius)?;
        let r = radius.abs();
        Ok(Self {
            radius,
            aperture: clamp_aperture("sphere", aperture, r, r),
        })
    }

    #[inline]
    #[must_use]
    pub fn radius(&self) -> Float {
        self.radius
    }

    /// The ray's endpoint, relative to the center.
    #[inline]
    fn centered(&self, ray: &Ray) -> Vector {
        ray.endpoint.coords + Vector::new(0.0, 0.0, self.radius)
    }
}

impl Quadric for Sphere {
    #[inline]
    fn coefficients(&self, ray: &Ray) -> [Float; 3] {
        // substituting `P + t * D` in `||V - C||^2 = R^2`
        let a = self.centered(ray);
        let d = &ray.direction;
        [
            d.x * d.x + d.y * d.y + d.z * d.z,
            2.0 * (a.x * d.x + a.y * d.y + a.z * d.z),
            a.x * a.x + a.y * a.y + a.z * a.z - self.radius * self.radius,
        ]
    }

    #[inline]
    fn select(&self, ray: &Ray, roots: [Float; 2]) -> Point {
        let z0 = self.centered(ray).z;
        ray.along(branch(self.radius, z0, ray.direction.z, roots))
    }
}

impl Surface for Sphere {
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
        (-(point.coords + Vector::new(0.0, 0.0, self.radius)) / self.radius).normalize()
    }

    #[inline]
    fn aperture(&self) -> &Aperture {
        &self.aperture
    }

    fn mesh(&self, resolution: usize) -> Mesh {
        let (r, sign) = (self.radius, self.radius.signum());
        Mesh::grid(&self.aperture, resolution, |x, y| {
            sign * sqrt_clamped(r * r - x * x - y * y) - r
        })
    }
}
