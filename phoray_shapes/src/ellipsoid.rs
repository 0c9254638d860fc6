use super::*;

/// Half an ellipsoid of semi-axes `a`, `b`, `c`, with its vertex at the origin.
///
/// With `s` the sign of `a * b * c`, the center sits at `(0, 0, -s |c|)`,
/// and `s` picks the half in the same way the sign of `R` does for a [`Sphere`].
/// `Ellipsoid(R, R, R)` and `Sphere(R)` are the same surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    a: Float,
    b: Float,
    c: Float,
    aperture: Aperture,
}

impl Default for Ellipsoid {
    #[inline]
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 1.0,
            c: 1.0,
            aperture: Aperture::default(),
        }
    }
}

impl Ellipsoid {
    /// The aperture is clamped to `|a|` by `|b|`.
    pub fn try_new(a: Float, b: Float, c: Float, aperture: Aperture) -> Result<Self> {
        let (a, b, c) = (
            non_degenerate("a", a)?,
            non_degenerate("b", b)?,
            non_degenerate("c", c)?,
        );
        Ok(Self {
            a,
            b,
            c,
            aperture: clamp_aperture("ellipsoid", aperture, a.abs(), b.abs()),
        })
    }

    #[inline]
    #[must_use]
    pub fn semi_axes(&self) -> [Float; 3] {
        [self.a, self.b, self.c]
    }

    #[inline]
    fn sign(&self) -> Float {
        (self.a * self.b * self.c).signum()
    }

    /// Signed distance from the vertex up to the center.
    #[inline]
    fn depth(&self) -> Float {
        self.sign() * self.c.abs()
    }
}

impl Quadric for Ellipsoid {
    #[inline]
    fn coefficients(&self, ray: &Ray) -> [Float; 3] {
        // the ellipsoid equation, scaled by c^2
        let c2 = self.c * self.c;
        let (kx, ky) = (c2 / (self.a * self.a), c2 / (self.b * self.b));

        let p = ray.endpoint.coords + Vector::new(0.0, 0.0, self.depth());
        let d = &ray.direction;
        [
            kx * d.x * d.x + ky * d.y * d.y + d.z * d.z,
            2.0 * (kx * p.x * d.x + ky * p.y * d.y + p.z * d.z),
            kx * p.x * p.x + ky * p.y * p.y + p.z * p.z - c2,
        ]
    }

    #[inline]
    fn select(&self, ray: &Ray, roots: [Float; 2]) -> Point {
        let z0 = ray.endpoint.z + self.depth();
        ray.along(branch(self.sign(), z0, ray.direction.z, roots))
    }
}

impl Surface for Ellipsoid {
    #[inline]
    fn intersection(&self, ray: &Ray) -> Option<Point> {
        quadric_intersection(self, ray)
    }

    #[inline]
    fn intersect_all(&self, rays: &Rays) -> Vec<Option<Point>> {
        quadric_intersect_all(self, rays)
    }

    /// Along the gradient of the ellipsoid equation.
    #[inline]
    fn normal(&self, point: &Point) -> Vector {
        let gradient = Vector::new(
            point.x / (self.a * self.a),
            point.y / (self.b * self.b),
            (point.z + self.depth()) / (self.c * self.c),
        );
        (gradient * -self.sign()).normalize()
    }

    #[inline]
    fn aperture(&self) -> &Aperture {
        &self.aperture
    }

    fn mesh(&self, resolution: usize) -> Mesh {
        let (a, b, depth) = (self.a, self.b, self.depth());
        Mesh::grid(&self.aperture, resolution, |x, y| {
            depth * sqrt_clamped(1.0 - x * x / (a * a) - y * y / (b * b)) - depth
        })
    }
}
