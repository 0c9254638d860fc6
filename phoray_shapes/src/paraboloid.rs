use super::*;

/// The paraboloid `z / c = x^2 / a^2 + y^2 / b^2`, with its vertex at the origin.
///
/// It opens toward `+z` when `c > 0` (convex, seen from `-z`) and toward
/// `-z` when `c < 0` (concave, with its focus in front of it).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paraboloid {
    a: Float,
    b: Float,
    c: Float,
    aperture: Aperture,
}

impl Default for Paraboloid {
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

impl Paraboloid {
    pub fn try_new(a: Float, b: Float, c: Float, aperture: Aperture) -> Result<Self> {
        Ok(Self {
            a: non_degenerate("a", a)?,
            b: non_degenerate("b", b)?,
            c: non_degenerate("c", c)?,
            aperture,
        })
    }

    #[inline]
    #[must_use]
    pub fn parameters(&self) -> [Float; 3] {
        [self.a, self.b, self.c]
    }

    /// Where rays parallel to the axis meet after a reflection,
    /// in the case of a paraboloid of revolution (`a == b`).
    #[inline]
    #[must_use]
    pub fn focus(&self) -> Point {
        Point::new(0.0, 0.0, self.a * self.a / (4.0 * self.c))
    }
}

impl Quadric for Paraboloid {
    #[inline]
    fn coefficients(&self, ray: &Ray) -> [Float; 3] {
        let (a2, b2, c) = (self.a * self.a, self.b * self.b, self.c);
        let (p, d) = (&ray.endpoint, &ray.direction);
        [
            d.x * d.x / a2 + d.y * d.y / b2,
            2.0 * p.x * d.x / a2 + 2.0 * p.y * d.y / b2 - d.z / c,
            p.x * p.x / a2 + p.y * p.y / b2 - p.z / c,
        ]
    }

    /// Concave paraboloids are usually hit from the inside, past the focus.
    #[inline]
    fn select(&self, ray: &Ray, [x1, x2]: [Float; 2]) -> Point {
        let t = if self.c < 0.0 { x1.max(x2) } else { x1.min(x2) };
        ray.along(t)
    }
}

impl Surface for Paraboloid {
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
        Vector::new(
            2.0 * self.c * point.x / (self.a * self.a),
            2.0 * self.c * point.y / (self.b * self.b),
            -1.0,
        )
        .normalize()
    }

    #[inline]
    fn aperture(&self) -> &Aperture {
        &self.aperture
    }

    fn mesh(&self, resolution: usize) -> Mesh {
        let (a2, b2, c) = (self.a * self.a, self.b * self.b, self.c);
        Mesh::grid(&self.aperture, resolution, |x, y| c * (x * x / a2 + y * y / b2))
    }
}
