//! Concrete surfaces for [`phoray`], and the [`Geometry`] sum type tying them together.

mod custom;
mod cylinder;
mod ellipsoid;
mod paraboloid;
mod plane;
mod rowland;
mod sphere;

pub use custom::*;
pub use cylinder::*;
pub use ellipsoid::*;
pub use paraboloid::*;
pub use plane::*;
pub use rowland::*;
pub use sphere::*;

use core::iter::zip;
use phoray::*;

/// Surfaces reducing to a quadratic equation in the ray parameter `t`.
pub(crate) trait Quadric: Surface {
    /// `[a, b, c]` such that the ray's line meets the surface at `a t^2 + b t + c = 0`.
    fn coefficients(&self, ray: &Ray) -> [Float; 3];

    /// Picks the physically valid root, and returns the point it leads to.
    fn select(&self, ray: &Ray, roots: [Float; 2]) -> Point;
}

#[inline]
pub(crate) fn quadric_intersection(quadric: &impl Quadric, ray: &Ray) -> Option<Point> {
    let [a, b, c] = quadric.coefficients(ray);
    quadratic(a, b, c).map(|roots| quadric.select(ray, roots))
}

/// Batched intersection: the coefficients of all lanes are solved in one go.
/// Lost and stopped lanes get all-zero coefficients, which have no solution.
pub(crate) fn quadric_intersect_all(quadric: &impl Quadric, rays: &Rays) -> Vec<Option<Point>> {
    fn live(ray: Option<&Ray>) -> Option<&Ray> {
        ray.filter(|ray| !ray.is_stopped())
    }

    let n = rays.len();
    let (mut a, mut b, mut c) = (Vec::with_capacity(n), Vec::with_capacity(n), Vec::with_capacity(n));

    for ray in rays.iter() {
        let [ai, bi, ci] = live(ray).map_or([0.0; 3], |ray| quadric.coefficients(ray));
        a.push(ai);
        b.push(bi);
        c.push(ci);
    }

    zip(rays.iter(), quadratic_batch(&a, &b, &c))
        .map(|(ray, roots)| {
            let ray = live(ray)?;
            quadric.accept(ray, quadric.select(ray, roots?))
        })
        .collect()
}

/// Root selection for a quadric sheet centered on the local z axis.
///
/// `z0` and `dz` are the z components of the ray's endpoint and direction,
/// relative to the quadric's center. When `sign > 0` the valid sheet is the
/// one above the center (the far root is preferred if it lands there),
/// otherwise the one below it (the near root is preferred if it lands there).
#[inline]
pub(crate) fn branch(sign: Float, z0: Float, dz: Float, [x1, x2]: [Float; 2]) -> Float {
    let (lo, hi) = (x1.min(x2), x1.max(x2));

    if sign > 0.0 {
        if z0 + hi * dz > 0.0 {
            hi
        } else {
            lo
        }
    } else if z0 + lo * dz < 0.0 {
        lo
    } else {
        hi
    }
}

/// `sqrt(max(x, 0))`, for mesh sags evaluated slightly past a surface's rim.
#[inline]
pub(crate) fn sqrt_clamped(x: Float) -> Float {
    x.max(0.0).sqrt()
}

/// Warns when a surface's aperture is larger than what its shape allows.
pub(crate) fn clamp_aperture(shape: &str, aperture: Aperture, xmax: Float, ymax: Float) -> Aperture {
    let clamped = aperture.clamped(xmax, ymax);
    if clamped != aperture {
        log::warn!(
            "{shape}: aperture {}x{} clamped to {}x{}",
            aperture.xsize(),
            aperture.ysize(),
            clamped.xsize(),
            clamped.ysize()
        );
    }
    clamped
}

/// Every kind of surface known to this crate.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Plane(Plane),
    Sphere(Sphere),
    Cylinder(Cylinder),
    Ellipsoid(Ellipsoid),
    Paraboloid(Paraboloid),
    Custom(FnSurface),
}

impl Default for Geometry {
    #[inline]
    fn default() -> Self {
        Self::Plane(Plane::default())
    }
}

macro_rules! dispatch {
    ($self:ident, $s:ident => $e:expr) => {
        match $self {
            Geometry::Plane($s) => $e,
            Geometry::Sphere($s) => $e,
            Geometry::Cylinder($s) => $e,
            Geometry::Ellipsoid($s) => $e,
            Geometry::Paraboloid($s) => $e,
            Geometry::Custom($s) => $e,
        }
    };
}

impl Surface for Geometry {
    #[inline]
    fn intersection(&self, ray: &Ray) -> Option<Point> {
        dispatch!(self, s => s.intersection(ray))
    }

    #[inline]
    fn normal(&self, point: &Point) -> Vector {
        dispatch!(self, s => s.normal(point))
    }

    #[inline]
    fn aperture(&self) -> &Aperture {
        dispatch!(self, s => s.aperture())
    }

    #[inline]
    fn mesh(&self, resolution: usize) -> Mesh {
        dispatch!(self, s => s.mesh(resolution))
    }

    #[inline]
    fn intersect_all(&self, rays: &Rays) -> Vec<Option<Point>> {
        dispatch!(self, s => s.intersect_all(rays))
    }
}

macro_rules! impl_from {
    ($($variant:ident),*) => {$(
        impl From<$variant> for Geometry {
            #[inline]
            fn from(value: $variant) -> Self {
                Self::$variant(value)
            }
        }
    )*};
}

impl_from!(Plane, Sphere, Cylinder, Ellipsoid, Paraboloid);

impl From<FnSurface> for Geometry {
    #[inline]
    fn from(value: FnSurface) -> Self {
        Self::Custom(value)
    }
}
