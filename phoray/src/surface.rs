use crate::*;
use core::{iter::zip, ops::Deref};
use std::{rc::Rc, sync::Arc};

/// The rectangular region of a surface that physically exists, centered on
/// the local origin: `|x| <= xsize / 2` and `|y| <= ysize / 2`.
///
/// Either size may be infinite, for an unbounded surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aperture {
    xsize: Float,
    ysize: Float,
}

impl Default for Aperture {
    #[inline]
    fn default() -> Self {
        Self {
            xsize: 1.0,
            ysize: 1.0,
        }
    }
}

impl Aperture {
    pub fn try_new(xsize: Float, ysize: Float) -> Result<Self> {
        for (name, value) in [("xsize", xsize), ("ysize", ysize)] {
            if !(value > 0.0) {
                return Err(Error::InvalidAperture { name, value });
            }
        }
        Ok(Self { xsize, ysize })
    }

    #[inline]
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            xsize: Float::INFINITY,
            ysize: Float::INFINITY,
        }
    }

    #[inline]
    #[must_use]
    pub fn xsize(&self) -> Float {
        self.xsize
    }

    #[inline]
    #[must_use]
    pub fn ysize(&self) -> Float {
        self.ysize
    }

    #[inline]
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.xsize.is_finite() && self.ysize.is_finite()
    }

    /// Returns a copy of `self` whose sizes are at most `xmax` and `ymax`.
    #[inline]
    #[must_use]
    pub fn clamped(&self, xmax: Float, ymax: Float) -> Self {
        Self {
            xsize: self.xsize.min(xmax),
            ysize: self.ysize.min(ymax),
        }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, point: &Point) -> bool {
        point.x.abs() <= self.xsize / 2.0 && point.y.abs() <= self.ysize / 2.0
    }
}

/// A triangulated approximation of a surface, for rendering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Point>,
    pub faces: Vec<[usize; 3]>,
}

impl Mesh {
    /// A regular `(resolution + 1) x (resolution + 1)` grid of vertices spanning
    /// `aperture`, lifted to `z = sag(x, y)`. Vertices are laid out x-major.
    ///
    /// Unbounded apertures can't be meshed, and produce an empty mesh.
    #[must_use]
    pub fn grid(aperture: &Aperture, resolution: usize, sag: impl Fn(Float, Float) -> Float) -> Self {
        if !aperture.is_bounded() || resolution == 0 {
            return Self::default();
        }

        let (w, h) = (aperture.xsize(), aperture.ysize());
        let steps = resolution as Float;
        let side = resolution + 1;

        let mut vertices = Vec::with_capacity(side * side);
        for i in 0..side {
            let x = -w / 2.0 + i as Float * w / steps;
            for j in 0..side {
                let y = -h / 2.0 + j as Float * h / steps;
                vertices.push(Point::new(x, y, sag(x, y)));
            }
        }

        let mut faces = Vec::with_capacity(2 * resolution * resolution);
        for i in 0..resolution {
            for j in 0..resolution {
                let current = i * side + j;
                faces.push([current, current + 1, current + 2 + resolution]);
                faces.push([current, current + 2 + resolution, current + 1 + resolution]);
            }
        }

        Self { vertices, faces }
    }
}

/// The core trait of this library: a surface, in its own local frame.
///
/// Implementors only describe geometry: where a ray meets the surface, and
/// the normal there. Aperture and backlight filtering, as well as the ray
/// physics, are provided on top of that.
///
/// Conventions every implementor must follow:
///  - the surface's vertex sits at the local origin,
///  - its front, illuminated, side faces local `-z`,
///  - [`normal`](Surface::normal) points toward the front side.
///
/// All methods are deterministic, and the batch methods are index-stable:
/// lane `i` of the output only depends on lane `i` of the input.
pub trait Surface {
    /// Where `ray` meets this surface, picking the physically valid branch
    /// when there are two candidates, regardless of aperture and orientation.
    ///
    /// Returns `None` if the ray's line doesn't meet the surface.
    fn intersection(&self, ray: &Ray) -> Option<Point>;

    /// The unit normal at `point`, a point on the surface, facing the front side.
    fn normal(&self, point: &Point) -> Vector;

    fn aperture(&self) -> &Aperture;

    /// See [`Mesh::grid`].
    fn mesh(&self, resolution: usize) -> Mesh;

    /// Unit tangent along grating lines at `point`, see [`line_direction`].
    #[inline]
    fn grating_direction(&self, point: &Point) -> Vector {
        line_direction(&self.normal(point))
    }

    /// Whether `ray`, meeting the surface at `point`, comes from the back side.
    #[inline]
    fn is_backlit(&self, ray: &Ray, point: &Point) -> bool {
        ray.direction.dot(&self.normal(point)) > 0.0
    }

    /// Filters a candidate hit through the aperture and backlight tests.
    #[inline]
    fn accept(&self, ray: &Ray, point: Point) -> Option<Point> {
        (self.aperture().contains(&point) && !self.is_backlit(ray, &point)).then_some(point)
    }

    /// The point where `ray` physically hits this surface, if any.
    #[inline]
    fn intersect(&self, ray: &Ray) -> Option<Point> {
        if ray.is_stopped() {
            return None;
        }
        self.intersection(ray)
            .and_then(|point| self.accept(ray, point))
    }

    /// Like [`intersect`](Surface::intersect), but hits from the back side count.
    #[inline]
    fn intersect_either_side(&self, ray: &Ray) -> Option<Point> {
        if ray.is_stopped() {
            return None;
        }
        self.intersection(ray)
            .filter(|point| self.aperture().contains(point))
    }

    /// [`intersect`](Surface::intersect), over a whole batch.
    ///
    /// Implementors may override this with a vectorized version, as long as
    /// every lane matches what `intersect` returns for it.
    fn intersect_all(&self, rays: &Rays) -> Vec<Option<Point>> {
        rays.iter()
            .map(|ray| ray.and_then(|ray| self.intersect(ray)))
            .collect()
    }

    /// Mirror reflection, see [`reflect_direction`].
    fn reflect(&self, rays: &Rays) -> Rays {
        zip(rays.iter(), self.intersect_all(rays))
            .map(|(ray, hit)| {
                let (ray, point) = (ray?, hit?);
                let normal = self.normal(&point);
                Some(ray.redirect(point, reflect_direction(&ray.direction, &normal)))
            })
            .collect()
    }

    /// Diffraction into `order`, with the local line spacing given by `spacing`
    /// at each hit point. See [`diffract_direction`].
    fn diffract(&self, rays: &Rays, spacing: &dyn Fn(&Point) -> Float, order: i32) -> Rays {
        zip(rays.iter(), self.intersect_all(rays))
            .map(|(ray, hit)| {
                let (ray, point) = (ray?, hit?);
                let direction = diffract_direction(
                    &ray.direction,
                    &self.normal(&point),
                    &self.grating_direction(&point),
                    spacing(&point),
                    order,
                    ray.wavelength,
                )?;
                Some(ray.redirect(point, direction))
            })
            .collect()
    }

    /// Refraction from a medium of index `index1`, on the side the ray comes
    /// from, into one of index `index2`. Unlike reflection, the surface can be
    /// crossed from either side. See [`refract_direction`].
    fn refract(&self, rays: &Rays, index1: Float, index2: Float) -> Rays {
        rays.map(|ray| {
            let point = self.intersect_either_side(ray)?;
            let normal = self.normal(&point);
            Some(ray.redirect(
                point,
                refract_direction(&ray.direction, &normal, index1, index2),
            ))
        })
    }
}

// It's clear that all these impls use the `Deref` trait, but writing a blanket impl over all types
// implementing `Deref` makes it impossible to implement it for new types downstream.

macro_rules! forward_surface {
    ($($ptr:ty),*) => {$(
        impl<T: Surface + ?Sized> Surface for $ptr {
            #[inline]
            fn intersection(&self, ray: &Ray) -> Option<Point> {
                self.deref().intersection(ray)
            }

            #[inline]
            fn normal(&self, point: &Point) -> Vector {
                self.deref().normal(point)
            }

            #[inline]
            fn aperture(&self) -> &Aperture {
                self.deref().aperture()
            }

            #[inline]
            fn mesh(&self, resolution: usize) -> Mesh {
                self.deref().mesh(resolution)
            }

            #[inline]
            fn grating_direction(&self, point: &Point) -> Vector {
                self.deref().grating_direction(point)
            }

            #[inline]
            fn is_backlit(&self, ray: &Ray, point: &Point) -> bool {
                self.deref().is_backlit(ray, point)
            }

            #[inline]
            fn intersect(&self, ray: &Ray) -> Option<Point> {
                self.deref().intersect(ray)
            }

            #[inline]
            fn intersect_either_side(&self, ray: &Ray) -> Option<Point> {
                self.deref().intersect_either_side(ray)
            }

            #[inline]
            fn intersect_all(&self, rays: &Rays) -> Vec<Option<Point>> {
                self.deref().intersect_all(rays)
            }
        }
    )*};
}

forward_surface!(Box<T>, Arc<T>, Rc<T>);

impl<'a, T: Surface + ?Sized> Surface for &'a T {
    #[inline]
    fn intersection(&self, ray: &Ray) -> Option<Point> {
        (*self).intersection(ray)
    }

    #[inline]
    fn normal(&self, point: &Point) -> Vector {
        (*self).normal(point)
    }

    #[inline]
    fn aperture(&self) -> &Aperture {
        (*self).aperture()
    }

    #[inline]
    fn mesh(&self, resolution: usize) -> Mesh {
        (*self).mesh(resolution)
    }

    #[inline]
    fn grating_direction(&self, point: &Point) -> Vector {
        (*self).grating_direction(point)
    }

    #[inline]
    fn is_backlit(&self, ray: &Ray, point: &Point) -> bool {
        (*self).is_backlit(ray, point)
    }

    #[inline]
    fn intersect(&self, ray: &Ray) -> Option<Point> {
        (*self).intersect(ray)
    }

    #[inline]
    fn intersect_either_side(&self, ray: &Ray) -> Option<Point> {
        (*self).intersect_either_side(ray)
    }

    #[inline]
    fn intersect_all(&self, rays: &Rays) -> Vec<Option<Point>> {
        (*self).intersect_all(rays)
    }
}
