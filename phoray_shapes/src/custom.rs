use super::*;
use std::{fmt, sync::Arc};

pub type IntersectionFn = dyn Fn(&Ray) -> Option<Point> + Send + Sync;
pub type NormalFn = dyn Fn(&Point) -> Vector + Send + Sync;
pub type SagFn = dyn Fn(Float, Float) -> Float + Send + Sync;

/// A user-defined surface, from a pair of closures.
///
/// The intersection closure must follow the same contract as
/// [`Surface::intersection`], and the normal closure must return unit
/// vectors facing the front (`-z`) side. Aperture and backlight tests are
/// applied on top, as for every other surface.
#[derive(Clone)]
pub struct FnSurface {
    intersection: Arc<IntersectionFn>,
    normal: Arc<NormalFn>,
    sag: Option<Arc<SagFn>>,
    aperture: Aperture,
}

impl FnSurface {
    pub fn new(
        intersection: impl Fn(&Ray) -> Option<Point> + Send + Sync + 'static,
        normal: impl Fn(&Point) -> Vector + Send + Sync + 'static,
        aperture: Aperture,
    ) -> Self {
        Self {
            intersection: Arc::new(intersection),
            normal: Arc::new(normal),
            sag: None,
            aperture,
        }
    }

    /// Height of the surface above `(x, y)`, needed to mesh it.
    #[must_use]
    pub fn with_sag(mut self, sag: impl Fn(Float, Float) -> Float + Send + Sync + 'static) -> Self {
        self.sag = Some(Arc::new(sag));
        self
    }
}

impl fmt::Debug for FnSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSurface")
            .field("aperture", &self.aperture)
            .field("meshable", &self.sag.is_some())
            .finish_non_exhaustive()
    }
}

/// Two custom surfaces are equal if they share the same closures.
impl PartialEq for FnSurface {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.intersection, &other.intersection)
            && Arc::ptr_eq(&self.normal, &other.normal)
            && self.aperture == other.aperture
    }
}

impl Surface for FnSurface {
    #[inline]
    fn intersection(&self, ray: &Ray) -> Option<Point> {
        (self.intersection)(ray)
    }

    #[inline]
    fn normal(&self, point: &Point) -> Vector {
        (self.normal)(point)
    }

    #[inline]
    fn aperture(&self) -> &Aperture {
        &self.aperture
    }

    /// Empty, unless a sag was given.
    fn mesh(&self, resolution: usize) -> Mesh {
        match &self.sag {
            Some(sag) => Mesh::grid(&self.aperture, resolution, |x, y| sag(x, y)),
            None => Mesh::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// The plane `z = 0`, by hand.
    fn flat() -> FnSurface {
        FnSurface::new(
            |ray| {
                let dz = ray.direction.z;
                (dz != 0.0).then(|| ray.along(-ray.endpoint.z / dz))
            },
            |_| Vector::new(0.0, 0.0, -1.0),
            Aperture::default(),
        )
    }

    #[test]
    fn test_matches_plane() {
        let rays: Rays = [(0.1, 0.2), (0.7, 0.0), (-0.3, 0.4)]
            .into_iter()
            .map(|(x, y)| Ray::new(Point::new(x, y, -1.0), Vector::new(0.1, 0.0, 1.0), 0.0))
            .collect();

        let custom = Geometry::from(flat());
        let plane = Geometry::from(Plane::default());
        assert_eq!(custom.reflect(&rays), plane.reflect(&rays));
    }

    #[test]
    fn test_backlit_still_applies() {
        let ray = Ray::new(Point::new(0.0, 0.0, 1.0), -Vector::z(), 0.0);
        assert_eq!(flat().intersect(&ray), None);
    }

    #[test]
    fn test_mesh_needs_sag() {
        assert_eq!(flat().mesh(3), Mesh::default());
        let mesh = flat().with_sag(|x, y| x + y).mesh(2);
        assert_eq!(mesh.vertices.len(), 9);
        assert_relative_eq!(mesh.vertices[8], Point::new(0.5, 0.5, 1.0));
    }

    #[test]
    fn test_equality_is_identity() {
        let a = flat();
        assert_eq!(a, a.clone());
        assert_ne!(a, flat());
    }
}
