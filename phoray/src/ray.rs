use crate::*;
use core::ops::Index;
use nalgebra::Isometry3;

/// A light ray, represented as a half-line carrying a wavelength.
///
/// A ray whose `direction` is the zero vector is *stopped*: it has reached a
/// detector (or the end of a frozen trace) and can't interact any further.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// The starting point of the half-line
    pub endpoint: Point,
    /// The direction of the half-line, usually unit-length
    pub direction: Vector,
    pub wavelength: Float,
}

impl Default for Ray {
    #[inline]
    fn default() -> Self {
        Self::new(Point::origin(), Vector::z(), 0.0)
    }
}

impl Ray {
    #[inline]
    #[must_use]
    pub fn new(endpoint: Point, direction: Vector, wavelength: Float) -> Self {
        Self {
            endpoint,
            direction,
            wavelength,
        }
    }

    /// A ray sitting at `endpoint`, going nowhere.
    #[inline]
    #[must_use]
    pub fn stopped(endpoint: Point, wavelength: Float) -> Self {
        Self::new(endpoint, Vector::zeros(), wavelength)
    }

    #[inline]
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.direction == Vector::zeros()
    }

    /// The point at (signed) distance `t` along the ray, in units of `direction`.
    #[inline]
    #[must_use]
    pub fn along(&self, t: Float) -> Point {
        self.endpoint + self.direction * t
    }

    /// Parallel move: the endpoint is moved by `offset`, the direction is unchanged.
    #[inline]
    #[must_use]
    pub fn translate(&self, offset: &Vector) -> Self {
        Self::new(self.endpoint + offset, self.direction, self.wavelength)
    }

    /// Rotates the direction by the Euler angles `angles` (see [`euler_rotation`]).
    #[inline]
    #[must_use]
    pub fn deviate(&self, angles: &Vector) -> Self {
        Self::new(
            self.endpoint,
            euler_rotation(angles) * self.direction,
            self.wavelength,
        )
    }

    /// Same ray, but starting at `endpoint` and going in `direction`.
    #[inline]
    #[must_use]
    pub fn redirect(&self, endpoint: Point, direction: Vector) -> Self {
        Self::new(endpoint, direction, self.wavelength)
    }

    /// Changes the coordinate system of this ray. The endpoint is fully
    /// transformed, the direction only rotated.
    #[inline]
    #[must_use]
    pub fn transform(&self, isometry: &Isometry3<Float>) -> Self {
        Self::new(
            isometry * self.endpoint,
            isometry * self.direction,
            self.wavelength,
        )
    }
}

/// An index-stable batch of rays.
///
/// Lane `i` holds either a live [`Ray`] or `None` for a ray that was lost
/// (missed a surface, hit it from behind, fell into an evanescent order...).
/// Operations on a batch never reorder, insert or remove lanes, and once a
/// lane is `None` it stays `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rays {
    lanes: Vec<Option<Ray>>,
}

impl Rays {
    #[inline]
    #[must_use]
    pub fn new(lanes: Vec<Option<Ray>>) -> Self {
        Self { lanes }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn lanes(&self) -> &[Option<Ray>] {
        &self.lanes
    }

    #[inline]
    #[must_use]
    pub fn into_lanes(self) -> Vec<Option<Ray>> {
        self.lanes
    }

    #[inline]
    #[must_use]
    pub fn get(&self, lane: usize) -> Option<&Ray> {
        self.lanes.get(lane).and_then(Option::as_ref)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Option<&Ray>> + '_ {
        self.lanes.iter().map(Option::as_ref)
    }

    /// Number of lanes still holding a ray.
    #[inline]
    #[must_use]
    pub fn alive(&self) -> usize {
        self.lanes.iter().flatten().count()
    }

    /// Applies `f` to every live lane. Lost lanes stay lost.
    #[inline]
    #[must_use]
    pub fn map(&self, mut f: impl FnMut(&Ray) -> Option<Ray>) -> Self {
        self.lanes.iter().map(|lane| lane.as_ref().and_then(&mut f)).collect()
    }

    /// Changes the coordinate system of every live lane.
    #[inline]
    #[must_use]
    pub fn transform(&self, isometry: &Isometry3<Float>) -> Self {
        self.map(|ray| Some(ray.transform(isometry)))
    }

    /// Splits the batch into consecutive chunks of at most `size` lanes.
    ///
    /// # Panics
    ///
    /// if `size` is zero
    #[must_use]
    pub fn chunks(&self, size: usize) -> Vec<Self> {
        self.lanes
            .chunks(size)
            .map(|chunk| Self::new(chunk.to_vec()))
            .collect()
    }

    /// Glues `batches` back together, in order.
    #[must_use]
    pub fn concat(batches: impl IntoIterator<Item = Self>) -> Self {
        batches.into_iter().flat_map(Self::into_lanes).collect()
    }
}

impl Index<usize> for Rays {
    type Output = Option<Ray>;

    #[inline]
    fn index(&self, lane: usize) -> &Self::Output {
        &self.lanes[lane]
    }
}

impl FromIterator<Option<Ray>> for Rays {
    #[inline]
    fn from_iter<I: IntoIterator<Item = Option<Ray>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl FromIterator<Ray> for Rays {
    #[inline]
    fn from_iter<I: IntoIterator<Item = Ray>>(iter: I) -> Self {
        iter.into_iter().map(Some).collect()
    }
}

impl IntoIterator for Rays {
    type Item = Option<Ray>;
    type IntoIter = std::vec::IntoIter<Option<Ray>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.lanes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f64::consts::FRAC_PI_2;

    #[test]
    fn test_translate() {
        let ray = Ray::new(Point::new(1.0, 2.0, 3.0), Vector::z(), 1e-9);
        let moved = ray.translate(&Vector::new(1.0, 1.0, 1.0));
        assert_relative_eq!(moved.endpoint, Point::new(2.0, 3.0, 4.0));
        assert_eq!(moved.direction, ray.direction);
        assert_eq!(moved.wavelength, ray.wavelength);
    }

    #[test]
    fn test_deviate() {
        let ray = Ray::default().deviate(&Vector::new(FRAC_PI_2, 0.0, 0.0));
        assert_relative_eq!(ray.direction, Vector::new(0.0, -1.0, 0.0), epsilon = 1e-12);
        assert_eq!(ray.endpoint, Point::origin());
    }

    #[test]
    fn test_along() {
        let ray = Ray::new(Point::new(0.0, 1.0, 0.0), Vector::new(1.0, 0.0, 0.0), 0.0);
        assert_relative_eq!(ray.along(2.5), Point::new(2.5, 1.0, 0.0));
        assert_relative_eq!(ray.along(-1.0), Point::new(-1.0, 1.0, 0.0));
    }

    #[test]
    fn test_stopped() {
        let ray = Ray::stopped(Point::new(1.0, 1.0, 1.0), 2.0);
        assert!(ray.is_stopped());
        assert!(!Ray::default().is_stopped());
    }

    #[test]
    fn test_map_keeps_lost_lanes_lost() {
        let rays = Rays::new(vec![Some(Ray::default()), None, Some(Ray::default())]);
        let mapped = rays.map(|ray| Some(ray.translate(&Vector::x())));

        assert_eq!(mapped.len(), 3);
        assert!(mapped[1].is_none());
        assert_eq!(mapped.alive(), 2);

        let lost = rays.map(|_| None);
        assert_eq!(lost.len(), 3);
        assert_eq!(lost.alive(), 0);
    }

    #[test]
    fn test_chunks_and_concat() {
        let rays: Rays = (0..7)
            .map(|i| (i % 3 != 0).then(|| Ray::new(Point::new(i as Float, 0.0, 0.0), Vector::z(), 0.0)))
            .collect();

        let chunks = rays.chunks(3);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].len(), 1);
        assert_eq!(Rays::concat(chunks), rays);
    }
}
