use crate::*;
use nalgebra::Isometry3;

/// Anything placed in space: a chain of [`Frame`]s leading from the world to
/// a local coordinate system.
///
/// The chain is `[parents.., placement, alignment]`, outermost first. For a
/// member without parents, a local vector `v` lands at
///
/// `R(rotation) * (R(alignment) * v + offset) + position`
///
/// in the world: `offset` and `alignment` fine-tune the component relative
/// to where `position` and `rotation` put it.
#[derive(Clone, Debug, PartialEq)]
pub struct Member {
    parents: Vec<Frame>,
    placement: Frame,
    alignment: Frame,
    to_world: Isometry3<Float>,
    to_local: Isometry3<Float>,
}

impl Default for Member {
    #[inline]
    fn default() -> Self {
        Self::with_parents(Vec::new(), Frame::identity(), Frame::identity())
    }
}

impl Member {
    #[must_use]
    pub fn new(position: Vector, rotation: Vector, offset: Vector, alignment: Vector) -> Self {
        Self::with_parents(
            Vec::new(),
            Frame::new(position, rotation),
            Frame::new(offset, alignment),
        )
    }

    /// A member placed relative to `parents`, given outermost first.
    #[must_use]
    pub fn with_parents(parents: Vec<Frame>, placement: Frame, alignment: Frame) -> Self {
        let mut member = Self {
            parents,
            placement,
            alignment,
            to_world: Isometry3::identity(),
            to_local: Isometry3::identity(),
        };
        member.update();
        member
    }

    fn update(&mut self) {
        let chain = || {
            self.parents
                .iter()
                .chain([&self.placement, &self.alignment])
        };

        self.to_world = chain().fold(Isometry3::identity(), |acc, frame| acc * frame.to_parent());
        self.to_local = chain()
            .rev()
            .fold(Isometry3::identity(), |acc, frame| acc * frame.to_local());
    }

    #[inline]
    #[must_use]
    pub fn parents(&self) -> &[Frame] {
        &self.parents
    }

    /// Every frame of the chain, outermost first.
    #[inline]
    pub fn frames(&self) -> impl DoubleEndedIterator<Item = &Frame> + '_ {
        self.parents.iter().chain([&self.placement, &self.alignment])
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> &Vector {
        self.placement.position()
    }

    #[inline]
    #[must_use]
    pub fn rotation(&self) -> &Vector {
        self.placement.rotation()
    }

    #[inline]
    #[must_use]
    pub fn offset(&self) -> &Vector {
        self.alignment.position()
    }

    #[inline]
    #[must_use]
    pub fn alignment(&self) -> &Vector {
        self.alignment.rotation()
    }

    pub fn set_position(&mut self, position: Vector) {
        self.placement.set_position(position);
        self.update();
    }

    pub fn set_rotation(&mut self, rotation: Vector) {
        self.placement.set_rotation(rotation);
        self.update();
    }

    pub fn set_offset(&mut self, offset: Vector) {
        self.alignment.set_position(offset);
        self.update();
    }

    pub fn set_alignment(&mut self, alignment: Vector) {
        self.alignment.set_rotation(alignment);
        self.update();
    }

    /// The frame a child member should use as its innermost parent.
    #[inline]
    #[must_use]
    pub fn placement(&self) -> &Frame {
        &self.placement
    }

    #[inline]
    #[must_use]
    pub fn to_world(&self) -> &Isometry3<Float> {
        &self.to_world
    }

    #[inline]
    #[must_use]
    pub fn to_local(&self) -> &Isometry3<Float> {
        &self.to_local
    }

    #[inline]
    #[must_use]
    pub fn localize_point(&self, point: &Point) -> Point {
        self.to_local * point
    }

    #[inline]
    #[must_use]
    pub fn globalize_point(&self, point: &Point) -> Point {
        self.to_world * point
    }

    #[inline]
    #[must_use]
    pub fn localize_vector(&self, vector: &Vector) -> Vector {
        self.to_local * vector
    }

    #[inline]
    #[must_use]
    pub fn globalize_vector(&self, vector: &Vector) -> Vector {
        self.to_world * vector
    }

    #[inline]
    #[must_use]
    pub fn localize_ray(&self, ray: &Ray) -> Ray {
        ray.transform(&self.to_local)
    }

    #[inline]
    #[must_use]
    pub fn globalize_ray(&self, ray: &Ray) -> Ray {
        ray.transform(&self.to_world)
    }

    /// World to local.
    #[inline]
    #[must_use]
    pub fn localize(&self, rays: &Rays) -> Rays {
        rays.transform(&self.to_local)
    }

    /// Local to world.
    #[inline]
    #[must_use]
    pub fn globalize(&self, rays: &Rays) -> Rays {
        rays.transform(&self.to_world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f64::consts::{FRAC_PI_2, PI};

    const A: Float = 0.3;
    const B: Float = -0.7;
    const C: Float = 1.1;
    const D: Float = 2.0;
    const E: Float = -3.0;

    #[test]
    fn test_position() {
        let member = Member::new(Vector::new(D, E, 0.0), Vector::zeros(), Vector::zeros(), Vector::zeros());
        let p = Point::new(A, B, C);
        assert_relative_eq!(member.globalize_point(&p), Point::new(A + D, B + E, C));
        assert_relative_eq!(member.localize_point(&p), Point::new(A - D, B - E, C));
    }

    #[test]
    fn test_rotation() {
        let member = Member::new(
            Vector::zeros(),
            Vector::new(FRAC_PI_2, 0.0, -FRAC_PI_2),
            Vector::zeros(),
            Vector::zeros(),
        );
        let p = Point::new(A, B, C);
        assert_relative_eq!(member.localize_point(&p), Point::new(-C, A, -B), epsilon = 1e-12);
        assert_relative_eq!(member.globalize_point(&p), Point::new(B, -C, -A), epsilon = 1e-12);
    }

    #[test]
    fn test_offset_is_rotated_with_the_member() {
        let member = Member::new(
            Vector::new(D, 0.0, 0.0),
            Vector::new(0.0, 0.0, FRAC_PI_2),
            Vector::new(E, 0.0, 0.0),
            Vector::zeros(),
        );
        // the offset along local x ends up along world y
        assert_relative_eq!(
            member.globalize_point(&Point::origin()),
            Point::new(D, E, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_combined() {
        let member = Member::new(
            Vector::new(D, 0.0, E),
            Vector::new(FRAC_PI_2, 0.0, -FRAC_PI_2),
            Vector::zeros(),
            Vector::new(0.0, PI, 0.0),
        );
        let p = Point::new(A, B, C);
        let global = member.globalize_point(&p);
        assert_relative_eq!(global, Point::new(B + D, C, A + E), epsilon = 1e-12);
        assert_relative_eq!(member.localize_point(&global), p, epsilon = 1e-12);
    }

    #[test]
    fn test_directions_are_only_rotated() {
        let member = Member::new(
            Vector::new(D, E, 1.0),
            Vector::new(0.2, 0.1, 0.0),
            Vector::new(1.0, 1.0, 1.0),
            Vector::zeros(),
        );
        let v = Vector::new(A, B, C);
        assert_relative_eq!(member.globalize_vector(&v).norm(), v.norm(), epsilon = 1e-12);

        let still = Member::new(Vector::new(D, E, 1.0), Vector::zeros(), Vector::new(1.0, 1.0, 1.0), Vector::zeros());
        assert_relative_eq!(still.globalize_vector(&v), v);
    }

    #[test]
    fn test_parents() {
        let parent = Frame::new(Vector::new(0.0, 0.0, 10.0), Vector::new(0.0, 0.0, FRAC_PI_2));
        let member = Member::with_parents(
            vec![parent],
            Frame::new(Vector::new(1.0, 0.0, 0.0), Vector::zeros()),
            Frame::identity(),
        );
        assert_eq!(member.frames().count(), 3);
        assert_relative_eq!(
            member.globalize_point(&Point::origin()),
            Point::new(0.0, 1.0, 10.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_setters() {
        let mut member = Member::default();
        member.set_position(Vector::new(1.0, 2.0, 3.0));
        member.set_rotation(Vector::new(0.1, 0.2, 0.3));
        member.set_offset(Vector::new(-1.0, 0.0, 0.5));
        member.set_alignment(Vector::new(0.0, -0.4, 0.0));

        let fresh = Member::new(
            Vector::new(1.0, 2.0, 3.0),
            Vector::new(0.1, 0.2, 0.3),
            Vector::new(-1.0, 0.0, 0.5),
            Vector::new(0.0, -0.4, 0.0),
        );
        assert_eq!(member, fresh);
        assert_eq!(*member.offset(), Vector::new(-1.0, 0.0, 0.5));
        assert_eq!(*member.alignment(), Vector::new(0.0, -0.4, 0.0));
    }

    #[test]
    fn test_rays_round_trip() {
        let member = Member::new(
            Vector::new(0.5, -2.0, 4.0),
            Vector::new(0.3, -1.2, 2.5),
            Vector::new(0.1, 0.2, -0.3),
            Vector::new(-0.7, 0.4, 0.05),
        );
        let rays = Rays::new(vec![
            Some(Ray::new(Point::new(A, B, C), Vector::new(0.0, 0.6, 0.8), 1e-9)),
            None,
        ]);
        let back = member.globalize(&member.localize(&rays));
        assert!(back[1].is_none());
        let (ray, original) = (back[0].unwrap(), rays[0].unwrap());
        assert_relative_eq!(ray.endpoint, original.endpoint, epsilon = 1e-12);
        assert_relative_eq!(ray.direction, original.direction, epsilon = 1e-12);
    }
}
