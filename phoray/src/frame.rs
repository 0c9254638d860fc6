use crate::*;
use nalgebra::{Isometry3, Translation3, UnitQuaternion};

/// The rotation described by the Euler angles `(rx, ry, rz)`, in radians.
///
/// Angles are applied intrinsically: first about x, then about the new y,
/// then about the new z, i. e. the returned rotation is `Rx(rx) * Ry(ry) * Rz(rz)`.
#[inline]
#[must_use]
pub fn euler_rotation(angles: &Vector) -> UnitQuaternion<Float> {
    UnitQuaternion::from_axis_angle(&Vector::x_axis(), angles.x)
        * UnitQuaternion::from_axis_angle(&Vector::y_axis(), angles.y)
        * UnitQuaternion::from_axis_angle(&Vector::z_axis(), angles.z)
}

/// A rigid transform between a parent space and a local space.
///
/// A local point `p` sits at `R(rotation) * p + position` in the parent space.
/// Both directions of the transform are precomputed, and always recomputed
/// together, so they stay exact inverses of each other.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    position: Vector,
    rotation: Vector,
    to_parent: Isometry3<Float>,
    to_local: Isometry3<Float>,
}

impl Default for Frame {
    #[inline]
    fn default() -> Self {
        Self::identity()
    }
}

impl Frame {
    #[inline]
    #[must_use]
    pub fn new(position: Vector, rotation: Vector) -> Self {
        let to_parent =
            Isometry3::from_parts(Translation3::from(position), euler_rotation(&rotation));

        Self {
            position,
            rotation,
            to_local: to_parent.inverse(),
            to_parent,
        }
    }

    #[inline]
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Vector::zeros(), Vector::zeros())
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> &Vector {
        &self.position
    }

    /// The Euler angles of this frame, see [`euler_rotation`].
    #[inline]
    #[must_use]
    pub fn rotation(&self) -> &Vector {
        &self.rotation
    }

    #[inline]
    pub fn set_position(&mut self, position: Vector) {
        *self = Self::new(position, self.rotation);
    }

    #[inline]
    pub fn set_rotation(&mut self, rotation: Vector) {
        *self = Self::new(self.position, rotation);
    }

    /// Local to parent.
    #[inline]
    #[must_use]
    pub fn to_parent(&self) -> &Isometry3<Float> {
        &self.to_parent
    }

    /// Parent to local.
    #[inline]
    #[must_use]
    pub fn to_local(&self) -> &Isometry3<Float> {
        &self.to_local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity() {
        let frame = Frame::identity();
        let p = Point::new(1.0, -2.0, 3.0);
        assert_relative_eq!(frame.to_parent() * p, p);
        assert_relative_eq!(frame.to_local() * p, p);
    }

    #[test]
    fn test_rotation_order() {
        let frame = Frame::new(Vector::zeros(), Vector::new(FRAC_PI_2, 0.0, -FRAC_PI_2));
        let (a, b, c) = (1.0, 2.0, 3.0);

        let global = frame.to_parent() * Vector::new(a, b, c);
        assert_relative_eq!(global, Vector::new(b, -c, -a), epsilon = 1e-12);

        let local = frame.to_local() * Vector::new(a, b, c);
        assert_relative_eq!(local, Vector::new(-c, a, -b), epsilon = 1e-12);
    }

    #[test]
    fn test_directions_ignore_translation() {
        let frame = Frame::new(Vector::new(5.0, 6.0, 7.0), Vector::zeros());
        let v = Vector::new(0.0, 0.0, 1.0);
        assert_relative_eq!(frame.to_parent() * v, v);
        assert_relative_eq!(
            frame.to_parent() * Point::origin(),
            Point::new(5.0, 6.0, 7.0)
        );
    }

    #[test]
    fn test_setters_keep_inverse_in_sync() {
        let mut frame = Frame::new(Vector::new(1.0, 0.0, 0.0), Vector::new(0.3, 0.2, 0.1));
        frame.set_position(Vector::new(-4.0, 2.0, 9.0));
        frame.set_rotation(Vector::new(-1.0, 0.5, 2.0));

        let p = Point::new(0.25, -1.5, 8.0);
        assert_relative_eq!(frame.to_local() * (frame.to_parent() * p), p, epsilon = 1e-12);
        assert_relative_eq!(*frame.position(), Vector::new(-4.0, 2.0, 9.0));
        assert_relative_eq!(*frame.rotation(), Vector::new(-1.0, 0.5, 2.0));
    }
}
