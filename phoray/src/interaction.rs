//! The physics of a ray meeting a surface, in the surface's local frame.
//!
//! Everything here works on bare direction vectors and unit normals, the
//! [`Surface`] trait wires these functions to intersections.

use crate::*;

/// `normal`, flipped if needed so that it points against `direction`,
/// i. e. toward the side the ray comes from.
#[inline]
#[must_use]
pub fn facing(normal: &Vector, direction: &Vector) -> Vector {
    if direction.dot(normal) > 0.0 {
        -normal
    } else {
        *normal
    }
}

/// Mirror reflection of `direction` off a surface with unit normal `normal`.
///
/// The result doesn't depend on the orientation of `normal`, has the same norm
/// as `direction`, and satisfies `result · n == -(direction · n)`.
#[inline]
#[must_use]
pub fn reflect_direction(direction: &Vector, normal: &Vector) -> Vector {
    direction - normal * (2.0 * direction.dot(normal))
}

/// Unit tangent along the grating lines of a surface with unit normal `normal`.
///
/// Lines lie in the plane spanned by the normal and the local x axis, so the
/// returned vector always has a non-negative x component. When the normal
/// is parallel to x, the y axis is used instead.
#[must_use]
pub fn line_direction(normal: &Vector) -> Vector {
    let project = |axis: Vector| axis - normal * axis.dot(normal);

    project(Vector::x())
        .try_normalize(Float::EPSILON * 16.0)
        .or_else(|| project(Vector::y()).try_normalize(Float::EPSILON * 16.0))
        .unwrap_or_else(Vector::x)
}

/// Diffraction of `direction` by a grating of local line `spacing`, into `order`.
///
/// `lines` is the unit tangent along the grating lines (see [`line_direction`]).
/// The component of the reflected direction along the lines is conserved,
/// the dispersion is in the plane normal to them:
///
/// `sin(θ_out) = sin(θ_in) + order * wavelength / spacing`
///
/// where angles are taken from the normal, within that plane.
///
/// Returns exactly [`reflect_direction`] when `order == 0`, `wavelength == 0`
/// or the spacing is zero or not finite (no grating). Returns `None` when
/// the order is evanescent.
#[must_use]
pub fn diffract_direction(
    direction: &Vector,
    normal: &Vector,
    lines: &Vector,
    spacing: Float,
    order: i32,
    wavelength: Float,
) -> Option<Vector> {
    let reflected = reflect_direction(direction, normal);

    if order == 0 || wavelength == 0.0 || spacing == 0.0 || !spacing.is_finite() {
        return Some(reflected);
    }

    let n = facing(normal, direction);
    let dispersion = lines.cross(&n);

    let r_g = reflected.dot(lines);
    let r_a = reflected.dot(&dispersion);

    // norm of the projection of the reflected direction in the dispersion plane
    let rho = (1.0 - r_g * r_g).max(0.0).sqrt();

    if rho <= 0.0 {
        return None;
    }

    let sin_out = (r_a + Float::from(order) * wavelength / spacing) / rho;

    if !(sin_out.abs() <= 1.0) {
        return None;
    }

    let cos_out = (1.0 - sin_out * sin_out).sqrt();

    Some(lines * r_g + (dispersion * sin_out + n * cos_out) * rho)
}

/// Refraction of `direction` through a surface separating a medium of
/// index `index1` (on the side the ray comes from) from one of index `index2`.
///
/// Uses the vector form of Snell's law, no dispersion. Normal incidence
/// leaves the direction unchanged, total internal reflection reflects.
#[must_use]
pub fn refract_direction(direction: &Vector, normal: &Vector, index1: Float, index2: Float) -> Vector {
    let n = facing(normal, direction);
    let cos_i = -direction.dot(&n);
    let sin2_i = 1.0 - cos_i * cos_i;

    if sin2_i <= 0.0 {
        return *direction;
    }

    let eta = index1 / index2;
    let sin2_t = eta * eta * sin2_i;

    if sin2_t > 1.0 {
        return reflect_direction(direction, &n);
    }

    let cos_t = (1.0 - sin2_t).sqrt();

    direction * eta + n * (eta * cos_i - cos_t)
}

/// How far apart the lines of a grating are, in the grating's local frame.
#[derive(Clone, Debug, PartialEq)]
pub enum LineSpacing {
    /// Same spacing everywhere
    Constant(Float),
    /// Variable line spacing: the line *density* follows the polynomial
    /// `N(y) = a0 + a1 * y + a2 * y^2 + ...` along the local y axis
    /// (the dispersion direction), and the spacing is `1 / N(y)`.
    Polynomial(Vec<Float>),
}

impl Default for LineSpacing {
    #[inline]
    fn default() -> Self {
        Self::Constant(0.0)
    }
}

impl LineSpacing {
    /// Local line density at `point`, in lines per unit length.
    #[must_use]
    pub fn density_at(&self, point: &Point) -> Float {
        match self {
            Self::Constant(d) => {
                if *d == 0.0 {
                    0.0
                } else {
                    d.recip()
                }
            }
            // Horner
            Self::Polynomial(coefficients) => coefficients
                .iter()
                .rev()
                .fold(0.0, |acc, a| acc.mul_add(point.y, *a)),
        }
    }

    /// Local line spacing at `point`. Zero means "no lines", i. e. a mirror.
    #[must_use]
    pub fn spacing_at(&self, point: &Point) -> Float {
        match self {
            Self::Constant(d) => *d,
            Self::Polynomial(_) => {
                let density = self.density_at(point);
                if density == 0.0 {
                    0.0
                } else {
                    density.recip()
                }
            }
        }
    }
}
