use num_traits::Float;

/// Solves `a * x^2 + b * x + c = 0` over the reals.
///
/// Returns `[x1, x2]` with `x1 = (-b + sqrt(delta)) / 2a` and
/// `x2 = (-b - sqrt(delta)) / 2a`. When `a == 0` the equation is linear and
/// its single root is returned twice.
///
/// Both roots are computed without cancellation, through
/// `q = -(b + sign(b) sqrt(delta)) / 2`, as `q / a` and `c / q`: a tiny `a`
/// (a ray nearly parallel to a paraboloid's axis) keeps an accurate small root.
///
/// Returns `None` when there is no real root (`delta < 0`), or no root at
/// all (`a == b == 0`).
#[inline]
#[must_use]
pub fn quadratic<T: Float>(a: T, b: T, c: T) -> Option<[T; 2]> {
    if a.is_zero() {
        return (!b.is_zero()).then(|| {
            let x = -c / b;
            [x, x]
        });
    }

    let two = T::one() + T::one();
    let delta = b.mul_add(b, -(two * two * a * c));

    if delta < T::zero() {
        return None;
    }

    let root = delta.sqrt();

    if b.is_sign_negative() {
        // q = (-b + root) / 2
        let q = (root - b) / two;
        Some([q / a, if q.is_zero() { q } else { c / q }])
    } else {
        // q = (-b - root) / 2
        let q = -(b + root) / two;
        Some([if q.is_zero() { q } else { c / q }, q / a])
    }
}

/// Lane-wise [`quadratic`] over three coefficient slices of equal length.
///
/// Lane `i` of the output only depends on lane `i` of the inputs.
///
/// # Panics
///
/// if the slices don't have the same length
#[must_use]
pub fn quadratic_batch<T: Float>(a: &[T], b: &[T], c: &[T]) -> Vec<Option<[T; 2]>> {
    assert!(
        a.len() == b.len() && b.len() == c.len(),
        "coefficient batches must have the same length"
    );

    a.iter()
        .zip(b)
        .zip(c)
        .map(|((&a, &b), &c)| quadratic(a, b, c))
        .collect()
}
