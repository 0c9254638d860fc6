use crate::Float;
use thiserror::Error;

/// Errors raised while building optical components.
///
/// Rays never produce errors: a ray that cannot interact becomes a `None`
/// lane in its batch. These are configuration mistakes only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{name} must be finite and non-zero, got {value}")]
    Degenerate { name: &'static str, value: Float },
    #[error("aperture {name} must be positive, got {value}")]
    InvalidAperture { name: &'static str, value: Float },
    #[error("refractive index {name} must be finite and positive, got {value}")]
    InvalidIndex { name: &'static str, value: Float },
    #[error("order {order} is evanescent at wavelength {wavelength} for line density {line_density}")]
    Evanescent {
        order: i32,
        wavelength: Float,
        line_density: Float,
    },
    #[error("no {kind} at index {index} (there are {len})")]
    OutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },
}

pub type Result<T> = core::result::Result<T, Error>;

/// Checks that `value` can be used as a length, radius or semi-axis.
pub fn non_degenerate(name: &'static str, value: Float) -> Result<Float> {
    if value.is_finite() && value != 0.0 {
        Ok(value)
    } else {
        Err(Error::Degenerate { name, value })
    }
}
