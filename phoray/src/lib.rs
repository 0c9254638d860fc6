//! Geometric ray tracing through X-ray optical systems.
//!
//! An [`OpticalSystem`] is an ordered list of [`Element`]s lit by one or more
//! [`Source`]s. Every element owns a [`Surface`], defined in its own local
//! frame, and a [`Member`] placing that frame in the world. Rays travel as
//! index-stable [`Rays`] batches: a ray that misses something is a `None`
//! lane, never a removed entry, so lane `i` of every stage always descends
//! from lane `i` of the source.

mod element;
mod error;
mod frame;
mod interaction;
mod member;
#[cfg(feature = "rayon")]
mod parallel;
mod ray;
mod solver;
mod source;
mod surface;
mod system;

pub use nalgebra;

pub use element::*;
pub use error::*;
pub use frame::*;
pub use interaction::*;
pub use member::*;
pub use ray::*;
pub use solver::*;
pub use source::*;
pub use surface::*;
pub use system::*;

pub type Float = f64;

/// A position in some frame. Translated by frame changes.
pub type Point = nalgebra::Point3<Float>;

/// A direction (or displacement) in some frame. Only rotated by frame changes.
pub type Vector = nalgebra::Vector3<Float>;

/// A unit-length [`Vector`].
pub type UnitVector = nalgebra::Unit<Vector>;
