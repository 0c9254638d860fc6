use crate::*;

/// What an [`Element`] does to the rays hitting its surface.
#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
    /// Specular reflection.
    Mirror,
    /// Reflective grating, diffracting into `order`. A zero spacing makes
    /// it a plain mirror.
    Grating { spacing: LineSpacing, order: i32 },
    /// Rays stop where they hit the surface.
    Detector,
    /// Rays are recorded where they hit the surface, and carry on unchanged.
    Screen,
    /// Refractive interface, crossed from either side: `index1` is the index
    /// on the side the ray comes from, `index2` on the other.
    Glass { index1: Float, index2: Float },
}

impl Default for Interaction {
    #[inline]
    fn default() -> Self {
        Self::Mirror
    }
}

impl Interaction {
    /// A grating with constant line spacing `d`.
    pub fn grating(d: Float, order: i32) -> Self {
        Self::Grating {
            spacing: LineSpacing::Constant(d),
            order,
        }
    }

    /// A variable line spacing grating, see [`LineSpacing::Polynomial`].
    pub fn vls_grating(coefficients: Vec<Float>, order: i32) -> Self {
        Self::Grating {
            spacing: LineSpacing::Polynomial(coefficients),
            order,
        }
    }

    pub fn glass(index1: Float, index2: Float) -> Result<Self> {
        for (name, value) in [("index1", index1), ("index2", index2)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidIndex { name, value });
            }
        }
        Ok(Self::Glass { index1, index2 })
    }

    /// Whether rays leaving such an element can interact any further.
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Detector)
    }
}

/// A hit recorded on an element, in the element's local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FootprintPoint {
    pub x: Float,
    pub y: Float,
    pub wavelength: Float,
}

impl From<&Ray> for FootprintPoint {
    #[inline]
    fn from(ray: &Ray) -> Self {
        Self {
            x: ray.endpoint.x,
            y: ray.endpoint.y,
            wavelength: ray.wavelength,
        }
    }
}

/// The outcome of sending a batch through an [`Element`].
///
/// Both fields have one lane per incoming ray: `footprint[i]` is `Some`
/// exactly when `rays[i]` is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Propagation {
    /// Outgoing rays, in world coordinates
    pub rays: Rays,
    pub footprint: Vec<Option<FootprintPoint>>,
}

/// An optical component: a surface, placed in the world by a [`Member`],
/// with an [`Interaction`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element<S> {
    pub geometry: S,
    pub member: Member,
    pub interaction: Interaction,
}

impl<S: Surface> Element<S> {
    #[inline]
    #[must_use]
    pub fn new(geometry: S, member: Member, interaction: Interaction) -> Self {
        Self {
            geometry,
            member,
            interaction,
        }
    }

    #[inline]
    #[must_use]
    pub fn mirror(geometry: S, member: Member) -> Self {
        Self::new(geometry, member, Interaction::Mirror)
    }

    #[inline]
    #[must_use]
    pub fn detector(geometry: S, member: Member) -> Self {
        Self::new(geometry, member, Interaction::Detector)
    }

    #[inline]
    #[must_use]
    pub fn screen(geometry: S, member: Member) -> Self {
        Self::new(geometry, member, Interaction::Screen)
    }

    /// The interaction, in local coordinates.
    pub fn interact(&self, local: &Rays) -> Rays {
        let geometry = &self.geometry;

        match &self.interaction {
            Interaction::Mirror => geometry.reflect(local),
            Interaction::Grating { spacing, order } => {
                geometry.diffract(local, &|point| spacing.spacing_at(point), *order)
            }
            Interaction::Detector => local
                .lanes()
                .iter()
                .zip(geometry.intersect_all(local))
                .map(|(ray, hit)| Some(Ray::stopped(hit?, ray.as_ref()?.wavelength)))
                .collect(),
            Interaction::Screen => local
                .iter()
                .zip(geometry.intersect_all(local))
                .map(|(ray, hit)| {
                    let ray = ray?;
                    Some(ray.redirect(hit?, ray.direction))
                })
                .collect(),
            Interaction::Glass { index1, index2 } => geometry.refract(local, *index1, *index2),
        }
    }

    /// Sends world-space `rays` through this element:
    /// `globalize(interact(localize(rays)))`.
    pub fn propagate(&self, rays: &Rays) -> Propagation {
        let local = self.interact(&self.member.localize(rays));

        let footprint = local.iter().map(|ray| ray.map(FootprintPoint::from)).collect();

        Propagation {
            rays: self.member.globalize(&local),
            footprint,
        }
    }
}
