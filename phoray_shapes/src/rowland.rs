use super::*;
use core::f64::consts::{FRAC_PI_2, PI};

/// A spherical grating spectrometer in Rowland circle mounting.
///
/// The entrance point sits at the world origin, light travelling along `+z`
/// toward a concave spherical grating of radius `radius`. The detector plane
/// sits on the Rowland circle (of diameter `radius`, tangent to the grating),
/// where the central ray of the chosen `order` focuses, facing that ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowlandSpectrometer {
    pub radius: Float,
    /// Grating lines per unit length
    pub line_density: Float,
    /// Grazing angle of incidence on the grating, in degrees
    pub angle: Float,
    /// Wavelength the detector is placed for
    pub wavelength: Float,
    pub order: i32,
}

impl Default for RowlandSpectrometer {
    fn default() -> Self {
        Self {
            radius: 1.0,
            line_density: 1e6,
            angle: 10.0,
            wavelength: 1e-9,
            order: -1,
        }
    }
}

impl RowlandSpectrometer {
    /// Angle of incidence, from the grating normal, in radians.
    #[inline]
    #[must_use]
    pub fn incidence(&self) -> Float {
        FRAC_PI_2 - self.angle.to_radians()
    }

    /// Angle of diffraction of the design wavelength, from the grating normal,
    /// on the same side as [`incidence`](Self::incidence) when positive.
    pub fn diffraction(&self) -> Result<Float> {
        let sin_beta = self.incidence().sin()
            + Float::from(self.order) * self.wavelength * self.line_density;

        if sin_beta.abs() <= 1.0 {
            Ok(sin_beta.asin())
        } else {
            Err(Error::Evanescent {
                order: self.order,
                wavelength: self.wavelength,
                line_density: self.line_density,
            })
        }
    }

    /// Distance from the entrance point to the grating.
    #[inline]
    #[must_use]
    pub fn entrance_arm(&self) -> Float {
        self.radius * self.incidence().cos()
    }

    /// Distance from the grating to the detector.
    pub fn exit_arm(&self) -> Result<Float> {
        Ok(self.radius * self.diffraction()?.cos())
    }

    fn grating_frame(&self) -> Frame {
        Frame::new(
            Vector::new(0.0, 0.0, self.entrance_arm()),
            Vector::new(self.incidence(), 0.0, 0.0),
        )
    }

    pub fn grating(&self) -> Result<Element<Geometry>> {
        let line_density = non_degenerate("line_density", self.line_density)?;
        let sphere = Sphere::try_new(self.radius, Aperture::try_new(0.1, 0.1)?)?;

        Ok(Element::new(
            sphere.into(),
            Member::with_parents(Vec::new(), self.grating_frame(), Frame::identity()),
            Interaction::grating(line_density.recip(), self.order),
        ))
    }

    /// A plane detector placed relative to the grating, centered on the
    /// diffracted central ray and normal to it.
    pub fn detector(&self) -> Result<Element<Geometry>> {
        let beta = self.diffraction()?;
        let exit = self.exit_arm()?;
        // the central ray leaving the grating's vertex, in the grating's frame
        let outgoing = Vector::new(0.0, beta.sin(), -beta.cos());

        Ok(Element::detector(
            Plane::default().into(),
            Member::with_parents(
                vec![self.grating_frame()],
                Frame::new(outgoing * exit, Vector::new(PI + beta, 0.0, 0.0)),
                Frame::identity(),
            ),
        ))
    }

    /// A point source at the entrance, emitting the design wavelength.
    #[must_use]
    pub fn source(&self) -> Source {
        Source::trivial(Member::default(), self.wavelength)
    }

    /// The grating and the detector, lit by `sources`.
    pub fn build(&self, sources: Vec<Source>) -> Result<OpticalSystem<Geometry>> {
        log::debug!(
            "rowland: incidence {:.3} rad, entrance arm {}, exit arm {}",
            self.incidence(),
            self.entrance_arm(),
            self.exit_arm()?
        );
        Ok(OpticalSystem::new(vec![self.grating()?, self.detector()?], sources))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_central_ray_hits_detector_center() {
        let rowland = RowlandSpectrometer::default();
        let system = rowland.build(vec![rowland.source()]).unwrap();
        let trace = system.trace(1);

        let hits = trace.footprint(1, 0).unwrap();
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0].x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hits[0].y, 0.0, epsilon = 1e-9);

        let axis = system.axis(0).unwrap();
        assert_eq!(axis.len(), 3);
        assert_relative_eq!(axis[1], Point::new(0.0, 0.0, rowland.entrance_arm()), epsilon = 1e-12);
        assert_relative_eq!((axis[2] - axis[1]).norm(), rowland.exit_arm().unwrap(), epsilon = 1e-9);
    }

    #[test]
    fn test_meridional_focus() {
        let rowland = RowlandSpectrometer::default();
        let source = Source::gaussian(
            Member::default(),
            rowland.wavelength,
            Vector::zeros(),
            Vector::new(0.0, 1e-4, 0.0),
            11,
        );
        let system = rowland.build(vec![source]).unwrap();
        let trace = system.trace(64);

        let hits = trace.footprint(1, 0).unwrap();
        assert_eq!(hits.len(), 64);
        // unfocused, the spot would be about exit arm * divergence wide
        for hit in hits {
            assert!(hit.y.abs() < 1e-7, "y = {}", hit.y);
        }
    }

    #[test]
    fn test_other_wavelengths_miss_the_center() {
        let rowland = RowlandSpectrometer::default();
        let system = rowland
            .build(vec![Source::trivial(Member::default(), 2e-9)])
            .unwrap();
        let hit = system.trace(1).footprint(1, 0).unwrap()[0];
        assert!(hit.y.abs() > 1e-4);
    }

    #[test]
    fn test_evanescent_design() {
        let rowland = RowlandSpectrometer {
            order: 1,
            wavelength: 1e-6,
            ..Default::default()
        };
        assert!(matches!(rowland.build(vec![]), Err(Error::Evanescent { .. })));
    }
}
