use crate::*;
use phoray::{Element, Source};
use phoray_shapes::RowlandSpectrometer;
use std::sync::OnceLock;

fn free_params() -> Vec<Param> {
    vec![Param::list("elements"), Param::list("sources")]
}

fn rowland_params() -> Vec<Param> {
    let defaults = RowlandSpectrometer::default();
    vec![
        Param::length("radius", defaults.radius),
        Param::number("line_density", defaults.line_density),
        Param::number("angle", defaults.angle),
        Param::number("wavelength", defaults.wavelength),
        Param::integer("order", defaults.order.into()),
        Param::list("sources"),
    ]
}

fn rowland_from_args(args: &Args) -> Result<RowlandSpectrometer, JsonError> {
    Ok(RowlandSpectrometer {
        radius: args.length("radius")?,
        line_density: args.number("line_density")?,
        angle: args.number("angle")?,
        wavelength: args.number("wavelength")?,
        order: args.integer("order")?,
    })
}

/// Every system type, by name. Objects without a type are free systems,
/// also known as `Sequential`.
///
/// A `RowlandSpectrometer` without sources is lit by a point source at its
/// entrance, at its design wavelength.
pub fn systems() -> &'static Registry<OpticalSystem<Geometry>> {
    static SYSTEMS: OnceLock<Registry<OpticalSystem<Geometry>>> = OnceLock::new();

    SYSTEMS.get_or_init(|| {
        Registry::new("system", "Free")
            .with("Free", free_params, |args| {
                Ok(OpticalSystem::new(
                    args.objects::<Element<Geometry>>("elements")?,
                    args.objects::<Source>("sources")?,
                ))
            })
            .alias("Sequential", "Free")
            .with(RowlandSpectrometer::json_type(), rowland_params, |args| {
                let rowland = rowland_from_args(args)?;
                let mut sources = args.objects::<Source>("sources")?;
                if sources.is_empty() {
                    sources.push(rowland.source());
                }
                Ok(rowland.build(sources)?)
            })
    })
}

impl JsonType for RowlandSpectrometer {
    #[inline]
    fn json_type() -> String {
        "RowlandSpectrometer".into()
    }
}

/// Written without sources, see [`systems`].
impl JsonSer for RowlandSpectrometer {
    fn to_json(&self) -> Value {
        let mut args = Map::new();
        args.insert("radius".into(), self.radius.into());
        args.insert("line_density".into(), self.line_density.into());
        args.insert("angle".into(), self.angle.into());
        args.insert("wavelength".into(), self.wavelength.into());
        args.insert("order".into(), self.order.into());
        typed(Self::json_type(), args)
    }
}

/// Any system is written out element by element, as a `Free` system.
impl JsonSer for OpticalSystem<Geometry> {
    fn to_json(&self) -> Value {
        let mut args = Map::new();
        args.insert("elements".into(), self.elements.to_json());
        args.insert("sources".into(), self.sources.to_json());
        typed("Free", args)
    }
}

impl JsonDes for OpticalSystem<Geometry> {
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        systems().build(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phoray::{Aperture, Interaction, Member};
    use phoray_shapes::{Plane, Sphere};

    fn periscope() -> Value {
        json!({
            "type": "Sequential",
            "args": {
                "elements": [
                    {
                        "args": {
                            "position": { "z": 1.0 },
                            "rotation": { "x": core::f64::consts::FRAC_PI_4 },
                        },
                    },
                    {
                        "type": "Detector",
                        "args": {
                            "position": { "y": 2.0, "z": 1.0 },
                            "rotation": { "x": -core::f64::consts::FRAC_PI_2 },
                        },
                    },
                ],
                "sources": [{ "args": { "wavelength": 1e-9 } }],
            },
        })
    }

    #[test]
    fn test_free_system() {
        let system = OpticalSystem::<Geometry>::from_json(&periscope()).unwrap();
        assert_eq!(system.elements.len(), 2);
        assert_eq!(system.elements[0].interaction, Interaction::Mirror);
        assert_eq!(system.elements[1].interaction, Interaction::Detector);
        assert_eq!(system.sources, [Source::trivial(Member::default(), 1e-9)]);

        let trace = system.trace(1);
        let hit = trace.footprint(1, 0).unwrap()[0];
        assert!(hit.x.abs() < 1e-12 && hit.y.abs() < 1e-12);
    }

    #[test]
    fn test_written_system_reads_back() {
        let system = OpticalSystem::new(
            vec![
                Element::<Geometry>::new(
                    Sphere::try_new(2.0, Aperture::default()).unwrap().into(),
                    Member::new(Vector::z(), Vector::zeros(), Vector::zeros(), Vector::zeros()),
                    Interaction::grating(1e-6, 1),
                ),
                Element::<Geometry>::detector(Plane::default().into(), Member::default()),
            ],
            vec![Source::default()],
        );
        let json = system.to_json();
        assert_eq!(json["type"], "Free");
        assert_eq!(OpticalSystem::<Geometry>::from_json(&json).unwrap(), system);
    }

    #[test]
    fn test_rowland() {
        let rowland = RowlandSpectrometer {
            radius: 2.0,
            ..Default::default()
        };
        let system = OpticalSystem::<Geometry>::from_json(&rowland.to_json()).unwrap();
        assert_eq!(system, rowland.build(vec![rowland.source()]).unwrap());

        // the default Rowland spectrometer
        let json = json!({ "type": "RowlandSpectrometer" });
        let default = RowlandSpectrometer::default();
        assert_eq!(
            OpticalSystem::<Geometry>::from_json(&json).unwrap(),
            default.build(vec![default.source()]).unwrap()
        );
    }

    #[test]
    fn test_evanescent_rowland() {
        let json = json!({
            "type": "RowlandSpectrometer",
            "args": { "order": 1, "wavelength": 1e-6 },
        });
        assert!(matches!(
            OpticalSystem::<Geometry>::from_json(&json),
            Err(JsonError::Core(phoray::Error::Evanescent { .. }))
        ));
    }

    #[test]
    fn test_nested_errors() {
        let json = json!({
            "args": { "elements": [{ "args": { "geometry": { "type": "Torus" } } }] },
        });
        assert!(matches!(
            OpticalSystem::<Geometry>::from_json(&json),
            Err(JsonError::UnknownType { category: "geometry", .. })
        ));
    }
}
