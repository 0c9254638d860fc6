use crate::*;
use phoray::{Aperture, Float, Surface};
use phoray_shapes::*;
use std::sync::OnceLock;

fn aperture_params() -> [Param; 2] {
    [Param::length("xsize", 1.0), Param::length("ysize", 1.0)]
}

fn aperture_from_args(args: &Args) -> Result<Aperture, JsonError> {
    Ok(Aperture::try_new(args.length("xsize")?, args.length("ysize")?)?)
}

fn aperture_args(aperture: &Aperture) -> Map<String, Value> {
    let mut args = Map::new();
    // infinite lengths become `null`
    args.insert("xsize".into(), aperture.xsize().into());
    args.insert("ysize".into(), aperture.ysize().into());
    args
}

fn with_aperture(params: impl IntoIterator<Item = Param>) -> Vec<Param> {
    params.into_iter().chain(aperture_params()).collect()
}

fn semi_axes_params() -> Vec<Param> {
    with_aperture([
        Param::length("a", 1.0),
        Param::length("b", 1.0),
        Param::length("c", 1.0),
    ])
}

/// Every geometry type, by name. Objects without a type are planes.
pub fn geometries() -> &'static Registry<Geometry> {
    static GEOMETRIES: OnceLock<Registry<Geometry>> = OnceLock::new();

    GEOMETRIES.get_or_init(|| {
        Registry::new("geometry", "Plane")
            .with(Plane::json_type(), || with_aperture([]), |args| {
                Ok(Plane::new(aperture_from_args(args)?).into())
            })
            .with(Sphere::json_type(), || with_aperture([Param::length("R", 1.0)]), |args| {
                Ok(Sphere::try_new(args.length("R")?, aperture_from_args(args)?)?.into())
            })
            .with(Cylinder::json_type(), || with_aperture([Param::length("R", 1.0)]), |args| {
                Ok(Cylinder::try_new(args.length("R")?, aperture_from_args(args)?)?.into())
            })
            .with(Ellipsoid::json_type(), semi_axes_params, |args| {
                Ok(Ellipsoid::try_new(
                    args.length("a")?,
                    args.length("b")?,
                    args.length("c")?,
                    aperture_from_args(args)?,
                )?
                .into())
            })
            .with(Paraboloid::json_type(), semi_axes_params, |args| {
                Ok(Paraboloid::try_new(
                    args.length("a")?,
                    args.length("b")?,
                    args.length("c")?,
                    aperture_from_args(args)?,
                )?
                .into())
            })
    })
}

macro_rules! json_type {
    ($($ty:ident => $name:literal),* $(,)?) => {$(
        impl JsonType for $ty {
            #[inline]
            fn json_type() -> String {
                $name.into()
            }
        }
    )*};
}

json_type!(
    Plane => "Plane",
    Sphere => "Sphere",
    Cylinder => "Cylinder",
    Ellipsoid => "Ellipsoid",
    Paraboloid => "Paraboloid",
    FnSurface => "Custom",
);

impl JsonSer for Plane {
    fn to_json(&self) -> Value {
        typed(Self::json_type(), aperture_args(self.aperture()))
    }
}

impl JsonSer for Sphere {
    fn to_json(&self) -> Value {
        let mut args = aperture_args(self.aperture());
        args.insert("R".into(), self.radius().into());
        typed(Self::json_type(), args)
    }
}

impl JsonSer for Cylinder {
    fn to_json(&self) -> Value {
        let mut args = aperture_args(self.aperture());
        args.insert("R".into(), self.radius().into());
        typed(Self::json_type(), args)
    }
}

fn semi_axes_to_json(name: String, [a, b, c]: [Float; 3], aperture: &Aperture) -> Value {
    let mut args = aperture_args(aperture);
    args.insert("a".into(), a.into());
    args.insert("b".into(), b.into());
    args.insert("c".into(), c.into());
    typed(name, args)
}

impl JsonSer for Ellipsoid {
    fn to_json(&self) -> Value {
        semi_axes_to_json(Self::json_type(), self.semi_axes(), self.aperture())
    }
}

impl JsonSer for Paraboloid {
    fn to_json(&self) -> Value {
        semi_axes_to_json(Self::json_type(), self.parameters(), self.aperture())
    }
}

/// Only the aperture of a custom surface can be written out: it can't be
/// read back.
impl JsonSer for FnSurface {
    fn to_json(&self) -> Value {
        typed(Self::json_type(), aperture_args(self.aperture()))
    }
}

impl JsonSer for Geometry {
    fn to_json(&self) -> Value {
        match self {
            Self::Plane(s) => s.to_json(),
            Self::Sphere(s) => s.to_json(),
            Self::Cylinder(s) => s.to_json(),
            Self::Ellipsoid(s) => s.to_json(),
            Self::Paraboloid(s) => s.to_json(),
            Self::Custom(s) => s.to_json(),
        }
    }
}

impl JsonDes for Geometry {
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        geometries().build(json)
    }
}
