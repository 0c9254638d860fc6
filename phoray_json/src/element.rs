use crate::*;
use phoray::{Element, Interaction, LineSpacing};
use std::sync::OnceLock;

/// `geometry`, the type's own parameters, then the member's.
fn element_params(own: impl IntoIterator<Item = Param>) -> Vec<Param> {
    let geometry = Param::new("geometry", ParamKind::Geometry, Geometry::default().to_json());
    [geometry]
        .into_iter()
        .chain(own)
        .chain(member_params())
        .collect()
}

fn element_from_args(args: &Args, interaction: Interaction) -> Result<Element<Geometry>, JsonError> {
    Ok(Element::new(
        Geometry::from_json(args.get("geometry"))?,
        member_from_args(args)?,
        interaction,
    ))
}

/// Every element type, by name. Objects without a type are mirrors.
pub fn elements() -> &'static Registry<Element<Geometry>> {
    static ELEMENTS: OnceLock<Registry<Element<Geometry>>> = OnceLock::new();

    ELEMENTS.get_or_init(|| {
        Registry::new("element", "Mirror")
            .with("Mirror", || element_params([]), |args| {
                element_from_args(args, Interaction::Mirror)
            })
            .with(
                "Grating",
                || element_params([Param::number("d", 0.0), Param::integer("order", 0)]),
                |args| element_from_args(args, Interaction::grating(args.number("d")?, args.integer("order")?)),
            )
            .with(
                "VlsGrating",
                || element_params([Param::list("coefficients"), Param::integer("order", 0)]),
                |args| {
                    let interaction = Interaction::vls_grating(args.numbers("coefficients")?, args.integer("order")?);
                    element_from_args(args, interaction)
                },
            )
            .with("Detector", || element_params([]), |args| {
                element_from_args(args, Interaction::Detector)
            })
            .with("Screen", || element_params([]), |args| {
                element_from_args(args, Interaction::Screen)
            })
            .with(
                "Glass",
                || element_params([Param::number("index1", 1.0), Param::number("index2", 1.0)]),
                |args| {
                    let interaction = Interaction::glass(args.number("index1")?, args.number("index2")?)?;
                    element_from_args(args, interaction)
                },
            )
    })
}

impl JsonSer for Element<Geometry> {
    fn to_json(&self) -> Value {
        let mut args = Map::new();
        args.insert("geometry".into(), self.geometry.to_json());

        let name = match &self.interaction {
            Interaction::Mirror => "Mirror",
            Interaction::Grating {
                spacing: LineSpacing::Constant(d),
                order,
            } => {
                args.insert("d".into(), (*d).into());
                args.insert("order".into(), (*order).into());
                "Grating"
            }
            Interaction::Grating {
                spacing: LineSpacing::Polynomial(coefficients),
                order,
            } => {
                args.insert("coefficients".into(), coefficients.as_slice().into());
                args.insert("order".into(), (*order).into());
                "VlsGrating"
            }
            Interaction::Detector => "Detector",
            Interaction::Screen => "Screen",
            Interaction::Glass { index1, index2 } => {
                args.insert("index1".into(), (*index1).into());
                args.insert("index2".into(), (*index2).into());
                "Glass"
            }
        };

        member_to_args(&self.member, &mut args);
        typed(name, args)
    }
}

impl JsonDes for Element<Geometry> {
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        elements().build(json)
    }
}
