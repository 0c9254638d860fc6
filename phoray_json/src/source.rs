use crate::*;
use phoray::{Distribution, Source};
use std::sync::OnceLock;

fn source_params(own: impl IntoIterator<Item = Param>) -> Vec<Param> {
    [Param::number("wavelength", 0.0)]
        .into_iter()
        .chain(own)
        .chain(member_params())
        .collect()
}

fn gaussian_params() -> Vec<Param> {
    source_params([
        Param::vector("size"),
        Param::vector("divergence"),
        Param::integer("random_seed", 0),
    ])
}

/// Every source type, by name. Objects without a type are point sources.
pub fn sources() -> &'static Registry<Source> {
    static SOURCES: OnceLock<Registry<Source>> = OnceLock::new();

    SOURCES.get_or_init(|| {
        Registry::new("source", "TrivialSource")
            .with("TrivialSource", || source_params([]), |args| {
                Ok(Source::trivial(member_from_args(args)?, args.number("wavelength")?))
            })
            .with("GaussianSource", gaussian_params, |args| {
                Ok(Source::gaussian(
                    member_from_args(args)?,
                    args.number("wavelength")?,
                    args.vector("size")?,
                    args.vector("divergence")?,
                    args.integer("random_seed")?,
                ))
            })
    })
}

impl JsonSer for Source {
    fn to_json(&self) -> Value {
        let mut args = Map::new();
        args.insert("wavelength".into(), self.wavelength.into());

        let name = match &self.distribution {
            Distribution::Point => "TrivialSource",
            Distribution::Gaussian { size, divergence } => {
                args.insert("size".into(), vector_to_json(size));
                args.insert("divergence".into(), vector_to_json(divergence));
                args.insert("random_seed".into(), self.seed.into());
                "GaussianSource"
            }
        };

        member_to_args(&self.member, &mut args);
        typed(name, args)
    }
}

impl JsonDes for Source {
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        sources().build(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phoray::Member;

    #[test]
    fn test_defaults() {
        assert_eq!(Source::from_json(&json!({})).unwrap(), Source::default());

        let gaussian = Source::from_json(&json!({ "type": "GaussianSource" })).unwrap();
        assert_eq!(
            gaussian,
            Source::gaussian(Member::default(), 0.0, Vector::zeros(), Vector::zeros(), 0)
        );
    }

    #[test]
    fn test_gaussian() {
        let json = json!({
            "type": "GaussianSource",
            "args": {
                "wavelength": 5e-9,
                "size": [1e-5, 2e-5, 0.0],
                "divergence": { "y": 1e-3 },
                "random_seed": 42,
                "position": { "z": -1.0 },
            },
        });
        let source = Source::from_json(&json).unwrap();

        assert_eq!(source.wavelength, 5e-9);
        assert_eq!(source.seed, 42);
        assert_eq!(
            source.distribution,
            Distribution::Gaussian {
                size: Vector::new(1e-5, 2e-5, 0.0),
                divergence: Vector::new(0.0, 1e-3, 0.0),
            }
        );
        assert_eq!(Source::from_json(&source.to_json()).unwrap(), source);
        // same seed, same rays
        assert_eq!(Source::from_json(&json).unwrap().generate(10), source.generate(10));
    }

    #[test]
    fn test_negative_seed() {
        let json = json!({ "type": "GaussianSource", "args": { "random_seed": -1 } });
        assert!(matches!(
            Source::from_json(&json),
            Err(JsonError::InvalidArgument { expected: ParamKind::Integer, .. })
        ));
    }
}
