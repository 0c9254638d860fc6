use crate::*;
use core::fmt;
use phoray::{Float, Frame, Member};

/// The declared type of an argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Number,
    Integer,
    /// A number, or `null` for an unbounded length.
    Length,
    /// `{"x": .., "y": .., "z": ..}` or `[x, y, z]`
    Vector,
    /// A typed geometry object.
    Geometry,
    List,
}

impl ParamKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Length => "length",
            Self::Vector => "vector",
            Self::Geometry => "geometry",
            Self::List => "list",
        }
    }

    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Length => value.is_number() || value.is_null(),
            Self::Vector => json_to_vector(value).is_some(),
            Self::Geometry => value.is_object(),
            Self::List => value.is_array(),
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let article = if matches!(self, Self::Integer) { "an" } else { "a" };
        write!(f, "{article} {}", self.name())
    }
}

/// A declared argument of a configurable type.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: Value,
}

impl Param {
    #[must_use]
    pub fn new(name: &'static str, kind: ParamKind, default: impl Into<Value>) -> Self {
        Self {
            name,
            kind,
            default: default.into(),
        }
    }

    #[must_use]
    pub fn number(name: &'static str, default: Float) -> Self {
        Self::new(name, ParamKind::Number, default)
    }

    #[must_use]
    pub fn length(name: &'static str, default: Float) -> Self {
        Self::new(name, ParamKind::Length, default)
    }

    #[must_use]
    pub fn integer(name: &'static str, default: i64) -> Self {
        Self::new(name, ParamKind::Integer, default)
    }

    #[must_use]
    pub fn vector(name: &'static str) -> Self {
        Self::new(name, ParamKind::Vector, vector_to_json(&Vector::zeros()))
    }

    #[must_use]
    pub fn list(name: &'static str) -> Self {
        Self::new(name, ParamKind::List, Value::Array(Vec::new()))
    }
}

impl JsonSer for Param {
    fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "kind": self.kind.name(),
            "default": self.default,
        })
    }
}

static NULL: Value = Value::Null;

/// Arguments of one typed object, checked against its declared parameters.
#[derive(Clone, Debug)]
pub struct Args {
    owner: String,
    values: Map<String, Value>,
}

impl Args {
    /// Checks every argument in `json` (an object, or `null` for "all
    /// defaults") against `params`, and fills in the missing ones.
    pub fn parse(owner: &str, params: &[Param], json: Option<&Value>) -> Result<Self, JsonError> {
        let given = match json {
            None | Some(Value::Null) => None,
            Some(Value::Object(given)) => Some(given),
            Some(other) => {
                return Err(JsonError::Malformed(format!(
                    "arguments of {owner} must be an object, got {other}"
                )))
            }
        };

        let mut values: Map<String, Value> = params
            .iter()
            .map(|param| (param.name.to_owned(), param.default.clone()))
            .collect();

        for (name, value) in given.into_iter().flatten() {
            let param = params
                .iter()
                .find(|param| param.name == name)
                .ok_or_else(|| JsonError::UnknownArgument {
                    owner: owner.to_owned(),
                    name: name.clone(),
                })?;

            if !param.kind.accepts(value) {
                return Err(JsonError::InvalidArgument {
                    owner: owner.to_owned(),
                    name: name.clone(),
                    expected: param.kind,
                });
            }
            values.insert(name.clone(), value.clone());
        }

        Ok(Self {
            owner: owner.to_owned(),
            values,
        })
    }

    #[inline]
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn get(&self, name: &str) -> &Value {
        self.values.get(name).unwrap_or(&NULL)
    }

    fn invalid(&self, name: &str, expected: ParamKind) -> JsonError {
        JsonError::InvalidArgument {
            owner: self.owner.clone(),
            name: name.to_owned(),
            expected,
        }
    }

    pub fn number(&self, name: &str) -> Result<Float, JsonError> {
        self.get(name)
            .as_f64()
            .ok_or_else(|| self.invalid(name, ParamKind::Number))
    }

    /// `null` reads as an infinite length.
    pub fn length(&self, name: &str) -> Result<Float, JsonError> {
        match self.get(name) {
            Value::Null => Ok(Float::INFINITY),
            value => value.as_f64().ok_or_else(|| self.invalid(name, ParamKind::Length)),
        }
    }

    pub fn integer<T: TryFrom<i64>>(&self, name: &str) -> Result<T, JsonError> {
        self.get(name)
            .as_i64()
            .and_then(|value| T::try_from(value).ok())
            .ok_or_else(|| self.invalid(name, ParamKind::Integer))
    }

    pub fn vector(&self, name: &str) -> Result<Vector, JsonError> {
        json_to_vector(self.get(name)).ok_or_else(|| self.invalid(name, ParamKind::Vector))
    }

    pub fn list(&self, name: &str) -> Result<&[Value], JsonError> {
        self.get(name)
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.invalid(name, ParamKind::List))
    }

    /// A list of numbers.
    pub fn numbers(&self, name: &str) -> Result<Vec<Float>, JsonError> {
        self.list(name)?
            .iter()
            .map(|value| value.as_f64().ok_or_else(|| self.invalid(name, ParamKind::List)))
            .collect()
    }

    /// A list of typed objects of the same category.
    pub fn objects<T: JsonDes>(&self, name: &str) -> Result<Vec<T>, JsonError> {
        self.list(name)?.iter().map(T::from_json).collect()
    }
}

/// Parameters shared by everything placed through a [`Member`].
#[must_use]
pub fn member_params() -> Vec<Param> {
    vec![
        Param::vector("position"),
        Param::vector("rotation"),
        Param::vector("offset"),
        Param::vector("alignment"),
        Param::list("frames"),
    ]
}

fn frame_params() -> [Param; 2] {
    [Param::vector("position"), Param::vector("rotation")]
}

pub fn member_from_args(args: &Args) -> Result<Member, JsonError> {
    let parents = args
        .list("frames")?
        .iter()
        .map(|frame| {
            let frame = Args::parse("frame", &frame_params(), Some(frame))?;
            Ok(Frame::new(frame.vector("position")?, frame.vector("rotation")?))
        })
        .collect::<Result<_, JsonError>>()?;

    Ok(Member::with_parents(
        parents,
        Frame::new(args.vector("position")?, args.vector("rotation")?),
        Frame::new(args.vector("offset")?, args.vector("alignment")?),
    ))
}

pub fn member_to_args(member: &Member, args: &mut Map<String, Value>) {
    let frames = member
        .parents()
        .iter()
        .map(|frame| {
            json!({
                "position": vector_to_json(frame.position()),
                "rotation": vector_to_json(frame.rotation()),
            })
        })
        .collect();

    args.insert("position".into(), vector_to_json(member.position()));
    args.insert("rotation".into(), vector_to_json(member.rotation()));
    args.insert("offset".into(), vector_to_json(member.offset()));
    args.insert("alignment".into(), vector_to_json(member.alignment()));
    args.insert("frames".into(), Value::Array(frames));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use phoray::Point;

    fn params() -> Vec<Param> {
        vec![
            Param::length("R", 1.0),
            Param::integer("order", 0),
            Param::vector("position"),
        ]
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse("Thing", &params(), None).unwrap();
        assert_eq!(args.length("R").unwrap(), 1.0);
        assert_eq!(args.integer::<i32>("order").unwrap(), 0);
        assert_eq!(args.vector("position").unwrap(), Vector::zeros());
    }

    #[test]
    fn test_given() {
        let json = json!({ "R": null, "order": -2, "position": [1, 2, 3] });
        let args = Args::parse("Thing", &params(), Some(&json)).unwrap();
        assert_eq!(args.length("R").unwrap(), Float::INFINITY);
        assert_eq!(args.integer::<i32>("order").unwrap(), -2);
        assert!(args.integer::<u64>("order").is_err());
        assert_eq!(args.vector("position").unwrap(), Vector::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_unknown_argument() {
        let json = json!({ "radius": 1.0 });
        let error = Args::parse("Thing", &params(), Some(&json)).unwrap_err();
        assert!(matches!(error, JsonError::UnknownArgument { name, .. } if name == "radius"));
    }

    #[test]
    fn test_wrong_kind() {
        let json = json!({ "order": 1.5 });
        let error = Args::parse("Thing", &params(), Some(&json)).unwrap_err();
        assert!(matches!(
            error,
            JsonError::InvalidArgument { expected: ParamKind::Integer, .. }
        ));
        assert_eq!(
            Args::parse("Thing", &params(), Some(&json!({ "position": "up" })))
                .unwrap_err()
                .to_string(),
            "argument \"position\" of Thing must be a vector"
        );
    }

    #[test]
    fn test_member_args() {
        let json = json!({
            "position": { "z": 1.0 },
            "frames": [{ "position": { "x": 2.0 } }],
        });
        let args = Args::parse("Mirror", &member_params(), Some(&json)).unwrap();
        let member = member_from_args(&args).unwrap();
        assert_relative_eq!(member.globalize_point(&Point::origin()), Point::new(2.0, 0.0, 1.0));

        let mut written = Map::new();
        member_to_args(&member, &mut written);
        let again = Args::parse("Mirror", &member_params(), Some(&Value::Object(written))).unwrap();
        assert_eq!(member_from_args(&again).unwrap(), member);
    }

    #[test]
    fn test_bad_frame() {
        let json = json!({ "frames": [{ "angle": 1.0 }] });
        let args = Args::parse("Mirror", &member_params(), Some(&json)).unwrap();
        assert!(matches!(
            member_from_args(&args),
            Err(JsonError::UnknownArgument { owner, .. }) if owner == "frame"
        ));
    }
}
