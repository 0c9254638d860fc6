//! JSON boundary for [`phoray`] systems.
//!
//! Every configurable object is written as
//!
//! ```json
//! { "type": "Sphere", "args": { "R": 2.0, "xsize": 0.1 } }
//! ```
//!
//! Arguments are declared, with a [`ParamKind`] and a default, by the
//! [`schemas`] of each type. Missing arguments take their default and a
//! missing `"type"` falls back to the default type of the category.

mod element;
mod error;
mod geometry;
mod registry;
mod schema;
mod source;
mod system;
mod trace;

pub use element::*;
pub use error::*;
pub use geometry::*;
pub use registry::*;
pub use schema::*;
pub use source::*;
pub use system::*;

pub use serde_json;

use core::ops::Deref;
use phoray::{OpticalSystem, Vector};
use phoray_shapes::Geometry;
use serde_json::{json, Map, Value};

pub trait JsonType {
    /// Returns a string, unique to the type, found in the `"type"` field of
    /// its JSON representation.
    fn json_type() -> String;
}

pub trait JsonSer {
    /// Serialize `self` into a JSON value.
    fn to_json(&self) -> Value;
}

pub trait JsonDes {
    /// Deserialize from a JSON value.
    ///
    /// Returns an error if `json`'s format or values are invalid.
    fn from_json(json: &Value) -> Result<Self, JsonError>
    where
        Self: Sized;
}

impl<T: JsonSer> JsonSer for [T] {
    fn to_json(&self) -> Value {
        Value::Array(Vec::from_iter(self.iter().map(T::to_json)))
    }
}

impl<T: JsonSer> JsonSer for Vec<T> {
    fn to_json(&self) -> Value {
        self.deref().to_json()
    }
}

impl<T: JsonSer + ?Sized> JsonSer for &T {
    fn to_json(&self) -> Value {
        (*self).to_json()
    }
}

impl<T: JsonDes> JsonDes for Vec<T> {
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        json.as_array()
            .ok_or_else(|| JsonError::Malformed("expected an array".into()))?
            .iter()
            .map(T::from_json)
            .collect()
    }
}

/// `{"x": .., "y": .., "z": ..}`
#[must_use]
pub fn vector_to_json(vector: &Vector) -> Value {
    json!({ "x": vector.x, "y": vector.y, "z": vector.z })
}

/// Reads a vector written as `{"x": .., "y": .., "z": ..}` or `[x, y, z]`.
/// Missing components of the object form are zero.
#[must_use]
pub fn json_to_vector(json: &Value) -> Option<Vector> {
    match json {
        Value::Object(map) => {
            if map.keys().any(|key| !matches!(key.as_str(), "x" | "y" | "z")) {
                return None;
            }
            let component = |key: &str| map.get(key).map_or(Some(0.0), Value::as_f64);
            Some(Vector::new(component("x")?, component("y")?, component("z")?))
        }
        Value::Array(array) => match array.as_slice() {
            [x, y, z] => Some(Vector::new(x.as_f64()?, y.as_f64()?, z.as_f64()?)),
            _ => None,
        },
        _ => None,
    }
}

/// `{"type": name, "args": args}`
#[must_use]
pub fn typed(name: impl Into<String>, args: Map<String, Value>) -> Value {
    json!({ "type": name.into(), "args": args })
}

/// Splits a typed object into its type name and its arguments.
pub(crate) fn untyped<'a>(json: &'a Value, default: &'a str) -> Result<(&'a str, Option<&'a Value>), JsonError> {
    let object = json
        .as_object()
        .ok_or_else(|| JsonError::Malformed(format!("expected a typed object, got {json}")))?;

    if let Some(key) = object.keys().find(|key| !matches!(key.as_str(), "type" | "args")) {
        return Err(JsonError::Malformed(format!("unexpected field {key:?} next to \"type\" and \"args\"")));
    }

    let name = match object.get("type") {
        None | Some(Value::Null) => default,
        Some(name) => name
            .as_str()
            .ok_or_else(|| JsonError::Malformed("type must be a string".into()))?,
    };

    Ok((name, object.get("args")))
}

/// Reads a whole system, as written by [`JsonSer::to_json`] or by hand.
pub fn load_system(reader: impl std::io::Read) -> Result<OpticalSystem<Geometry>, JsonError> {
    let json: Value = serde_json::from_reader(reader)?;
    OpticalSystem::from_json(&json)
}
