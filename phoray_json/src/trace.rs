use crate::*;
use phoray::{FootprintPoint, Ray, SourceTrace, Trace};

impl JsonSer for Ray {
    /// ```json
    /// {
    ///     "endpoint": { "x": 0.0, "y": 0.0, "z": 1.0 },
    ///     "direction": { "x": 0.0, "y": 1.0, "z": 0.0 },
    ///     "wavelength": 1e-9
    /// }
    /// ```
    ///
    /// A stopped ray has a zero direction.
    fn to_json(&self) -> Value {
        json!({
            "endpoint": vector_to_json(&self.endpoint.coords),
            "direction": vector_to_json(&self.direction),
            "wavelength": self.wavelength,
        })
    }
}

impl JsonSer for FootprintPoint {
    fn to_json(&self) -> Value {
        json!({ "x": self.x, "y": self.y, "wavelength": self.wavelength })
    }
}

impl JsonSer for SourceTrace {
    /// Stages are written frozen: a lost ray stays at the last point it
    /// reached, so every lane of every stage holds a ray.
    fn to_json(&self) -> Value {
        let stages = Vec::from_iter(self.frozen().iter().map(|stage| {
            Value::Array(Vec::from_iter(
                stage.iter().map(|ray| ray.map_or(Value::Null, Ray::to_json)),
            ))
        }));

        json!({
            "stages": stages,
            "footprints": self.footprints.to_json(),
        })
    }
}

impl JsonSer for Trace {
    fn to_json(&self) -> Value {
        json!({ "sources": self.sources.to_json() })
    }
}
