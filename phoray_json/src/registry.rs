use crate::*;
use std::collections::HashMap;

/// Builds one type of object from its checked arguments.
pub type Constructor<T> = fn(&Args) -> Result<T, JsonError>;

/// A named, configurable type.
pub struct Kind<T> {
    pub params: fn() -> Vec<Param>,
    pub build: Constructor<T>,
}

/// Every type of one category (geometries, elements...), by name.
pub struct Registry<T> {
    category: &'static str,
    default: &'static str,
    kinds: HashMap<String, Kind<T>>,
    aliases: HashMap<String, String>,
}

impl<T> Registry<T> {
    pub(crate) fn new(category: &'static str, default: &'static str) -> Self {
        Self {
            category,
            default,
            kinds: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    pub(crate) fn with(mut self, name: impl Into<String>, params: fn() -> Vec<Param>, build: Constructor<T>) -> Self {
        self.kinds.insert(name.into(), Kind { params, build });
        self
    }

    pub(crate) fn alias(mut self, alias: &str, name: &str) -> Self {
        self.aliases.insert(alias.into(), name.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn category(&self) -> &'static str {
        self.category
    }

    /// The type used when an object has no `"type"` field.
    #[inline]
    #[must_use]
    pub fn default_type(&self) -> &'static str {
        self.default
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Kind<T>> {
        let name = self.aliases.get(name).map_or(name, String::as_str);
        self.kinds.get(name)
    }

    /// Names of the registered types, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names = Vec::from_iter(self.kinds.keys().map(String::as_str));
        names.sort_unstable();
        names
    }

    /// Reads a typed object of this category.
    pub fn build(&self, json: &Value) -> Result<T, JsonError> {
        let (name, args) = untyped(json, self.default)?;

        let kind = self.get(name).ok_or_else(|| JsonError::UnknownType {
            category: self.category,
            name: name.to_owned(),
        })?;

        let args = Args::parse(name, &(kind.params)(), args)?;
        log::trace!("building {} {name}", self.category);
        (kind.build)(&args)
    }

    fn schemas(&self) -> impl Iterator<Item = TypeSchema> + '_ {
        self.names().into_iter().filter_map(|name| {
            let kind = self.kinds.get(name)?;
            Some(TypeSchema {
                category: self.category,
                name: name.to_owned(),
                params: (kind.params)(),
            })
        })
    }
}

/// The declared parameters of one registered type.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeSchema {
    pub category: &'static str,
    pub name: String,
    pub params: Vec<Param>,
}

impl JsonSer for TypeSchema {
    fn to_json(&self) -> Value {
        json!({
            "category": self.category,
            "name": self.name,
            "params": self.params.to_json(),
        })
    }
}

/// Every registered type, category by category, with its parameters in
/// declaration order.
#[must_use]
pub fn schemas() -> Vec<TypeSchema> {
    let mut schemas = Vec::new();
    schemas.extend(geometries().schemas());
    schemas.extend(elements().schemas());
    schemas.extend(sources().schemas());
    schemas.extend(systems().schemas());
    schemas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_its_default() {
        assert!(geometries().get(geometries().default_type()).is_some());
        assert!(elements().get(elements().default_type()).is_some());
        assert!(sources().get(sources().default_type()).is_some());
        assert!(systems().get(systems().default_type()).is_some());
    }

    #[test]
    fn test_schemas() {
        let schemas = schemas();
        let find = |category: &str, name: &str| {
            schemas
                .iter()
                .find(|schema| schema.category == category && schema.name == name)
        };

        let sphere = find("geometry", "Sphere").unwrap();
        let names = Vec::from_iter(sphere.params.iter().map(|param| param.name));
        assert_eq!(names, ["R", "xsize", "ysize"]);
        assert_eq!(sphere.params[0].kind, ParamKind::Length);
        assert_eq!(sphere.params[0].default, json!(1.0));

        let grating = find("element", "Grating").unwrap();
        assert_eq!(grating.params[0].kind, ParamKind::Geometry);
        assert!(grating.params.iter().any(|param| param.name == "order" && param.kind == ParamKind::Integer));

        assert!(find("source", "GaussianSource").is_some());
        assert!(find("system", "RowlandSpectrometer").is_some());
        // aliases are not listed
        assert!(find("system", "Sequential").is_none());
        assert!(systems().get("Sequential").is_some());
    }

    #[test]
    fn test_unknown_type() {
        let error = geometries().build(&json!({ "type": "Torus" })).unwrap_err();
        assert_eq!(error.to_string(), "unknown geometry type \"Torus\"");
    }
}
