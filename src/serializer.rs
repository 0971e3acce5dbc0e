//! JSON rendering of generated instances.
//!
//! ```text
//! Resource{org.acme.Vehicle, vin:0731}
//!   → {"$class": "org.acme.Vehicle", "vin": "vin:0731", "owner": "resource:org.acme.Person#email:0042", ...}
//! ```
//!
//! Properties come out in declaration order; keys not in the declaration
//! follow, sorted. Null properties are omitted. Relationships render as
//! `resource:` URIs, date-times as RFC 3339.

use serde_json::{Map, Number, Value as Json};

use crate::model::*;
use crate::schema::Schema;
use crate::Result;

/// Key carrying the fully-qualified type of a resource or concept.
pub const CLASS_KEY: &str = "$class";

/// Render an instance as JSON.
pub fn to_json<S: Schema + ?Sized>(schema: &S, instance: &Instance) -> Result<Json> {
    match instance {
        Instance::Resource(r) => object_json(schema, &r.fully_qualified_type(), &r.properties),
        Instance::Concept(c) => object_json(schema, &c.fully_qualified_type(), &c.properties),
        Instance::Relationship(rel) => Ok(Json::String(rel.to_string())),
    }
}

/// Render an instance as pretty-printed JSON text.
pub fn to_json_string<S: Schema + ?Sized>(schema: &S, instance: &Instance) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_json(schema, instance)?)?)
}

fn object_json<S: Schema + ?Sized>(schema: &S, fqn: &str, props: &PropertyMap) -> Result<Json> {
    let decl = schema.get_type(fqn)?;
    let mut out = Map::new();
    out.insert(CLASS_KEY.to_owned(), Json::String(fqn.to_owned()));

    for property in decl.properties() {
        if let Some(value) = props.get(property.name()).filter(|v| !v.is_null()) {
            out.insert(property.name().to_owned(), value_json(schema, value)?);
        }
    }

    let mut extra: Vec<(&String, &Value)> = props
        .iter()
        .filter(|(k, v)| decl.property(k).is_none() && !v.is_null())
        .collect();
    extra.sort_by(|a, b| a.0.cmp(b.0));
    for (key, value) in extra {
        out.insert(key.clone(), value_json(schema, value)?);
    }

    Ok(Json::Object(out))
}

fn value_json<S: Schema + ?Sized>(schema: &S, value: &Value) -> Result<Json> {
    Ok(match value {
        Value::Null => Json::Null,
        Value::String(s) => Json::String(s.clone()),
        Value::Integer(i) => Json::from(*i),
        Value::Long(l) => Json::from(*l),
        Value::Double(d) => Number::from_f64(*d).map(Json::Number).unwrap_or(Json::Null),
        Value::Boolean(b) => Json::Bool(*b),
        Value::DateTime(dt) => Json::String(dt.to_rfc3339()),
        Value::List(items) => Json::Array(
            items
                .iter()
                .map(|v| value_json(schema, v))
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Concept(c) => object_json(schema, &c.fully_qualified_type(), &c.properties)?,
        Value::Resource(r) => object_json(schema, &r.fully_qualified_type(), &r.properties)?,
        Value::Relationship(rel) => Json::String(rel.to_string()),
    })
}
