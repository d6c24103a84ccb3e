//! Parsing child specifications out of dynamic JSON.
//!
//! Tagged objects carry a `"$$typeof"` of `"element"`, `"coroutine"` or
//! `"yield"`. Arrays become lists. Anything else (including objects with an
//! unknown tag) is kept as an unrecognized shape rather than rejected, so a
//! host feeding arbitrary data still gets a result plus a diagnostic.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::ids::{ElementType, Key};
use crate::spec::{ChildSpec, CoroutineSpec, ElementSpec, PropValue, Props, YieldSpec};

const TYPEOF: &str = "$$typeof";

impl ChildSpec {
    /// Build a spec from a parsed JSON value.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::Empty),
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Number(n) => Ok(Self::Number(n.as_f64().unwrap_or(f64::NAN))),
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>>>()
                .map(Self::List),
            Value::Object(obj) => match obj.get(TYPEOF).and_then(Value::as_str) {
                Some("element") => Ok(Self::Element(ElementSpec {
                    element_type: required_type(obj, "type")?,
                    key: parse_key(obj)?,
                    props: parse_props(obj)?,
                })),
                Some("coroutine") => Ok(Self::Coroutine(CoroutineSpec {
                    handler: required_type(obj, "handler")?,
                    key: parse_key(obj)?,
                    props: parse_props(obj)?,
                })),
                Some("yield") => Ok(Self::Yield(YieldSpec {
                    continuation: required_type(obj, "continuation")?,
                    key: parse_key(obj)?,
                    props: parse_props(obj)?,
                })),
                _ => Ok(Self::Opaque(value.to_string())),
            },
        }
    }

    /// Parse JSON text, then build a spec from it.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| Error::InvalidSpec(e.to_string()))?;
        Self::from_json(&value)
    }
}

fn required_type(obj: &Map<String, Value>, field: &str) -> Result<ElementType> {
    match obj.get(field) {
        Some(Value::String(name)) => Ok(ElementType::new(name.as_str())),
        Some(other) => Err(Error::InvalidSpec(format!(
            "`{field}` must be a string, got {other}"
        ))),
        None => Err(Error::InvalidSpec(format!("missing `{field}`"))),
    }
}

fn parse_key(obj: &Map<String, Value>) -> Result<Option<Key>> {
    match obj.get("key") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(k)) => Ok(Some(Key::new(k.as_str()))),
        // Numeric keys are common in generated lists; they compare by their text.
        Some(Value::Number(n)) => Ok(Some(Key::new(n.to_string()))),
        Some(other) => Err(Error::InvalidSpec(format!(
            "`key` must be a string or number, got {other}"
        ))),
    }
}

fn parse_props(obj: &Map<String, Value>) -> Result<Props> {
    let fields = match obj.get("props") {
        None | Some(Value::Null) => return Ok(Props::new()),
        Some(Value::Object(fields)) => fields,
        Some(other) => {
            return Err(Error::InvalidSpec(format!(
                "`props` must be an object, got {other}"
            )))
        }
    };

    let mut props = Props::new();
    for (name, value) in fields {
        if name == "children" {
            props = props.with_children(ChildSpec::from_json(value)?);
            continue;
        }
        props.set(name.as_str(), prop_value(name, value)?);
    }
    Ok(props)
}

fn prop_value(name: &str, value: &Value) -> Result<PropValue> {
    match value {
        Value::Null => Ok(PropValue::Null),
        Value::Bool(b) => Ok(PropValue::Bool(*b)),
        Value::Number(n) => Ok(match n.as_i64() {
            Some(i) => PropValue::Int(i),
            None => PropValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        }),
        Value::String(s) => Ok(PropValue::Str(s.clone())),
        Value::Array(_) | Value::Object(_) => Err(Error::InvalidSpec(format!(
            "prop `{name}` must be a scalar"
        ))),
    }
}
