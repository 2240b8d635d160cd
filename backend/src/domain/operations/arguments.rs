//! Argument validation against an [`OperationSpec`].

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::{ArgType, OperationSpec};
use crate::domain::Error;

#[derive(Debug, Clone, PartialEq)]
enum ArgValue {
    Int(i32),
    String(String),
    Boolean(bool),
}

/// Arguments that passed validation, keyed by their declared name.
#[derive(Debug, Default)]
pub(super) struct Arguments {
    values: HashMap<&'static str, ArgValue>,
}

impl Arguments {
    /// Check `raw` against `spec`.
    ///
    /// Unknown names, missing required names, and wrongly typed values are
    /// rejected with `invalid_request` naming the field. `null` counts as
    /// absent.
    pub(super) fn validate(spec: &OperationSpec, raw: &Map<String, Value>) -> Result<Self, Error> {
        if let Some(unknown) = raw
            .keys()
            .find(|key| !spec.args.iter().any(|arg| arg.name == key.as_str()))
        {
            return Err(Error::invalid_field(
                unknown,
                format!("unknown argument '{unknown}' for operation '{}'", spec.name),
            ));
        }

        let mut values = HashMap::with_capacity(spec.args.len());
        for arg in spec.args {
            let value = match raw.get(arg.name) {
                None | Some(Value::Null) => {
                    if arg.required {
                        return Err(Error::invalid_field(
                            arg.name,
                            format!("missing required argument '{}'", arg.name),
                        ));
                    }
                    continue;
                }
                Some(value) => value,
            };
            values.insert(arg.name, coerce(arg.name, arg.ty, value)?);
        }
        Ok(Self { values })
    }

    pub(super) fn int(&self, name: &str) -> Result<i32, Error> {
        match self.values.get(name) {
            Some(ArgValue::Int(value)) => Ok(*value),
            _ => Err(missing(name)),
        }
    }

    pub(super) fn string(&self, name: &str) -> Result<String, Error> {
        match self.values.get(name) {
            Some(ArgValue::String(value)) => Ok(value.clone()),
            _ => Err(missing(name)),
        }
    }

    pub(super) fn opt_string(&self, name: &str) -> Option<String> {
        match self.values.get(name) {
            Some(ArgValue::String(value)) => Some(value.clone()),
            _ => None,
        }
    }

    pub(super) fn opt_boolean(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(ArgValue::Boolean(value)) => Some(*value),
            _ => None,
        }
    }
}

// Reaching this means the resolver asked for an argument its spec does not
// declare as required.
fn missing(name: &str) -> Error {
    Error::internal(format!("argument '{name}' was not validated"))
}

fn coerce(name: &str, ty: ArgType, value: &Value) -> Result<ArgValue, Error> {
    let wrong_type = || {
        Error::invalid_field(
            name,
            format!("argument '{name}' must be {}", ty.describe()),
        )
    };
    match ty {
        ArgType::Int => {
            let wide = value.as_i64().ok_or_else(wrong_type)?;
            i32::try_from(wide).map(ArgValue::Int).map_err(|_| {
                Error::invalid_field(
                    name,
                    format!("argument '{name}' must fit in a 32-bit signed integer"),
                )
            })
        }
        ArgType::String => value
            .as_str()
            .map(|text| ArgValue::String(text.to_owned()))
            .ok_or_else(wrong_type),
        ArgType::Boolean => value.as_bool().map(ArgValue::Boolean).ok_or_else(wrong_type),
    }
}
