//! Command surface: a named action with a fixed argument set.
//!
//! Transport is out of scope; whatever adapter receives the request builds
//! a [`Command`] and hands it to the application services, which map the
//! action name onto one aggregate operation (unknown names fail with
//! `UnrecognizedAction`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A transport-agnostic command: intent, not fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub action: String,
    #[serde(default)]
    pub arguments: Arguments,
}

impl Command {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            arguments: Arguments::default(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.arguments.0.insert(name.into(), value.into());
        self
    }
}

/// Loosely-typed argument bag with defaulting accessors.
///
/// Missing or mistyped arguments read as the type's zero value; the
/// aggregate operations are the ones validating emptiness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments(pub HashMap<String, JsonValue>);

impl Arguments {
    pub fn string(&self, name: &str) -> String {
        match self.0.get(name) {
            Some(JsonValue::String(s)) => s.clone(),
            Some(v) if !v.is_null() => v.to_string(),
            _ => String::new(),
        }
    }

    pub fn int(&self, name: &str) -> i64 {
        match self.0.get(name) {
            Some(JsonValue::Number(n)) => n.as_i64().unwrap_or(0),
            Some(JsonValue::String(s)) => s.parse().unwrap_or(0),
            _ => 0,
        }
    }

    pub fn bool(&self, name: &str) -> bool {
        match self.0.get(name) {
            Some(JsonValue::Bool(b)) => *b,
            Some(JsonValue::String(s)) => s == "true",
            _ => false,
        }
    }
}
