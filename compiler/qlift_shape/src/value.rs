//! Runtime values carried by asynchronous sequences.

use std::sync::Arc;

use qlift_ir::{Idx, Name, Pool};

/// A runtime value. Cloning is cheap: strings and objects are shared.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    Object(Arc<Object>),
}

/// Instance of a class type.
#[derive(Debug, PartialEq)]
pub struct Object {
    pub class: Idx,
    pub fields: Vec<(Name, Value)>,
}

impl Value {
    /// Allocate an instance of `class`.
    pub fn object(class: Idx, fields: Vec<(Name, Value)>) -> Self {
        Value::Object(Arc::new(Object { class, fields }))
    }

    pub fn str(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }

    /// Dynamic type of the value; `Idx::NONE` for null.
    pub fn runtime_type(&self) -> Idx {
        match self {
            Value::Null => Idx::NONE,
            Value::Bool(_) => Idx::BOOL,
            Value::Int(_) => Idx::INT,
            Value::Float(_) => Idx::FLOAT,
            Value::Str(_) => Idx::STR,
            Value::Object(obj) => obj.class,
        }
    }

    /// Whether the value can be used as a `ty`. Null is an instance of every
    /// reference type.
    pub fn is_instance(&self, pool: &Pool, ty: Idx) -> bool {
        match self {
            Value::Null => pool.is_reference_type(ty),
            _ => pool.is_assignable(self.runtime_type(), ty),
        }
    }

    /// Field of an object value.
    pub fn field(&self, name: Name) -> Option<&Value> {
        match self {
            Value::Object(obj) => obj.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests;
