//! Untyped normalizer input
//!
//! Raw input is decoded data (objects, arrays, scalars) that may embed
//! already-typed nodes anywhere in the tree.

use crate::resource::ResourceNode;
use crate::value::{Choice, ComplexNode, Element, Primitive, PrimitiveData};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<RawValue>),
    Object(BTreeMap<String, RawValue>),
    /// A pre-built node, passed through unchanged when its type matches.
    Typed(Element),
}

impl RawValue {
    pub fn object<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<RawValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// `null` and `[]` both mean "field not present".
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Array(items) => items.is_empty(),
            Self::Typed(Element::List(items)) => items.is_empty(),
            Self::Typed(Element::Choice(choice)) => choice.is_empty(),
            _ => false,
        }
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(_) => "boolean".to_string(),
            Self::Number(_) => "number".to_string(),
            Self::String(_) => "string".to_string(),
            Self::Array(_) => "array".to_string(),
            Self::Object(_) => "object".to_string(),
            Self::Typed(element) => format!("typed {}", element.describe()),
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<PrimitiveData> for RawValue {
    fn from(data: PrimitiveData) -> Self {
        match data {
            PrimitiveData::Boolean(b) => Self::Bool(b),
            PrimitiveData::Integer(i) => Self::Number(i.into()),
            PrimitiveData::Decimal(d) => {
                let text = d.to_string();
                match text.parse::<Number>() {
                    Ok(n) => Self::Number(n),
                    Err(_) => Self::String(text),
                }
            }
            PrimitiveData::Text(s) => Self::String(s),
        }
    }
}

impl From<Element> for RawValue {
    fn from(element: Element) -> Self {
        Self::Typed(element)
    }
}

impl From<Primitive> for RawValue {
    fn from(value: Primitive) -> Self {
        Self::Typed(value.into())
    }
}

impl From<ComplexNode> for RawValue {
    fn from(value: ComplexNode) -> Self {
        Self::Typed(value.into())
    }
}

impl From<ResourceNode> for RawValue {
    fn from(value: ResourceNode) -> Self {
        Self::Typed(value.into())
    }
}

impl From<Choice> for RawValue {
    fn from(value: Choice) -> Self {
        Self::Typed(value.into())
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}
