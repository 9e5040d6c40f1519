//! Typed tree
//!
//! The tree is strictly owned: every [`Element`] has exactly one parent, and
//! cross-record links are plain strings inside `Reference` nodes.

use crate::resource::ResourceNode;
use rust_decimal::Decimal;
use std::borrow::Cow;
use tessera_schema::PrimitiveKind;

/// Payload of a primitive value.
///
/// Decimals keep their scale, so `0.10` is written back as `0.10`.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveData {
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    Text(String),
}

/// A scalar tagged with its kind.
///
/// Construction never checks the kind's format grammar; that is an explicit,
/// separate validation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    kind: PrimitiveKind,
    data: PrimitiveData,
}

impl Primitive {
    pub fn new(kind: PrimitiveKind, data: PrimitiveData) -> Self {
        Self { kind, data }
    }

    pub fn text(kind: PrimitiveKind, value: impl Into<String>) -> Self {
        Self::new(kind, PrimitiveData::Text(value.into()))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::text(PrimitiveKind::String, value)
    }

    pub fn code(value: impl Into<String>) -> Self {
        Self::text(PrimitiveKind::Code, value)
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(PrimitiveKind::Boolean, PrimitiveData::Boolean(value))
    }

    pub fn integer(value: i64) -> Self {
        Self::new(PrimitiveKind::Integer, PrimitiveData::Integer(value))
    }

    pub fn decimal(value: Decimal) -> Self {
        Self::new(PrimitiveKind::Decimal, PrimitiveData::Decimal(value))
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn data(&self) -> &PrimitiveData {
        &self.data
    }

    pub fn into_data(self) -> PrimitiveData {
        self.data
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            PrimitiveData::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.data {
            PrimitiveData::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.data {
            PrimitiveData::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self.data {
            PrimitiveData::Decimal(d) => Some(d),
            _ => None,
        }
    }

    /// Canonical string form, as carried by the XML `value` attribute.
    pub fn lexical(&self) -> Cow<'_, str> {
        match &self.data {
            PrimitiveData::Boolean(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            PrimitiveData::Integer(i) => Cow::Owned(i.to_string()),
            PrimitiveData::Decimal(d) => Cow::Owned(d.to_string()),
            PrimitiveData::Text(s) => Cow::Borrowed(s),
        }
    }
}

/// Complex value: a type name plus its fields.
///
/// The normalizer stores fields in schema-declared order; builders append in
/// call order. Writers always emit schema order, and equality ignores field
/// order.
#[derive(Debug, Clone)]
pub struct ComplexNode {
    type_name: String,
    fields: Vec<(String, Element)>,
}

impl ComplexNode {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Element>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a field, replacing any previous value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Element>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Element> {
        let idx = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(idx).1)
    }

    pub fn get(&self, name: &str) -> Option<&Element> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Element)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Shortcut for a primitive text field (`reference`, `status`, ...).
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_primitive()?.as_str()
    }

    pub(crate) fn push(&mut self, name: String, value: Element) {
        self.fields.push((name, value));
    }
}

impl PartialEq for ComplexNode {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

/// One set variant of a choice field.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceEntry {
    /// Type code of the variant (`string`, `Quantity`, ...).
    pub type_code: String,
    pub value: Element,
}

/// Value of a choice (`value[x]`) field.
///
/// Holds every variant present in the input, in declaration order. Well-formed
/// values hold exactly one; more than one is representable so that
/// exclusivity can be checked on demand instead of at construction.
/// Equality ignores the order variants were added in.
#[derive(Debug, Clone, Default)]
pub struct Choice {
    entries: Vec<ChoiceEntry>,
}

impl PartialEq for Choice {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|e| other.get(&e.type_code) == Some(&e.value))
    }
}

impl Choice {
    pub fn new(type_code: impl Into<String>, value: impl Into<Element>) -> Self {
        Self::default().with(type_code, value)
    }

    pub fn with(mut self, type_code: impl Into<String>, value: impl Into<Element>) -> Self {
        self.entries.push(ChoiceEntry {
            type_code: type_code.into(),
            value: value.into(),
        });
        self
    }

    pub(crate) fn from_entries(entries: Vec<ChoiceEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ChoiceEntry] {
        &self.entries
    }

    /// The set variant, when exactly one is set.
    pub fn selected(&self) -> Option<&ChoiceEntry> {
        match self.entries.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn get(&self, type_code: &str) -> Option<&Element> {
        self.entries
            .iter()
            .find(|e| e.type_code == type_code)
            .map(|e| &e.value)
    }

    pub fn is_exclusive(&self) -> bool {
        self.entries.len() <= 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn type_codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.type_code.as_str())
    }
}

/// Any value in the typed tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Primitive(Primitive),
    Complex(ComplexNode),
    Resource(Box<ResourceNode>),
    /// Items of a repeatable field; never empty when built by the normalizer.
    List(Vec<Element>),
    Choice(Choice),
}

impl Element {
    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Self::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_complex(&self) -> Option<&ComplexNode> {
        match self {
            Self::Complex(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&ResourceNode> {
        match self {
            Self::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Element]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&Choice> {
        match self {
            Self::Choice(choice) => Some(choice),
            _ => None,
        }
    }

    /// Items of a list, or the element itself as a one-item slice.
    pub fn items(&self) -> &[Element] {
        match self {
            Self::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Primitive(p) => p.kind().name().to_string(),
            Self::Complex(node) => node.type_name().to_string(),
            Self::Resource(resource) => resource.resource_type().to_string(),
            Self::List(_) => "list".to_string(),
            Self::Choice(_) => "choice".to_string(),
        }
    }
}

impl From<Primitive> for Element {
    fn from(value: Primitive) -> Self {
        Self::Primitive(value)
    }
}

impl From<ComplexNode> for Element {
    fn from(value: ComplexNode) -> Self {
        Self::Complex(value)
    }
}

impl From<ResourceNode> for Element {
    fn from(value: ResourceNode) -> Self {
        Self::Resource(Box::new(value))
    }
}

impl From<Choice> for Element {
    fn from(value: Choice) -> Self {
        Self::Choice(value)
    }
}

impl<T: Into<Element>> From<Vec<T>> for Element {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}
