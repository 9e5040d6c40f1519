//! Typed record trees
//!
//! This crate holds the in-memory form of records: primitives tagged with
//! their kind, complex nodes with fields in schema order, choice values and
//! resources. Untyped input ([`RawValue`], usually decoded JSON) becomes a
//! typed tree through the [`Normalizer`], which is driven entirely by the
//! schema registry in `tessera-schema`.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use tessera_models::{normalize_resource, Element};
//!
//! let resource = normalize_resource(json!({
//!     "resourceType": "Patient",
//!     "id": "p1",
//!     "name": {"family": "Lovelace", "given": "Ada"}
//! }))
//! .unwrap();
//!
//! assert_eq!(resource.id(), Some("p1"));
//! // Repeatable fields given one value become one-item lists.
//! let names = resource.get("name").and_then(Element::as_list).unwrap();
//! assert_eq!(names.len(), 1);
//! ```

pub mod error;
pub mod normalize;
pub mod raw;
pub mod resource;
pub mod value;

pub use error::{Error, Result};
pub use normalize::{
    normalize, normalize_resource, normalize_resource_as, ChoicePolicy, NormalizeOptions,
    Normalizer, UnknownFieldPolicy,
};
pub use raw::RawValue;
pub use resource::ResourceNode;
pub use value::{Choice, ChoiceEntry, ComplexNode, Element, Primitive, PrimitiveData};

pub use rust_decimal::Decimal;
pub use tessera_schema::PrimitiveKind;
