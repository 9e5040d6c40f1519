//! Schema registry for typed record bindings
//!
//! Static, read-only description of every node type: its fields, their
//! cardinalities, and the variants of polymorphic (`value[x]`) choice fields.
//!
//! The shipped catalog (`catalog/core.json`) is loaded once into a
//! process-wide registry on first access:
//!
//! ```rust
//! use tessera_schema::{registry, PrimitiveKind, TypeRef};
//!
//! let observation = registry().resource("Observation").unwrap();
//! let value = observation.field("value").unwrap();
//! let group = value.choice_group().unwrap();
//! assert_eq!(
//!     group.variant_for_key("value", "valueString"),
//!     Some(&TypeRef::Primitive(PrimitiveKind::String))
//! );
//! ```

pub mod cardinality;
pub mod envelope;
pub mod error;
pub mod primitive;
pub mod registry;
pub mod types;

pub use cardinality::Cardinality;
pub use envelope::{envelope_fields, RESOURCE_TYPE_KEY};
pub use error::{Result, SchemaError};
pub use primitive::{JsonShape, PrimitiveKind};
pub use registry::{registry, RegistryBuilder, SchemaRegistry, CORE_CATALOG};
pub use types::{ChoiceGroup, FieldDef, FieldKind, TypeCategory, TypeDef, TypeRef};
