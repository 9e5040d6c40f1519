//! Wire formats for typed trees
//!
//! Two schema-driven writers share one field layout, so sibling record types
//! can never drift apart in how they serialize:
//! - JSON: `resourceType` first, fields in declaration order, absence omitted,
//!   choice variants under `<base><Type>` keys. Reading JSON is normalization.
//! - XML (write only): primitives in a `value` attribute, repeated elements for
//!   lists, namespace on the root element.
//!
//! ```rust
//! use tessera_format::{resource_from_str, to_json_string, to_xml_with, XmlOptions};
//!
//! let binary = resource_from_str(r#"{"resourceType": "Binary", "contentType": "image/png"}"#)?;
//! assert_eq!(
//!     to_json_string(&binary)?,
//!     r#"{"resourceType":"Binary","contentType":"image/png"}"#
//! );
//! assert_eq!(
//!     to_xml_with(&binary, &XmlOptions::compact())?,
//!     r#"<Binary xmlns="http://hl7.org/fhir"><contentType value="image/png"/></Binary>"#
//! );
//! # Ok::<(), tessera_format::FormatError>(())
//! ```

pub mod envelope;
pub mod error;
pub mod json;
mod layout;
pub mod xml;

pub use envelope::{
    Basic, Binary, CarePlan, Claim, Contract, Coverage, MedicationRequest, Observation, Patient,
    Resource, TypedResource,
};
pub use error::{FormatError, Result};
pub use json::{
    from_json, resource_from_json, resource_from_str, resource_to_json, to_json, to_json_string,
    to_json_string_pretty, JsonSerializer,
};
pub use xml::{datatype_to_xml, to_xml, to_xml_with, XmlOptions, XmlSerializer, FHIR_NS};
