//! Codec for SANDRE Hydrometrie v1.1 XML messages
//!
//! ## Architecture
//!
//! - [`story`] - Ordered tag descriptors and the recursive element writer
//! - [`to_xml`] - Document skeleton and one story function per entity
//! - [`from_xml`] - Tree walker instantiating domain records from a parsed document
//! - [`tags`] - Element names shared by both directions
//!
//! Documents carry no namespace. Child order is fixed, so a document
//! produced here and parsed back serializes to the same bytes.
//!
//! ## Usage
//!
//! ```rust
//! use hydrometrie::app::services::xml_codec::{parse_str, to_xml, Payload};
//! use hydrometrie::Sitehydro;
//!
//! let sites = vec![Sitehydro::new("A1234567")?.with_libelle("La Seine à Paris")];
//! let xml = to_xml(&Payload { siteshydro: &sites, ..Payload::default() })?;
//! let document = parse_str(&xml)?;
//! assert_eq!(document.siteshydro.as_deref(), Some(sites.as_slice()));
//! assert!(document.scenario.is_none());
//! # Ok::<(), hydrometrie::Error>(())
//! ```

pub mod from_xml;
pub mod story;
pub mod tags;
pub mod to_xml;

#[cfg(test)]
pub mod tests;

pub use from_xml::{parse_bytes, parse_file, parse_reader, parse_str, XmlDocument};
pub use story::{Content, Descriptor, Story, XmlValue};
pub use to_xml::{build_document, to_xml, Payload};
