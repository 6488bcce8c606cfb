// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Lite Core Parser
//!
//! STEP/IFC parser built with [nom](https://docs.rs/nom), used by the material
//! reporting service to read a building model once and decode entities on demand.
//!
//! ## Overview
//!
//! - **STEP Tokenization**: Parsing of STEP entity lines into tokens
//! - **Entity Indexing**: [memchr](https://docs.rs/memchr)-accelerated `#id -> byte span` index
//! - **Lazy Decoding**: On-demand attribute parsing with a per-decoder cache
//! - **String Decoding**: STEP `\X2\`, `\X\`, `\S\` escapes turned into UTF-8
//! - **Units**: Project length unit detection
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_lite_core::{build_entity_index, EntityDecoder, IfcType};
//!
//! let content = "#1=IFCMATERIAL('Concrete');\n#2=IFCWALL('guid',$,'Wall',$,$,$,$,$);";
//! let index = build_entity_index(content);
//! let mut decoder = EntityDecoder::with_index(content, index);
//!
//! let material = decoder.decode_by_id(1)?;
//! assert_eq!(material.ifc_type, IfcType::IfcMaterial);
//! assert_eq!(material.get_string(0), Some("Concrete"));
//! ```

pub mod decoder;
pub mod error;
pub mod parser;
pub mod schema;
pub mod schema_gen;
pub mod units;

pub use decoder::{build_entity_index, EntityDecoder, EntityIndex};
pub use error::{Error, Result};
pub use parser::{decode_step_string, parse_entity, EntityScanner, Token};
pub use schema::IfcType;
pub use schema_gen::{AttributeValue, DecodedEntity, GeometryCategory, IfcSchema, ProfileCategory};
pub use units::{extract_length_unit_scale, get_si_prefix_multiplier};
