// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Lite Materials
//!
//! Material resolution and quantity aggregation over a loaded IFC model.
//!
//! ## Overview
//!
//! - **Model store**: one file indexed once, shared read-only
//! - **Resolver**: single material, material list or layer set usage
//! - **Layers**: per-layer material names and summed thickness
//! - **Quantities**: surface area and volume from the element's mesh
//! - **Aggregation**: counts and volume for a named material
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_lite_materials::{retrieve_elements_by_material, IfcModel};
//!
//! let model = IfcModel::open("institute.ifc")?;
//! let report = retrieve_elements_by_material(&model, "Concrete")?;
//! println!("{} elements, {:.3} m3", report.total_elements, report.total_material_volume);
//! ```

pub mod aggregate;
pub mod error;
pub mod layers;
pub mod model;
pub mod quantities;
pub mod resolver;

pub use aggregate::{retrieve_elements_by_material, ElementRecord, MaterialAggregator, MaterialReport};
pub use error::{Error, Result};
pub use layers::{extract_layers, LayerEntry, LayerSummary};
pub use model::{ElementRef, IfcModel, ModelSummary};
pub use quantities::{area_or_zero, volume_or_zero, QuantityCalculator, ShapeProperties};
pub use resolver::{Material, MaterialAssociation, MaterialLayer, MaterialResolver};
pub use ifc_lite_geometry::GeometrySettings;
