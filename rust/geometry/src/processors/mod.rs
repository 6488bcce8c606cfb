// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry Processors
//!
//! Each sub-module handles a category of representation items:
//!
//! - `extrusion`: ExtrudedAreaSolid (most common - extruded profiles)
//! - `tessellated`: TriangulatedFaceSet, PolygonalFaceSet (pre-tessellated meshes)
//! - `brep`: FacetedBrep (boundary representations)
//! - `boolean`: BooleanResult, BooleanClippingResult (half-space clipping)
//! - `helpers`: Shared parse functions used by processors, profiles and the router
//!
//! MappedItem instancing lives in the router, which owns the per-map cache.

pub(crate) mod helpers;
mod boolean;
mod brep;
mod extrusion;
mod tessellated;

pub use boolean::BooleanClippingProcessor;
pub use brep::FacetedBrepProcessor;
pub use extrusion::ExtrudedAreaSolidProcessor;
pub use tessellated::{PolygonalFaceSetProcessor, TriangulatedFaceSetProcessor};
