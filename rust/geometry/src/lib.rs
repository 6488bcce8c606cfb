// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Lite Geometry Processing
//!
//! Turns IFC body representations into closed triangle meshes and measures
//! them. Profiles are triangulated with earcutr and transformations use
//! nalgebra. Half-space booleans clip by plane with capping; openings are cut
//! out with csgrs.
//!
//! ```ignore
//! let router = GeometryRouter::with_settings(GeometrySettings::precise(), 0.001);
//! let mesh = router.process_element(&wall, &mut decoder)?;
//! println!("{} m3", mesh.volume());
//! ```

pub mod clipping;
pub mod csg;
pub mod error;
pub mod extrusion;
pub mod mesh;
pub mod processors;
pub mod profile;
pub mod profiles;
pub mod router;
pub mod settings;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point2, Point3, Vector2, Vector3};

pub use clipping::{ClippingProcessor, Plane, Triangle};
pub use csg::subtract_mesh;
pub use error::{Error, Result};
pub use extrusion::extrude_profile;
pub use mesh::Mesh;
pub use processors::{
    BooleanClippingProcessor, ExtrudedAreaSolidProcessor, FacetedBrepProcessor,
    PolygonalFaceSetProcessor, TriangulatedFaceSetProcessor,
};
pub use profile::Profile2D;
pub use profiles::ProfileProcessor;
pub use router::{GeometryProcessor, GeometryRouter};
pub use settings::GeometrySettings;
pub use triangulation::{triangulate_face, triangulate_polygon};
