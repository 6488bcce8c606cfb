// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement and transformation: local placement chains and mapping operators.

use super::GeometryRouter;
use crate::processors::helpers::{
    cartesian_point, frame_matrix, optional_direction, parse_axis2_placement_3d,
};
use crate::{Mesh, Point3, Result, Vector3};
use ifc_lite_core::{DecodedEntity, EntityDecoder, IfcType};
use nalgebra::Matrix4;

impl GeometryRouter {
    const MAX_PLACEMENT_DEPTH: usize = 100;

    /// Apply the element's ObjectPlacement (attribute 5) to its mesh
    pub(super) fn apply_placement(
        &self,
        element: &DecodedEntity,
        decoder: &mut EntityDecoder,
        mesh: &mut Mesh,
    ) -> Result<()> {
        let transform = self.get_placement_transform_from_element(element, decoder)?;
        if transform != Matrix4::identity() {
            mesh.transform(&transform);
        }
        Ok(())
    }

    /// Get placement transform from element without applying it
    pub(super) fn get_placement_transform_from_element(
        &self,
        element: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Matrix4<f64>> {
        // IfcProduct: ObjectPlacement (attribute 5)
        let placement = match element.get(5) {
            Some(attr) if !attr.is_null() => decoder.resolve_ref(attr)?,
            _ => None,
        };

        match placement {
            Some(placement) => self.get_placement_transform(&placement, decoder, 0),
            None => Ok(Matrix4::identity()),
        }
    }

    /// Recursively resolve placement hierarchy: parent * local
    ///
    /// Chains deeper than the depth limit (circular references) stop at identity.
    fn get_placement_transform(
        &self,
        placement: &DecodedEntity,
        decoder: &mut EntityDecoder,
        depth: usize,
    ) -> Result<Matrix4<f64>> {
        if depth > Self::MAX_PLACEMENT_DEPTH || placement.ifc_type != IfcType::IfcLocalPlacement {
            return Ok(Matrix4::identity());
        }

        // IfcLocalPlacement: PlacementRelTo, RelativePlacement
        let parent_transform = match placement.get_ref(0) {
            Some(parent_id) => {
                let parent = decoder.decode_by_id(parent_id)?;
                self.get_placement_transform(&parent, decoder, depth + 1)?
            }
            None => Matrix4::identity(),
        };

        let local_transform = match placement.get_ref(1) {
            Some(rel_id) => {
                let rel = decoder.decode_by_id(rel_id)?;
                if rel.ifc_type == IfcType::IfcAxis2Placement3D {
                    parse_axis2_placement_3d(&rel, decoder)?
                } else {
                    Matrix4::identity()
                }
            }
            None => Matrix4::identity(),
        };

        Ok(parent_transform * local_transform)
    }

    /// Parse IfcCartesianTransformationOperator3D (and the nonUniform variant)
    /// Used for MappedItem MappingTarget transformation
    pub(super) fn parse_cartesian_transformation_operator(
        &self,
        entity: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Matrix4<f64>> {
        // IfcCartesianTransformationOperator3D:
        // 0: Axis1 (X direction, optional)
        // 1: Axis2 (Y direction, optional)
        // 2: LocalOrigin
        // 3: Scale (optional, defaults to 1.0)
        // 4: Axis3 (Z direction, optional)
        // nonUniform adds 5: Scale2, 6: Scale3
        let origin = match entity.get_ref(2) {
            Some(id) => cartesian_point(&decoder.decode_by_id(id)?)?,
            None => Point3::origin(),
        };

        let scale = entity.get_float(3).unwrap_or(1.0);
        let (scale_y, scale_z) = if entity.ifc_type == IfcType::IfcCartesianTransformationOperator3DnonUniform {
            (
                entity.get_float(5).unwrap_or(scale),
                entity.get_float(6).unwrap_or(scale),
            )
        } else {
            (scale, scale)
        };

        let x_axis = optional_direction(entity, 0, decoder)?
            .and_then(|v| v.try_normalize(1e-12))
            .unwrap_or_else(Vector3::x);
        let z_axis = optional_direction(entity, 4, decoder)?
            .and_then(|v| v.try_normalize(1e-12))
            .unwrap_or_else(Vector3::z);

        // Right-handed frame from Axis3 and Axis1
        let y_axis = z_axis.cross(&x_axis).normalize();
        let x_axis = y_axis.cross(&z_axis).normalize();

        Ok(frame_matrix(
            &(x_axis * scale),
            &(y_axis * scale_y),
            &(z_axis * scale_z),
            &origin,
        ))
    }
}
