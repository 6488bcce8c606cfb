// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared helper functions for geometry processors.
//!
//! These functions parse the placement primitives (IfcAxis2Placement3D/2D,
//! IfcCartesianPoint, IfcDirection) used by processors, profiles and the router.

use crate::{Error, Point2, Point3, Result, Vector2, Vector3};
use ifc_lite_core::{DecodedEntity, EntityDecoder, IfcType};
use nalgebra::Matrix4;

/// Parse IfcAxis2Placement3D into transformation matrix
///
/// Handles Location, Axis (Z direction), and RefDirection (X direction).
/// Ensures orthogonal axes via Gram-Schmidt.
#[inline]
pub(crate) fn parse_axis2_placement_3d(
    placement: &DecodedEntity,
    decoder: &mut EntityDecoder,
) -> Result<Matrix4<f64>> {
    // IfcAxis2Placement3D: Location, Axis, RefDirection
    let location = match placement.get(0) {
        Some(attr) if !attr.is_null() => parse_cartesian_point(placement, decoder, 0)?,
        _ => Point3::origin(),
    };

    let z_axis = optional_direction(placement, 1, decoder)?.unwrap_or_else(Vector3::z);
    let x_axis = optional_direction(placement, 2, decoder)?.unwrap_or_else(Vector3::x);

    let z_axis_final = z_axis
        .try_normalize(1e-12)
        .unwrap_or_else(Vector3::z);

    // Project X onto the plane perpendicular to Z
    let x_axis_orthogonal = x_axis - z_axis_final * x_axis.dot(&z_axis_final);
    let x_axis_final = if x_axis_orthogonal.norm() > 1e-6 {
        x_axis_orthogonal.normalize()
    } else if z_axis_final.z.abs() < 0.9 {
        Vector3::z().cross(&z_axis_final).normalize()
    } else {
        Vector3::x().cross(&z_axis_final).normalize()
    };

    // Right-hand rule: Y = Z x X
    let y_axis = z_axis_final.cross(&x_axis_final).normalize();

    Ok(frame_matrix(&x_axis_final, &y_axis, &z_axis_final, &location))
}

/// Matrix whose columns are the given axes and origin
#[inline]
pub(crate) fn frame_matrix(
    x_axis: &Vector3<f64>,
    y_axis: &Vector3<f64>,
    z_axis: &Vector3<f64>,
    origin: &Point3<f64>,
) -> Matrix4<f64> {
    Matrix4::new(
        x_axis.x, y_axis.x, z_axis.x, origin.x,
        x_axis.y, y_axis.y, z_axis.y, origin.y,
        x_axis.z, y_axis.z, z_axis.z, origin.z,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Parse IfcAxis2Placement2D into (location, unit x axis)
///
/// Missing or null placements yield the identity placement.
pub(crate) fn parse_axis2_placement_2d(
    placement: Option<&DecodedEntity>,
    decoder: &mut EntityDecoder,
) -> Result<(Point2<f64>, Vector2<f64>)> {
    let Some(placement) = placement else {
        return Ok((Point2::origin(), Vector2::x()));
    };

    // IfcAxis2Placement2D: Location, RefDirection
    let location = match placement.get(0) {
        Some(attr) if !attr.is_null() => {
            let p = parse_cartesian_point(placement, decoder, 0)?;
            Point2::new(p.x, p.y)
        }
        _ => Point2::origin(),
    };

    let x_axis = optional_direction(placement, 1, decoder)?
        .and_then(|d| Vector2::new(d.x, d.y).try_normalize(1e-10))
        .unwrap_or_else(Vector2::x);

    Ok((location, x_axis))
}

/// Apply a 2D placement to a point
#[inline]
pub(crate) fn place_2d(point: &Point2<f64>, location: &Point2<f64>, x_axis: &Vector2<f64>) -> Point2<f64> {
    let y_axis = Vector2::new(-x_axis.y, x_axis.x);
    location + x_axis * point.x + y_axis * point.y
}

/// Parse IfcCartesianPoint from a parent entity at the given attribute index
#[inline]
pub(crate) fn parse_cartesian_point(
    parent: &DecodedEntity,
    decoder: &mut EntityDecoder,
    attr_index: usize,
) -> Result<Point3<f64>> {
    let point_attr = parent
        .get(attr_index)
        .ok_or_else(|| Error::geometry("Missing cartesian point"))?;

    let point_entity = decoder
        .resolve_ref(point_attr)?
        .ok_or_else(|| Error::geometry("Failed to resolve cartesian point"))?;

    cartesian_point(&point_entity)
}

/// Coordinates of an IfcCartesianPoint; missing components are 0
#[inline]
pub(crate) fn cartesian_point(point_entity: &DecodedEntity) -> Result<Point3<f64>> {
    if point_entity.ifc_type != IfcType::IfcCartesianPoint {
        return Err(Error::geometry(format!(
            "Expected IfcCartesianPoint, got {}",
            point_entity.ifc_type
        )));
    }

    let coords = point_entity
        .get_list(0)
        .ok_or_else(|| Error::geometry("IfcCartesianPoint missing coordinates"))?;

    let x = coords.first().and_then(|v| v.as_float()).unwrap_or(0.0);
    let y = coords.get(1).and_then(|v| v.as_float()).unwrap_or(0.0);
    let z = coords.get(2).and_then(|v| v.as_float()).unwrap_or(0.0);

    Ok(Point3::new(x, y, z))
}

/// Parse IfcDirection entity into a direction vector
#[inline]
pub(crate) fn parse_direction(direction_entity: &DecodedEntity) -> Result<Vector3<f64>> {
    if direction_entity.ifc_type != IfcType::IfcDirection {
        return Err(Error::geometry(format!(
            "Expected IfcDirection, got {}",
            direction_entity.ifc_type
        )));
    }

    let ratios = direction_entity
        .get_list(0)
        .ok_or_else(|| Error::geometry("IfcDirection missing ratios"))?;

    let x = ratios.first().and_then(|v| v.as_float()).unwrap_or(0.0);
    let y = ratios.get(1).and_then(|v| v.as_float()).unwrap_or(0.0);
    let z = ratios.get(2).and_then(|v| v.as_float()).unwrap_or(0.0);

    Ok(Vector3::new(x, y, z))
}

/// Direction referenced by attribute `index`, if present
pub(crate) fn optional_direction(
    entity: &DecodedEntity,
    index: usize,
    decoder: &mut EntityDecoder,
) -> Result<Option<Vector3<f64>>> {
    match entity.get(index) {
        Some(attr) if !attr.is_null() => match decoder.resolve_ref(attr)? {
            Some(direction) => Ok(Some(parse_direction(&direction)?)),
            None => Ok(None),
        },
        _ => Ok(None),
    }
}
