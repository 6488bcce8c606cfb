// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Profile Processors - Handle all IFC profile types
//!
//! Dynamic profile processing for parametric, arbitrary, and composite profiles.

use crate::processors::helpers::{cartesian_point, parse_axis2_placement_2d, place_2d};
use crate::profile::{circle_points, Profile2D};
use crate::settings::GeometrySettings;
use crate::{Error, Point2, Result, Vector2};
use ifc_lite_core::{AttributeValue, DecodedEntity, EntityDecoder, IfcSchema, IfcType, ProfileCategory};
use std::f64::consts::TAU;

/// Profile processor - processes IFC profiles into 2D contours
pub struct ProfileProcessor {
    schema: IfcSchema,
    settings: GeometrySettings,
}

impl ProfileProcessor {
    /// Create new profile processor
    pub fn new(schema: IfcSchema) -> Self {
        Self::with_settings(schema, GeometrySettings::default())
    }

    /// Create profile processor with explicit tessellation settings
    pub fn with_settings(schema: IfcSchema, settings: GeometrySettings) -> Self {
        Self { schema, settings }
    }

    /// Process a single-area IFC profile definition
    ///
    /// Composite profiles are merged into one profile; use [`Self::process_parts`]
    /// to keep their areas separate.
    pub fn process(
        &self,
        profile: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Profile2D> {
        let mut parts = self.process_parts(profile, decoder)?;
        match parts.len() {
            0 => Err(Error::InvalidProfile(format!("#{} has no area", profile.id))),
            1 => Ok(parts.remove(0)),
            _ => {
                let mut first = parts.remove(0);
                for part in parts {
                    first.add_hole(part.outer);
                }
                Ok(first)
            }
        }
    }

    /// Process any IFC profile definition into its disjoint areas
    pub fn process_parts(
        &self,
        profile: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Vec<Profile2D>> {
        match self.schema.profile_category(&profile.ifc_type) {
            Some(ProfileCategory::Parametric) => Ok(vec![self.process_parametric(profile, decoder)?]),
            Some(ProfileCategory::Arbitrary) => Ok(vec![self.process_arbitrary(profile, decoder)?]),
            Some(ProfileCategory::Composite) => self.process_composite(profile, decoder),
            None => Err(Error::Unsupported(format!(
                "profile type {}",
                profile.ifc_type
            ))),
        }
    }

    /// Process parametric profiles (rectangle, circle, I-shape, etc.)
    fn process_parametric(
        &self,
        profile: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Profile2D> {
        let mut base_profile = match profile.ifc_type {
            IfcType::IfcRectangleProfileDef => self.process_rectangle(profile),
            IfcType::IfcCircleProfileDef => self.process_circle(profile),
            IfcType::IfcEllipseProfileDef => self.process_ellipse(profile),
            IfcType::IfcCircleHollowProfileDef => self.process_circle_hollow(profile),
            IfcType::IfcRectangleHollowProfileDef => self.process_rectangle_hollow(profile),
            IfcType::IfcIShapeProfileDef => self.process_i_shape(profile),
            IfcType::IfcLShapeProfileDef => self.process_l_shape(profile),
            IfcType::IfcUShapeProfileDef => self.process_u_shape(profile),
            IfcType::IfcTShapeProfileDef => self.process_t_shape(profile),
            _ => Err(Error::Unsupported(format!(
                "parametric profile {}",
                profile.ifc_type
            ))),
        }?;

        // Position (attribute 2: IfcAxis2Placement2D)
        let position = match profile.get(2) {
            Some(attr) if !attr.is_null() => decoder.resolve_ref(attr)?,
            _ => None,
        };
        if let Some(position) = position.filter(|p| p.ifc_type == IfcType::IfcAxis2Placement2D) {
            let (location, x_axis) = parse_axis2_placement_2d(Some(&position), decoder)?;
            apply_profile_position(&mut base_profile, &location, &x_axis);
        }

        Ok(base_profile)
    }

    /// IfcRectangleProfileDef: ProfileType, ProfileName, Position, XDim, YDim
    fn process_rectangle(&self, profile: &DecodedEntity) -> Result<Profile2D> {
        let x_dim = required_dim(profile, 3, "Rectangle XDim")?;
        let y_dim = required_dim(profile, 4, "Rectangle YDim")?;

        Ok(Profile2D::new(centered_rectangle(x_dim / 2.0, y_dim / 2.0)))
    }

    /// IfcCircleProfileDef: ProfileType, ProfileName, Position, Radius
    fn process_circle(&self, profile: &DecodedEntity) -> Result<Profile2D> {
        let radius = required_dim(profile, 3, "Circle Radius")?;
        Ok(Profile2D::new(circle_points(radius, self.settings.circle_segments)))
    }

    /// IfcEllipseProfileDef: ProfileType, ProfileName, Position, SemiAxis1, SemiAxis2
    fn process_ellipse(&self, profile: &DecodedEntity) -> Result<Profile2D> {
        let semi_axis1 = required_dim(profile, 3, "Ellipse SemiAxis1")?;
        let semi_axis2 = required_dim(profile, 4, "Ellipse SemiAxis2")?;

        let segments = self.settings.circle_segments;
        let points = (0..segments)
            .map(|i| {
                let angle = TAU * (i as f64) / (segments as f64);
                Point2::new(semi_axis1 * angle.cos(), semi_axis2 * angle.sin())
            })
            .collect();
        Ok(Profile2D::new(points))
    }

    /// IfcIShapeProfileDef: ProfileType, ProfileName, Position, OverallWidth, OverallDepth, WebThickness, FlangeThickness, ...
    fn process_i_shape(&self, profile: &DecodedEntity) -> Result<Profile2D> {
        let overall_width = required_dim(profile, 3, "I-Shape OverallWidth")?;
        let overall_depth = required_dim(profile, 4, "I-Shape OverallDepth")?;
        let web_thickness = required_dim(profile, 5, "I-Shape WebThickness")?;
        let flange_thickness = required_dim(profile, 6, "I-Shape FlangeThickness")?;

        let half_width = overall_width / 2.0;
        let half_depth = overall_depth / 2.0;
        let half_web = web_thickness / 2.0;

        let points = vec![
            // Bottom flange
            Point2::new(-half_width, -half_depth),
            Point2::new(half_width, -half_depth),
            Point2::new(half_width, -half_depth + flange_thickness),
            // Right side of web
            Point2::new(half_web, -half_depth + flange_thickness),
            Point2::new(half_web, half_depth - flange_thickness),
            // Top flange
            Point2::new(half_width, half_depth - flange_thickness),
            Point2::new(half_width, half_depth),
            Point2::new(-half_width, half_depth),
            Point2::new(-half_width, half_depth - flange_thickness),
            // Left side of web
            Point2::new(-half_web, half_depth - flange_thickness),
            Point2::new(-half_web, -half_depth + flange_thickness),
            Point2::new(-half_width, -half_depth + flange_thickness),
        ];

        Ok(Profile2D::new(points))
    }

    /// IfcCircleHollowProfileDef: ProfileType, ProfileName, Position, Radius, WallThickness
    fn process_circle_hollow(&self, profile: &DecodedEntity) -> Result<Profile2D> {
        let radius = required_dim(profile, 3, "CircleHollow Radius")?;
        let wall_thickness = required_dim(profile, 4, "CircleHollow WallThickness")?;

        if wall_thickness >= radius {
            return Err(Error::InvalidProfile(format!(
                "CircleHollow WallThickness {} exceeds radius {}",
                wall_thickness, radius
            )));
        }

        let segments = self.settings.circle_segments;
        let mut result = Profile2D::new(circle_points(radius, segments));
        let mut inner = circle_points(radius - wall_thickness, segments);
        inner.reverse();
        result.add_hole(inner);
        Ok(result)
    }

    /// IfcRectangleHollowProfileDef: ProfileType, ProfileName, Position, XDim, YDim, WallThickness, ...
    fn process_rectangle_hollow(&self, profile: &DecodedEntity) -> Result<Profile2D> {
        let x_dim = required_dim(profile, 3, "RectangleHollow XDim")?;
        let y_dim = required_dim(profile, 4, "RectangleHollow YDim")?;
        let wall_thickness = required_dim(profile, 5, "RectangleHollow WallThickness")?;

        let half_x = x_dim / 2.0;
        let half_y = y_dim / 2.0;

        if wall_thickness >= half_x || wall_thickness >= half_y {
            return Err(Error::InvalidProfile(format!(
                "RectangleHollow WallThickness {} exceeds half dimensions ({}, {})",
                wall_thickness, half_x, half_y
            )));
        }

        let mut inner = centered_rectangle(half_x - wall_thickness, half_y - wall_thickness);
        inner.reverse();

        let mut result = Profile2D::new(centered_rectangle(half_x, half_y));
        result.add_hole(inner);
        Ok(result)
    }

    /// IfcLShapeProfileDef: ProfileType, ProfileName, Position, Depth, Width, Thickness, ...
    fn process_l_shape(&self, profile: &DecodedEntity) -> Result<Profile2D> {
        let depth = required_dim(profile, 3, "L-Shape Depth")?;
        let width = profile.get_float(4).unwrap_or(depth);
        let thickness = required_dim(profile, 5, "L-Shape Thickness")?;

        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(width, 0.0),
            Point2::new(width, thickness),
            Point2::new(thickness, thickness),
            Point2::new(thickness, depth),
            Point2::new(0.0, depth),
        ];

        Ok(Profile2D::new(points))
    }

    /// IfcUShapeProfileDef: ProfileType, ProfileName, Position, Depth, FlangeWidth, WebThickness, FlangeThickness, ...
    fn process_u_shape(&self, profile: &DecodedEntity) -> Result<Profile2D> {
        let depth = required_dim(profile, 3, "U-Shape Depth")?;
        let flange_width = required_dim(profile, 4, "U-Shape FlangeWidth")?;
        let web_thickness = required_dim(profile, 5, "U-Shape WebThickness")?;
        let flange_thickness = required_dim(profile, 6, "U-Shape FlangeThickness")?;

        let half_depth = depth / 2.0;

        let points = vec![
            Point2::new(0.0, -half_depth),
            Point2::new(flange_width, -half_depth),
            Point2::new(flange_width, -half_depth + flange_thickness),
            Point2::new(web_thickness, -half_depth + flange_thickness),
            Point2::new(web_thickness, half_depth - flange_thickness),
            Point2::new(flange_width, half_depth - flange_thickness),
            Point2::new(flange_width, half_depth),
            Point2::new(0.0, half_depth),
        ];

        Ok(Profile2D::new(points))
    }

    /// IfcTShapeProfileDef: ProfileType, ProfileName, Position, Depth, FlangeWidth, WebThickness, FlangeThickness, ...
    fn process_t_shape(&self, profile: &DecodedEntity) -> Result<Profile2D> {
        let depth = required_dim(profile, 3, "T-Shape Depth")?;
        let flange_width = required_dim(profile, 4, "T-Shape FlangeWidth")?;
        let web_thickness = required_dim(profile, 5, "T-Shape WebThickness")?;
        let flange_thickness = required_dim(profile, 6, "T-Shape FlangeThickness")?;

        let half_flange = flange_width / 2.0;
        let half_web = web_thickness / 2.0;

        let points = vec![
            Point2::new(-half_web, 0.0),
            Point2::new(half_web, 0.0),
            Point2::new(half_web, depth - flange_thickness),
            Point2::new(half_flange, depth - flange_thickness),
            Point2::new(half_flange, depth),
            Point2::new(-half_flange, depth),
            Point2::new(-half_flange, depth - flange_thickness),
            Point2::new(-half_web, depth - flange_thickness),
        ];

        Ok(Profile2D::new(points))
    }

    /// IfcArbitraryClosedProfileDef: ProfileType, ProfileName, OuterCurve
    /// IfcArbitraryProfileDefWithVoids: ProfileType, ProfileName, OuterCurve, InnerCurves
    fn process_arbitrary(
        &self,
        profile: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Profile2D> {
        let curve_attr = profile
            .get(2)
            .ok_or_else(|| Error::InvalidProfile("Arbitrary profile missing OuterCurve".into()))?;

        let curve = decoder
            .resolve_ref(curve_attr)?
            .ok_or_else(|| Error::InvalidProfile("Failed to resolve OuterCurve".into()))?;

        let mut result = Profile2D::new(self.process_curve(&curve, decoder)?);

        if profile.ifc_type == IfcType::IfcArbitraryProfileDefWithVoids {
            for inner_id in profile.get_ref_list(3) {
                let inner_curve = decoder.decode_by_id(inner_id)?;
                result.add_hole(self.process_curve(&inner_curve, decoder)?);
            }
        }

        Ok(result)
    }

    /// Process any supported curve type into 2D points
    fn process_curve(
        &self,
        curve: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Vec<Point2<f64>>> {
        match curve.ifc_type {
            IfcType::IfcPolyline => self.process_polyline(curve, decoder),
            IfcType::IfcIndexedPolyCurve => self.process_indexed_polycurve(curve, decoder),
            IfcType::IfcCompositeCurve => self.process_composite_curve(curve, decoder),
            IfcType::IfcTrimmedCurve => self.process_trimmed_curve(curve, decoder),
            IfcType::IfcCircle | IfcType::IfcEllipse => {
                self.process_conic(curve, 0.0, TAU, true, decoder)
            }
            _ => Err(Error::Unsupported(format!("curve type {}", curve.ifc_type))),
        }
    }

    /// IfcPolyline: Points (list of IfcCartesianPoint)
    fn process_polyline(
        &self,
        polyline: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Vec<Point2<f64>>> {
        let point_ids = polyline.get_ref_list(0);

        let mut points = Vec::with_capacity(point_ids.len());
        for id in point_ids {
            let point = cartesian_point(&decoder.decode_by_id(id)?)?;
            points.push(Point2::new(point.x, point.y));
        }

        Ok(points)
    }

    /// IfcIndexedPolyCurve: Points (IfcCartesianPointList2D), Segments (optional), SelfIntersect
    fn process_indexed_polycurve(
        &self,
        curve: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Vec<Point2<f64>>> {
        let points_id = curve
            .get_ref(0)
            .ok_or_else(|| Error::geometry("IndexedPolyCurve missing Points"))?;
        let points_list = decoder.decode_by_id(points_id)?;

        let coord_list = points_list
            .get_list(0)
            .ok_or_else(|| Error::geometry("CartesianPointList2D missing CoordList"))?;
        let all_points: Vec<Point2<f64>> = AttributeValue::parse_coordinate_list_2d(coord_list)
            .into_iter()
            .map(|[x, y]| Point2::new(x, y))
            .collect();

        // Without segments the points are used in order
        let Some(segments) = curve.get_list(1) else {
            return Ok(all_points);
        };

        let mut result_points: Vec<Point2<f64>> = Vec::new();
        let push = |pt: Point2<f64>, out: &mut Vec<Point2<f64>>| {
            if out.last() != Some(&pt) {
                out.push(pt);
            }
        };

        for segment in segments {
            // IFCLINEINDEX((i1,i2,...)) / IFCARCINDEX((i1,i2,i3))
            let (is_arc, indices) = match segment {
                AttributeValue::Typed(name, args) => (
                    name == "IFCARCINDEX",
                    args.first().and_then(|a| a.as_list()).unwrap_or(&[]),
                ),
                AttributeValue::List(items) => (false, items.as_slice()),
                _ => continue,
            };

            let points: Vec<Point2<f64>> = indices
                .iter()
                .filter_map(|v| v.as_int())
                .filter(|&i| i > 0)
                .filter_map(|i| all_points.get(i as usize - 1).copied())
                .collect();

            if is_arc && points.len() == 3 {
                for pt in self.approximate_arc_3pt(points[0], points[1], points[2]) {
                    push(pt, &mut result_points);
                }
            } else {
                for pt in points {
                    push(pt, &mut result_points);
                }
            }
        }

        Ok(result_points)
    }

    /// Approximate a 3-point arc (start, any point on the arc, end) with line segments
    fn approximate_arc_3pt(
        &self,
        p1: Point2<f64>,
        p2: Point2<f64>,
        p3: Point2<f64>,
    ) -> Vec<Point2<f64>> {
        let (ax, ay) = (p1.x, p1.y);
        let (bx, by) = (p2.x, p2.y);
        let (cx, cy) = (p3.x, p3.y);

        let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));

        // Collinear: straight line
        if d.abs() < 1e-12 {
            return vec![p1, p2, p3];
        }

        let ux = ((ax * ax + ay * ay) * (by - cy)
            + (bx * bx + by * by) * (cy - ay)
            + (cx * cx + cy * cy) * (ay - by))
            / d;
        let uy = ((ax * ax + ay * ay) * (cx - bx)
            + (bx * bx + by * by) * (ax - cx)
            + (cx * cx + cy * cy) * (bx - ax))
            / d;

        let center = Point2::new(ux, uy);
        let radius = (p1 - center).norm();

        let start_angle = (p1.y - center.y).atan2(p1.x - center.x);
        let mut end_angle = (p3.y - center.y).atan2(p3.x - center.x);

        // d > 0 means p1 -> p2 -> p3 turns counter-clockwise
        if d > 0.0 {
            while end_angle <= start_angle {
                end_angle += TAU;
            }
        } else {
            while end_angle >= start_angle {
                end_angle -= TAU;
            }
        }

        let sweep = end_angle - start_angle;
        let num_segments = self.settings.arc_segments(sweep);
        (0..=num_segments)
            .map(|i| {
                let angle = start_angle + sweep * (i as f64 / num_segments as f64);
                Point2::new(
                    center.x + radius * angle.cos(),
                    center.y + radius * angle.sin(),
                )
            })
            .collect()
    }

    /// IfcTrimmedCurve: BasisCurve, Trim1, Trim2, SenseAgreement, MasterRepresentation
    fn process_trimmed_curve(
        &self,
        curve: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Vec<Point2<f64>>> {
        let basis_id = curve
            .get_ref(0)
            .ok_or_else(|| Error::geometry("TrimmedCurve missing BasisCurve"))?;
        let basis_curve = decoder.decode_by_id(basis_id)?;

        let sense = curve.get(3).and_then(|v| v.as_bool()).unwrap_or(true);

        match basis_curve.ifc_type {
            IfcType::IfcCircle | IfcType::IfcEllipse => {
                // Trim parameters are plane angles in degrees
                let trim1 = curve.get(1).and_then(trim_parameter).unwrap_or(0.0);
                let trim2 = curve.get(2).and_then(trim_parameter).unwrap_or(360.0);
                self.process_conic(&basis_curve, trim1.to_radians(), trim2.to_radians(), sense, decoder)
            }
            IfcType::IfcLine => {
                let start = self.trim_point(curve.get(1), decoder)?;
                let end = self.trim_point(curve.get(2), decoder)?;
                match (start, end) {
                    (Some(a), Some(b)) if sense => Ok(vec![a, b]),
                    (Some(a), Some(b)) => Ok(vec![b, a]),
                    _ => Err(Error::geometry("Trimmed line needs cartesian trims")),
                }
            }
            _ => self.process_curve(&basis_curve, decoder),
        }
    }

    /// Cartesian trimming point, if the trim select holds one
    fn trim_point(
        &self,
        trim: Option<&AttributeValue>,
        decoder: &mut EntityDecoder,
    ) -> Result<Option<Point2<f64>>> {
        let Some(items) = trim.and_then(|t| t.as_list()) else {
            return Ok(None);
        };
        for item in items {
            if let Some(id) = item.as_entity_ref() {
                let point = cartesian_point(&decoder.decode_by_id(id)?)?;
                return Ok(Some(Point2::new(point.x, point.y)));
            }
        }
        Ok(None)
    }

    /// Circle or ellipse arc between two angles (radians)
    ///
    /// IfcCircle: Position, Radius. IfcEllipse: Position, SemiAxis1, SemiAxis2.
    fn process_conic(
        &self,
        basis: &DecodedEntity,
        start_angle: f64,
        end_angle: f64,
        sense: bool,
        decoder: &mut EntityDecoder,
    ) -> Result<Vec<Point2<f64>>> {
        let radius = basis
            .get_float(1)
            .ok_or_else(|| Error::geometry(format!("{} missing radius", basis.ifc_type)))?;
        let radius2 = if basis.ifc_type == IfcType::IfcEllipse {
            basis.get_float(2).unwrap_or(radius)
        } else {
            radius
        };

        let position = match basis.get_ref(0) {
            Some(id) => Some(decoder.decode_by_id(id)?),
            None => None,
        };
        let (center, x_axis) = parse_axis2_placement_2d(position.as_ref(), decoder)?;

        // Full closed conic
        if (end_angle - start_angle - TAU).abs() < 1e-12 && start_angle == 0.0 {
            let segments = self.settings.circle_segments;
            return Ok((0..segments)
                .map(|i| {
                    let angle = TAU * (i as f64) / (segments as f64);
                    conic_point(radius, radius2, angle, &center, &x_axis)
                })
                .collect());
        }

        let mut sweep = end_angle - start_angle;
        if sense {
            while sweep <= 0.0 {
                sweep += TAU;
            }
        } else {
            while sweep >= 0.0 {
                sweep -= TAU;
            }
        }

        let num_segments = self.settings.arc_segments(sweep);
        Ok((0..=num_segments)
            .map(|i| {
                let angle = start_angle + sweep * (i as f64 / num_segments as f64);
                conic_point(radius, radius2, angle, &center, &x_axis)
            })
            .collect())
    }

    /// IfcCompositeCurve: Segments (list of IfcCompositeCurveSegment), SelfIntersect
    fn process_composite_curve(
        &self,
        curve: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Vec<Point2<f64>>> {
        let mut all_points: Vec<Point2<f64>> = Vec::new();

        for segment_id in curve.get_ref_list(0) {
            let segment = decoder.decode_by_id(segment_id)?;
            // IfcCompositeCurveSegment: Transition, SameSense, ParentCurve
            if segment.ifc_type != IfcType::IfcCompositeCurveSegment {
                continue;
            }

            let parent_id = segment
                .get_ref(2)
                .ok_or_else(|| Error::geometry("CompositeCurveSegment missing ParentCurve"))?;
            let parent_curve = decoder.decode_by_id(parent_id)?;

            let same_sense = segment.get(1).and_then(|v| v.as_bool()).unwrap_or(true);

            let mut segment_points = self.process_curve(&parent_curve, decoder)?;
            if !same_sense {
                segment_points.reverse();
            }

            for pt in segment_points {
                if all_points.last() != Some(&pt) {
                    all_points.push(pt);
                }
            }
        }

        Ok(all_points)
    }

    /// IfcCompositeProfileDef: ProfileType, ProfileName, Profiles, Label
    fn process_composite(
        &self,
        profile: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Vec<Profile2D>> {
        let sub_ids = profile.get_ref_list(2);
        if sub_ids.is_empty() {
            return Err(Error::InvalidProfile(
                "Composite profile has no sub-profiles".into(),
            ));
        }

        let mut parts = Vec::with_capacity(sub_ids.len());
        for id in sub_ids {
            let sub_profile = decoder.decode_by_id(id)?;
            parts.extend(self.process_parts(&sub_profile, decoder)?);
        }
        Ok(parts)
    }
}

/// Positive dimension at attribute `index`
fn required_dim(profile: &DecodedEntity, index: usize, what: &str) -> Result<f64> {
    match profile.get_float(index) {
        Some(value) if value > 0.0 => Ok(value),
        Some(value) => Err(Error::InvalidProfile(format!("{} must be positive, got {}", what, value))),
        None => Err(Error::InvalidProfile(format!("missing {}", what))),
    }
}

/// Trim parameter from an IfcTrimmingSelect list (IFCPARAMETERVALUE or plain number)
fn trim_parameter(attr: &AttributeValue) -> Option<f64> {
    attr.as_list()?.iter().find_map(|item| item.as_float())
}

fn centered_rectangle(half_x: f64, half_y: f64) -> Vec<Point2<f64>> {
    vec![
        Point2::new(-half_x, -half_y),
        Point2::new(half_x, -half_y),
        Point2::new(half_x, half_y),
        Point2::new(-half_x, half_y),
    ]
}

#[inline]
fn conic_point(
    radius1: f64,
    radius2: f64,
    angle: f64,
    center: &Point2<f64>,
    x_axis: &Vector2<f64>,
) -> Point2<f64> {
    place_2d(
        &Point2::new(radius1 * angle.cos(), radius2 * angle.sin()),
        center,
        x_axis,
    )
}

/// Rotate and translate every profile point by a 2D placement
fn apply_profile_position(profile: &mut Profile2D, location: &Point2<f64>, x_axis: &Vector2<f64>) {
    if location.coords.norm() < 1e-12 && (x_axis.x - 1.0).abs() < 1e-12 {
        return;
    }

    for point in profile.outer.iter_mut().chain(profile.holes.iter_mut().flatten()) {
        *point = place_2d(point, location, x_axis);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn process(content: &str, id: u32) -> Result<Profile2D> {
        let mut decoder = EntityDecoder::new(content);
        let processor = ProfileProcessor::new(IfcSchema::new());
        let entity = decoder.decode_by_id(id)?;
        processor.process(&entity, &mut decoder)
    }

    #[test]
    fn test_rectangle_profile() {
        let profile = process("#1=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,100.0,200.0);", 1).unwrap();
        assert_eq!(profile.outer.len(), 4);
        assert_relative_eq!(profile.area(), 20000.0);
    }

    #[test]
    fn test_rectangle_with_position() {
        let content = r#"
#1=IFCCARTESIANPOINT((50.,0.));
#2=IFCDIRECTION((0.,1.));
#3=IFCAXIS2PLACEMENT2D(#1,#2);
#4=IFCRECTANGLEPROFILEDEF(.AREA.,$,#3,100.,20.);
"#;
        let profile = process(content, 4).unwrap();
        // Rotated 90 degrees: x extent becomes 20
        let xs: Vec<f64> = profile.outer.iter().map(|p| p.x).collect();
        let min = xs.iter().cloned().fold(f64::MAX, f64::min);
        let max = xs.iter().cloned().fold(f64::MIN, f64::max);
        assert_relative_eq!(min, 40.0, epsilon = 1e-9);
        assert_relative_eq!(max, 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_circle_profile_uses_settings() {
        let mut decoder = EntityDecoder::new("#1=IFCCIRCLEPROFILEDEF(.AREA.,$,$,50.0);");
        let entity = decoder.decode_by_id(1).unwrap();

        let coarse = ProfileProcessor::new(IfcSchema::new());
        assert_eq!(coarse.process(&entity, &mut decoder).unwrap().outer.len(), 24);

        let fine = ProfileProcessor::with_settings(IfcSchema::new(), GeometrySettings::precise());
        assert_eq!(fine.process(&entity, &mut decoder).unwrap().outer.len(), 72);
    }

    #[test]
    fn test_i_shape_profile() {
        let profile =
            process("#1=IFCISHAPEPROFILEDEF(.AREA.,$,$,200.0,300.0,10.0,15.0,$,$,$,$);", 1).unwrap();
        assert_eq!(profile.outer.len(), 12);
        assert_relative_eq!(profile.area(), 2.0 * 200.0 * 15.0 + 10.0 * 270.0);
    }

    #[test]
    fn test_rectangle_hollow_area() {
        let profile =
            process("#1=IFCRECTANGLEHOLLOWPROFILEDEF(.AREA.,$,$,100.,50.,5.,$,$);", 1).unwrap();
        assert_eq!(profile.holes.len(), 1);
        assert_relative_eq!(profile.area(), 100.0 * 50.0 - 90.0 * 40.0);
    }

    #[test]
    fn test_invalid_dimensions_are_rejected() {
        assert!(process("#1=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,0.,200.0);", 1).is_err());
        assert!(process("#1=IFCCIRCLEPROFILEDEF(.AREA.,$,$,$);", 1).is_err());
    }

    #[test]
    fn test_arbitrary_profile() {
        let content = r#"
#1=IFCCARTESIANPOINT((0.0,0.0));
#2=IFCCARTESIANPOINT((100.0,0.0));
#3=IFCCARTESIANPOINT((100.0,100.0));
#4=IFCCARTESIANPOINT((0.0,100.0));
#5=IFCPOLYLINE((#1,#2,#3,#4,#1));
#6=IFCARBITRARYCLOSEDPROFILEDEF(.AREA.,$,#5);
"#;
        let profile = process(content, 6).unwrap();
        assert_eq!(profile.outer.len(), 5);
        assert_relative_eq!(profile.area(), 10000.0);
    }

    #[test]
    fn test_indexed_polycurve_with_arc() {
        // Half disc: straight edge then a semicircular arc through (0,1)
        let content = r#"
#1=IFCCARTESIANPOINTLIST2D(((-1.,0.),(1.,0.),(0.,1.)));
#2=IFCINDEXEDPOLYCURVE(#1,(IFCLINEINDEX((1,2)),IFCARCINDEX((2,3,1))),$);
#3=IFCARBITRARYCLOSEDPROFILEDEF(.AREA.,$,#2);
"#;
        let profile = process(content, 3).unwrap();
        // Inscribed polygon area approaches pi/2 from below
        let area = profile.area();
        assert!(area > 1.5 && area < PI / 2.0, "area {}", area);
    }

    #[test]
    fn test_trimmed_circle_quarter() {
        let content = r#"
#1=IFCCARTESIANPOINT((0.,0.));
#2=IFCAXIS2PLACEMENT2D(#1,$);
#3=IFCCIRCLE(#2,10.);
#4=IFCTRIMMEDCURVE(#3,(IFCPARAMETERVALUE(0.)),(IFCPARAMETERVALUE(90.)),.T.,.PARAMETER.);
#5=IFCCARTESIANPOINT((0.,10.));
#6=IFCCARTESIANPOINT((0.,0.));
#7=IFCCARTESIANPOINT((10.,0.));
#8=IFCPOLYLINE((#5,#6,#7));
#9=IFCCOMPOSITECURVESEGMENT(.CONTINUOUS.,.T.,#4);
#10=IFCCOMPOSITECURVESEGMENT(.CONTINUOUS.,.T.,#8);
#11=IFCCOMPOSITECURVE((#9,#10),.F.);
#12=IFCARBITRARYCLOSEDPROFILEDEF(.AREA.,$,#11);
"#;
        let profile = process(content, 12).unwrap();
        let first = profile.outer[0];
        assert_relative_eq!(first, Point2::new(10.0, 0.0), epsilon = 1e-9);
        let area = profile.area();
        assert!(area > 75.0 && area < 25.0 * PI, "area {}", area);
    }

    #[test]
    fn test_composite_profile_keeps_parts() {
        let content = r#"
#1=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,10.,10.);
#2=IFCCIRCLEPROFILEDEF(.AREA.,$,$,1.);
#3=IFCCOMPOSITEPROFILEDEF(.AREA.,$,(#1,#2),$);
"#;
        let mut decoder = EntityDecoder::new(content);
        let processor = ProfileProcessor::new(IfcSchema::new());
        let entity = decoder.decode_by_id(3).unwrap();
        let parts = processor.process_parts(&entity, &mut decoder).unwrap();
        assert_eq!(parts.len(), 2);
    }
}
