// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ExtrudedAreaSolid processor - extrusion of 2D profiles.

use crate::{
    extrusion::{apply_transform, extrude_profile},
    profiles::ProfileProcessor,
    settings::GeometrySettings,
    Error, Mesh, Result, Vector3,
};
use ifc_lite_core::{DecodedEntity, EntityDecoder, IfcSchema, IfcType};
use nalgebra::Matrix4;

use super::helpers::{optional_direction, parse_axis2_placement_3d};
use crate::router::GeometryProcessor;

/// ExtrudedAreaSolid processor
/// Handles IfcExtrudedAreaSolid - extrusion of 2D profiles
pub struct ExtrudedAreaSolidProcessor {
    profile_processor: ProfileProcessor,
}

impl ExtrudedAreaSolidProcessor {
    /// Create new processor
    pub fn new(schema: IfcSchema) -> Self {
        Self::with_settings(schema, GeometrySettings::default())
    }

    /// Create processor with explicit tessellation settings
    pub fn with_settings(schema: IfcSchema, settings: GeometrySettings) -> Self {
        Self {
            profile_processor: ProfileProcessor::with_settings(schema, settings),
        }
    }
}

impl GeometryProcessor for ExtrudedAreaSolidProcessor {
    fn process(
        &self,
        entity: &DecodedEntity,
        decoder: &mut EntityDecoder,
        _schema: &IfcSchema,
    ) -> Result<Mesh> {
        // IfcExtrudedAreaSolid attributes:
        // 0: SweptArea (IfcProfileDef)
        // 1: Position (IfcAxis2Placement3D)
        // 2: ExtrudedDirection (IfcDirection)
        // 3: Depth (IfcPositiveLengthMeasure)
        let profile_id = entity
            .get_ref(0)
            .ok_or_else(|| Error::geometry("ExtrudedAreaSolid missing SweptArea"))?;
        let profile_entity = decoder.decode_by_id(profile_id)?;
        let profiles = self.profile_processor.process_parts(&profile_entity, decoder)?;

        let direction = optional_direction(entity, 2, decoder)?
            .ok_or_else(|| Error::geometry("ExtrudedAreaSolid missing ExtrudedDirection"))?;
        let local_direction = direction
            .try_normalize(1e-12)
            .ok_or_else(|| Error::InvalidExtrusion("zero extrusion direction".into()))?;

        if local_direction.z.abs() < 1e-9 {
            return Err(Error::InvalidExtrusion(
                "extrusion direction lies in the profile plane".into(),
            ));
        }

        let depth = entity
            .get_float(3)
            .ok_or_else(|| Error::geometry("ExtrudedAreaSolid missing Depth"))?;

        let position = match entity.get(1) {
            Some(attr) if !attr.is_null() => decoder
                .resolve_ref(attr)?
                .filter(|p| p.ifc_type == IfcType::IfcAxis2Placement3D),
            _ => None,
        };
        let pos_transform = match position {
            Some(pos_entity) => Some(parse_axis2_placement_3d(&pos_entity, decoder)?),
            None => None,
        };

        // ExtrudedDirection is in the profile's local system. Shear keeps the
        // profile plane fixed and sends (x, y, depth) to (x + dx*depth, y + dy*depth, dz*depth).
        let mut shear = Matrix4::identity();
        shear[(0, 2)] = local_direction.x;
        shear[(1, 2)] = local_direction.y;
        shear[(2, 2)] = local_direction.z;
        let is_identity = local_direction == Vector3::z();

        let mut mesh = Mesh::new();
        for profile in &profiles {
            let part = extrude_profile(profile, depth, (!is_identity).then_some(shear))?;
            mesh.merge(&part);
        }

        if let Some(pos) = pos_transform {
            apply_transform(&mut mesh, &pos);
        }

        Ok(mesh)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcExtrudedAreaSolid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn run(content: &str, id: u32) -> Result<Mesh> {
        let mut decoder = EntityDecoder::new(content);
        let schema = IfcSchema::new();
        let processor = ExtrudedAreaSolidProcessor::new(schema.clone());
        let entity = decoder.decode_by_id(id)?;
        processor.process(&entity, &mut decoder, &schema)
    }

    #[test]
    fn test_straight_extrusion() {
        let content = r#"
#1=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,1.,2.);
#2=IFCDIRECTION((0.,0.,1.));
#3=IFCEXTRUDEDAREASOLID(#1,$,#2,3.);
"#;
        let mesh = run(content, 3).unwrap();
        assert_relative_eq!(mesh.signed_volume(), 6.0, epsilon = 1e-9);
        assert_relative_eq!(mesh.surface_area(), 22.0, epsilon = 1e-9);
    }

    #[test]
    fn test_downward_extrusion_stays_outward() {
        let content = r#"
#1=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,1.,2.);
#2=IFCDIRECTION((0.,0.,-1.));
#3=IFCEXTRUDEDAREASOLID(#1,$,#2,3.);
"#;
        let mesh = run(content, 3).unwrap();
        assert_relative_eq!(mesh.signed_volume(), 6.0, epsilon = 1e-9);
        let (min, max) = mesh.bounds();
        assert_relative_eq!(min.z, -3.0);
        assert_relative_eq!(max.z, 0.0);
    }

    #[test]
    fn test_oblique_extrusion_volume() {
        // Height is depth * cos(45 deg)
        let content = r#"
#1=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,2.,2.);
#2=IFCDIRECTION((1.,0.,1.));
#3=IFCEXTRUDEDAREASOLID(#1,$,#2,10.);
"#;
        let mesh = run(content, 3).unwrap();
        assert_relative_eq!(mesh.volume(), 4.0 * 10.0 / 2f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_position_is_applied() {
        let content = r#"
#1=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,1.,1.);
#2=IFCDIRECTION((0.,0.,1.));
#4=IFCCARTESIANPOINT((0.,0.,100.));
#5=IFCAXIS2PLACEMENT3D(#4,$,$);
#3=IFCEXTRUDEDAREASOLID(#1,#5,#2,2.);
"#;
        let mesh = run(content, 3).unwrap();
        let (min, max) = mesh.bounds();
        assert_relative_eq!(min.z, 100.0);
        assert_relative_eq!(max.z, 102.0);
    }

    #[test]
    fn test_missing_depth_fails() {
        let content = r#"
#1=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,1.,1.);
#2=IFCDIRECTION((0.,0.,1.));
#3=IFCEXTRUDEDAREASOLID(#1,$,#2,$);
"#;
        assert!(run(content, 3).is_err());
    }
}
