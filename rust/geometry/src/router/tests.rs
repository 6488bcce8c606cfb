// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::GeometryRouter;
use crate::{Error, GeometrySettings};
use approx::assert_relative_eq;
use ifc_lite_core::EntityDecoder;

/// Shared geometry: a 1000 x 200 rectangle extruded 3000 along +Z
const WALL_BODY: &str = r#"
#20=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,1000.,200.);
#21=IFCDIRECTION((0.,0.,1.));
#22=IFCEXTRUDEDAREASOLID(#20,$,#21,3000.);
#23=IFCSHAPEREPRESENTATION($,'Body','SweptSolid',(#22));
#24=IFCPOLYLINE((#25,#26));
#25=IFCCARTESIANPOINT((0.,0.));
#26=IFCCARTESIANPOINT((1000.,0.));
#27=IFCSHAPEREPRESENTATION($,'Axis','Curve2D',(#24));
"#;

const PLACEMENT: &str = r#"
#30=IFCCARTESIANPOINT((5000.,0.,0.));
#31=IFCAXIS2PLACEMENT3D(#30,$,$);
#32=IFCLOCALPLACEMENT($,#31);
#33=IFCCARTESIANPOINT((0.,0.,1000.));
#34=IFCAXIS2PLACEMENT3D(#33,$,$);
#35=IFCLOCALPLACEMENT(#32,#34);
"#;

fn process(content: &str, element_id: u32, scale: f64) -> crate::Result<crate::Mesh> {
    let mut decoder = EntityDecoder::new(content);
    let router = GeometryRouter::with_scale(scale);
    let element = decoder.decode_by_id(element_id)?;
    router.process_element(&element, &mut decoder)
}

#[test]
fn test_router_creation() {
    let router = GeometryRouter::new();
    assert!(!router.processors.is_empty());
    assert_eq!(router.unit_scale(), 1.0);
    assert_eq!(router.settings(), GeometrySettings::default());
}

#[test]
fn test_wall_in_millimetres_is_measured_in_metres() {
    let content = format!(
        "{}{}#40=IFCPRODUCTDEFINITIONSHAPE($,$,(#27,#23));\n#1=IFCWALL('guid',$,'Wall',$,$,#35,#40,$);",
        WALL_BODY, PLACEMENT
    );
    let mesh = process(&content, 1, 0.001).unwrap();

    assert_relative_eq!(mesh.volume(), 0.6, epsilon = 1e-9);
    assert_relative_eq!(mesh.surface_area(), 2.0 * 0.2 + 2.0 * 3.0 + 2.0 * 0.6, epsilon = 1e-9);

    // Placement chain: parent at x = 5 m, child raised 1 m
    let (min, max) = mesh.bounds();
    assert_relative_eq!(min.x, 4.5, epsilon = 1e-9);
    assert_relative_eq!(max.x, 5.5, epsilon = 1e-9);
    assert_relative_eq!(min.z, 1.0, epsilon = 1e-9);
    assert_relative_eq!(max.z, 4.0, epsilon = 1e-9);
}

#[test]
fn test_null_representation_is_an_error() {
    let result = process("#1=IFCWALL('guid',$,'Wall',$,$,$,$,$);", 1, 1.0);
    assert!(result.is_err());
}

#[test]
fn test_axis_only_representation_is_empty() {
    let content = format!(
        "{}#40=IFCPRODUCTDEFINITIONSHAPE($,$,(#27));\n#1=IFCWALL('guid',$,'Wall',$,$,$,#40,$);",
        WALL_BODY
    );
    assert!(matches!(process(&content, 1, 1.0), Err(Error::EmptyMesh(_))));
}

#[test]
fn test_unsupported_item_is_an_error() {
    let content = r#"
#10=IFCCARTESIANPOINT((0.,0.,0.));
#11=IFCSHAPEREPRESENTATION($,'Body','SweptSolid',(#10));
#12=IFCPRODUCTDEFINITIONSHAPE($,$,(#11));
#1=IFCSLAB('guid',$,'Slab',$,$,$,#12,$,$);
"#;
    assert!(matches!(process(content, 1, 1.0), Err(Error::Unsupported(_))));
}

#[test]
fn test_mapped_items_share_source_geometry() {
    let content = format!(
        r#"{}
#50=IFCCARTESIANPOINT((0.,0.,0.));
#51=IFCAXIS2PLACEMENT3D(#50,$,$);
#52=IFCREPRESENTATIONMAP(#51,#23);
#53=IFCCARTESIANTRANSFORMATIONOPERATOR3D($,$,#50,2.,$);
#54=IFCCARTESIANPOINT((10000.,0.,0.));
#55=IFCCARTESIANTRANSFORMATIONOPERATOR3D($,$,#54,$,$);
#56=IFCMAPPEDITEM(#52,#53);
#57=IFCMAPPEDITEM(#52,#55);
#58=IFCSHAPEREPRESENTATION($,'Body','MappedRepresentation',(#56,#57));
#40=IFCPRODUCTDEFINITIONSHAPE($,$,(#58));
#1=IFCCOLUMN('guid',$,'Column',$,$,$,#40,$,$);
"#,
        WALL_BODY
    );

    let mut decoder = EntityDecoder::new(&content);
    let router = GeometryRouter::with_scale(0.001);
    let element = decoder.decode_by_id(1).unwrap();
    let mesh = router.process_element(&element, &mut decoder).unwrap();

    // Scaled instance contributes 8x, translated instance 1x
    assert_relative_eq!(mesh.volume(), 0.6 * 8.0 + 0.6, epsilon = 1e-9);
    assert_eq!(router.mapped_item_cache.borrow().len(), 1);
}

#[test]
fn test_mirrored_mapping_keeps_positive_volume() {
    let content = format!(
        r#"{}
#50=IFCCARTESIANPOINT((0.,0.,0.));
#51=IFCAXIS2PLACEMENT3D(#50,$,$);
#52=IFCREPRESENTATIONMAP(#51,#23);
#59=IFCDIRECTION((1.,0.,0.));
#60=IFCDIRECTION((0.,1.,0.));
#61=IFCDIRECTION((0.,0.,1.));
#53=IFCCARTESIANTRANSFORMATIONOPERATOR3DNONUNIFORM(#59,#60,#50,1.,#61,-1.,1.);
#56=IFCMAPPEDITEM(#52,#53);
#58=IFCSHAPEREPRESENTATION($,'Body','MappedRepresentation',(#56));
#40=IFCPRODUCTDEFINITIONSHAPE($,$,(#58));
#1=IFCCOLUMN('guid',$,'Column',$,$,$,#40,$,$);
"#,
        WALL_BODY
    );
    let mesh = process(&content, 1, 0.001).unwrap();
    assert_relative_eq!(mesh.signed_volume(), 0.6, epsilon = 1e-9);
}

#[test]
fn test_mapped_representation_skipped_when_body_exists() {
    let content = format!(
        r#"{}
#50=IFCCARTESIANPOINT((0.,0.,0.));
#51=IFCAXIS2PLACEMENT3D(#50,$,$);
#52=IFCREPRESENTATIONMAP(#51,#23);
#56=IFCMAPPEDITEM(#52,$);
#58=IFCSHAPEREPRESENTATION($,'Body','MappedRepresentation',(#56));
#40=IFCPRODUCTDEFINITIONSHAPE($,$,(#23,#58));
#1=IFCWALL('guid',$,'Wall',$,$,$,#40,$);
"#,
        WALL_BODY
    );
    let mesh = process(&content, 1, 0.001).unwrap();
    assert_relative_eq!(mesh.volume(), 0.6, epsilon = 1e-9);
}

/// 4000 x 300 x 3000 wall with a 1000 wide, 2000 high opening raised 500.
/// The opening is deeper than the wall so it cuts clean through.
const WALL_WITH_OPENING: &str = r#"
#10=IFCCARTESIANPOINT((0.,0.,0.));
#11=IFCAXIS2PLACEMENT3D(#10,$,$);
#12=IFCLOCALPLACEMENT($,#11);
#13=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,4000.,300.);
#14=IFCDIRECTION((0.,0.,1.));
#15=IFCEXTRUDEDAREASOLID(#13,$,#14,3000.);
#16=IFCSHAPEREPRESENTATION($,'Body','SweptSolid',(#15));
#17=IFCPRODUCTDEFINITIONSHAPE($,$,(#16));
#1=IFCWALL('w',$,'Wall',$,$,#12,#17,$);
#20=IFCCARTESIANPOINT((0.,0.,500.));
#21=IFCAXIS2PLACEMENT3D(#20,$,$);
#22=IFCLOCALPLACEMENT(#12,#21);
#23=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,1000.,500.);
#24=IFCEXTRUDEDAREASOLID(#23,$,#14,2000.);
#25=IFCSHAPEREPRESENTATION($,'Body','SweptSolid',(#24));
#26=IFCPRODUCTDEFINITIONSHAPE($,$,(#25));
#2=IFCOPENINGELEMENT('o',$,'Opening',$,$,#22,#26,$,.OPENING.);
#3=IFCRELVOIDSELEMENT('r',$,$,$,#1,#2);
#4=IFCOPENINGELEMENT('g',$,'Ghost',$,$,#22,$,$,.OPENING.);
"#;

fn process_with_openings(openings: &[u32]) -> crate::Mesh {
    let mut decoder = EntityDecoder::new(WALL_WITH_OPENING);
    let router = GeometryRouter::with_scale(0.001);
    let wall = decoder.decode_by_id(1).unwrap();

    let mut void_index = rustc_hash::FxHashMap::default();
    void_index.insert(1, openings.to_vec());
    router
        .process_element_with_voids(&wall, &mut decoder, &void_index)
        .unwrap()
}

#[test]
fn test_opening_is_subtracted() {
    let mesh = process_with_openings(&[2]);

    assert_relative_eq!(mesh.volume(), 3.6 - 0.6, epsilon = 1e-6);
    // Both 1 x 2 faces removed; 0.3 deep reveals on all four sides
    let faces = 2.0 * (4.0 * 0.3 + 4.0 * 3.0 + 0.3 * 3.0);
    let reveals = 2.0 * (1.0 * 0.3) + 2.0 * (2.0 * 0.3);
    assert_relative_eq!(mesh.surface_area(), faces - 4.0 + reveals, epsilon = 1e-6);
}

#[test]
fn test_no_openings_matches_plain_processing() {
    let mesh = process_with_openings(&[]);
    assert_relative_eq!(mesh.volume(), 3.6, epsilon = 1e-9);
}

#[test]
fn test_openings_without_geometry_are_skipped() {
    let mesh = process_with_openings(&[4, 99]);
    assert_relative_eq!(mesh.volume(), 3.6, epsilon = 1e-9);

    let mesh = process_with_openings(&[4, 2]);
    assert_relative_eq!(mesh.volume(), 3.0, epsilon = 1e-6);
}
