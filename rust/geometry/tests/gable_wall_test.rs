// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end measurement of a gable wall: millimetre project units, a placed
//! extrusion and a sloped half-space clip.

use approx::assert_relative_eq;
use ifc_lite_core::{extract_length_unit_scale, EntityDecoder};
use ifc_lite_geometry::{GeometryRouter, GeometrySettings};

const GABLE_WALL: &str = r#"
#1=IFCPROJECT('0YvctVUKr0kugbFTf53O9L',$,'Project',$,$,$,$,$,#2);
#2=IFCUNITASSIGNMENT((#3));
#3=IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.);
#10=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,4000.,200.);
#11=IFCDIRECTION((0.,0.,1.));
#12=IFCEXTRUDEDAREASOLID(#10,$,#11,3000.);
#13=IFCCARTESIANPOINT((0.,0.,2000.));
#14=IFCDIRECTION((1.,0.,1.));
#15=IFCAXIS2PLACEMENT3D(#13,#14,$);
#16=IFCPLANE(#15);
#17=IFCHALFSPACESOLID(#16,.F.);
#18=IFCBOOLEANCLIPPINGRESULT(.DIFFERENCE.,#12,#17);
#19=IFCSHAPEREPRESENTATION($,'Body','Clipping',(#18));
#20=IFCPRODUCTDEFINITIONSHAPE($,$,(#19));
#21=IFCCARTESIANPOINT((10000.,20000.,0.));
#22=IFCAXIS2PLACEMENT3D(#21,$,$);
#23=IFCLOCALPLACEMENT($,#22);
#30=IFCWALL('2O2Fr$t4X7Zf8NOew3FLOH',$,'Gable',$,$,#23,#20,$);
"#;

#[test]
fn gable_wall_volume_in_cubic_metres() {
    let mut decoder = EntityDecoder::new(GABLE_WALL);
    let scale = extract_length_unit_scale(&mut decoder, 1).unwrap();
    assert_eq!(scale, 0.001);

    let router = GeometryRouter::with_settings(GeometrySettings::precise(), scale);
    let wall = decoder.decode_by_id(30).unwrap();
    let mesh = router.process_element(&wall, &mut decoder).unwrap();

    // Side elevation keeps x + z <= 2000: a 1000 x 3000 rectangle plus a
    // 3000 x 3000 triangle, 200 thick
    assert_relative_eq!(mesh.volume(), 1.5, epsilon = 1e-9);

    let (min, max) = mesh.bounds();
    assert_relative_eq!(min.x, 8.0, epsilon = 1e-9);
    assert_relative_eq!(max.x, 12.0, epsilon = 1e-9);
    assert_relative_eq!(max.z, 3.0, epsilon = 1e-9);
}

#[test]
fn area_and_volume_are_independent_of_call_order() {
    let mut decoder = EntityDecoder::new(GABLE_WALL);
    let router = GeometryRouter::with_settings(GeometrySettings::precise(), 0.001);
    let wall = decoder.decode_by_id(30).unwrap();

    let first = router.process_element(&wall, &mut decoder).unwrap();
    let second = router.process_element(&wall, &mut decoder).unwrap();
    assert_eq!(first.surface_area(), second.surface_area());
    assert_eq!(first.volume(), second.volume());
}
