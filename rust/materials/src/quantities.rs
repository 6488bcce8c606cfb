// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Quantity calculator - element surface area and volume from geometry

use crate::error::Result;
use crate::model::IfcModel;
use ifc_lite_core::{DecodedEntity, EntityDecoder};
use ifc_lite_geometry::{GeometryRouter, GeometrySettings};
use rustc_hash::FxHashMap;

/// Geometric quantities of an element, in metres
pub trait ShapeProperties {
    fn surface_area(&self, element: &DecodedEntity, decoder: &mut EntityDecoder) -> Result<f64>;

    fn volume(&self, element: &DecodedEntity, decoder: &mut EntityDecoder) -> Result<f64>;
}

/// Builds the element's placed mesh, cuts its openings and integrates over it
///
/// Area and volume each rebuild the mesh.
pub struct QuantityCalculator<'m> {
    router: GeometryRouter,
    /// Host element id -> opening element ids
    voids: &'m FxHashMap<u32, Vec<u32>>,
}

impl<'m> QuantityCalculator<'m> {
    /// Precise tessellation in the model's length unit
    pub fn for_model(model: &'m IfcModel) -> Self {
        Self::with_settings(model, GeometrySettings::precise())
    }

    pub fn with_settings(model: &'m IfcModel, settings: GeometrySettings) -> Self {
        Self {
            router: GeometryRouter::with_settings(settings, model.length_unit_scale()),
            voids: model.void_index(),
        }
    }

    pub fn router(&self) -> &GeometryRouter {
        &self.router
    }
}

impl ShapeProperties for QuantityCalculator<'_> {
    fn surface_area(&self, element: &DecodedEntity, decoder: &mut EntityDecoder) -> Result<f64> {
        let mesh = self
            .router
            .process_element_with_voids(element, decoder, self.voids)?;
        Ok(mesh.surface_area())
    }

    fn volume(&self, element: &DecodedEntity, decoder: &mut EntityDecoder) -> Result<f64> {
        let mesh = self
            .router
            .process_element_with_voids(element, decoder, self.voids)?;
        Ok(mesh.volume())
    }
}

/// Surface area, or `0.0` with a warning when the geometry cannot be built
pub fn area_or_zero<S: ShapeProperties + ?Sized>(
    shapes: &S,
    element: &DecodedEntity,
    decoder: &mut EntityDecoder,
) -> f64 {
    shapes
        .surface_area(element, decoder)
        .unwrap_or_else(|e| {
            warn_failed("area", element, &e);
            0.0
        })
}

/// Volume, or `0.0` with a warning when the geometry cannot be built
pub fn volume_or_zero<S: ShapeProperties + ?Sized>(
    shapes: &S,
    element: &DecodedEntity,
    decoder: &mut EntityDecoder,
) -> f64 {
    shapes.volume(element, decoder).unwrap_or_else(|e| {
        warn_failed("volume", element, &e);
        0.0
    })
}

fn warn_failed(quantity: &str, element: &DecodedEntity, error: &crate::Error) {
    tracing::warn!(
        element = element.id,
        name = element.get_string(2).unwrap_or("<unnamed>"),
        ifc_type = %element.ifc_type,
        quantity,
        error = %error,
        "Geometry failed, counting zero"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // 2 m x 0.2 m x 3 m wall in millimetres, placed at the origin
    const WALL: &str = r#"
#1=IFCPROJECT('p',$,'Project',$,$,$,$,$,#2);
#2=IFCUNITASSIGNMENT((#3));
#3=IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.);
#10=IFCCARTESIANPOINT((0.,0.,0.));
#11=IFCAXIS2PLACEMENT3D(#10,$,$);
#12=IFCLOCALPLACEMENT($,#11);
#13=IFCAXIS2PLACEMENT2D(#14,$);
#14=IFCCARTESIANPOINT((1000.,100.));
#15=IFCRECTANGLEPROFILEDEF(.AREA.,$,#13,2000.,200.);
#16=IFCDIRECTION((0.,0.,1.));
#17=IFCEXTRUDEDAREASOLID(#15,#11,#16,3000.);
#18=IFCSHAPEREPRESENTATION($,'Body','SweptSolid',(#17));
#19=IFCPRODUCTDEFINITIONSHAPE($,$,(#18));
#20=IFCWALL('w',$,'Wall',$,$,#12,#19,$);
#21=IFCWALL('x',$,'Ghost',$,$,#12,$,$);
"#;

    #[test]
    fn test_quantities_in_metres() {
        let model = IfcModel::from_content(WALL.to_string()).unwrap();
        let calculator = QuantityCalculator::for_model(&model);
        assert_eq!(calculator.router().unit_scale(), 0.001);

        let mut decoder = model.decoder();
        let wall = decoder.decode_by_id(20).unwrap();

        let volume = calculator.volume(&wall, &mut decoder).unwrap();
        assert_relative_eq!(volume, 1.2, epsilon = 1e-9);

        // 2 * (2*0.2 + 2*3 + 0.2*3)
        let area = calculator.surface_area(&wall, &mut decoder).unwrap();
        assert_relative_eq!(area, 14.0, epsilon = 1e-9);
    }

    // 4 m x 0.3 m x 3 m concrete wall with a 1 m x 2 m opening cut through it
    const WALL_WITH_OPENING: &str = r#"
#1=IFCPROJECT('p',$,'Project',$,$,$,$,$,#2);
#2=IFCUNITASSIGNMENT((#3));
#3=IFCSIUNIT(*,.LENGTHUNIT.,$,.METRE.);
#10=IFCCARTESIANPOINT((0.,0.,0.));
#11=IFCAXIS2PLACEMENT3D(#10,$,$);
#12=IFCLOCALPLACEMENT($,#11);
#13=IFCDIRECTION((0.,0.,1.));
#14=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,4.,0.3);
#15=IFCEXTRUDEDAREASOLID(#14,$,#13,3.);
#16=IFCSHAPEREPRESENTATION($,'Body','SweptSolid',(#15));
#17=IFCPRODUCTDEFINITIONSHAPE($,$,(#16));
#20=IFCWALL('w',$,'Wall',$,$,#12,#17,$);
#30=IFCCARTESIANPOINT((0.,0.,0.5));
#31=IFCAXIS2PLACEMENT3D(#30,$,$);
#32=IFCLOCALPLACEMENT(#12,#31);
#33=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,1.,0.5);
#34=IFCEXTRUDEDAREASOLID(#33,$,#13,2.);
#35=IFCSHAPEREPRESENTATION($,'Body','SweptSolid',(#34));
#36=IFCPRODUCTDEFINITIONSHAPE($,$,(#35));
#40=IFCOPENINGELEMENT('o',$,'Opening',$,$,#32,#36,$,.OPENING.);
#41=IFCRELVOIDSELEMENT('v',$,$,$,#20,#40);
#50=IFCMATERIAL('Concrete');
#51=IFCRELASSOCIATESMATERIAL('m',$,$,$,(#20),#50);
"#;

    #[test]
    fn test_openings_are_cut_from_hosts() {
        let model = IfcModel::from_content(WALL_WITH_OPENING.to_string()).unwrap();
        assert_eq!(model.openings_of(20), &[40]);

        let calculator = QuantityCalculator::for_model(&model);
        let mut decoder = model.decoder();
        let wall = decoder.decode_by_id(20).unwrap();

        let volume = calculator.volume(&wall, &mut decoder).unwrap();
        assert_relative_eq!(volume, 3.6 - 0.6, epsilon = 1e-6);

        // 28.2 full box, less two 1 x 2 faces, plus 0.3 deep reveals
        let area = calculator.surface_area(&wall, &mut decoder).unwrap();
        assert_relative_eq!(area, 28.2 - 4.0 + 1.8, epsilon = 1e-6);
    }

    #[test]
    fn test_missing_geometry_counts_zero() {
        let model = IfcModel::from_content(WALL.to_string()).unwrap();
        let calculator = QuantityCalculator::for_model(&model);
        let mut decoder = model.decoder();
        let ghost = decoder.decode_by_id(21).unwrap();

        assert!(calculator.volume(&ghost, &mut decoder).is_err());
        assert_eq!(volume_or_zero(&calculator, &ghost, &mut decoder), 0.0);
        assert_eq!(area_or_zero(&calculator, &ghost, &mut decoder), 0.0);
    }
}
