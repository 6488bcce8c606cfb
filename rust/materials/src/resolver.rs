// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material resolver - classifies an element's material association
//!
//! Follows `IfcRelAssociatesMaterial.RelatingMaterial` for each relationship
//! attached to the element, in file order.

use crate::error::{Error, Result};
use crate::model::IfcModel;
use ifc_lite_core::{DecodedEntity, EntityDecoder, IfcType};

/// An IfcMaterial
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub id: u32,
    pub name: Option<String>,
}

/// One IfcMaterialLayer of a layer set
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialLayer {
    pub material: Option<Material>,
    pub thickness: Option<f64>,
}

impl MaterialLayer {
    pub fn material_name(&self) -> Option<&str> {
        self.material.as_ref().and_then(|m| m.name.as_deref())
    }
}

/// The supported shapes of a relating material
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialAssociation {
    /// IfcMaterial: the element is entirely made of one material
    Single(Material),
    /// IfcMaterialList: unordered, not broken down by layer
    List(Vec<Material>),
    /// IfcMaterialLayerSetUsage: ordered layers of the referenced set
    LayeredUsage(Vec<MaterialLayer>),
}

impl MaterialAssociation {
    /// Whether the association holds no materials or layers
    pub fn is_empty(&self) -> bool {
        match self {
            MaterialAssociation::Single(_) => false,
            MaterialAssociation::List(materials) => materials.is_empty(),
            MaterialAssociation::LayeredUsage(layers) => layers.is_empty(),
        }
    }

    pub fn layers(&self) -> Option<&[MaterialLayer]> {
        match self {
            MaterialAssociation::LayeredUsage(layers) => Some(layers),
            _ => None,
        }
    }
}

/// Resolves material associations of a model's elements
///
/// Holds no cache of its own; decoding goes through the caller's decoder.
pub struct MaterialResolver<'m> {
    model: &'m IfcModel,
}

impl<'m> MaterialResolver<'m> {
    pub fn new(model: &'m IfcModel) -> Self {
        Self { model }
    }

    /// First association of a supported shape, or `None`
    ///
    /// Layer sets assigned without a usage, constituent sets and profile
    /// sets are passed over in favour of the next relationship.
    pub fn resolve(
        &self,
        element_id: u32,
        decoder: &mut EntityDecoder,
    ) -> Result<Option<MaterialAssociation>> {
        for &rel_id in self.model.associations_of(element_id) {
            let relating = self.relating_material(rel_id, decoder)?;

            let association = match relating.ifc_type {
                IfcType::IfcMaterialLayerSetUsage => {
                    MaterialAssociation::LayeredUsage(self.usage_layers(&relating, decoder)?)
                }
                IfcType::IfcMaterialList => {
                    let mut materials = Vec::new();
                    for material_id in relating.get_ref_list(0) {
                        materials.push(self.material(material_id, decoder)?);
                    }
                    MaterialAssociation::List(materials)
                }
                IfcType::IfcMaterial => MaterialAssociation::Single(to_material(&relating)),
                _ => continue,
            };

            return Ok(Some(association));
        }

        Ok(None)
    }

    /// The material of the first relationship pointing directly at an IfcMaterial
    pub fn direct_material(
        &self,
        element_id: u32,
        decoder: &mut EntityDecoder,
    ) -> Result<Option<Material>> {
        for &rel_id in self.model.associations_of(element_id) {
            let relating = self.relating_material(rel_id, decoder)?;
            if relating.ifc_type == IfcType::IfcMaterial {
                return Ok(Some(to_material(&relating)));
            }
        }
        Ok(None)
    }

    /// Layers of every IfcMaterialLayerSetUsage attached to the element, in file order
    pub fn layered_usages(
        &self,
        element_id: u32,
        decoder: &mut EntityDecoder,
    ) -> Result<Vec<Vec<MaterialLayer>>> {
        let mut usages = Vec::new();
        for &rel_id in self.model.associations_of(element_id) {
            let relating = self.relating_material(rel_id, decoder)?;
            if relating.ifc_type == IfcType::IfcMaterialLayerSetUsage {
                usages.push(self.usage_layers(&relating, decoder)?);
            }
        }
        Ok(usages)
    }

    /// Decode `IfcRelAssociatesMaterial.RelatingMaterial`
    fn relating_material(&self, rel_id: u32, decoder: &mut EntityDecoder) -> Result<DecodedEntity> {
        let rel = decoder.decode_by_id(rel_id)?;
        if rel.ifc_type != IfcType::IfcRelAssociatesMaterial {
            return Err(Error::malformed(
                rel_id,
                format!("expected IfcRelAssociatesMaterial, got {}", rel.ifc_type),
            ));
        }

        let material_id = rel
            .get_ref(5)
            .ok_or_else(|| Error::malformed(rel_id, "missing RelatingMaterial"))?;
        Ok(decoder.decode_by_id(material_id)?)
    }

    /// IfcMaterialLayerSetUsage -> ForLayerSet -> MaterialLayers
    fn usage_layers(
        &self,
        usage: &DecodedEntity,
        decoder: &mut EntityDecoder,
    ) -> Result<Vec<MaterialLayer>> {
        let set_id = usage
            .get_ref(0)
            .ok_or_else(|| Error::malformed(usage.id, "layer set usage without ForLayerSet"))?;
        let layer_set = decoder.decode_by_id(set_id)?;
        if layer_set.ifc_type != IfcType::IfcMaterialLayerSet {
            return Err(Error::malformed(
                usage.id,
                format!("ForLayerSet is {}", layer_set.ifc_type),
            ));
        }

        let mut layers = Vec::new();
        for layer_id in layer_set.get_ref_list(0) {
            // IfcMaterialLayer: Material, LayerThickness, IsVentilated, ...
            let layer = decoder.decode_by_id(layer_id)?;
            if layer.ifc_type != IfcType::IfcMaterialLayer {
                return Err(Error::malformed(
                    layer_set.id,
                    format!("layer #{} is {}", layer_id, layer.ifc_type),
                ));
            }

            let material = match layer.get_ref(0) {
                Some(material_id) => Some(self.material(material_id, decoder)?),
                None => None,
            };
            layers.push(MaterialLayer {
                material,
                thickness: layer.get_float(1),
            });
        }
        Ok(layers)
    }

    fn material(&self, material_id: u32, decoder: &mut EntityDecoder) -> Result<Material> {
        let entity = decoder.decode_by_id(material_id)?;
        if entity.ifc_type != IfcType::IfcMaterial {
            return Err(Error::malformed(
                material_id,
                format!("expected IfcMaterial, got {}", entity.ifc_type),
            ));
        }
        Ok(to_material(&entity))
    }
}

fn to_material(entity: &DecodedEntity) -> Material {
    Material {
        id: entity.id,
        name: entity.get_string(0).map(str::to_owned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL: &str = r#"
#1=IFCWALL('w1',$,'Layered',$,$,$,$,$);
#2=IFCWALL('w2',$,'Single',$,$,$,$,$);
#3=IFCBEAM('b1',$,'Listed',$,$,$,$,$);
#4=IFCWALL('w3',$,'Unsupported first',$,$,$,$,$);
#5=IFCSLAB('s1',$,'Bare',$,$,$,$,$,$);
#6=IFCCOLUMN('c1',$,'Only set',$,$,$,$,$);
#10=IFCMATERIAL('Brick');
#11=IFCMATERIAL('Concrete');
#12=IFCMATERIAL('Steel');
#20=IFCMATERIALLAYER(#10,0.1,$);
#21=IFCMATERIALLAYER(#11,0.2,$);
#22=IFCMATERIALLAYER($,0.05,.T.);
#23=IFCMATERIALLAYERSET((#20,#21,#22),'Brick wall');
#24=IFCMATERIALLAYERSETUSAGE(#23,.AXIS2.,.POSITIVE.,0.);
#25=IFCMATERIALLIST((#11,#12));
#30=IFCRELASSOCIATESMATERIAL('r1',$,$,$,(#1),#24);
#31=IFCRELASSOCIATESMATERIAL('r2',$,$,$,(#2,#1),#11);
#32=IFCRELASSOCIATESMATERIAL('r3',$,$,$,(#3),#25);
#33=IFCRELASSOCIATESMATERIAL('r4',$,$,$,(#4,#6),#23);
#34=IFCRELASSOCIATESMATERIAL('r5',$,$,$,(#4),#12);
"#;

    fn model() -> IfcModel {
        IfcModel::from_content(MODEL.to_string()).unwrap()
    }

    #[test]
    fn test_layered_usage() {
        let model = model();
        let mut decoder = model.decoder();
        let resolver = MaterialResolver::new(&model);

        let association = resolver.resolve(1, &mut decoder).unwrap().unwrap();
        let layers = association.layers().unwrap();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].material_name(), Some("Brick"));
        assert_eq!(layers[1].thickness, Some(0.2));
        assert_eq!(layers[2].material, None);
    }

    #[test]
    fn test_single_and_direct() {
        let model = model();
        let mut decoder = model.decoder();
        let resolver = MaterialResolver::new(&model);

        let association = resolver.resolve(2, &mut decoder).unwrap().unwrap();
        assert_eq!(
            association,
            MaterialAssociation::Single(Material {
                id: 11,
                name: Some("Concrete".into())
            })
        );

        // The layered wall also has a direct material through a later relation
        let direct = resolver.direct_material(1, &mut decoder).unwrap().unwrap();
        assert_eq!(direct.name.as_deref(), Some("Concrete"));
    }

    #[test]
    fn test_material_list() {
        let model = model();
        let mut decoder = model.decoder();
        let resolver = MaterialResolver::new(&model);

        match resolver.resolve(3, &mut decoder).unwrap() {
            Some(MaterialAssociation::List(materials)) => {
                let names: Vec<_> = materials.iter().map(|m| m.name.as_deref()).collect();
                assert_eq!(names, vec![Some("Concrete"), Some("Steel")]);
            }
            other => panic!("expected list, got {:?}", other),
        }
        assert_eq!(resolver.direct_material(3, &mut decoder).unwrap(), None);
    }

    #[test]
    fn test_unsupported_shape_falls_through_to_next_relation() {
        let model = model();
        let mut decoder = model.decoder();
        let resolver = MaterialResolver::new(&model);

        let association = resolver.resolve(4, &mut decoder).unwrap().unwrap();
        assert!(matches!(association, MaterialAssociation::Single(ref m) if m.id == 12));

        // A bare layer set is not an association on its own
        assert_eq!(resolver.resolve(6, &mut decoder).unwrap(), None);
        assert!(resolver.layered_usages(6, &mut decoder).unwrap().is_empty());
    }

    #[test]
    fn test_no_association() {
        let model = model();
        let mut decoder = model.decoder();
        let resolver = MaterialResolver::new(&model);

        assert_eq!(resolver.resolve(5, &mut decoder).unwrap(), None);
        assert_eq!(resolver.direct_material(5, &mut decoder).unwrap(), None);
    }

    #[test]
    fn test_dangling_material_is_an_error() {
        let content = "#1=IFCWALL('w',$,$,$,$,$,$,$);\n#2=IFCRELASSOCIATESMATERIAL('r',$,$,$,(#1),#99);";
        let model = IfcModel::from_content(content.to_string()).unwrap();
        let mut decoder = model.decoder();
        let resolver = MaterialResolver::new(&model);

        assert!(resolver.resolve(1, &mut decoder).is_err());
    }

    #[test]
    fn test_empty_list_is_empty() {
        assert!(MaterialAssociation::List(Vec::new()).is_empty());
        assert!(MaterialAssociation::LayeredUsage(Vec::new()).is_empty());
        assert!(!MaterialAssociation::Single(Material { id: 1, name: None }).is_empty());
    }
}
