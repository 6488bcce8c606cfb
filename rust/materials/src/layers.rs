// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layer extraction for IfcMaterialLayerSetUsage associations
//!
//! Thicknesses are taken as written in the model, without unit conversion.

use crate::error::Result;
use crate::resolver::{MaterialLayer, MaterialResolver};
use ifc_lite_core::EntityDecoder;
use serde::Serialize;

/// `(material name, thickness)` of one layer, serialized as a two-element array
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerEntry(pub Option<String>, pub f64);

impl LayerEntry {
    pub fn name(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn thickness(&self) -> f64 {
        self.1
    }

    /// Case-insensitive substring match on the layer's material name
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.0
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(needle_lower))
    }
}

/// Layers of an element and the sum of their thicknesses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerSummary {
    pub layers: Vec<LayerEntry>,
    pub total_thickness: f64,
}

impl LayerSummary {
    /// Summarise the layers of one usage; layers without a thickness are skipped
    pub fn from_layers(layers: &[MaterialLayer]) -> Self {
        let mut summary = Self::default();
        summary.extend(layers);
        summary
    }

    fn extend(&mut self, layers: &[MaterialLayer]) {
        for layer in layers {
            let Some(thickness) = layer.thickness else {
                continue;
            };
            self.layers
                .push(LayerEntry(layer.material_name().map(str::to_owned), thickness));
            self.total_thickness += thickness;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers whose material name contains `needle_lower`
    pub fn matching(&self, needle_lower: &str) -> Vec<LayerEntry> {
        self.layers
            .iter()
            .filter(|layer| layer.matches(needle_lower))
            .cloned()
            .collect()
    }
}

/// Walk every layer set usage attached to an element
///
/// No usage gives an empty summary with zero thickness.
pub fn extract_layers(
    resolver: &MaterialResolver,
    element_id: u32,
    decoder: &mut EntityDecoder,
) -> Result<LayerSummary> {
    let mut summary = LayerSummary::default();
    for usage in resolver.layered_usages(element_id, decoder)? {
        summary.extend(&usage);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IfcModel;
    use crate::resolver::Material;

    fn layer(name: Option<&str>, thickness: Option<f64>) -> MaterialLayer {
        MaterialLayer {
            material: Some(Material {
                id: 0,
                name: name.map(str::to_owned),
            }),
            thickness,
        }
    }

    #[test]
    fn test_summary_skips_layers_without_thickness() {
        let summary = LayerSummary::from_layers(&[
            layer(Some("Brick"), Some(0.1)),
            layer(Some("Insulation"), None),
            layer(Some("Concrete"), Some(0.2)),
        ]);

        assert_eq!(summary.layers.len(), 2);
        assert!((summary.total_thickness - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_unnamed_layer_counts_towards_thickness() {
        let summary = LayerSummary::from_layers(&[
            MaterialLayer {
                material: None,
                thickness: Some(0.05),
            },
            layer(Some("Concrete"), Some(0.2)),
        ]);

        assert_eq!(summary.layers[0], LayerEntry(None, 0.05));
        assert!((summary.total_thickness - 0.25).abs() < 1e-12);
        assert_eq!(summary.matching("concrete").len(), 1);
    }

    #[test]
    fn test_matching_is_case_insensitive_substring() {
        let summary = LayerSummary::from_layers(&[
            layer(Some("Brick"), Some(0.1)),
            layer(Some("Reinforced CONCRETE"), Some(0.2)),
        ]);

        let matches = summary.matching("concrete");
        assert_eq!(
            matches,
            vec![LayerEntry(Some("Reinforced CONCRETE".into()), 0.2)]
        );
        assert!(summary.matching("steel").is_empty());
    }

    #[test]
    fn test_layer_entry_serializes_as_pair() {
        let json = serde_json::to_string(&LayerEntry(Some("Brick".into()), 0.1)).unwrap();
        assert_eq!(json, r#"["Brick",0.1]"#);

        let json = serde_json::to_string(&LayerEntry(None, 0.05)).unwrap();
        assert_eq!(json, "[null,0.05]");
    }

    #[test]
    fn test_extract_walks_all_usages() {
        let content = r#"
#1=IFCWALL('w',$,'Wall',$,$,$,$,$);
#2=IFCSLAB('s',$,'Slab',$,$,$,$,$,$);
#10=IFCMATERIAL('Brick');
#11=IFCMATERIAL('Concrete');
#20=IFCMATERIALLAYER(#10,100.,$);
#21=IFCMATERIALLAYER(#11,200.,$);
#22=IFCMATERIALLAYERSET((#20),$);
#23=IFCMATERIALLAYERSET((#21),$);
#24=IFCMATERIALLAYERSETUSAGE(#22,.AXIS2.,.POSITIVE.,0.);
#25=IFCMATERIALLAYERSETUSAGE(#23,.AXIS2.,.POSITIVE.,0.);
#30=IFCRELASSOCIATESMATERIAL('r1',$,$,$,(#1),#24);
#31=IFCRELASSOCIATESMATERIAL('r2',$,$,$,(#1),#25);
"#;
        let model = IfcModel::from_content(content.to_string()).unwrap();
        let resolver = MaterialResolver::new(&model);
        let mut decoder = model.decoder();

        let summary = extract_layers(&resolver, 1, &mut decoder).unwrap();
        assert_eq!(
            summary.layers,
            vec![
                LayerEntry(Some("Brick".into()), 100.0),
                LayerEntry(Some("Concrete".into()), 200.0),
            ]
        );
        assert_eq!(summary.total_thickness, 300.0);

        let empty = extract_layers(&resolver, 2, &mut decoder).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.total_thickness, 0.0);
    }
}
