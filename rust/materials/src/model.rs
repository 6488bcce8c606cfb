// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model store - one parsed IFC file held for the process lifetime
//!
//! Loading scans the DATA section once. Element spans, the inverse material
//! association index and the opening index are kept in file order. Everything
//! else is decoded lazily through per-query [`EntityDecoder`]s that share the
//! immutable content and entity index.

use crate::error::{Error, Result};
use ifc_lite_core::{
    build_entity_index, extract_length_unit_scale, EntityDecoder, EntityIndex, EntityScanner,
    IfcType,
};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Schema reported when the header carries no FILE_SCHEMA
const DEFAULT_SCHEMA: &str = "IFC2X3";

/// An IfcElement subtype instance located in the content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementRef {
    pub id: u32,
    pub ifc_type: IfcType,
    pub start: usize,
    pub end: usize,
}

/// Counts describing a loaded model
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModelSummary {
    pub schema_version: String,
    pub entity_count: usize,
    pub element_count: usize,
    pub material_relation_count: usize,
    pub void_relation_count: usize,
    pub length_unit_scale: f64,
}

/// A loaded, read-only IFC model
pub struct IfcModel {
    content: String,
    index: Arc<EntityIndex>,
    elements: Vec<ElementRef>,
    /// Element id -> IfcRelAssociatesMaterial ids, file order
    associations: FxHashMap<u32, Vec<u32>>,
    material_relation_count: usize,
    /// Host element id -> opening element ids, file order
    voids: FxHashMap<u32, Vec<u32>>,
    void_relation_count: usize,
    schema_version: String,
    length_unit_scale: f64,
}

impl IfcModel {
    /// Read and index a model from disk
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8_lossy(&bytes).into_owned();

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Read model file");
        Self::from_content(content)
    }

    /// Index a model held in memory
    pub fn from_content(content: String) -> Result<Self> {
        let index = Arc::new(build_entity_index(&content));
        if index.is_empty() {
            return Err(Error::EmptyModel);
        }

        let mut elements = Vec::new();
        let mut relation_ids = Vec::new();
        let mut void_relation_ids = Vec::new();
        let mut project_id = None;

        let mut scanner = EntityScanner::new(&content);
        while let Some((id, type_name, start, end)) = scanner.next_entity() {
            let ifc_type = IfcType::from_name(type_name);
            if ifc_type.is_element() {
                elements.push(ElementRef {
                    id,
                    ifc_type,
                    start,
                    end,
                });
            } else if ifc_type == IfcType::IfcRelAssociatesMaterial {
                relation_ids.push(id);
            } else if ifc_type == IfcType::IfcRelVoidsElement {
                void_relation_ids.push(id);
            } else if ifc_type == IfcType::IfcProject && project_id.is_none() {
                project_id = Some(id);
            }
        }

        let mut decoder = EntityDecoder::with_arc_index(&content, Arc::clone(&index));

        // IfcRelAssociatesMaterial: RelatedObjects (4), RelatingMaterial (5)
        let mut associations: FxHashMap<u32, Vec<u32>> = FxHashMap::default();
        for &rel_id in &relation_ids {
            let rel = decoder.decode_by_id(rel_id)?;
            for object_id in rel.get_ref_list(4) {
                associations.entry(object_id).or_default().push(rel_id);
            }
        }

        // IfcRelVoidsElement: RelatingBuildingElement (4), RelatedOpeningElement (5)
        let mut voids: FxHashMap<u32, Vec<u32>> = FxHashMap::default();
        for &rel_id in &void_relation_ids {
            let rel = decoder.decode_by_id(rel_id)?;
            if let (Some(host), Some(opening)) = (rel.get_ref(4), rel.get_ref(5)) {
                voids.entry(host).or_default().push(opening);
            }
        }

        let length_unit_scale = match project_id {
            Some(id) => extract_length_unit_scale(&mut decoder, id).unwrap_or_else(|e| {
                tracing::warn!(project = id, error = %e, "Length unit unreadable, assuming metres");
                1.0
            }),
            None => 1.0,
        };

        let schema_version = detect_schema_version(&content);
        drop(decoder);

        tracing::debug!(
            entities = index.len(),
            elements = elements.len(),
            relations = relation_ids.len(),
            voids = void_relation_ids.len(),
            schema = %schema_version,
            length_unit_scale,
            "Indexed model"
        );

        Ok(Self {
            content,
            index,
            elements,
            associations,
            material_relation_count: relation_ids.len(),
            voids,
            void_relation_count: void_relation_ids.len(),
            schema_version,
            length_unit_scale,
        })
    }

    /// Fresh decoder with a private cache over the shared content
    pub fn decoder(&self) -> EntityDecoder<'_> {
        EntityDecoder::with_arc_index(&self.content, Arc::clone(&self.index))
    }

    /// Elements in file order
    pub fn elements(&self) -> &[ElementRef] {
        &self.elements
    }

    /// Material relationship ids attached to an element, in file order
    pub fn associations_of(&self, element_id: u32) -> &[u32] {
        self.associations
            .get(&element_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Opening element ids cut from a host element, in file order
    pub fn openings_of(&self, element_id: u32) -> &[u32] {
        self.voids
            .get(&element_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Host element id -> opening element ids
    pub fn void_index(&self) -> &FxHashMap<u32, Vec<u32>> {
        &self.voids
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn entity_count(&self) -> usize {
        self.index.len()
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    /// Multiplier from model length units to metres
    pub fn length_unit_scale(&self) -> f64 {
        self.length_unit_scale
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            schema_version: self.schema_version.clone(),
            entity_count: self.entity_count(),
            element_count: self.element_count(),
            material_relation_count: self.material_relation_count,
            void_relation_count: self.void_relation_count,
            length_unit_scale: self.length_unit_scale,
        }
    }
}

/// First schema identifier in the header's FILE_SCHEMA, e.g. `IFC4`
fn detect_schema_version(content: &str) -> String {
    let header_end = content.find("DATA;").unwrap_or(content.len());
    let header = &content[..header_end];

    header
        .find("FILE_SCHEMA")
        .and_then(|pos| {
            let rest = &header[pos..];
            let open = rest.find('\'')? + 1;
            let close = rest[open..].find('\'')? + open;
            Some(rest[open..close].trim().to_ascii_uppercase())
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SCHEMA.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');
FILE_NAME('small.ifc','2024-01-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCPROJECT('0YvctVUKr0kugbFTf53O9L',$,'Project',$,$,$,$,$,#2);
#2=IFCUNITASSIGNMENT((#3));
#3=IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.);
#10=IFCWALL('1',$,'Wall A',$,$,$,$,$,$);
#11=IFCSLAB('2',$,'Slab A',$,$,$,$,$,$);
#12=IFCBUILDINGSTOREY('3',$,'Level 1',$,$,$,$,$,.ELEMENT.,0.);
#20=IFCMATERIAL('Concrete');
#21=IFCMATERIAL('Steel');
#30=IFCRELASSOCIATESMATERIAL('4',$,$,$,(#10,#11),#20);
#31=IFCRELASSOCIATESMATERIAL('5',$,$,$,(#10),#21);
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn test_indexes_elements_and_associations() {
        let model = IfcModel::from_content(SMALL.to_string()).unwrap();

        let ids: Vec<u32> = model.elements().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![10, 11]);
        assert_eq!(model.elements()[0].ifc_type, IfcType::IfcWall);

        assert_eq!(model.associations_of(10), &[30, 31]);
        assert_eq!(model.associations_of(11), &[30]);
        assert!(model.associations_of(12).is_empty());
    }

    #[test]
    fn test_summary() {
        let model = IfcModel::from_content(SMALL.to_string()).unwrap();
        let summary = model.summary();

        assert_eq!(summary.schema_version, "IFC4");
        assert_eq!(summary.element_count, 2);
        assert_eq!(summary.entity_count, 10);
        assert_eq!(summary.material_relation_count, 2);
        assert_eq!(summary.void_relation_count, 0);
        assert_eq!(summary.length_unit_scale, 0.001);
    }

    #[test]
    fn test_distribution_elements_are_indexed() {
        let content = r#"DATA;
#1=IFCVALVE('1',$,'Valve',$,$,$,$,$,$);
#2=IFCELECTRICAPPLIANCE('2',$,'Appliance',$,$,$,$,$,$);
#3=IFCAIRTERMINAL('3',$,'Terminal',$,$,$,$,$,$);
#4=IFCTANK('4',$,'Tank',$,$,$,$,$,$);
#5=IFCFLOWSTORAGEDEVICE('5',$,'Legacy tank',$,$,$,$,$);
#6=IFCSPACE('6',$,'Room',$,$,$,$,$,.ELEMENT.,.INTERNAL.,$);
#10=IFCMATERIAL('Steel');
#20=IFCRELASSOCIATESMATERIAL('r',$,$,$,(#1,#2,#3,#4),#10);
ENDSEC;
"#;
        let model = IfcModel::from_content(content.to_string()).unwrap();

        let ids: Vec<u32> = model.elements().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(model.elements()[3].ifc_type, IfcType::IfcTank);
        for id in 1..=4 {
            assert_eq!(model.associations_of(id), &[20]);
        }
    }

    #[test]
    fn test_indexes_openings_by_host() {
        let content = r#"DATA;
#1=IFCWALL('1',$,'Wall',$,$,$,$,$);
#2=IFCOPENINGELEMENT('2',$,'Window hole',$,$,$,$,$,.OPENING.);
#3=IFCOPENINGELEMENT('3',$,'Door hole',$,$,$,$,$,.OPENING.);
#4=IFCRELVOIDSELEMENT('4',$,$,$,#1,#2);
#5=IFCRELVOIDSELEMENT('5',$,$,$,#1,#3);
#6=IFCRELVOIDSELEMENT('6',$,$,$,$,#3);
ENDSEC;
"#;
        let model = IfcModel::from_content(content.to_string()).unwrap();

        assert_eq!(model.openings_of(1), &[2, 3]);
        assert!(model.openings_of(2).is_empty());
        assert_eq!(model.void_index().len(), 1);
        assert_eq!(model.summary().void_relation_count, 3);
    }

    #[test]
    fn test_decoders_are_independent() {
        let model = IfcModel::from_content(SMALL.to_string()).unwrap();
        let mut first = model.decoder();
        let second = model.decoder();

        assert_eq!(first.decode_by_id(20).unwrap().get_string(0), Some("Concrete"));
        assert_eq!(first.cache_size(), 1);
        assert_eq!(second.cache_size(), 0);
    }

    #[test]
    fn test_schema_defaults_when_header_missing() {
        let model = IfcModel::from_content("#1=IFCMATERIAL('Brick');".to_string()).unwrap();
        assert_eq!(model.schema_version(), "IFC2X3");
        assert_eq!(model.length_unit_scale(), 1.0);
        assert_eq!(model.element_count(), 0);
    }

    #[test]
    fn test_empty_content_is_rejected() {
        assert!(matches!(
            IfcModel::from_content("ISO-10303-21;\nEND-ISO-10303-21;".to_string()),
            Err(Error::EmptyModel)
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            IfcModel::open("/nonexistent/model.ifc"),
            Err(Error::Io { .. })
        ));
    }
}
