// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Schema - decoded attribute values and geometry routing tables
//!
//! All types are handled generically through enum dispatch.

use crate::parser::{decode_step_string, Token};
use crate::schema::IfcType;
use rustc_hash::FxHashMap;

/// Geometry representation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryCategory {
    SweptSolid,
    Boolean,
    ExplicitMesh,
    MappedItem,
}

/// Profile definition categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileCategory {
    Parametric,
    Arbitrary,
    Composite,
}

/// IFC entity attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Entity reference
    EntityRef(u32),
    /// String value (STEP escapes decoded)
    String(String),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Enum value (without the surrounding dots)
    Enum(String),
    /// List of values
    List(Vec<AttributeValue>),
    /// Typed value, e.g. IFCLENGTHMEASURE(0.3048)
    Typed(String, Vec<AttributeValue>),
    /// Null/undefined
    Null,
    /// Derived value (*)
    Derived,
}

impl AttributeValue {
    /// Convert from Token
    pub fn from_token(token: &Token) -> Self {
        match token {
            Token::EntityRef(id) => AttributeValue::EntityRef(*id),
            Token::String(s) => AttributeValue::String(decode_step_string(s)),
            Token::Integer(i) => AttributeValue::Integer(*i),
            Token::Float(f) => AttributeValue::Float(*f),
            Token::Enum(e) => AttributeValue::Enum(e.to_string()),
            Token::List(items) => {
                AttributeValue::List(items.iter().map(Self::from_token).collect())
            }
            Token::TypedValue(type_name, args) => AttributeValue::Typed(
                type_name.to_string(),
                args.iter().map(Self::from_token).collect(),
            ),
            Token::Null => AttributeValue::Null,
            Token::Derived => AttributeValue::Derived,
        }
    }

    /// Get as entity reference
    #[inline]
    pub fn as_entity_ref(&self) -> Option<u32> {
        match self {
            AttributeValue::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Get as string (looks through IFCLABEL('...') style wrappers)
    #[inline]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            AttributeValue::Typed(_, args) if args.len() == 1 => args[0].as_string(),
            _ => None,
        }
    }

    /// Get as enum value
    #[inline]
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            AttributeValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Get as boolean from a STEP logical (.T. / .F.)
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self.as_enum()? {
            "T" | "TRUE" => Some(true),
            "F" | "FALSE" => Some(false),
            _ => None,
        }
    }

    /// Get as float (integers and single-value measures included)
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::Typed(_, args) if args.len() == 1 => args[0].as_float(),
            _ => None,
        }
    }

    /// Get as integer
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            AttributeValue::Float(f) => Some(*f as i64),
            _ => None,
        }
    }

    /// Get as list
    #[inline]
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check if null/derived
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null | AttributeValue::Derived)
    }

    /// Batch parse 3D coordinates from a list of coordinate triples
    /// Missing components default to 0.0
    pub fn parse_coordinate_list_3d(coord_list: &[AttributeValue]) -> Vec<[f64; 3]> {
        coord_list
            .iter()
            .filter_map(|coord_attr| {
                let coord = coord_attr.as_list()?;
                let x = coord.first().and_then(|v| v.as_float()).unwrap_or(0.0);
                let y = coord.get(1).and_then(|v| v.as_float()).unwrap_or(0.0);
                let z = coord.get(2).and_then(|v| v.as_float()).unwrap_or(0.0);
                Some([x, y, z])
            })
            .collect()
    }

    /// Batch parse 2D coordinates from a list of coordinate pairs
    pub fn parse_coordinate_list_2d(coord_list: &[AttributeValue]) -> Vec<[f64; 2]> {
        coord_list
            .iter()
            .filter_map(|coord_attr| {
                let coord = coord_attr.as_list()?;
                let x = coord.first().and_then(|v| v.as_float()).unwrap_or(0.0);
                let y = coord.get(1).and_then(|v| v.as_float()).unwrap_or(0.0);
                Some([x, y])
            })
            .collect()
    }

    /// Parse a list of index tuples, converting from 1-based IFC indices to 0-based.
    /// Non-positive indices are dropped.
    pub fn parse_index_tuples(face_list: &[AttributeValue]) -> Vec<Vec<u32>> {
        face_list
            .iter()
            .filter_map(|face_attr| {
                let face = face_attr.as_list()?;
                Some(
                    face.iter()
                        .filter_map(|v| v.as_int())
                        .filter(|&i| i > 0)
                        .map(|i| (i - 1) as u32)
                        .collect(),
                )
            })
            .collect()
    }
}

/// Decoded IFC entity with attributes
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEntity {
    pub id: u32,
    pub ifc_type: IfcType,
    pub attributes: Vec<AttributeValue>,
}

impl DecodedEntity {
    /// Create new decoded entity
    pub fn new(id: u32, ifc_type: IfcType, attributes: Vec<AttributeValue>) -> Self {
        Self {
            id,
            ifc_type,
            attributes,
        }
    }

    /// Get attribute by index
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    /// Get entity reference attribute
    pub fn get_ref(&self, index: usize) -> Option<u32> {
        self.get(index).and_then(|v| v.as_entity_ref())
    }

    /// Get string attribute
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| v.as_string())
    }

    /// Get float attribute
    pub fn get_float(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(|v| v.as_float())
    }

    /// Get enum attribute
    pub fn get_enum(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| v.as_enum())
    }

    /// Get list attribute
    pub fn get_list(&self, index: usize) -> Option<&[AttributeValue]> {
        self.get(index).and_then(|v| v.as_list())
    }

    /// Entity references held in a list attribute, in order
    pub fn get_ref_list(&self, index: usize) -> Vec<u32> {
        self.get_list(index)
            .map(|items| items.iter().filter_map(|v| v.as_entity_ref()).collect())
            .unwrap_or_default()
    }
}

/// IFC schema metadata for geometry routing
#[derive(Clone)]
pub struct IfcSchema {
    /// Geometry representation types (for routing)
    pub geometry_types: FxHashMap<IfcType, GeometryCategory>,
    /// Profile types
    pub profile_types: FxHashMap<IfcType, ProfileCategory>,
}

impl IfcSchema {
    /// Create schema with geometry type mappings
    pub fn new() -> Self {
        let mut geometry_types = FxHashMap::default();
        let mut profile_types = FxHashMap::default();

        geometry_types.insert(IfcType::IfcExtrudedAreaSolid, GeometryCategory::SweptSolid);

        geometry_types.insert(IfcType::IfcBooleanResult, GeometryCategory::Boolean);
        geometry_types.insert(IfcType::IfcBooleanClippingResult, GeometryCategory::Boolean);

        geometry_types.insert(IfcType::IfcFacetedBrep, GeometryCategory::ExplicitMesh);
        geometry_types.insert(IfcType::IfcTriangulatedFaceSet, GeometryCategory::ExplicitMesh);
        geometry_types.insert(IfcType::IfcPolygonalFaceSet, GeometryCategory::ExplicitMesh);

        geometry_types.insert(IfcType::IfcMappedItem, GeometryCategory::MappedItem);

        for t in [
            IfcType::IfcRectangleProfileDef,
            IfcType::IfcRectangleHollowProfileDef,
            IfcType::IfcCircleProfileDef,
            IfcType::IfcCircleHollowProfileDef,
            IfcType::IfcEllipseProfileDef,
            IfcType::IfcIShapeProfileDef,
            IfcType::IfcLShapeProfileDef,
            IfcType::IfcUShapeProfileDef,
            IfcType::IfcTShapeProfileDef,
        ] {
            profile_types.insert(t, ProfileCategory::Parametric);
        }

        profile_types.insert(IfcType::IfcArbitraryClosedProfileDef, ProfileCategory::Arbitrary);
        profile_types.insert(IfcType::IfcArbitraryProfileDefWithVoids, ProfileCategory::Arbitrary);

        profile_types.insert(IfcType::IfcCompositeProfileDef, ProfileCategory::Composite);

        Self {
            geometry_types,
            profile_types,
        }
    }

    /// Get geometry category for a type
    pub fn geometry_category(&self, ifc_type: &IfcType) -> Option<GeometryCategory> {
        self.geometry_types.get(ifc_type).copied()
    }

    /// Get profile category for a type
    pub fn profile_category(&self, ifc_type: &IfcType) -> Option<ProfileCategory> {
        self.profile_types.get(ifc_type).copied()
    }

    /// Check if type is a geometry representation item we can process
    pub fn is_geometry_type(&self, ifc_type: &IfcType) -> bool {
        self.geometry_types.contains_key(ifc_type)
    }
}

impl Default for IfcSchema {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_geometry_categories() {
        let schema = IfcSchema::new();

        assert_eq!(
            schema.geometry_category(&IfcType::IfcExtrudedAreaSolid),
            Some(GeometryCategory::SweptSolid)
        );
        assert_eq!(
            schema.geometry_category(&IfcType::IfcBooleanClippingResult),
            Some(GeometryCategory::Boolean)
        );
        assert_eq!(
            schema.profile_category(&IfcType::IfcArbitraryProfileDefWithVoids),
            Some(ProfileCategory::Arbitrary)
        );
        assert!(!schema.is_geometry_type(&IfcType::IfcWall));
    }

    #[test]
    fn test_string_tokens_are_decoded() {
        let attr = AttributeValue::from_token(&Token::String("B\\X2\\00E9\\X0\\ton"));
        assert_eq!(attr.as_string(), Some("Béton"));
    }

    #[test]
    fn test_typed_measure_reads_as_float() {
        let attr = AttributeValue::from_token(&Token::TypedValue(
            "IFCLENGTHMEASURE",
            vec![Token::Float(0.3048)],
        ));
        assert_eq!(attr.as_float(), Some(0.3048));
        assert!(attr.as_list().is_none());
    }

    #[test]
    fn test_logical_as_bool() {
        assert_eq!(AttributeValue::Enum("T".into()).as_bool(), Some(true));
        assert_eq!(AttributeValue::Enum("F".into()).as_bool(), Some(false));
        assert_eq!(AttributeValue::Enum("U".into()).as_bool(), None);
    }

    #[test]
    fn test_parse_index_tuples() {
        let faces = vec![
            AttributeValue::List(vec![
                AttributeValue::Integer(1),
                AttributeValue::Integer(2),
                AttributeValue::Integer(3),
            ]),
            AttributeValue::List(vec![
                AttributeValue::Integer(3),
                AttributeValue::Integer(4),
                AttributeValue::Integer(1),
                AttributeValue::Integer(2),
            ]),
        ];
        assert_eq!(
            AttributeValue::parse_index_tuples(&faces),
            vec![vec![0, 1, 2], vec![2, 3, 0, 1]]
        );
    }

    #[test]
    fn test_decoded_entity() {
        let entity = DecodedEntity::new(
            1,
            IfcType::IfcMaterialList,
            vec![AttributeValue::List(vec![
                AttributeValue::EntityRef(2),
                AttributeValue::EntityRef(3),
            ])],
        );

        assert_eq!(entity.get_ref_list(0), vec![2, 3]);
        assert!(entity.get_ref_list(4).is_empty());
        assert_eq!(entity.get_string(0), None);
    }
}
