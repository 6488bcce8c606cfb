// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Schema Types
//!
//! Fast type checking using an enum instead of string comparison.

use std::fmt;

macro_rules! ifc_types {
    (
        elements { $($ev:ident => $en:literal,)* }
        others { $($ov:ident => $on:literal,)* }
    ) => {
        /// IFC Entity Types
        /// IFC2X3 / IFC4 / IFC4X3 types used by material reporting and geometry
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum IfcType {
            $($ev,)*
            $($ov,)*
            /// Fallback for unknown types (hash of the upper-case name)
            Unknown(u16),
        }

        impl IfcType {
            /// Parse IFC type from an upper-case STEP type name
            fn from_upper(s: &str) -> Self {
                match s {
                    $($en => Self::$ev,)*
                    $($on => Self::$ov,)*
                    _ => Self::Unknown(simple_hash(s)),
                }
            }

            /// Get string representation
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$ev => $en,)*
                    $(Self::$ov => $on,)*
                    Self::Unknown(_) => "UNKNOWN",
                }
            }

            /// Check if this type is a subtype of IfcElement
            pub fn is_element(&self) -> bool {
                matches!(self, $(Self::$ev)|*)
            }
        }
    };
}

ifc_types! {
    elements {
        // Walls, slabs and other building elements
        IfcWall => "IFCWALL",
        IfcWallStandardCase => "IFCWALLSTANDARDCASE",
        IfcWallElementedCase => "IFCWALLELEMENTEDCASE",
        IfcSlab => "IFCSLAB",
        IfcSlabStandardCase => "IFCSLABSTANDARDCASE",
        IfcSlabElementedCase => "IFCSLABELEMENTEDCASE",
        IfcBeam => "IFCBEAM",
        IfcBeamStandardCase => "IFCBEAMSTANDARDCASE",
        IfcColumn => "IFCCOLUMN",
        IfcColumnStandardCase => "IFCCOLUMNSTANDARDCASE",
        IfcRoof => "IFCROOF",
        IfcStair => "IFCSTAIR",
        IfcStairFlight => "IFCSTAIRFLIGHT",
        IfcRamp => "IFCRAMP",
        IfcRampFlight => "IFCRAMPFLIGHT",
        IfcRailing => "IFCRAILING",
        IfcCurtainWall => "IFCCURTAINWALL",
        IfcPlate => "IFCPLATE",
        IfcPlateStandardCase => "IFCPLATESTANDARDCASE",
        IfcMember => "IFCMEMBER",
        IfcMemberStandardCase => "IFCMEMBERSTANDARDCASE",
        IfcFooting => "IFCFOOTING",
        IfcPile => "IFCPILE",
        IfcCovering => "IFCCOVERING",
        IfcChimney => "IFCCHIMNEY",
        IfcShadingDevice => "IFCSHADINGDEVICE",
        IfcBuildingElementProxy => "IFCBUILDINGELEMENTPROXY",
        IfcBuildingElementPart => "IFCBUILDINGELEMENTPART",
        IfcBuildingElementComponent => "IFCBUILDINGELEMENTCOMPONENT",
        IfcElementAssembly => "IFCELEMENTASSEMBLY",

        // IFC4X3 built elements
        IfcBuiltElement => "IFCBUILTELEMENT",
        IfcBearing => "IFCBEARING",
        IfcCourse => "IFCCOURSE",
        IfcDeepFoundation => "IFCDEEPFOUNDATION",
        IfcCaissonFoundation => "IFCCAISSONFOUNDATION",
        IfcEarthworksElement => "IFCEARTHWORKSELEMENT",
        IfcEarthworksFill => "IFCEARTHWORKSFILL",
        IfcEarthworksCut => "IFCEARTHWORKSCUT",
        IfcKerb => "IFCKERB",
        IfcMooringDevice => "IFCMOORINGDEVICE",
        IfcNavigationElement => "IFCNAVIGATIONELEMENT",
        IfcPavement => "IFCPAVEMENT",
        IfcRail => "IFCRAIL",
        IfcReinforcedSoil => "IFCREINFORCEDSOIL",
        IfcTrackElement => "IFCTRACKELEMENT",
        IfcSign => "IFCSIGN",
        IfcSignal => "IFCSIGNAL",
        IfcTendonConduit => "IFCTENDONCONDUIT",
        IfcVibrationDamper => "IFCVIBRATIONDAMPER",
        IfcImpactProtectionDevice => "IFCIMPACTPROTECTIONDEVICE",

        // Doors, windows and features
        IfcDoor => "IFCDOOR",
        IfcDoorStandardCase => "IFCDOORSTANDARDCASE",
        IfcWindow => "IFCWINDOW",
        IfcWindowStandardCase => "IFCWINDOWSTANDARDCASE",
        IfcOpeningElement => "IFCOPENINGELEMENT",
        IfcOpeningStandardCase => "IFCOPENINGSTANDARDCASE",
        IfcVoidingFeature => "IFCVOIDINGFEATURE",
        IfcProjectionElement => "IFCPROJECTIONELEMENT",
        IfcSurfaceFeature => "IFCSURFACEFEATURE",
        IfcEdgeFeature => "IFCEDGEFEATURE",
        IfcChamferEdgeFeature => "IFCCHAMFEREDGEFEATURE",
        IfcRoundedEdgeFeature => "IFCROUNDEDEDGEFEATURE",

        // Furnishing
        IfcFurnishingElement => "IFCFURNISHINGELEMENT",
        IfcFurniture => "IFCFURNITURE",
        IfcSystemFurnitureElement => "IFCSYSTEMFURNITUREELEMENT",

        // Distribution generics (IFC2X3 instances, IFC4 supertypes)
        IfcDistributionElement => "IFCDISTRIBUTIONELEMENT",
        IfcDistributionControlElement => "IFCDISTRIBUTIONCONTROLELEMENT",
        IfcDistributionFlowElement => "IFCDISTRIBUTIONFLOWELEMENT",
        IfcDistributionChamberElement => "IFCDISTRIBUTIONCHAMBERELEMENT",
        IfcEnergyConversionDevice => "IFCENERGYCONVERSIONDEVICE",
        IfcFlowController => "IFCFLOWCONTROLLER",
        IfcFlowFitting => "IFCFLOWFITTING",
        IfcFlowMovingDevice => "IFCFLOWMOVINGDEVICE",
        IfcFlowSegment => "IFCFLOWSEGMENT",
        IfcFlowStorageDevice => "IFCFLOWSTORAGEDEVICE",
        IfcFlowTerminal => "IFCFLOWTERMINAL",
        IfcFlowTreatmentDevice => "IFCFLOWTREATMENTDEVICE",

        // IFC2X3 only
        IfcEquipmentElement => "IFCEQUIPMENTELEMENT",
        IfcElectricDistributionPoint => "IFCELECTRICDISTRIBUTIONPOINT",
        IfcElectricalElement => "IFCELECTRICALELEMENT",

        // Distribution control
        IfcActuator => "IFCACTUATOR",
        IfcAlarm => "IFCALARM",
        IfcController => "IFCCONTROLLER",
        IfcFlowInstrument => "IFCFLOWINSTRUMENT",
        IfcProtectiveDeviceTrippingUnit => "IFCPROTECTIVEDEVICETRIPPINGUNIT",
        IfcSensor => "IFCSENSOR",
        IfcUnitaryControlElement => "IFCUNITARYCONTROLELEMENT",

        // Energy conversion devices
        IfcAirToAirHeatRecovery => "IFCAIRTOAIRHEATRECOVERY",
        IfcBoiler => "IFCBOILER",
        IfcBurner => "IFCBURNER",
        IfcChiller => "IFCCHILLER",
        IfcCoil => "IFCCOIL",
        IfcCondenser => "IFCCONDENSER",
        IfcCooledBeam => "IFCCOOLEDBEAM",
        IfcCoolingTower => "IFCCOOLINGTOWER",
        IfcElectricGenerator => "IFCELECTRICGENERATOR",
        IfcElectricMotor => "IFCELECTRICMOTOR",
        IfcEngine => "IFCENGINE",
        IfcEvaporativeCooler => "IFCEVAPORATIVECOOLER",
        IfcEvaporator => "IFCEVAPORATOR",
        IfcHeatExchanger => "IFCHEATEXCHANGER",
        IfcHumidifier => "IFCHUMIDIFIER",
        IfcMotorConnection => "IFCMOTORCONNECTION",
        IfcSolarDevice => "IFCSOLARDEVICE",
        IfcTransformer => "IFCTRANSFORMER",
        IfcTubeBundle => "IFCTUBEBUNDLE",
        IfcUnitaryEquipment => "IFCUNITARYEQUIPMENT",

        // Flow controllers
        IfcAirTerminalBox => "IFCAIRTERMINALBOX",
        IfcDamper => "IFCDAMPER",
        IfcDistributionBoard => "IFCDISTRIBUTIONBOARD",
        IfcElectricDistributionBoard => "IFCELECTRICDISTRIBUTIONBOARD",
        IfcElectricTimeControl => "IFCELECTRICTIMECONTROL",
        IfcFlowMeter => "IFCFLOWMETER",
        IfcProtectiveDevice => "IFCPROTECTIVEDEVICE",
        IfcSwitchingDevice => "IFCSWITCHINGDEVICE",
        IfcValve => "IFCVALVE",

        // Flow fittings and segments
        IfcCableCarrierFitting => "IFCCABLECARRIERFITTING",
        IfcCableFitting => "IFCCABLEFITTING",
        IfcDuctFitting => "IFCDUCTFITTING",
        IfcJunctionBox => "IFCJUNCTIONBOX",
        IfcPipeFitting => "IFCPIPEFITTING",
        IfcCableCarrierSegment => "IFCCABLECARRIERSEGMENT",
        IfcCableSegment => "IFCCABLESEGMENT",
        IfcConveyorSegment => "IFCCONVEYORSEGMENT",
        IfcDuctSegment => "IFCDUCTSEGMENT",
        IfcPipeSegment => "IFCPIPESEGMENT",

        // Flow moving and storage devices
        IfcCompressor => "IFCCOMPRESSOR",
        IfcFan => "IFCFAN",
        IfcPump => "IFCPUMP",
        IfcElectricFlowStorageDevice => "IFCELECTRICFLOWSTORAGEDEVICE",
        IfcTank => "IFCTANK",

        // Flow terminals
        IfcAirTerminal => "IFCAIRTERMINAL",
        IfcAudioVisualAppliance => "IFCAUDIOVISUALAPPLIANCE",
        IfcCommunicationsAppliance => "IFCCOMMUNICATIONSAPPLIANCE",
        IfcElectricAppliance => "IFCELECTRICAPPLIANCE",
        IfcFireSuppressionTerminal => "IFCFIRESUPPRESSIONTERMINAL",
        IfcLamp => "IFCLAMP",
        IfcLightFixture => "IFCLIGHTFIXTURE",
        IfcLiquidTerminal => "IFCLIQUIDTERMINAL",
        IfcMedicalDevice => "IFCMEDICALDEVICE",
        IfcMobileTelecommunicationsAppliance => "IFCMOBILETELECOMMUNICATIONSAPPLIANCE",
        IfcOutlet => "IFCOUTLET",
        IfcSanitaryTerminal => "IFCSANITARYTERMINAL",
        IfcSpaceHeater => "IFCSPACEHEATER",
        IfcStackTerminal => "IFCSTACKTERMINAL",
        IfcWasteTerminal => "IFCWASTETERMINAL",

        // Flow treatment devices
        IfcDuctSilencer => "IFCDUCTSILENCER",
        IfcElectricFlowTreatmentDevice => "IFCELECTRICFLOWTREATMENTDEVICE",
        IfcFilter => "IFCFILTER",
        IfcInterceptor => "IFCINTERCEPTOR",

        // Element components and reinforcement
        IfcDiscreteAccessory => "IFCDISCRETEACCESSORY",
        IfcMechanicalFastener => "IFCMECHANICALFASTENER",
        IfcFastener => "IFCFASTENER",
        IfcVibrationIsolator => "IFCVIBRATIONISOLATOR",
        IfcReinforcingBar => "IFCREINFORCINGBAR",
        IfcReinforcingMesh => "IFCREINFORCINGMESH",
        IfcTendon => "IFCTENDON",
        IfcTendonAnchor => "IFCTENDONANCHOR",

        // Geotechnics
        IfcGeotechnicalElement => "IFCGEOTECHNICALELEMENT",
        IfcGeotechnicalAssembly => "IFCGEOTECHNICALASSEMBLY",
        IfcGeotechnicalStratum => "IFCGEOTECHNICALSTRATUM",
        IfcBorehole => "IFCBOREHOLE",
        IfcGeomodel => "IFCGEOMODEL",
        IfcGeoslice => "IFCGEOSLICE",
        IfcSolidStratum => "IFCSOLIDSTRATUM",
        IfcVoidStratum => "IFCVOIDSTRATUM",
        IfcWaterStratum => "IFCWATERSTRATUM",

        // Other elements
        IfcGeographicElement => "IFCGEOGRAPHICELEMENT",
        IfcTransportElement => "IFCTRANSPORTELEMENT",
        IfcTransportationDevice => "IFCTRANSPORTATIONDEVICE",
        IfcVehicle => "IFCVEHICLE",
        IfcVirtualElement => "IFCVIRTUALELEMENT",
        IfcCivilElement => "IFCCIVILELEMENT",
    }

    others {
        // Spatial structure
        IfcSpace => "IFCSPACE",
        IfcBuildingStorey => "IFCBUILDINGSTOREY",
        IfcBuilding => "IFCBUILDING",
        IfcSite => "IFCSITE",
        IfcProject => "IFCPROJECT",

        // Relationships
        IfcRelAggregates => "IFCRELAGGREGATES",
        IfcRelContainedInSpatialStructure => "IFCRELCONTAINEDINSPATIALSTRUCTURE",
        IfcRelDefinesByProperties => "IFCRELDEFINESBYPROPERTIES",
        IfcRelAssociatesMaterial => "IFCRELASSOCIATESMATERIAL",
        IfcRelVoidsElement => "IFCRELVOIDSELEMENT",
        IfcRelFillsElement => "IFCRELFILLSELEMENT",

        // Materials
        IfcMaterial => "IFCMATERIAL",
        IfcMaterialList => "IFCMATERIALLIST",
        IfcMaterialLayer => "IFCMATERIALLAYER",
        IfcMaterialLayerSet => "IFCMATERIALLAYERSET",
        IfcMaterialLayerSetUsage => "IFCMATERIALLAYERSETUSAGE",
        IfcMaterialConstituentSet => "IFCMATERIALCONSTITUENTSET",
        IfcMaterialProfileSet => "IFCMATERIALPROFILESET",
        IfcMaterialProfileSetUsage => "IFCMATERIALPROFILESETUSAGE",

        // Units
        IfcUnitAssignment => "IFCUNITASSIGNMENT",
        IfcSIUnit => "IFCSIUNIT",
        IfcConversionBasedUnit => "IFCCONVERSIONBASEDUNIT",
        IfcMeasureWithUnit => "IFCMEASUREWITHUNIT",
        IfcDimensionalExponents => "IFCDIMENSIONALEXPONENTS",

        // Representation
        IfcProductDefinitionShape => "IFCPRODUCTDEFINITIONSHAPE",
        IfcShapeRepresentation => "IFCSHAPEREPRESENTATION",
        IfcRepresentationMap => "IFCREPRESENTATIONMAP",
        IfcMappedItem => "IFCMAPPEDITEM",

        // Placement
        IfcLocalPlacement => "IFCLOCALPLACEMENT",
        IfcAxis2Placement3D => "IFCAXIS2PLACEMENT3D",
        IfcAxis2Placement2D => "IFCAXIS2PLACEMENT2D",
        IfcCartesianTransformationOperator3D => "IFCCARTESIANTRANSFORMATIONOPERATOR3D",
        IfcCartesianTransformationOperator3DnonUniform => "IFCCARTESIANTRANSFORMATIONOPERATOR3DNONUNIFORM",
        IfcCartesianPoint => "IFCCARTESIANPOINT",
        IfcDirection => "IFCDIRECTION",

        // Solids
        IfcExtrudedAreaSolid => "IFCEXTRUDEDAREASOLID",
        IfcBooleanResult => "IFCBOOLEANRESULT",
        IfcBooleanClippingResult => "IFCBOOLEANCLIPPINGRESULT",
        IfcHalfSpaceSolid => "IFCHALFSPACESOLID",
        IfcPolygonalBoundedHalfSpace => "IFCPOLYGONALBOUNDEDHALFSPACE",
        IfcPlane => "IFCPLANE",
        IfcFacetedBrep => "IFCFACETEDBREP",
        IfcClosedShell => "IFCCLOSEDSHELL",
        IfcFace => "IFCFACE",
        IfcFaceOuterBound => "IFCFACEOUTERBOUND",
        IfcFaceBound => "IFCFACEBOUND",
        IfcPolyLoop => "IFCPOLYLOOP",
        IfcTriangulatedFaceSet => "IFCTRIANGULATEDFACESET",
        IfcPolygonalFaceSet => "IFCPOLYGONALFACESET",
        IfcIndexedPolygonalFace => "IFCINDEXEDPOLYGONALFACE",
        IfcIndexedPolygonalFaceWithVoids => "IFCINDEXEDPOLYGONALFACEWITHVOIDS",

        // Profiles
        IfcArbitraryClosedProfileDef => "IFCARBITRARYCLOSEDPROFILEDEF",
        IfcArbitraryProfileDefWithVoids => "IFCARBITRARYPROFILEDEFWITHVOIDS",
        IfcRectangleProfileDef => "IFCRECTANGLEPROFILEDEF",
        IfcRectangleHollowProfileDef => "IFCRECTANGLEHOLLOWPROFILEDEF",
        IfcCircleProfileDef => "IFCCIRCLEPROFILEDEF",
        IfcCircleHollowProfileDef => "IFCCIRCLEHOLLOWPROFILEDEF",
        IfcEllipseProfileDef => "IFCELLIPSEPROFILEDEF",
        IfcIShapeProfileDef => "IFCISHAPEPROFILEDEF",
        IfcLShapeProfileDef => "IFCLSHAPEPROFILEDEF",
        IfcUShapeProfileDef => "IFCUSHAPEPROFILEDEF",
        IfcTShapeProfileDef => "IFCTSHAPEPROFILEDEF",
        IfcCompositeProfileDef => "IFCCOMPOSITEPROFILEDEF",

        // Curves
        IfcPolyline => "IFCPOLYLINE",
        IfcIndexedPolyCurve => "IFCINDEXEDPOLYCURVE",
        IfcCompositeCurve => "IFCCOMPOSITECURVE",
        IfcCompositeCurveSegment => "IFCCOMPOSITECURVESEGMENT",
        IfcTrimmedCurve => "IFCTRIMMEDCURVE",
        IfcCircle => "IFCCIRCLE",
        IfcEllipse => "IFCELLIPSE",
        IfcLine => "IFCLINE",
        IfcCartesianPointList2D => "IFCCARTESIANPOINTLIST2D",
        IfcCartesianPointList3D => "IFCCARTESIANPOINTLIST3D",

        // Other common types
        IfcOwnerHistory => "IFCOWNERHISTORY",
        IfcPerson => "IFCPERSON",
        IfcOrganization => "IFCORGANIZATION",
        IfcApplication => "IFCAPPLICATION",
    }
}

impl IfcType {
    /// Parse IFC type from a STEP type name (case-insensitive)
    pub fn from_name(s: &str) -> Self {
        if s.bytes().any(|b| b.is_ascii_lowercase()) {
            Self::from_upper(&s.to_ascii_uppercase())
        } else {
            Self::from_upper(s)
        }
    }

    /// Check if this is a material definition
    pub fn is_material_definition(&self) -> bool {
        matches!(
            self,
            Self::IfcMaterial
                | Self::IfcMaterialList
                | Self::IfcMaterialLayer
                | Self::IfcMaterialLayerSet
                | Self::IfcMaterialLayerSetUsage
                | Self::IfcMaterialConstituentSet
                | Self::IfcMaterialProfileSet
                | Self::IfcMaterialProfileSetUsage
        )
    }
}

impl fmt::Display for IfcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Simple hash function for unknown IFC types
fn simple_hash(s: &str) -> u16 {
    let mut hash: u32 = 5381;
    for byte in s.bytes() {
        hash = ((hash << 5).wrapping_add(hash)).wrapping_add(byte as u32);
    }
    (hash & 0xFFFF) as u16
}
