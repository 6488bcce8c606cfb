// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit extraction for IFC files
//!
//! Handles IFCSIUNIT prefixes and IFCCONVERSIONBASEDUNIT factors for the
//! project length unit.

use crate::decoder::EntityDecoder;
use crate::error::Result;
use crate::schema::IfcType;
use crate::schema_gen::DecodedEntity;

/// SI Prefix multipliers as defined in IFC specification
/// Maps IfcSIPrefix enum values to their numeric multipliers
#[inline]
pub fn get_si_prefix_multiplier(prefix: &str) -> f64 {
    match prefix {
        "ATTO" => 1e-18,
        "FEMTO" => 1e-15,
        "PICO" => 1e-12,
        "NANO" => 1e-9,
        "MICRO" => 1e-6,
        "MILLI" => 1e-3,
        "CENTI" => 1e-2,
        "DECI" => 1e-1,
        "DECA" => 1e1,
        "HECTO" => 1e2,
        "KILO" => 1e3,
        "MEGA" => 1e6,
        "GIGA" => 1e9,
        "TERA" => 1e12,
        "PETA" => 1e15,
        "EXA" => 1e18,
        _ => 1.0,
    }
}

/// Extract length unit scale factor from IFC file
///
/// Follows the chain: IFCPROJECT → IFCUNITASSIGNMENT → IFCSIUNIT / IFCCONVERSIONBASEDUNIT
/// and returns the multiplier converting model lengths to metres
/// (0.001 for millimetres, 0.3048 for feet). Anything missing defaults to 1.0.
pub fn extract_length_unit_scale(decoder: &mut EntityDecoder, project_id: u32) -> Result<f64> {
    let project = decoder.decode_by_id(project_id)?;

    if project.ifc_type != IfcType::IfcProject {
        return Ok(1.0);
    }

    // IFCPROJECT attribute 8: UnitsInContext
    let units_ref = match project.get_ref(8) {
        Some(id) => id,
        None => return Ok(1.0),
    };

    let unit_assignment = decoder.decode_by_id(units_ref)?;
    if unit_assignment.ifc_type != IfcType::IfcUnitAssignment {
        return Ok(1.0);
    }

    for unit_ref in unit_assignment.get_ref_list(0) {
        let unit = match decoder.decode_by_id(unit_ref) {
            Ok(entity) => entity,
            Err(_) => continue,
        };

        // Attribute 1 is UnitType on both IFCSIUNIT and IFCCONVERSIONBASEDUNIT
        if unit.get_enum(1) != Some("LENGTHUNIT") {
            continue;
        }

        return length_unit_scale(decoder, &unit);
    }

    Ok(1.0)
}

fn length_unit_scale(decoder: &mut EntityDecoder, unit: &DecodedEntity) -> Result<f64> {
    match unit.ifc_type {
        // IFCSIUNIT(Dimensions, UnitType, Prefix, Name)
        IfcType::IfcSIUnit => Ok(unit
            .get_enum(2)
            .map(get_si_prefix_multiplier)
            .unwrap_or(1.0)),
        // IFCCONVERSIONBASEDUNIT(Dimensions, UnitType, Name, ConversionFactor)
        IfcType::IfcConversionBasedUnit => {
            let factor_ref = match unit.get_ref(3) {
                Some(id) => id,
                None => return Ok(1.0),
            };
            // IFCMEASUREWITHUNIT(ValueComponent, UnitComponent)
            let measure = decoder.decode_by_id(factor_ref)?;
            let value = measure.get_float(0).unwrap_or(1.0);
            let base = match measure.get_ref(1) {
                Some(id) => {
                    let base_unit = decoder.decode_by_id(id)?;
                    if base_unit.ifc_type == IfcType::IfcSIUnit {
                        length_unit_scale(decoder, &base_unit)?
                    } else {
                        1.0
                    }
                }
                None => 1.0,
            };
            Ok(value * base)
        }
        _ => Ok(1.0),
    }
}
