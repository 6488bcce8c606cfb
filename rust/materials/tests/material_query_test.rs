// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material queries against a small IFC4 model in metres
//!
//! | Element         | Material association                    | Geometry              |
//! |-----------------|-----------------------------------------|-----------------------|
//! | Wall-Layered    | bare layer set, then Brick 0.1 + Concrete 0.2 usage | 4 x 0.3 x 3 box |
//! | Slab            | Concrete                                | 5 x 4 x 0.25 box      |
//! | Column          | Steel                                   | 0.3 x 0.3 x 3 box     |
//! | Proxy-Broken    | Concrete                                | unsupported sphere    |
//! | Wall-NoMaterial | none                                    | 4 x 0.3 x 3 box       |
//! | Beam-List       | list of Concrete and Steel              | 0.3 x 0.3 x 3 box     |
//! | Wall-Both       | Concrete 0.2 + air 0.05 usage, then 'concrete' | 2 x 0.25 x 3 box |
//! | Furniture       | Reinforced Concrete                     | 1.2 x 0.8 x 0.75 box  |
//! | Covering        | Béton                                   | 1 m triangulated cube |

use approx::assert_relative_eq;
use ifc_lite_materials::{
    retrieve_elements_by_material, IfcModel, LayerEntry, MaterialAggregator, MaterialReport,
};
use std::path::PathBuf;

fn fixture() -> IfcModel {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/institute_small.ifc");
    IfcModel::open(path).expect("fixture loads")
}

#[test]
fn test_model_summary() {
    let model = fixture();
    let summary = model.summary();

    assert_eq!(summary.schema_version, "IFC4");
    assert_eq!(summary.element_count, 9);
    assert_eq!(summary.entity_count, 68);
    assert_eq!(summary.material_relation_count, 9);
    assert_eq!(summary.void_relation_count, 0);
    assert_eq!(summary.length_unit_scale, 1.0);
}

#[test]
fn test_concrete_report() {
    let model = fixture();
    let report = retrieve_elements_by_material(&model, "concrete").unwrap();

    assert_eq!(report.total_elements, 5);
    assert_eq!(report.elements_using_material_in_layers, 2);
    assert_eq!(report.elements_entirely_made_of_material, 3);

    // 28.2 * 0.3 + 5.0 + 0.0 + 14.5 * 0.25 + 1.5
    assert_relative_eq!(report.total_material_volume, 18.585, epsilon = 1e-9);

    let names: Vec<_> = report
        .elements
        .iter()
        .map(|e| e.name.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["Wall-Layered", "Slab", "Proxy-Broken", "Wall-Both"]);
}

#[test]
fn test_layered_wall_record() {
    let model = fixture();
    let report = retrieve_elements_by_material(&model, "Concrete").unwrap();
    let wall = &report.elements[0];

    assert_eq!(wall.global_id.as_deref(), Some("2O2Fr$t4X7Zf8NOew3FLOH"));
    assert_eq!(wall.material_layers, vec![LayerEntry(Some("Concrete".into()), 0.2)]);
    assert_relative_eq!(wall.total_thickness.unwrap(), 0.3, epsilon = 1e-12);
    assert_eq!(wall.entirely_made_of, None);

    let both = &report.elements[3];
    assert_eq!(both.entirely_made_of.as_deref(), Some("concrete"));
    assert_relative_eq!(both.total_thickness.unwrap(), 0.25, epsilon = 1e-12);
}

#[test]
fn test_case_insensitive_and_repeatable() {
    let model = fixture();
    let aggregator = MaterialAggregator::new(&model);

    let lower = aggregator.run("concrete").unwrap();
    let upper = aggregator.run("CONCRETE").unwrap();
    let again = aggregator.run("concrete").unwrap();

    assert_eq!(lower, upper);
    assert_eq!(lower, again);
    assert_eq!(
        lower.total_material_volume.to_bits(),
        again.total_material_volume.to_bits()
    );
}

#[test]
fn test_steel_excludes_material_lists() {
    let model = fixture();
    let report = retrieve_elements_by_material(&model, "Steel").unwrap();

    assert_eq!(report.total_elements, 1);
    assert_eq!(report.elements[0].name.as_deref(), Some("Column"));
    assert_relative_eq!(report.total_material_volume, 0.27, epsilon = 1e-9);
}

#[test]
fn test_full_name_match_only() {
    let model = fixture();
    let report = retrieve_elements_by_material(&model, "reinforced concrete").unwrap();

    assert_eq!(report.total_elements, 1);
    assert_eq!(report.elements[0].entirely_made_of.as_deref(), Some("Reinforced Concrete"));
    assert_relative_eq!(report.total_material_volume, 0.72, epsilon = 1e-9);
}

#[test]
fn test_non_ascii_material_name() {
    let model = fixture();
    let report = retrieve_elements_by_material(&model, "BÉTON").unwrap();

    assert_eq!(report.elements_entirely_made_of_material, 1);
    assert_eq!(report.elements[0].entirely_made_of.as_deref(), Some("Béton"));
    assert_relative_eq!(report.total_material_volume, 1.0, epsilon = 1e-9);
}

#[test]
fn test_unknown_material() {
    let model = fixture();
    let report = retrieve_elements_by_material(&model, "Timber").unwrap();
    assert_eq!(report, MaterialReport::default());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "total_elements": 0,
            "elements_entirely_made_of_material": 0,
            "elements_using_material_in_layers": 0,
            "total_material_volume": 0.0,
            "elements": []
        })
    );
}
