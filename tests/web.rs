//! Browser smoke tests for the WebAssembly bindings.

#![cfg(target_arch = "wasm32")]

use life_view::wasm::WasmUniverse;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn test_universe_change_list_round_trip() {
    let mut universe = WasmUniverse::new(8, 8, Some(5));
    assert_eq!(universe.cells().len(), 64);

    universe.clear();
    universe.clear_changed_cells();
    universe.toggle_cell(2, 3).unwrap();
    assert_eq!(universe.changed_cells_length(), 1);
    assert_eq!(universe.changed_cells(), vec![2, 3]);
    assert_eq!(universe.cells()[2 * 8 + 3], 1);

    universe.clear_changed_cells();
    assert!(universe.changed_cells().is_empty());
}

#[wasm_bindgen_test]
fn test_universe_glider_insert() {
    let mut universe = WasmUniverse::new(16, 16, Some(1));
    universe.clear();
    universe.insert_glider(8, 8).unwrap();
    let live = universe.cells().iter().filter(|&&c| c == 1).count();
    assert_eq!(live, 5);
    assert_eq!(universe.width(), 16);
    assert_eq!(universe.height(), 16);
}

#[wasm_bindgen_test]
fn test_universe_rejects_out_of_range_cells() {
    let mut universe = WasmUniverse::new(8, 8, Some(2));
    universe.clear();
    universe.clear_changed_cells();

    assert!(universe.toggle_cell(8, 0).is_err());
    assert!(universe.insert_glider(0, 8).is_err());
    assert!(universe.insert_pulsar(100, 100).is_err());
    assert_eq!(universe.changed_cells_length(), 0);
}
