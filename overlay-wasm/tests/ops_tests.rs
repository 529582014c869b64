#![cfg(target_arch = "wasm32")]

use js_sys::{Array, Reflect};
use overlay_wasm::boolean_path_data;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn get(v: &JsValue, k: &str) -> JsValue {
    Reflect::get(v, &JsValue::from_str(k)).unwrap()
}

#[wasm_bindgen_test]
fn union_of_squares() {
    let res = boolean_path_data(
        "M 0 0 L 10 0 L 10 10 L 0 10 Z",
        "nonzero",
        "M 20 0 L 30 0 L 30 10 L 20 10 Z",
        "nonzero",
        "union",
        1e-4,
    );
    assert_eq!(get(&res, "ok"), JsValue::from_bool(true));
    let value = Array::from(&get(&res, "value"));
    assert_eq!(value.length(), 1);
    let d = value.get(0).as_string().unwrap();
    assert!(d.starts_with('M'));
}

#[wasm_bindgen_test]
fn bad_op_reports_error_object() {
    let res = boolean_path_data("M 0 0 Z", "nonzero", "M 1 1 Z", "nonzero", "frobnicate", 1e-4);
    assert_eq!(get(&res, "ok"), JsValue::from_bool(false));
    let error = get(&res, "error");
    assert_eq!(get(&error, "code").as_string().unwrap(), "bad_enum");
}

#[wasm_bindgen_test]
fn bad_path_data_reports_which_input() {
    let res = boolean_path_data("L 0 0", "nonzero", "M 1 1 Z", "nonzero", "union", 1e-4);
    assert_eq!(get(&res, "ok"), JsValue::from_bool(false));
    let error = get(&res, "error");
    assert_eq!(get(&error, "code").as_string().unwrap(), "bad_path_data");
    let data = get(&error, "data");
    assert_eq!(get(&data, "path").as_string().unwrap(), "a");
}
