use crate::error::{bad_enum, bad_path_data, err, ok};
use crate::interop::arr_str;
use overlay::{path_boolean, path_from_path_data, path_to_path_data, BoolOp, FillRule};
use wasm_bindgen::prelude::*;

fn parse_fill_rule(s: &str) -> Option<FillRule> {
    match s {
        "nonzero" => Some(FillRule::NonZero),
        "evenodd" => Some(FillRule::EvenOdd),
        _ => None,
    }
}

fn parse_op(s: &str) -> Option<BoolOp> {
    match s {
        "union" => Some(BoolOp::Union),
        "difference" => Some(BoolOp::Difference),
        "intersection" => Some(BoolOp::Intersection),
        "exclusion" => Some(BoolOp::Exclusion),
        "division" => Some(BoolOp::Division),
        "fracture" => Some(BoolOp::Fracture),
        _ => None,
    }
}

/// Compute `a <op> b` over SVG path-data strings.
///
/// Returns `{ok: true, value: string[]}` with one path-data string per
/// result path, or `{ok: false, error: {code, message, data?}}`.
#[wasm_bindgen]
pub fn boolean_path_data(a: &str, a_fill_rule: &str, b: &str, b_fill_rule: &str, op: &str, eps: f64) -> JsValue {
    let a_rule = match parse_fill_rule(a_fill_rule) {
        Some(rule) => rule,
        None => return bad_enum("a_fill_rule", a_fill_rule),
    };
    let b_rule = match parse_fill_rule(b_fill_rule) {
        Some(rule) => rule,
        None => return bad_enum("b_fill_rule", b_fill_rule),
    };
    let op = match parse_op(op) {
        Some(op) => op,
        None => return bad_enum("op", op),
    };

    let a_path = match path_from_path_data(a) {
        Ok(path) => path,
        Err(e) => return bad_path_data("a", e.to_string()),
    };
    let b_path = match path_from_path_data(b) {
        Ok(path) => path,
        Err(e) => return bad_path_data("b", e.to_string()),
    };

    match path_boolean(&a_path, a_rule, &b_path, b_rule, op) {
        Ok(paths) => {
            let out: Vec<String> = paths.iter().map(|p| path_to_path_data(p, eps)).collect();
            ok(arr_str(&out).into())
        }
        Err(e) => err("boolean_failed", e.to_string(), None),
    }
}
