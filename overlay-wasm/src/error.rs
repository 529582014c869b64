use crate::interop::{new_obj, set_kv};
use wasm_bindgen::JsValue;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data {
        set_kv(&e, "data", &d);
    }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn bad_path_data(which: &'static str, detail: impl Into<String>) -> JsValue {
    let d = new_obj();
    set_kv(&d, "path", &JsValue::from_str(which));
    err("bad_path_data", detail, Some(d.into()))
}

#[inline]
pub fn bad_enum(param: &'static str, got: &str) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "got", &JsValue::from_str(got));
    err("bad_enum", format!("unrecognized value for '{}'", param), Some(d.into()))
}
