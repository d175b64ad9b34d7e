// =========================================================
// 跨平台日志宏
// =========================================================
//
// wasm32 下输出到浏览器控制台，主机测试时输出到 stdout / stderr。
// 约定消息以 `[模块]` 开头，如 `[Router]`、`[Api]`。

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*))))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_warn {
    ($($t:tt)*) => (::web_sys::console::warn_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*))))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_error {
    ($($t:tt)*) => (::web_sys::console::error_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*))))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}
