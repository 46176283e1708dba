//! Browser bindings.
//!
//! Wraps [`ScormAdapter`] for JavaScript, rooted at the current `window`.
//! Browsing contexts and the host's runtime object are reached through
//! `Reflect`, so a cross-origin frame that throws on property access simply
//! reads as "not here".
//!
//! ```javascript
//! import init, { ScormBridge } from 'elohim-scorm';
//!
//! await init();
//! const scorm = new ScormBridge('{"version": "2004"}');
//! if (scorm.initialize()) {
//!     scorm.setValue('cmi.score.raw', 85);
//!     scorm.setStatus('completed');
//!     scorm.terminate();
//! }
//! ```

use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::adapter::ScormAdapter;
use crate::config::AdapterConfig;
use crate::host::{BrowsingContext, ContextRef, RuntimeApi};
use crate::types::{ApiMethods, ScormValue, ScormVersion};

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

// ============================================================================
// Host environment
// ============================================================================

fn property(target: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

/// Normalize a host result to its wire string.
fn to_wire(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        s
    } else if let Some(b) = value.as_bool() {
        b.to_string()
    } else if let Some(n) = value.as_f64() {
        ScormValue::Number(n).to_wire()
    } else {
        String::new()
    }
}

/// A `window`, frame or document
struct JsContext {
    target: JsValue,
}

impl JsContext {
    fn wrap(target: JsValue) -> ContextRef {
        Rc::new(JsContext { target })
    }
}

impl BrowsingContext for JsContext {
    fn runtime_api(&self, version: ScormVersion) -> Option<Rc<dyn RuntimeApi>> {
        let object = property(&self.target, version.api_object_name())?;
        Some(Rc::new(JsRuntimeApi {
            object,
            methods: version.methods(),
        }))
    }

    fn parent(&self) -> Option<ContextRef> {
        let parent = property(&self.target, "parent")?;
        if Object::is(&parent, &self.target) {
            return None;
        }
        Some(JsContext::wrap(parent))
    }

    fn top_opener(&self) -> Option<ContextRef> {
        let top = property(&self.target, "top")?;
        property(&top, "opener").map(JsContext::wrap)
    }

    fn document(&self) -> Option<ContextRef> {
        property(&self.target, "document").map(JsContext::wrap)
    }
}

/// The runtime object injected by the LMS
struct JsRuntimeApi {
    object: JsValue,
    methods: &'static ApiMethods,
}

impl JsRuntimeApi {
    fn invoke(&self, method: &str, args: &[&str]) -> String {
        let function = match property(&self.object, method).and_then(|f| f.dyn_into::<Function>().ok()) {
            Some(function) => function,
            None => {
                tracing::warn!(method, "Host runtime object has no such method");
                return String::new();
            }
        };

        let args: Array = args.iter().map(|a| JsValue::from_str(a)).collect();
        match function.apply(&self.object, &args) {
            Ok(result) => to_wire(&result),
            Err(err) => {
                tracing::error!(method, error = ?err, "Host runtime call threw");
                String::new()
            }
        }
    }
}

impl RuntimeApi for JsRuntimeApi {
    fn initialize(&self) -> String {
        self.invoke(self.methods.initialize, &[""])
    }

    fn finish(&self) -> String {
        self.invoke(self.methods.finish, &[""])
    }

    fn get_value(&self, element: &str) -> String {
        self.invoke(self.methods.get_value, &[element])
    }

    fn set_value(&self, element: &str, value: &str) -> String {
        self.invoke(self.methods.set_value, &[element, value])
    }

    fn commit(&self) -> String {
        self.invoke(self.methods.commit, &[""])
    }

    fn get_last_error(&self) -> String {
        self.invoke(self.methods.get_last_error, &[])
    }

    fn get_error_string(&self, code: &str) -> String {
        self.invoke(self.methods.get_error_string, &[code])
    }

    fn get_diagnostic(&self, code: &str) -> String {
        self.invoke(self.methods.get_diagnostic, &[code])
    }
}

// ============================================================================
// JS surface
// ============================================================================

fn to_js(value: ScormValue) -> JsValue {
    match value {
        ScormValue::Bool(b) => JsValue::from_bool(b),
        ScormValue::Number(n) => JsValue::from_f64(n),
        ScormValue::String(s) => JsValue::from_str(&s),
    }
}

fn from_js(value: &JsValue) -> ScormValue {
    if let Some(b) = value.as_bool() {
        ScormValue::Bool(b)
    } else if let Some(n) = value.as_f64() {
        ScormValue::Number(n)
    } else if let Some(s) = value.as_string() {
        ScormValue::String(s)
    } else {
        ScormValue::String(
            js_sys::JSON::stringify(value)
                .ok()
                .and_then(|s| s.as_string())
                .unwrap_or_default(),
        )
    }
}

/// SCORM session for the content running in this window
#[wasm_bindgen]
pub struct ScormBridge {
    adapter: ScormAdapter,
}

#[wasm_bindgen]
impl ScormBridge {
    /// Create a bridge from an optional JSON config
    /// (`version`, `autoHandleCompletionStatus`, `autoHandleExitMode`, `findAttemptLimit`).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<ScormBridge, JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        set_panic_hook();

        let config = match config_json.as_deref() {
            Some(json) if !json.trim().is_empty() => {
                AdapterConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            _ => AdapterConfig::default(),
        };
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;

        Ok(ScormBridge {
            adapter: ScormAdapter::new(JsContext::wrap(window.into()), config),
        })
    }

    pub fn initialize(&mut self) -> bool {
        self.adapter.initialize()
    }

    pub fn terminate(&mut self) -> bool {
        self.adapter.terminate()
    }

    #[wasm_bindgen(js_name = isConnected)]
    pub fn is_connected(&self) -> bool {
        self.adapter.is_connected()
    }

    #[wasm_bindgen(js_name = isAvailable)]
    pub fn is_available(&self) -> bool {
        self.adapter.is_available()
    }

    /// Resolved revision ("1.2" / "2004"), if known yet
    #[wasm_bindgen(getter)]
    pub fn version(&self) -> Option<String> {
        self.adapter.version().map(|v| v.to_string())
    }

    #[wasm_bindgen(js_name = getValue)]
    pub fn get_value(&mut self, key: &str) -> JsValue {
        to_js(self.adapter.get_value(key))
    }

    #[wasm_bindgen(js_name = setValue)]
    pub fn set_value(&mut self, key: &str, value: JsValue) -> bool {
        self.adapter.set_value(key, from_js(&value))
    }

    pub fn save(&mut self) -> bool {
        self.adapter.save()
    }

    #[wasm_bindgen(js_name = getStatus)]
    pub fn get_status(&mut self) -> JsValue {
        to_js(self.adapter.get_status())
    }

    #[wasm_bindgen(js_name = setStatus)]
    pub fn set_status(&mut self, status: &str) -> bool {
        self.adapter.set_status(status)
    }

    #[wasm_bindgen(js_name = getLastErrorCode)]
    pub fn get_last_error_code(&mut self) -> u32 {
        self.adapter.last_error_code()
    }

    #[wasm_bindgen(js_name = getErrorText)]
    pub fn get_error_text(&mut self, code: u32) -> String {
        self.adapter.error_text(code)
    }

    #[wasm_bindgen(js_name = getDiagnosticText)]
    pub fn get_diagnostic_text(&mut self, code: u32) -> String {
        self.adapter.diagnostic_text(code)
    }

    #[wasm_bindgen(js_name = reportError)]
    pub fn report_error(&self, action: &str, message: &str) {
        self.adapter.report_error(action, message)
    }
}

/// Route adapter reports to the browser console.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(directives: Option<String>) {
    match directives {
        Some(directives) => crate::logging::init_logging_with(&directives),
        None => crate::logging::init_logging(),
    }
}

/// Get the WASM module version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// ============================================================================
// WASM-specific Tests
// ============================================================================
