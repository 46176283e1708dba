//! Host-side collaborators: browsing contexts and the runtime object.
//!
//! The delivery platform injects a runtime object into some browsing context
//! of the content's hierarchy. These traits describe exactly what the adapter
//! consumes from that environment, so the same lifecycle code runs against a
//! real `window` (see `wasm`) or the stubs in [`mock`].

use std::fmt;
use std::rc::Rc;

use crate::types::ScormVersion;

pub mod mock;

/// Shared reference to a browsing context
pub type ContextRef = Rc<dyn BrowsingContext>;

/// The host runtime object, one method per operation class.
///
/// Every result is in wire form: acknowledgements are `"true"`/`"false"`,
/// error codes are decimal text.
pub trait RuntimeApi {
    fn initialize(&self) -> String;
    fn finish(&self) -> String;
    fn get_value(&self, element: &str) -> String;
    fn set_value(&self, element: &str, value: &str) -> String;
    fn commit(&self) -> String;
    fn get_last_error(&self) -> String;
    fn get_error_string(&self, code: &str) -> String;
    fn get_diagnostic(&self, code: &str) -> String;
}

/// A window, frame or document the discovery walk can inspect.
pub trait BrowsingContext {
    /// Host object of the given shape exposed by this context, if any
    fn runtime_api(&self, version: ScormVersion) -> Option<Rc<dyn RuntimeApi>>;

    /// Enclosing context. `None` at the top or when the parent is the context itself.
    fn parent(&self) -> Option<ContextRef>;

    /// Window that opened the top context of this hierarchy
    fn top_opener(&self) -> Option<ContextRef>;

    /// Document context of this window
    fn document(&self) -> Option<ContextRef>;
}

/// A located host object, tagged with the revision it speaks.
#[derive(Clone)]
pub enum RuntimeHandle {
    Scorm12(Rc<dyn RuntimeApi>),
    Scorm2004(Rc<dyn RuntimeApi>),
}

impl RuntimeHandle {
    pub fn new(version: ScormVersion, api: Rc<dyn RuntimeApi>) -> Self {
        match version {
            ScormVersion::Scorm12 => RuntimeHandle::Scorm12(api),
            ScormVersion::Scorm2004 => RuntimeHandle::Scorm2004(api),
        }
    }

    pub fn version(&self) -> ScormVersion {
        match self {
            RuntimeHandle::Scorm12(_) => ScormVersion::Scorm12,
            RuntimeHandle::Scorm2004(_) => ScormVersion::Scorm2004,
        }
    }

    fn api(&self) -> &dyn RuntimeApi {
        match self {
            RuntimeHandle::Scorm12(api) | RuntimeHandle::Scorm2004(api) => api.as_ref(),
        }
    }

    pub fn status_key(&self) -> &'static str {
        self.version().status_key()
    }

    pub fn exit_key(&self) -> &'static str {
        self.version().exit_key()
    }

    pub fn is_status_key(&self, key: &str) -> bool {
        key == self.status_key()
    }

    pub fn is_exit_key(&self, key: &str) -> bool {
        key == self.exit_key()
    }

    pub fn initialize(&self) -> bool {
        acknowledged(&self.api().initialize())
    }

    /// `LMSFinish` under 1.2, `Terminate` under 2004
    pub fn finish(&self) -> bool {
        acknowledged(&self.api().finish())
    }

    pub fn get_value(&self, key: &str) -> String {
        self.api().get_value(key)
    }

    pub fn set_value(&self, key: &str, value: &str) -> bool {
        acknowledged(&self.api().set_value(key, value))
    }

    pub fn commit(&self) -> bool {
        acknowledged(&self.api().commit())
    }

    pub fn last_error(&self) -> u32 {
        parse_error_code(&self.api().get_last_error())
    }

    pub fn error_string(&self, code: u32) -> String {
        self.api().get_error_string(&code.to_string())
    }

    pub fn diagnostic(&self, code: u32) -> String {
        self.api().get_diagnostic(&code.to_string())
    }
}

impl fmt::Debug for RuntimeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RuntimeHandle").field(&self.version()).finish()
    }
}

fn acknowledged(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

/// Leading decimal digits of the host's error text; 0 when there are none.
fn parse_error_code(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    match trimmed[..end].parse() {
        Ok(code) => code,
        Err(_) => {
            if !trimmed.is_empty() {
                tracing::warn!(raw = %trimmed, "Unparsable error code from host, treating as 0");
            }
            0
        }
    }
}
