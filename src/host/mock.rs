//! Stub host environment for testing.
//!
//! `MockRuntime` behaves like a cooperative LMS: it stores whatever is set,
//! echoes it back on get, and records every call it receives. Individual
//! operations can be made to fail or to acknowledge while flagging an error
//! code. `MockContext` builds window hierarchies around it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::{BrowsingContext, ContextRef, RuntimeApi};
use crate::types::ScormVersion;

/// Host operations whose outcome can be scripted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MockOp {
    Initialize,
    Finish,
    GetValue,
    SetValue,
    Commit,
}

#[derive(Clone, Copy, Debug)]
struct Outcome {
    acknowledge: bool,
    code: u32,
}

impl Default for Outcome {
    fn default() -> Self {
        Self {
            acknowledge: true,
            code: 0,
        }
    }
}

/// Error strings a typical 2004 runtime reports
const ERROR_TEXTS: &[(u32, &str)] = &[
    (0, "No Error"),
    (101, "General Exception"),
    (102, "General Initialization Failure"),
    (103, "Already Initialized"),
    (111, "General Termination Failure"),
    (112, "Termination Before Initialization"),
    (113, "Termination After Termination"),
    (122, "Retrieve Data Before Initialization"),
    (132, "Store Data Before Initialization"),
    (142, "Commit Before Initialization"),
    (201, "General Argument Error"),
    (301, "General Get Failure"),
    (351, "General Set Failure"),
    (391, "General Commit Failure"),
    (401, "Undefined Data Model Element"),
    (403, "Data Model Element Value Not Initialized"),
    (404, "Data Model Element Is Read Only"),
    (406, "Data Model Element Type Mismatch"),
];

/// Mock runtime object for one revision.
pub struct MockRuntime {
    version: ScormVersion,
    values: RefCell<HashMap<String, String>>,
    calls: RefCell<Vec<String>>,
    last_error: Cell<u32>,
    outcomes: HashMap<MockOp, Outcome>,
    error_texts: HashMap<u32, String>,
    diagnostics: HashMap<u32, String>,
}

impl MockRuntime {
    /// Create a cooperative runtime with an empty data model.
    pub fn new(version: ScormVersion) -> Self {
        Self {
            version,
            values: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
            last_error: Cell::new(0),
            outcomes: HashMap::new(),
            error_texts: ERROR_TEXTS
                .iter()
                .map(|(code, text)| (*code, text.to_string()))
                .collect(),
            diagnostics: HashMap::new(),
        }
    }

    /// Seed a data-model value.
    pub fn with_value(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.borrow_mut().insert(key.into(), value.into());
        self
    }

    /// Make an operation fail (`"false"` or an empty read) and leave `code` behind.
    pub fn failing(mut self, op: MockOp, code: u32) -> Self {
        self.outcomes.insert(op, Outcome { acknowledge: false, code });
        self
    }

    /// Make an operation acknowledge success but leave `code` behind anyway.
    pub fn acknowledging_with_error(mut self, op: MockOp, code: u32) -> Self {
        self.outcomes.insert(op, Outcome { acknowledge: true, code });
        self
    }

    pub fn with_error_text(mut self, code: u32, text: impl Into<String>) -> Self {
        self.error_texts.insert(code, text.into());
        self
    }

    pub fn with_diagnostic(mut self, code: u32, text: impl Into<String>) -> Self {
        self.diagnostics.insert(code, text.into());
        self
    }

    /// Every call received so far, as `Method` or `Method(args)`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Whether any recorded call starts with `prefix`.
    pub fn was_called(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.starts_with(prefix))
    }

    /// Current stored value for a key.
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn outcome(&self, op: MockOp) -> Outcome {
        self.outcomes.get(&op).copied().unwrap_or_default()
    }

    fn acknowledge(&self, op: MockOp) -> String {
        let outcome = self.outcome(op);
        self.last_error.set(outcome.code);
        outcome.acknowledge.to_string()
    }
}

impl RuntimeApi for MockRuntime {
    fn initialize(&self) -> String {
        self.record(self.version.methods().initialize.to_string());
        self.acknowledge(MockOp::Initialize)
    }

    fn finish(&self) -> String {
        self.record(self.version.methods().finish.to_string());
        self.acknowledge(MockOp::Finish)
    }

    fn get_value(&self, element: &str) -> String {
        self.record(format!("{}({})", self.version.methods().get_value, element));
        let outcome = self.outcome(MockOp::GetValue);
        self.last_error.set(outcome.code);
        if !outcome.acknowledge {
            return String::new();
        }
        self.value(element).unwrap_or_default()
    }

    fn set_value(&self, element: &str, value: &str) -> String {
        self.record(format!(
            "{}({}, {})",
            self.version.methods().set_value,
            element,
            value
        ));
        let outcome = self.outcome(MockOp::SetValue);
        if outcome.acknowledge {
            self.values
                .borrow_mut()
                .insert(element.to_string(), value.to_string());
        }
        self.acknowledge(MockOp::SetValue)
    }

    fn commit(&self) -> String {
        self.record(self.version.methods().commit.to_string());
        self.acknowledge(MockOp::Commit)
    }

    fn get_last_error(&self) -> String {
        self.record(self.version.methods().get_last_error.to_string());
        self.last_error.get().to_string()
    }

    fn get_error_string(&self, code: &str) -> String {
        self.record(format!("{}({})", self.version.methods().get_error_string, code));
        code.parse::<u32>()
            .ok()
            .and_then(|c| self.error_texts.get(&c).cloned())
            .unwrap_or_default()
    }

    fn get_diagnostic(&self, code: &str) -> String {
        self.record(format!("{}({})", self.version.methods().get_diagnostic, code));
        code.parse::<u32>()
            .ok()
            .and_then(|c| self.diagnostics.get(&c).cloned())
            .unwrap_or_default()
    }
}

/// Mock browsing context.
pub struct MockContext {
    name: String,
    apis: HashMap<ScormVersion, Rc<dyn RuntimeApi>>,
    parent: RefCell<Option<ContextRef>>,
    opener: RefCell<Option<ContextRef>>,
    document: RefCell<Option<ContextRef>>,
    parent_lookups: Cell<u32>,
}

impl MockContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            apis: HashMap::new(),
            parent: RefCell::new(None),
            opener: RefCell::new(None),
            document: RefCell::new(None),
            parent_lookups: Cell::new(0),
        }
    }

    /// Expose a runtime object of the given shape.
    pub fn with_api(mut self, version: ScormVersion, api: Rc<dyn RuntimeApi>) -> Self {
        self.apis.insert(version, api);
        self
    }

    pub fn with_parent(self, parent: ContextRef) -> Self {
        self.set_parent(parent);
        self
    }

    /// Opener of this context's top window.
    pub fn with_opener(self, opener: ContextRef) -> Self {
        *self.opener.borrow_mut() = Some(opener);
        self
    }

    pub fn with_document(self, document: ContextRef) -> Self {
        *self.document.borrow_mut() = Some(document);
        self
    }

    /// Re-parent after construction, e.g. to close a cycle.
    pub fn set_parent(&self, parent: ContextRef) {
        *self.parent.borrow_mut() = Some(parent);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// How many times the discovery walk asked this context for its parent.
    pub fn parent_lookups(&self) -> u32 {
        self.parent_lookups.get()
    }
}

impl BrowsingContext for MockContext {
    fn runtime_api(&self, version: ScormVersion) -> Option<Rc<dyn RuntimeApi>> {
        self.apis.get(&version).cloned()
    }

    fn parent(&self) -> Option<ContextRef> {
        self.parent_lookups.set(self.parent_lookups.get() + 1);
        self.parent.borrow().clone()
    }

    fn top_opener(&self) -> Option<ContextRef> {
        self.opener.borrow().clone()
    }

    fn document(&self) -> Option<ContextRef> {
        self.document.borrow().clone()
    }
}
