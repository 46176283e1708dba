//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use elohim_scorm::host::mock::{MockContext, MockRuntime};
use elohim_scorm::{AdapterConfig, ContextRef, ScormAdapter, ScormVersion};
use tracing_subscriber::fmt::MakeWriter;

/// Adapter whose window directly exposes `runtime` in the given shape.
pub fn adapter_on_window(
    runtime: Rc<MockRuntime>,
    version: ScormVersion,
    config: AdapterConfig,
) -> ScormAdapter {
    let window: ContextRef = Rc::new(MockContext::new("window").with_api(version, runtime));
    ScormAdapter::new(window, config)
}

/// Content frame nested `depth` levels below the window exposing `runtime`.
pub fn nested_frame(runtime: Rc<MockRuntime>, version: ScormVersion, depth: usize) -> ContextRef {
    let mut context: ContextRef = Rc::new(MockContext::new("lms").with_api(version, runtime));
    for level in 0..depth {
        context = Rc::new(MockContext::new(format!("frame-{}", level)).with_parent(context));
    }
    context
}

/// In-memory sink for formatted tracing output.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a subscriber that records everything it reports.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}
