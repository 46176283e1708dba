//! Report channel setup.
//!
//! The adapter reports through `tracing`. Hosts that already install a
//! subscriber need nothing from here; standalone content can call
//! [`init_logging`] once. In the browser, formatted lines go to the
//! console method matching their level.

use tracing_subscriber::EnvFilter;

/// Filter used when nothing else is configured
pub const DEFAULT_DIRECTIVE: &str = "elohim_scorm=info";

/// Install the default subscriber. Safe to call more than once.
pub fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    #[cfg(target_arch = "wasm32")]
    let filter = EnvFilter::new(DEFAULT_DIRECTIVE);

    install(filter);
}

/// Install a subscriber with explicit directives, e.g. `"elohim_scorm=debug"`.
pub fn init_logging_with(directives: &str) {
    install(EnvFilter::new(directives));
}

#[cfg(not(target_arch = "wasm32"))]
fn install(filter: EnvFilter) {
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(target_arch = "wasm32")]
fn install(filter: EnvFilter) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(console::ConsoleMakeWriter)
        .with_ansi(false)
        .without_time()
        .try_init();
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;

    use tracing::{Level, Metadata};
    use tracing_subscriber::fmt::MakeWriter;
    use wasm_bindgen::JsValue;

    pub struct ConsoleMakeWriter;

    /// Buffers one formatted event and hands it to the console on drop.
    pub struct ConsoleWriter {
        level: Level,
        buf: Vec<u8>,
    }

    impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleWriter {
                level: Level::INFO,
                buf: Vec::new(),
            }
        }

        fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
            ConsoleWriter {
                level: *meta.level(),
                buf: Vec::new(),
            }
        }
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            if self.buf.is_empty() {
                return;
            }
            let line = String::from_utf8_lossy(&self.buf);
            let line = JsValue::from_str(line.trim_end());
            match self.level {
                Level::ERROR => web_sys::console::error_1(&line),
                Level::WARN => web_sys::console::warn_1(&line),
                Level::DEBUG | Level::TRACE => web_sys::console::debug_1(&line),
                _ => web_sys::console::log_1(&line),
            }
        }
    }
}
