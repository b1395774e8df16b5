//! Browser console log sink
//!
//! Routes `tracing` events to `console.error`/`warn`/`info`/`debug` by level.
//! The first call to [`init_console_logging`] installs the global subscriber;
//! later calls leave it in place.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::EnvFilter;
use wasm_bindgen::JsValue;

/// Filter directives used when none are given or they fail to parse
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConsoleMethod {
    Error,
    Warn,
    Info,
    Debug,
}

impl ConsoleMethod {
    fn for_level(level: Level) -> Self {
        match level {
            Level::ERROR => ConsoleMethod::Error,
            Level::WARN => ConsoleMethod::Warn,
            Level::INFO => ConsoleMethod::Info,
            _ => ConsoleMethod::Debug,
        }
    }

    fn emit(self, line: &str) {
        let line = JsValue::from_str(line);
        match self {
            ConsoleMethod::Error => web_sys::console::error_1(&line),
            ConsoleMethod::Warn => web_sys::console::warn_1(&line),
            ConsoleMethod::Info => web_sys::console::info_1(&line),
            ConsoleMethod::Debug => web_sys::console::debug_1(&line),
        }
    }
}

/// Buffers one formatted event and hands it to the console on drop
pub struct ConsoleWriter {
    method: ConsoleMethod,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if let Some(line) = console_line(&self.buf) {
            self.method.emit(&line);
        }
    }
}

/// [`MakeWriter`] picking the console method from the event level
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> ConsoleWriter {
        ConsoleWriter {
            method: ConsoleMethod::Info,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> ConsoleWriter {
        ConsoleWriter {
            method: ConsoleMethod::for_level(*meta.level()),
            buf: Vec::new(),
        }
    }
}

fn console_line(buf: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(buf);
    let trimmed = text.trim_end();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn console_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|err| {
        report_rejected_filter(directives, &err.to_string());
        EnvFilter::new(DEFAULT_LOG_FILTER)
    })
}

// Nothing is installed yet when the filter is rejected, so the subscriber
// cannot report it.
fn report_rejected_filter(directives: &str, reason: &str) {
    if cfg!(target_arch = "wasm32") {
        ConsoleMethod::Warn.emit(&format!(
            "reveal: ignoring log filter {directives:?} ({reason}); using {DEFAULT_LOG_FILTER:?}"
        ));
    }
}

/// Install the console subscriber with `directives` (`EnvFilter` syntax)
pub fn init_console_logging(directives: &str) {
    // No clock on wasm32-unknown-unknown, and the console does not render ANSI.
    let subscriber = tracing_subscriber::registry()
        .with(console_filter(directives))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(ConsoleMakeWriter)
                .with_ansi(false)
                .without_time()
                .with_target(true),
        );
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_levels_map_to_console_methods() {
        assert_eq!(ConsoleMethod::for_level(Level::ERROR), ConsoleMethod::Error);
        assert_eq!(ConsoleMethod::for_level(Level::WARN), ConsoleMethod::Warn);
        assert_eq!(ConsoleMethod::for_level(Level::INFO), ConsoleMethod::Info);
        assert_eq!(ConsoleMethod::for_level(Level::DEBUG), ConsoleMethod::Debug);
        assert_eq!(ConsoleMethod::for_level(Level::TRACE), ConsoleMethod::Debug);
    }

    #[test]
    fn test_console_line_drops_trailing_newline() {
        assert_eq!(
            console_line(b" INFO reveal_app::app: reveal ready\n").as_deref(),
            Some(" INFO reveal_app::app: reveal ready")
        );
        assert_eq!(console_line(b"\n"), None);
        assert_eq!(console_line(b""), None);
    }

    #[test]
    fn test_filter_directives() {
        assert_eq!(
            console_filter("reveal_sequencer=debug").max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            console_filter(DEFAULT_LOG_FILTER).max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }

    #[test]
    fn test_bad_filter_falls_back_to_default() {
        assert_eq!(
            console_filter("reveal_app=loud").max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }
}
