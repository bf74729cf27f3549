//! Tracing and panic reporting for test runs.
//!
//! Both installers are idempotent. The first call wins, later calls do nothing.

use std::backtrace::Backtrace;
use std::panic::{self, PanicHookInfo};
use std::sync::Once;
use std::thread;

use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_DIRECTIVE: &str = "info";

static PANIC_HOOK_INSTALLED: Once = Once::new();
static TRACING_INSTALLED: Once = Once::new();

/// Installs a console subscriber filtered by `RUST_LOG`, falling back to `info`.
pub fn init() {
    install(|| EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)));
}

/// Installs a console subscriber with an explicit filter directive such as `waterui_headless=trace`.
///
/// An unparsable directive falls back to `info`.
pub fn init_with(directive: &str) {
    let directive = directive.to_owned();
    install(move || EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)));
}

fn install(filter: impl FnOnce() -> EnvFilter) {
    TRACING_INSTALLED.call_once(|| {
        let console = fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_ansi(false)
            .with_filter(filter());

        if tracing_subscriber::registry().with(console).try_init().is_err() {
            eprintln!("waterui-headless tracing subscriber failed to initialize");
        }
    });
}

/// Routes panics through `tracing` before running the previously installed hook.
///
/// Panics raised inside window or main task queues are caught by the queue, so this is the only
/// place their message and backtrace get recorded.
pub fn install_panic_logger() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            log_panic(info);
            previous(info);
        }));
    });
}

fn log_panic(info: &PanicHookInfo<'_>) {
    let message = panic_message(info.payload());
    let thread_name = thread::current().name().unwrap_or("unnamed").to_owned();
    let location = info
        .location()
        .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
        .unwrap_or_default();
    let backtrace = Backtrace::capture().to_string();

    tracing::error!(
        target: "waterui_headless::panic",
        message = %message,
        thread = %thread_name,
        location = %location,
        backtrace = %backtrace
    );
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installers_are_idempotent() {
        init();
        init_with("debug");
        install_panic_logger();
        install_panic_logger();
    }

    #[test]
    fn panic_message_reads_common_payloads() {
        let caught = std::panic::catch_unwind(|| panic!("boom {}", 1)).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "boom 1");
        let caught = std::panic::catch_unwind(|| std::panic::panic_any(7_u8)).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "Unknown panic");
    }
}
