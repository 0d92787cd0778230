//! User-facing messages on the console.

use ntr_core::{MessageSink, TeardownReport};

/// Prints messages to stderr, leaving stdout to the sessions.
#[derive(Debug, Default)]
pub struct ConsoleMessages;

impl MessageSink for ConsoleMessages {
    fn show_error(&self, message: &str) {
        eprintln!("error: {message}");
    }

    fn show_info(&self, message: &str) {
        eprintln!("{message}");
    }
}

pub fn print_teardown(report: &TeardownReport) {
    for failure in &report.failures {
        eprintln!("error: failed to close session {}: {}", failure.key, failure.error);
    }
}
