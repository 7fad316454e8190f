use owo_colors::OwoColorize;
use unical_core::notify::{Notifier, Severity};

/// Prints alerts to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => eprintln!("{} {}", "✗".red(), message.red()),
            Severity::Warning => eprintln!("{} {}", "!".yellow(), message.yellow()),
            Severity::Info => eprintln!("{}", message.dimmed()),
        }
    }
}
