//! CLI console utilities

use colored::*;
use governor_core::InvocationOutcome;

/// CLI console for formatted output
pub struct CliConsole {
    verbose: bool,
}

impl CliConsole {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print an info message (verbose mode only)
    pub fn info(&self, message: &str) {
        if self.verbose {
            println!("{} {}", "ℹ".blue().bold(), message);
        }
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    pub fn warn(&self, message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    pub fn print_header(&self, title: &str) {
        println!();
        println!("{}", title.bold().underline());
        println!("{}", "=".repeat(title.chars().count()).dimmed());
    }

    /// Print one outcome; degraded answers are visibly tagged
    pub fn print_outcome(&self, index: usize, outcome: &InvocationOutcome) {
        let label = format!("[{}]", index);
        match outcome {
            InvocationOutcome::Success(text) => {
                println!("{} {}", label.green().bold(), text);
            }
            InvocationOutcome::FallbackUsed(text) => {
                println!("{} {} {}", label.yellow().bold(), "(fallback)".yellow(), text);
            }
            InvocationOutcome::QuotaExceeded => {
                println!("{} {}", label.red().bold(), "local quota exhausted".red());
            }
            InvocationOutcome::ProviderFailure(detail) => {
                println!("{} {} {}", label.red().bold(), "provider failure:".red(), detail);
            }
            InvocationOutcome::Cancelled => {
                println!("{} {}", label.dimmed(), "cancelled".dimmed());
            }
        }
    }

    /// Print a `key: value` line
    pub fn print_stat(&self, key: &str, value: impl std::fmt::Display) {
        println!("  {:<24} {}", format!("{}:", key).dimmed(), value);
    }
}
