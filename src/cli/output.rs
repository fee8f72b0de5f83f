//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the I.R.I.S CLI.

use owo_colors::OwoColorize;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the I.R.I.S banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                "\n   {} {}\n",
                "I.R.I.S".bright_cyan().bold(),
                format!(
                    "Iterative Research & Intelligent Synthesis v{}",
                    env!("CARGO_PKG_VERSION")
                )
                .dimmed()
            );
        } else {
            println!(
                "\n   I.R.I.S - Iterative Research & Intelligent Synthesis v{}\n",
                env!("CARGO_PKG_VERSION")
            );
        }
    }

    /// Print a section heading
    pub fn heading(&self, title: &str) {
        if self.colored {
            println!("{}", title.bright_white().bold());
        } else {
            println!("{}", title);
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a dimmed detail line, indented under the preceding entry
    pub fn detail(&self, message: &str) {
        if self.colored {
            println!("      {}", message.dimmed());
        } else {
            println!("      {}", message);
        }
    }
}
