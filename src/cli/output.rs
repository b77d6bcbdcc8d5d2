//! Terminal output for the CLI
//!
//! Every line is either colored or prefixed with a plain `[TAG]`, depending
//! on `--no-color`.

use owo_colors::{OwoColorize, Style};

const COLUMN_WIDTH: usize = 15;

/// Message kinds that share the `marker message` / `[TAG] message` layout
#[derive(Debug, Clone, Copy)]
enum Status {
    Ok,
    Info,
    Warn,
    Error,
}

impl Status {
    fn marker(self) -> &'static str {
        match self {
            Status::Ok => "✓",
            Status::Info => "•",
            Status::Warn => "⚠",
            Status::Error => "✗",
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Status::Ok => "[OK]",
            Status::Info => "[INFO]",
            Status::Warn => "[WARN]",
            Status::Error => "[ERROR]",
        }
    }

    fn style(self) -> Style {
        match self {
            Status::Ok => Style::new().green(),
            Status::Info => Style::new().blue(),
            Status::Warn => Style::new().yellow(),
            Status::Error => Style::new().red(),
        }
    }
}

/// CLI printer
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self { colored: true }
    }

    pub fn no_color() -> Self {
        Self { colored: false }
    }

    fn status_line(&self, status: Status, message: &str) -> String {
        if self.colored {
            let style = status.style();
            format!(
                "  {} {}",
                status.marker().style(style.bold()),
                // Info text stays in the default color
                match status {
                    Status::Info => message.to_string(),
                    _ => message.style(style).to_string(),
                }
            )
        } else {
            format!("  {} {}", status.tag(), message)
        }
    }

    /// Startup banner shown before the server starts listening
    pub fn banner(&self) {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        if self.colored {
            println!(
                "\n   {} {}\n   {}\n",
                "§ Regulations Agent".bright_cyan().bold(),
                version.dimmed(),
                "University Legislation QA System".bright_white()
            );
        } else {
            println!("\n   Regulations Agent {version}\n   University Legislation QA System\n");
        }
    }

    pub fn success(&self, message: &str) {
        println!("{}", self.status_line(Status::Ok, message));
    }

    pub fn info(&self, message: &str) {
        println!("{}", self.status_line(Status::Info, message));
    }

    pub fn warning(&self, message: &str) {
        println!("{}", self.status_line(Status::Warn, message));
    }

    /// Errors go to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.status_line(Status::Error, message));
    }

    /// A file written by `init`
    pub fn created(&self, kind: &str, path: &str) {
        if self.colored {
            println!("  {} {} {}", "✓".green().bold(), kind.dimmed(), path.bright_white());
        } else {
            println!("  [CREATED] {kind} {path}");
        }
    }

    /// A file `init` left alone
    pub fn skipped(&self, path: &str, reason: &str) {
        let reason = format!("({reason})");
        if self.colored {
            println!("  {} {} {}", "○".yellow(), path.dimmed(), reason.yellow());
        } else {
            println!("  [SKIPPED] {path} {reason}");
        }
    }

    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {title} ===");
        }
    }

    pub fn subheader(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.cyan().bold());
        } else {
            println!("\n  --- {title} ---");
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {key}: {value}");
        }
    }

    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {item}", "•".blue());
        } else {
            println!("    - {item}");
        }
    }

    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {}", message.dimmed().italic());
        } else {
            println!("\n  [TIP] {message}");
        }
    }

    /// A shell command the user can copy
    pub fn command(&self, cmd: &str) {
        let line = format!("$ {cmd}");
        if self.colored {
            println!("     {}", line.bright_cyan());
        } else {
            println!("     {line}");
        }
    }

    pub fn complete(&self, message: &str) {
        if self.colored {
            println!("\n  {}", message.bright_green().bold());
        } else {
            println!("\n  [DONE] {message}");
        }
    }

    pub fn table_header(&self, columns: &[&str]) {
        let header = pad_columns(columns);
        let rule_width = columns.len() * (COLUMN_WIDTH + 1);
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(rule_width).dimmed());
        } else {
            println!("    {header}");
            println!("    {}", "-".repeat(rule_width));
        }
    }

    pub fn table_row(&self, values: &[&str]) {
        println!("    {}", pad_columns(values));
    }

    pub fn newline(&self) {
        println!();
    }
}

fn pad_columns(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("{:<width$}", v, width = COLUMN_WIDTH))
        .collect::<Vec<_>>()
        .join(" ")
}
