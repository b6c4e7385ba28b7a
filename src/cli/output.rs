//! CLI output formatting utilities.

use crate::error::VidtalkError;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a recoverable failure, labelled by its kind.
    pub fn failure(err: &VidtalkError) {
        Self::error(&format!("{} {}", style(format!("[{}]", err.kind())).dim(), err));
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print a message from the user side of the conversation.
    pub fn user_message(text: &str) {
        println!("\n{} {}", style("You:").green().bold(), text);
    }

    /// Print a message from the assistant side of the conversation.
    pub fn assistant_message(text: &str) {
        println!("\n{} {}\n", style("Assistant:").cyan().bold(), text);
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) =
            ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
        {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate content with ellipsis, on a character boundary.
pub fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let cut: String = content.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_preview() {
        assert_eq!(content_preview("short", 10), "short");
        assert_eq!(content_preview("line\nbreak", 20), "line break");
        assert_eq!(content_preview("abcdefghij", 4), "abcd...");
        assert_eq!(content_preview("ééééé", 2), "éé...");
    }
}
