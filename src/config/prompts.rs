//! Prompt templates for vidtalk.
//!
//! The user template takes `{question}` and `{content}` placeholders. Both can be
//! overridden in the `[prompts]` section of the config file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Prompts sent to the chat model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatPrompts {
    /// System instruction.
    pub system: String,
    /// User message template.
    pub user: String,
}

impl Default for ChatPrompts {
    fn default() -> Self {
        Self {
            system: "You are a helpful and engaging assistant ready to chat.".to_string(),
            user: "{question}\n\nBased on the video content: {content}".to_string(),
        }
    }
}

impl ChatPrompts {
    /// Placeholders the user template is expected to contain.
    pub const PLACEHOLDERS: [&'static str; 2] = ["question", "content"];

    /// Placeholders missing from the user template.
    pub fn missing_placeholders(&self) -> Vec<&'static str> {
        Self::PLACEHOLDERS
            .iter()
            .copied()
            .filter(|name| !self.user.contains(&format!("{{{}}}", name)))
            .collect()
    }

    /// Render a template in a single pass.
    ///
    /// Substituted values are never re-scanned, so a transcript that happens to
    /// contain `{question}` is passed through untouched. Unknown placeholders
    /// are left as-is.
    pub fn render(template: &str, vars: &HashMap<&str, &str>) -> String {
        let mut out = String::with_capacity(
            template.len() + vars.values().map(|v| v.len()).sum::<usize>(),
        );
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            match after.find('}') {
                Some(close) => {
                    let name = &after[..close];
                    match vars.get(name) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push('{');
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[close + 1..];
                }
                None => {
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = ChatPrompts::default();
        assert!(prompts.system.contains("helpful and engaging assistant"));
        assert!(prompts.missing_placeholders().is_empty());
    }

    #[test]
    fn test_render_template() {
        let mut vars = HashMap::new();
        vars.insert("question", "Give me a summary");
        vars.insert("content", "The video explains X.");

        let result = ChatPrompts::render(&ChatPrompts::default().user, &vars);
        assert_eq!(
            result,
            "Give me a summary\n\nBased on the video content: The video explains X."
        );
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let mut vars = HashMap::new();
        vars.insert("question", "what is {content}?");
        vars.insert("content", "literal {question} text");

        let result = ChatPrompts::render("Q: {question} C: {content} {other} {", &vars);
        assert_eq!(result, "Q: what is {content}? C: literal {question} text {other} {");
    }

    #[test]
    fn test_missing_placeholders() {
        let prompts = ChatPrompts {
            system: String::new(),
            user: "Only {question}".to_string(),
        };
        assert_eq!(prompts.missing_placeholders(), vec!["content"]);
    }
}
