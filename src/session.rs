//! Per-session state: the loaded content block and the conversation so far.

use crate::config::ChatModel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The extracted spoken text of the currently loaded video.
///
/// Empty means nothing is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentBlock(String);

impl ContentBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}

impl std::fmt::Display for ContentBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ContentBlock {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// One question and its answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    question: String,
    answer: String,
    asked_at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            asked_at: Utc::now(),
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn asked_at(&self) -> DateTime<Utc> {
        self.asked_at
    }
}

/// Ordered turns, oldest first. Append-only apart from a full clear.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, turn: ConversationTurn) -> &ConversationTurn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConversationTurn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }
}

impl<'a> IntoIterator for &'a ConversationHistory {
    type Item = &'a ConversationTurn;
    type IntoIter = std::slice::Iter<'a, ConversationTurn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

/// Everything one interactive session owns.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub(crate) content: ContentBlock,
    pub(crate) reference: Option<String>,
    pub(crate) history: ConversationHistory,
    pub(crate) model: ChatModel,
}

impl SessionState {
    pub fn new(model: ChatModel) -> Self {
        Self {
            model,
            ..Self::default()
        }
    }

    /// The loaded content block (empty if nothing is loaded).
    pub fn content(&self) -> &ContentBlock {
        &self.content
    }

    /// Reference the current content was loaded from.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn model(&self) -> ChatModel {
        self.model
    }

    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_appends_in_order() {
        let mut history = ConversationHistory::new();
        history.push(ConversationTurn::new("first?", "one"));
        let last = history.push(ConversationTurn::new("second?", "two"));
        assert_eq!(last.answer(), "two");

        let questions: Vec<&str> = history.iter().map(|t| t.question()).collect();
        assert_eq!(questions, vec!["first?", "second?"]);
        assert_eq!(history.len(), 2);

        history.clear();
        assert!(history.is_empty());
        assert!(history.last().is_none());
    }

    #[test]
    fn test_content_block() {
        let block = ContentBlock::default();
        assert!(block.is_empty());

        let block = ContentBlock::new("the video explains X");
        assert_eq!(block.word_count(), 4);
        assert_eq!(block.to_string(), "the video explains X");
    }

    #[test]
    fn test_session_defaults() {
        let session = SessionState::new(ChatModel::Gpt4oMini);
        assert!(!session.has_content());
        assert!(session.reference().is_none());
        assert!(session.history().is_empty());
        assert_eq!(session.model(), ChatModel::Gpt4oMini);
    }
}
