//! Finalized order submissions and their operator-facing rendering.

use serde::{Deserialize, Serialize};

/// Service category an order belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Art,
    Program,
}

impl Category {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Art => "art",
            Self::Program => "program",
        }
    }
}

/// A single labeled answer in a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub label: String,
    pub value: String,
}

impl Field {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A finished order, ready to be forwarded to the operator chat.
///
/// Never persisted — it exists only between finalization and the
/// forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSubmission {
    pub category: Category,
    /// Telegram handle of the submitter ("unknown" when hidden).
    pub submitter: String,
    /// Ordered labeled answers.
    pub fields: Vec<Field>,
}

impl OrderSubmission {
    /// Single-shot art order: the whole questionnaire arrives as one
    /// message, forwarded verbatim.
    pub fn art(submitter: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            category: Category::Art,
            submitter: submitter.into(),
            fields: vec![Field::new("Данные", body)],
        }
    }

    /// Render the operator-chat message for this submission.
    pub fn render(&self) -> String {
        let (header, body) = match self.category {
            Category::Art => (
                "🚨 Новая заявка на арт!",
                self.fields
                    .first()
                    .map(|f| f.value.clone())
                    .unwrap_or_default(),
            ),
            Category::Program => (
                "🚀 Новая заявка на программу!",
                self.fields
                    .iter()
                    .enumerate()
                    .map(|(i, f)| format!("{}. {}: {}", i + 1, f.label, f.value))
                    .collect::<Vec<_>>()
                    .join("\n\n"),
            ),
        };
        format!("{header}\n\nОт: @{}\nДанные:\n{body}", self.submitter)
    }
}
