//! Per-user conversation state machine.

use serde::{Deserialize, Serialize};

/// Number of answers the software-order wizard collects.
pub const PROGRAM_FORM_STEPS: usize = 5;

/// Where a user currently is in the order conversation.
///
/// The flow is linear per category:
/// `Idle → SelectingCategory → ArtTermsShown → FillingArtForm → Idle`
/// for art, and
/// `Idle → SelectingCategory → ProgramTermsShown → FillingProgramForm → Idle`
/// for software. The wizard variant carries the answers collected so
/// far; a stored session never holds a completed wizard — the fifth
/// answer finalizes and resets to `Idle` within the same event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    SelectingCategory,
    ArtTermsShown,
    ProgramTermsShown,
    FillingArtForm,
    FillingProgramForm { answers: Vec<String> },
}

impl SessionState {
    /// Whether this state accepts free-text form input.
    pub fn is_filling_form(&self) -> bool {
        matches!(self, Self::FillingArtForm | Self::FillingProgramForm { .. })
    }

    /// Number of wizard answers collected so far (0 outside the wizard).
    pub fn collected_answers(&self) -> usize {
        match self {
            Self::FillingProgramForm { answers } => answers.len(),
            _ => 0,
        }
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::SelectingCategory => "selecting_category",
            Self::ArtTermsShown => "art_terms_shown",
            Self::ProgramTermsShown => "program_terms_shown",
            Self::FillingArtForm => "filling_art_form",
            Self::FillingProgramForm { .. } => "filling_program_form",
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
