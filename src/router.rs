//! Session router — pure state-machine transitions.
//!
//! One flat decision over `(current state, event)`: no I/O, no clock.
//! Button tokens double as idempotency guards — a press that is not
//! valid for the current state leaves the session untouched and
//! produces no reply, because chat clients redeliver stale taps.

use crate::channels::{Button, EventKind};
use crate::forms::{self, StepOutcome};
use crate::session::SessionState;
use crate::submission::OrderSubmission;

/// Callback tokens baked into the inline keyboards.
pub mod token {
    pub const START_ORDER: &str = "start_order";
    pub const ORDER_ART: &str = "order_art";
    pub const ORDER_PROGRAM: &str = "order_program";
    pub const FILL_ART_FORM: &str = "fill_art_form";
    pub const FILL_PROGRAM_FORM: &str = "fill_program_form";
}

/// How a reply should reach the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Append a new message.
    Send { text: String, buttons: Vec<Button> },
    /// Rewrite the message whose button was pressed.
    Edit { text: String, buttons: Vec<Button> },
}

impl Reply {
    fn send(text: &str) -> Self {
        Self::Send {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    fn send_with(text: &str, buttons: Vec<Button>) -> Self {
        Self::Send {
            text: text.into(),
            buttons,
        }
    }

    fn edit(text: &str, buttons: Vec<Button>) -> Self {
        Self::Edit {
            text: text.into(),
            buttons,
        }
    }
}

/// Result of routing one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub next: SessionState,
    pub reply: Option<Reply>,
    pub submission: Option<OrderSubmission>,
}

impl Outcome {
    fn stay(state: SessionState) -> Self {
        Self {
            next: state,
            reply: None,
            submission: None,
        }
    }

    fn advance(next: SessionState, reply: Reply) -> Self {
        Self {
            next,
            reply: Some(reply),
            submission: None,
        }
    }

    fn finalize(reply: Reply, submission: OrderSubmission) -> Self {
        Self {
            next: SessionState::Idle,
            reply: Some(reply),
            submission: Some(submission),
        }
    }
}

/// Decide the next state, reply, and (on form completion) submission
/// for one inbound event.
pub fn route(state: SessionState, event: &EventKind) -> Outcome {
    match event {
        // /start restarts the flow from anywhere; an in-progress form
        // is discarded silently.
        EventKind::StartCommand => Outcome::advance(
            SessionState::Idle,
            Reply::send_with(
                forms::WELCOME,
                vec![Button::new(forms::BTN_ORDER, token::START_ORDER)],
            ),
        ),
        EventKind::ButtonPressed { token } => route_button(state, token),
        EventKind::TextMessage {
            body,
            sender_handle,
        } => route_text(state, body, sender_handle),
    }
}

fn route_button(state: SessionState, pressed: &str) -> Outcome {
    use SessionState::*;

    match (state, pressed) {
        (Idle, token::START_ORDER) => Outcome::advance(
            SelectingCategory,
            Reply::edit(
                forms::CHOOSE_CATEGORY,
                vec![
                    Button::new(forms::BTN_ORDER_ART, token::ORDER_ART),
                    Button::new(forms::BTN_ORDER_PROGRAM, token::ORDER_PROGRAM),
                ],
            ),
        ),
        (SelectingCategory, token::ORDER_ART) => Outcome::advance(
            ArtTermsShown,
            Reply::edit(
                forms::ART_TERMS,
                vec![Button::new(forms::BTN_FILL_FORM, token::FILL_ART_FORM)],
            ),
        ),
        (SelectingCategory, token::ORDER_PROGRAM) => Outcome::advance(
            ProgramTermsShown,
            Reply::edit(
                forms::PROGRAM_TERMS,
                vec![Button::new(forms::BTN_FILL_FORM, token::FILL_PROGRAM_FORM)],
            ),
        ),
        (ArtTermsShown, token::FILL_ART_FORM) => Outcome::advance(
            FillingArtForm,
            Reply::send(forms::ART_FORM_INSTRUCTIONS),
        ),
        (ProgramTermsShown, token::FILL_PROGRAM_FORM) => Outcome::advance(
            SessionState::FillingProgramForm {
                answers: Vec::new(),
            },
            Reply::send(forms::step_prompt(0)),
        ),
        // Stale or foreign token: no-op.
        (state, _) => Outcome::stay(state),
    }
}

fn route_text(state: SessionState, body: &str, sender_handle: &str) -> Outcome {
    use SessionState::*;

    match state {
        FillingArtForm => Outcome::finalize(
            Reply::send(forms::SUBMISSION_ACK),
            OrderSubmission::art(sender_handle, body),
        ),
        FillingProgramForm { answers } => match forms::record_answer(answers, body) {
            StepOutcome::InProgress { answers, prompt } => Outcome::advance(
                FillingProgramForm { answers },
                Reply::send(prompt),
            ),
            StepOutcome::Complete { answers } => Outcome::finalize(
                Reply::send(forms::SUBMISSION_ACK),
                forms::finalize_program(sender_handle, &answers),
            ),
        },
        // Free text outside a form: no-op.
        other => Outcome::stay(other),
    }
}

// ── Tests ───────────────────────────────────────────────────────────
