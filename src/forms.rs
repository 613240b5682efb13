//! Order questionnaires — static conversation texts, wizard steps,
//! finalization.
//!
//! The software-order wizard collects [`PROGRAM_FORM_STEPS`] free-text
//! answers, one message each; answer content is never validated —
//! judgment is deferred to the human operator.

use crate::session::PROGRAM_FORM_STEPS;
use crate::submission::{Category, Field, OrderSubmission};

// ── Conversation texts ──────────────────────────────────────────────

pub const WELCOME: &str = "👋 Добро пожаловать! Я помогу вам с заказом.";

pub const CHOOSE_CATEGORY: &str = "Выберите тип услуги:";

pub const ART_TERMS: &str = "🎨 Условия заказа арта:\n\
                             • Срок исполнения: 3-7 дней\n\
                             • Предоплата 50%\n\
                             • Правки на этапе скетча";

pub const PROGRAM_TERMS: &str = "💻 Условия заказа программы:\n\
                                 • Срок разработки: от 2 недель\n\
                                 • Техническое задание обязательно\n\
                                 • нужен первоначальный взнос";

pub const ART_FORM_INSTRUCTIONS: &str = "Пример заполнения анкеты:\n\n\
                                         1. Тип арта\n\
                                         2. Персонажи\n\
                                         3. Позы\n\
                                         4. Идея арты\n\
                                         5. Дедлайн\n\
                                         6. ВАШИ КОНТАКТЫ\n\
                                         Отправьте всю информацию ОДНИМ сообщением:";

pub const SUBMISSION_ACK: &str = "✅ Ваша заявка принята!";

// ── Button labels ───────────────────────────────────────────────────

pub const BTN_ORDER: &str = "🛍️ Заказать";
pub const BTN_ORDER_ART: &str = "🎨 Заказать арт";
pub const BTN_ORDER_PROGRAM: &str = "💻 Заказать программу";
pub const BTN_FILL_FORM: &str = "📝 Заполнить анкету";

// ── Wizard steps ────────────────────────────────────────────────────

/// Prompt asking for the wizard answer at `step` (0-based).
pub fn step_prompt(step: usize) -> &'static str {
    match step {
        0 => "Заполните пошаговую анкету:\n\nШаг 1/5: Опишите назначение программы",
        1 => "Шаг 2/5: Требуемый функционал",
        2 => "Шаг 3/5: Технические требования",
        3 => "Шаг 4/5: Сроки и бюджет",
        _ => "Шаг 5/5: ваши контакты чтобы связаться",
    }
}

/// Labels for the forwarded wizard answers, in forward order.
const PROGRAM_FIELD_LABELS: [&str; PROGRAM_FORM_STEPS] = [
    "Назначение",
    "Функционал",
    "Требования",
    "Бюджет/Сроки",
    "контакты",
];

/// Outcome of recording one wizard answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// More steps remain; send `prompt` next.
    InProgress {
        answers: Vec<String>,
        prompt: &'static str,
    },
    /// All steps collected; the wizard is complete.
    Complete { answers: Vec<String> },
}

/// Append one answer to the wizard. The fifth answer completes the
/// form; until then the next step's prompt is returned.
pub fn record_answer(mut answers: Vec<String>, body: &str) -> StepOutcome {
    answers.push(body.to_string());
    if answers.len() >= PROGRAM_FORM_STEPS {
        StepOutcome::Complete { answers }
    } else {
        let prompt = step_prompt(answers.len());
        StepOutcome::InProgress { answers, prompt }
    }
}

/// Build the forwarded submission from the five collected answers.
///
/// The "контакты" line carries the budget/timeline answer; the fifth
/// answer is accepted but not forwarded.
pub fn finalize_program(submitter: &str, answers: &[String]) -> OrderSubmission {
    debug_assert_eq!(answers.len(), PROGRAM_FORM_STEPS);
    let values = [
        answers[0].as_str(),
        answers[1].as_str(),
        answers[2].as_str(),
        answers[3].as_str(),
        answers[3].as_str(),
    ];
    let fields = PROGRAM_FIELD_LABELS
        .iter()
        .zip(values)
        .map(|(label, value)| Field::new(*label, value))
        .collect();
    OrderSubmission {
        category: Category::Program,
        submitter: submitter.into(),
        fields,
    }
}
