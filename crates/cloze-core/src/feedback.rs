//! Human-readable feedback strings.
//!
//! Every message shown to a student comes from [`FeedbackMessages`], so a
//! course can reword or translate them from its config file. Messages may
//! contain `{slot}`, `{correct}` and `{total}` placeholders.

use serde::{Deserialize, Serialize};

/// Message templates used when building a grading result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackMessages {
    /// Per-blank, when the answer is accepted.
    pub blank_correct: String,
    /// Per-blank, when the answer is rejected.
    pub blank_incorrect: String,
    /// Per-blank, when nothing was entered.
    pub blank_missing: String,
    /// Aggregate, when every blank is correct.
    pub all_correct: String,
    /// Aggregate, when at least one blank is wrong or missing.
    pub some_incorrect: String,
    /// Aggregate, when no answer was recorded at all.
    pub no_answer: String,
    /// Detail line accompanying `no_answer`.
    pub no_answer_detail: String,
    /// Aggregate, when the prompt contains no blanks.
    pub nothing_to_grade: String,
}

impl Default for FeedbackMessages {
    fn default() -> Self {
        Self {
            blank_correct: "Blank {slot}: correct.".into(),
            blank_incorrect: "Blank {slot}: incorrect.".into(),
            blank_missing: "Blank {slot}: missing answer.".into(),
            all_correct: "Correct. ({correct}/{total})".into(),
            some_incorrect: "Some answers are incorrect. ({correct}/{total})".into(),
            no_answer: "Please answer all the questions.".into(),
            no_answer_detail: "Your answers were not recorded correctly (empty submission).".into(),
            nothing_to_grade: "Nothing to grade.".into(),
        }
    }
}

/// Substitute the known placeholders in `template`.
pub fn render(template: &str, slot: Option<&str>, correct: usize, total: usize) -> String {
    let mut out = template
        .replace("{correct}", &correct.to_string())
        .replace("{total}", &total.to_string());
    if let Some(slot) = slot {
        out = out.replace("{slot}", slot);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_fills_placeholders() {
        let msgs = FeedbackMessages::default();
        assert_eq!(render(&msgs.blank_missing, Some("3"), 0, 0), "Blank 3: missing answer.");
        assert_eq!(
            render(&msgs.some_incorrect, None, 1, 2),
            "Some answers are incorrect. (1/2)"
        );
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let msgs: FeedbackMessages = toml::from_str(r#"blank_correct = "Lücke {slot}: richtig.""#).unwrap();
        assert_eq!(msgs.blank_correct, "Lücke {slot}: richtig.");
        assert_eq!(msgs.blank_incorrect, FeedbackMessages::default().blank_incorrect);
    }
}
