//! Grading and completeness checks over a whole prompt.
//!
//! Both entry points are total: whatever the submission looks like, they
//! return a result instead of an error.

use serde::{Deserialize, Serialize};

use crate::feedback::{render, FeedbackMessages};
use crate::matcher::{self, Reason};
use crate::normalize::{normalize, Submission};
use crate::solution::{SlotId, SolutionTable};

/// How a submission was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The prompt has no blanks.
    NothingToGrade,
    /// The submission carried no answer for any blank.
    NoAnswerRecorded,
    /// Every blank was judged.
    Graded,
}

/// Judgement of one blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlankResult {
    pub slot_id: SlotId,
    /// The trimmed answer, empty when none was given.
    pub submitted: String,
    pub correct: bool,
    pub reason: Reason,
    pub message: String,
}

/// Result of grading one submission against one prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    /// True only when every blank is correct (or there are none).
    pub valid: bool,
    pub outcome: Outcome,
    pub correct_count: usize,
    pub total_count: usize,
    /// Fraction of correct blanks in `[0, 1]`.
    pub score: f64,
    /// Aggregate pass/fail line.
    pub message: String,
    /// Extra lines for the student: one per missed blank, or the reason
    /// nothing could be graded.
    pub details: Vec<String>,
    /// Every blank in slot id order. Empty unless `outcome` is `Graded`.
    pub blanks: Vec<BlankResult>,
}

impl GradingResult {
    /// Number of blanks that were not answered correctly.
    pub fn error_count(&self) -> usize {
        self.total_count - self.correct_count
    }
}

/// Grade `raw` against `table` with the default feedback wording.
pub fn grade(table: &SolutionTable, raw: &Submission) -> GradingResult {
    grade_with(table, raw, &FeedbackMessages::default())
}

/// Grade `raw` against `table`.
pub fn grade_with(
    table: &SolutionTable,
    raw: &Submission,
    messages: &FeedbackMessages,
) -> GradingResult {
    let total = table.len();

    if table.is_empty() {
        return GradingResult {
            valid: true,
            outcome: Outcome::NothingToGrade,
            correct_count: 0,
            total_count: 0,
            score: 1.0,
            message: render(&messages.nothing_to_grade, None, 0, 0),
            details: Vec::new(),
            blanks: Vec::new(),
        };
    }

    let answers = normalize(raw, table.ids());

    if answers.is_empty() {
        tracing::debug!("no answer recorded for any of {total} blank(s)");
        return GradingResult {
            valid: false,
            outcome: Outcome::NoAnswerRecorded,
            correct_count: 0,
            total_count: total,
            score: 0.0,
            message: render(&messages.no_answer, None, 0, total),
            details: vec![render(&messages.no_answer_detail, None, 0, total)],
            blanks: Vec::new(),
        };
    }

    let blanks: Vec<BlankResult> = table
        .slots()
        .map(|slot| {
            let submitted = answers.answer(&slot.id);
            let verdict = matcher::check(slot, submitted);
            let template = match verdict.reason {
                _ if verdict.correct => &messages.blank_correct,
                Reason::Missing => &messages.blank_missing,
                _ => &messages.blank_incorrect,
            };
            BlankResult {
                slot_id: slot.id.clone(),
                submitted: submitted.to_string(),
                correct: verdict.correct,
                reason: verdict.reason,
                message: render(template, Some(slot.id.as_str()), 0, total),
            }
        })
        .collect();

    let correct = blanks.iter().filter(|b| b.correct).count();
    let valid = correct == total;
    let template = if valid {
        &messages.all_correct
    } else {
        &messages.some_incorrect
    };
    let details = blanks
        .iter()
        .filter(|b| !b.correct)
        .map(|b| b.message.clone())
        .collect();

    tracing::debug!("graded {correct}/{total} blank(s) correct");

    GradingResult {
        valid,
        outcome: Outcome::Graded,
        correct_count: correct,
        total_count: total,
        score: correct as f64 / total as f64,
        message: render(template, None, correct, total),
        details,
        blanks,
    }
}

/// True when every blank of `table` has a non-empty answer in `raw`.
pub fn is_complete(table: &SolutionTable, raw: &Submission) -> bool {
    if table.is_empty() {
        return true;
    }
    let answers = normalize(raw, table.ids());
    table.ids().all(|id| !answers.answer(id).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PROMPT: &str =
        "Water is {1:SHORTANSWER:=H2O|h2o}. Boils at {2:NUMERICAL:=100±0.5} C.";

    fn sub(value: serde_json::Value) -> Submission {
        Submission::from(value)
    }

    #[test]
    fn all_correct() {
        let table = SolutionTable::from_prompt(PROMPT);
        let result = grade(&table, &sub(json!(r#"{"1":"h2o","2":"100.3"}"#)));
        assert!(result.valid);
        assert_eq!(result.outcome, Outcome::Graded);
        assert_eq!(result.correct_count, 2);
        assert_eq!(result.total_count, 2);
        assert_eq!(result.score, 1.0);
        assert_eq!(result.message, "Correct. (2/2)");
        assert!(result.details.is_empty());
    }

    #[test]
    fn all_wrong() {
        let table = SolutionTable::from_prompt(PROMPT);
        let result = grade(&table, &sub(json!({"1": "Ice", "2": "99"})));
        assert!(!result.valid);
        assert_eq!(result.outcome, Outcome::Graded);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.error_count(), 2);
        assert_eq!(
            result.details,
            vec!["Blank 1: incorrect.", "Blank 2: incorrect."]
        );
    }

    #[test]
    fn empty_submission_is_not_a_partial_miss() {
        let table = SolutionTable::from_prompt(PROMPT);
        let result = grade(&table, &sub(json!("")));
        assert!(!result.valid);
        assert_eq!(result.outcome, Outcome::NoAnswerRecorded);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.total_count, 2);
        assert!(result.blanks.is_empty());
        assert_eq!(result.message, "Please answer all the questions.");
        assert_eq!(
            result.details,
            vec!["Your answers were not recorded correctly (empty submission)."]
        );
    }

    #[test]
    fn partial_and_missing_blanks() {
        let table = SolutionTable::from_prompt(PROMPT);
        let result = grade(&table, &sub(json!({"1": "H2O", "2": "  "})));
        assert!(!result.valid);
        assert_eq!(result.correct_count, 1);
        assert_eq!(result.score, 0.5);
        assert_eq!(result.blanks[1].reason, Reason::Missing);
        assert_eq!(result.details, vec!["Blank 2: missing answer."]);
        assert_eq!(result.message, "Some answers are incorrect. (1/2)");
    }

    #[test]
    fn blank_payload_grades_the_same_inside_a_list() {
        let table = SolutionTable::from_prompt("{1:SHORTANSWER:=a} {2:SHORTANSWER:=b}");
        let direct = grade(&table, &sub(json!(r#"{"1":""}"#)));
        let listed = grade(&table, &sub(json!([r#"{"1":""}"#])));
        assert_eq!(direct.outcome, Outcome::Graded);
        assert_eq!(listed.outcome, direct.outcome);
        assert_eq!(listed.details, direct.details);
        assert_eq!(listed.blanks[0].reason, Reason::Missing);

        let both_blank = grade(&table, &sub(json!([r#"{"1":"","2":""}"#])));
        assert_eq!(both_blank.outcome, Outcome::Graded);
        assert_eq!(both_blank.error_count(), 2);
    }

    #[test]
    fn omitted_slot_is_a_miss() {
        let table = SolutionTable::from_prompt(PROMPT);
        let result = grade(&table, &sub(json!({"2": "100"})));
        assert_eq!(result.outcome, Outcome::Graded);
        assert_eq!(result.blanks[0].submitted, "");
        assert!(!result.blanks[0].correct);
        assert!(result.blanks[1].correct);
    }

    #[test]
    fn no_blanks_always_passes() {
        let table = SolutionTable::from_prompt("Just read this {carefully}.");
        for raw in [json!(null), json!(""), json!({"1": "x"}), json!([1, 2])] {
            let result = grade(&table, &sub(raw));
            assert!(result.valid);
            assert_eq!(result.score, 1.0);
            assert_eq!(result.outcome, Outcome::NothingToGrade);
        }
    }

    #[test]
    fn exact_numeric_without_tolerance() {
        let table = SolutionTable::from_prompt("{1:NUMERICAL:=42}");
        let result = grade(&table, &sub(json!({"1": "42.0000001"})));
        assert!(!result.valid);
        assert_eq!(result.blanks[0].reason, Reason::OutsideTolerance);
    }

    #[test]
    fn duplicate_slot_grades_against_later_definition() {
        let table = SolutionTable::from_prompt("{1:SHORTANSWER:=A} ... {1:SHORTANSWER:=B}");
        assert!(!grade(&table, &sub(json!({"1": "A"}))).valid);
        assert!(grade(&table, &sub(json!({"1": "b"}))).valid);
    }

    #[test]
    fn misconfigured_blank_never_passes() {
        let table = SolutionTable::from_prompt("{1:NUMERICAL:=abc} {2:SHORTANSWER:=ok}");
        let result = grade(&table, &sub(json!({"1": "abc", "2": "OK"})));
        assert_eq!(result.correct_count, 1);
        assert_eq!(result.blanks[0].reason, Reason::Unsatisfiable);
    }

    #[test]
    fn blanks_reported_in_numeric_slot_order() {
        let table = SolutionTable::from_prompt(
            "{10:SHORTANSWER:=j} {9:SHORTANSWER:=i} {1:SHORTANSWER:=a}",
        );
        let result = grade(&table, &sub(json!({"1": "a", "9": "i", "10": "j"})));
        let ids: Vec<_> = result.blanks.iter().map(|b| b.slot_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "9", "10"]);
    }

    #[test]
    fn grading_is_deterministic() {
        let table = SolutionTable::from_prompt(PROMPT);
        let raw = sub(json!({"1": "water", "2": "100.5"}));
        assert_eq!(grade(&table, &raw), grade(&table, &raw));
    }

    #[test]
    fn shared_table_across_threads() {
        let table = SolutionTable::from_prompt(PROMPT);
        let raw = sub(json!({"1": "H2O", "2": "99.6"}));
        let expected = grade(&table, &raw);

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8).map(|_| s.spawn(|| grade(&table, &raw))).collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn custom_messages() {
        let messages = FeedbackMessages {
            blank_incorrect: "#{slot} wrong".into(),
            some_incorrect: "{correct} of {total}".into(),
            ..FeedbackMessages::default()
        };
        let table = SolutionTable::from_prompt(PROMPT);
        let result = grade_with(&table, &sub(json!({"1": "h2o", "2": "1"})), &messages);
        assert_eq!(result.message, "1 of 2");
        assert_eq!(result.details, vec!["#2 wrong"]);
    }

    #[test]
    fn completeness() {
        let table = SolutionTable::from_prompt(PROMPT);
        assert!(is_complete(&table, &sub(json!({"1": "x", "2": "y"}))));
        assert!(!is_complete(&table, &sub(json!({"1": "x", "2": " "}))));
        assert!(!is_complete(&table, &sub(json!({"1": "x"}))));
        assert!(!is_complete(&table, &sub(json!(""))));
        assert!(!is_complete(&table, &sub(json!(null))));
        assert!(is_complete(
            &SolutionTable::from_prompt("no blanks"),
            &sub(json!(null))
        ));
    }
}
