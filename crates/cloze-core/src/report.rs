//! Submission reports with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grader::{GradingResult, Outcome};
use crate::task::Task;

/// Graded submission for a whole task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the submission was graded.
    pub created_at: DateTime<Utc>,
    /// Summary of the task.
    pub task: TaskSummary,
    /// One entry per problem, in task order.
    pub problems: Vec<ProblemOutcome>,
    /// Correct blanks across all problems.
    pub correct_count: usize,
    /// Blanks across all problems.
    pub total_count: usize,
    /// `correct_count / total_count`, or 1.0 for a task without blanks.
    pub score: f64,
}

/// Summary of a task (without the prompts).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSummary {
    pub id: String,
    pub name: String,
    pub problem_count: usize,
}

/// Grading result for one problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemOutcome {
    pub problem_id: String,
    pub result: GradingResult,
}

impl SubmissionReport {
    /// Build a report from per-problem results.
    pub fn new(task: &Task, results: Vec<(String, GradingResult)>) -> Self {
        let correct_count: usize = results.iter().map(|(_, r)| r.correct_count).sum();
        let total_count: usize = results.iter().map(|(_, r)| r.total_count).sum();
        let score = if total_count == 0 {
            1.0
        } else {
            correct_count as f64 / total_count as f64
        };

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            task: TaskSummary {
                id: task.id.clone(),
                name: task.name.clone(),
                problem_count: task.problems.len(),
            },
            problems: results
                .into_iter()
                .map(|(problem_id, result)| ProblemOutcome { problem_id, result })
                .collect(),
            correct_count,
            total_count,
            score,
        }
    }

    /// True when every problem passed.
    pub fn passed(&self) -> bool {
        self.problems.iter().all(|p| p.result.valid)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SubmissionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## {}\n\n", self.task.name));
        md.push_str(&format!(
            "**Score:** {}/{} ({:.1}%), {}\n\n",
            self.correct_count,
            self.total_count,
            self.score * 100.0,
            if self.passed() { "passed" } else { "failed" }
        ));

        for problem in &self.problems {
            let result = &problem.result;
            md.push_str(&format!("### {}\n\n{}\n\n", problem.problem_id, result.message));

            if result.outcome != Outcome::Graded {
                for line in &result.details {
                    md.push_str(&format!("- {line}\n"));
                }
                if !result.details.is_empty() {
                    md.push('\n');
                }
                continue;
            }

            md.push_str("| Blank | Answer | Result |\n");
            md.push_str("|-------|--------|--------|\n");
            for blank in &result.blanks {
                md.push_str(&format!(
                    "| {} | {} | {} |\n",
                    blank.slot_id,
                    escape_cell(&blank.submitted),
                    if blank.correct { "correct" } else { "incorrect" }
                ));
            }
            md.push('\n');
        }

        md
    }
}

fn escape_cell(s: &str) -> String {
    if s.is_empty() {
        return "_(empty)_".to_string();
    }
    s.replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace(['\n', '\r'], "<br>")
}
