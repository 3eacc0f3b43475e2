//! TOML task files.
//!
//! A task groups one or more cloze problems. Each problem's prompt is
//! compiled once on load; the compiled table is then reused for every
//! submission.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::feedback::FeedbackMessages;
use crate::grader::{self, GradingResult};
use crate::normalize::Submission;
use crate::solution::SolutionTable;

/// Intermediate TOML structure for parsing task files.
#[derive(Debug, Deserialize)]
struct TomlTaskFile {
    task: TomlTaskHeader,
    #[serde(default)]
    problems: Vec<TomlProblem>,
}

#[derive(Debug, Deserialize)]
struct TomlTaskHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlProblem {
    id: String,
    #[serde(default = "default_problem_type", rename = "type")]
    problem_type: String,
    #[serde(default)]
    name: Option<String>,
    text: String,
}

fn default_problem_type() -> String {
    "cloze".to_string()
}

/// One cloze problem with its compiled solution table.
#[derive(Debug, Clone)]
pub struct ClozeProblem {
    pub id: String,
    pub name: String,
    pub text: String,
    pub table: SolutionTable,
}

impl ClozeProblem {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let id = id.into();
        let text = text.into();
        Self {
            name: id.clone(),
            table: SolutionTable::from_prompt(&text),
            id,
            text,
        }
    }

    pub fn grade(&self, raw: &Submission) -> GradingResult {
        grader::grade(&self.table, raw)
    }

    pub fn grade_with(&self, raw: &Submission, messages: &FeedbackMessages) -> GradingResult {
        grader::grade_with(&self.table, raw, messages)
    }

    pub fn is_complete(&self, raw: &Submission) -> bool {
        grader::is_complete(&self.table, raw)
    }
}

/// A task made of cloze problems.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: String,
    pub problems: Vec<ClozeProblem>,
}

impl Task {
    /// Grade a task input: a JSON object mapping problem id to that
    /// problem's raw submission. Problems missing from the input are graded
    /// as if nothing was submitted.
    pub fn grade(&self, input: &Value, messages: &FeedbackMessages) -> Vec<(String, GradingResult)> {
        self.problems
            .iter()
            .map(|p| {
                let raw = problem_input(input, &p.id);
                (p.id.clone(), p.grade_with(&raw, messages))
            })
            .collect()
    }

    /// True when every problem has an answer for every blank.
    pub fn is_complete(&self, input: &Value) -> bool {
        self.completeness(input).iter().all(|(_, complete)| *complete)
    }

    /// Completeness per problem, in task order.
    pub fn completeness(&self, input: &Value) -> Vec<(String, bool)> {
        self.problems
            .iter()
            .map(|p| (p.id.clone(), p.is_complete(&problem_input(input, &p.id))))
            .collect()
    }

    pub fn blank_count(&self) -> usize {
        self.problems.iter().map(|p| p.table.len()).sum()
    }

    /// A copy of this task narrowed to the single problem `problem_id`.
    pub fn only(&self, problem_id: &str) -> Result<Task> {
        let problem = self
            .problems
            .iter()
            .find(|p| p.id == problem_id)
            .cloned()
            .with_context(|| {
                let known: Vec<&str> = self.problems.iter().map(|p| p.id.as_str()).collect();
                format!(
                    "unknown problem '{problem_id}' in task {} (known: {})",
                    self.id,
                    known.join(", ")
                )
            })?;

        Ok(Task {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            problems: vec![problem],
        })
    }
}

/// Extract one problem's raw value from a task input.
fn problem_input(input: &Value, problem_id: &str) -> Submission {
    input
        .get(problem_id)
        .cloned()
        .map(Submission::from)
        .unwrap_or_default()
}

/// Parse a single TOML task file.
pub fn parse_task(path: &Path) -> Result<Task> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read task file: {}", path.display()))?;

    parse_task_str(&content, path)
}

/// Parse a TOML string into a `Task` (useful for testing).
pub fn parse_task_str(content: &str, source_path: &Path) -> Result<Task> {
    let parsed: TomlTaskFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let problems = parsed
        .problems
        .into_iter()
        .map(|p| {
            if p.problem_type != "cloze" {
                anyhow::bail!(
                    "problem {}: unsupported type {:?} (expected \"cloze\")",
                    p.id,
                    p.problem_type
                );
            }
            let mut problem = ClozeProblem::new(p.id, p.text);
            if let Some(name) = p.name {
                problem.name = name;
            }
            Ok(problem)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Task {
        id: parsed.task.id,
        name: parsed.task.name,
        description: parsed.task.description,
        problems,
    })
}

/// Recursively load all `.toml` task files from a directory.
pub fn load_task_directory(dir: &Path) -> Result<Vec<Task>> {
    let mut tasks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            tasks.extend(load_task_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_task(&path) {
                Ok(task) => tasks.push(task),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(tasks)
}

/// An authoring problem found while validating a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// The problem ID (if applicable).
    pub problem_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a task for authoring mistakes that students would otherwise
/// discover the hard way.
pub fn validate_task(task: &Task) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for problem in &task.problems {
        if !seen_ids.insert(&problem.id) {
            warnings.push(ValidationWarning {
                problem_id: Some(problem.id.clone()),
                message: format!("duplicate problem ID: {}", problem.id),
            });
        }
    }

    if task.problems.is_empty() {
        warnings.push(ValidationWarning {
            problem_id: None,
            message: "task has no problems".into(),
        });
    }

    for problem in &task.problems {
        let warn = |message: String| ValidationWarning {
            problem_id: Some(problem.id.clone()),
            message,
        };

        if problem.table.is_empty() {
            warnings.push(warn("text contains no blanks; every submission passes".into()));
        }
        for id in problem.table.duplicates() {
            warnings.push(warn(format!(
                "blank {id} is defined more than once; only the last definition is graded"
            )));
        }
        for (id, err) in problem.table.config_errors() {
            warnings.push(warn(format!("blank {id} can never be answered correctly: {err}")));
        }
    }

    warnings
}

/// Starter task written by `cloze init`.
pub const EXAMPLE_TASK: &str = r#"[task]
id = "example"
name = "Example cloze task"
description = "A starter task with one text blank and one numeric blank."

[[problems]]
id = "p1"
type = "cloze"
name = "Water"
text = """
Water is {1:SHORTANSWER:=H2O}. Boiling point is {2:NUMERICAL:=100} C.
"""
"#;
