//! The `cloze check` command.

use std::path::PathBuf;

use anyhow::Result;

use cloze_core::task::parse_task;

use super::read_task_input;

pub fn execute(task_path: PathBuf, submission_path: PathBuf, problem: Option<String>) -> Result<()> {
    let task = parse_task(&task_path)?;
    let task = match problem.as_deref() {
        Some(id) => task.only(id)?,
        None => task,
    };
    let input = read_task_input(&submission_path, problem.as_deref())?;

    let completeness = task.completeness(&input);
    for (problem_id, complete) in &completeness {
        println!(
            "{problem_id}: {}",
            if *complete { "complete" } else { "incomplete" }
        );
    }

    if !completeness.iter().all(|(_, complete)| *complete) {
        anyhow::bail!("submission is incomplete: every blank needs an answer");
    }

    Ok(())
}
