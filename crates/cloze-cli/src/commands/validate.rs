//! The `cloze validate` command.

use std::path::PathBuf;

use anyhow::Result;

use cloze_core::task::{load_task_directory, parse_task, validate_task};

pub fn execute(task_path: PathBuf) -> Result<()> {
    let tasks = if task_path.is_dir() {
        load_task_directory(&task_path)?
    } else {
        vec![parse_task(&task_path)?]
    };

    let mut total_warnings = 0;

    for task in &tasks {
        println!(
            "Task: {} ({} problems, {} blanks)",
            task.name,
            task.problems.len(),
            task.blank_count()
        );

        for problem in &task.problems {
            println!("  [{}] {}", problem.id, problem.name);
            for slot in problem.table.slots() {
                println!("    {} {}: {}", slot.id, slot.kind, slot.describe());
            }
        }

        let warnings = validate_task(task);
        for w in &warnings {
            let prefix = w
                .problem_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All tasks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
