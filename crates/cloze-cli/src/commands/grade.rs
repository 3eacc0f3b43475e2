//! The `cloze grade` command.

use std::path::PathBuf;

use anyhow::Result;

use cloze_core::config::load_config_from;
use cloze_core::report::SubmissionReport;
use cloze_core::task::parse_task;

use super::read_task_input;

pub fn execute(
    task_path: PathBuf,
    submission_path: PathBuf,
    problem: Option<String>,
    format: String,
    output: Option<PathBuf>,
    save: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let task = parse_task(&task_path)?;
    let task = match problem.as_deref() {
        Some(id) => task.only(id)?,
        None => task,
    };
    let input = read_task_input(&submission_path, problem.as_deref())?;

    let results = task.grade(&input, &config.feedback);
    let report = SubmissionReport::new(&task, results);

    tracing::info!(
        "graded task {}: {}/{} blank(s) correct",
        task.id,
        report.correct_count,
        report.total_count
    );

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "markdown" | "md" => println!("{}", report.to_markdown()),
        "text" => print_text(&report),
        other => anyhow::bail!("unknown format: {other} (expected text, json or markdown)"),
    }

    let output = match output {
        Some(path) => Some(path),
        None if save => Some(
            config
                .output_dir
                .join(format!("{}-{}.json", report.task.id, report.id)),
        ),
        None => None,
    };
    if let Some(path) = output {
        report.save_json(&path)?;
        eprintln!("Report saved to {}", path.display());
    }

    Ok(())
}

fn print_text(report: &SubmissionReport) {
    use comfy_table::{Cell, Table};

    println!("Task: {}", report.task.name);

    for problem in &report.problems {
        let result = &problem.result;
        println!("\n[{}] {}", problem.problem_id, result.message);

        if result.blanks.is_empty() {
            for line in &result.details {
                println!("  {line}");
            }
            continue;
        }

        let mut table = Table::new();
        table.set_header(vec!["Blank", "Answer", "Result"]);
        for blank in &result.blanks {
            table.add_row(vec![
                Cell::new(&blank.slot_id),
                Cell::new(&blank.submitted),
                Cell::new(&blank.message),
            ]);
        }
        println!("{table}");
    }

    println!(
        "\nScore: {}/{} ({:.1}%) {}",
        report.correct_count,
        report.total_count,
        report.score * 100.0,
        if report.passed() { "PASS" } else { "FAIL" }
    );
}
