//! The `cloze init` command.

use anyhow::Result;

use cloze_core::task::EXAMPLE_TASK;

pub fn execute() -> Result<()> {
    if std::path::Path::new("cloze.toml").exists() {
        println!("cloze.toml already exists, skipping.");
    } else {
        std::fs::write("cloze.toml", SAMPLE_CONFIG)?;
        println!("Created cloze.toml");
    }

    std::fs::create_dir_all("tasks")?;
    let example_path = std::path::Path::new("tasks/example.toml");
    if example_path.exists() {
        println!("tasks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_TASK)?;
        println!("Created tasks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit tasks/example.toml and write your own blanks");
    println!("  2. Run: cloze validate --task tasks/example.toml");
    println!("  3. Run: cloze grade --task tasks/example.toml --submission answers.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# cloze configuration

output_dir = "./cloze-results"

# Every student-facing message can be reworded here.
# Placeholders: {slot}, {correct}, {total}
[feedback]
blank_correct = "Blank {slot}: correct."
blank_incorrect = "Blank {slot}: incorrect."
blank_missing = "Blank {slot}: missing answer."
all_correct = "Correct. ({correct}/{total})"
some_incorrect = "Some answers are incorrect. ({correct}/{total})"
no_answer = "Please answer all the questions."
no_answer_detail = "Your answers were not recorded correctly (empty submission)."
nothing_to_grade = "Nothing to grade."
"#;
