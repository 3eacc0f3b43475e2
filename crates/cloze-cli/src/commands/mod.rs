pub mod check;
pub mod grade;
pub mod init;
pub mod validate;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Read a submission file (or stdin for `-`) as a task input.
///
/// Content that is not JSON is kept as a plain string. With `problem` set,
/// the content is wrapped as that problem's raw value.
pub fn read_task_input(path: &Path, problem: Option<&str>) -> Result<Value> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read submission from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read submission: {}", path.display()))?
    };

    let value: Value = serde_json::from_str(&content).unwrap_or_else(|_| {
        tracing::debug!("submission is not JSON, using it as a plain string");
        Value::String(content)
    });

    Ok(match problem {
        Some(id) => Value::Object([(id.to_string(), value)].into_iter().collect()),
        None => value,
    })
}
