//! Grader configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::feedback::FeedbackMessages;

/// Top-level cloze configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClozeConfig {
    /// Feedback wording.
    #[serde(default)]
    pub feedback: FeedbackMessages,
    /// Where saved reports go when no explicit path is given.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./cloze-results")
}

impl Default for ClozeConfig {
    fn default() -> Self {
        Self {
            feedback: FeedbackMessages::default(),
            output_dir: default_output_dir(),
        }
    }
}

/// Load config from an explicit path, or search the well-known paths.
///
/// Search order when `path` is `None`:
/// 1. `cloze.toml` in the current directory
/// 2. `~/.config/cloze/config.toml`
///
/// `CLOZE_OUTPUT_DIR` overrides `output_dir`.
pub fn load_config_from(path: Option<&Path>) -> Result<ClozeConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("cloze.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ClozeConfig::default(),
    };

    if let Ok(dir) = std::env::var("CLOZE_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }

    Ok(config)
}

/// Parse a TOML config string.
pub fn parse_config_str(content: &str) -> Result<ClozeConfig> {
    Ok(toml::from_str(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("cloze"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ClozeConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("./cloze-results"));
        assert_eq!(config.feedback, FeedbackMessages::default());
    }

    #[test]
    fn parse_feedback_overrides() {
        let toml_str = r#"
output_dir = "graded"

[feedback]
all_correct = "Well done!"
no_answer = "Nothing was submitted."
"#;
        let config = parse_config_str(toml_str).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("graded"));
        assert_eq!(config.feedback.all_correct, "Well done!");
        assert_eq!(config.feedback.no_answer, "Nothing was submitted.");
        assert_eq!(
            config.feedback.blank_correct,
            FeedbackMessages::default().blank_correct
        );
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloze.toml");
        std::fs::write(&path, "[feedback]\nblank_missing = \"empty {slot}\"\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.feedback.blank_missing, "empty {slot}");
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(parse_config_str("feedback = [").is_err());
    }
}
