//! Loading site configuration (shared feedback messages + static dir) from TOML.
//!
//! See `SiteConfig` and `Messages` for expected schema.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct SiteConfig {
  #[serde(default)]
  pub messages: Messages,
  #[serde(default)]
  pub static_dir: Option<String>,
}

/// Messages shared across choice questions and quizzes. Per-exercise text
/// lives with the rules; only the generic phrasing is tunable here.
#[derive(Clone, Debug, Deserialize)]
pub struct Messages {
  pub select_answer: String,
  pub answer_all: String,
  pub choice_correct: String,
  // `{answer}` is replaced with the correct option's label.
  pub choice_incorrect_template: String,
}

impl Default for Messages {
  fn default() -> Self {
    Self {
      select_answer: "Please select an answer.".into(),
      answer_all: "Please answer all questions.".into(),
      choice_correct: "Correct! Well done.".into(),
      choice_incorrect_template: "Incorrect. The correct answer is: {answer}".into(),
    }
  }
}

/// Attempt to load `SiteConfig` from SITE_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_site_config_from_env() -> Option<SiteConfig> {
  let path = std::env::var("SITE_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<SiteConfig>(&s) {
      Ok(cfg) => {
        info!(target: "rtutor_backend", %path, "Loaded site config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "rtutor_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "rtutor_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn messages_default_to_the_built_in_phrasing() {
    let m = Messages::default();
    assert_eq!(m.select_answer, "Please select an answer.");
    assert!(m.choice_incorrect_template.contains("{answer}"));
  }

  #[test]
  fn partial_toml_falls_back_to_defaults() {
    let cfg: SiteConfig = toml::from_str("static_dir = \"./public\"").expect("parse");
    assert_eq!(cfg.static_dir.as_deref(), Some("./public"));
    assert_eq!(cfg.messages.answer_all, "Please answer all questions.");
  }
}
