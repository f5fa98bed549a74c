//! Application state: the exercise/choice/quiz banks, the page model, and
//! the renderer that writes verdicts into it.
//!
//! This module owns:
//!   - the exercise bank (by id, plus insertion order for listings)
//!   - the choice-question and quiz banks
//!   - the shared page model with its registered panes, panels, and tabs
//!   - site messages (from TOML or defaults)
//!
//! All render targets are registered at startup, so a missing pane at
//! evaluation time means a content bug, not a race.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{info, instrument};

use crate::config::{load_site_config_from_env, Messages};
use crate::domain::{ChoiceQuestion, Exercise, Quiz, Verdict};
use crate::render::{PageModel, PaneRenderer, Renderer};
use crate::rules::{choice_bank, exercise_bank, quiz_bank, tab_groups};

const DEFAULT_STATIC_DIR: &str = "./static";

#[derive(Clone)]
pub struct AppState {
    pub exercises: HashMap<&'static str, Exercise>,
    pub exercise_order: Vec<&'static str>,
    pub choices: HashMap<&'static str, ChoiceQuestion>,
    pub quizzes: HashMap<&'static str, Quiz>,
    pub page: Arc<RwLock<PageModel>>,
    pub renderer: PaneRenderer,
    pub messages: Messages,
    pub static_dir: String,
}

impl AppState {
    /// Build state from env: load config, compile the banks, register every
    /// render target. Fails on an invalid rule pattern or a duplicate id.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Result<Self, String> {
        let cfg = load_site_config_from_env();
        let messages = cfg
            .as_ref()
            .map(|c| c.messages.clone())
            .unwrap_or_default();
        let static_dir = cfg
            .and_then(|c| c.static_dir)
            .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string());

        let mut exercises = HashMap::<&'static str, Exercise>::new();
        let mut exercise_order = Vec::new();
        let mut page = PageModel::default();

        for ex in exercise_bank()? {
            page.register_pane(&ex.result_pane())?;
            page.register_solution(&ex.solution_panel())?;
            let id = ex.id;
            exercise_order.push(id);
            if exercises.insert(id, ex).is_some() {
                return Err(format!("duplicate exercise id: {id}"));
            }
        }

        let mut choices = HashMap::<&'static str, ChoiceQuestion>::new();
        for q in choice_bank() {
            page.register_pane(&q.result_pane())?;
            let id = q.id;
            if choices.insert(id, q).is_some() {
                return Err(format!("duplicate choice question id: {id}"));
            }
        }

        let mut quizzes = HashMap::<&'static str, Quiz>::new();
        for quiz in quiz_bank() {
            page.register_pane(&quiz.result_pane())?;
            let id = quiz.id;
            if quizzes.insert(id, quiz).is_some() {
                return Err(format!("duplicate quiz id: {id}"));
            }
        }

        for (group_id, panes) in tab_groups() {
            page.register_tab_group(group_id, panes)?;
        }

        // Inventory summary by topic.
        let mut count_by_topic: HashMap<&'static str, usize> = HashMap::new();
        for ex in exercises.values() {
            *count_by_topic.entry(ex.topic).or_insert(0) += 1;
        }
        for (topic, count) in count_by_topic {
            info!(target: "exercise", %topic, exercises = count, "Startup exercise inventory");
        }
        info!(
            target: "rtutor_backend",
            exercises = exercises.len(),
            choices = choices.len(),
            quizzes = quizzes.len(),
            %static_dir,
            "Content banks loaded"
        );

        Ok(Self {
            exercises,
            exercise_order,
            choices,
            quizzes,
            page: Arc::new(RwLock::new(page)),
            renderer: PaneRenderer,
            messages,
            static_dir,
        })
    }

    pub fn exercise(&self, id: &str) -> Option<&Exercise> {
        self.exercises.get(id)
    }

    pub fn choice(&self, id: &str) -> Option<&ChoiceQuestion> {
        self.choices.get(id)
    }

    pub fn quiz(&self, id: &str) -> Option<&Quiz> {
        self.quizzes.get(id)
    }

    /// Exercises in bank order, for listings.
    pub fn exercises_in_order(&self) -> Vec<&Exercise> {
        self.exercise_order
            .iter()
            .filter_map(|id| self.exercises.get(id))
            .collect()
    }

    /// Write a verdict into its result pane.
    #[instrument(level = "debug", skip(self, verdict), fields(%target, correct = verdict.correct))]
    pub async fn render_verdict(&self, target: &str, verdict: &Verdict) {
        let mut page = self.page.write().await;
        self.renderer
            .report(&mut page, target, verdict.correct, &verdict.message);
    }

    /// Snapshot of the whole page model for /api/v1/page.
    pub async fn page_snapshot(&self) -> PageModel {
        self.page.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_registers_every_render_target() {
        let state = AppState::new().expect("state");
        for ex in state.exercises.values() {
            let page = state.page.blocking_read();
            assert!(page.pane(&ex.result_pane()).is_some(), "{} pane missing", ex.id);
            assert!(
                page.solutions.contains_key(&ex.solution_panel()),
                "{} solution missing",
                ex.id
            );
        }
    }

    #[test]
    fn exercise_order_matches_the_bank() {
        let state = AppState::new().expect("state");
        assert_eq!(state.exercise_order.len(), state.exercises.len());
        let listed = state.exercises_in_order();
        assert_eq!(listed.len(), state.exercises.len());
        assert_eq!(listed[0].id, state.exercise_order[0]);
    }

    #[test]
    fn default_messages_apply_without_config() {
        let state = AppState::new().expect("state");
        assert_eq!(state.messages.select_answer, "Please select an answer.");
        assert_eq!(state.static_dir, "./static");
    }
}
