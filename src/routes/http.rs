//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs include parameters and basic result info.

use std::sync::Arc;
use axum::{extract::State, Json, response::IntoResponse};
use axum::http::StatusCode;
use tracing::{info, instrument};

use crate::protocol::*;
use crate::state::AppState;
use crate::logic::*;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_list_exercises(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let out: Vec<ExerciseOut> = state.exercises_in_order().iter().map(|ex| to_out(ex)).collect();
  info!(target: "exercise", count = out.len(), "HTTP exercise listing served");
  Json(out)
}

#[instrument(level = "info", skip(state, body), fields(%body.exercise_id, answer_len = body.answer.len()))]
pub async fn http_post_check(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CheckIn>,
) -> impl IntoResponse {
  let verdict = evaluate_exercise(&state, &body.exercise_id, &body.answer).await;
  info!(target: "exercise", id = %body.exercise_id, correct = verdict.correct, "HTTP check evaluated");
  Json(VerdictOut::from(&verdict))
}

#[instrument(level = "info", skip(state, body), fields(%body.question_id, selected = body.choice.is_some()))]
pub async fn http_post_choice(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ChoiceIn>,
) -> impl IntoResponse {
  let verdict = evaluate_choice(&state, &body.question_id, body.choice.as_deref()).await;
  info!(target: "exercise", id = %body.question_id, correct = verdict.correct, "HTTP choice evaluated");
  Json(VerdictOut::from(&verdict))
}

#[instrument(level = "info", skip(state, body), fields(%body.quiz_id, selected = body.selections.len()))]
pub async fn http_post_quiz(
  State(state): State<Arc<AppState>>,
  Json(body): Json<QuizIn>,
) -> impl IntoResponse {
  let verdict = evaluate_quiz(&state, &body.quiz_id, &body.selections).await;
  info!(target: "exercise", id = %body.quiz_id, correct = verdict.correct, "HTTP quiz evaluated");
  Json(VerdictOut::from(&verdict))
}

#[instrument(level = "info", skip(state, body), fields(%body.solution_id))]
pub async fn http_post_toggle_solution(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ToggleIn>,
) -> impl IntoResponse {
  match toggle_solution(&state, &body.solution_id).await {
    Some(visible) => {
      let trigger_label = state
        .page
        .read()
        .await
        .solutions
        .get(&body.solution_id)
        .map(|p| p.trigger_label.clone())
        .unwrap_or_default();
      Json(ToggleOut { visible, trigger_label }).into_response()
    }
    None => (
      StatusCode::NOT_FOUND,
      format!("Unknown solution panel: {}", body.solution_id),
    )
      .into_response(),
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.group_id, %body.pane_id))]
pub async fn http_post_tab(
  State(state): State<Arc<AppState>>,
  Json(body): Json<TabIn>,
) -> impl IntoResponse {
  let shown = show_tab(&state, &body.group_id, &body.pane_id).await;
  Json(TabOut { shown })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(state.page_snapshot().await)
}
