//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::protocol::{to_out, ClientWsMessage, ExerciseOut, ServerWsMessage};
use crate::logic::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "rtutor_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "rtutor_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target = "rtutor_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "rtutor_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "rtutor_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(msg, state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::CheckExercise { exercise_id, answer } => {
      let verdict = evaluate_exercise(state, &exercise_id, &answer).await;
      let target = state
        .exercise(&exercise_id)
        .map(|ex| ex.result_pane())
        .unwrap_or_default();
      tracing::info!(target: "exercise", id = %exercise_id, correct = verdict.correct, "WS check_exercise evaluated");
      ServerWsMessage::Verdict { target, correct: verdict.correct, message: verdict.message }
    }

    ClientWsMessage::CheckChoice { question_id, choice } => {
      let verdict = evaluate_choice(state, &question_id, choice.as_deref()).await;
      let target = state
        .choice(&question_id)
        .map(|q| q.result_pane())
        .unwrap_or_default();
      tracing::info!(target: "exercise", id = %question_id, correct = verdict.correct, "WS check_choice evaluated");
      ServerWsMessage::Verdict { target, correct: verdict.correct, message: verdict.message }
    }

    ClientWsMessage::CheckQuiz { quiz_id, selections } => {
      let verdict = evaluate_quiz(state, &quiz_id, &selections).await;
      let target = state.quiz(&quiz_id).map(|q| q.result_pane()).unwrap_or_default();
      tracing::info!(target: "exercise", id = %quiz_id, correct = verdict.correct, "WS check_quiz evaluated");
      ServerWsMessage::Verdict { target, correct: verdict.correct, message: verdict.message }
    }

    ClientWsMessage::ToggleSolution { solution_id } => {
      match toggle_solution(state, &solution_id).await {
        Some(visible) => {
          let trigger_label = state
            .page
            .read()
            .await
            .solutions
            .get(&solution_id)
            .map(|p| p.trigger_label.clone())
            .unwrap_or_default();
          ServerWsMessage::Solution { id: solution_id, visible, trigger_label }
        }
        None => ServerWsMessage::Error { message: format!("Unknown solution panel: {solution_id}") },
      }
    }

    ClientWsMessage::ShowTab { group_id, pane_id } => {
      let shown = show_tab(state, &group_id, &pane_id).await;
      ServerWsMessage::Tab { group_id, pane_id, shown }
    }

    ClientWsMessage::ListExercises => {
      let exercises: Vec<ExerciseOut> =
        state.exercises_in_order().iter().map(|ex| to_out(ex)).collect();
      ServerWsMessage::Exercises { exercises }
    }
  }
}
