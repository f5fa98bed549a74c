//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Exercise, Verdict};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    CheckExercise {
        #[serde(rename = "exerciseId")]
        exercise_id: String,
        answer: String,
    },
    CheckChoice {
        #[serde(rename = "questionId")]
        question_id: String,
        choice: Option<String>,
    },
    CheckQuiz {
        #[serde(rename = "quizId")]
        quiz_id: String,
        selections: HashMap<String, String>,
    },
    ToggleSolution {
        #[serde(rename = "solutionId")]
        solution_id: String,
    },
    ShowTab {
        #[serde(rename = "groupId")]
        group_id: String,
        #[serde(rename = "paneId")]
        pane_id: String,
    },
    ListExercises,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Verdict {
        target: String,
        correct: bool,
        message: String,
    },
    Exercises {
        exercises: Vec<ExerciseOut>,
    },
    Solution {
        id: String,
        visible: bool,
        #[serde(rename = "triggerLabel")]
        trigger_label: String,
    },
    Tab {
        #[serde(rename = "groupId")]
        group_id: String,
        #[serde(rename = "paneId")]
        pane_id: String,
        shown: bool,
    },
    Error {
        message: String,
    },
}

/// DTO used by both WS and HTTP for exercise listings. The checker itself
/// stays server-side; clients only need the ids and render targets.
#[derive(Debug, Serialize)]
pub struct ExerciseOut {
    pub id: String,
    pub topic: String,
    #[serde(rename = "resultPane")]
    pub result_pane: String,
    #[serde(rename = "solutionPanel")]
    pub solution_panel: String,
}

/// Convert full `Exercise` (internal) to the public DTO.
pub fn to_out(ex: &Exercise) -> ExerciseOut {
    ExerciseOut {
        id: ex.id.to_string(),
        topic: ex.topic.to_string(),
        result_pane: ex.result_pane(),
        solution_panel: ex.solution_panel(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Deserialize)]
pub struct CheckIn {
    #[serde(rename = "exerciseId")]
    pub exercise_id: String,
    pub answer: String,
}

#[derive(Serialize)]
pub struct VerdictOut {
    pub correct: bool,
    pub message: String,
}

impl From<&Verdict> for VerdictOut {
    fn from(v: &Verdict) -> Self {
        Self {
            correct: v.correct,
            message: v.message.clone(),
        }
    }
}

#[derive(Deserialize)]
pub struct ChoiceIn {
    #[serde(rename = "questionId")]
    pub question_id: String,
    pub choice: Option<String>,
}

#[derive(Deserialize)]
pub struct QuizIn {
    #[serde(rename = "quizId")]
    pub quiz_id: String,
    pub selections: HashMap<String, String>,
}

#[derive(Deserialize)]
pub struct ToggleIn {
    #[serde(rename = "solutionId")]
    pub solution_id: String,
}
#[derive(Serialize)]
pub struct ToggleOut {
    pub visible: bool,
    #[serde(rename = "triggerLabel")]
    pub trigger_label: String,
}

#[derive(Deserialize)]
pub struct TabIn {
    #[serde(rename = "groupId")]
    pub group_id: String,
    #[serde(rename = "paneId")]
    pub pane_id: String,
}
#[derive(Serialize)]
pub struct TabOut {
    pub shown: bool,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
