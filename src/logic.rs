//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Evaluating free-text exercise submissions against their checker
//!   - Evaluating single multiple-choice questions and multi-question quizzes
//!   - The presentation helpers (solution toggle, tab switching)
//!
//! Every evaluation ends in the renderer: the verdict is written to the
//! exercise's result pane and also returned to the caller. A missing pane is
//! logged and skipped, never an error.

use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};

use crate::domain::{Checker, Feedback, PassRule, Verdict};
use crate::state::AppState;
use crate::util::{fill_template, trunc_for_log};

/// Run one checker against trimmed input. Pure; the rendering side effect
/// lives in `evaluate_exercise`.
pub fn run_checker(checker: &Checker, input: &str) -> Verdict {
  match &checker.pass {
    PassRule::All(reqs) => {
      let unmet: Vec<_> = reqs.iter().filter(|r| !r.predicate.holds(input)).collect();
      if unmet.is_empty() {
        return Verdict::pass(checker.success.to_string());
      }
      if let Some(miss) = checker.near_misses.iter().find(|m| m.holds(input)) {
        return Verdict::fail(miss.message.to_string());
      }
      match &checker.feedback {
        Feedback::Fixed(msg) => Verdict::fail((*msg).to_string()),
        Feedback::Itemized { lead_in, clause_suffix } => {
          let mut msg = (*lead_in).to_string();
          for req in &unmet {
            // A gated clause stays silent while its parent requirement fails.
            if let Some(gate) = &req.gate {
              if !gate.holds(input) {
                continue;
              }
            }
            if let Some(clause) = req.clause {
              msg.push_str(clause);
              msg.push_str(clause_suffix);
            }
          }
          Verdict::fail(msg)
        }
      }
    }
    PassRule::Any(alts) => {
      if let Some(hit) = alts.iter().find(|a| a.holds(input)) {
        let msg = match hit.label {
          Some(label) => fill_template(checker.success, &[("feature", label)]),
          None => checker.success.to_string(),
        };
        return Verdict::pass(msg);
      }
      if let Some(miss) = checker.near_misses.iter().find(|m| m.holds(input)) {
        return Verdict::fail(miss.message.to_string());
      }
      match &checker.feedback {
        Feedback::Fixed(msg) => Verdict::fail((*msg).to_string()),
        Feedback::Itemized { lead_in, .. } => Verdict::fail((*lead_in).to_string()),
      }
    }
  }
}

/// Evaluate one free-text submission and render the verdict to the
/// exercise's result pane. Empty input is not special-cased: it simply fails
/// the content predicates.
#[instrument(level = "info", skip(state, answer), fields(%exercise_id, answer_len = answer.len()))]
pub async fn evaluate_exercise(state: &AppState, exercise_id: &str, answer: &str) -> Verdict {
  let Some(ex) = state.exercise(exercise_id) else {
    warn!(target: "exercise", %exercise_id, "Unknown exercise id; nothing rendered");
    return Verdict::fail(format!("Unknown exercise: {exercise_id}"));
  };

  let input = answer.trim();
  debug!(target: "exercise", id = %ex.id, input = %trunc_for_log(input, 120), "Evaluating submission");
  let verdict = run_checker(&ex.checker, input);
  info!(target: "exercise", id = %ex.id, correct = verdict.correct, "Exercise evaluated");

  state.render_verdict(&ex.result_pane(), &verdict).await;
  verdict
}

/// Evaluate one standalone multiple-choice question. No selection is its own
/// negative verdict, distinct from a wrong answer.
#[instrument(level = "info", skip(state), fields(%question_id))]
pub async fn evaluate_choice(state: &AppState, question_id: &str, choice: Option<&str>) -> Verdict {
  let Some(q) = state.choice(question_id) else {
    warn!(target: "exercise", %question_id, "Unknown choice question; nothing rendered");
    return Verdict::fail(format!("Unknown question: {question_id}"));
  };

  let verdict = match choice {
    None => Verdict::fail(state.messages.select_answer.clone()),
    Some(v) if v == q.correct => Verdict::pass(state.messages.choice_correct.clone()),
    Some(_) => Verdict::fail(fill_template(
      &state.messages.choice_incorrect_template,
      &[("answer", q.correct_label())],
    )),
  };
  info!(target: "exercise", id = %q.id, correct = verdict.correct, "Choice evaluated");

  state.render_verdict(&q.result_pane(), &verdict).await;
  verdict
}

/// Evaluate a multi-question quiz. Any unanswered question is a hard early
/// exit; otherwise all answers must match, and failure enumerates one
/// corrective hint per mismatched question only.
#[instrument(level = "info", skip(state, selections), fields(%quiz_id, selected = selections.len()))]
pub async fn evaluate_quiz(
  state: &AppState,
  quiz_id: &str,
  selections: &HashMap<String, String>,
) -> Verdict {
  let Some(quiz) = state.quiz(quiz_id) else {
    warn!(target: "exercise", %quiz_id, "Unknown quiz; nothing rendered");
    return Verdict::fail(format!("Unknown quiz: {quiz_id}"));
  };

  let verdict = if quiz.questions.iter().any(|q| !selections.contains_key(q.id)) {
    Verdict::fail(state.messages.answer_all.clone())
  } else {
    let wrong: Vec<_> = quiz
      .questions
      .iter()
      .filter(|q| selections.get(q.id).map(String::as_str) != Some(q.expected))
      .collect();
    if wrong.is_empty() {
      Verdict::pass(quiz.success.to_string())
    } else {
      let mut msg = quiz.fail_lead_in.to_string();
      for q in &wrong {
        msg.push_str(q.hint);
        msg.push(' ');
      }
      msg.push_str(quiz.review_suffix);
      Verdict::fail(msg)
    }
  };
  info!(target: "exercise", id = %quiz.id, correct = verdict.correct, "Quiz evaluated");

  state.render_verdict(&quiz.result_pane(), &verdict).await;
  verdict
}

/// Flip a solution panel. Returns the resulting visibility, None when the
/// panel is unknown.
#[instrument(level = "info", skip(state), fields(%solution_id))]
pub async fn toggle_solution(state: &AppState, solution_id: &str) -> Option<bool> {
  let mut page = state.page.write().await;
  page.toggle_solution(solution_id)
}

/// Activate one pane within a tab group. Returns false when the group or
/// pane is unknown.
#[instrument(level = "info", skip(state), fields(%group_id, %pane_id))]
pub async fn show_tab(state: &AppState, group_id: &str, pane_id: &str) -> bool {
  let mut page = state.page.write().await;
  page.show_tab(group_id, pane_id)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::render::PaneClass;
  use crate::rules::exercise_bank;

  fn state() -> AppState {
    AppState::new().expect("state")
  }

  /// One known-good solution per exercise in the bank.
  fn canonical_solutions() -> Vec<(&'static str, &'static str)> {
    vec![
      ("excel-exercise", r#"read_excel(file = "sales_data.xlsx", sheet = 1)"#),
      ("export-exercise", r#"write.csv(df, "out.csv", row.names = FALSE)"#),
      ("vector-exercise", "seq(2, 10, by=2)"),
      ("loops-exercise", "for (i in 1:10) { print(i^2) }"),
      ("nested-loops-exercise", "for (i in 1:5) { for (j in 1:5) { print(i * j) } }"),
      (
        "conditional-statements-exercise",
        r#"if (x %% 2 == 0) { print("even") } else { print("odd") }"#,
      ),
      (
        "case-when-exercise",
        r#"case_when(temp < 32 ~ "Freezing", temp >= 32 & temp < 50 ~ "Cold", temp >= 50 & temp < 70 ~ "Mild", temp >= 70 & temp <= 85 ~ "Warm", temp > 85 ~ "Hot")"#,
      ),
      (
        "function-exercise",
        "calculate_bmi <- function(weight, height) { round(weight / (height^2), 1) }",
      ),
      ("functional-programming-exercise", "map_dbl(numbers, sqrt)"),
      (
        "pmap-exercise",
        "pmap_dbl(products, function(price, tax, discount) (price * (1 - discount)) * (1 + tax))",
      ),
      ("error-handling-exercise", "map(values, possibly(log, otherwise = NA))"),
      (
        "file-processing-exercise",
        "files <- list.files(\"data\", pattern = \"csv$\")\nall <- map_df(files, read.csv)\nsummary <- all %>% group_by(category) %>% summarize(count = n(), avg = mean(value), total = sum(value))\nwrite.csv(summary, \"summary.csv\")",
      ),
      (
        "func-exercise",
        "is_even <- function(number) { if (number %% 2 == 0) { return(TRUE) } else { return(FALSE) } }",
      ),
      (
        "intro-exercise",
        "---\ntitle: \"My Report\"\nauthor: \"A\"\ndate: \"2024-01-01\"\noutput: html_document\n---\n\n## Data Analysis\n\n```{r}\ndata(mtcars)\nmean(mtcars$mpg)\n```\n\nConclusion: the mean MPG is about 20.",
      ),
      (
        "yaml-exercise",
        "---\ntitle: \"Sales Analysis Report\"\noutput:\n  html_document:\n    toc: true\n    toc_float: true\n    toc_depth: 2\n    number_sections: true\n    theme: flatly\n    code_folding: hide\nparams:\n  quarter: Q1\n---",
      ),
      (
        "chunks-exercise",
        "```{r setup, include=FALSE}\nknitr::opts_chunk$set(warning = FALSE, message = FALSE, fig.align = 'center')\n```\n\n```{r, echo = FALSE, message = FALSE}\nlibrary(ggplot2)\n```\n\n```{r, fig.width = 10, fig.height = 6}\nhist(mtcars$mpg)\n```",
      ),
      (
        "markdown-exercise",
        "## Data Analysis Results\n\nThe analysis shows several findings.\n\n* Finding one\n* Finding two\n* Finding three\n\n| Region || Sales |\n| --- | --- |\n| North || 100 |\n\n[more information](https://example.com)",
      ),
      (
        "output-formats-exercise",
        "output:\n  html_document:\n    toc: true\n    toc_float: true\n    theme: flatly\n    code_folding: show\n  pdf_document:\n    toc: true\n    latex_engine: xelatex\n    fig_caption: true",
      ),
      (
        "knitr-exercise",
        "```{r setup, include=FALSE}\nknitr::opts_chunk$set(cache = TRUE, dev = 'png', dpi = 300, fig.align = 'center')\n```\n\n```{r}\nknitr::include_graphics('logo.png')\n# out.width = '50%'\n```\n\n```{r}\nknitr::kable(head(mtcars))\n# caption = 'Car Performance Data'\n```",
      ),
      (
        "pandoc-exercise",
        "output:\n  pdf_document:\n    geometry: margin=1.5in\n  html_document:\n    css: custom.css\nfontsize: 11pt",
      ),
      (
        "params-exercise",
        "params:\n  department: Sales\n  year: 2024\n  include_charts: TRUE\n  data_source:\n    input: select\n    choices: [Database, CSV, API]",
      ),
      (
        "tables-exercise",
        "knitr::kable(head(iris), caption = \"Iris data\") %>%\n  kableExtra::kable_styling(bootstrap_options = c(\"striped\")) %>%\n  column_spec(1, bold = TRUE)\nsummarize(iris, mean(Sepal.Length))",
      ),
      (
        "figures-exercise",
        "```{r, fig.width=8, fig.height=5, fig.cap='Iris flower measurements by species'}\nggplot(iris, aes(x = Sepal.Length, y = Sepal.Width, color = Species)) +\n  geom_point() +\n  labs(title = 'Iris', x = 'Sepal Length', y = 'Sepal Width')\n```",
      ),
      (
        "interactive-exercise",
        "library(plotly)\np <- ggplot(diamonds, aes(x = carat, y = price, color = cut, text = paste('Cut:', cut, 'Color:', color, 'Clarity:', clarity)))\nggplotly(p)",
      ),
      ("advanced-exercise", "<style> h1 { color: red; } </style>"),
      (
        "workflow-exercise",
        "Organize data/ code/ reports/ folders. Define params: in each YAML header. A script loops with for (f in files) render(f, params = list(region = f)). Use renv and library(rmarkdown) for dependencies.",
      ),
      ("assignment-exercise", "answer <- 42"),
      (
        "data-types-exercise",
        "data.frame(id = 1:3, name = c(\"a\", \"b\", \"c\"), score = c(90, 85, 88))",
      ),
      ("logical-values-exercise", "score > 80 & score < 100"),
      (
        "basic-plot-exercise",
        "ggplot(data = iris, aes(x = Sepal.Length, y = Petal.Length, color = Species)) + geom_point()",
      ),
      ("import-exercise", "st_read(\"shapefile.shp\")"),
      (
        "case-study-exercise",
        "world %>% group_by(economy) %>% summarize(avg_gdp_per_capita = mean(gdp_per_capita, na.rm = TRUE)) %>% arrange(desc(avg_gdp_per_capita))",
      ),
    ]
  }

  #[test]
  fn every_exercise_accepts_its_canonical_solution() {
    let bank = exercise_bank().expect("bank");
    let solutions: std::collections::HashMap<_, _> = canonical_solutions().into_iter().collect();
    for ex in &bank {
      let answer = solutions
        .get(ex.id)
        .unwrap_or_else(|| panic!("no canonical solution for {}", ex.id));
      let verdict = run_checker(&ex.checker, answer.trim());
      assert!(verdict.correct, "{} rejected its canonical solution: {}", ex.id, verdict.message);
    }
  }

  #[test]
  fn every_exercise_rejects_empty_input() {
    for ex in exercise_bank().expect("bank") {
      let verdict = run_checker(&ex.checker, "");
      assert!(!verdict.correct, "{} accepted empty input", ex.id);
      assert!(!verdict.message.is_empty(), "{} produced an empty failure message", ex.id);
    }
  }

  #[test]
  fn run_checker_is_idempotent() {
    for ex in exercise_bank().expect("bank") {
      let once = run_checker(&ex.checker, "seq(2, 10, by=2)");
      let twice = run_checker(&ex.checker, "seq(2, 10, by=2)");
      assert_eq!(once, twice, "{} verdict not stable", ex.id);
    }
  }

  #[test]
  fn sequence_exercise_reports_the_expected_messages() {
    let bank = exercise_bank().expect("bank");
    let vector = bank.iter().find(|e| e.id == "vector-exercise").expect("vector-exercise");

    let pass = run_checker(&vector.checker, "seq(2, 10, by=2)");
    assert!(pass.correct);
    assert_eq!(
      pass.message,
      "Looks correct! This code should generate the vector c(2, 4, 6, 8, 10)."
    );

    let literal = run_checker(&vector.checker, "c(2, 4, 6, 8, 10)");
    assert!(literal.correct);

    let empty = run_checker(&vector.checker, "");
    assert!(!empty.correct);
    assert!(empty.message.contains("not in a recognized format"));

    // Open seq() call earns the parenthesis hint instead of the generic
    // failure message.
    let unclosed = run_checker(&vector.checker, "seq(2, 10, by=2");
    assert!(!unclosed.correct);
    assert!(unclosed.message.contains("closing parenthesis"));
  }

  #[test]
  fn conditional_exercise_without_modulo_mentions_the_modulo_check() {
    let bank = exercise_bank().expect("bank");
    let cond = bank
      .iter()
      .find(|e| e.id == "conditional-statements-exercise")
      .expect("conditional-statements-exercise");

    let verdict =
      run_checker(&cond.checker, r#"if (x > 0) { print("even") } else { print("odd") }"#);
    assert!(!verdict.correct);
    assert!(verdict.message.contains("%% 2 == 0"));
    assert!(verdict.message.contains("`if` and `else`"));
  }

  #[test]
  fn itemized_failure_names_exactly_the_missing_requirement() {
    let bank = exercise_bank().expect("bank");
    let yaml = bank.iter().find(|e| e.id == "yaml-exercise").expect("yaml-exercise");

    // Canonical solution minus the code_folding line.
    let answer = "---\ntitle: \"Sales Analysis Report\"\noutput:\n  html_document:\n    toc: true\n    toc_float: true\n    toc_depth: 2\n    number_sections: true\n    theme: flatly\nparams:\n  quarter: Q1\n---";
    let verdict = run_checker(&yaml.checker, answer);
    assert!(!verdict.correct);
    assert_eq!(
      verdict.message,
      "Your YAML header is missing some required elements: collapsible code sections, hidden by default (code_folding: hide); "
    );
  }

  #[test]
  fn gated_clauses_stay_silent_while_their_family_is_missing() {
    let bank = exercise_bank().expect("bank");
    let formats = bank
      .iter()
      .find(|e| e.id == "output-formats-exercise")
      .expect("output-formats-exercise");

    // HTML family complete, PDF family absent entirely: only the PDF
    // family-level clause may appear.
    let answer = "output:\n  html_document:\n    toc: true\n    toc_float: true\n    theme: flatly\n    code_folding: show";
    let verdict = run_checker(&formats.checker, answer);
    assert!(!verdict.correct);
    assert!(verdict.message.contains("PDF output format"));
    assert!(!verdict.message.contains("PDF table of contents"));
    assert!(!verdict.message.contains("xelatex"));
  }

  #[test]
  fn advanced_exercise_success_names_the_matched_feature() {
    let bank = exercise_bank().expect("bank");
    let advanced = bank.iter().find(|e| e.id == "advanced-exercise").expect("advanced-exercise");

    let css = run_checker(&advanced.checker, "<style> h1 { color: red; } </style>");
    assert!(css.correct);
    assert!(css.message.contains("custom CSS styling"));

    let hook = run_checker(&advanced.checker, "invisible(gc())");
    assert!(hook.correct);
    assert!(hook.message.contains("memory usage hook"));
  }

  #[tokio::test]
  async fn evaluating_renders_the_verdict_to_the_result_pane() {
    let state = state();
    let verdict = evaluate_exercise(&state, "vector-exercise", "seq(2, 10, by=2)").await;
    assert!(verdict.correct);

    let page = state.page.read().await;
    let pane = page.pane("vector-exercise-result").expect("pane");
    assert!(pane.visible);
    assert_eq!(pane.class, Some(PaneClass::Correct));
    assert_eq!(pane.html, verdict.message);
  }

  #[tokio::test]
  async fn evaluating_twice_leaves_the_same_rendered_output() {
    let state = state();
    let first = evaluate_exercise(&state, "import-exercise", "st_read('x.shp')").await;
    let first_pane =
      state.page.read().await.pane("import-exercise-result").cloned().expect("pane");

    let second = evaluate_exercise(&state, "import-exercise", "st_read('x.shp')").await;
    let second_pane =
      state.page.read().await.pane("import-exercise-result").cloned().expect("pane");

    assert_eq!(first, second);
    assert_eq!(first_pane.html, second_pane.html);
    assert_eq!(first_pane.class, second_pane.class);
  }

  #[tokio::test]
  async fn unknown_exercise_renders_nothing() {
    let state = state();
    let verdict = evaluate_exercise(&state, "no-such-exercise", "whatever").await;
    assert!(!verdict.correct);
    assert!(verdict.message.contains("Unknown exercise"));

    let page = state.page.read().await;
    assert!(page.panes.values().all(|p| !p.visible));
  }

  #[tokio::test]
  async fn choice_question_distinguishes_no_selection_from_wrong_answer() {
    let state = state();

    let none = evaluate_choice(&state, "pipe-q1", None).await;
    assert!(!none.correct);
    assert_eq!(none.message, "Please select an answer.");

    let wrong = evaluate_choice(&state, "pipe-q1", Some("a")).await;
    assert!(!wrong.correct);
    assert_eq!(
      wrong.message,
      "Incorrect. The correct answer is: %>% passes the left-hand result into the next function"
    );

    let right = evaluate_choice(&state, "pipe-q1", Some("c")).await;
    assert!(right.correct);
    assert_eq!(right.message, "Correct! Well done.");
  }

  #[tokio::test]
  async fn quiz_passes_only_when_every_answer_matches() {
    let state = state();
    let both = HashMap::from([
      ("ggplot-q1".to_string(), "b".to_string()),
      ("ggplot-q2".to_string(), "b".to_string()),
    ]);
    let verdict = evaluate_quiz(&state, "ggplot-quiz", &both).await;
    assert!(verdict.correct);
    assert!(verdict.message.contains("`ggplot()` initializes the plot"));
  }

  #[tokio::test]
  async fn quiz_with_a_missing_selection_asks_for_all_answers() {
    let state = state();
    // Only one of the two questions answered, correctly even.
    let partial = HashMap::from([("ggplot-q1".to_string(), "b".to_string())]);
    let verdict = evaluate_quiz(&state, "ggplot-quiz", &partial).await;
    assert!(!verdict.correct);
    assert_eq!(verdict.message, "Please answer all questions.");
  }

  #[tokio::test]
  async fn quiz_failure_mentions_only_the_mismatched_question() {
    let state = state();
    let one_wrong = HashMap::from([
      ("ggplot-q1".to_string(), "b".to_string()),
      ("ggplot-q2".to_string(), "a".to_string()),
    ]);
    let verdict = evaluate_quiz(&state, "ggplot-quiz", &one_wrong).await;
    assert!(!verdict.correct);
    assert!(verdict.message.contains("`aes()` maps variables to visual properties."));
    assert!(!verdict.message.contains("initialization function"));
    assert!(verdict.message.ends_with("Please review the Grammar of Graphics section."));
  }

  #[tokio::test]
  async fn solution_toggle_and_tabs_flow_through_state() {
    let state = state();
    assert_eq!(toggle_solution(&state, "vector-exercise-solution").await, Some(true));
    assert_eq!(toggle_solution(&state, "vector-exercise-solution").await, Some(false));
    assert_eq!(toggle_solution(&state, "unknown-solution").await, None);

    assert!(show_tab(&state, "r-basics-tabs", "r-basics-exercises").await);
    assert!(!show_tab(&state, "r-basics-tabs", "visualization-lesson").await);
  }
}
