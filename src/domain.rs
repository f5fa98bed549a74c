//! Domain models: predicates, pass rules, checkers, exercises, and quizzes.
//!
//! A checker is pure data: an ordered list of required-fragment tests plus the
//! messages used to report the outcome. All rule content is fixed at build
//! time in `rules.rs`; nothing here is user-configurable.

use regex::Regex;

/// One atomic required-fragment test over trimmed user input.
#[derive(Clone, Debug)]
pub enum Predicate {
  /// Input contains the literal substring.
  Contains(&'static str),
  /// Input contains at least one of the literal substrings.
  ContainsAny(&'static [&'static str]),
  /// Input does NOT contain the literal substring.
  Lacks(&'static str),
  /// Input matches the compiled pattern.
  Matches(Regex),
  /// Input equals the literal exactly (after trimming).
  Equals(&'static str),
  /// Pattern applied only to the text after the last occurrence of `marker`
  /// (falls back to the whole input when the marker is absent).
  MatchesAfterLast { marker: &'static str, pattern: Regex },
  /// Every sub-test must hold. Used where one named requirement is a
  /// conjunction of several patterns.
  AllOf(Vec<Predicate>),
  /// At least one sub-test must hold.
  AnyOf(Vec<Predicate>),
}

impl Predicate {
  pub fn holds(&self, input: &str) -> bool {
    match self {
      Predicate::Contains(s) => input.contains(s),
      Predicate::ContainsAny(alts) => alts.iter().any(|s| input.contains(s)),
      Predicate::Lacks(s) => !input.contains(s),
      Predicate::Matches(re) => re.is_match(input),
      Predicate::Equals(s) => input == *s,
      Predicate::MatchesAfterLast { marker, pattern } => {
        let tail = match input.rfind(marker) {
          Some(at) => &input[at..],
          None => input,
        };
        pattern.is_match(tail)
      }
      Predicate::AllOf(preds) => preds.iter().all(|p| p.holds(input)),
      Predicate::AnyOf(preds) => preds.iter().any(|p| p.holds(input)),
    }
  }
}

/// One entry of an AND-style pass rule: the predicate plus the clause listed
/// in itemized feedback when it fails. `gate` suppresses the clause (not the
/// pass requirement) while the gate predicate fails; used where the original
/// rules nest feedback under a parent requirement.
#[derive(Clone, Debug)]
pub struct Requirement {
  pub predicate: Predicate,
  pub clause: Option<&'static str>,
  pub gate: Option<Predicate>,
}

impl Requirement {
  pub fn new(predicate: Predicate, clause: &'static str) -> Self {
    Self { predicate, clause: Some(clause), gate: None }
  }

  pub fn bare(predicate: Predicate) -> Self {
    Self { predicate, clause: None, gate: None }
  }

  pub fn gated(predicate: Predicate, clause: &'static str, gate: Predicate) -> Self {
    Self { predicate, clause: Some(clause), gate: Some(gate) }
  }
}

/// One accepted phrasing for an OR-style pass rule: a conjunction of
/// predicates, optionally labeled so the success message can name which
/// variant matched (via the `{feature}` placeholder).
#[derive(Clone, Debug)]
pub struct Alternative {
  pub label: Option<&'static str>,
  pub all: Vec<Predicate>,
}

impl Alternative {
  pub fn of(all: Vec<Predicate>) -> Self {
    Self { label: None, all }
  }

  pub fn labeled(label: &'static str, all: Vec<Predicate>) -> Self {
    Self { label: Some(label), all }
  }

  pub fn holds(&self, input: &str) -> bool {
    self.all.iter().all(|p| p.holds(input))
  }
}

/// Exercise-specific pass semantics: most checkers require every fragment
/// (All); several accept any of a few alternative valid forms (Any).
#[derive(Clone, Debug)]
pub enum PassRule {
  All(Vec<Requirement>),
  Any(Vec<Alternative>),
}

/// How failure is reported: one fixed corrective message, or a lead-in
/// followed by one clause per unmet requirement (declaration order). Each
/// listed clause is followed by `clause_suffix` ("; " or " " in the bank).
#[derive(Clone, Debug)]
pub enum Feedback {
  Fixed(&'static str),
  Itemized { lead_in: &'static str, clause_suffix: &'static str },
}

/// A recognizable almost-right shape that earns a more specific hint than the
/// generic failure message. Checked in order before the fixed feedback.
#[derive(Clone, Debug)]
pub struct NearMiss {
  pub when: Vec<Predicate>,
  pub message: &'static str,
}

impl NearMiss {
  pub fn holds(&self, input: &str) -> bool {
    self.when.iter().all(|p| p.holds(input))
  }
}

/// The full rule for one exercise.
#[derive(Clone, Debug)]
pub struct Checker {
  pub pass: PassRule,
  /// Success message; may carry a `{feature}` placeholder filled from the
  /// matched alternative's label.
  pub success: &'static str,
  pub feedback: Feedback,
  pub near_misses: Vec<NearMiss>,
}

/// One free-text teaching unit. The result pane id is `{id}-result` by
/// convention; the binding is registered and validated at startup.
#[derive(Clone, Debug)]
pub struct Exercise {
  pub id: &'static str,
  /// Source lesson page, kept for the exercise listing and logs.
  pub topic: &'static str,
  pub checker: Checker,
}

impl Exercise {
  pub fn result_pane(&self) -> String {
    format!("{}-result", self.id)
  }

  pub fn solution_panel(&self) -> String {
    format!("{}-solution", self.id)
  }
}

/// Outcome of one evaluation. The flag and the message always agree: a true
/// verdict carries the checker's success message, a false verdict names at
/// least one unmet requirement or a fixed negative message.
#[derive(Clone, Debug, PartialEq)]
pub struct Verdict {
  pub correct: bool,
  pub message: String,
}

impl Verdict {
  pub fn pass(message: String) -> Self {
    Self { correct: true, message }
  }

  pub fn fail(message: String) -> Self {
    Self { correct: false, message }
  }
}

/// A single standalone multiple-choice question, checked by exact option
/// comparison. Labels feed the "the correct answer is: …" feedback.
#[derive(Clone, Debug)]
pub struct ChoiceQuestion {
  pub id: &'static str,
  pub topic: &'static str,
  pub correct: &'static str,
  pub options: &'static [(&'static str, &'static str)],
}

impl ChoiceQuestion {
  pub fn result_pane(&self) -> String {
    format!("{}-result", self.id)
  }

  /// Human label for the correct option; falls back to the raw value when the
  /// option list has no entry for it.
  pub fn correct_label(&self) -> &'static str {
    self
      .options
      .iter()
      .find(|(value, _)| *value == self.correct)
      .map(|(_, label)| *label)
      .unwrap_or(self.correct)
  }
}

/// One question of a multi-question quiz: expected option plus the fixed
/// corrective hint shown when this question is answered wrong.
#[derive(Clone, Debug)]
pub struct QuizQuestion {
  pub id: &'static str,
  pub expected: &'static str,
  pub hint: &'static str,
}

/// A multi-question quiz, passed only when every question matches. Any
/// unanswered question short-circuits to the "answer all questions" verdict.
#[derive(Clone, Debug)]
pub struct Quiz {
  pub id: &'static str,
  pub topic: &'static str,
  pub questions: Vec<QuizQuestion>,
  pub success: &'static str,
  pub fail_lead_in: &'static str,
  pub review_suffix: &'static str,
}

impl Quiz {
  pub fn result_pane(&self) -> String {
    format!("{}-result", self.id)
  }
}
