//! Page model and the result reporter.
//!
//! The original site wrote verdicts straight into the DOM by element id. Here
//! the page's presentational state lives in an addressable in-memory model,
//! and every checker writes through the single `Renderer` seam. A missing
//! target is a logged diagnostic and a no-op; it must never fail the caller.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, error};

/// Exclusive style class of a rendered verdict: once a pane has been written
/// it is always exactly one of these, never both, never neither.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaneClass {
  Correct,
  Incorrect,
}

/// One result/output location. Hidden until the first report lands.
#[derive(Clone, Debug, Serialize)]
pub struct ResultPane {
  pub visible: bool,
  pub class: Option<PaneClass>,
  /// May contain simple inline markup (backticks rendered by the frontend).
  pub html: String,
}

impl ResultPane {
  pub fn hidden() -> Self {
    Self { visible: false, class: None, html: String::new() }
  }
}

/// A collapsible solution panel plus the label of its trigger control.
#[derive(Clone, Debug, Serialize)]
pub struct SolutionPanel {
  pub visible: bool,
  pub trigger_label: String,
}

impl SolutionPanel {
  pub fn collapsed() -> Self {
    Self { visible: false, trigger_label: "Show Solution".into() }
  }
}

/// Mutually-exclusive sibling content panes. Exactly one pane is active;
/// independent groups on the same page never interfere.
#[derive(Clone, Debug, Serialize)]
pub struct TabGroup {
  pub panes: Vec<String>,
  pub active: String,
}

/// Addressable presentational state for the whole site. The only shared
/// mutable state in the system; the renderer is its only verdict writer.
#[derive(Clone, Debug, Default, Serialize)]
pub struct PageModel {
  pub panes: HashMap<String, ResultPane>,
  pub solutions: HashMap<String, SolutionPanel>,
  pub tabs: HashMap<String, TabGroup>,
}

impl PageModel {
  /// Register an output location. Duplicate registration is a binding error
  /// surfaced at startup, not silently overwritten.
  pub fn register_pane(&mut self, id: &str) -> Result<(), String> {
    if self.panes.insert(id.to_string(), ResultPane::hidden()).is_some() {
      return Err(format!("duplicate result pane id: {id}"));
    }
    Ok(())
  }

  pub fn register_solution(&mut self, id: &str) -> Result<(), String> {
    if self.solutions.insert(id.to_string(), SolutionPanel::collapsed()).is_some() {
      return Err(format!("duplicate solution panel id: {id}"));
    }
    Ok(())
  }

  pub fn register_tab_group(&mut self, id: &str, panes: Vec<String>) -> Result<(), String> {
    let active = match panes.first() {
      Some(first) => first.clone(),
      None => return Err(format!("tab group '{id}' has no panes")),
    };
    if self.tabs.insert(id.to_string(), TabGroup { panes, active }).is_some() {
      return Err(format!("duplicate tab group id: {id}"));
    }
    Ok(())
  }

  pub fn pane(&self, id: &str) -> Option<&ResultPane> {
    self.panes.get(id)
  }

  /// Flip a solution panel and update its trigger label to reflect the new
  /// state. Returns the resulting visibility, or None when the panel is
  /// unknown (logged, nothing changed).
  pub fn toggle_solution(&mut self, id: &str) -> Option<bool> {
    let Some(panel) = self.solutions.get_mut(id) else {
      error!(target: "rtutor_backend", %id, "Solution panel not found");
      return None;
    };
    panel.visible = !panel.visible;
    panel.trigger_label =
      if panel.visible { "Hide Solution".into() } else { "Show Solution".into() };
    debug!(target: "rtutor_backend", %id, visible = panel.visible, "Solution toggled");
    Some(panel.visible)
  }

  /// Activate one pane within its tab group. Unknown group or a pane not
  /// belonging to the group leaves the model untouched.
  pub fn show_tab(&mut self, group_id: &str, pane_id: &str) -> bool {
    let Some(group) = self.tabs.get_mut(group_id) else {
      error!(target: "rtutor_backend", %group_id, "Tab group not found");
      return false;
    };
    if !group.panes.iter().any(|p| p == pane_id) {
      error!(target: "rtutor_backend", %group_id, %pane_id, "Tab pane not in group");
      return false;
    }
    group.active = pane_id.to_string();
    true
  }
}

/// The one write path for verdicts. Injected into the evaluators so nothing
/// else touches the page model's result panes.
pub trait Renderer {
  fn report(&self, page: &mut PageModel, target: &str, correct: bool, message: &str);
}

/// Writes the verdict into a registered result pane: sets the message, makes
/// the pane visible, and tags it with exactly one style class.
#[derive(Clone, Copy, Debug, Default)]
pub struct PaneRenderer;

impl Renderer for PaneRenderer {
  fn report(&self, page: &mut PageModel, target: &str, correct: bool, message: &str) {
    let Some(pane) = page.panes.get_mut(target) else {
      error!(target: "rtutor_backend", %target, "Result pane not found");
      return;
    };
    pane.visible = true;
    pane.class = Some(if correct { PaneClass::Correct } else { PaneClass::Incorrect });
    pane.html = message.to_string();
  }
}
