//! Result types of a lifecycle run.

use serde::Serialize;

use crate::part::Step;

/// One step considered for one part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepEvent {
  pub phase: Step,
  pub part: String,
  /// The step had already completed in an earlier run.
  pub skipped: bool,
}

/// Everything a run did, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
  pub events: Vec<StepEvent>,
}

impl RunReport {
  pub fn performed(&self) -> impl Iterator<Item = &StepEvent> {
    self.events.iter().filter(|e| !e.skipped)
  }

  pub fn skipped(&self) -> impl Iterator<Item = &StepEvent> {
    self.events.iter().filter(|e| e.skipped)
  }

  /// `(step, part)` pairs actually performed.
  pub fn performed_steps(&self) -> Vec<(Step, &str)> {
    self.performed().map(|e| (e.phase, e.part.as_str())).collect()
  }

  pub(crate) fn record(&mut self, phase: Step, part: &str, skipped: bool) {
    self.events.push(StepEvent {
      phase,
      part: part.to_string(),
      skipped,
    });
  }
}
