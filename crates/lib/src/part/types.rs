//! Step, status and descriptor types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Free-form plugin properties of a part.
pub type Properties = BTreeMap<String, serde_json::Value>;

/// One stage of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
  Pull,
  Build,
  Stage,
  Prime,
}

impl Step {
  pub const ALL: [Step; 4] = [Step::Pull, Step::Build, Step::Stage, Step::Prime];

  pub fn as_str(self) -> &'static str {
    match self {
      Step::Pull => "pull",
      Step::Build => "build",
      Step::Stage => "stage",
      Step::Prime => "prime",
    }
  }

  /// The status a part holds once this step completed.
  pub fn status(self) -> StepStatus {
    match self {
      Step::Pull => StepStatus::Pulled,
      Step::Build => StepStatus::Built,
      Step::Stage => StepStatus::Staged,
      Step::Prime => StepStatus::Primed,
    }
  }

  /// Progress label used when the step starts.
  pub fn progress(self) -> &'static str {
    match self {
      Step::Pull => "Pulling",
      Step::Build => "Building",
      Step::Stage => "Staging",
      Step::Prime => "Priming",
    }
  }

  /// Every step up to and including `self`.
  pub fn through(self) -> impl Iterator<Item = Step> {
    Step::ALL.into_iter().filter(move |step| *step <= self)
  }
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Step {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Step::ALL
      .into_iter()
      .find(|step| step.as_str() == s)
      .ok_or_else(|| format!("unknown step: {s}"))
  }
}

/// How far a part has progressed. Only an explicit clean moves it backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepStatus {
  #[default]
  NotRun,
  Pulled,
  Built,
  Staged,
  Primed,
}

impl StepStatus {
  /// Whether `step` already completed for a part at this status.
  pub fn has_reached(self, step: Step) -> bool {
    self >= step.status()
  }

  pub fn as_str(self) -> &'static str {
    match self {
      StepStatus::NotRun => "not-run",
      StepStatus::Pulled => "pulled",
      StepStatus::Built => "built",
      StepStatus::Staged => "staged",
      StepStatus::Primed => "primed",
    }
  }
}

impl fmt::Display for StepStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// An already-validated part declaration.
///
/// Everything besides the keys the lifecycle understands is kept in
/// `properties` and handed to the plugin untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PartDescriptor {
  /// Filled in from the key of the `parts` mapping.
  #[serde(skip)]
  pub name: String,

  pub plugin: String,

  /// Parts that must be staged before this one starts.
  #[serde(default)]
  pub after: Vec<String>,

  /// Fileset applied when moving the install tree into the stage tree.
  #[serde(default)]
  pub stage: Vec<String>,

  /// Fileset applied when moving staged content into the prime tree.
  #[serde(default, alias = "snap")]
  pub prime: Vec<String>,

  #[serde(flatten)]
  pub properties: Properties,
}

impl PartDescriptor {
  pub fn new(name: impl Into<String>, plugin: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      plugin: plugin.into(),
      ..Self::default()
    }
  }

  pub fn after<I, S>(mut self, parts: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.after = parts.into_iter().map(Into::into).collect();
    self
  }

  pub fn stage<I, S>(mut self, fileset: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.stage = fileset.into_iter().map(Into::into).collect();
    self
  }

  pub fn prime<I, S>(mut self, fileset: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.prime = fileset.into_iter().map(Into::into).collect();
    self
  }

  pub fn property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
    self.properties.insert(key.into(), value);
    self
  }
}
