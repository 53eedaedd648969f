use std::fs;

use partwright_lib::error::ConfigError;
use partwright_lib::{LifecycleError, ShellRunner, Step, StepStatus, clean, execute};

use super::common::TestProject;

const GREET_PROJECT: &str = r#"
name: greet
parts:
  libgreet:
    plugin: command
    source: libgreet
    build-commands:
      - mkdir -p "$INSTALLDIR/lib" "$INSTALLDIR/share/doc"
      - cp greet.txt "$INSTALLDIR/lib/"
      - cp README "$INSTALLDIR/share/doc/"
    stage: [-share]
  hello:
    plugin: command
    source: hello
    after: [libgreet]
    build-commands:
      - mkdir -p "$INSTALLDIR/bin"
      - cp hello.sh "$INSTALLDIR/bin/hello"
      - echo "$LDFLAGS" > "$INSTALLDIR/bin/ldflags"
    prime: [bin/hello]
"#;

fn greet_project() -> TestProject {
  let project = TestProject::new(GREET_PROJECT);
  project.write("libgreet/greet.txt", "hello\n");
  project.write("libgreet/README", "docs\n");
  project.write("hello/hello.sh", "#!/bin/sh\necho hello\n");
  project
}

#[cfg(unix)]
#[test]
fn prime_builds_whole_project() {
  let project = greet_project();
  let mut loaded = project.load();

  let report = execute(&mut loaded, &ShellRunner, Step::Prime, &[] as &[&str]).unwrap();

  assert_eq!(report.performed().count(), 8);
  assert_eq!(project.tree("stage"), vec!["bin", "bin/hello", "bin/ldflags", "lib", "lib/greet.txt"]);
  // hello primes only its binary, libgreet everything it staged
  assert_eq!(project.tree("prime"), vec!["bin", "bin/hello", "lib", "lib/greet.txt"]);

  let ldflags = fs::read_to_string(project.join("parts/hello/install/bin/ldflags")).unwrap();
  assert!(ldflags.contains(&format!("-L{}/lib", project.join("stage").display())));
}

#[cfg(unix)]
#[test]
fn second_invocation_skips_completed_steps() {
  let project = greet_project();
  execute(&mut project.load(), &ShellRunner, Step::Stage, &[] as &[&str]).unwrap();

  let report = execute(&mut project.load(), &ShellRunner, Step::Stage, &[] as &[&str]).unwrap();

  assert_eq!(report.performed().count(), 0);
  assert_eq!(report.skipped().count(), 6);
}

#[cfg(unix)]
#[test]
fn requesting_dependent_alone_needs_prerequisite() {
  let project = greet_project();

  let err = execute(&mut project.load(), &ShellRunner, Step::Pull, &["hello"]).unwrap_err();

  assert_eq!(
    err.to_string(),
    "Requested 'pull' of 'hello' but there are unsatisfied prerequisites: 'libgreet'"
  );
  assert!(!project.join("parts/hello").exists());
}

#[cfg(unix)]
#[test]
fn clean_resets_one_part() {
  let project = greet_project();
  execute(&mut project.load(), &ShellRunner, Step::Stage, &[] as &[&str]).unwrap();

  let mut loaded = project.load();
  clean(&mut loaded, &ShellRunner, &["hello"]).unwrap();

  let reloaded = project.load();
  assert_eq!(reloaded.part("hello").unwrap().status(), StepStatus::NotRun);
  assert_eq!(reloaded.part("libgreet").unwrap().status(), StepStatus::Staged);
  assert!(!project.join("parts/hello").exists());
}

#[cfg(unix)]
#[test]
fn failing_build_command_keeps_pull() {
  let project = TestProject::new(
    r#"
parts:
  broken:
    plugin: command
    build-commands:
      - exit 7
"#,
  );

  let err = execute(&mut project.load(), &ShellRunner, Step::Build, &[] as &[&str]).unwrap_err();

  assert!(matches!(err, LifecycleError::PluginExecution { step: Step::Build, .. }));
  assert_eq!(err.to_string(), "command 'exit 7' failed with exit code 7");
  assert_eq!(project.load().part("broken").unwrap().status(), StepStatus::Pulled);
}

#[test]
fn absolute_fileset_is_rejected_on_load() {
  let project = TestProject::new(
    r#"
parts:
  p:
    plugin: nil
    stage: [rel, /abs/include]
"#,
  );

  let err = partwright_lib::Project::load(
    partwright_lib::ProjectContext::new(project.path()),
    &partwright_lib::PluginRegistry::with_builtins(),
  )
  .unwrap_err();

  assert!(matches!(err, LifecycleError::Configuration(ConfigError::Fileset(_))));
  assert_eq!(err.to_string(), "path \"/abs/include\" must be relative");
}

#[test]
fn unknown_plugin_is_rejected_on_load() {
  let project = TestProject::new("parts:\n  p:\n    plugin: autotools\n");

  let err = partwright_lib::Project::load(
    partwright_lib::ProjectContext::new(project.path()),
    &partwright_lib::PluginRegistry::with_builtins(),
  )
  .unwrap_err();

  assert_eq!(err.to_string(), "unknown plugin: autotools");
}
