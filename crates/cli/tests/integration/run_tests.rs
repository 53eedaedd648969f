//! Lifecycle command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[cfg(unix)]
#[test]
fn prime_builds_and_primes_everything() {
  let env = TestEnv::greet();

  env
    .pw_cmd()
    .arg("prime")
    .assert()
    .success()
    .stdout(predicate::str::contains("Prime complete"))
    .stdout(predicate::str::contains("Steps run: 8"));

  assert!(env.join("stage/lib/greet.txt").is_file());
  assert!(!env.join("stage/share").exists());
  assert!(env.join("prime/bin/hello").is_file());
  assert!(env.join("prime/lib/greet.txt").is_file());
  assert!(!env.join("prime/share").exists());
}

#[cfg(unix)]
#[test]
fn prime_is_idempotent() {
  let env = TestEnv::greet();

  env.pw_cmd().arg("prime").assert().success();

  env
    .pw_cmd()
    .arg("prime")
    .assert()
    .success()
    .stdout(predicate::str::contains("Steps run: 0"))
    .stdout(predicate::str::contains("Steps skipped: 8"));
}

#[cfg(unix)]
#[test]
fn logs_progress_to_stderr() {
  let env = TestEnv::greet();

  env
    .pw_cmd()
    .args(["build", "libgreet"])
    .assert()
    .success()
    .stderr(predicate::str::contains("Pulling libgreet"))
    .stderr(predicate::str::contains("Building libgreet"));
}

#[cfg(unix)]
#[test]
fn stage_of_dependent_stages_prerequisite_first() {
  let env = TestEnv::greet();

  env
    .pw_cmd()
    .args(["stage", "hello", "libgreet"])
    .assert()
    .success()
    .stderr(predicate::str::contains(
      "'hello' has prerequisites that need to be staged: libgreet",
    ));

  assert!(env.join("stage/lib/greet.txt").is_file());
  assert!(env.join("stage/bin/hello").is_file());
}

#[cfg(unix)]
#[test]
fn unsatisfied_prerequisite_fails() {
  let env = TestEnv::greet();

  env
    .pw_cmd()
    .args(["pull", "hello"])
    .assert()
    .failure()
    .stderr(predicate::str::contains(
      "Requested 'pull' of 'hello' but there are unsatisfied prerequisites: 'libgreet'",
    ));
}

#[cfg(unix)]
#[test]
fn failing_build_command_reports_exit_code() {
  let env = TestEnv::new(
    r#"
parts:
  broken:
    plugin: command
    build-commands:
      - exit 3
"#,
  );

  env
    .pw_cmd()
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("failed with exit code 3"));
}

#[test]
fn missing_copy_source_fails() {
  let env = TestEnv::new(
    r#"
parts:
  assets:
    plugin: copy
    files:
      missing.txt: share/missing.txt
"#,
  );

  env
    .pw_cmd()
    .arg("pull")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Unable to find package path"));
}

#[test]
fn copy_part_primes_files() {
  let env = TestEnv::new(
    r#"
parts:
  assets:
    plugin: copy
    files:
      data/config.ini: etc/config.ini
"#,
  );
  env.write_file("data/config.ini", "[main]\n");

  env.pw_cmd().arg("prime").assert().success();

  assert_eq!(
    std::fs::read_to_string(env.join("prime/etc/config.ini")).unwrap(),
    "[main]\n"
  );
}

#[test]
fn colliding_parts_fail_before_staging() {
  let env = TestEnv::new(
    r#"
parts:
  one:
    plugin: copy
    files:
      one.txt: share/file.txt
  two:
    plugin: copy
    files:
      two.txt: share/file.txt
"#,
  );
  env.write_file("one.txt", "one\n");
  env.write_file("two.txt", "two\n");

  env
    .pw_cmd()
    .arg("stage")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Parts 'one' and 'two' have the following file paths in common"));

  assert!(!env.join("stage/share").exists());
}

#[test]
fn json_report_lists_events() {
  let env = TestEnv::new(
    r#"
parts:
  empty:
    plugin: nil
"#,
  );

  let report = env.json(&["pull"]);

  assert_eq!(report["events"][0]["phase"], "pull");
  assert_eq!(report["events"][0]["part"], "empty");
  assert_eq!(report["events"][0]["skipped"], false);
}
