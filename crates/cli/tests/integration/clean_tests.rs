//! Clean command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

const TWO_PARTS: &str = r#"
parts:
  base:
    plugin: nil
  top:
    plugin: nil
    after: [base]
"#;

#[test]
fn clean_everything_removes_shared_trees() {
  let env = TestEnv::new(TWO_PARTS);
  env.pw_cmd().arg("prime").assert().success();
  assert!(env.join("prime").is_dir());

  env
    .pw_cmd()
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Cleaned base, top"));

  for dir in ["parts", "stage", "prime"] {
    assert!(!env.join(dir).exists(), "{dir} still exists");
  }
}

#[test]
fn clean_single_part_keeps_others() {
  let env = TestEnv::new(TWO_PARTS);
  env.pw_cmd().arg("stage").assert().success();

  env
    .pw_cmd()
    .args(["clean", "base"])
    .assert()
    .success()
    .stderr(predicate::str::contains("cleaning a part other staged parts depend on"));

  assert!(!env.join("parts/base").exists());
  assert!(env.join("parts/top").is_dir());
  assert!(env.join("stage").is_dir());

  let status = env.json(&["status"]);
  assert_eq!(status["parts"][0]["status"], "not-run");
  assert_eq!(status["parts"][1]["status"], "staged");
}

#[test]
fn cleaned_part_runs_again() {
  let env = TestEnv::new(TWO_PARTS);
  env.pw_cmd().args(["pull", "base"]).assert().success();
  env.pw_cmd().args(["clean", "base"]).assert().success();

  env
    .pw_cmd()
    .args(["pull", "base"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Steps run: 1"));
}

#[test]
fn clean_json_output() {
  let env = TestEnv::new(TWO_PARTS);

  let cleaned = env.json(&["clean", "top"]);
  assert_eq!(cleaned["cleaned"], serde_json::json!(["top"]));
}
