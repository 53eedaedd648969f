//! Status and env command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

const TWO_PARTS: &str = r#"
name: pair
parts:
  base:
    plugin: nil
  top:
    plugin: nil
    after: [base]
"#;

#[test]
fn status_lists_parts_in_order() {
  let env = TestEnv::new(TWO_PARTS);

  env
    .pw_cmd()
    .arg("status")
    .assert()
    .success()
    .stdout(predicate::str::contains("Project pair"))
    .stdout(predicate::str::is_match(r"(?s)base.*not-run.*top.*not-run").unwrap());
}

#[test]
fn status_reflects_progress() {
  let env = TestEnv::new(TWO_PARTS);

  env.pw_cmd().args(["stage", "base"]).assert().success();

  let status = env.json(&["status"]);
  assert_eq!(status["project"], "pair");
  assert_eq!(status["parts"][0]["name"], "base");
  assert_eq!(status["parts"][0]["status"], "staged");
  assert_eq!(status["parts"][1]["name"], "top");
  assert_eq!(status["parts"][1]["status"], "not-run");
  assert_eq!(status["parts"][1]["after"][0], "base");
}

#[test]
fn verbose_status_shows_plugin() {
  let env = TestEnv::new(TWO_PARTS);

  env
    .pw_cmd()
    .args(["-v", "status"])
    .assert()
    .success()
    .stdout(predicate::str::contains("plugin: nil"))
    .stdout(predicate::str::contains("after: base"));
}

#[test]
fn env_points_at_prime_tree() {
  let env = TestEnv::new(TWO_PARTS);
  let prime = dunce::canonicalize(env.path()).unwrap().join("prime");

  env
    .pw_cmd()
    .arg("env")
    .assert()
    .success()
    .stdout(predicate::str::contains(format!("export PATH=\"{}/usr/bin", prime.display())));
}

#[test]
fn part_env_includes_build_flags() {
  let env = TestEnv::new(TWO_PARTS);

  let vars = env.json(&["env", "--part", "top"]);
  let vars: Vec<&str> = vars.as_array().unwrap().iter().filter_map(|v| v.as_str()).collect();

  assert!(vars.iter().any(|v| v.starts_with("LDFLAGS=")));
  assert!(vars.iter().any(|v| v.starts_with("PKG_CONFIG_PATH=")));
}

#[test]
fn part_env_for_unknown_part_fails() {
  let env = TestEnv::new(TWO_PARTS);

  env
    .pw_cmd()
    .args(["env", "--part", "nope"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("The part named 'nope' is not defined"));
}
