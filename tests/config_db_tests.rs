use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::TestEnv;

#[test]
fn test_init_applies_migrations_once() {
    let env = TestEnv::new("init_migrations");

    env.cmd()
        .args(["--test", "init"])
        .assert()
        .success()
        .stdout(contains("Migration applied").and(contains("Database initialized")));

    env.cmd()
        .args(["--test", "init"])
        .assert()
        .success()
        .stdout(contains("Migration applied").not());

    env.cmd()
        .args(["db", "--migrate"])
        .assert()
        .success()
        .stdout(contains("Nothing to migrate."));
}

#[test]
fn test_init_writes_config_outside_test_mode() {
    let env = TestEnv::new("init_config");

    env.cmd().arg("init").assert().success();

    let conf = env.home.join(".daybook").join("daybook.conf");
    let content = fs::read_to_string(&conf).expect("config written");
    assert!(content.contains("day_ends_at_hour: 0"));
    assert!(content.contains(&env.db));

    env.bare()
        .args(["config", "--check"])
        .assert()
        .success()
        .stdout(contains("Configuration is complete."));

    env.bare()
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(contains("hours_per_day: 16"));
}

#[test]
fn test_config_check_and_migrate() {
    let env = TestEnv::new("config_migrate");
    let conf = env.write_config(&format!("database: {}\nday_ends_at_hour: 3\n", env.db));

    env.bare()
        .args(["config", "--check"])
        .assert()
        .success()
        .stdout(contains("Missing key: hours_per_day").and(contains("Missing key: grid_days")));

    env.bare()
        .args(["config", "--migrate"])
        .assert()
        .success()
        .stdout(contains("Added keys"));

    let content = fs::read_to_string(&conf).expect("config readable");
    assert!(content.contains("day_ends_at_hour: 3"));
    assert!(content.contains("hours_per_day: 16"));

    env.bare()
        .args(["config", "--check"])
        .assert()
        .success()
        .stdout(contains("Configuration is complete."));
}

#[test]
fn test_config_without_file_warns() {
    let env = TestEnv::new("config_missing");

    env.bare()
        .args(["config", "--check"])
        .assert()
        .success()
        .stdout(contains("No configuration file"));
}

#[test]
fn test_log_records_mutations() {
    let env = TestEnv::new("log_print");
    env.init();
    env.run(&["category", "add", "Reading", "rd", "--id", "cat-read"]);
    env.run(&["timer", "start"]);
    env.run(&["timer", "stop"]);

    env.cmd()
        .args(["log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied"))
        .stdout(contains("(cat-read)"))
        .stdout(contains("(start)").and(contains("(stop)")));

    env.cmd()
        .args(["log", "--print", "--tail", "1"])
        .assert()
        .success()
        .stdout(contains("(stop)").and(contains("migration_applied").not()));
}

#[test]
fn test_db_info_and_check() {
    let env = TestEnv::new("db_info");
    env.init();
    env.run(&["todo", "add", "Something", "--category", "cat-wasted"]);

    env.cmd()
        .args(["db", "--info"])
        .assert()
        .success()
        .stdout(contains("migrations applied"));

    env.cmd()
        .args(["db", "--check"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed."));

    env.cmd()
        .args(["db", "--vacuum"])
        .assert()
        .success();
}
