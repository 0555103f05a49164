use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::TestEnv;

#[test]
fn test_timer_full_cycle_logs_an_entry() {
    let env = TestEnv::new("timer_full_cycle");
    env.init();

    env.cmd()
        .args(["timer", "start"])
        .assert()
        .success()
        .stdout(contains("Timer started: Wasted Time"));

    env.cmd()
        .args(["timer", "status"])
        .assert()
        .success()
        .stdout(contains("running").and(contains("Wasted Time")));

    env.cmd()
        .args(["timer", "pause"])
        .assert()
        .success()
        .stdout(contains("Timer paused"));

    env.cmd()
        .args(["timer", "status"])
        .assert()
        .success()
        .stdout(contains("paused"));

    env.cmd()
        .args(["timer", "resume"])
        .assert()
        .success()
        .stdout(contains("Timer resumed"));

    // under a minute still logs the one-minute minimum
    env.cmd()
        .args(["timer", "stop", "--title", "Quick check"])
        .assert()
        .success()
        .stdout(contains("Logged 1 min to Wasted Time"));

    env.cmd()
        .args(["timer", "status"])
        .assert()
        .success()
        .stdout(contains("idle"));

    env.cmd()
        .args(["entry", "list", "--day", "today"])
        .assert()
        .success()
        .stdout(contains("Quick check").and(contains("Total: 00h 01m")));
}

#[test]
fn test_timer_ignores_out_of_order_events() {
    let env = TestEnv::new("timer_out_of_order");
    env.init();

    env.cmd()
        .args(["timer", "pause"])
        .assert()
        .success()
        .stdout(contains("Timer is not running."));

    env.cmd()
        .args(["timer", "resume"])
        .assert()
        .success()
        .stdout(contains("Timer is not paused."));

    env.cmd()
        .args(["timer", "stop"])
        .assert()
        .success()
        .stdout(contains("nothing to log"));

    env.cmd()
        .args(["timer", "add", "--minutes", "5"])
        .assert()
        .success()
        .stdout(contains("nothing to adjust"));

    env.cmd().args(["timer", "start"]).assert().success();

    env.cmd()
        .args(["timer", "start"])
        .assert()
        .success()
        .stdout(contains("already running"));

    env.cmd()
        .args(["timer", "resume"])
        .assert()
        .success()
        .stdout(contains("Timer is not paused."));
}

#[test]
fn test_timer_adjust_and_category_change() {
    let env = TestEnv::new("timer_adjust");
    env.init();
    env.run(&["category", "add", "Reading", "rd", "--id", "cat-read"]);

    env.cmd().args(["timer", "start"]).assert().success();

    env.cmd()
        .args(["timer", "add", "--minutes", "90"])
        .assert()
        .success()
        .stdout(contains("Added 90 min, elapsed now 01:30:"));

    env.cmd()
        .args(["timer", "category", "cat-read"])
        .assert()
        .success()
        .stdout(contains("Timer category set to Reading"));

    env.cmd()
        .args(["timer", "category", "cat-nope"])
        .assert()
        .failure()
        .stderr(contains("Category not found: cat-nope"));

    env.cmd()
        .args(["timer", "stop"])
        .assert()
        .success()
        .stdout(contains("Logged 90 min to Reading"));
}

#[test]
fn test_timer_reset_discards_the_session() {
    let env = TestEnv::new("timer_reset");
    env.init();

    env.cmd().args(["timer", "start"]).assert().success();
    env.cmd()
        .args(["timer", "reset"])
        .assert()
        .success()
        .stdout(contains("Timer reset."));

    env.cmd()
        .args(["timer", "stop"])
        .assert()
        .success()
        .stdout(contains("nothing to log"));

    env.cmd()
        .args(["entry", "list", "--day", "today"])
        .assert()
        .success()
        .stdout(contains("No entries"));
}

#[test]
fn test_timer_works_through_the_queue() {
    let env = TestEnv::new("timer_queue");
    env.init();
    env.run(&["category", "add", "Writing", "wr", "--id", "cat-write"]);

    let first = env.add(&["todo", "add", "Draft intro", "--category", "cat-write"]);
    let second = env.add(&["todo", "add", "Edit chapter", "--category", "cat-write"]);
    env.run(&["queue", "add", first.as_str()]);
    env.run(&["queue", "add", second.as_str()]);

    env.cmd()
        .args(["timer", "start"])
        .assert()
        .success()
        .stdout(contains("Picking the next task from the queue: Draft intro"))
        .stdout(contains(format!("Timer started: Writing ({})", first)));

    env.cmd()
        .args(["timer", "stop"])
        .assert()
        .success()
        .stdout(contains("Logged 1 min to Writing"))
        .stdout(contains("Todo completed: Draft intro"))
        .stdout(contains("Up next: Edit chapter"));

    env.cmd()
        .args(["queue", "list"])
        .assert()
        .success()
        .stdout(contains("Edit chapter").and(contains("Draft intro").not()));

    // --not-done keeps the todo open but still takes it off the queue
    env.cmd()
        .args(["timer", "start", "--todo", second.as_str()])
        .assert()
        .success();
    env.cmd()
        .args(["timer", "stop", "--not-done"])
        .assert()
        .success()
        .stdout(contains("Todo completed").not());

    env.cmd()
        .args(["todo", "list"])
        .assert()
        .success()
        .stdout(contains("Edit chapter"));

    env.cmd()
        .args(["queue", "list"])
        .assert()
        .success()
        .stdout(contains("The queue is empty."));
}

#[test]
fn test_deleting_the_timer_category_moves_the_session() {
    let env = TestEnv::new("timer_category_deleted");
    env.init();
    env.run(&["category", "add", "Work", "WK", "--id", "cat-work"]);

    env.cmd()
        .args(["timer", "start", "--category", "cat-work"])
        .assert()
        .success()
        .stdout(contains("Timer started: Work"));

    env.run(&["category", "del", "cat-work"]);

    env.cmd()
        .args(["timer", "status"])
        .assert()
        .success()
        .stdout(contains("Wasted Time"));

    env.cmd()
        .args(["timer", "stop"])
        .assert()
        .success()
        .stdout(contains("Logged 1 min to Wasted Time"));
}

#[test]
fn test_stop_after_the_todo_was_deleted() {
    let env = TestEnv::new("timer_todo_deleted");
    env.init();
    let todo = env.add(&["todo", "add", "Draft", "--category", "cat-wasted"]);

    env.run(&["timer", "start", "--todo", todo.as_str()]);
    env.run(&["todo", "del", todo.as_str()]);

    env.cmd()
        .args(["timer", "stop"])
        .assert()
        .success()
        .stdout(contains("Logged 1 min").and(contains("Todo completed").not()));
}
