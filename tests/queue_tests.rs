use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::TestEnv;

fn three_todos(env: &TestEnv) -> (String, String, String) {
    let a = env.add(&["todo", "add", "Alpha", "--category", "cat-wasted"]);
    let b = env.add(&["todo", "add", "Bravo", "--category", "cat-wasted"]);
    let c = env.add(&["todo", "add", "Charlie", "--category", "cat-wasted"]);
    (a, b, c)
}

fn order(listing: &str, titles: &[&str]) -> bool {
    let pos: Vec<usize> = titles
        .iter()
        .map(|t| listing.find(t).unwrap_or(usize::MAX))
        .collect();
    pos.windows(2).all(|w| w[0] < w[1] && w[1] != usize::MAX)
}

#[test]
fn test_queue_add_move_insert() {
    let env = TestEnv::new("queue_ops");
    env.init();
    let (a, b, c) = three_todos(&env);

    env.cmd()
        .args(["queue", "list"])
        .assert()
        .success()
        .stdout(contains("The queue is empty."));

    env.run(&["queue", "add", a.as_str()]);
    env.run(&["queue", "add", b.as_str()]);
    env.cmd()
        .args(["queue", "add", c.as_str()])
        .assert()
        .success()
        .stdout(contains("Queued at #3: Charlie"));

    env.cmd()
        .args(["queue", "add", a.as_str()])
        .assert()
        .success()
        .stdout(contains("Already queued: Alpha"));

    let listing = env.run(&["queue", "move", "3", "1"]);
    assert!(order(&listing, &["Charlie", "Alpha", "Bravo"]), "{listing}");

    env.cmd()
        .args(["queue", "move", "9", "1"])
        .assert()
        .failure()
        .stderr(contains("no queue item at position 9"));

    env.cmd()
        .args(["queue", "move", "0", "1"])
        .assert()
        .failure()
        .stderr(contains("positions start at 1"));

    env.cmd()
        .args(["queue", "insert", b.as_str(), "1"])
        .assert()
        .success()
        .stdout(contains("Queued at #1: Bravo"));

    let listing = env.run(&["queue", "list"]);
    assert!(order(&listing, &["Bravo", "Charlie", "Alpha"]), "{listing}");

    env.cmd()
        .args(["queue", "insert", b.as_str(), "99"])
        .assert()
        .success()
        .stdout(contains("Queued at #3: Bravo"));
}

#[test]
fn test_queue_next_pop_clear() {
    let env = TestEnv::new("queue_next_pop");
    env.init();
    let (a, b, _) = three_todos(&env);

    env.run(&["queue", "add", a.as_str()]);
    env.run(&["queue", "add", b.as_str()]);

    // completed todos are skipped by next
    env.run(&["todo", "done", a.as_str()]);
    env.cmd()
        .args(["queue", "next"])
        .assert()
        .success()
        .stdout(contains("Bravo"));

    env.cmd()
        .args(["queue", "add", a.as_str()])
        .assert()
        .failure()
        .stderr(contains("already completed"));

    env.cmd()
        .args(["queue", "pop"])
        .assert()
        .success()
        .stdout(contains("Bravo"));

    env.cmd()
        .args(["queue", "pop"])
        .assert()
        .success()
        .stdout(contains("The queue is empty."));

    env.run(&["queue", "add", b.as_str()]);
    env.cmd()
        .args(["queue", "clear"])
        .assert()
        .success()
        .stdout(contains("Queue cleared (1 item(s))."));

    env.cmd()
        .args(["queue", "remove", b.as_str()])
        .assert()
        .success()
        .stdout(contains("Not in the queue").and(contains("Bravo").not()));
}

#[test]
fn test_deleted_todo_leaves_the_queue() {
    let env = TestEnv::new("queue_delete");
    env.init();
    let (a, _, _) = three_todos(&env);

    env.run(&["queue", "add", a.as_str()]);
    env.run(&["todo", "del", a.as_str()]);

    env.cmd()
        .args(["queue", "list"])
        .assert()
        .success()
        .stdout(contains("The queue is empty."));
}
