#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// An isolated HOME and database for one test. Every command runs with
/// `TZ=UTC` so logical days are predictable.
pub struct TestEnv {
    pub home: PathBuf,
    pub db: String,
}

impl TestEnv {
    pub fn new(name: &str) -> Self {
        let mut home: PathBuf = env::temp_dir();
        home.push(format!("daybook_test_{}", name));
        fs::remove_dir_all(&home).ok();
        fs::create_dir_all(&home).expect("create test home");

        let db = home.join("daybook.sqlite").to_string_lossy().to_string();
        Self { home, db }
    }

    /// Command without `--db`.
    pub fn bare(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("daybook");
        cmd.env("HOME", &self.home).env("TZ", "UTC");
        cmd
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = self.bare();
        cmd.args(["--db", self.db.as_str()]);
        cmd
    }

    pub fn init(&self) {
        self.cmd().args(["--test", "init"]).assert().success();
    }

    /// Write `~/.daybook/daybook.conf`.
    pub fn write_config(&self, yaml: &str) -> PathBuf {
        let dir = self.home.join(".daybook");
        fs::create_dir_all(&dir).expect("create config dir");
        let path = dir.join("daybook.conf");
        fs::write(&path, yaml).expect("write config");
        path
    }

    /// Run a command and return its stdout.
    pub fn run(&self, args: &[&str]) -> String {
        let out = self.cmd().args(args).assert().success();
        String::from_utf8_lossy(&out.get_output().stdout).to_string()
    }

    /// Run an `add` command and return the id it prints last in parentheses.
    pub fn add(&self, args: &[&str]) -> String {
        let out = self.run(args);
        id_from(&out)
    }
}

pub fn id_from(output: &str) -> String {
    let line = output
        .lines()
        .rev()
        .find(|l| l.contains('('))
        .expect("no id in output");
    let start = line.rfind('(').expect("no opening paren") + 1;
    let end = line[start..].find(')').expect("no closing paren") + start;
    line[start..end].to_string()
}
