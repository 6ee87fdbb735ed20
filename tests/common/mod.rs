// Shared fixtures for the integration tests
#![allow(dead_code)]

use airsurvey::cancel::CancelToken;
use airsurvey::command::{CommandOutput, CommandRunner, NOT_FOUND};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::Path;
use std::process::{Child, Command, Stdio};

/// Replays canned outputs per program and records every call.
///
/// Spawned programs are replaced by a harmless `sleep`. When an interrupt
/// token is set, each spawn fires it, as if Ctrl+C arrived while the capture
/// was on screen.
#[derive(Default)]
pub struct ScriptedRunner {
    replies: RefCell<HashMap<String, VecDeque<CommandOutput>>>,
    calls: RefCell<Vec<String>>,
    interrupt: Option<CancelToken>,
}

fn describe(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

impl ScriptedRunner {
    pub fn reply(self, program: &str, code: i32, stdout: &str) -> Self {
        self.replies
            .borrow_mut()
            .entry(program.to_string())
            .or_default()
            .push_back(CommandOutput {
                code,
                stdout: stdout.to_string(),
            });
        self
    }

    pub fn interrupt_on_spawn(mut self, token: CancelToken) -> Self {
        self.interrupt = Some(token);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str]) -> CommandOutput {
        self.calls.borrow_mut().push(describe(program, args));

        self.replies
            .borrow_mut()
            .get_mut(program)
            .and_then(|queue| queue.pop_front())
            .unwrap_or(CommandOutput {
                code: NOT_FOUND,
                stdout: String::new(),
            })
    }

    fn spawn(&self, program: &str, args: &[&str], workdir: &Path) -> io::Result<Child> {
        self.calls.borrow_mut().push(describe(program, args));
        if let Some(token) = &self.interrupt {
            token.cancel();
        }
        Command::new("sleep")
            .arg("30")
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    }
}
