use std::io;
use std::path::Path;
use std::process::{Child, Command, Stdio};

/// Exit code reported for a program that could not be started.
pub const NOT_FOUND: i32 = 127;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: i32,
    pub stdout: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// True when the command produced something worth parsing.
    pub fn has_output(&self) -> bool {
        self.success() && !self.stdout.is_empty()
    }
}

/// Launches the external tools.
///
/// `run` waits for the program and captures its output. Failure to launch is
/// reported through the exit code, never as an error, so callers can treat a
/// missing tool as "no result". `spawn` starts a long-running program in
/// `workdir` with all stdio detached and hands back the child.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> CommandOutput;

    fn spawn(&self, program: &str, args: &[&str], workdir: &Path) -> io::Result<Child>;
}

pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> CommandOutput {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) => CommandOutput {
                // Killed by a signal
                code: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            },
            Err(_) => CommandOutput {
                code: NOT_FOUND,
                stdout: String::new(),
            },
        }
    }

    fn spawn(&self, program: &str, args: &[&str], workdir: &Path) -> io::Result<Child> {
        Command::new(program)
            .args(args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    }
}
