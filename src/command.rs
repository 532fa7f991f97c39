use crate::error::{Error, Result, single_line};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Raw result of one external command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Successful exit with the given stdout.
    pub fn ok(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }

    /// Non-zero exit with the given stderr.
    pub fn exit(code: i32, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: Vec::new(),
            stderr: stderr.into(),
        }
    }

    fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {}", code),
            None => "signal".to_string(),
        }
    }
}

/// Abstraction over external command execution.
/// Production code talks to the real system; tests script the responses.
pub trait CommandRunner {
    /// Run `program` with `args` once, capturing its output.
    /// Only a failure to start the process is an error here; exit status is
    /// reported through [`CommandOutput`].
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Runs commands on the local host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        debug!(program, ?args, "running command");
        let output = std::process::Command::new(program)
            .args(args)
            .output()
            .map_err(|source| Error::CommandSpawn {
                program: program.to_string(),
                source,
            })?;
        debug!(program, status = %output.status, "command finished");

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Run a command and return its stdout as text.
/// Non-zero exit and undecodable output are both errors.
pub fn capture_text(runner: &dyn CommandRunner, program: &str, args: &[&str]) -> Result<String> {
    let output = runner.run(program, args)?;
    if !output.success {
        return Err(Error::CommandFailed {
            program: program.to_string(),
            status: output.status_text(),
            stderr: single_line(&String::from_utf8_lossy(&output.stderr)),
        });
    }
    String::from_utf8(output.stdout).map_err(|_| Error::Decode {
        program: program.to_string(),
    })
}

enum Scripted {
    Output(CommandOutput),
    Missing(String),
}

/// In-memory [`CommandRunner`] with pre-configured responses, keyed by the
/// full command line (`"program arg1 arg2"`). Unscripted commands behave
/// like a missing executable.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: Mutex<HashMap<String, Scripted>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `command_line` with `output`.
    pub fn with(self, command_line: &str, output: CommandOutput) -> Self {
        self.respond(command_line, output);
        self
    }

    /// Respond to `command_line` with a successful exit printing `stdout`.
    pub fn with_stdout(self, command_line: &str, stdout: &str) -> Self {
        self.respond(command_line, CommandOutput::ok(stdout));
        self
    }

    /// Make `command_line` fail to start, as if the program did not exist.
    pub fn with_missing(self, command_line: &str, reason: &str) -> Self {
        self.lock_responses().insert(
            command_line.to_string(),
            Scripted::Missing(reason.to_string()),
        );
        self
    }

    /// Replace the response for `command_line`.
    pub fn respond(&self, command_line: &str, output: CommandOutput) {
        self.lock_responses()
            .insert(command_line.to_string(), Scripted::Output(output));
    }

    /// Every command line run so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|c| c.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, HashMap<String, Scripted>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }

        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.clone());

        match self.lock_responses().get(&line) {
            Some(Scripted::Output(output)) => Ok(output.clone()),
            Some(Scripted::Missing(reason)) => Err(Error::CommandSpawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, reason.clone()),
            }),
            None => Err(Error::CommandSpawn {
                program: program.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "No such file or directory",
                ),
            }),
        }
    }
}
