use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use groupwatch::exec::{CommandOutput, CommandRunner};

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

/// A fake runner that:
/// - records every program + argv it is asked to run
/// - answers with a scripted output per program (exit 0, empty output by
///   default), or a spawn error for programs marked missing.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    invocations: Arc<Mutex<Vec<Invocation>>>,
    scripted: Arc<Mutex<HashMap<String, CommandOutput>>>,
    missing: Arc<Mutex<Vec<String>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `program` with the given exit code and output.
    pub fn respond(&self, program: &str, code: i32, stdout: &str, stderr: &str) -> &Self {
        self.scripted.lock().unwrap().insert(
            program.to_string(),
            CommandOutput {
                code: Some(code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    /// Make `program` fail to spawn.
    pub fn missing(&self, program: &str) -> &Self {
        self.missing.lock().unwrap().push(program.to_string());
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.invocations()
            .into_iter()
            .map(|i| i.program)
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run<'a>(
        &'a self,
        program: &'a str,
        args: &'a [String],
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<CommandOutput>> + Send + 'a>> {
        Box::pin(async move {
            self.invocations.lock().unwrap().push(Invocation {
                program: program.to_string(),
                args: args.to_vec(),
            });

            if self.missing.lock().unwrap().iter().any(|p| p == program) {
                anyhow::bail!("No such file or directory: {program}");
            }

            Ok(self
                .scripted
                .lock()
                .unwrap()
                .get(program)
                .cloned()
                .unwrap_or(CommandOutput {
                    code: Some(0),
                    stdout: String::new(),
                    stderr: String::new(),
                }))
        })
    }
}
