//! Scripted command runner for unit tests.

use super::command_executor::MockCommandRunner;
use super::{ExecOutput, Executor};
use std::sync::{Arc, Mutex};

pub fn argv_is(argv: &[String], expected: &[&str]) -> bool {
    argv.iter().map(String::as_str).eq(expected.iter().copied())
}

pub fn respond(
    prefix: &'static [&'static str],
    output: ExecOutput,
) -> (&'static [&'static str], ExecOutput) {
    (prefix, output)
}

/// Calls seen by a scripted executor: directory and command line.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<(String, String)>>>);

impl CallLog {
    /// Every command line, in order.
    pub fn commands(&self) -> Vec<String> {
        self.0.lock().unwrap().iter().map(|(_, c)| c.clone()).collect()
    }

    /// Command lines run in a directory whose path ends with `suffix`.
    pub fn commands_in(&self, suffix: &str) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(dir, _)| dir.ends_with(suffix))
            .map(|(_, c)| c.clone())
            .collect()
    }

    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.commands().iter().position(|c| c.starts_with(prefix))
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.position(prefix).is_some()
    }
}

/// Executor whose runner answers from `responses` (first matching argv
/// prefix wins, otherwise success with no output) and records every call.
pub fn scripted(responses: Vec<(&'static [&'static str], ExecOutput)>) -> (Executor, CallLog) {
    let log = CallLog::default();
    let recorded = log.clone();
    let mut runner = MockCommandRunner::new();
    runner.expect_run().returning(move |dir, argv, _| {
        recorded
            .0
            .lock()
            .unwrap()
            .push((dir.display().to_string(), argv.join(" ")));
        for (prefix, output) in &responses {
            if argv.len() >= prefix.len() && argv_is(&argv[..prefix.len()], prefix) {
                return Ok(output.clone());
            }
        }
        Ok(ExecOutput::new(0, "", ""))
    });
    (Executor::new(Arc::new(runner)), log)
}
