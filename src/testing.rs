//! In-memory doubles for the store, the host and the clock.
//!
//! Used by unit tests and by the pipeline integration tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use crate::core::host::{CommandOutput, CommandRunner, CommandSpec};
use crate::core::retry::Sleeper;
use crate::core::store::ConfigStore;
use crate::error::{Result, StoreError};

/// Records requested sleeps instead of blocking.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    slept: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every delay requested so far, in order.
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.borrow().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.borrow_mut().push(duration);
    }
}

/// Store backed by hash maps, with scripted failures.
#[derive(Debug, Default)]
pub struct MemoryStore {
    secrets: HashMap<String, String>,
    parameters: HashMap<String, String>,
    failures: RefCell<HashMap<String, u32>>,
    calls: RefCell<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret document.
    pub fn with_secret(mut self, id: &str, document: &str) -> Self {
        self.secrets.insert(id.to_string(), document.to_string());
        self
    }

    /// Add a parameter value.
    pub fn with_parameter(mut self, name: &str, value: &str) -> Self {
        self.parameters.insert(name.to_string(), value.to_string());
        self
    }

    /// Fail the next `times` reads of `name`. `u32::MAX` fails forever.
    pub fn failing(self, name: &str, times: u32) -> Self {
        self.failures.borrow_mut().insert(name.to_string(), times);
        self
    }

    /// Names read so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// How often `name` was read.
    pub fn call_count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == name).count()
    }

    fn read(&self, name: &str, map: &HashMap<String, String>) -> Result<String> {
        self.calls.borrow_mut().push(name.to_string());

        if let Some(remaining) = self.failures.borrow_mut().get_mut(name) {
            if *remaining > 0 {
                if *remaining != u32::MAX {
                    *remaining -= 1;
                }
                return Err(StoreError::Request {
                    name: name.to_string(),
                    reason: "ThrottlingException: rate exceeded".to_string(),
                }
                .into());
            }
        }

        map.get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()).into())
    }
}

impl ConfigStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get_secret(&self, id: &str) -> Result<String> {
        self.read(id, &self.secrets)
    }

    fn get_parameter(&self, name: &str, _decrypt: bool) -> Result<String> {
        self.read(name, &self.parameters)
    }
}

/// Records commands instead of running them.
///
/// Commands succeed unless a scripted response matches. A response queue
/// is consumed front to back and its last entry repeats.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: RefCell<Vec<CommandSpec>>,
    responses: RefCell<Vec<(String, VecDeque<CommandOutput>)>>,
    programs: Option<HashSet<String>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outputs of commands whose display contains `pattern`.
    pub fn respond(self, pattern: &str, outputs: Vec<CommandOutput>) -> Self {
        self.responses
            .borrow_mut()
            .push((pattern.to_string(), outputs.into_iter().collect()));
        self
    }

    /// Make every command containing `pattern` exit with status 1.
    pub fn fail_on(self, pattern: &str) -> Self {
        self.respond(pattern, vec![CommandOutput::failure(1, "simulated failure")])
    }

    /// Only report these programs as installed.
    pub fn with_programs(mut self, programs: &[&str]) -> Self {
        self.programs = Some(programs.iter().map(|p| p.to_string()).collect());
        self
    }

    /// Recorded commands.
    pub fn specs(&self) -> Vec<CommandSpec> {
        self.commands.borrow().clone()
    }

    /// Recorded commands as display strings.
    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().iter().map(|c| c.display()).collect()
    }

    /// Whether any recorded command contains `pattern`.
    pub fn ran(&self, pattern: &str) -> bool {
        self.commands().iter().any(|c| c.contains(pattern))
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        let display = spec.display();
        self.commands.borrow_mut().push(spec.clone());

        let mut responses = self.responses.borrow_mut();
        for (pattern, queue) in responses.iter_mut() {
            if display.contains(pattern.as_str()) {
                let output = if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                };
                if let Some(output) = output {
                    return Ok(output);
                }
            }
        }
        Ok(CommandOutput::success())
    }

    fn exists(&self, program: &str) -> bool {
        self.programs
            .as_ref()
            .map_or(true, |programs| programs.contains(program))
    }
}
