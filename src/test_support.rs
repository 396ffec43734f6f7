use crate::cli::terminal::Terminal;
use crate::domain::{Invocation, ProcessRunner};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;

/// Recording `ProcessRunner` that never spawns anything.
///
/// Every invocation is recorded as its display string. Invocations whose
/// display contains a `fail_on` pattern fail; captured runs answer with the
/// first matching `respond_to` output, or an empty string.
#[derive(Debug)]
pub struct MockRunner {
    working_dir: PathBuf,
    commands: RwLock<Vec<String>>,
    streamed: RwLock<usize>,
    fail_on: RwLock<Vec<String>>,
    responses: RwLock<Vec<(String, String)>>,
    engine_down: RwLock<bool>,
    engine_failures_left: RwLock<usize>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::with_working_dir(".")
    }

    pub fn with_working_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            working_dir: dir.as_ref().to_path_buf(),
            commands: RwLock::new(Vec::new()),
            streamed: RwLock::new(0),
            fail_on: RwLock::new(Vec::new()),
            responses: RwLock::new(Vec::new()),
            engine_down: RwLock::new(false),
            engine_failures_left: RwLock::new(0),
        }
    }

    pub fn fail_on(&self, pattern: &str) {
        self.fail_on.write().unwrap().push(pattern.to_string());
    }

    pub fn respond_to(&self, pattern: &str, output: &str) {
        self.responses
            .write()
            .unwrap()
            .push((pattern.to_string(), output.to_string()));
    }

    /// Makes every `<engine> info` probe fail until switched back
    pub fn set_engine_down(&self, down: bool) {
        *self.engine_down.write().unwrap() = down;
    }

    /// Makes the next `count` engine probes fail
    pub fn fail_engine_probes(&self, count: usize) {
        *self.engine_failures_left.write().unwrap() = count;
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    pub fn commands_matching(&self, pattern: &str) -> Vec<String> {
        self.get_commands()
            .into_iter()
            .filter(|cmd| cmd.contains(pattern))
            .collect()
    }

    pub fn streamed_count(&self) -> usize {
        *self.streamed.read().unwrap()
    }

    fn record(&self, invocation: &Invocation) -> String {
        let line = invocation.to_string();
        self.commands.write().unwrap().push(line.clone());
        line
    }

    fn should_fail(&self, line: &str) -> bool {
        self.fail_on
            .read()
            .unwrap()
            .iter()
            .any(|pattern| line.contains(pattern.as_str()))
    }

    fn engine_probe_fails(&self) -> bool {
        if *self.engine_down.read().unwrap() {
            return true;
        }
        let mut left = self.engine_failures_left.write().unwrap();
        if *left > 0 {
            *left -= 1;
            return true;
        }
        false
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner for MockRunner {
    fn run_streamed(&self, invocation: &Invocation) -> bool {
        let line = self.record(invocation);
        *self.streamed.write().unwrap() += 1;
        !self.should_fail(&line)
    }

    fn run_captured(&self, invocation: &Invocation) -> Option<String> {
        let line = self.record(invocation);

        if invocation.args == ["info"] && self.engine_probe_fails() {
            return None;
        }
        if self.should_fail(&line) {
            return None;
        }

        let output = self
            .responses
            .read()
            .unwrap()
            .iter()
            .find(|(pattern, _)| line.contains(pattern.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_default();
        Some(output)
    }

    fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

/// `Terminal` fed from a queue of input lines. Output is recorded, pauses
/// are recorded instead of slept, and an exhausted queue reads as end of
/// input.
#[derive(Debug, Default)]
pub struct ScriptedTerminal {
    input: VecDeque<String>,
    output: Vec<String>,
    prompts: Vec<String>,
    clears: usize,
    pauses: Vec<Duration>,
}

impl ScriptedTerminal {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn output_text(&self) -> String {
        self.output.join("\n")
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn pauses(&self) -> &[Duration] {
        &self.pauses
    }

    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }

    /// How many times `needle` was written, counting each output line once
    pub fn count_lines_containing(&self, needle: &str) -> usize {
        self.output.iter().filter(|line| line.contains(needle)).count()
    }
}

impl Terminal for ScriptedTerminal {
    fn write_line(&mut self, line: &str) {
        self.output.push(line.to_string());
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.input.pop_front()
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}
