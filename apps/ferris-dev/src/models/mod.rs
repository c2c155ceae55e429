//! Shared data models for task, hook, and label reports.

pub mod hook;
pub mod label;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
/// One external command run as part of a task.
pub struct StepReport {
    pub name: String,
    pub command: String,
    pub exit_code: i32,
    /// Captured output of a failed step that was not streamed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl StepReport {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug, Clone, Serialize)]
/// Outcome of a wrapper task such as `lint`, `coverage`, or `lint-docs`.
pub struct TaskReport {
    pub task: String,
    pub steps: Vec<StepReport>,
    /// Reason the task did nothing; skipped tasks never fail.
    pub skipped: Option<String>,
    /// Files produced by the task (coverage reports).
    pub artifacts: Vec<String>,
    pub exit_code: i32,
}

impl TaskReport {
    pub fn new(task: &str) -> Self {
        Self {
            task: task.to_string(),
            steps: Vec::new(),
            skipped: None,
            artifacts: Vec::new(),
            exit_code: 0,
        }
    }

    pub fn skipped(task: &str, reason: impl Into<String>) -> Self {
        let mut r = Self::new(task);
        r.skipped = Some(reason.into());
        r
    }

    /// Record a step; the first failing step fixes the task's exit code.
    pub fn push(&mut self, name: &str, command: String, exit_code: i32) {
        if self.exit_code == 0 && exit_code != 0 {
            self.exit_code = exit_code;
        }
        self.steps.push(StepReport {
            name: name.to_string(),
            command,
            exit_code,
            output: None,
        });
    }

    /// Record a step whose output was captured rather than streamed.
    pub fn push_captured(&mut self, name: &str, command: String, exit_code: i32, output: String) {
        self.push(name, command, exit_code);
        if exit_code != 0 && !output.trim().is_empty() {
            if let Some(last) = self.steps.last_mut() {
                last.output = Some(output);
            }
        }
    }

    /// Fail the task without a step of its own (precondition failures).
    pub fn fail(&mut self, code: i32) {
        if self.exit_code == 0 {
            self.exit_code = code;
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
