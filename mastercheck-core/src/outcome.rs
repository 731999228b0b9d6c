//! Per-unit outcomes and the aggregate status derived from them.

use crate::error::{CheckError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    pub fn is_pass(self) -> bool {
        self == Status::Pass
    }

    /// Fixed two-state marker used in report lines.
    pub fn marker(self) -> &'static str {
        match self {
            Status::Pass => "✅ PASS",
            Status::Fail => "❌ FAIL",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Result of one test unit. Fields are private so an outcome cannot change once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    name: String,
    status: Status,
    message: String,
}

impl TestOutcome {
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: Status::Pass,
            message: message.into(),
        }
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: Status::Fail,
            message: message.into(),
        }
    }

    /// Converts a unit's result into an outcome, keeping the error text as diagnostic.
    pub fn from_result<T>(
        name: impl Into<String>,
        result: Result<T>,
        on_success: impl FnOnce(T) -> String,
    ) -> Self {
        match result {
            Ok(value) => Self::pass(name, on_success(value)),
            Err(e) => Self::fail(name, e.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn passed(&self) -> bool {
        self.status.is_pass()
    }
}

/// Conjunction of every outcome of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateStatus {
    Pass,
    Fail,
}

impl AggregateStatus {
    pub fn of<'a>(outcomes: impl IntoIterator<Item = &'a TestOutcome>) -> Self {
        if outcomes.into_iter().all(TestOutcome::passed) {
            AggregateStatus::Pass
        } else {
            AggregateStatus::Fail
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            AggregateStatus::Pass => 0,
            AggregateStatus::Fail => 1,
        }
    }
}

/// Ordered, append-only record of outcomes keyed by unit name.
#[derive(Debug, Default)]
pub struct OutcomeLog {
    outcomes: Vec<TestOutcome>,
}

impl OutcomeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: TestOutcome) -> Result<()> {
        if self.outcomes.iter().any(|o| o.name == outcome.name) {
            return Err(CheckError::DuplicateOutcome(outcome.name));
        }
        self.outcomes.push(outcome);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TestOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Seals the log once every unit has run.
    pub fn finish(self) -> Vec<TestOutcome> {
        self.outcomes
    }
}
