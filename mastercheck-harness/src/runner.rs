//! Sequential execution of test units with panic isolation.

use mastercheck_core::outcome::{AggregateStatus, OutcomeLog, TestOutcome};
use std::any::Any;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{error, info};

pub type UnitFuture = Pin<Box<dyn Future<Output = TestOutcome> + Send + 'static>>;

type UnitFn = Arc<dyn Fn() -> UnitFuture + Send + Sync>;

/// A named, independently runnable check.
#[derive(Clone)]
pub struct TestUnit {
    name: String,
    run: UnitFn,
}

impl TestUnit {
    pub fn new<F, Fut>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TestOutcome> + Send + 'static,
    {
        Self {
            name: name.into(),
            run: Arc::new(move || Box::pin(run()) as UnitFuture),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for TestUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestUnit").field("name", &self.name).finish()
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub outcomes: Vec<TestOutcome>,
    pub published: Vec<PathBuf>,
}

impl RunReport {
    pub fn aggregate(&self) -> AggregateStatus {
        AggregateStatus::of(&self.outcomes)
    }

    pub fn exit_code(&self) -> i32 {
        self.aggregate().exit_code()
    }
}

/// Runs units one after another. A failing or panicking unit never stops the rest.
#[derive(Debug, Default)]
pub struct Runner {
    units: Vec<TestUnit>,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(mut self, unit: TestUnit) -> Self {
        self.units.push(unit);
        self
    }

    pub async fn run(&self) -> Vec<TestOutcome> {
        let mut log = OutcomeLog::new();

        for unit in &self.units {
            info!("Running {} test", unit.name);
            let outcome = run_isolated(unit).await;
            if let Err(e) = log.record(outcome) {
                error!("{}", e);
            }
        }

        log.finish()
    }
}

async fn run_isolated(unit: &TestUnit) -> TestOutcome {
    let fut = (unit.run)();
    match tokio::spawn(fut).await {
        Ok(outcome) if outcome.name() == unit.name => outcome,
        // Units report under their registered name.
        Ok(outcome) if outcome.passed() => TestOutcome::pass(unit.name.clone(), outcome.message()),
        Ok(outcome) => TestOutcome::fail(unit.name.clone(), outcome.message()),
        Err(join_error) => {
            let message = if join_error.is_panic() {
                format!("unit panicked: {}", panic_message(join_error.into_panic()))
            } else {
                "unit was cancelled".to_owned()
            };
            error!(unit = %unit.name, "{}", message);
            TestOutcome::fail(unit.name.clone(), message)
        }
    }
}

/// Text of a panic payload, when it carries one.
pub fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
