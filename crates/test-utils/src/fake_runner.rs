use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use testrun::errors::{Result, TestrunError};
use testrun::exec::{CommandSpec, ProcessResult, ProcessRunner};

/// A fake runner that:
/// - records every `CommandSpec` it was asked to run
/// - returns queued outcomes in order (an error once the queue is empty).
pub struct FakeRunner {
    outcomes: VecDeque<Result<ProcessResult>>,
    calls: Arc<Mutex<Vec<CommandSpec>>>,
}

impl FakeRunner {
    pub fn new(calls: Arc<Mutex<Vec<CommandSpec>>>) -> Self {
        Self {
            outcomes: VecDeque::new(),
            calls,
        }
    }

    pub fn with_outcome(mut self, outcome: Result<ProcessResult>) -> Self {
        self.outcomes.push_back(outcome);
        self
    }
}

impl ProcessRunner for FakeRunner {
    fn run<'a>(
        &'a mut self,
        spec: &'a CommandSpec,
        _cancel: oneshot::Receiver<()>,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessResult>> + Send + 'a>> {
        {
            let mut guard = self.calls.lock().unwrap();
            guard.push(spec.clone());
        }

        let outcome = self.outcomes.pop_front().unwrap_or_else(|| {
            Err(TestrunError::Other(anyhow::anyhow!(
                "FakeRunner has no outcome queued"
            )))
        });

        Box::pin(async move { outcome })
    }
}
