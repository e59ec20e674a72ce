use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::capture::CodeOutput;
use crate::interpreter::{InterpreterError, InterpreterService};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BlockState {
    #[default]
    Idle,
    Running,
    Finished(CodeOutput),
    /// The interpreter could not be loaded or the run itself failed
    Failed(String),
}

/// What happened to a call to [`CodeBlock::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Applied,
    /// The block was unmounted or re-run while this call was in flight
    Stale,
    NotRunnable,
}

/// A code snippet from an answer, runnable when it is Python.
///
/// Clones share state, so a clone can be handed to a spawned task while the
/// section keeps the original.
#[derive(Debug, Clone)]
pub struct CodeBlock {
    language: String,
    code: String,
    shared: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<BlockState>,
    generation: AtomicU64,
    unmounted: AtomicBool,
}

impl CodeBlock {
    pub fn new(language: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            code: code.into(),
            shared: Arc::default(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn is_runnable(&self) -> bool {
        self.ensure_runnable().is_ok()
    }

    pub fn ensure_runnable(&self) -> Result<(), InterpreterError> {
        if self.language.eq_ignore_ascii_case("python") {
            Ok(())
        } else {
            Err(InterpreterError::UnsupportedLanguage(self.language.clone()))
        }
    }

    pub fn state(&self) -> BlockState {
        self.lock().clone()
    }

    /// Stop accepting results; in-flight runs are dropped when they land
    pub fn unmount(&self) {
        self.shared.unmounted.store(true, Ordering::SeqCst);
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub async fn run(&self, service: &InterpreterService) -> RunOutcome {
        if let Err(e) = self.ensure_runnable() {
            debug!(error = %e, "not running code block");
            return RunOutcome::NotRunnable;
        }
        if self.shared.unmounted.load(Ordering::SeqCst) {
            return RunOutcome::NotRunnable;
        }

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.lock() = BlockState::Running;

        let next = match service.run(&self.code).await {
            Ok(raw) => BlockState::Finished(CodeOutput::from_raw(&raw)),
            Err(e) => BlockState::Failed(e.to_string()),
        };

        let mut state = self.lock();
        if self.shared.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "dropping stale code result");
            return RunOutcome::Stale;
        }
        *state = next;
        RunOutcome::Applied
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BlockState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{Interpreter, InterpreterError, InterpreterLoader, RawOutput};
    use async_trait::async_trait;
    use std::time::Duration;

    struct Slow;

    #[async_trait]
    impl Interpreter for Slow {
        async fn run(&self, code: &str) -> Result<RawOutput, InterpreterError> {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(RawOutput {
                stdout: format!("ran {code}"),
                stderr: String::new(),
            })
        }
    }

    struct Loader(bool);

    #[async_trait]
    impl InterpreterLoader for Loader {
        async fn load(&self) -> Result<Arc<dyn Interpreter>, InterpreterError> {
            if self.0 {
                Ok(Arc::new(Slow))
            } else {
                Err(InterpreterError::Load("no python".into()))
            }
        }
    }

    fn service(ok: bool) -> Arc<InterpreterService> {
        Arc::new(InterpreterService::new(Arc::new(Loader(ok))))
    }

    #[tokio::test(start_paused = true)]
    async fn result_is_applied() {
        let block = CodeBlock::new("python", "1+1");
        assert_eq!(block.run(&service(true)).await, RunOutcome::Applied);
        assert_eq!(block.state(), BlockState::Finished(CodeOutput::Text("ran 1+1".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_drops_late_result() {
        let block = CodeBlock::new("python", "slow()");
        let svc = service(true);
        let task = {
            let block = block.clone();
            let svc = Arc::clone(&svc);
            tokio::spawn(async move { block.run(&svc).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(block.state(), BlockState::Running);
        block.unmount();

        assert_eq!(task.await.unwrap(), RunOutcome::Stale);
        assert_eq!(block.state(), BlockState::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn rerun_supersedes_earlier_call() {
        let block = CodeBlock::new("python", "x");
        let svc = service(true);
        let first = {
            let block = block.clone();
            let svc = Arc::clone(&svc);
            tokio::spawn(async move { block.run(&svc).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = block.run(&svc).await;

        assert_eq!(first.await.unwrap(), RunOutcome::Stale);
        assert_eq!(second, RunOutcome::Applied);
    }

    #[tokio::test]
    async fn load_failure_is_inline() {
        let block = CodeBlock::new("Python", "x");
        assert_eq!(block.run(&service(false)).await, RunOutcome::Applied);
        assert!(matches!(block.state(), BlockState::Failed(msg) if msg.contains("no python")));
    }

    #[tokio::test]
    async fn other_languages_do_not_run() {
        let block = CodeBlock::new("javascript", "1");
        assert_eq!(block.run(&service(true)).await, RunOutcome::NotRunnable);
        assert_eq!(block.state(), BlockState::Idle);
    }
}
