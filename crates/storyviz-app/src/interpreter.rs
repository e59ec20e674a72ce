//! The code interpreter boundary.
//!
//! One interpreter is shared by the whole process. It is loaded on first use;
//! callers that arrive while the load is in flight wait for that same load.
//! A failed load is not cached, so the next caller tries again.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::InterpreterConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum InterpreterError {
    #[error("failed to load interpreter: {0}")]
    #[diagnostic(
        code(storyviz::interpreter::load),
        help("install Python 3 or point STORYVIZ_PYTHON at an interpreter")
    )]
    Load(String),

    #[error("failed to run code: {0}")]
    #[diagnostic(code(storyviz::interpreter::run))]
    Run(String),

    #[error("`{0}` code cannot be run")]
    #[diagnostic(
        code(storyviz::interpreter::unsupported_language),
        help("only python blocks are executed")
    )]
    UnsupportedLanguage(String),

    #[error("invalid image data: {0}")]
    #[diagnostic(code(storyviz::interpreter::bad_image))]
    BadImage(String),
}

/// What a run printed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawOutput {
    pub stdout: String,
    pub stderr: String,
}

#[async_trait]
pub trait Interpreter: Send + Sync {
    async fn run(&self, code: &str) -> Result<RawOutput, InterpreterError>;
}

#[async_trait]
pub trait InterpreterLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn Interpreter>, InterpreterError>;
}

/// Lazily loaded, shared interpreter handle
pub struct InterpreterService {
    loader: Arc<dyn InterpreterLoader>,
    instance: OnceCell<Arc<dyn Interpreter>>,
}

impl InterpreterService {
    pub fn new(loader: Arc<dyn InterpreterLoader>) -> Self {
        Self {
            loader,
            instance: OnceCell::new(),
        }
    }

    /// The process-wide service, backed by [`ProcessInterpreterLoader`]
    pub fn global() -> &'static InterpreterService {
        static GLOBAL: OnceLock<InterpreterService> = OnceLock::new();
        GLOBAL.get_or_init(|| InterpreterService::new(Arc::new(ProcessInterpreterLoader::default())))
    }

    pub fn is_loaded(&self) -> bool {
        self.instance.initialized()
    }

    pub async fn get(&self) -> Result<Arc<dyn Interpreter>, InterpreterError> {
        let interpreter = self
            .instance
            .get_or_try_init(|| async {
                info!("loading interpreter");
                let loaded = self.loader.load().await;
                if let Err(e) = &loaded {
                    warn!(error = %e, "interpreter load failed");
                }
                loaded
            })
            .await?;
        Ok(Arc::clone(interpreter))
    }

    pub async fn run(&self, code: &str) -> Result<RawOutput, InterpreterError> {
        self.get().await?.run(code).await
    }
}

/// Runs code with an external Python executable
#[derive(Debug, Clone)]
pub struct ProcessInterpreter {
    program: PathBuf,
}

impl ProcessInterpreter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl Interpreter for ProcessInterpreter {
    async fn run(&self, code: &str) -> Result<RawOutput, InterpreterError> {
        debug!(program = %self.program.display(), bytes = code.len(), "running code");
        let output = Command::new(&self.program)
            .arg("-c")
            .arg(code)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| InterpreterError::Run(e.to_string()))?;
        Ok(RawOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Loads a [`ProcessInterpreter`] after checking the executable answers
/// `--version`
#[derive(Debug, Clone)]
pub struct ProcessInterpreterLoader {
    pub program: PathBuf,
}

impl Default for ProcessInterpreterLoader {
    fn default() -> Self {
        Self::new(&InterpreterConfig::from_env())
    }
}

impl ProcessInterpreterLoader {
    pub fn new(config: &InterpreterConfig) -> Self {
        Self {
            program: config.program.clone(),
        }
    }
}

#[async_trait]
impl InterpreterLoader for ProcessInterpreterLoader {
    async fn load(&self) -> Result<Arc<dyn Interpreter>, InterpreterError> {
        let version_check = Command::new(&self.program)
            .arg("--version")
            .output()
            .await
            .map_err(|e| InterpreterError::Load(format!("{}: {e}", self.program.display())))?;
        if !version_check.status.success() {
            return Err(InterpreterError::Load(format!(
                "{} exited with {}",
                self.program.display(),
                version_check.status
            )));
        }
        let version = String::from_utf8_lossy(&version_check.stdout);
        info!(version = %version.trim(), "interpreter ready");
        Ok(Arc::new(ProcessInterpreter::new(&self.program)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Echo;

    #[async_trait]
    impl Interpreter for Echo {
        async fn run(&self, code: &str) -> Result<RawOutput, InterpreterError> {
            Ok(RawOutput {
                stdout: code.to_string(),
                stderr: String::new(),
            })
        }
    }

    /// Fails the first `failures` loads, then succeeds slowly
    struct CountingLoader {
        loads: AtomicUsize,
        failures: usize,
    }

    #[async_trait]
    impl InterpreterLoader for CountingLoader {
        async fn load(&self) -> Result<Arc<dyn Interpreter>, InterpreterError> {
            let n = self.loads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(100)).await;
            if n < self.failures {
                return Err(InterpreterError::Load("not yet".into()));
            }
            Ok(Arc::new(Echo))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_load() {
        let loader = Arc::new(CountingLoader {
            loads: AtomicUsize::new(0),
            failures: 0,
        });
        let service = Arc::new(InterpreterService::new(loader.clone()));

        let handles: Vec<_> = (0..5)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.run(&format!("print({i})")).await })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let out = handle.await.unwrap().unwrap();
            assert_eq!(out.stdout, format!("print({i})"));
        }
        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
        assert!(service.is_loaded());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_load_is_retried() {
        let loader = Arc::new(CountingLoader {
            loads: AtomicUsize::new(0),
            failures: 1,
        });
        let service = InterpreterService::new(loader.clone());

        assert!(matches!(service.get().await, Err(InterpreterError::Load(_))));
        assert!(!service.is_loaded());
        assert!(service.get().await.is_ok());
        assert_eq!(loader.loads.load(Ordering::SeqCst), 2);
    }
}
