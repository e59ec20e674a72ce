//! Host application for storyviz: asks the explanation backend a question
//! and lays the answer out as text, runnable code blocks and live diagrams.

pub mod capture;
pub mod category;
pub mod client;
pub mod code_block;
pub mod config;
pub mod interpreter;
pub mod live;
pub mod response;
pub mod session;

pub use category::Category;
pub use client::{ExplainBackend, ExplainError, HttpBackend};
pub use code_block::{BlockState, CodeBlock, RunOutcome};
pub use config::{ClientConfig, InterpreterConfig};
pub use interpreter::{Interpreter, InterpreterLoader, InterpreterService};
pub use live::LiveScheduler;
pub use response::{ExplainRequest, ExplainResponse, ResponsePart};
pub use session::{Section, Session};
