//! One question/answer exchange and its laid-out sections

use std::sync::Arc;

use storyviz::DiagramInstance;
use tracing::{info, warn};

use crate::category::Category;
use crate::client::{ExplainBackend, ExplainError};
use crate::code_block::CodeBlock;
use crate::response::{ExplainRequest, ExplainResponse, ResponsePart};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

pub type Paragraph = Vec<Span>;

#[derive(Debug, Clone)]
pub enum Section {
    Text(Vec<Paragraph>),
    Code(CodeBlock),
    Visual(DiagramInstance),
}

impl Section {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Section::Text(_) => "text",
            Section::Code(_) => "code",
            Section::Visual(_) => "visual",
        }
    }
}

pub struct Session {
    backend: Arc<dyn ExplainBackend>,
    question: Option<String>,
    sections: Vec<Section>,
}

impl Session {
    pub fn new(backend: Arc<dyn ExplainBackend>) -> Self {
        Self {
            backend,
            question: None,
            sections: Vec::new(),
        }
    }

    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Ask a question and replace the current answer with the reply.
    ///
    /// Blank questions are ignored. A failed request still produces an
    /// answer: a single apology paragraph.
    pub async fn ask(&mut self, question: &str, category: Option<Category>) -> &[Section] {
        let question = question.trim();
        if question.is_empty() {
            return &self.sections;
        }

        let request = ExplainRequest {
            question: question.to_string(),
            category,
        };
        let backend = Arc::clone(&self.backend);
        let result = tokio::task::spawn_blocking(move || backend.explain(&request))
            .await
            .unwrap_or_else(|e| Err(ExplainError::Transport(e.to_string())));

        let response = result.unwrap_or_else(|e| {
            warn!(error = %e, "explain request failed");
            ExplainResponse::apology()
        });

        for section in &self.sections {
            if let Section::Code(block) = section {
                block.unmount();
            }
        }
        self.question = Some(question.to_string());
        self.sections = layout(response);
        info!(sections = self.sections.len(), "answer laid out");
        &self.sections
    }
}

fn layout(response: ExplainResponse) -> Vec<Section> {
    response
        .response
        .into_iter()
        .map(|part| match part {
            ResponsePart::Text { content } => Section::Text(paragraphs(&content)),
            ResponsePart::Code { language, code } => Section::Code(CodeBlock::new(language, code)),
            ResponsePart::Visual(config) => Section::Visual(DiagramInstance::new(config)),
        })
        .collect()
}

/// Split on blank lines; `**x**` marks bold spans
pub fn paragraphs(content: &str) -> Vec<Paragraph> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(spans(&current.join("\n")));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(spans(&current.join("\n")));
    }
    out
}

fn spans(text: &str) -> Paragraph {
    text.split("**")
        .enumerate()
        .filter(|(_, piece)| !piece.is_empty())
        .map(|(i, piece)| Span {
            text: piece.to_string(),
            bold: i % 2 == 1,
        })
        .collect()
}
