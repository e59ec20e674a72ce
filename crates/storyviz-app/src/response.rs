//! Wire types for the explanation endpoint.
//!
//! Parsing is per part: a part that cannot be understood is logged and
//! dropped, the rest of the answer survives.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use storyviz::DiagramConfig;
use tracing::warn;

use crate::category::Category;
use crate::client::ExplainError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainRequest {
    pub question: String,
    pub category: Option<Category>,
}

/// One piece of an answer, in display order
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePart {
    Text { content: String },
    Code { language: String, code: String },
    Visual(DiagramConfig),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExplainResponse {
    pub response: Vec<ResponsePart>,
}

/// A part as it appears on the wire, before the diagram config is checked
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WirePart {
    Text {
        content: String,
    },
    Code {
        language: Option<String>,
        code: String,
    },
    Visual {
        #[serde(rename = "vizConfig")]
        viz_config: Value,
    },
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    response: Vec<Value>,
}

impl ExplainResponse {
    /// Read `{ "response": [ ...parts ] }`. Only a body without a `response`
    /// array is an error; bad parts are skipped.
    pub fn from_json(body: &Value) -> Result<Self, ExplainError> {
        let wire =
            WireResponse::deserialize(body).map_err(|e| ExplainError::Malformed(e.to_string()))?;

        let response = wire
            .response
            .iter()
            .enumerate()
            .filter_map(|(i, part)| match ResponsePart::from_json(part) {
                Ok(part) => Some(part),
                Err(reason) => {
                    warn!(index = i, %reason, "skipping response part");
                    None
                }
            })
            .collect();
        Ok(Self { response })
    }

    pub fn parse(body: &str) -> Result<Self, ExplainError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| ExplainError::Malformed(e.to_string()))?;
        Self::from_json(&value)
    }

    /// The answer shown when the request itself failed
    pub fn apology() -> Self {
        Self {
            response: vec![ResponsePart::Text {
                content: "Sorry, something went wrong. Please try again.".into(),
            }],
        }
    }
}

impl ResponsePart {
    fn from_json(part: &Value) -> Result<Self, String> {
        match WirePart::deserialize(part).map_err(|e| e.to_string())? {
            WirePart::Text { content } => Ok(ResponsePart::Text { content }),
            WirePart::Code { language, code } => Ok(ResponsePart::Code {
                language: language.unwrap_or_else(|| "python".to_string()),
                code,
            }),
            WirePart::Visual { viz_config } => DiagramConfig::from_json(&viz_config)
                .map(ResponsePart::Visual)
                .map_err(|e| e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storyviz::DiagramKind;

    #[test]
    fn request_serializes_category_name() {
        let req = ExplainRequest {
            question: "Why is the sky blue?".into(),
            category: Some(Category::Physics),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "question": "Why is the sky blue?", "category": "Physics" })
        );
        let req = ExplainRequest {
            question: "q".into(),
            category: None,
        };
        assert_eq!(serde_json::to_value(&req).unwrap()["category"], Value::Null);
    }

    #[test]
    fn bad_parts_are_skipped() {
        let body = json!({
            "response": [
                { "type": "text", "content": "Intro" },
                { "type": "visual" },
                { "type": "visual", "vizConfig": { "title": "no type" } },
                { "type": "code", "language": "python" },
                { "type": "code", "language": null, "code": "print(1)" },
                { "type": "hologram", "content": "?" },
                { "type": "visual", "vizConfig": { "type": "orbit" } }
            ]
        });
        let parsed = ExplainResponse::from_json(&body).unwrap();
        assert_eq!(parsed.response.len(), 3);
        assert!(matches!(&parsed.response[0], ResponsePart::Text { content } if content == "Intro"));
        assert!(
            matches!(&parsed.response[1], ResponsePart::Code { language, .. } if language == "python")
        );
        assert!(matches!(&parsed.response[2], ResponsePart::Visual(c) if c.kind == DiagramKind::Orbit));
    }

    #[test]
    fn missing_response_is_malformed() {
        assert!(matches!(
            ExplainResponse::from_json(&json!({ "answer": [] })),
            Err(ExplainError::Malformed(_))
        ));
        assert!(matches!(
            ExplainResponse::parse("<html>"),
            Err(ExplainError::Malformed(_))
        ));
    }
}
