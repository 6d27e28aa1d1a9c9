//! Prompt templating and the request payload sent to the generation backend.

use serde::{Deserialize, Serialize};

/// Event name the backend dispatches on.
pub const EVENT_NAME: &str = "chatgpt_request";

const PREAMBLE: &str = "Provide a detailed report to help resolve the following UK employment law query, \
referring to applicable legislation and best practices:";

/// Wrap a raw user query in the fixed instruction template.
///
/// The query is appended verbatim after a blank line.
pub fn build_prompt(query: &str) -> String {
    format!("{PREAMBLE}\n\n{query}")
}

/// Shape of the result the backend is asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    #[default]
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateParams {
    pub prompt: String,
    pub response_type: ResponseType,
}

/// One remote generation call: an event name plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub event_name: String,
    pub params: GenerateParams,
}

impl GenerateRequest {
    /// Build the plain-text report request for a user query.
    pub fn for_query(query: &str) -> Self {
        Self {
            event_name: EVENT_NAME.to_string(),
            params: GenerateParams {
                prompt: build_prompt(query),
                response_type: ResponseType::Text,
            },
        }
    }
}
