//! Suggestion Models

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestError {
    #[error("describe your project before asking for suggestions")]
    EmptyInput,

    #[error("the uploaded file could not be read as text")]
    UnreadableFile,

    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("suggestion service failed: {0}")]
    Service(String),
}

/// Body of `POST /suggestions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestToolsInput {
    /// Project description, typed or extracted from a document.
    pub document_content: String,
}

/// Schema the generated reply must match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestToolsOutput {
    pub suggested_tools: Vec<String>,
}
