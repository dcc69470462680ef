use crate::llm::Provider;
use std::fmt;

/// Typed diagnostics for a failed LLM call. `stage` separates transport
/// failures ("http") from upstream-reported failures ("api") and response
/// decoding failures ("decode"), so callers never have to string-match.
#[derive(Debug, Clone)]
pub struct LlmApiError {
    pub provider: Provider,
    pub stage: &'static str,
    pub detail: String,
    pub raw_output: Option<String>,
}

impl fmt::Display for LlmApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LLM error (provider={:?}, stage={}): {}",
            self.provider, self.stage, self.detail
        )
    }
}

impl std::error::Error for LlmApiError {}
