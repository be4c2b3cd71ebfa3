use crate::error::{Result, TriggerError};

use super::types::{PipelineRequest, PipelineVariable};

impl PipelineVariable {
    /// Parses a `KEY=VALUE` token, splitting on the first `=` only.
    pub fn parse(token: &str) -> Result<Self> {
        match token.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok(Self {
                key: key.to_string(),
                value: value.to_string(),
            }),
            _ => Err(TriggerError::InvalidVariableSyntax(token.to_string())),
        }
    }
}

impl PipelineRequest {
    /// Builds the request body for `ref_` from raw `KEY=VALUE` tokens.
    ///
    /// # Errors
    ///
    /// - [`TriggerError::InvalidRequest`] if `ref_` is empty
    /// - [`TriggerError::InvalidVariableSyntax`] naming the first malformed token
    pub fn build<S: AsRef<str>>(ref_: &str, tokens: &[S]) -> Result<Self> {
        if ref_.trim().is_empty() {
            return Err(TriggerError::InvalidRequest(
                "ref must not be empty".to_string(),
            ));
        }

        let variables = tokens
            .iter()
            .map(|token| PipelineVariable::parse(token.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            ref_: ref_.to_string(),
            variables,
        })
    }
}
