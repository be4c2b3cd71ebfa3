use std::fmt;
use std::path::Path;

use log::debug;

use crate::error::{Result, TriggerError};

/// A GitLab personal access token.
///
/// The value is never printed: `Debug` is redacted so tokens cannot leak
/// through log statements.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads a token from `path`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::TokenFile`] if the file cannot be read and
    /// [`TriggerError::Config`] if it contains only whitespace.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| TriggerError::TokenFile {
            path: path.to_path_buf(),
            source,
        })?;

        let token = contents.trim();
        if token.is_empty() {
            return Err(TriggerError::Config(format!(
                "Token file {} is empty",
                path.display()
            )));
        }

        debug!("Loaded token from {}", path.display());
        Ok(Self(token.to_string()))
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}
