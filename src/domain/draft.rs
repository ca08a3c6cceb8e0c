use crate::domain::errors::DomainError;
use serde::{Deserialize, Serialize};

/// Free-text description typed by the user, consumed by one successful submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionDraft {
    description: String,
}

impl SubmissionDraft {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn update(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn clear(&mut self) {
        self.description.clear();
    }

    /// Returns the trimmed description that goes on-chain.
    pub fn validated(&self) -> Result<String, DomainError> {
        let trimmed = self.description.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyInput);
        }
        Ok(trimmed.to_string())
    }
}
