//! Structured "not done yet" signal for polled operations.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

/// Recoverable failure signaling that a polled operation has not reached a
/// terminal state yet.
///
/// Raising this from an operation run under [`Retry`](super::Retry) keeps
/// the retry loop going like any other failure; in addition, the driver
/// looks for this type in a failure's `source()` chain and merges its
/// diagnostic fields into the per-attempt log line. Retry-triggering and
/// structured logging stay orthogonal to each other.
///
/// # Examples
///
/// ```rust
/// use ctrlplane_core::retry::StillPending;
///
/// let pending = StillPending::new("waiting for job completion")
///     .with_field("job_id", "j-123")
///     .with_field("job_state", "in_progress");
///
/// assert_eq!(pending.message(), "waiting for job completion");
/// ```
#[derive(Debug, Clone)]
pub struct StillPending {
    message: String,
    fields: BTreeMap<String, String>,
}

impl StillPending {
    /// Create a signal with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Attach a diagnostic field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.fields.insert(key.into(), value.to_string());
        self
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The attached diagnostic fields, in key order.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

impl fmt::Display for StillPending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if !self.fields.is_empty() {
            let rendered: Vec<String> = self
                .fields
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            write!(f, " ({})", rendered.join(", "))?;
        }
        Ok(())
    }
}

impl Error for StillPending {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_fields() {
        let pending = StillPending::new("waiting for job completion");
        assert_eq!(pending.to_string(), "waiting for job completion");
    }

    #[test]
    fn test_display_renders_fields_in_key_order() {
        let pending = StillPending::new("waiting for job completion")
            .with_field("job_state", "in_progress")
            .with_field("job_id", "j-123");

        assert_eq!(
            pending.to_string(),
            "waiting for job completion (job_id=j-123, job_state=in_progress)"
        );
    }

    #[test]
    fn test_fields_accessor() {
        let pending = StillPending::new("pending").with_field("attempt", 3);

        assert_eq!(pending.fields().get("attempt").map(String::as_str), Some("3"));
    }
}
