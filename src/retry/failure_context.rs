use std::collections::BTreeMap;

/// Why the processing of a message failed: the id of every executor that failed, mapped to
/// its error message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureContext {
    pub executors: BTreeMap<String, String>,
}

impl FailureContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the failure of an executor.
    #[must_use]
    pub fn with_failure(mut self, executor: impl Into<String>, error: impl ToString) -> Self {
        self.executors.insert(executor.into(), error.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }

    /// The ids of the failed executors, comma-separated.
    pub fn failed_in(&self) -> String {
        self.executors
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}
