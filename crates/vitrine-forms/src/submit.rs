// File: src/submit.rs
// Purpose: Submission seam between the orchestrator and the outside world

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::SubmitError;

/// Field values handed to the submit action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    pub form: String,
    /// Underlying values (digits only for masked fields)
    pub values: BTreeMap<String, String>,
    /// Values as displayed
    pub display: BTreeMap<String, String>,
}

impl FormSnapshot {
    pub fn get(&self, id: &str) -> Option<&str> {
        self.values.get(id).map(String::as_str)
    }
}

/// External action run once a form passes validation.
///
/// The orchestrator awaits its completion before accepting another
/// submission.
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, form: &FormSnapshot) -> Result<(), SubmitError>;
}

/// Accepts every submission
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSubmitter;

#[async_trait]
impl Submitter for NoopSubmitter {
    async fn submit(&self, _form: &FormSnapshot) -> Result<(), SubmitError> {
        Ok(())
    }
}
