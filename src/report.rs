//! Per-entity outcome collection for a pipeline run.

use crate::error::FailureKind;
use log::{error, info, warn};
use std::error::Error;
use std::fmt;

/// One entity that could not be processed.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityFailure {
    pub entity: String,
    pub kind: FailureKind,
    /// The error and its sources, joined with `": "`.
    pub message: String,
}

/// Outcomes of a run over a collection of entities (cities, datasets, charts).
///
/// Failures are collected here instead of aborting the run; the report is logged
/// once at the end.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pipeline: String,
    completed: Vec<String>,
    failures: Vec<EntityFailure>,
}

impl RunReport {
    pub fn new(pipeline: impl Into<String>) -> Self {
        Self {
            pipeline: pipeline.into(),
            ..Self::default()
        }
    }

    pub fn record_success(&mut self, entity: &str) {
        info!("[{}] {} done", self.pipeline, entity);
        self.completed.push(entity.to_string());
    }

    pub fn record_failure(&mut self, entity: &str, kind: FailureKind, err: &dyn Error) {
        let message = error_chain(err);
        error!("[{}] {} failed ({}): {}", self.pipeline, entity, kind, message);
        self.failures.push(EntityFailure {
            entity: entity.to_string(),
            kind,
            message,
        });
    }

    pub fn completed(&self) -> &[String] {
        &self.completed
    }

    pub fn failures(&self) -> &[EntityFailure] {
        &self.failures
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn log_summary(&self) {
        if self.is_clean() {
            info!("{}", self);
        } else {
            warn!("{}", self);
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} run: {} completed, {} failed",
            self.pipeline,
            self.completed.len(),
            self.failures.len()
        )?;
        for failure in &self.failures {
            write!(
                f,
                "\n  - {} [{}]: {}",
                failure.entity, failure.kind, failure.message
            )?;
        }
        Ok(())
    }
}

pub(crate) fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
