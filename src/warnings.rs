/**
Warnings raised while reading annotations. They are not errors: the offending line is skipped, or
an empty set of annotations is returned. Where the warnings go is decided by the `WarningSink`
given to the parser.
*/
use std::fmt::Display;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The `TAG START END` field of an entity line does not have three parts.
    MalformedLine {
        file_id: String,
        entity: String,
        line_number: usize,
        line: String,
    },
    /// The document has no annotation for the requested entity.
    NoAnnotations { file_id: String, entity: String },
}

impl Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedLine {
                file_id,
                entity,
                line_number,
                line,
            } => write!(
                f,
                "Skipping line {} ({}) from file_id {} for entity {}",
                line_number, line, file_id, entity
            ),
            Self::NoAnnotations { file_id, entity } => {
                write!(f, "File {} has 0 annotations for type {}", file_id, entity)
            }
        }
    }
}

/// Receiver of the warnings. Implementations must be shareable between threads, as documents can
/// be converted in parallel.
pub trait WarningSink: Send + Sync {
    fn warn(&self, warning: &Warning);
}

/// Emits every warning as a `tracing` event at the `WARN` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingWarnings;

impl WarningSink for TracingWarnings {
    fn warn(&self, warning: &Warning) {
        match warning {
            Warning::MalformedLine {
                file_id,
                entity,
                line_number,
                ..
            } => tracing::warn!(%file_id, %entity, line = line_number, "{}", warning),
            Warning::NoAnnotations { file_id, entity } => {
                tracing::warn!(%file_id, %entity, "{}", warning)
            }
        }
    }
}

/// Drops every warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentWarnings;

impl WarningSink for SilentWarnings {
    fn warn(&self, _warning: &Warning) {}
}

/// Keeps the warnings in memory, in the order they were raised.
#[derive(Debug, Default)]
pub struct CollectedWarnings(Mutex<Vec<Warning>>);

impl CollectedWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the warnings collected so far.
    pub fn take(&self) -> Vec<Warning> {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *guard)
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl WarningSink for CollectedWarnings {
    fn warn(&self, warning: &Warning) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(warning.clone())
    }
}

impl<S: WarningSink + ?Sized> WarningSink for Arc<S> {
    fn warn(&self, warning: &Warning) {
        (**self).warn(warning)
    }
}

impl<S: WarningSink + ?Sized> WarningSink for &S {
    fn warn(&self, warning: &Warning) {
        (**self).warn(warning)
    }
}
