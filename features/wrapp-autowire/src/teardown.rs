use std::sync::Arc;

use thiserror::Error;

use crate::{
    diagnostics::Severity,
    errors::WireError,
    lifecycle::Cleanup,
    types::{DynError, TypeInfo},
    wirer::{WireState, Wirer},
};

/// Which teardown step of an instance failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupStage {
    /// The instance's own [Cleanup] capability
    Cleanup,
    /// The release function registered with its recipe
    Release,
}

#[derive(Error, Debug, Clone)]
#[error("{stage:?} of '{product}' failed - error: {error}")]
pub struct CleanupFailure {
    pub product: TypeInfo,
    pub stage: CleanupStage,
    pub error: Arc<DynError>,
}

/// Every failure of one teardown pass, the first one is the primary error
#[derive(Error, Debug, Clone)]
pub struct CleanupErrors {
    pub primary: CleanupFailure,
    pub suppressed: Vec<CleanupFailure>,
}

impl CleanupErrors {
    fn collect(mut failures: Vec<CleanupFailure>) -> Option<Self> {
        if failures.is_empty() {
            return None;
        }

        let primary = failures.remove(0);
        Some(CleanupErrors {
            primary,
            suppressed: failures,
        })
    }

    /// All failures in the order they happened
    pub fn iter(&self) -> impl Iterator<Item = &CleanupFailure> {
        std::iter::once(&self.primary).chain(self.suppressed.iter())
    }

    pub fn len(&self) -> usize {
        1 + self.suppressed.len()
    }
}

impl std::fmt::Display for CleanupErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut display = Vec::new();
        display.push("Teardown had one or more errors:".to_string());
        for failure in self.iter() {
            display.push(format!("- {}", failure));
        }
        f.write_str(&display.join("\n"))
    }
}

impl Wirer {
    /// Tears down every stored instance, most recently created first
    ///
    /// Runs the [Cleanup] capability and then the recipe's release function of each
    /// instance. Failures never stop the pass, they are collected and reported to the
    /// diagnostic sink as one [WireError::CleanupFailed]. Afterwards all recipes are
    /// dropped and the session is idle again.
    pub fn cleanup(&mut self) {
        tracing::debug!("Tearing down {} instances", self.store.count());

        let mut failures = Vec::new();
        while let Some(record) = self.store.pop() {
            let product = record.instance.info();

            if let Some(cleanable) = record.instance.view::<dyn Cleanup>() {
                if let Err(error) = cleanable.cleanup() {
                    failures.push(CleanupFailure {
                        product,
                        stage: CleanupStage::Cleanup,
                        error: Arc::new(error),
                    });
                }
            }

            let release = record
                .produced_by
                .as_ref()
                .and_then(|recipe| recipe.release.as_ref());
            if let Some(release) = release {
                if let Err(error) = release(&record.instance) {
                    failures.push(CleanupFailure {
                        product,
                        stage: CleanupStage::Release,
                        error: Arc::new(error),
                    });
                }
            }
        }

        self.registry.clear();
        self.notify_existing.clear();
        self.in_progress.clear();
        self.state = WireState::Idle;

        if let Some(errors) = CleanupErrors::collect(failures) {
            self.report(Severity::Error, &WireError::CleanupFailed(errors));
        }
    }
}
