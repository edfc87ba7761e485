//! Resource release.
//!
//! Teardown walks every owned resource in reverse acquisition order. A failure
//! in one release is logged and recorded, then the walk moves on; one stuck
//! resource must not leak everything acquired before it.

use thiserror::Error;

/// Failure while releasing a resource.
#[derive(Debug, Error)]
pub enum TeardownError {
    /// The backend refused to free a handle.
    #[error("failed to release {resource}: {reason}")]
    Release {
        /// Resource name.
        resource: String,
        /// Backend message.
        reason: String,
    },

    /// Writing state on shutdown failed.
    #[error("failed to persist {what}: {source}")]
    Persist {
        /// What was being written.
        what: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for teardown operations.
pub type TeardownResult<T> = Result<T, TeardownError>;

/// Something owned by the session that must be released exactly once.
pub trait Disposable {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Releases the resource.
    fn dispose(&mut self) -> TeardownResult<()>;
}

/// Outcome of a teardown walk.
#[derive(Debug, Default)]
pub struct TeardownReport {
    /// Names of resources released cleanly, in release order.
    pub released: Vec<String>,
    /// Resources whose release failed.
    pub failures: Vec<(String, TeardownError)>,
}

impl TeardownReport {
    /// True if every resource released cleanly.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Folds another report into this one.
    pub fn merge(&mut self, other: TeardownReport) {
        self.released.extend(other.released);
        self.failures.extend(other.failures);
    }
}

/// Releases `resources` last-to-first, continuing past failures.
pub fn release_all(resources: &mut [&mut dyn Disposable]) -> TeardownReport {
    let mut report = TeardownReport::default();
    for resource in resources.iter_mut().rev() {
        let name = resource.name().to_owned();
        match resource.dispose() {
            Ok(()) => {
                tracing::debug!("released {}", name);
                report.released.push(name);
            }
            Err(e) => {
                tracing::warn!("teardown of {} failed: {}", name, e);
                report.failures.push((name, e));
            }
        }
    }
    report
}
