//! Reconciliation engine
//!
//! Drives the create-vs-update decision per resource: validate locally, query
//! remote state, then either create (identity absent) or normalize and push.
//! Batch reconciliation is fail-isolated: one resource's failure never aborts
//! the run.

use rayon::prelude::*;

use crate::error::Result;
use crate::registry::HandlerRegistry;
use crate::resource::Resource;

/// What reconciling a single resource did (or would do, for [`Reconciler::plan`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The identity was absent remotely and the resource was created.
    Created,
    /// The remote resource differed and was updated.
    Updated,
    /// Normalized local and remote state were structurally equal; no write.
    Unchanged,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Created => write!(f, "created"),
            Outcome::Updated => write!(f, "updated"),
            Outcome::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// Per-resource result of a batch run.
#[derive(Debug)]
pub struct ReconcileReport {
    /// Kind of the resource.
    pub kind: String,
    /// Canonical identity of the resource.
    pub uid: String,
    /// What happened, or why it failed.
    pub result: Result<Outcome>,
}

/// Tally of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl ReconcileSummary {
    /// Tally up a batch of reports.
    #[must_use]
    pub fn from_reports(reports: &[ReconcileReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            match &report.result {
                Ok(Outcome::Created) => summary.created += 1,
                Ok(Outcome::Updated) => summary.updated += 1,
                Ok(Outcome::Unchanged) => summary.unchanged += 1,
                Err(_) => summary.failed += 1,
            }
        }
        summary
    }

    /// Total resources processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.created + self.updated + self.unchanged + self.failed
    }

    /// Whether every resource converged.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Number of remote writes performed.
    #[must_use]
    pub fn total_changes(&self) -> usize {
        self.created + self.updated
    }
}

/// Drives resources through their handlers toward remote convergence.
pub struct Reconciler<'a> {
    registry: &'a HandlerRegistry,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler over a configured registry.
    #[must_use]
    pub fn new(registry: &'a HandlerRegistry) -> Self {
        Self { registry }
    }

    /// Decide what reconciling a resource would do, without writing.
    ///
    /// Runs the same lookup/validate/compare steps as [`Self::reconcile`] but
    /// stops short of the push, so `diff` and `status` share the decision
    /// logic with `apply`.
    pub fn plan(&self, resource: &Resource) -> Result<Outcome> {
        let handler = self.registry.get(&resource.kind)?;
        handler.validate(resource)?;

        match handler.get_remote(resource) {
            Err(e) if e.is_not_found() => Ok(Outcome::Created),
            Err(e) => Err(e),
            Ok(existing) => {
                if handler.unprepare(&existing) == handler.unprepare(resource) {
                    Ok(Outcome::Unchanged)
                } else {
                    Ok(Outcome::Updated)
                }
            }
        }
    }

    /// Converge a single resource.
    ///
    /// Validation runs before any remote call. An identity absent remotely is
    /// created; an existing one is compared after normalization and updated
    /// only when it differs. Updates push the `prepare`d resource so
    /// remote-only fields the API demands are merged in.
    pub fn reconcile(&self, resource: &Resource) -> Result<Outcome> {
        let handler = self.registry.get(&resource.kind)?;
        handler.validate(resource)?;
        let uid = handler.uid(resource);

        match handler.get_remote(resource) {
            Err(e) if e.is_not_found() => {
                log::debug!("{} '{}' absent remotely, creating", handler.kind(), uid);
                handler.add(resource)?;
                Ok(Outcome::Created)
            }
            Err(e) => Err(e),
            Ok(existing) => {
                if handler.unprepare(&existing) == handler.unprepare(resource) {
                    log::debug!("{} '{}' already converged", handler.kind(), uid);
                    return Ok(Outcome::Unchanged);
                }
                log::debug!("{} '{}' differs, updating", handler.kind(), uid);
                let prepared = handler.prepare(&existing, resource);
                handler.update(&existing, &prepared)?;
                Ok(Outcome::Updated)
            }
        }
    }

    /// Converge a batch, collecting one report per resource.
    ///
    /// Failures are isolated: every resource is attempted regardless of what
    /// happened to the others, and reports come back in input order. With
    /// `jobs > 1` resources are reconciled in parallel; identities must be
    /// unique within one batch (the engine does not serialize concurrent
    /// writers on the same identity).
    pub fn reconcile_all(&self, resources: &[Resource], jobs: usize) -> Vec<ReconcileReport> {
        if jobs <= 1 || resources.len() <= 1 {
            return resources.iter().map(|r| self.report(r)).collect();
        }

        match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(|| resources.par_iter().map(|r| self.report(r)).collect()),
            Err(e) => {
                log::warn!("thread pool unavailable ({}), reconciling sequentially", e);
                resources.iter().map(|r| self.report(r)).collect()
            }
        }
    }

    fn report(&self, resource: &Resource) -> ReconcileReport {
        ReconcileReport {
            kind: resource.kind.clone(),
            uid: resource.name().to_string(),
            result: self.reconcile(resource),
        }
    }
}
