//! # Reconcile
//!
//! A framework for converging declared configuration resources against a
//! remote system.
//!
//! Heterogeneous resource kinds flow through one shared algorithm: each kind
//! implements the [`Handler`] contract (parse, validate, normalize, identity,
//! remote CRUD), handlers are registered into an immutable [`HandlerRegistry`],
//! and the [`Reconciler`] drives every declared [`Resource`] through the same
//! create-vs-update decision.
//!
//! ## Core concepts
//!
//! - **Resource**: a declared unit of configuration: identity, metadata, and
//!   an opaque spec payload.
//! - **Handler**: the per-kind adapter; the only place kind-specific knowledge
//!   lives.
//! - **Registry**: kind-to-handler mapping, read-only after configuration.
//! - **Reconciler**: validate, fetch remote state, create on `NotFound`,
//!   otherwise normalize both sides and update only on structural difference.
//!
//! ## Guarantees
//!
//! - Identity always derives from the declared name, never from spec content.
//! - Parse/Prepare/Unprepare are copy-producing; resources are never mutated
//!   in place.
//! - Batch runs are fail-isolated: one resource's failure never aborts the
//!   others, and per-resource outcomes are collected in input order.
//! - `NotFound`, `Conflict`, and transport failures stay distinguishable all
//!   the way up the stack ([`Error`] is a tagged enum, not a sentinel).

pub mod error;
pub mod handler;
pub mod reconciler;
pub mod registry;
pub mod resource;

pub use error::{Error, Result};
pub use handler::{Handler, SharedHandler};
pub use reconciler::{Outcome, ReconcileReport, ReconcileSummary, Reconciler};
pub use registry::HandlerRegistry;
pub use resource::{GENERAL_FOLDER, Resource};
