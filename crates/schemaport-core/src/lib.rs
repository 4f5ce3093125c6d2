//! SchemaPort Core - import reconciliation for exchanged metadata schemas
//!
//! This crate provides:
//! - An owned XML element tree with tolerant value access and URI resolution
//! - Record models for conditions, the domain tree, option sets, question
//!   catalogs, tasks and views
//! - Field-table change detection and the decision ledger
//! - Structural validators and the `Store` persistence seam
//! - One reconciler per schema, driven by [`import::reconcile`]
//!
//! Persistence backends live in `schemaport-store`; document intake and
//! orchestration live in `schemaport-engine`.

pub mod diff;
pub mod errors;
pub mod import;
pub mod ledger;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod policy;
pub mod rules;
pub mod xml;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, ExResult, Result, SchemaPortError};
pub use import::{reconcile, ImportReport, Mode, Reconciliation, Schema};
pub use ledger::Ledger;
pub use model::{Entity, EntityKind};
pub use ops::{MemoryStore, Store};
pub use policy::ImportPolicy;
