//! Change detection
//!
//! Every importable record type lists the fields that take part in equality
//! (`Tracked::FIELDS`). A candidate built from a document is compared field
//! by field against the stored snapshot of the same identity.
//!
//! ## Guarantees
//!
//! - A record without a stored counterpart is always changed.
//! - References compare by URI, never by the referenced record's content.
//! - A listed field that a record cannot report counts as changed.

pub mod engine;
pub mod model;

pub use engine::{changed_fields, classify, will_change};
pub use model::{ChangeStatus, EntityChange, FieldValue, Tracked};
