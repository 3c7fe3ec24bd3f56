//! Record domain module.
//!
//! # Module Structure
//!
//! - `model`: Server-owned record snapshots (`Record`, `FieldValue`, `RecordStatus`)
//! - `schema`: Per-entity contracts (`EntityKind`, `EntitySchema`)
//! - `source`: Source traits the view models consume (`RecordSource`, `LookupSource`)
//!
//! # Usage
//!
//! ```ignore
//! use console_core::record::{EntityKind, Record, RecordSource};
//! ```

mod model;
mod schema;
mod source;

// Re-export public API
pub use model::{FieldValue, Record, RecordFields, RecordStatus};
pub use schema::{EntityKind, EntitySchema};
pub use source::{ExportFormat, ExportHandle, ListPage, LookupSource, PageMeta, RecordSource};
