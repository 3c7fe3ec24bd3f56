//! Record list domain module.
//!
//! This module contains the state behind every record management screen
//! and the generic view model that orchestrates it.
//!
//! # Module Structure
//!
//! - `filter`: Filter and sort state (`FilterState`, `FilterKey`, `SortDirection`)
//! - `pagination`: Zero-based pagination state (`PaginationState`)
//! - `selection`: Bulk-action selection (`SelectionSet`)
//! - `query`: Wire shape of a reload (`ListQuery`)
//! - `notification`: Transient operator notifications
//! - `view_model`: The orchestrating `ListViewModel`
//!
//! # Usage
//!
//! ```ignore
//! use console_core::list::{ListViewModel, FilterKey};
//!
//! let vm = ListViewModel::new(EntityKind::Module.schema(), source, 10);
//! vm.set_filter(FilterKey::Search, "billing").await?;
//! ```

mod filter;
mod notification;
mod pagination;
mod query;
mod selection;
mod view_model;
#[cfg(test)]
mod view_model_test;

// Re-export public API
pub use filter::{FilterKey, FilterState, RESERVED_QUERY_KEYS, STATUS_ALL, SortDirection, SortState};
pub use notification::{Notification, NotificationLevel, NotificationQueue};
pub use pagination::{DEFAULT_PAGE_SIZE, PaginationState};
pub use query::ListQuery;
pub use selection::SelectionSet;
pub use view_model::{ListSnapshot, ListViewModel, LoadStatus, MutationOutcome};
