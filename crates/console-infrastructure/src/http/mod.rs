//! REST bindings of the record and lookup sources.

mod client;
mod lookup_source;
mod record_source;

pub use client::{ApiClient, map_http_error};
pub use lookup_source::HttpLookupSource;
pub use record_source::HttpRecordSource;
