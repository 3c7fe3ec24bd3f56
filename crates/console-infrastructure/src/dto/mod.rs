//! Data transfer objects for the admin REST API.

pub mod lookup;
pub mod record;
pub mod response;

pub use lookup::LookupItemDto;
pub use record::{IdDto, RecordDto};
pub use response::{Envelope, ErrorBody, ExportDto, ListResponseDto, PaginationDto, StatusDto};
