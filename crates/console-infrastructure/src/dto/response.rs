//! Response envelopes of the admin API.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use console_core::ConsoleError;
use console_core::record::{ExportHandle, ListPage, PageMeta};

use super::record::RecordDto;

/// Either `{"success": .., "data": .., "message": ..}` or the bare payload.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped {
        #[serde(default)]
        success: Option<bool>,
        data: T,
        #[serde(default)]
        message: Option<String>,
    },
    Bare(T),
}

impl<T> Envelope<T> {
    /// Unwraps the payload; an explicit `"success": false` is a request
    /// failure even with a 2xx status.
    pub fn into_data(self) -> Result<T, ConsoleError> {
        match self {
            Envelope::Wrapped {
                success: Some(false),
                message,
                ..
            } => Err(ConsoleError::request(
                None,
                message.unwrap_or_else(|| "request was not successful".to_string()),
            )),
            Envelope::Wrapped { data, .. } => Ok(data),
            Envelope::Bare(data) => Ok(data),
        }
    }
}

/// Outcome flags of an enveloped response, read without the payload.
#[derive(Debug, Default, Deserialize)]
pub struct StatusDto {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusDto {
    /// Returns the failure carried by `"success": false`, if any.
    pub fn failure(&self) -> Option<ConsoleError> {
        (self.success == Some(false)).then(|| {
            ConsoleError::request(
                None,
                self.message
                    .clone()
                    .unwrap_or_else(|| "request was not successful".to_string()),
            )
        })
    }
}

/// Error body shape, when the server sends one.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(alias = "error")]
    pub message: String,
}

/// Pagination block of a list response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDto {
    #[serde(default, alias = "totalItems", alias = "totalCount")]
    pub total: u64,
    #[serde(default)]
    pub total_pages: Option<u64>,
    #[serde(default, alias = "hasNextPage")]
    pub has_next: bool,
    #[serde(default, alias = "hasPrevPage")]
    pub has_prev: bool,
}

/// List response of any record resource
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponseDto {
    #[serde(
        alias = "items",
        alias = "modules",
        alias = "organizations",
        alias = "templates"
    )]
    pub records: Vec<RecordDto>,
    #[serde(default)]
    pub pagination: PaginationDto,
    #[serde(default)]
    pub summary: Option<JsonValue>,
}

impl ListResponseDto {
    /// Converts to a domain page. `limit` fills in `totalPages` when the
    /// server leaves it out.
    pub fn into_page(self, limit: u64) -> ListPage {
        let total_pages = self
            .pagination
            .total_pages
            .unwrap_or_else(|| self.pagination.total.div_ceil(limit.max(1)));
        ListPage {
            records: self.records.into_iter().map(Into::into).collect(),
            pagination: PageMeta {
                total: self.pagination.total,
                total_pages,
                has_next: self.pagination.has_next,
                has_prev: self.pagination.has_prev,
            },
            summary: self.summary,
        }
    }
}

/// Export response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDto {
    #[serde(alias = "url")]
    pub download_url: String,
}

impl From<ExportDto> for ExportHandle {
    fn from(dto: ExportDto) -> Self {
        ExportHandle {
            download_url: dto.download_url,
        }
    }
}
