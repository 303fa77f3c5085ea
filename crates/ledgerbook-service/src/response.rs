//! # Response Envelopes
//!
//! What handlers return on success. Failures are `Err(ServiceError)`.
//!
//! ```text
//! Add     → CommandResponse { data, message, status_code: 201 }
//! Change  → CommandResponse { data, message, status_code: 200 }
//! Remove  → CommandResponse { data: id, message, status_code: 200 }
//! GetById → QueryResponse   { data, status_code: 200 }
//! Find    → QueryResponse   { data: PagedResult, status_code: 200 | 204 }
//! ```

use ledgerbook_core::{Page, PageRequest};
use serde::Serialize;

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_NO_CONTENT: u16 = 204;

/// Result of a successful command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse<T> {
    pub data: T,
    pub message: String,
    pub status_code: u16,
}

impl<T> CommandResponse<T> {
    pub fn created(data: T, message: impl Into<String>) -> Self {
        CommandResponse {
            data,
            message: message.into(),
            status_code: STATUS_CREATED,
        }
    }

    pub fn ok(data: T, message: impl Into<String>) -> Self {
        CommandResponse {
            data,
            message: message.into(),
            status_code: STATUS_OK,
        }
    }
}

/// Result of a successful query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse<T> {
    pub data: T,
    pub status_code: u16,
}

impl<T> QueryResponse<T> {
    pub fn ok(data: T) -> Self {
        QueryResponse {
            data,
            status_code: STATUS_OK,
        }
    }
}

impl<T> QueryResponse<PagedResult<T>> {
    /// 204 when the page holds nothing, 200 otherwise.
    pub fn page(data: PagedResult<T>) -> Self {
        let status_code = if data.items.is_empty() {
            STATUS_NO_CONTENT
        } else {
            STATUS_OK
        };
        QueryResponse { data, status_code }
    }
}

/// One page of DTOs plus the numbers a client needs to navigate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl<T> PagedResult<T> {
    pub fn from_page<E>(page: Page<E>, request: &PageRequest) -> Self
    where
        T: From<E>,
    {
        let total_pages = page.total_pages(request.page_size);
        let page = page.map(T::from);

        PagedResult {
            items: page.items,
            total_count: page.total_count,
            page: request.page,
            page_size: request.page_size,
            total_pages,
        }
    }
}
