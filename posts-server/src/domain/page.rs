use serde::Serialize;

use super::error::DomainError;

/// 1-based offset pagination input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub(crate) const DEFAULT_PAGE: u32 = 1;
    pub(crate) const DEFAULT_LIMIT: u32 = 10;

    pub(crate) fn new(page: u32, limit: u32) -> Result<Self, DomainError> {
        if page == 0 {
            return Err(DomainError::Validation {
                field: "page",
                message: "must be >= 1",
            });
        }
        if limit == 0 {
            return Err(DomainError::Validation {
                field: "limit",
                message: "must be >= 1",
            });
        }
        Ok(Self { page, limit })
    }

    pub(crate) fn page(&self) -> u32 {
        self.page
    }

    pub(crate) fn limit(&self) -> u32 {
        self.limit
    }

    pub(crate) fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageMeta {
    pub(crate) total_items: u64,
    pub(crate) item_count: u64,
    pub(crate) items_per_page: u32,
    pub(crate) total_pages: u64,
    pub(crate) current_page: u32,
}

impl PageMeta {
    /// `current_page` echoes the request even when it lies past the last page.
    pub(crate) fn new(request: PageRequest, total_items: u64, item_count: usize) -> Self {
        Self {
            total_items,
            item_count: item_count as u64,
            items_per_page: request.limit,
            total_pages: total_items.div_ceil(u64::from(request.limit)),
            current_page: request.page,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Page<T> {
    pub(crate) items: Vec<T>,
    pub(crate) meta: PageMeta,
}
