use serde::Serialize;

use super::error::FilterError;

/// Page window applied to a listing. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
}

impl Pagination {
    /// Apply defaults and clamp `page_size` to `max_page_size`.
    pub fn resolve(
        page: Option<i64>,
        page_size: Option<i64>,
        default_page_size: i64,
        max_page_size: i64,
    ) -> Result<Self, FilterError> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(FilterError::InvalidPage(page));
        }

        let requested = page_size.unwrap_or(default_page_size);
        if requested < 1 {
            return Err(FilterError::InvalidPageSize(requested));
        }
        let page_size = if requested > max_page_size {
            tracing::debug!(
                "page_size {} exceeds max {}, capping to max",
                requested,
                max_page_size
            );
            max_page_size
        } else {
            requested
        };

        Ok(Self { page, page_size })
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn to_sql(&self) -> String {
        format!("LIMIT {} OFFSET {}", self.limit(), self.offset())
    }
}
