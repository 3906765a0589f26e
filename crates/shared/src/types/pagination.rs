//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.limit)
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Current page number.
    pub current_page: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of items across all pages.
    pub total_elements: u64,
    /// Items per page.
    pub limit: u32,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let total_pages = if total_elements == 0 {
            1
        } else {
            u32::try_from(total_elements.div_ceil(u64::from(request.limit.max(1))))
                .unwrap_or(u32::MAX)
        };

        Self {
            data,
            meta: PageMeta {
                current_page: request.page,
                total_pages,
                total_elements,
                limit: request.limit,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_page_request_default() {
        let request = PageRequest::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, 10);
    }

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(3, 25, 50)]
    fn test_page_request_offset(#[case] page: u32, #[case] limit: u32, #[case] expected: u64) {
        let request = PageRequest { page, limit };
        assert_eq!(request.offset(), expected);
    }

    #[test]
    fn test_page_response_meta() {
        let response = PageResponse::new(vec![1, 2, 3], &PageRequest { page: 1, limit: 10 }, 23);
        assert_eq!(response.meta.current_page, 1);
        assert_eq!(response.meta.total_pages, 3);
        assert_eq!(response.meta.total_elements, 23);
        assert_eq!(response.meta.limit, 10);
    }

    #[test]
    fn test_page_response_empty_total_is_one_page() {
        let response: PageResponse<u8> =
            PageResponse::new(vec![], &PageRequest { page: 1, limit: 10 }, 0);
        assert_eq!(response.meta.total_pages, 1);
        assert_eq!(response.meta.total_elements, 0);
    }

    #[test]
    fn test_page_response_exact_multiple() {
        let response: PageResponse<u8> =
            PageResponse::new(vec![], &PageRequest { page: 2, limit: 10 }, 20);
        assert_eq!(response.meta.total_pages, 2);
    }
}
