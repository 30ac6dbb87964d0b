//! Offset pagination.

use crate::shared::error::AppError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// A 1-based page of `limit` items.
///
/// No upper bound is placed on `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    /// Build a pagination from positive page and limit values.
    pub fn new(page: u32, limit: u32) -> Result<Self, AppError> {
        if page == 0 {
            return Err(AppError::invalid_field("page", "Page must be a positive integer"));
        }
        if limit == 0 {
            return Err(AppError::invalid_field("limit", "Limit must be a positive integer"));
        }
        Ok(Self { page, limit })
    }

    /// Build from optional request values, falling back to the defaults.
    pub fn from_query(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Result<Self, AppError> {
        Self::new(page.unwrap_or(DEFAULT_PAGE), limit.unwrap_or(default_limit))
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Slice an already ordered sequence down to this page.
    pub fn apply<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(usize::try_from(self.offset()).unwrap_or(usize::MAX))
            .take(self.limit as usize)
            .collect()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        assert_eq!(Pagination::new(1, 10).unwrap().offset(), 0);
        assert_eq!(Pagination::new(2, 10).unwrap().offset(), 10);
        assert_eq!(Pagination::new(4, 25).unwrap().offset(), 75);
    }

    #[test]
    fn test_zero_values_rejected() {
        assert!(Pagination::new(0, 10).is_err());
        assert!(Pagination::new(1, 0).is_err());
    }

    #[test]
    fn test_apply_second_and_out_of_range_pages() {
        let items: Vec<u32> = (0..25).collect();

        let second = Pagination::new(2, 10).unwrap().apply(items.clone());
        assert_eq!(second, (10..20).collect::<Vec<_>>());

        let beyond = Pagination::new(4, 10).unwrap().apply(items);
        assert!(beyond.is_empty());
    }

    #[test]
    fn test_from_query_defaults() {
        let p = Pagination::from_query(None, None, DEFAULT_LIMIT).unwrap();
        assert_eq!(p, Pagination::default());
    }
}
