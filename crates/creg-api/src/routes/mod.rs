//! HTTP route modules. Each module exposes a `router()` that is merged
//! into the application router in `lib.rs`.

use serde::Deserialize;
use utoipa::ToSchema;

pub mod courses;
pub mod dashboard;
pub mod instructors;
pub mod registrations;
pub mod search;
pub mod students;

/// Pagination parameters for list endpoints.
#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct PaginationParams {
    /// Maximum number of items to return (default: 100, max: 1000).
    pub limit: Option<usize>,
    /// Number of items to skip (default: 0).
    pub offset: Option<usize>,
}

impl PaginationParams {
    const DEFAULT_LIMIT: usize = 100;
    const MAX_LIMIT: usize = 1000;

    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .min(Self::MAX_LIMIT)
    }

    pub fn effective_offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }

    /// Apply this pagination to an already-ordered vector.
    pub fn page<T>(&self, rows: Vec<T>) -> Vec<T> {
        let offset = self.effective_offset().min(rows.len());
        rows.into_iter()
            .skip(offset)
            .take(self.effective_limit())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamping() {
        let p = PaginationParams::default();
        assert_eq!(p.effective_limit(), 100);
        assert_eq!(p.effective_offset(), 0);

        let p = PaginationParams {
            limit: Some(5000),
            offset: Some(2),
        };
        assert_eq!(p.effective_limit(), 1000);
        assert_eq!(p.effective_offset(), 2);
    }

    #[test]
    fn page_clamps_offset_past_end() {
        let p = PaginationParams {
            limit: Some(2),
            offset: Some(10),
        };
        assert!(p.page(vec![1, 2, 3]).is_empty());

        let p = PaginationParams {
            limit: Some(2),
            offset: Some(1),
        };
        assert_eq!(p.page(vec![1, 2, 3]), vec![2, 3]);
    }
}
